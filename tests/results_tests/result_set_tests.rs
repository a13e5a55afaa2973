//! ResultSet Tests
//!
//! Rendering, release and ownership of decoded item lists.

use bytes::Bytes;
use memlink::results::{decode_items, encode_items};
use memlink::ResultSet;

fn result_of(values: &[&str], mask: &str) -> ResultSet {
    let payload = encode_items(
        6,
        8,
        values.iter().map(|v| (v.as_bytes(), mask.as_bytes())),
    );
    decode_items(Bytes::from(payload)).unwrap()
}

#[test]
fn test_display_lists_every_pair() {
    let result = result_of(&["000001", "000002"], "7:1:1");
    assert_eq!(
        result.to_string(),
        "count:2 valuesize:6 masksize:8\n\
         value:000001 mask:7:1:1\n\
         value:000002 mask:7:1:1\n"
    );
}

#[test]
fn test_display_of_empty_result_has_no_item_lines() {
    let result = result_of(&[], "");
    let rendered = result.to_string();

    assert_eq!(rendered, "count:0 valuesize:6 masksize:8\n");
    assert!(!rendered.contains("value:"));
    assert!(!rendered.contains("mask:"));
}

#[test]
fn test_display_trims_padding() {
    let result = result_of(&["ab"], "1");
    assert!(result.to_string().contains("value:ab mask:1\n"));
}

#[test]
fn test_release_is_idempotent() {
    let mut result = result_of(&["a", "b", "c"], "1");
    assert_eq!(result.count(), 3);
    assert!(!result.is_released());

    result.release();
    assert!(result.is_released());
    assert_eq!(result.count(), 0);
    assert_eq!(result.iter().count(), 0);

    result.release();
    assert!(result.is_released());
    assert_eq!(result.count(), 0);
}

#[test]
fn test_count_matches_reachable_items_after_release() {
    let mut result = result_of(&["a", "b"], "");
    result.release();
    assert_eq!(result.count(), result.items().len());
    assert!(result.to_string().starts_with("count:0"));
}

#[test]
fn test_values_helper() {
    let result = result_of(&["x", "yy", "zzz"], "");
    assert_eq!(
        result.values(),
        vec![b"x".to_vec(), b"yy".to_vec(), b"zzz".to_vec()]
    );
}

#[test]
fn test_cloned_item_outlives_result() {
    let item = {
        let result = result_of(&["keep"], "m");
        let item = result.get(0).cloned().unwrap();
        item
    };
    // A cloned item holds its own reference to the decode buffer
    assert_eq!(item.value_trimmed(), b"keep");
    assert_eq!(item.mask_lossy(), "m");
}

#[test]
fn test_binary_values_render_lossily() {
    let payload = encode_items(3, 1, [(&[0xFF, 0x41, 0x00][..], &b"1"[..])]);
    let result = decode_items(Bytes::from(payload)).unwrap();

    let item = result.get(0).unwrap();
    assert_eq!(item.value(), &[0xFF, 0x41, 0x00]);
    assert_eq!(item.value_lossy(), "\u{FFFD}A");
}
