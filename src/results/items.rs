//! Decoded value lists
//!
//! A [`ResultSet`] is what range and pop commands hand back. Its items are
//! zero-copy views into the response buffer the decoder received, so the
//! buffer stays alive until every item is gone. `release` drops them early;
//! dropping the set does the same.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

/// One (value, mask) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    value: Bytes,
    mask: Bytes,
}

impl Item {
    pub fn new(value: Bytes, mask: Bytes) -> Self {
        Self { value, mask }
    }

    /// Raw value bytes, including any padding up to the key's value size
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Raw mask bytes
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Value without trailing NUL padding
    pub fn value_trimmed(&self) -> &[u8] {
        trim_padding(&self.value)
    }

    /// Value as text, padding removed, invalid UTF-8 replaced
    pub fn value_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.value_trimmed())
    }

    /// Mask as text, padding removed, invalid UTF-8 replaced
    pub fn mask_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(trim_padding(&self.mask))
    }
}

fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

/// An ordered, read-only list of decoded items
///
/// Every item shares the same value size and mask size.
#[derive(Debug, Default)]
pub struct ResultSet {
    value_size: u32,
    mask_size: u32,
    items: Vec<Item>,
    released: bool,
}

impl ResultSet {
    pub(crate) fn new(value_size: u32, mask_size: u32, items: Vec<Item>) -> Self {
        Self {
            value_size,
            mask_size,
            items,
            released: false,
        }
    }

    /// Number of items (0 once released)
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Width of every value in bytes
    pub fn value_size(&self) -> u32 {
        self.value_size
    }

    /// Width of every mask in bytes
    pub fn mask_size(&self) -> u32 {
        self.mask_size
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Values with padding removed, in result order
    pub fn values(&self) -> Vec<Vec<u8>> {
        self.items
            .iter()
            .map(|item| item.value_trimmed().to_vec())
            .collect()
    }

    /// Give the decode buffer back
    ///
    /// Safe to call any number of times.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.items = Vec::new();
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for ResultSet {
    fn drop(&mut self) {
        self.release();
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "count:{} valuesize:{} masksize:{}",
            self.count(),
            self.value_size,
            self.mask_size
        )?;
        for item in &self.items {
            writeln!(f, "value:{} mask:{}", item.value_lossy(), item.mask_lossy())?;
        }
        Ok(())
    }
}
