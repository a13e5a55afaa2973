//! Concurrency Tests
//!
//! The two channels are independent; calls on one channel are serialized.

use std::time::{Duration, Instant};

use memlink::Status;

use crate::common::{connect, READ_PORT, WRITE_PORT};

#[test]
fn test_concurrent_reads_and_writes() {
    let (harness, session) = connect();
    assert_eq!(session.create_list("k", 8, ""), Status::Ok);

    const WRITERS: usize = 4;
    const PER_WRITER: usize = 50;

    crossbeam::scope(|s| {
        for w in 0..WRITERS {
            let session = &session;
            s.spawn(move |_| {
                for i in 0..PER_WRITER {
                    let value = format!("{}-{:04}", w, i);
                    assert_eq!(session.insert("k", value.as_bytes(), "", -1), Status::Ok);
                }
            });
        }
        for _ in 0..2 {
            let session = &session;
            s.spawn(move |_| {
                for _ in 0..PER_WRITER {
                    let reply = session.range_visible("k", "", 0, 1000);
                    assert_eq!(reply.status(), Status::Ok);
                    let result = reply.value().unwrap();
                    assert_eq!(result.value_size(), 8);
                    assert!(result.count() <= WRITERS * PER_WRITER);
                }
            });
        }
    })
    .unwrap();

    let count = session.count("k", "").into_value().unwrap();
    assert_eq!(count.visible as usize, WRITERS * PER_WRITER);
    assert_eq!(harness.open_count(), 2);
    assert_eq!(harness.close_count(), 0);
}

#[test]
fn test_read_channel_not_blocked_by_slow_write() {
    let (harness, session) = connect();
    assert_eq!(session.create_list("k", 8, ""), Status::Ok);
    harness.slow_down(WRITE_PORT, Duration::from_millis(600));

    crossbeam::scope(|s| {
        s.spawn(|_| {
            assert_eq!(session.insert("k", b"slow", "", -1), Status::Ok);
        });

        std::thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        assert_eq!(session.ping(), Status::Ok);
        assert!(start.elapsed() < Duration::from_millis(300));
    })
    .unwrap();
}

#[test]
fn test_same_channel_calls_are_serialized() {
    let (harness, session) = connect();
    let delay = Duration::from_millis(100);
    harness.slow_down(READ_PORT, delay);

    let start = Instant::now();
    crossbeam::scope(|s| {
        for _ in 0..3 {
            s.spawn(|_| assert_eq!(session.ping(), Status::Ok));
        }
    })
    .unwrap();

    assert!(start.elapsed() >= delay * 3);
    assert_eq!(harness.request_count(), 3);
}
