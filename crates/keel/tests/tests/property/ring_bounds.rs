//! Property tests: ring buffers never exceed capacity and keep the newest items.

use keel_history::RingBuffer;
use proptest::prelude::*;

proptest! {
    /// Length is min(pushes, capacity) and the retained items are the latest, in order.
    #[test]
    fn ring_keeps_latest_within_capacity(
        capacity in 1usize..32,
        items in proptest::collection::vec(any::<i32>(), 0..100),
    ) {
        let mut ring = RingBuffer::new(capacity).unwrap();
        for item in &items {
            ring.push(*item);
            prop_assert!(ring.len() <= capacity);
        }

        let expected_len = items.len().min(capacity);
        prop_assert_eq!(ring.len(), expected_len);
        let expected: Vec<i32> = items[items.len() - expected_len..].to_vec();
        prop_assert_eq!(ring.snapshot(), expected);
        prop_assert_eq!(ring.iter().count(), expected_len);
    }

    /// last_n never returns more than requested or stored.
    #[test]
    fn last_n_is_bounded(
        capacity in 1usize..16,
        pushes in 0usize..40,
        n in 0usize..40,
    ) {
        let mut ring = RingBuffer::new(capacity).unwrap();
        for i in 0..pushes {
            ring.push(i);
        }
        let tail = ring.last_n(n);
        prop_assert_eq!(tail.len(), n.min(ring.len()));
        if let (Some(last), Some(latest)) = (tail.last(), ring.latest()) {
            prop_assert_eq!(last, latest);
        }
    }
}
