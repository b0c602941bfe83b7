//! Single-slot "latest value" channel.
//!
//! Publishing overwrites whatever is in the slot; nothing queues. Each
//! receiver remembers the last version it consumed, so it can tell whether a
//! newer value has arrived without ever seeing the intermediate ones.

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    version: u64,
}

/// Writing half of a latest-value slot.
#[derive(Debug)]
pub struct LatestSender<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

/// Reading half of a latest-value slot. Dropping it unsubscribes.
#[derive(Debug)]
pub struct LatestReceiver<T> {
    slot: Arc<Mutex<Slot<T>>>,
    seen: u64,
}

/// Create an empty slot with one receiver attached.
///
/// # Examples
///
/// ```
/// use geoveil::viewport::latest_slot;
///
/// let (tx, mut rx) = latest_slot();
/// tx.publish(1);
/// tx.publish(2);
/// tx.publish(3);
/// assert_eq!(rx.take_changed(), Some(3));
/// assert_eq!(rx.take_changed(), None);
/// assert_eq!(rx.latest(), Some(3));
/// ```
pub fn latest_slot<T: Clone>() -> (LatestSender<T>, LatestReceiver<T>) {
    let sender = LatestSender::new();
    let receiver = sender.subscribe();
    (sender, receiver)
}

impl<T: Clone> LatestSender<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                value: None,
                version: 0,
            })),
        }
    }

    /// Replace the slot's value. Returns the new version number.
    pub fn publish(&self, value: T) -> u64 {
        let mut slot = self.slot.lock();
        slot.value = Some(value);
        slot.version += 1;
        slot.version
    }

    pub fn latest(&self) -> Option<T> {
        self.slot.lock().value.clone()
    }

    pub fn version(&self) -> u64 {
        self.slot.lock().version
    }

    /// Attach a new receiver. If a value is already present it counts as
    /// unseen for the new receiver.
    pub fn subscribe(&self) -> LatestReceiver<T> {
        LatestReceiver {
            slot: Arc::clone(&self.slot),
            seen: 0,
        }
    }

    pub fn receiver_count(&self) -> usize {
        Arc::strong_count(&self.slot) - 1
    }
}

impl<T: Clone> Default for LatestSender<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> LatestReceiver<T> {
    /// The current value, whether or not it has been consumed.
    pub fn latest(&self) -> Option<T> {
        self.slot.lock().value.clone()
    }

    pub fn has_changed(&self) -> bool {
        self.slot.lock().version > self.seen
    }

    /// The current value if it is newer than the last one taken.
    pub fn take_changed(&mut self) -> Option<T> {
        let slot = self.slot.lock();
        if slot.version > self.seen {
            self.seen = slot.version;
            slot.value.clone()
        } else {
            None
        }
    }

    /// Detach from the slot.
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot() {
        let (tx, mut rx) = latest_slot::<u32>();
        assert_eq!(tx.latest(), None);
        assert_eq!(rx.latest(), None);
        assert!(!rx.has_changed());
        assert_eq!(rx.take_changed(), None);
    }

    #[test]
    fn test_coalesces_to_last_value() {
        let (tx, mut rx) = latest_slot();
        for i in 0..100 {
            tx.publish(i);
        }
        assert_eq!(tx.version(), 100);
        assert!(rx.has_changed());
        assert_eq!(rx.take_changed(), Some(99));
        assert!(!rx.has_changed());
    }

    #[test]
    fn test_receivers_are_independent() {
        let (tx, mut a) = latest_slot();
        tx.publish("first");
        assert_eq!(a.take_changed(), Some("first"));

        let mut b = tx.subscribe();
        assert_eq!(b.take_changed(), Some("first"));

        tx.publish("second");
        assert_eq!(a.take_changed(), Some("second"));
        assert_eq!(b.take_changed(), Some("second"));
    }

    #[test]
    fn test_unsubscribe() {
        let (tx, rx) = latest_slot::<u8>();
        let extra = tx.subscribe();
        assert_eq!(tx.receiver_count(), 2);

        extra.unsubscribe();
        assert_eq!(tx.receiver_count(), 1);
        drop(rx);
        assert_eq!(tx.receiver_count(), 0);

        // Publishing with no receivers is fine.
        tx.publish(1);
        assert_eq!(tx.latest(), Some(1));
    }
}
