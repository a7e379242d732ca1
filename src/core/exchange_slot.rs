//! Single-slot handoff between a background producer and the consuming thread.
//!
//! The slot is a bounded channel of capacity one. Neither side ever blocks:
//! the producer fails fast when the slot is occupied, the consumer gets `None`
//! when it is empty. The only critical section is the channel's own
//! enqueue/dequeue of an owned value, so the consumer never waits on a pass.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TryRecvError, TrySendError};

/// Creates a connected publisher / receiver pair sharing one empty slot.
pub fn exchange_slot<T: Send>() -> (SlotPublisher<T>, SlotReceiver<T>) {
    let (sender, receiver) = sync_channel(1);
    (SlotPublisher { sender }, SlotReceiver { receiver })
}

/// Producer side of an exchange slot. Cloned into every background pass.
#[derive(Debug)]
pub struct SlotPublisher<T> {
    sender: SyncSender<T>,
}

impl<T> Clone for SlotPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Send> SlotPublisher<T> {
    /// Places `value` into the slot.
    ///
    /// # Errors
    /// Hands `value` back if the slot still holds an unconsumed value or if the
    /// receiving side has been dropped.
    pub fn publish(&self, value: T) -> Result<(), T> {
        self.sender.try_send(value).map_err(|err| match err {
            TrySendError::Full(value) | TrySendError::Disconnected(value) => value,
        })
    }
}

/// Consumer side of an exchange slot.
#[derive(Debug)]
pub struct SlotReceiver<T> {
    receiver: Receiver<T>,
}

impl<T: Send> SlotReceiver<T> {
    /// Takes ownership of the pending value, leaving the slot empty.
    pub fn try_take(&self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_slot_yields_none() {
        let (_publisher, receiver) = exchange_slot::<u32>();
        assert_eq!(receiver.try_take(), None);
    }

    #[test]
    fn value_is_consumed_once() {
        let (publisher, receiver) = exchange_slot();
        publisher.publish(7u32).unwrap();
        assert_eq!(receiver.try_take(), Some(7));
        assert_eq!(receiver.try_take(), None);
    }

    #[test]
    fn occupied_slot_rejects_second_value() {
        let (publisher, receiver) = exchange_slot();
        publisher.publish(1u32).unwrap();
        assert_eq!(publisher.publish(2), Err(2));
        assert_eq!(receiver.try_take(), Some(1));
        assert!(publisher.publish(3).is_ok());
    }

    #[test]
    fn publish_after_receiver_dropped_returns_value() {
        let (publisher, receiver) = exchange_slot();
        drop(receiver);
        assert_eq!(publisher.publish(String::from("mesh")), Err(String::from("mesh")));
    }

    #[test]
    fn value_crosses_threads() {
        let (publisher, receiver) = exchange_slot();
        thread::spawn(move || publisher.publish(vec![1u32, 2, 3]).unwrap())
            .join()
            .unwrap();
        assert_eq!(receiver.try_take(), Some(vec![1, 2, 3]));
    }
}
