// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use crossbeam::channel::{RecvTimeoutError, Sender, TrySendError, unbounded};

/// The two event kinds the submission front-end enqueues, keyed by order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
	New(u64),
	Cancel(u64),
}

/// Result of `EventReceiver::get` — a timeout is not an error, it drives the
/// engine's periodic depth-snapshot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
	Event(OrderEvent),
	Timeout,
}

/// The process-wide event queue: a blocking, unbounded, single-consumer FIFO.
/// `put` is non-blocking and does not fail under normal operation; `get`
/// blocks for up to a timeout.
pub struct EventQueue;

impl EventQueue {
	/// Splits into a cloneable producer half (one per front-end thread) and a
	/// single consumer half (the matching loop).
	pub fn new() -> (EventSender, EventReceiver) {
		let (sender, receiver) = unbounded();
		(EventSender { sender }, EventReceiver { receiver })
	}
}

/// Producer end. Cloneable and shared across arbitrary front-end threads.
#[derive(Clone)]
pub struct EventSender {
	sender: Sender<OrderEvent>,
}

impl EventSender {
	/// Enqueues an event. Non-blocking; only fails if the matching loop's
	/// receiver has been dropped (engine shut down).
	pub fn put(&self, event: OrderEvent) -> Result<(), QueueError> {
		self.sender.try_send(event).map_err(|e| match e {
			TrySendError::Full(_) => unreachable!("unbounded channel is never full"),
			TrySendError::Disconnected(_) => QueueError::Disconnected,
		})
	}
}

/// Consumer end. Not cloned — only the matching loop owns this.
pub struct EventReceiver {
	receiver: crossbeam::channel::Receiver<OrderEvent>,
}

impl EventReceiver {
	/// Blocks for up to `timeout` for the next event.
	pub fn get(&self, timeout: Duration) -> Result<Polled, QueueError> {
		match self.receiver.recv_timeout(timeout) {
			Ok(event) => Ok(Polled::Event(event)),
			Err(RecvTimeoutError::Timeout) => Ok(Polled::Timeout),
			Err(RecvTimeoutError::Disconnected) => Err(QueueError::Disconnected),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
	#[error("event queue disconnected")]
	Disconnected,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn put_then_get_returns_event_fifo() {
		let (tx, rx) = EventQueue::new();
		tx.put(OrderEvent::New(1)).unwrap();
		tx.put(OrderEvent::Cancel(1)).unwrap();

		assert_eq!(
			rx.get(Duration::from_millis(50)).unwrap(),
			Polled::Event(OrderEvent::New(1))
		);
		assert_eq!(
			rx.get(Duration::from_millis(50)).unwrap(),
			Polled::Event(OrderEvent::Cancel(1))
		);
	}

	#[test]
	fn get_times_out_on_empty_queue() {
		let (_tx, rx) = EventQueue::new();
		assert_eq!(rx.get(Duration::from_millis(10)).unwrap(), Polled::Timeout);
	}

	#[test]
	fn multiple_senders_can_clone() {
		let (tx, rx) = EventQueue::new();
		let tx2 = tx.clone();
		tx.put(OrderEvent::New(1)).unwrap();
		tx2.put(OrderEvent::New(2)).unwrap();

		let mut seen = vec![];
		seen.push(rx.get(Duration::from_millis(50)).unwrap());
		seen.push(rx.get(Duration::from_millis(50)).unwrap());
		assert!(seen.contains(&Polled::Event(OrderEvent::New(1))));
		assert!(seen.contains(&Polled::Event(OrderEvent::New(2))));
	}
}
