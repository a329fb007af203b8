/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use parking_lot::{Condvar, Mutex};
use static_assertions::assert_impl_all;
use tracing::*;

use crate::common::{ChannelName, Logger};
use crate::message::{Message, Result, Transport, TypeTag};

/// A named publish/subscribe endpoint.
///
/// A channel owns one [`Transport`] and one broadcast wait primitive. Publishing
/// routes the message by type and then wakes every thread parked in
/// [`wait_until_message`](Self::wait_until_message), whatever type they are
/// interested in. Woken threads then race on [`take`](Self::take); those that
/// lose observe an empty queue, so a wake-up is a hint, not a delivery.
#[derive(Debug)]
pub struct Channel {
    name: ChannelName,
    transport: Transport,
    /// Number of threads parked on `activity`.
    waiting: Mutex<usize>,
    activity: Condvar,
    logger: Logger,
}

impl Channel {
    /// Creates an empty channel.
    pub fn new(name: impl Into<ChannelName>, logger: Logger) -> Self {
        Self {
            name: name.into(),
            transport: Transport::new(),
            waiting: Mutex::new(0),
            activity: Condvar::new(),
            logger,
        }
    }

    /// The channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queues `message` under its type and wakes all waiters.
    pub fn publish(&self, message: Message) {
        self.logger
            .log(format!("Publishing message {}...", message.type_tag()));
        self.transport.send(message);
        self.notify_waiters();
    }

    /// Takes the oldest message of `type_tag` without blocking.
    #[doc(alias = "unpublish")]
    pub fn take(&self, type_tag: TypeTag) -> Result<Message> {
        self.logger
            .log(format!("Un-publishing message {type_tag}..."));
        self.transport.receive(type_tag)
    }

    /// Blocks until the next publish on this channel.
    ///
    /// Waits exactly once on the underlying condition: no timeout, no
    /// cancellation and no re-check loop. Returning says that something was
    /// published, not that anything is left for the caller.
    pub fn wait_until_message(&self) {
        self.logger.log("Waiting for new messages...");
        let mut waiting = self.waiting.lock();
        *waiting += 1;
        self.activity.wait(&mut waiting);
        *waiting -= 1;
    }

    /// Threads currently parked in [`wait_until_message`](Self::wait_until_message).
    pub fn waiting_threads(&self) -> usize {
        *self.waiting.lock()
    }

    /// Messages queued across all types.
    pub fn pending_messages(&self) -> usize {
        self.transport.pending_total()
    }

    /// Messages queued under `type_tag`.
    pub fn pending(&self, type_tag: TypeTag) -> usize {
        self.transport.pending(type_tag)
    }

    // Taking the lock orders the notification after any waiter that has already
    // counted itself in, so a counted waiter cannot miss it.
    pub(crate) fn notify_waiters(&self) {
        let waiting = self.waiting.lock();
        trace!(channel = %self.name, waiting = *waiting, "notifying waiters");
        self.activity.notify_all();
    }
}

assert_impl_all!(Channel: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::common::NullSink;
    use crate::message::MessengerError;

    #[derive(Debug, PartialEq)]
    struct Frame(u8);

    fn channel(name: &str) -> Arc<Channel> {
        let logger = Logger::new(format!("Channel - {name}"), false, Arc::new(NullSink));
        Arc::new(Channel::new(name, logger))
    }

    fn wait_for_waiters(channel: &Channel, count: usize) {
        while channel.waiting_threads() < count {
            thread::yield_now();
        }
    }

    #[test]
    fn test_publish_then_take() {
        let channel = channel("video");
        channel.publish(Message::make(Arc::new(Frame(1))));

        let message = channel.take(TypeTag::of::<Frame>()).unwrap();
        assert_eq!(*message.downcast::<Frame>().unwrap(), Frame(1));
        assert_eq!(channel.name(), "video");
    }

    #[test]
    fn test_take_keeps_two_tier_failure() {
        let channel = channel("video");
        assert!(matches!(
            channel.take(TypeTag::of::<Frame>()),
            Err(MessengerError::NoSuchMessageType(_))
        ));

        channel.publish(Message::make(Arc::new(Frame(1))));
        channel.take(TypeTag::of::<Frame>()).unwrap();
        assert!(matches!(
            channel.take(TypeTag::of::<Frame>()),
            Err(MessengerError::QueueUnderflow(_))
        ));
    }

    #[test]
    fn test_publish_wakes_all_waiters() {
        let channel = channel("video");
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let channel = Arc::clone(&channel);
                thread::spawn(move || channel.wait_until_message())
            })
            .collect();

        wait_for_waiters(&channel, 3);
        channel.publish(Message::make(Arc::new(Frame(7))));

        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert_eq!(channel.waiting_threads(), 0);
        assert_eq!(channel.pending_messages(), 1);
    }

    #[test]
    fn test_any_type_wakes_waiters() {
        let channel = channel("video");
        let waiter = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.wait_until_message())
        };

        wait_for_waiters(&channel, 1);
        channel.publish(Message::make(Arc::new("unrelated")));
        waiter.join().unwrap();
        assert_eq!(channel.pending(TypeTag::of::<Frame>()), 0);
    }
}
