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

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use static_assertions::assert_impl_all;
use tracing::*;

use crate::common::{Channel, Logger, LoggerFactory, MessengerConfig, TracingSink, CONFIG};
use crate::message::{Message, MessengerError, Result, TypeTag};
use crate::traits::LogSink;

/// Name of a channel, unique within one [`Messenger`].
pub type ChannelName = String;

/// A shared messenger, the usual way to hand one instance to many threads.
pub type MessengerPtr = Arc<Messenger>;

/// Creates a shared messenger using the global [`CONFIG`] and a [`TracingSink`].
pub fn make_messenger() -> MessengerPtr {
    Arc::new(Messenger::new())
}

/// Registry of named channels and the typed send/receive/wait surface.
///
/// Failure handling is asymmetric:
///
/// * reported through the log and otherwise ignored: registering a taken name,
///   unregistering a missing one, sending to a missing channel (the payload is
///   dropped) and waiting on a missing channel (returns at once);
/// * raised as [`MessengerError`]: every failed [`receive`](Self::receive).
///
/// The channel map lock is released before any channel is touched, so unrelated
/// channels never serialize on each other.
#[derive(Debug)]
pub struct Messenger {
    channels: DashMap<ChannelName, Arc<Channel>>,
    loggers: LoggerFactory,
    logger: Logger,
}

impl Default for Messenger {
    fn default() -> Self {
        Self::new()
    }
}

impl Messenger {
    /// Creates a messenger from the global [`CONFIG`], logging through `tracing`.
    pub fn new() -> Self {
        Self::with_config(&CONFIG, Arc::new(TracingSink))
    }

    /// Creates a messenger from the global [`CONFIG`] that logs to `sink`.
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self::with_config(&CONFIG, sink)
    }

    /// Creates a messenger from an explicit configuration and sink.
    pub fn with_config(config: &MessengerConfig, sink: Arc<dyn LogSink>) -> Self {
        let loggers = LoggerFactory::from_config(config, sink);
        let logger = loggers.messenger_logger();
        Self {
            channels: DashMap::new(),
            loggers,
            logger,
        }
    }

    /// Creates channel `name` unless one already exists.
    ///
    /// Returns whether a channel was created. A taken name is reported and the
    /// existing channel is left untouched.
    pub fn register_channel(&self, name: impl Into<ChannelName>) -> bool {
        let name = name.into();
        self.logger.log(format!("Creating channel: {name}..."));
        let created = match self.channels.entry(name.clone()) {
            Entry::Vacant(slot) => {
                let logger = self.loggers.channel_logger(&name);
                slot.insert(Arc::new(Channel::new(name.clone(), logger)));
                true
            }
            Entry::Occupied(_) => false,
        };
        if !created {
            self.logger.error(format!(
                "Attempt to create channel {name} that already exists!"
            ));
        }
        created
    }

    /// Removes channel `name`, discarding anything still queued on it.
    ///
    /// Threads parked on the channel are woken so they do not wait on a channel
    /// nobody can publish to. Returns whether a channel was removed.
    pub fn unregister_channel(&self, name: &str) -> bool {
        self.logger.log(format!("Removing channel: {name}..."));
        let Some((_, channel)) = self.channels.remove(name) else {
            self.logger.error(format!(
                "Attempt to remove channel {name} that does not exist!"
            ));
            return false;
        };

        let discarded = channel.pending_messages();
        if discarded > 0 {
            debug!(channel = name, discarded, "dropping undelivered messages");
        }
        channel.notify_waiters();
        true
    }

    /// Publishes `payload` on channel `name`.
    ///
    /// A missing channel is reported and the payload dropped; the caller gets no
    /// failure signal.
    pub fn send<T: Send + Sync + 'static>(&self, name: &str, payload: T) {
        self.send_shared(name, Arc::new(payload));
    }

    /// Publishes an already shared payload on channel `name`.
    ///
    /// Same missing-channel behavior as [`send`](Self::send).
    pub fn send_shared<T: Send + Sync + 'static>(&self, name: &str, payload: Arc<T>) {
        match self.channel(name) {
            Some(channel) => channel.publish(Message::make(payload)),
            None => self.logger.error(format!("No such channel {name}!")),
        }
    }

    /// Takes the oldest `T` from channel `name` without blocking.
    ///
    /// # Errors
    ///
    /// * [`MessengerError::ChannelNotFound`] when no channel has that name.
    /// * [`MessengerError::NoSuchMessageType`] when no `T` was ever sent there.
    /// * [`MessengerError::QueueUnderflow`] when every `T` sent there was taken.
    pub fn receive<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let Some(channel) = self.channel(name) else {
            self.logger.error(format!("No such channel {name}!"));
            return Err(MessengerError::ChannelNotFound(name.to_string()));
        };

        let type_tag = TypeTag::of::<T>();
        match channel.take(type_tag).and_then(|message| message.downcast::<T>()) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                self.logger
                    .error(format!("Nothing to receive from channel {name}: {error}"));
                Err(error)
            }
        }
    }

    /// Blocks until something is published on channel `name`.
    ///
    /// A missing channel is reported and the call returns immediately. See
    /// [`Channel::wait_until_message`] for the wake-up contract.
    pub fn wait_for_message_in_channel(&self, name: &str) {
        let Some(channel) = self.channel(name) else {
            self.logger.error(format!(
                "Attempt to wait for channel {name} that does not exists!"
            ));
            return;
        };

        self.logger
            .log(format!("Waiting for new data from channel {name}..."));
        channel.wait_until_message();
        self.logger
            .log(format!("Received data in the channel {name}!"));
    }

    /// Whether channel `name` is registered.
    pub fn channel_exists(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// The registered channel names, sorted.
    pub fn channel_names(&self) -> Vec<ChannelName> {
        let mut names: Vec<ChannelName> = self
            .channels
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// A handle onto channel `name`.
    ///
    /// The handle keeps the channel alive after it is unregistered, but the
    /// messenger no longer routes to it.
    pub fn channel(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }
}

assert_impl_all!(Messenger: Send, Sync);
