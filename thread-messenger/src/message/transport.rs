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

use dashmap::DashMap;
use tracing::*;

use crate::message::{Message, MessageQueue, MessengerError, Result, TypeTag};

/// Per-channel router from type tag to its FIFO queue.
///
/// Queues are created the first time a tag is published and live as long as the
/// transport. The map lock is released before the queue is touched, so routing
/// and queue mutation never nest.
#[derive(Default, Debug)]
pub struct Transport {
    queues: DashMap<TypeTag, Arc<MessageQueue>>,
}

impl Transport {
    /// Creates a transport with no queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes `message` to the queue for its tag, creating the queue if needed.
    pub fn send(&self, message: Message) {
        let queue = self.queue(message.type_tag());
        queue.push(message);
    }

    /// Pops the head of the queue for `type_tag`.
    ///
    /// Fails with [`MessengerError::NoSuchMessageType`] when the tag was never
    /// published here and with [`MessengerError::QueueUnderflow`] when its queue
    /// is empty. A failed lookup does not create a queue.
    pub fn receive(&self, type_tag: TypeTag) -> Result<Message> {
        let queue = self
            .queues
            .get(&type_tag)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| MessengerError::NoSuchMessageType(type_tag.name().to_string()))?;
        queue.pop()
    }

    /// Number of distinct tags seen so far.
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    /// Messages waiting under `type_tag`.
    pub fn pending(&self, type_tag: TypeTag) -> usize {
        self.queues
            .get(&type_tag)
            .map(|entry| entry.value().len())
            .unwrap_or_default()
    }

    /// Messages waiting across all tags.
    pub fn pending_total(&self) -> usize {
        let queues: Vec<Arc<MessageQueue>> = self
            .queues
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        queues.iter().map(|queue| queue.len()).sum()
    }

    // Atomic create-if-absent; the shard guard drops at the end of the statement.
    fn queue(&self, type_tag: TypeTag) -> Arc<MessageQueue> {
        Arc::clone(
            &self
                .queues
                .entry(type_tag)
                .or_insert_with(|| {
                    debug!(type_name = type_tag.name(), "creating message queue");
                    Arc::new(MessageQueue::new(type_tag))
                }),
        )
    }
}
