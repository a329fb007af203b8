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

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::*;

use crate::message::{Message, MessengerError, Result, TypeTag};

/// Thread-safe FIFO of messages that share one type tag.
///
/// `pop` never blocks: an empty queue fails immediately with
/// [`MessengerError::QueueUnderflow`]. The lock is held only for the mutation.
#[derive(Debug)]
pub struct MessageQueue {
    type_tag: TypeTag,
    messages: Mutex<VecDeque<Message>>,
}

impl MessageQueue {
    /// Creates an empty queue for `type_tag`.
    pub fn new(type_tag: TypeTag) -> Self {
        Self {
            type_tag,
            messages: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends `message` to the tail.
    pub fn push(&self, message: Message) {
        debug_assert_eq!(message.type_tag(), self.type_tag);
        let depth = {
            let mut messages = self.messages.lock();
            messages.push_back(message);
            messages.len()
        };
        trace!(type_name = self.type_tag.name(), depth, "pushed");
    }

    /// Removes and returns the head.
    pub fn pop(&self) -> Result<Message> {
        self.messages
            .lock()
            .pop_front()
            .ok_or_else(|| MessengerError::QueueUnderflow(self.type_tag.name().to_string()))
    }

    /// The tag every message in this queue carries.
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Number of queued messages at the time of the call.
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Whether the queue was empty at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn queue_of_u32() -> MessageQueue {
        MessageQueue::new(TypeTag::of::<u32>())
    }

    #[test]
    fn test_pop_is_fifo() {
        let queue = queue_of_u32();
        queue.push(Message::make(Arc::new(1_u32)));
        queue.push(Message::make(Arc::new(2_u32)));

        assert_eq!(*queue.pop().unwrap().downcast::<u32>().unwrap(), 1);
        assert_eq!(*queue.pop().unwrap().downcast::<u32>().unwrap(), 2);
    }

    #[test]
    fn test_pop_empty_underflows() {
        let queue = queue_of_u32();
        assert!(matches!(queue.pop(), Err(MessengerError::QueueUnderflow(_))));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_usable_after_underflow() {
        let queue = queue_of_u32();
        assert!(queue.pop().is_err());
        queue.push(Message::make(Arc::new(9_u32)));
        assert_eq!(queue.len(), 1);
        assert_eq!(*queue.pop().unwrap().downcast::<u32>().unwrap(), 9);
    }
}
