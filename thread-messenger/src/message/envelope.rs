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

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use static_assertions::assert_impl_all;

use crate::message::{MessengerError, Result, TypeTag};

/// A type-erased, shared payload.
pub type Payload = Arc<dyn Any + Send + Sync + 'static>;

/// Immutable envelope carrying a payload through a channel.
///
/// The tag decides which queue the message lands in; the payload is opaque until
/// a consumer asks for it by type. Cloning a `Message` shares the payload.
#[derive(Clone)]
pub struct Message {
    type_tag: TypeTag,
    payload: Payload,
    timestamp: SystemTime,
}

impl Message {
    /// Creates a message from an explicit tag and an erased payload.
    ///
    /// The caller is responsible for the tag matching the payload. A mismatch is
    /// reported as [`MessengerError::PayloadMismatch`] when the payload is read.
    pub fn new(type_tag: TypeTag, payload: Payload) -> Self {
        Self {
            type_tag,
            payload,
            timestamp: SystemTime::now(),
        }
    }

    /// Wraps a shared payload, tagging it with its own type.
    pub fn make<T: Send + Sync + 'static>(payload: Arc<T>) -> Self {
        Self::new(TypeTag::of::<T>(), payload)
    }

    /// The routing tag.
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// The erased payload.
    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// When the message was created.
    #[inline]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Recovers the payload as `T`, sharing ownership with this message.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        Arc::clone(&self.payload)
            .downcast::<T>()
            .map_err(|_| MessengerError::PayloadMismatch {
                expected: std::any::type_name::<T>().to_string(),
                found: self.type_tag.name().to_string(),
            })
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("type_tag", &self.type_tag.name())
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

assert_impl_all!(Message: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Temperature(i32);

    #[test]
    fn test_make_tags_by_payload_type() {
        let message = Message::make(Arc::new(Temperature(21)));
        assert_eq!(message.type_tag(), TypeTag::of::<Temperature>());
    }

    #[test]
    fn test_downcast_shares_payload() {
        let payload = Arc::new(Temperature(21));
        let message = Message::make(Arc::clone(&payload));
        let recovered = message.downcast::<Temperature>().unwrap();
        assert!(Arc::ptr_eq(&payload, &recovered));
    }

    #[test]
    fn test_mismatched_tag_is_reported() {
        let message = Message::new(TypeTag::of::<u64>(), Arc::new(Temperature(3)));
        let error = message.downcast::<u64>().unwrap_err();
        assert!(matches!(error, MessengerError::PayloadMismatch { .. }));
    }
}
