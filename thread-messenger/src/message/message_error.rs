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

use std::fmt;

/// Failures raised to callers of the messenger.
///
/// Only the read path raises. Registration conflicts, sends to missing channels
/// and waits on missing channels are reported through the logger and otherwise
/// ignored, so they never surface here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessengerError {
    /// No channel is registered under the given name.
    ChannelNotFound(String),

    /// The channel has never seen a message of the requested type.
    NoSuchMessageType(String),

    /// A queue exists for the requested type but holds no messages.
    QueueUnderflow(String),

    /// A payload did not downcast to the type its tag claims.
    ///
    /// Unreachable through the typed `send`/`receive` pair; possible only when a
    /// [`Message`](crate::Message) is assembled by hand with a mismatched tag.
    PayloadMismatch {
        /// The type the caller asked for.
        expected: String,
        /// The type named by the message tag.
        found: String,
    },
}

impl MessengerError {
    /// Returns `true` for the two "nothing to take" failures.
    ///
    /// Callers racing after a broadcast wake-up usually treat both the same way.
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Self::NoSuchMessageType(_) | Self::QueueUnderflow(_)
        )
    }
}

impl fmt::Display for MessengerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelNotFound(name) => {
                write!(f, "attempt to receive message from missing channel: {name}")
            }
            Self::NoSuchMessageType(type_name) => {
                write!(f, "no messages with such type: {type_name}")
            }
            Self::QueueUnderflow(type_name) => write!(f, "message queue underflow: {type_name}"),
            Self::PayloadMismatch { expected, found } => {
                write!(f, "payload mismatch: expected {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for MessengerError {}

/// Result type alias for messenger operations.
pub type Result<T> = std::result::Result<T, MessengerError>;
