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

#![forbid(unsafe_code)]
#![forbid(missing_docs)]

//! # Thread Messenger
//!
//! An in-process, thread-safe publish/subscribe bus. Independent OS threads
//! exchange typed payloads through named channels without holding references
//! to one another.
//!
//! ## Key Concepts
//!
//! - **Messenger (`Messenger`)**: registry of named channels and the typed
//!   `send` / `receive` / `wait_for_message_in_channel` surface.
//! - **Channel (`Channel`)**: named endpoint owning one transport and one
//!   broadcast wait primitive.
//! - **Transport (`Transport`)**: per-channel router from payload type to its queue.
//! - **MessageQueue (`MessageQueue`)**: non-blocking FIFO of messages of one type.
//! - **Message (`Message`)**: immutable envelope of a type tag and a shared payload.
//!
//! Wake-ups are broadcast: every thread parked on a channel returns when anything
//! is published there, and the woken threads race on `receive`. Only as many of
//! them succeed as there are messages of the requested type.
//!
//! ## Quick Start
//!
//! ```rust
//! use thread_messenger::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Ping(u32);
//!
//! let messenger = make_messenger();
//! messenger.register_channel("telemetry");
//! messenger.send("telemetry", Ping(7));
//!
//! let ping = messenger.receive::<Ping>("telemetry").unwrap();
//! assert_eq!(*ping, Ping(7));
//! ```

/// Messenger, channels, configuration and logging.
pub(crate) mod common;

/// Message envelopes, queues, transports and errors.
pub(crate) mod message;

/// Seams for injected collaborators.
pub(crate) mod traits;

pub use common::{
    init_tracing, make_messenger, BehaviorConfig, Channel, ChannelName, LogChannel, LogRecord,
    Logger, LoggerFactory, LoggingConfig, Messenger, MessengerConfig, MessengerPtr, NullSink,
    PathsConfig, TracingConfig, TracingSink, CONFIG,
};
pub use message::{Message, MessageQueue, MessengerError, Payload, Result, Transport, TypeTag};
pub use traits::LogSink;

/// A prelude module for conveniently importing the most commonly used items.
///
/// # Re-exports
///
/// * [`crate::Messenger`], [`crate::MessengerPtr`] and [`crate::make_messenger`]: the public bus.
/// * [`crate::Channel`]: direct channel access for callers that hold one.
/// * [`crate::MessengerError`]: failures raised by `receive`.
/// * [`crate::LogSink`], [`crate::TracingSink`], [`crate::NullSink`]: logging collaborators.
/// * [`crate::MessengerConfig`]: configuration loaded from XDG locations.
pub mod prelude {
    pub use crate::common::{
        make_messenger, Channel, Messenger, MessengerConfig, MessengerPtr, NullSink, TracingSink,
    };
    pub use crate::message::{Message, MessengerError, TypeTag};
    pub use crate::traits::LogSink;
}
