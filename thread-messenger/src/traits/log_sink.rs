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
use std::fmt::Debug;

use crate::common::LogRecord;

/// Destination for the line-oriented control log of the messenger.
///
/// Every state-changing or failing operation hands one [`LogRecord`] to the sink.
/// The messenger never depends on the outcome: an `Err` is swallowed (and traced)
/// so that a broken sink cannot change routing behavior.
///
/// Implementations must be cheap and must not call back into the messenger.
pub trait LogSink: Send + Sync + Debug {
    /// Writes one record.
    fn write(&self, record: &LogRecord<'_>) -> anyhow::Result<()>;
}
