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

//! The control log: one line per messenger decision, delivered to a [`LogSink`].
//!
//! Lines read `<channel> - [<thread>] [<prefix>] <text>`, where `channel` is
//! `log` for ordinary actions and `err` for rejected or failed ones.

use std::fmt;
use std::fs;
use std::sync::Arc;

use derive_new::new;
use tracing::*;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::common::{LoggingConfig, MessengerConfig};
use crate::traits::LogSink;

/// Logical sub-channel of a control log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogChannel {
    /// Ordinary control actions.
    Log,
    /// Rejected or failed operations.
    Err,
}

impl LogChannel {
    /// The tag written at the start of a line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Err => "err",
        }
    }
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One control log line, borrowed for the duration of a [`LogSink::write`] call.
#[derive(new, Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// `log` or `err`.
    pub channel: LogChannel,
    /// The emitting thread, when the logger displays thread ids.
    pub thread: Option<&'a str>,
    /// The component prefix, e.g. `Messenger` or `Channel - telemetry`.
    pub prefix: &'a str,
    /// The message text.
    pub text: &'a str,
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.thread {
            Some(thread) => write!(
                f,
                "{} - [{}] [{}] {}",
                self.channel, thread, self.prefix, self.text
            ),
            None => write!(f, "{} - [{}] {}", self.channel, self.prefix, self.text),
        }
    }
}

/// A component-scoped handle onto the control log.
#[derive(new, Debug, Clone)]
pub struct Logger {
    prefix: String,
    display_thread_id: bool,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    /// Emits an ordinary control line.
    pub fn log(&self, text: impl AsRef<str>) {
        self.emit(LogChannel::Log, text.as_ref());
    }

    /// Emits a rejection or failure line.
    pub fn error(&self, text: impl AsRef<str>) {
        self.emit(LogChannel::Err, text.as_ref());
    }

    /// The component prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn emit(&self, channel: LogChannel, text: &str) {
        let thread = self
            .display_thread_id
            .then(|| format!("{:?}", std::thread::current().id()));
        let record = LogRecord::new(channel, thread.as_deref(), &self.prefix, text);
        if let Err(error) = self.sink.write(&record) {
            trace!(prefix = %self.prefix, "log sink failed: {error:#}");
        }
    }
}

/// Creates loggers that share one sink and one thread-id policy.
#[derive(Debug, Clone)]
pub struct LoggerFactory {
    config: LoggingConfig,
    sink: Arc<dyn LogSink>,
}

impl LoggerFactory {
    /// Creates a factory writing to `sink`.
    pub fn new(config: LoggingConfig, sink: Arc<dyn LogSink>) -> Self {
        Self { config, sink }
    }

    /// Creates a factory for `config`, replacing `sink` with a [`NullSink`]
    /// when logging is switched off.
    pub fn from_config(config: &MessengerConfig, sink: Arc<dyn LogSink>) -> Self {
        let sink = if config.behavior.enable_logging {
            sink
        } else {
            Arc::new(NullSink)
        };
        Self::new(config.logging.clone(), sink)
    }

    /// Creates a logger with `prefix`.
    pub fn create_logger(&self, prefix: impl Into<String>) -> Logger {
        Logger::new(prefix.into(), self.config.display_thread_id, Arc::clone(&self.sink))
    }

    /// Creates a logger with the configured default prefix.
    pub fn create_default_logger(&self) -> Logger {
        self.create_logger(self.config.default_prefix.clone())
    }

    /// The logger for the messenger itself.
    pub(crate) fn messenger_logger(&self) -> Logger {
        self.create_logger(self.config.messenger_prefix.clone())
    }

    /// The logger for channel `name`.
    pub(crate) fn channel_logger(&self, name: &str) -> Logger {
        self.create_logger(format!("{} - {}", self.config.channel_prefix, name))
    }
}

/// Forwards control lines to `tracing`: `log` at info level, `err` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &LogRecord<'_>) -> anyhow::Result<()> {
        let thread = record.thread.unwrap_or_default();
        match record.channel {
            LogChannel::Log => info!(
                channel = record.channel.as_str(),
                thread,
                prefix = record.prefix,
                "{}",
                record.text
            ),
            LogChannel::Err => error!(
                channel = record.channel.as_str(),
                thread,
                prefix = record.prefix,
                "{}",
                record.text
            ),
        }
        Ok(())
    }
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _record: &LogRecord<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Installs a global `tracing` subscriber writing to the configured log file.
///
/// Keep the returned guard alive for as long as lines should be flushed. Hosts
/// that already install their own subscriber should not call this.
pub fn init_tracing(config: &MessengerConfig) -> anyhow::Result<WorkerGuard> {
    let directory = config.log_directory()?;
    fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::never(&directory, &config.tracing.log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = FmtSubscriber::builder()
        .compact()
        .with_line_number(true)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_new(&config.tracing.level)?)
        .with_writer(non_blocking)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!(directory = %directory.display(), "tracing initialized");
    Ok(guard)
}
