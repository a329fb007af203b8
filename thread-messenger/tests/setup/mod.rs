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
use std::sync::{Arc, Once};

use parking_lot::Mutex;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use thread_messenger::prelude::*;
use thread_messenger::LogRecord;

pub mod messages;

// Ensures tracing initialization happens only once across all tests.
static INIT: Once = Once::new();

/// Initializes the global tracing subscriber for tests, writing to `logs/messenger_tests.txt`.
pub fn initialize_tracing() {
    INIT.call_once(|| {
        std::fs::create_dir_all("logs").expect("could not create logs dir");

        let file_appender =
            RollingFileAppender::new(Rotation::NEVER, "logs", "messenger_tests.txt");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Leak the guard so the non-blocking writer is not dropped before process exit
        Box::leak(Box::new(guard));

        let filter = EnvFilter::new("info")
            .add_directive("thread_messenger=trace".parse().unwrap())
            .add_directive("messenger_tests=trace".parse().unwrap())
            .add_directive("concurrency_tests=trace".parse().unwrap());

        let subscriber = FmtSubscriber::builder()
            .with_span_events(FmtSpan::NONE)
            .with_max_level(Level::TRACE)
            .compact()
            .with_line_number(true)
            .without_time()
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

/// A sink that keeps every rendered line, for asserting on the control log.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Snapshot of the lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Lines on the `err` sub-channel.
    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with("err - "))
            .collect()
    }

    /// Forgets everything written so far.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LogSink for RecordingSink {
    fn write(&self, record: &LogRecord<'_>) -> anyhow::Result<()> {
        self.lines.lock().push(record.to_string());
        Ok(())
    }
}

/// A messenger using default configuration and a `TracingSink`.
pub fn traced_messenger() -> MessengerPtr {
    initialize_tracing();
    Arc::new(Messenger::with_config(
        &MessengerConfig::default(),
        Arc::new(TracingSink),
    ))
}

/// A messenger without thread ids in its lines, plus the sink it writes to.
pub fn recorded_messenger() -> (MessengerPtr, Arc<RecordingSink>) {
    initialize_tracing();
    let sink = Arc::new(RecordingSink::default());
    let mut config = MessengerConfig::default();
    config.logging.display_thread_id = false;
    let messenger = Arc::new(Messenger::with_config(&config, sink.clone()));
    (messenger, sink)
}
