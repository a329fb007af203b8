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

/// Sensor reading used by most tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor: String,
    pub value: i64,
}

impl Reading {
    pub fn new(sensor: &str, value: i64) -> Self {
        Self {
            sensor: sensor.to_string(),
            value,
        }
    }
}

/// A command; never confused with a `Reading`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command(pub String);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ping;

/// Stress payload identifying its producer and sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tick {
    pub producer: usize,
    pub sequence: usize,
    pub checksum: usize,
}

impl Tick {
    pub fn new(producer: usize, sequence: usize) -> Self {
        Self {
            producer,
            sequence,
            checksum: producer.wrapping_mul(31).wrapping_add(sequence),
        }
    }

    pub fn is_intact(&self) -> bool {
        self.checksum == self.producer.wrapping_mul(31).wrapping_add(self.sequence)
    }
}

/// Second stress payload type, so producers publish more than one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tock(pub Tick);
