// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wall-clock measurement.

use std::time::{Duration, Instant};

/// A started-on-creation stopwatch.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch that starts immediately.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time elapsed since creation, in seconds.
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Time elapsed since creation, in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let watch = Stopwatch::new();
        let first = watch.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        let second = watch.elapsed();
        assert!(second >= first);
        assert!(watch.elapsed_ms() >= 2);
        assert!(watch.elapsed_secs_f64() >= 0.002);
    }
}
