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

//! A minimal stopwatch for phase timing.

use std::time::{Duration, Instant};

/// Measures wall-clock time from its creation or last restart.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Option<Instant>,
}

impl Stopwatch {
    /// Creates a running stopwatch.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
        }
    }

    /// Restarts the stopwatch and returns the time elapsed before the restart.
    #[inline]
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = self
            .start_time
            .map(|start| now.duration_since(start))
            .unwrap_or_default();
        self.start_time = Some(now);
        elapsed
    }

    /// Returns the elapsed time since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|start| start.elapsed())
    }

    /// Elapsed time in microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> Option<u64> {
        self.elapsed().map(|d| d.as_micros() as u64)
    }

    /// Elapsed time in milliseconds, fractional.
    #[inline]
    pub fn elapsed_ms_f64(&self) -> Option<f64> {
        self.elapsed().map(|d| d.as_secs_f64() * 1000.0)
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
    use std::thread;

    const SLEEP_DURATION_MS: u64 = 20;

    #[test]
    fn test_stopwatch_starts_running() {
        let watch = Stopwatch::new();
        assert!(watch.elapsed().is_some());
        assert!(watch.elapsed_us().is_some());
        assert!(watch.elapsed_ms_f64().is_some());
    }

    #[test]
    fn test_stopwatch_measures_sleep() {
        let watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        let elapsed_ms = watch.elapsed_ms_f64().expect("running stopwatch");
        assert!(
            elapsed_ms >= SLEEP_DURATION_MS as f64,
            "Elapsed ms ({elapsed_ms}) should be >= {SLEEP_DURATION_MS}"
        );
    }

    #[test]
    fn test_lap_restarts() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        let first = watch.lap();
        assert!(first >= Duration::from_millis(SLEEP_DURATION_MS));
        let after = watch.elapsed().expect("running stopwatch");
        assert!(after < first);
    }
}
