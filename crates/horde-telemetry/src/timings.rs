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

//! Averaged per-phase frame timings.
//!
//! Detection timings only become meaningful once the crowd is large, so the
//! static and dynamic averages restart once, at the end of the warm-up window.
//! Setup and resolve keep averaging over every frame.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One timed phase of a collision frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Layout building.
    Setup,
    /// Character versus wall detection.
    Static,
    /// Character versus character detection.
    Dynamic,
    /// Push-apart and wall clamping.
    Resolve,
}

impl Phase {
    /// Every phase, in frame order.
    pub const ALL: [Phase; 4] = [Phase::Setup, Phase::Static, Phase::Dynamic, Phase::Resolve];

    fn index(self) -> usize {
        self as usize
    }

    fn restarts_after_warmup(self) -> bool {
        matches!(self, Phase::Static | Phase::Dynamic)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::Static => write!(f, "static"),
            Phase::Dynamic => write!(f, "dynamic"),
            Phase::Resolve => write!(f, "resolve"),
        }
    }
}

/// The measured duration of each phase of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTimes {
    /// Layout building.
    pub setup: Duration,
    /// Static detection.
    pub static_detection: Duration,
    /// Dynamic detection.
    pub dynamic_detection: Duration,
    /// Resolution.
    pub resolve: Duration,
}

impl FrameTimes {
    /// Duration of `phase`.
    pub fn get(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Setup => self.setup,
            Phase::Static => self.static_detection,
            Phase::Dynamic => self.dynamic_detection,
            Phase::Resolve => self.resolve,
        }
    }

    /// Sum of every phase.
    pub fn total(&self) -> Duration {
        Phase::ALL.iter().map(|&phase| self.get(phase)).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    total_ms: f64,
    samples: u64,
}

impl Accumulator {
    fn average_ms(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.total_ms / self.samples as f64
        }
    }
}

/// Running per-phase averages over the frames seen so far.
#[derive(Debug, Clone)]
pub struct PhaseTimings {
    warmup_frames: u64,
    frames: u64,
    phases: [Accumulator; 4],
}

impl PhaseTimings {
    /// Creates an empty accumulator whose detection averages restart at
    /// frame `warmup_frames`.
    pub fn new(warmup_frames: u64) -> Self {
        Self {
            warmup_frames,
            frames: 0,
            phases: [Accumulator::default(); 4],
        }
    }

    /// Adds one frame.
    pub fn record(&mut self, times: &FrameTimes) {
        self.frames += 1;
        if self.frames == self.warmup_frames {
            log::debug!(
                "Warm-up window of {} frames elapsed, restarting detection averages",
                self.warmup_frames
            );
            for phase in Phase::ALL.into_iter().filter(|p| p.restarts_after_warmup()) {
                self.phases[phase.index()] = Accumulator::default();
            }
        }

        for phase in Phase::ALL {
            let accumulator = &mut self.phases[phase.index()];
            accumulator.total_ms += times.get(phase).as_secs_f64() * 1000.0;
            accumulator.samples += 1;
        }
    }

    /// Average milliseconds spent in `phase`.
    pub fn average_ms(&self, phase: Phase) -> f64 {
        self.phases[phase.index()].average_ms()
    }

    /// Number of frames recorded.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether the detection averages only cover post-warm-up frames.
    pub fn is_warmed_up(&self) -> bool {
        self.frames >= self.warmup_frames
    }

    /// A serializable snapshot of the current averages.
    pub fn summary(&self) -> TimingSummary {
        TimingSummary {
            frames: self.frames,
            warmed_up: self.is_warmed_up(),
            setup_ms: self.average_ms(Phase::Setup),
            static_ms: self.average_ms(Phase::Static),
            dynamic_ms: self.average_ms(Phase::Dynamic),
            resolve_ms: self.average_ms(Phase::Resolve),
        }
    }
}

/// Per-phase averages at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingSummary {
    /// Frames recorded so far.
    pub frames: u64,
    /// Whether the warm-up window has elapsed.
    pub warmed_up: bool,
    /// Average layout time.
    pub setup_ms: f64,
    /// Average static detection time.
    pub static_ms: f64,
    /// Average dynamic detection time.
    pub dynamic_ms: f64,
    /// Average resolve time.
    pub resolve_ms: f64,
}

impl TimingSummary {
    /// Renders the summary as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for TimingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames {} | setup {:.3} ms | static {:.3} ms | dynamic {:.3} ms | resolve {:.3} ms",
            self.frames, self.setup_ms, self.static_ms, self.dynamic_ms, self.resolve_ms
        )?;
        if !self.warmed_up {
            write!(f, " (warming up)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(ms: u64) -> FrameTimes {
        let d = Duration::from_millis(ms);
        FrameTimes {
            setup: d,
            static_detection: d,
            dynamic_detection: d,
            resolve: d,
        }
    }

    #[test]
    fn test_averages_before_warmup() {
        let mut timings = PhaseTimings::new(10);
        timings.record(&frame(2));
        timings.record(&frame(4));

        assert_eq!(timings.frames(), 2);
        assert!(!timings.is_warmed_up());
        for phase in Phase::ALL {
            assert_relative_eq!(timings.average_ms(phase), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_detection_restarts_at_warmup() {
        let mut timings = PhaseTimings::new(3);
        timings.record(&frame(10));
        timings.record(&frame(10));
        // Frame 3 is the first one of the new window.
        timings.record(&frame(1));
        timings.record(&frame(3));

        assert!(timings.is_warmed_up());
        assert_relative_eq!(timings.average_ms(Phase::Static), 2.0, epsilon = 1e-9);
        assert_relative_eq!(timings.average_ms(Phase::Dynamic), 2.0, epsilon = 1e-9);
        assert_relative_eq!(timings.average_ms(Phase::Setup), 6.0, epsilon = 1e-9);
        assert_relative_eq!(timings.average_ms(Phase::Resolve), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_averages_are_zero() {
        let timings = PhaseTimings::new(5);
        assert_eq!(timings.average_ms(Phase::Resolve), 0.0);
        assert_eq!(timings.summary().frames, 0);
    }

    #[test]
    fn test_summary_display_and_json() {
        let mut timings = PhaseTimings::new(1);
        timings.record(&frame(1));
        let summary = timings.summary();

        assert!(summary.to_string().starts_with("frames 1 | setup 1.000 ms"));
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["frames"], 1);
        assert_eq!(json["warmed_up"], true);
    }

    #[test]
    fn test_frame_total() {
        assert_eq!(frame(2).total(), Duration::from_millis(8));
    }
}
