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

//! # Horde Telemetry
//!
//! Metrics storage and per-phase frame timing for the collision engine.
//!
//! - [`MetricsRegistry`] registers counters, gauges and histograms on a
//!   pluggable [`MetricsBackend`](storage::backend::MetricsBackend) and hands
//!   out cheap handles to update them.
//! - [`PhaseTimings`] averages the duration of each frame phase and drops the
//!   start-up frames from the detection averages.
//! - [`init_logging`] installs `env_logger` with a default filter.

#![warn(missing_docs)]

pub mod metrics;
pub mod storage;
pub mod timings;
pub mod utils;

pub use metrics::registry::{CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry};
pub use timings::{FrameTimes, Phase, PhaseTimings, TimingSummary};
pub use utils::timer::ScopedMetricTimer;

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more than
/// once is harmless; later calls return the "logger already set" error.
pub fn init_logging(default_filter: &str) -> Result<(), log::SetLoggerError> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
}
