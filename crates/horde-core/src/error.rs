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

//! Top-level error type for the collision engine.

use thiserror::Error;

use crate::lane::LaneError;
use crate::telemetry::MetricsError;

/// A specialized `Result` type for engine-level operations.
pub type HordeResult<T> = Result<T, HordeError>;

/// Errors surfaced at the boundary of the collision engine.
///
/// Everything inside a frame pass is either an invariant enforced by
/// construction or a degenerate case handled locally; these variants cover
/// what callers can actually get wrong.
#[derive(Debug, Error)]
pub enum HordeError {
    /// More live characters were submitted than the configured capacity.
    #[error("{live} live characters exceed the configured capacity of {capacity}")]
    CapacityExceeded {
        /// Number of characters submitted this frame.
        live: usize,
        /// The configured maximum.
        capacity: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration could not be parsed.
    #[error("Failed to parse configuration")]
    Config(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// A lane failed while processing a frame.
    #[error("Lane '{lane}' failed")]
    Lane {
        /// Strategy name of the failing lane.
        lane: &'static str,
        /// The underlying lane error.
        #[source]
        source: LaneError,
    },

    /// No lane is registered for the requested role.
    #[error("No lane registered for {0}")]
    MissingLane(String),

    /// Registering or updating a metric failed.
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}
