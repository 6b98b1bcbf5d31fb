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

//! # Lane Abstraction
//!
//! The unified base trait for all collision processing strategies.
//!
//! A **Lane** is a swappable processing strategy owned by an agent. Each
//! detection tier (scalar, batch, SIMD) is a lane; the agent picks one per
//! run based on configuration and on what the host CPU supports.
//!
//! ## Architecture
//!
//! 1. **`Lane`** (this trait): identity, classification and cost estimation.
//! 2. **Domain traits** extend `Lane` with the actual work:
//!    - `StaticDetectionLane: Lane`: character versus wall box tests
//!    - `DynamicDetectionLane: Lane`: character versus character circle tests
//!    - `ResolveLane: Lane`: push-apart and wall clamping
//!
//! ## Usage
//!
//! ```rust,ignore
//! use horde_core::lane::{Lane, LaneKind, Workload};
//!
//! struct MyStaticLane;
//!
//! impl Lane for MyStaticLane {
//!     fn strategy_name(&self) -> &'static str { "MyStatic" }
//!     fn lane_kind(&self) -> LaneKind { LaneKind::StaticDetection }
//!     fn estimate_cost(&self, workload: &Workload) -> f32 {
//!         workload.static_pairs() as f32
//!     }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//! }
//! ```

use std::any::Any;
use std::fmt;

use crate::config::DetectionTier;

/// Error type for lane operations.
#[derive(Debug)]
pub enum LaneError {
    /// The layout handed to the lane was built for another tier.
    InvalidContext {
        /// What the lane expected.
        expected: &'static str,
        /// Description of what was received.
        received: String,
    },
    /// A collision matrix does not match the dimensions of the layout.
    ShapeMismatch {
        /// The dimensions the layout describes.
        expected: (usize, usize),
        /// The dimensions of the matrix that was provided.
        found: (usize, usize),
    },
    /// A domain-specific error occurred during execution.
    ExecutionFailed(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for LaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneError::InvalidContext { expected, received } => {
                write!(
                    f,
                    "Invalid lane context: expected {expected}, got {received}"
                )
            }
            LaneError::ShapeMismatch { expected, found } => write!(
                f,
                "Collision matrix shape mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            LaneError::ExecutionFailed(e) => write!(f, "Lane execution failed: {e}"),
        }
    }
}

impl std::error::Error for LaneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaneError::ExecutionFailed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl LaneError {
    /// Convenience constructor for a layout of the wrong tier.
    pub fn wrong_layout(expected: &'static str, received: impl Into<String>) -> Self {
        LaneError::InvalidContext {
            expected,
            received: received.into(),
        }
    }
}

/// Classification of lane types, used for routing and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Character versus wall detection.
    StaticDetection,
    /// Character versus character detection.
    DynamicDetection,
    /// Movement correction from detection results.
    Resolve,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::StaticDetection => write!(f, "StaticDetection"),
            LaneKind::DynamicDetection => write!(f, "DynamicDetection"),
            LaneKind::Resolve => write!(f, "Resolve"),
        }
    }
}

/// The size of one frame's detection problem, used for cost estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Workload {
    /// Number of live characters.
    pub characters: usize,
    /// Number of walls.
    pub walls: usize,
}

impl Workload {
    /// Creates a new workload description.
    pub fn new(characters: usize, walls: usize) -> Self {
        Self { characters, walls }
    }

    /// Number of character/wall box tests.
    pub fn static_pairs(&self) -> usize {
        self.characters * self.walls
    }

    /// Number of character/character circle tests (upper triangle).
    pub fn dynamic_pairs(&self) -> usize {
        self.characters * self.characters.saturating_sub(1) / 2
    }
}

/// The common interface shared by every lane.
pub trait Lane: Send + Sync {
    /// Human-readable name of this strategy, e.g. `"ScalarStatic"`.
    fn strategy_name(&self) -> &'static str;

    /// The kind of work this lane performs.
    fn lane_kind(&self) -> LaneKind;

    /// The detection tier this lane implements, if it is a detector.
    fn tier(&self) -> Option<DetectionTier> {
        None
    }

    /// Relative cost estimate of running this lane on `workload`.
    ///
    /// Units are arbitrary but comparable between lanes of the same kind.
    fn estimate_cost(&self, workload: &Workload) -> f32;

    /// Returns `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_pairs() {
        let workload = Workload::new(5, 3);
        assert_eq!(workload.static_pairs(), 15);
        assert_eq!(workload.dynamic_pairs(), 10);
        assert_eq!(Workload::new(0, 3).dynamic_pairs(), 0);
        assert_eq!(Workload::new(1, 3).dynamic_pairs(), 0);
    }

    #[test]
    fn test_lane_error_display() {
        let err = LaneError::wrong_layout("PlanarLayout", "ScalarLayout");
        assert_eq!(
            err.to_string(),
            "Invalid lane context: expected PlanarLayout, got ScalarLayout"
        );

        let err = LaneError::ShapeMismatch {
            expected: (3, 2),
            found: (3, 1),
        };
        assert!(err.to_string().contains("3x2"));
    }

    #[test]
    fn test_lane_kind_display() {
        assert_eq!(LaneKind::StaticDetection.to_string(), "StaticDetection");
        assert_eq!(LaneKind::Resolve.to_string(), "Resolve");
    }
}
