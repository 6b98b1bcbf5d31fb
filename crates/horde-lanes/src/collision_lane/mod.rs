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

//! Collision detection lanes.
//!
//! Two detectors, three tiers each. All tiers of a detector produce the same
//! matrix bit for bit; the scalar tier is the reference the others are tested
//! against.

mod dynamic_detection;
mod simd;
mod static_detection;

pub use dynamic_detection::*;
pub use static_detection::*;

use horde_core::lane::{Lane, LaneError};
use horde_data::{DynamicCollisionMatrix, FrameLayout, LayoutKind, StaticCollisionMatrix};

/// A character versus wall detection strategy.
pub trait StaticDetectionLane: Lane {
    /// The layout this lane reads.
    fn layout_kind(&self) -> LayoutKind;

    /// Fills `out` with the box overlap of every character against every wall.
    ///
    /// `out` must already be reset to the layout's `characters x walls`.
    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut StaticCollisionMatrix,
    ) -> Result<(), LaneError>;
}

/// A character versus character detection strategy.
pub trait DynamicDetectionLane: Lane {
    /// The layout this lane reads.
    fn layout_kind(&self) -> LayoutKind;

    /// Fills the upper triangle of `out` with the circle overlap of every pair.
    ///
    /// `out` must already be reset to the layout's character count.
    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut DynamicCollisionMatrix,
    ) -> Result<(), LaneError>;
}

fn check_static_shape(
    layout: &FrameLayout<'_>,
    out: &StaticCollisionMatrix,
) -> Result<(), LaneError> {
    let expected = (layout.character_count(), layout.wall_count());
    let found = out.dimensions();
    if expected == found {
        Ok(())
    } else {
        Err(LaneError::ShapeMismatch { expected, found })
    }
}

fn check_dynamic_shape(
    layout: &FrameLayout<'_>,
    out: &DynamicCollisionMatrix,
) -> Result<(), LaneError> {
    let n = layout.character_count();
    if n == out.len() {
        Ok(())
    } else {
        Err(LaneError::ShapeMismatch {
            expected: (n, n),
            found: (out.len(), out.len()),
        })
    }
}
