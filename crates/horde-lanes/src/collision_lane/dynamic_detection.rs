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

//! Character versus character detectors.
//!
//! Only pairs `i < j` are tested. Each tier receives row `i` as the slice of
//! cells right of the diagonal, so no tier can write `[j][i]`.

use horde_core::config::DetectionTier;
use horde_core::lane::{Lane, LaneError, LaneKind, Workload};
use horde_core::platform::SimdCapability;
use horde_data::layout::CircleArrays;
use horde_data::{DynamicCollisionMatrix, FrameLayout, LayoutKind};

use super::{check_dynamic_shape, simd, DynamicDetectionLane};

/// Reference tier: `Circle::intersects` for every `j > i`.
#[derive(Debug, Default)]
pub struct ScalarDynamicLane;

impl ScalarDynamicLane {
    /// Creates a new `ScalarDynamicLane`.
    pub fn new() -> Self {
        Self
    }
}

impl Lane for ScalarDynamicLane {
    fn strategy_name(&self) -> &'static str {
        "ScalarDynamic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::DynamicDetection
    }

    fn tier(&self) -> Option<DetectionTier> {
        Some(DetectionTier::Scalar)
    }

    fn estimate_cost(&self, workload: &Workload) -> f32 {
        workload.dynamic_pairs() as f32
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl DynamicDetectionLane for ScalarDynamicLane {
    fn layout_kind(&self) -> LayoutKind {
        LayoutKind::Scalar
    }

    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut DynamicCollisionMatrix,
    ) -> Result<(), LaneError> {
        let FrameLayout::Scalar(scalar) = layout else {
            return Err(LaneError::wrong_layout("ScalarLayout", layout.name()));
        };
        check_dynamic_shape(layout, out)?;

        let circles = &scalar.circles;
        for (i, circle) in circles.iter().enumerate() {
            let row = out.upper_row_mut(i);
            for (hit, other) in row.iter_mut().zip(&circles[i + 1..]) {
                *hit = circle.intersects(other);
            }
        }
        Ok(())
    }
}

/// Flat `x`, `y`, `radius` arrays, written so the inner loop auto-vectorizes.
#[derive(Debug, Default)]
pub struct BatchDynamicLane;

impl BatchDynamicLane {
    /// Creates a new `BatchDynamicLane`.
    pub fn new() -> Self {
        Self
    }
}

impl Lane for BatchDynamicLane {
    fn strategy_name(&self) -> &'static str {
        "BatchDynamic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::DynamicDetection
    }

    fn tier(&self) -> Option<DetectionTier> {
        Some(DetectionTier::Batch)
    }

    fn estimate_cost(&self, workload: &Workload) -> f32 {
        workload.dynamic_pairs() as f32 * 0.5
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl DynamicDetectionLane for BatchDynamicLane {
    fn layout_kind(&self) -> LayoutKind {
        LayoutKind::Batch
    }

    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut DynamicCollisionMatrix,
    ) -> Result<(), LaneError> {
        let FrameLayout::Batch(batch) = layout else {
            return Err(LaneError::wrong_layout("BatchLayout", layout.name()));
        };
        check_dynamic_shape(layout, out)?;

        for i in 0..batch.circles.len() {
            circle_row(&batch.circles, i, out.upper_row_mut(i), 0);
        }
        Ok(())
    }
}

/// Fills `row[from..]` of character `i`, where `row[k]` is the pair `(i, i + 1 + k)`.
///
/// Arithmetic matches `Circle::intersects` operation for operation.
pub(super) fn circle_row(circles: &CircleArrays, i: usize, row: &mut [bool], from: usize) {
    let (xi, yi, ri) = (circles.xs[i], circles.ys[i], circles.radii[i]);
    let first = i + 1 + from;
    let xs = &circles.xs[first..];
    let ys = &circles.ys[first..];
    let radii = &circles.radii[first..];

    for (((hit, &x), &y), &r) in row[from..].iter_mut().zip(xs).zip(ys).zip(radii) {
        let dx = x - xi;
        let dy = y - yi;
        let reach = ri + r;
        *hit = dx * dx + dy * dy < reach * reach;
    }
}

/// Explicit 4-lane vector kernels over the flat circle arrays.
///
/// Neighbours `j > i` are consumed 8 at a time, then 4 at a time. The last
/// one to three neighbours are read through the window `[count - 4, count)`
/// and only the cells still missing are written. Without a supported vector
/// unit the lane falls back to the batch loop.
#[derive(Debug)]
pub struct SimdDynamicLane {
    capability: SimdCapability,
}

impl SimdDynamicLane {
    /// Creates a lane for the given, already detected, capability.
    pub fn new(capability: SimdCapability) -> Self {
        if !capability.is_supported() {
            log::debug!("SimdDynamicLane: no vector unit, kernels fall back to the portable path");
        }
        Self { capability }
    }

    /// The capability this lane dispatches on.
    pub fn capability(&self) -> SimdCapability {
        self.capability
    }
}

impl Default for SimdDynamicLane {
    fn default() -> Self {
        Self::new(SimdCapability::detect())
    }
}

impl Lane for SimdDynamicLane {
    fn strategy_name(&self) -> &'static str {
        "SimdDynamic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::DynamicDetection
    }

    fn tier(&self) -> Option<DetectionTier> {
        Some(DetectionTier::Simd)
    }

    fn estimate_cost(&self, workload: &Workload) -> f32 {
        let pairs = workload.dynamic_pairs() as f32;
        if self.capability.is_supported() {
            pairs * 0.25
        } else {
            pairs
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl DynamicDetectionLane for SimdDynamicLane {
    fn layout_kind(&self) -> LayoutKind {
        LayoutKind::Planar
    }

    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut DynamicCollisionMatrix,
    ) -> Result<(), LaneError> {
        let FrameLayout::Planar(planar) = layout else {
            return Err(LaneError::wrong_layout("PlanarLayout", layout.name()));
        };
        check_dynamic_shape(layout, out)?;

        simd::detect_dynamic(self.capability, &planar.circles, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::math::Vec2;
    use horde_data::{Character, LayoutBuilder};

    fn run(lane: &dyn DynamicDetectionLane, characters: &[Character]) -> DynamicCollisionMatrix {
        let mut builder = LayoutBuilder::default();
        let layout = builder.build(characters, &[], lane.layout_kind());
        let mut out = DynamicCollisionMatrix::default();
        out.reset(characters.len());
        lane.detect(&layout, &mut out).expect("detect");
        out
    }

    fn row_of(count: usize) -> Vec<Character> {
        (0..count)
            .map(|i| Character::new(Vec2::new(i as f32 * 0.9, 0.0), 0.5))
            .collect()
    }

    #[test]
    fn test_scalar_dynamic_neighbours_only() {
        // Spacing 0.9 with radius 0.5: only adjacent characters overlap.
        let out = run(&ScalarDynamicLane::new(), &row_of(4));
        assert!(out.get(0, 1));
        assert!(out.get(1, 2));
        assert!(out.get(2, 3));
        assert!(!out.get(0, 2));
        assert!(!out.get(1, 3));
        assert_eq!(out.count(), 3);
    }

    #[test]
    fn test_tiers_agree_on_tail_counts() {
        for count in [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 12, 13, 17] {
            let characters = row_of(count);
            let reference = run(&ScalarDynamicLane::new(), &characters);
            let lanes: [Box<dyn DynamicDetectionLane>; 3] = [
                Box::new(BatchDynamicLane::new()),
                Box::new(SimdDynamicLane::new(SimdCapability::detect())),
                Box::new(SimdDynamicLane::new(SimdCapability::Unsupported)),
            ];
            for lane in &lanes {
                let out = run(lane.as_ref(), &characters);
                assert_eq!(
                    out.as_slice(),
                    reference.as_slice(),
                    "{} disagrees for {count} characters",
                    lane.strategy_name()
                );
            }
        }
    }

    #[test]
    fn test_everyone_overlapping_fills_upper_triangle_only() {
        let characters: Vec<_> = (0..11)
            .map(|_| Character::new(Vec2::new(1.0, 1.0), 0.5))
            .collect();
        let out = run(&SimdDynamicLane::default(), &characters);
        for i in 0..11 {
            for j in 0..11 {
                assert_eq!(out.as_slice()[i * 11 + j], i < j, "[{i}][{j}]");
            }
        }
    }

    #[test]
    fn test_circle_row_from_offset() {
        let characters = row_of(6);
        let mut builder = LayoutBuilder::default();
        let FrameLayout::Batch(batch) = builder.build(&characters, &[], LayoutKind::Batch) else {
            panic!("expected batch layout");
        };
        let mut row = vec![false; 5];
        circle_row(&batch.circles, 0, &mut row, 0);
        assert_eq!(row, vec![true, false, false, false, false]);

        let mut row = vec![true; 4];
        circle_row(&batch.circles, 1, &mut row, 2);
        // Cells before `from` are left alone.
        assert_eq!(row, vec![true, true, false, false]);
    }
}
