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

//! Character versus wall detectors.

use horde_core::config::DetectionTier;
use horde_core::lane::{Lane, LaneError, LaneKind, Workload};
use horde_core::platform::SimdCapability;
use horde_data::{BatchLayout, FrameLayout, LayoutKind, StaticCollisionMatrix};

use super::{check_static_shape, simd, StaticDetectionLane};

/// Reference tier: nested loops over [`Aabb`](horde_core::math::Aabb) values.
#[derive(Debug, Default)]
pub struct ScalarStaticLane;

impl ScalarStaticLane {
    /// Creates a new `ScalarStaticLane`.
    pub fn new() -> Self {
        Self
    }
}

impl Lane for ScalarStaticLane {
    fn strategy_name(&self) -> &'static str {
        "ScalarStatic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::StaticDetection
    }

    fn tier(&self) -> Option<DetectionTier> {
        Some(DetectionTier::Scalar)
    }

    fn estimate_cost(&self, workload: &Workload) -> f32 {
        workload.static_pairs() as f32
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl StaticDetectionLane for ScalarStaticLane {
    fn layout_kind(&self) -> LayoutKind {
        LayoutKind::Scalar
    }

    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut StaticCollisionMatrix,
    ) -> Result<(), LaneError> {
        let FrameLayout::Scalar(scalar) = layout else {
            return Err(LaneError::wrong_layout("ScalarLayout", layout.name()));
        };
        check_static_shape(layout, out)?;

        for (row, character) in out.rows_mut().zip(&scalar.character_boxes) {
            for (hit, wall) in row.iter_mut().zip(&scalar.wall_boxes) {
                *hit = character.intersects(wall);
            }
        }
        Ok(())
    }
}

/// Interleaved float records, written so the inner loop auto-vectorizes.
#[derive(Debug, Default)]
pub struct BatchStaticLane;

impl BatchStaticLane {
    /// Creates a new `BatchStaticLane`.
    pub fn new() -> Self {
        Self
    }
}

impl Lane for BatchStaticLane {
    fn strategy_name(&self) -> &'static str {
        "BatchStatic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::StaticDetection
    }

    fn tier(&self) -> Option<DetectionTier> {
        Some(DetectionTier::Batch)
    }

    fn estimate_cost(&self, workload: &Workload) -> f32 {
        workload.static_pairs() as f32 * 0.5
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl StaticDetectionLane for BatchStaticLane {
    fn layout_kind(&self) -> LayoutKind {
        LayoutKind::Batch
    }

    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut StaticCollisionMatrix,
    ) -> Result<(), LaneError> {
        let FrameLayout::Batch(batch) = layout else {
            return Err(LaneError::wrong_layout("BatchLayout", layout.name()));
        };
        check_static_shape(layout, out)?;

        let characters = batch.characters.chunks_exact(BatchLayout::STRIDE);
        for (row, character) in out.rows_mut().zip(characters) {
            // [maxX, maxY, minX, minY]
            let (max_x, max_y, min_x, min_y) =
                (character[0], character[1], character[2], character[3]);
            let walls = batch.walls.chunks_exact(BatchLayout::STRIDE);
            for (hit, wall) in row.iter_mut().zip(walls) {
                // [minX, minY, maxX, maxY]
                *hit = !(wall[0] > max_x || wall[1] > max_y || min_x > wall[2] || min_y > wall[3]);
            }
        }
        Ok(())
    }
}

/// Explicit 4-lane vector kernels over the planar layout.
///
/// Walls are consumed 8 at a time (two vectors), then 4 at a time; the last
/// one to three walls are covered by re-running the final 4-wall window.
/// When the host has no supported vector unit the lane runs the same
/// comparisons one wall at a time.
#[derive(Debug)]
pub struct SimdStaticLane {
    capability: SimdCapability,
}

impl SimdStaticLane {
    /// Creates a lane for the given, already detected, capability.
    pub fn new(capability: SimdCapability) -> Self {
        if !capability.is_supported() {
            log::debug!("SimdStaticLane: no vector unit, kernels fall back to the portable path");
        }
        Self { capability }
    }

    /// The capability this lane dispatches on.
    pub fn capability(&self) -> SimdCapability {
        self.capability
    }
}

impl Default for SimdStaticLane {
    fn default() -> Self {
        Self::new(SimdCapability::detect())
    }
}

impl Lane for SimdStaticLane {
    fn strategy_name(&self) -> &'static str {
        "SimdStatic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::StaticDetection
    }

    fn tier(&self) -> Option<DetectionTier> {
        Some(DetectionTier::Simd)
    }

    fn estimate_cost(&self, workload: &Workload) -> f32 {
        let pairs = workload.static_pairs() as f32;
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

impl StaticDetectionLane for SimdStaticLane {
    fn layout_kind(&self) -> LayoutKind {
        LayoutKind::Planar
    }

    fn detect(
        &self,
        layout: &FrameLayout<'_>,
        out: &mut StaticCollisionMatrix,
    ) -> Result<(), LaneError> {
        let FrameLayout::Planar(planar) = layout else {
            return Err(LaneError::wrong_layout("PlanarLayout", layout.name()));
        };
        check_static_shape(layout, out)?;

        simd::detect_static(self.capability, planar, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::math::Vec2;
    use horde_data::{Character, LayoutBuilder, Wall};

    fn scene() -> (Vec<Character>, Vec<Wall>) {
        let characters = vec![
            Character::new(Vec2::new(5.0, 5.0), 0.5),
            Character::new(Vec2::new(-3.0, 0.0), 0.5),
            Character::new(Vec2::new(10.5, 2.0), 0.5),
        ];
        let walls = vec![
            Wall::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)),
            Wall::new(Vec2::new(-4.0, -1.0), Vec2::new(-3.5, 1.0)),
        ];
        (characters, walls)
    }

    fn run(lane: &dyn StaticDetectionLane, characters: &[Character], walls: &[Wall]) -> Vec<bool> {
        let mut builder = LayoutBuilder::default();
        let layout = builder.build(characters, walls, lane.layout_kind());
        let mut out = StaticCollisionMatrix::default();
        out.reset(characters.len(), walls.len());
        lane.detect(&layout, &mut out).expect("detect");
        out.as_slice().to_vec()
    }

    #[test]
    fn test_scalar_static_expected_hits() {
        let (characters, walls) = scene();
        let hits = run(&ScalarStaticLane::new(), &characters, &walls);
        // Character 2 spans x in [10, 11] and touches the first wall's edge.
        assert_eq!(hits, vec![true, false, false, true, true, false]);
    }

    #[test]
    fn test_tiers_agree_on_small_scene() {
        let (characters, walls) = scene();
        let reference = run(&ScalarStaticLane::new(), &characters, &walls);
        assert_eq!(run(&BatchStaticLane::new(), &characters, &walls), reference);
        assert_eq!(
            run(&SimdStaticLane::new(SimdCapability::detect()), &characters, &walls),
            reference
        );
        assert_eq!(
            run(&SimdStaticLane::new(SimdCapability::Unsupported), &characters, &walls),
            reference
        );
    }

    #[test]
    fn test_wrong_layout_is_rejected() {
        let (characters, walls) = scene();
        let mut builder = LayoutBuilder::default();
        let layout = builder.build(&characters, &walls, LayoutKind::Scalar);
        let mut out = StaticCollisionMatrix::default();
        out.reset(characters.len(), walls.len());

        let err = SimdStaticLane::default().detect(&layout, &mut out).unwrap_err();
        assert!(matches!(err, LaneError::InvalidContext { expected: "PlanarLayout", .. }));
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let (characters, walls) = scene();
        let mut builder = LayoutBuilder::default();
        let layout = builder.build(&characters, &walls, LayoutKind::Batch);
        let mut out = StaticCollisionMatrix::default();
        out.reset(characters.len(), 1);

        let err = BatchStaticLane::new().detect(&layout, &mut out).unwrap_err();
        assert!(matches!(err, LaneError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_simd_cost_depends_on_capability() {
        let workload = Workload::new(100, 20);
        let supported = SimdStaticLane::new(SimdCapability::Sse2).estimate_cost(&workload);
        let fallback = SimdStaticLane::new(SimdCapability::Unsupported).estimate_cost(&workload);
        let batch = BatchStaticLane::new().estimate_cost(&workload);
        assert!(supported < batch);
        assert!(fallback > batch);
    }
}
