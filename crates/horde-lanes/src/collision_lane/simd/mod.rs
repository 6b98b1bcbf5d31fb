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

//! Explicit 4-lane kernels and their dispatch.
//!
//! The capability is detected once by the caller and passed in. A capability
//! that does not match the compilation target (for example `Neon` on x86-64)
//! takes the portable path.

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod sse2;

use horde_core::platform::SimdCapability;
use horde_data::layout::CircleArrays;
use horde_data::{DynamicCollisionMatrix, PlanarLayout, StaticCollisionMatrix};

use super::dynamic_detection::circle_row;

/// Fills `out` from the planar layout using the best kernel for `capability`.
pub(super) fn detect_static(
    capability: SimdCapability,
    layout: &PlanarLayout,
    out: &mut StaticCollisionMatrix,
) {
    match capability {
        #[cfg(target_arch = "x86_64")]
        SimdCapability::Sse2 => {
            // SAFETY: SSE2 is part of the x86_64 baseline.
            unsafe { sse2::detect_static(layout, out) }
        }
        #[cfg(target_arch = "aarch64")]
        SimdCapability::Neon => {
            // SAFETY: Advanced SIMD is part of the aarch64 baseline.
            unsafe { neon::detect_static(layout, out) }
        }
        _ => static_planar(layout, out),
    }
}

/// Fills the upper triangle of `out` using the best kernel for `capability`.
pub(super) fn detect_dynamic(
    capability: SimdCapability,
    circles: &CircleArrays,
    out: &mut DynamicCollisionMatrix,
) {
    match capability {
        #[cfg(target_arch = "x86_64")]
        SimdCapability::Sse2 => {
            // SAFETY: SSE2 is part of the x86_64 baseline.
            unsafe { sse2::detect_dynamic(circles, out) }
        }
        #[cfg(target_arch = "aarch64")]
        SimdCapability::Neon => {
            // SAFETY: Advanced SIMD is part of the aarch64 baseline.
            unsafe { neon::detect_dynamic(circles, out) }
        }
        _ => {
            for i in 0..circles.len() {
                circle_row(circles, i, out.upper_row_mut(i), 0);
            }
        }
    }
}

/// Portable pass over the planar layout, one wall at a time.
fn static_planar(layout: &PlanarLayout, out: &mut StaticCollisionMatrix) {
    let planes = layout.wall_planes();
    for (c, row) in out.rows_mut().enumerate() {
        let record = layout.character_record(c);
        for (w, hit) in row.iter_mut().enumerate() {
            *hit = !separated_at(&planes, &record, w);
        }
    }
}

/// `true` if any negated plane of wall `w` lies beyond the character record.
#[inline]
fn separated_at(planes: &[&[f32]; 4], record: &[f32; 4], w: usize) -> bool {
    planes[0][w] > record[0]
        || planes[1][w] > record[1]
        || planes[2][w] > record[2]
        || planes[3][w] > record[3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::math::Vec2;
    use horde_data::{Character, FrameLayout, LayoutBuilder, LayoutKind, Wall};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_scene(
        rng: &mut StdRng,
        characters: usize,
        walls: usize,
    ) -> (Vec<Character>, Vec<Wall>) {
        let characters = (0..characters)
            .map(|_| {
                let position = Vec2::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0));
                Character::new(position, rng.gen_range(0.25..1.5))
            })
            .collect();
        let walls = (0..walls)
            .map(|_| {
                let center = Vec2::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0));
                let half = Vec2::new(rng.gen_range(0.1..2.0), rng.gen_range(0.1..2.0));
                Wall::from_center(center, half)
            })
            .collect();
        (characters, walls)
    }

    fn planar(
        builder: &mut LayoutBuilder,
        characters: &[Character],
        walls: &[Wall],
    ) -> PlanarLayout {
        let FrameLayout::Planar(layout) = builder.build(characters, walls, LayoutKind::Planar)
        else {
            panic!("expected planar layout");
        };
        layout.clone()
    }

    #[test]
    fn test_static_kernel_matches_portable_path() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut builder = LayoutBuilder::default();
        for walls in 0..20 {
            let (characters, walls) = random_scene(&mut rng, 9, walls);
            let layout = planar(&mut builder, &characters, &walls);

            let mut expected = StaticCollisionMatrix::default();
            expected.reset(characters.len(), walls.len());
            static_planar(&layout, &mut expected);

            let mut actual = StaticCollisionMatrix::default();
            actual.reset(characters.len(), walls.len());
            detect_static(SimdCapability::detect(), &layout, &mut actual);

            assert_eq!(actual.as_slice(), expected.as_slice(), "{} walls", walls.len());
        }
    }

    #[test]
    fn test_dynamic_kernel_matches_portable_path() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut builder = LayoutBuilder::default();
        for count in 0..24 {
            let (characters, _) = random_scene(&mut rng, count, 0);
            let layout = planar(&mut builder, &characters, &[]);

            let mut expected = DynamicCollisionMatrix::default();
            expected.reset(count);
            detect_dynamic(SimdCapability::Unsupported, &layout.circles, &mut expected);

            let mut actual = DynamicCollisionMatrix::default();
            actual.reset(count);
            detect_dynamic(SimdCapability::detect(), &layout.circles, &mut actual);

            assert_eq!(actual.as_slice(), expected.as_slice(), "{count} characters");
        }
    }

    #[test]
    fn test_foreign_capability_takes_portable_path() {
        let characters = vec![Character::new(Vec2::ZERO, 0.5)];
        let walls = vec![Wall::new(Vec2::new(0.4, -1.0), Vec2::new(2.0, 1.0))];
        let mut builder = LayoutBuilder::default();
        let layout = planar(&mut builder, &characters, &walls);

        for capability in [
            SimdCapability::Sse2,
            SimdCapability::Neon,
            SimdCapability::Unsupported,
        ] {
            let mut out = StaticCollisionMatrix::default();
            out.reset(1, 1);
            detect_static(capability, &layout, &mut out);
            assert!(out.get(0, 0), "{capability}");
        }
    }
}
