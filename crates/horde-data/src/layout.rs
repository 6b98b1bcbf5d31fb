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

//! Per-frame data layouts for the detection tiers.
//!
//! Each tier wants the same geometry in a different shape:
//!
//! - **Scalar** reads one [`Circle`] and one [`Aabb`] per entity.
//! - **Batch** reads interleaved 4-float records. Walls are stored as
//!   `[minX, minY, maxX, maxY]` and character boxes as `[maxX, maxY, minX, minY]`,
//!   so every separating-axis test is a single `>` between fields.
//! - **Planar** (SIMD) stores each of those four fields as its own contiguous
//!   plane and negates the two "max" planes of walls and the two "min" planes
//!   of characters. After negation all four separating-axis tests become
//!   `wall_plane[k] > character_plane[k]`, so one vector comparison handles
//!   every plane uniformly.
//!
//! The dynamic (circle) tests of the batch and planar tiers read flat
//! `x`, `y` and `radius` arrays.
//!
//! Layouts are sized to the live counts of the frame. Buffers are cleared and
//! refilled every frame; their capacity is kept across frames.

use horde_core::math::{Aabb, Circle};

use crate::scene::{Character, Wall};

/// Which shape of layout to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Arrays of geometry structs.
    Scalar,
    /// Interleaved 4-float records plus flat circle arrays.
    Batch,
    /// Sign-negated planes plus flat circle arrays.
    Planar,
}

/// Struct-per-entity layout for the scalar tier.
#[derive(Debug, Default, Clone)]
pub struct ScalarLayout {
    /// One circle per character.
    pub circles: Vec<Circle>,
    /// One bounding box per character.
    pub character_boxes: Vec<Aabb>,
    /// One box per wall.
    pub wall_boxes: Vec<Aabb>,
}

impl ScalarLayout {
    fn rebuild(&mut self, characters: &[Character], walls: &[Wall]) {
        self.circles.clear();
        self.character_boxes.clear();
        self.wall_boxes.clear();

        self.circles.extend(characters.iter().map(Character::circle));
        self.character_boxes
            .extend(characters.iter().map(Character::bounds));
        self.wall_boxes.extend(walls.iter().map(|wall| wall.bounds));
    }

    /// Number of characters in the layout.
    pub fn character_count(&self) -> usize {
        self.circles.len()
    }

    /// Number of walls in the layout.
    pub fn wall_count(&self) -> usize {
        self.wall_boxes.len()
    }
}

/// Flat per-character circle data shared by the batch and planar layouts.
#[derive(Debug, Default, Clone)]
pub struct CircleArrays {
    /// Center x of every character.
    pub xs: Vec<f32>,
    /// Center y of every character.
    pub ys: Vec<f32>,
    /// Radius of every character.
    pub radii: Vec<f32>,
}

impl CircleArrays {
    fn rebuild(&mut self, characters: &[Character]) {
        self.xs.clear();
        self.ys.clear();
        self.radii.clear();
        for character in characters {
            self.xs.push(character.position.x);
            self.ys.push(character.position.y);
            self.radii.push(character.radius);
        }
    }

    fn reserve(&mut self, capacity: usize) {
        self.xs.reserve(capacity);
        self.ys.reserve(capacity);
        self.radii.reserve(capacity);
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns `true` if there are no characters.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Interleaved layout for the auto-vectorized batch tier.
#[derive(Debug, Default, Clone)]
pub struct BatchLayout {
    /// `[minX, minY, maxX, maxY]` per wall.
    pub walls: Vec<f32>,
    /// `[maxX, maxY, minX, minY]` per character.
    pub characters: Vec<f32>,
    /// Flat circle data.
    pub circles: CircleArrays,
}

impl BatchLayout {
    /// Floats per entity record.
    pub const STRIDE: usize = 4;

    fn rebuild(&mut self, characters: &[Character], walls: &[Wall]) {
        self.walls.clear();
        self.characters.clear();

        for wall in walls {
            let b = wall.bounds;
            self.walls.extend_from_slice(&[b.min.x, b.min.y, b.max.x, b.max.y]);
        }
        for character in characters {
            let b = character.bounds();
            self.characters
                .extend_from_slice(&[b.max.x, b.max.y, b.min.x, b.min.y]);
        }
        self.circles.rebuild(characters);
    }

    /// Number of characters in the layout.
    pub fn character_count(&self) -> usize {
        self.characters.len() / Self::STRIDE
    }

    /// Number of walls in the layout.
    pub fn wall_count(&self) -> usize {
        self.walls.len() / Self::STRIDE
    }
}

/// Planar, sign-negated layout for the explicit SIMD tier.
#[derive(Debug, Default, Clone)]
pub struct PlanarLayout {
    character_count: usize,
    wall_count: usize,
    /// `[minX..][minY..][-maxX..][-maxY..]`, one plane of `wall_count` floats each.
    pub walls: Vec<f32>,
    /// `[maxX..][maxY..][-minX..][-minY..]`, one plane of `character_count` floats each.
    pub characters: Vec<f32>,
    /// Flat circle data.
    pub circles: CircleArrays,
}

impl PlanarLayout {
    /// Number of planes per entity group.
    pub const PLANES: usize = 4;

    fn rebuild(&mut self, characters: &[Character], walls: &[Wall]) {
        let n = walls.len();
        self.wall_count = n;
        self.walls.clear();
        self.walls.resize(n * Self::PLANES, 0.0);
        for (w, wall) in walls.iter().enumerate() {
            let b = wall.bounds;
            self.walls[w] = b.min.x;
            self.walls[n + w] = b.min.y;
            self.walls[2 * n + w] = -b.max.x;
            self.walls[3 * n + w] = -b.max.y;
        }

        let m = characters.len();
        self.character_count = m;
        self.characters.clear();
        self.characters.resize(m * Self::PLANES, 0.0);
        for (c, character) in characters.iter().enumerate() {
            let b = character.bounds();
            self.characters[c] = b.max.x;
            self.characters[m + c] = b.max.y;
            self.characters[2 * m + c] = -b.min.x;
            self.characters[3 * m + c] = -b.min.y;
        }

        self.circles.rebuild(characters);
    }

    /// Number of characters in the layout.
    pub fn character_count(&self) -> usize {
        self.character_count
    }

    /// Number of walls in the layout.
    pub fn wall_count(&self) -> usize {
        self.wall_count
    }

    /// The four wall planes, each `wall_count` long.
    pub fn wall_planes(&self) -> [&[f32]; 4] {
        planes(&self.walls, self.wall_count)
    }

    /// The four character planes, each `character_count` long.
    pub fn character_planes(&self) -> [&[f32]; 4] {
        planes(&self.characters, self.character_count)
    }

    /// The four plane values of character `c`, in plane order.
    pub fn character_record(&self, c: usize) -> [f32; 4] {
        let [a, b, d, e] = self.character_planes();
        [a[c], b[c], d[c], e[c]]
    }
}

fn planes(data: &[f32], n: usize) -> [&[f32]; 4] {
    let (p0, rest) = data.split_at(n);
    let (p1, rest) = rest.split_at(n);
    let (p2, p3) = rest.split_at(n);
    [p0, p1, p2, p3]
}

/// A borrowed view of the layout built for the current frame.
#[derive(Debug, Clone, Copy)]
pub enum FrameLayout<'a> {
    /// Scalar tier layout.
    Scalar(&'a ScalarLayout),
    /// Batch tier layout.
    Batch(&'a BatchLayout),
    /// SIMD tier layout.
    Planar(&'a PlanarLayout),
}

impl FrameLayout<'_> {
    /// The kind of layout this view holds.
    pub fn kind(&self) -> LayoutKind {
        match self {
            FrameLayout::Scalar(_) => LayoutKind::Scalar,
            FrameLayout::Batch(_) => LayoutKind::Batch,
            FrameLayout::Planar(_) => LayoutKind::Planar,
        }
    }

    /// Type name of the held layout, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FrameLayout::Scalar(_) => "ScalarLayout",
            FrameLayout::Batch(_) => "BatchLayout",
            FrameLayout::Planar(_) => "PlanarLayout",
        }
    }

    /// Number of characters in the layout.
    pub fn character_count(&self) -> usize {
        match self {
            FrameLayout::Scalar(l) => l.character_count(),
            FrameLayout::Batch(l) => l.character_count(),
            FrameLayout::Planar(l) => l.character_count(),
        }
    }

    /// Number of walls in the layout.
    pub fn wall_count(&self) -> usize {
        match self {
            FrameLayout::Scalar(l) => l.wall_count(),
            FrameLayout::Batch(l) => l.wall_count(),
            FrameLayout::Planar(l) => l.wall_count(),
        }
    }
}

/// Builds per-frame layouts into pooled buffers.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    scalar: ScalarLayout,
    batch: BatchLayout,
    planar: PlanarLayout,
}

impl LayoutBuilder {
    /// Creates a builder whose buffers are reserved for `max_characters`
    /// characters and `wall_count` walls, so steady-state frames do not
    /// allocate.
    pub fn with_capacity(max_characters: usize, wall_count: usize) -> Self {
        let mut builder = Self::default();

        builder.scalar.circles.reserve(max_characters);
        builder.scalar.character_boxes.reserve(max_characters);
        builder.scalar.wall_boxes.reserve(wall_count);

        builder.batch.walls.reserve(wall_count * BatchLayout::STRIDE);
        builder
            .batch
            .characters
            .reserve(max_characters * BatchLayout::STRIDE);
        builder.batch.circles.reserve(max_characters);

        builder.planar.walls.reserve(wall_count * PlanarLayout::PLANES);
        builder
            .planar
            .characters
            .reserve(max_characters * PlanarLayout::PLANES);
        builder.planar.circles.reserve(max_characters);

        builder
    }

    /// Rebuilds the layout of `kind` from scratch and returns a view of it.
    pub fn build(
        &mut self,
        characters: &[Character],
        walls: &[Wall],
        kind: LayoutKind,
    ) -> FrameLayout<'_> {
        match kind {
            LayoutKind::Scalar => {
                self.scalar.rebuild(characters, walls);
                FrameLayout::Scalar(&self.scalar)
            }
            LayoutKind::Batch => {
                self.batch.rebuild(characters, walls);
                FrameLayout::Batch(&self.batch)
            }
            LayoutKind::Planar => {
                self.planar.rebuild(characters, walls);
                FrameLayout::Planar(&self.planar)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::math::Vec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample_scene() -> (Vec<Character>, Vec<Wall>) {
        let characters = vec![
            Character::new(Vec2::new(1.0, 2.0), 0.5),
            Character::new(Vec2::new(-3.0, 4.0), 1.0).with_half_extent(Vec2::new(0.25, 2.0)),
            Character::new(Vec2::new(0.0, 0.0), 0.75),
        ];
        let walls = vec![
            Wall::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 1.0)),
            Wall::new(Vec2::new(-5.0, -5.0), Vec2::new(-4.0, 5.0)),
        ];
        (characters, walls)
    }

    #[test]
    fn test_scalar_layout_mirrors_entities() {
        let (characters, walls) = sample_scene();
        let mut builder = LayoutBuilder::default();
        let FrameLayout::Scalar(layout) = builder.build(&characters, &walls, LayoutKind::Scalar)
        else {
            panic!("expected scalar layout");
        };
        assert_eq!(layout.character_count(), 3);
        assert_eq!(layout.wall_count(), 2);
        assert_eq!(layout.circles[1], Circle::new(Vec2::new(-3.0, 4.0), 1.0));
        assert_eq!(layout.character_boxes[1], characters[1].bounds());
        assert_eq!(layout.wall_boxes[0], walls[0].bounds);
    }

    #[test]
    fn test_batch_layout_field_order() {
        let (characters, walls) = sample_scene();
        let mut builder = LayoutBuilder::default();
        let FrameLayout::Batch(layout) = builder.build(&characters, &walls, LayoutKind::Batch)
        else {
            panic!("expected batch layout");
        };
        assert_eq!(&layout.walls[0..4], &[0.0, 0.0, 10.0, 1.0]);
        assert_eq!(&layout.walls[4..8], &[-5.0, -5.0, -4.0, 5.0]);
        // Character 1: center (-3, 4), half extents (0.25, 2).
        assert_eq!(&layout.characters[4..8], &[-2.75, 6.0, -3.25, 2.0]);
        assert_eq!(layout.circles.xs, vec![1.0, -3.0, 0.0]);
        assert_eq!(layout.circles.radii, vec![0.5, 1.0, 0.75]);
    }

    #[test]
    fn test_planar_layout_is_negated_and_pivoted() {
        let (characters, walls) = sample_scene();
        let mut builder = LayoutBuilder::default();
        let FrameLayout::Planar(layout) = builder.build(&characters, &walls, LayoutKind::Planar)
        else {
            panic!("expected planar layout");
        };

        let [min_x, min_y, neg_max_x, neg_max_y] = layout.wall_planes();
        assert_eq!(min_x, &[0.0, -5.0]);
        assert_eq!(min_y, &[0.0, -5.0]);
        assert_eq!(neg_max_x, &[-10.0, 4.0]);
        assert_eq!(neg_max_y, &[-1.0, -5.0]);

        let [max_x, max_y, neg_min_x, neg_min_y] = layout.character_planes();
        assert_eq!(max_x, &[1.5, -2.75, 0.75]);
        assert_eq!(max_y, &[2.5, 6.0, 0.75]);
        assert_eq!(neg_min_x, &[-0.5, 3.25, 0.75]);
        assert_eq!(neg_min_y, &[-1.5, -2.0, 0.75]);

        assert_eq!(layout.character_record(1), [-2.75, 6.0, 3.25, -2.0]);
    }

    #[test]
    fn test_rebuild_shrinks_to_live_count() {
        let (characters, walls) = sample_scene();
        let mut builder = LayoutBuilder::with_capacity(16, 4);
        builder.build(&characters, &walls, LayoutKind::Planar);

        let layout = builder.build(&characters[..1], &walls, LayoutKind::Planar);
        assert_eq!(layout.character_count(), 1);
        let FrameLayout::Planar(planar) = layout else {
            panic!("expected planar layout");
        };
        assert_eq!(planar.characters.len(), PlanarLayout::PLANES);
        assert_eq!(planar.circles.len(), 1);
    }

    fn random_scene(rng: &mut StdRng) -> (Vec<Character>, Vec<Wall>) {
        let characters = (0..rng.gen_range(0..40))
            .map(|_| {
                let position = Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
                let half = Vec2::new(rng.gen_range(0.1..2.0), rng.gen_range(0.1..2.0));
                Character::new(position, rng.gen_range(0.2..1.0)).with_half_extent(half)
            })
            .collect();
        let walls = (0..rng.gen_range(0..12))
            .map(|_| {
                let a = Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
                let b = Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
                Wall::new(a, b)
            })
            .collect();
        (characters, walls)
    }

    #[test]
    fn test_layouts_encode_the_same_scene() {
        let mut rng = StdRng::seed_from_u64(0x1a40);
        let mut builder = LayoutBuilder::with_capacity(8, 2);

        // Reusing one builder across frames of varying size must never leak old entries.
        for _ in 0..25 {
            let (characters, walls) = random_scene(&mut rng);
            let (m, n) = (characters.len(), walls.len());

            let FrameLayout::Scalar(scalar) =
                builder.build(&characters, &walls, LayoutKind::Scalar)
            else {
                panic!("expected scalar layout");
            };
            let scalar = scalar.clone();
            let FrameLayout::Batch(batch) = builder.build(&characters, &walls, LayoutKind::Batch)
            else {
                panic!("expected batch layout");
            };
            let batch = batch.clone();
            let FrameLayout::Planar(planar) =
                builder.build(&characters, &walls, LayoutKind::Planar)
            else {
                panic!("expected planar layout");
            };

            assert_eq!(scalar.character_count(), m);
            assert_eq!(batch.character_count(), m);
            assert_eq!(planar.character_count(), m);
            assert_eq!(batch.wall_count(), n);
            assert_eq!(planar.wall_count(), n);
            assert_eq!(batch.circles.xs, planar.circles.xs);
            assert_eq!(batch.circles.radii, planar.circles.radii);

            let [min_x, min_y, neg_max_x, neg_max_y] = planar.wall_planes();
            for (w, bounds) in scalar.wall_boxes.iter().enumerate() {
                let record = [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y];
                assert_eq!(&batch.walls[w * 4..w * 4 + 4], &record);
                assert_eq!(
                    [min_x[w], min_y[w], -neg_max_x[w], -neg_max_y[w]],
                    record
                );
            }
            for (c, bounds) in scalar.character_boxes.iter().enumerate() {
                let record = [bounds.max.x, bounds.max.y, bounds.min.x, bounds.min.y];
                assert_eq!(&batch.characters[c * 4..c * 4 + 4], &record);
                let [max_x, max_y, neg_min_x, neg_min_y] = planar.character_record(c);
                assert_eq!([max_x, max_y, -neg_min_x, -neg_min_y], record);
            }
        }
    }

    #[test]
    fn test_empty_scene() {
        let mut builder = LayoutBuilder::default();
        for kind in [LayoutKind::Scalar, LayoutKind::Batch, LayoutKind::Planar] {
            let layout = builder.build(&[], &[], kind);
            assert_eq!(layout.kind(), kind);
            assert_eq!(layout.character_count(), 0);
            assert_eq!(layout.wall_count(), 0);
        }
    }
}
