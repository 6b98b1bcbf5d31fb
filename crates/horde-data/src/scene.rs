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

//! Scene entities as seen by the collision engine.

use horde_core::config::DEFAULT_RADIUS;
use horde_core::math::{Aabb, Circle, Vec2};
use serde::{Deserialize, Serialize};

/// A moving circular agent on the ground plane.
///
/// Only the resolver and the host's movement logic write `position`;
/// detectors read snapshots of it through a layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// World position on the ground plane.
    pub position: Vec2,
    /// Collision radius, used by the character/character test.
    pub radius: f32,
    /// Half-size of the bounding box, used by the character/wall test.
    pub half_extent: Vec2,
    /// Current travel direction, consulted when clamping out of walls.
    pub direction: Vec2,
}

impl Character {
    /// Creates a stationary character whose bounding box hugs its circle.
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            half_extent: Vec2::splat(radius),
            direction: Vec2::ZERO,
        }
    }

    /// Sets the travel direction.
    pub fn with_direction(mut self, direction: Vec2) -> Self {
        self.direction = direction;
        self
    }

    /// Sets a bounding box half-extent that differs from the radius.
    pub fn with_half_extent(mut self, half_extent: Vec2) -> Self {
        self.half_extent = half_extent;
        self
    }

    /// The collision circle at the current position.
    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// The bounding box at the current position.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extent)
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new(Vec2::ZERO, DEFAULT_RADIUS)
    }
}

/// A fixed, axis-aligned obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// The obstacle's extent.
    pub bounds: Aabb,
}

impl Wall {
    /// Creates a wall from two corners in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            bounds: Aabb::from_min_max(a, b),
        }
    }

    /// Creates a wall from its center and half-size.
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            bounds: Aabb::from_center_half_extents(center, half_extents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_character() {
        let character = Character::default();
        assert_eq!(character.radius, 0.5);
        assert_eq!(character.half_extent, Vec2::splat(0.5));
        assert_eq!(character.direction, Vec2::ZERO);
    }

    #[test]
    fn test_character_bounds_follow_position() {
        let character = Character::new(Vec2::new(3.0, -2.0), 1.0)
            .with_half_extent(Vec2::new(0.5, 2.0));
        let bounds = character.bounds();
        assert_eq!(bounds.min, Vec2::new(2.5, -4.0));
        assert_eq!(bounds.max, Vec2::new(3.5, 0.0));
        assert_eq!(character.circle().radius, 1.0);
    }

    #[test]
    fn test_wall_constructors_agree() {
        let a = Wall::new(Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0));
        let b = Wall::from_center(Vec2::new(5.0, 5.0), Vec2::splat(5.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_wall_list_from_json() {
        let json = r#"[
            { "bounds": { "min": { "x": 0.0, "y": 0.0 }, "max": { "x": 2.0, "y": 1.0 } } }
        ]"#;
        let walls: Vec<Wall> = serde_json::from_str(json).expect("valid wall list");
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].bounds.max, Vec2::new(2.0, 1.0));
    }
}
