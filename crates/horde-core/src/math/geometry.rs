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

//! Provides the two collision shapes of the ground plane.
//!
//! Characters collide with each other as circles. Character-versus-wall tests
//! use axis-aligned boxes on both sides: the character's bounding box against
//! the wall's box. Both predicates are pure and branch-free in spirit, which
//! lets the batch and SIMD detectors reproduce them exactly.

use serde::{Deserialize, Serialize};

use super::Vec2;

/// A circle on the ground plane.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Default,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Circle {
    /// The center of the circle.
    pub position: Vec2,
    /// The radius of the circle.
    pub radius: f32,
}

impl Circle {
    /// Creates a new `Circle`.
    #[inline]
    pub const fn new(position: Vec2, radius: f32) -> Self {
        Self { position, radius }
    }

    /// Returns `true` if the squared distance between the centers is strictly
    /// less than the squared sum of the radii.
    ///
    /// Circles that exactly touch do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Circle) -> bool {
        let dx = other.position.x - self.position.x;
        let dy = other.position.y - self.position.y;
        let reach = self.radius + other.radius;
        dx * dx + dy * dy < reach * reach
    }
}

/// Represents a 2D Axis-Aligned Bounding Box (AABB).
///
/// An AABB is a rectangle aligned with the coordinate axes, defined by its
/// minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on both axes.
    pub min: Vec2,
    /// The corner of the box with the largest coordinates on both axes.
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new `Aabb` from two corner points.
    ///
    /// `min` receives the component-wise minimum and `max` the component-wise
    /// maximum, regardless of the order the points are passed in.
    #[inline]
    pub fn from_min_max(min_pt: Vec2, max_pt: Vec2) -> Self {
        Self {
            min: Vec2::new(min_pt.x.min(max_pt.x), min_pt.y.min(max_pt.y)),
            max: Vec2::new(min_pt.x.max(max_pt.x), min_pt.y.max(max_pt.y)),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    ///
    /// The provided `half_extents` will be made non-negative.
    #[inline]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        let safe_half_extents = half_extents.abs();
        Self {
            min: center - safe_half_extents,
            max: center + safe_half_extents,
        }
    }

    /// Calculates the center point of the box.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents of the box.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Returns `true` unless the boxes are separated on some axis.
    ///
    /// Boundaries are inclusive: boxes sharing an edge intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.min.x > self.max.x
            || other.max.x < self.min.x
            || other.min.y > self.max.y
            || other.max.y < self.min.y)
    }

    /// Checks if a point is contained within the box, boundaries included.
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        (point.x >= self.min.x && point.x <= self.max.x)
            && (point.y >= self.min.y && point.y <= self.max.y)
    }
}
