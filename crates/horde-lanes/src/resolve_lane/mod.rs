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

//! Movement resolution from the detection matrices.
//!
//! Resolution is stateless per frame: it only reads this frame's matrices and
//! the characters' current positions, and only writes positions.

use horde_core::config::CollisionConfig;
use horde_core::lane::{Lane, LaneError, LaneKind, Workload};
use horde_core::math::{Aabb, Vec2, TAU};
use horde_data::{Character, DynamicCollisionMatrix, StaticCollisionMatrix, Wall};
use rand::{Rng, RngCore};

/// A strategy that moves characters out of the contacts found this frame.
pub trait ResolveLane: Lane {
    /// Pushes overlapping characters apart and clamps them out of walls.
    ///
    /// `statics` must be `characters x walls` and `dynamics` must cover
    /// `characters`. `rng` supplies the push direction of characters whose
    /// centers coincide.
    fn resolve(
        &self,
        characters: &mut [Character],
        walls: &[Wall],
        statics: &StaticCollisionMatrix,
        dynamics: &DynamicCollisionMatrix,
        rng: &mut dyn RngCore,
    ) -> Result<(), LaneError>;
}

/// Penetration-depth push-apart followed by per-wall clamping.
///
/// Characters are visited in index order. Each one first splits its overlap
/// evenly with up to `max_character_contacts` partners, then is clamped out of
/// the first `max_wall_contacts` walls it touches. Every step works on the
/// positions already updated earlier in the same pass.
#[derive(Debug, Clone)]
pub struct PushApartResolveLane {
    max_character_contacts: usize,
    max_wall_contacts: usize,
}

impl Default for PushApartResolveLane {
    fn default() -> Self {
        Self::new(4, 2)
    }
}

impl PushApartResolveLane {
    /// Creates a resolver with explicit contact caps.
    pub fn new(max_character_contacts: usize, max_wall_contacts: usize) -> Self {
        Self {
            max_character_contacts,
            max_wall_contacts,
        }
    }

    /// Creates a resolver with the caps of `config`.
    pub fn from_config(config: &CollisionConfig) -> Self {
        Self::new(config.max_character_contacts, config.max_wall_contacts)
    }

    fn push_apart(
        &self,
        characters: &mut [Character],
        c: usize,
        dynamics: &DynamicCollisionMatrix,
        rng: &mut dyn RngCore,
    ) {
        let partners = (0..characters.len())
            .filter(|&d| d != c && dynamics.pair(c, d))
            .take(self.max_character_contacts);

        for d in partners {
            let (a, b) = (characters[c], characters[d]);
            let separation = a.position - b.position;
            let distance = separation.length();
            let adjust = ((a.radius + b.radius) - distance) / 2.0;
            if adjust <= 0.0 {
                continue;
            }

            let direction = if distance > 0.0 {
                separation / distance
            } else {
                Vec2::from_angle(rng.gen_range(0.0..TAU))
            };
            characters[c].position += direction * adjust;
            characters[d].position -= direction * adjust;
        }
    }
}

impl Lane for PushApartResolveLane {
    fn strategy_name(&self) -> &'static str {
        "PushApart"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Resolve
    }

    fn estimate_cost(&self, workload: &Workload) -> f32 {
        (workload.characters * (self.max_character_contacts + self.max_wall_contacts)) as f32
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl ResolveLane for PushApartResolveLane {
    fn resolve(
        &self,
        characters: &mut [Character],
        walls: &[Wall],
        statics: &StaticCollisionMatrix,
        dynamics: &DynamicCollisionMatrix,
        rng: &mut dyn RngCore,
    ) -> Result<(), LaneError> {
        let expected = (characters.len(), walls.len());
        if statics.dimensions() != expected {
            return Err(LaneError::ShapeMismatch {
                expected,
                found: statics.dimensions(),
            });
        }
        if dynamics.len() != characters.len() {
            return Err(LaneError::ShapeMismatch {
                expected: (characters.len(), characters.len()),
                found: (dynamics.len(), dynamics.len()),
            });
        }

        for c in 0..characters.len() {
            self.push_apart(characters, c, dynamics, rng);

            let character = &mut characters[c];
            for w in statics.contacts(c).take(self.max_wall_contacts) {
                character.position = clamp_out_of_wall(
                    character.position,
                    character.radius,
                    character.direction,
                    &walls[w].bounds,
                );
            }
        }
        Ok(())
    }
}

/// Moves a circle at `position` out of `bounds`.
///
/// A center outside the box on one axis is pushed out on that axis only. A
/// center diagonal to a corner is pushed on each axis whose edge is closer
/// than `radius`. A center inside the box leaves along the dominant axis of
/// `direction`, or through the nearest edge when `direction` is zero.
pub fn clamp_out_of_wall(position: Vec2, radius: f32, direction: Vec2, bounds: &Aabb) -> Vec2 {
    let Vec2 { mut x, mut y } = position;
    let outside_x = x < bounds.min.x || x > bounds.max.x;
    let outside_y = y < bounds.min.y || y > bounds.max.y;

    match (outside_x, outside_y) {
        (true, false) => x = push_outside(x, bounds.min.x, bounds.max.x, radius),
        (false, true) => y = push_outside(y, bounds.min.y, bounds.max.y, radius),
        (true, true) => {
            x = push_off_corner(x, bounds.min.x, bounds.max.x, radius);
            y = push_off_corner(y, bounds.min.y, bounds.max.y, radius);
        }
        (false, false) => {
            if direction == Vec2::ZERO {
                let edges = [
                    (x - bounds.min.x, Edge::MinX),
                    (bounds.max.x - x, Edge::MaxX),
                    (y - bounds.min.y, Edge::MinY),
                    (bounds.max.y - y, Edge::MaxY),
                ];
                let nearest = edges
                    .into_iter()
                    .min_by(|a, b| a.0.total_cmp(&b.0))
                    .map_or(Edge::MinX, |(_, edge)| edge);
                match nearest {
                    Edge::MinX => x = bounds.min.x - radius,
                    Edge::MaxX => x = bounds.max.x + radius,
                    Edge::MinY => y = bounds.min.y - radius,
                    Edge::MaxY => y = bounds.max.y + radius,
                }
            } else if direction.x.abs() >= direction.y.abs() {
                x = if direction.x > 0.0 {
                    bounds.max.x + radius
                } else {
                    bounds.min.x - radius
                };
            } else {
                y = if direction.y > 0.0 {
                    bounds.max.y + radius
                } else {
                    bounds.min.y - radius
                };
            }
        }
    }
    Vec2::new(x, y)
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

/// Keeps `value` at least `radius` beyond the side of `[min, max]` it is on.
#[inline]
fn push_outside(value: f32, min: f32, max: f32, radius: f32) -> f32 {
    if value < min {
        value.min(min - radius)
    } else {
        value.max(max + radius)
    }
}

#[inline]
fn push_off_corner(value: f32, min: f32, max: f32, radius: f32) -> f32 {
    if value < min && min - value < radius {
        min - radius
    } else if value > max && value - max < radius {
        max + radius
    } else {
        value
    }
}
