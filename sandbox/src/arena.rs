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

//! The fixed obstacle course the crowd walks through.

use horde_core::math::Vec2;
use horde_data::Wall;

/// Half-size of the square arena, measured to the inner face of the fence.
pub const ARENA_HALF_SIZE: f32 = 62.0;
const FENCE_THICKNESS: f32 = 2.0;
const PILLAR_SPACING: f32 = 20.0;
const PILLAR_HALF_SIZE: f32 = 1.5;

/// Four fence walls around the arena plus a grid of square pillars.
///
/// The centre cell is left free since it is a spawn point.
pub fn build_walls() -> Vec<Wall> {
    let outer = ARENA_HALF_SIZE + FENCE_THICKNESS;
    let mut walls = vec![
        Wall::new(Vec2::new(-outer, ARENA_HALF_SIZE), Vec2::new(outer, outer)),
        Wall::new(Vec2::new(-outer, -outer), Vec2::new(outer, -ARENA_HALF_SIZE)),
        Wall::new(Vec2::new(-outer, -outer), Vec2::new(-ARENA_HALF_SIZE, outer)),
        Wall::new(Vec2::new(ARENA_HALF_SIZE, -outer), Vec2::new(outer, outer)),
    ];

    for row in -2..=2 {
        for column in -2..=2 {
            if row == 0 && column == 0 {
                continue;
            }
            let center = Vec2::new(column as f32, row as f32) * PILLAR_SPACING;
            walls.push(Wall::from_center(center, Vec2::splat(PILLAR_HALF_SIZE)));
        }
    }
    walls
}
