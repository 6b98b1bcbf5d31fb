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

//! The pooled scratch memory of one collision frame.

use crate::layout::LayoutBuilder;
use crate::matrix::{DynamicCollisionMatrix, StaticCollisionMatrix};

/// All per-frame buffers, reserved once for the configured capacity.
///
/// Fields are public so a frame can borrow the layout immutably while the
/// detectors write the matrices.
#[derive(Debug, Default)]
pub struct FrameArena {
    /// Layout buffers for every tier.
    pub layouts: LayoutBuilder,
    /// Character x wall results.
    pub statics: StaticCollisionMatrix,
    /// Character x character results.
    pub dynamics: DynamicCollisionMatrix,
}

impl FrameArena {
    /// Reserves every buffer for `max_characters` characters and `wall_count` walls.
    pub fn with_capacity(max_characters: usize, wall_count: usize) -> Self {
        log::debug!(
            "Reserving frame arena for {max_characters} characters and {wall_count} walls"
        );
        Self {
            layouts: LayoutBuilder::with_capacity(max_characters, wall_count),
            statics: StaticCollisionMatrix::with_capacity(max_characters, wall_count),
            dynamics: DynamicCollisionMatrix::with_capacity(max_characters),
        }
    }

    /// Clears both matrices and sizes them for the live counts of this frame.
    pub fn reset_matrices(&mut self, characters: usize, walls: usize) {
        self.statics.reset(characters, walls);
        self.dynamics.reset(characters);
    }
}
