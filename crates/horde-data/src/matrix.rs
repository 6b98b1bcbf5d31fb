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

//! Boolean collision tables filled by the detectors.
//!
//! Both matrices store one `bool` per cell in row-major order, so a row is a
//! contiguous `&mut [bool]` the vector kernels can write 4 or 8 bytes at a
//! time.

/// Character x wall results, `[character][wall]`, full table.
#[derive(Debug, Default, Clone)]
pub struct StaticCollisionMatrix {
    characters: usize,
    walls: usize,
    cells: Vec<bool>,
}

impl StaticCollisionMatrix {
    /// Creates an empty matrix with room for `max_characters x walls` cells.
    pub fn with_capacity(max_characters: usize, walls: usize) -> Self {
        Self {
            characters: 0,
            walls: 0,
            cells: Vec::with_capacity(max_characters * walls),
        }
    }

    /// Resizes to `characters x walls` and clears every cell.
    pub fn reset(&mut self, characters: usize, walls: usize) {
        self.characters = characters;
        self.walls = walls;
        self.cells.clear();
        self.cells.resize(characters * walls, false);
    }

    /// `(characters, walls)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.characters, self.walls)
    }

    /// Whether character `c` overlaps wall `w`.
    #[inline]
    pub fn get(&self, c: usize, w: usize) -> bool {
        debug_assert!(c < self.characters && w < self.walls);
        self.cells[c * self.walls + w]
    }

    /// The results of character `c` against every wall.
    #[inline]
    pub fn row(&self, c: usize) -> &[bool] {
        &self.cells[c * self.walls..(c + 1) * self.walls]
    }

    /// Mutable row of character `c`.
    #[inline]
    pub fn row_mut(&mut self, c: usize) -> &mut [bool] {
        &mut self.cells[c * self.walls..(c + 1) * self.walls]
    }

    /// Mutable rows in character order.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [bool]> + '_ {
        // An empty table has no rows; `max(1)` only guards the chunk size.
        self.cells.chunks_exact_mut(self.walls.max(1))
    }

    /// Indices of the walls character `c` overlaps, in wall order.
    pub fn contacts(&self, c: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(c)
            .iter()
            .enumerate()
            .filter_map(|(w, &hit)| hit.then_some(w))
    }

    /// Number of overlapping character/wall pairs.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&hit| hit).count()
    }

    /// Every cell in row-major order.
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }
}

/// Character x character results, upper triangle only.
///
/// Cell `[i][j]` is meaningful only for `i < j`. Writers only ever receive the
/// part of a row right of the diagonal ([`upper_row_mut`](Self::upper_row_mut)),
/// so the diagonal and the lower triangle stay `false` for the whole frame.
#[derive(Debug, Default, Clone)]
pub struct DynamicCollisionMatrix {
    count: usize,
    cells: Vec<bool>,
}

impl DynamicCollisionMatrix {
    /// Creates an empty matrix with room for `max_characters` squared cells.
    pub fn with_capacity(max_characters: usize) -> Self {
        Self {
            count: 0,
            cells: Vec::with_capacity(max_characters * max_characters),
        }
    }

    /// Resizes to `count x count` and clears every cell.
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.cells.clear();
        self.cells.resize(count * count, false);
    }

    /// Number of characters the matrix covers.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the matrix covers no characters.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether characters `i` and `j` overlap. Requires `i < j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < j, "dynamic matrix read below the diagonal: [{i}][{j}]");
        debug_assert!(j < self.count);
        self.cells[i * self.count + j]
    }

    /// Whether characters `a` and `b` overlap, in either order.
    #[inline]
    pub fn pair(&self, a: usize, b: usize) -> bool {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => self.get(a, b),
            std::cmp::Ordering::Greater => self.get(b, a),
            std::cmp::Ordering::Equal => false,
        }
    }

    /// Cells `[i][i+1..count]`; index `k` holds the result for `j = i + 1 + k`.
    #[inline]
    pub fn upper_row(&self, i: usize) -> &[bool] {
        &self.cells[i * self.count + i + 1..(i + 1) * self.count]
    }

    /// Mutable cells `[i][i+1..count]`; index `k` holds the result for `j = i + 1 + k`.
    #[inline]
    pub fn upper_row_mut(&mut self, i: usize) -> &mut [bool] {
        let count = self.count;
        &mut self.cells[i * count + i + 1..(i + 1) * count]
    }

    /// Number of overlapping character pairs.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&hit| hit).count()
    }

    /// Every cell in row-major order, including the unused lower triangle.
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }
}
