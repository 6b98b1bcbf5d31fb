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

//! SSE2 kernels.
//!
//! Comparison masks are narrowed `i32 -> i16 -> i8` with saturating packs,
//! turned into `0`/`1` bytes and stored straight into the `bool` rows. Every
//! store goes through a bounds-checked sub-slice of the row.

use std::arch::x86_64::*;

use horde_data::layout::CircleArrays;
use horde_data::{DynamicCollisionMatrix, PlanarLayout, StaticCollisionMatrix};

use super::super::dynamic_detection::circle_row;
use super::separated_at;

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load4(plane: &[f32], at: usize) -> __m128 {
    let window = &plane[at..at + 4];
    _mm_loadu_ps(window.as_ptr())
}

/// Narrows eight 32-bit masks to eight bytes of `0x00`/`0xFF` in the low half.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn narrow8(lo: __m128i, hi: __m128i) -> __m128i {
    _mm_packs_epi16(_mm_packs_epi32(lo, hi), _mm_setzero_si128())
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn narrow4(mask: __m128i) -> __m128i {
    let zero = _mm_setzero_si128();
    _mm_packs_epi16(_mm_packs_epi32(mask, zero), zero)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store8(dst: &mut [bool], bytes: __m128i) {
    let dst = &mut dst[..8];
    _mm_storel_epi64(dst.as_mut_ptr().cast(), bytes);
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn low4(bytes: __m128i) -> [u8; 4] {
    _mm_cvtsi128_si32(bytes).to_le_bytes()
}

/// All-ones lanes where walls `w..w + 4` are separated from the character.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn separated(planes: &[&[f32]; 4], character: &[__m128; 4], w: usize) -> __m128i {
    let x_low = _mm_cmpgt_ps(load4(planes[0], w), character[0]);
    let y_low = _mm_cmpgt_ps(load4(planes[1], w), character[1]);
    let x_high = _mm_cmpgt_ps(load4(planes[2], w), character[2]);
    let y_high = _mm_cmpgt_ps(load4(planes[3], w), character[3]);
    _mm_castps_si128(_mm_or_ps(_mm_or_ps(x_low, y_low), _mm_or_ps(x_high, y_high)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn static_hits4(planes: &[&[f32]; 4], character: &[__m128; 4], w: usize) -> [u8; 4] {
    let one = _mm_set1_epi8(1);
    low4(_mm_andnot_si128(narrow4(separated(planes, character, w)), one))
}

#[target_feature(enable = "sse2")]
pub(super) unsafe fn detect_static(layout: &PlanarLayout, out: &mut StaticCollisionMatrix) {
    let planes = layout.wall_planes();
    let walls = layout.wall_count();
    let one = _mm_set1_epi8(1);

    for (c, row) in out.rows_mut().enumerate() {
        let record = layout.character_record(c);
        let character = [
            _mm_set1_ps(record[0]),
            _mm_set1_ps(record[1]),
            _mm_set1_ps(record[2]),
            _mm_set1_ps(record[3]),
        ];

        let mut w = 0;
        while w + 8 <= walls {
            let lo = separated(&planes, &character, w);
            let hi = separated(&planes, &character, w + 4);
            store8(&mut row[w..], _mm_andnot_si128(narrow8(lo, hi), one));
            w += 8;
        }
        while w + 4 <= walls {
            let bytes = static_hits4(&planes, &character, w);
            for (slot, byte) in row[w..w + 4].iter_mut().zip(bytes) {
                *slot = byte != 0;
            }
            w += 4;
        }
        if w < walls {
            if walls >= 4 {
                let start = walls - 4;
                let bytes = static_hits4(&planes, &character, start);
                for (k, slot) in row.iter_mut().enumerate().skip(w) {
                    *slot = bytes[k - start] != 0;
                }
            } else {
                for (k, slot) in row.iter_mut().enumerate().skip(w) {
                    *slot = !separated_at(&planes, &record, k);
                }
            }
        }
    }
}

/// All-ones lanes where characters `j..j + 4` overlap the broadcast circle.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn overlaps(circles: &CircleArrays, j: usize, x: __m128, y: __m128, r: __m128) -> __m128i {
    let dx = _mm_sub_ps(load4(&circles.xs, j), x);
    let dy = _mm_sub_ps(load4(&circles.ys, j), y);
    let distance_sq = _mm_add_ps(_mm_mul_ps(dx, dx), _mm_mul_ps(dy, dy));
    let reach = _mm_add_ps(r, load4(&circles.radii, j));
    _mm_castps_si128(_mm_cmplt_ps(distance_sq, _mm_mul_ps(reach, reach)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn dynamic_hits4(
    circles: &CircleArrays,
    j: usize,
    x: __m128,
    y: __m128,
    r: __m128,
) -> [u8; 4] {
    let one = _mm_set1_epi8(1);
    low4(_mm_and_si128(narrow4(overlaps(circles, j, x, y, r)), one))
}

#[target_feature(enable = "sse2")]
pub(super) unsafe fn detect_dynamic(circles: &CircleArrays, out: &mut DynamicCollisionMatrix) {
    let count = circles.len();
    let one = _mm_set1_epi8(1);

    for i in 0..count {
        let x = _mm_set1_ps(circles.xs[i]);
        let y = _mm_set1_ps(circles.ys[i]);
        let r = _mm_set1_ps(circles.radii[i]);
        let row = out.upper_row_mut(i);
        let first = i + 1;

        let mut j = first;
        while j + 8 <= count {
            let lo = overlaps(circles, j, x, y, r);
            let hi = overlaps(circles, j + 4, x, y, r);
            store8(&mut row[j - first..], _mm_and_si128(narrow8(lo, hi), one));
            j += 8;
        }
        while j + 4 <= count {
            let bytes = dynamic_hits4(circles, j, x, y, r);
            for (slot, byte) in row[j - first..j - first + 4].iter_mut().zip(bytes) {
                *slot = byte != 0;
            }
            j += 4;
        }
        if j < count {
            if count >= 4 {
                let start = count - 4;
                let bytes = dynamic_hits4(circles, start, x, y, r);
                for k in j..count {
                    row[k - first] = bytes[k - start] != 0;
                }
            } else {
                circle_row(circles, i, row, j - first);
            }
        }
    }
}
