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

//! Advanced SIMD (NEON) kernels. Same shape as the SSE2 ones; masks are
//! compacted to one byte per lane with a table lookup instead of saturating
//! packs.

use std::arch::aarch64::*;

use horde_data::layout::CircleArrays;
use horde_data::{DynamicCollisionMatrix, PlanarLayout, StaticCollisionMatrix};

use super::super::dynamic_detection::circle_row;
use super::separated_at;

#[inline]
#[target_feature(enable = "neon")]
unsafe fn load4(plane: &[f32], at: usize) -> float32x4_t {
    let window = &plane[at..at + 4];
    vld1q_f32(window.as_ptr())
}

/// Byte 0 of each 32-bit lane of two registers, in lane order.
const COMPACT8: [u8; 8] = [0, 4, 8, 12, 16, 20, 24, 28];
/// Byte 0 of each 32-bit lane of one register; out-of-range indices read zero.
const COMPACT4: [u8; 8] = [0, 4, 8, 12, 0xFF, 0xFF, 0xFF, 0xFF];

#[inline]
#[target_feature(enable = "neon")]
unsafe fn narrow8(lo: uint32x4_t, hi: uint32x4_t) -> uint8x8_t {
    let table = uint8x16x2_t(vreinterpretq_u8_u32(lo), vreinterpretq_u8_u32(hi));
    vqtbl2_u8(table, vld1_u8(COMPACT8.as_ptr()))
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn narrow4(mask: uint32x4_t) -> uint8x8_t {
    vqtbl1_u8(vreinterpretq_u8_u32(mask), vld1_u8(COMPACT4.as_ptr()))
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn store8(dst: &mut [bool], bytes: uint8x8_t) {
    let dst = &mut dst[..8];
    vst1_u8(dst.as_mut_ptr().cast(), bytes);
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn low4(bytes: uint8x8_t) -> [u8; 4] {
    vget_lane_u32::<0>(vreinterpret_u32_u8(bytes)).to_le_bytes()
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn separated(planes: &[&[f32]; 4], character: &[float32x4_t; 4], w: usize) -> uint32x4_t {
    let x_low = vcgtq_f32(load4(planes[0], w), character[0]);
    let y_low = vcgtq_f32(load4(planes[1], w), character[1]);
    let x_high = vcgtq_f32(load4(planes[2], w), character[2]);
    let y_high = vcgtq_f32(load4(planes[3], w), character[3]);
    vorrq_u32(vorrq_u32(x_low, y_low), vorrq_u32(x_high, y_high))
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn static_hits4(planes: &[&[f32]; 4], character: &[float32x4_t; 4], w: usize) -> [u8; 4] {
    let packed = narrow4(separated(planes, character, w));
    low4(vand_u8(vmvn_u8(packed), vdup_n_u8(1)))
}

#[target_feature(enable = "neon")]
pub(super) unsafe fn detect_static(layout: &PlanarLayout, out: &mut StaticCollisionMatrix) {
    let planes = layout.wall_planes();
    let walls = layout.wall_count();
    let one = vdup_n_u8(1);

    for (c, row) in out.rows_mut().enumerate() {
        let record = layout.character_record(c);
        let character = [
            vdupq_n_f32(record[0]),
            vdupq_n_f32(record[1]),
            vdupq_n_f32(record[2]),
            vdupq_n_f32(record[3]),
        ];

        let mut w = 0;
        while w + 8 <= walls {
            let lo = separated(&planes, &character, w);
            let hi = separated(&planes, &character, w + 4);
            store8(&mut row[w..], vand_u8(vmvn_u8(narrow8(lo, hi)), one));
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

#[inline]
#[target_feature(enable = "neon")]
unsafe fn overlaps(
    circles: &CircleArrays,
    j: usize,
    x: float32x4_t,
    y: float32x4_t,
    r: float32x4_t,
) -> uint32x4_t {
    let dx = vsubq_f32(load4(&circles.xs, j), x);
    let dy = vsubq_f32(load4(&circles.ys, j), y);
    // Separate multiply and add, no fused `vfmaq`, so results match the scalar tier.
    let distance_sq = vaddq_f32(vmulq_f32(dx, dx), vmulq_f32(dy, dy));
    let reach = vaddq_f32(r, load4(&circles.radii, j));
    vcltq_f32(distance_sq, vmulq_f32(reach, reach))
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn dynamic_hits4(
    circles: &CircleArrays,
    j: usize,
    x: float32x4_t,
    y: float32x4_t,
    r: float32x4_t,
) -> [u8; 4] {
    low4(vand_u8(narrow4(overlaps(circles, j, x, y, r)), vdup_n_u8(1)))
}

#[target_feature(enable = "neon")]
pub(super) unsafe fn detect_dynamic(circles: &CircleArrays, out: &mut DynamicCollisionMatrix) {
    let count = circles.len();
    let one = vdup_n_u8(1);

    for i in 0..count {
        let x = vdupq_n_f32(circles.xs[i]);
        let y = vdupq_n_f32(circles.ys[i]);
        let r = vdupq_n_f32(circles.radii[i]);
        let row = out.upper_row_mut(i);
        let first = i + 1;

        let mut j = first;
        while j + 8 <= count {
            let lo = overlaps(circles, j, x, y, r);
            let hi = overlaps(circles, j + 4, x, y, r);
            store8(&mut row[j - first..], vand_u8(narrow8(lo, hi), one));
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
