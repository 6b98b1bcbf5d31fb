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

//! # Horde Lanes
//!
//! Hot-path strategies of a collision frame.
//!
//! - [`collision_lane`]: the static (character x wall) and dynamic
//!   (character x character) detectors, each in a scalar, batch and SIMD tier.
//! - [`resolve_lane`]: pushes overlapping characters apart and clamps them
//!   out of walls using the detector output.

#![warn(missing_docs)]

pub mod collision_lane;
pub mod resolve_lane;
