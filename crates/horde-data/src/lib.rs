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

//! # Horde Data
//!
//! The data side of a collision frame: the scene entities submitted by the
//! host, the flat layouts each detection tier reads, and the boolean
//! matrices the detectors fill and the resolver consumes.
//!
//! Every buffer here is owned by a [`FrameArena`] that lives as long as the
//! orchestrator and is cleared and refilled once per frame.

#![warn(missing_docs)]

pub mod arena;
pub mod layout;
pub mod matrix;
pub mod scene;

pub use arena::FrameArena;
pub use layout::{
    BatchLayout, CircleArrays, FrameLayout, LayoutBuilder, LayoutKind, PlanarLayout, ScalarLayout,
};
pub use matrix::{DynamicCollisionMatrix, StaticCollisionMatrix};
pub use scene::{Character, Wall};
