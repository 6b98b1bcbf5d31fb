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

//! # Horde Core
//!
//! Foundational crate containing math primitives, the lane contract,
//! configuration, and the hardware capability check shared by every
//! other crate of the collision engine.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod lane;
pub mod math;
pub mod platform;
pub mod telemetry;
pub mod utils;

pub use config::{CollisionConfig, DetectionTier};
pub use error::{HordeError, HordeResult};
pub use platform::simd::SimdCapability;
pub use utils::timer::Stopwatch;
