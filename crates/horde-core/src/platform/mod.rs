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

//! Provides abstractions over host-specific capabilities.
//!
//! The collision engine only needs one thing from the platform: which vector
//! instruction set, if any, the explicit SIMD tier can use. It is detected once
//! at startup and passed around as a plain value afterwards.

pub mod simd;

pub use simd::SimdCapability;
