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

//! Runtime detection of the 4-lane vector instruction sets used by the
//! SIMD detection tier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The vector instruction set available to the SIMD tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimdCapability {
    /// x86-64 SSE2, 4 x `f32` per register.
    Sse2,
    /// AArch64 Advanced SIMD (NEON), 4 x `f32` per register.
    Neon,
    /// No supported vector unit; SIMD lanes fall back to scalar loops.
    #[default]
    Unsupported,
}

impl SimdCapability {
    /// Number of `f32` lanes processed per vector instruction.
    pub const LANES: usize = 4;

    /// Probes the host CPU.
    ///
    /// This is meant to run once at startup; the result is then threaded
    /// through configuration instead of being re-checked on every call.
    pub fn detect() -> Self {
        let capability = Self::query_cpu();
        log::debug!("Detected vector capability: {capability}");
        capability
    }

    fn query_cpu() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("sse2") {
                return SimdCapability::Sse2;
            }
        }
        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                return SimdCapability::Neon;
            }
        }
        SimdCapability::Unsupported
    }

    /// Returns `true` if explicit vector kernels can run.
    #[inline]
    pub fn is_supported(self) -> bool {
        !matches!(self, SimdCapability::Unsupported)
    }
}

impl fmt::Display for SimdCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdCapability::Sse2 => write!(f, "SSE2"),
            SimdCapability::Neon => write!(f, "NEON"),
            SimdCapability::Unsupported => write!(f, "unsupported"),
        }
    }
}
