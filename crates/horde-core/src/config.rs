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

//! Startup configuration of the collision engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{HordeError, HordeResult};

/// Largest crowd the engine is sized for by default.
pub const DEFAULT_MAX_CHARACTERS: usize = 2401;

/// Radius given to characters that do not specify one.
pub const DEFAULT_RADIUS: f32 = 0.5;

/// The family of detection implementations to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionTier {
    /// Straightforward nested loops over geometry structs.
    Scalar,
    /// Flat float arrays shaped for compiler auto-vectorization.
    Batch,
    /// Hand-written 4-lane vector kernels.
    Simd,
    /// Cheapest tier the host supports.
    #[default]
    Auto,
}

impl fmt::Display for DetectionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionTier::Scalar => write!(f, "Scalar"),
            DetectionTier::Batch => write!(f, "Batch"),
            DetectionTier::Simd => write!(f, "SIMD"),
            DetectionTier::Auto => write!(f, "Auto"),
        }
    }
}

/// Configuration for a collision agent, fixed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Maximum number of live characters. Per-frame buffers are reserved for it.
    pub max_characters: usize,
    /// The requested detection tier.
    pub tier: DetectionTier,
    /// Radius assigned to characters spawned without one.
    pub default_radius: f32,
    /// Colliding neighbours resolved per character per frame.
    pub max_character_contacts: usize,
    /// Colliding walls resolved per character per frame.
    pub max_wall_contacts: usize,
    /// Frames after which the phase timing averages restart.
    pub timing_warmup_frames: u64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_characters: DEFAULT_MAX_CHARACTERS,
            tier: DetectionTier::Auto,
            default_radius: DEFAULT_RADIUS,
            max_character_contacts: 4,
            max_wall_contacts: 2,
            timing_warmup_frames: 3601,
        }
    }
}

impl CollisionConfig {
    /// Load the configuration from a JSON string. Missing fields take their default.
    pub fn from_json(json: &str) -> HordeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> HordeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save the configuration to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> HordeResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Returns a copy with another tier.
    pub fn with_tier(mut self, tier: DetectionTier) -> Self {
        self.tier = tier;
        self
    }

    /// Returns a copy with another capacity.
    pub fn with_max_characters(mut self, max_characters: usize) -> Self {
        self.max_characters = max_characters;
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> HordeResult<()> {
        if self.max_characters == 0 {
            return Err(HordeError::InvalidConfig(
                "max_characters must be at least 1".into(),
            ));
        }
        if !(self.default_radius > 0.0 && self.default_radius.is_finite()) {
            return Err(HordeError::InvalidConfig(format!(
                "default_radius must be positive, got {}",
                self.default_radius
            )));
        }
        Ok(())
    }
}
