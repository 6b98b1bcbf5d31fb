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

//! # Horde Agents
//!
//! Agents own lanes and pooled frame memory, pick which lane runs, and report
//! what happened. The only agent is the [`CollisionAgent`](collision_agent::CollisionAgent),
//! which sequences layout, detection and resolution for one frame.

#![warn(missing_docs)]

pub mod collision_agent;

pub use collision_agent::{CollisionAgent, FrameReport};
