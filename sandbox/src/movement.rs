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

//! Free-roam wandering for the demo crowd.

use std::f32::consts::TAU;

use horde_core::math::Vec2;
use horde_data::Character;
use rand::Rng;

/// The crowd plus each character's time left before it picks a new heading.
#[derive(Debug, Default, Clone)]
pub struct Crowd {
    characters: Vec<Character>,
    turn_timers: Vec<f32>,
}

impl Crowd {
    /// Creates an empty crowd with room for `capacity` characters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            characters: Vec::with_capacity(capacity),
            turn_timers: Vec::with_capacity(capacity),
        }
    }

    /// Adds a character that keeps its heading for `turn_timer` seconds.
    pub fn push(&mut self, character: Character, turn_timer: f32) {
        self.characters.push(character);
        self.turn_timers.push(turn_timer);
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    #[cfg(test)]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn characters_mut(&mut self) -> &mut [Character] {
        &mut self.characters
    }
}

/// Wander parameters shared by the whole crowd.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRoam {
    /// Units per second at full heading length.
    pub speed: f32,
    /// Seconds between heading changes.
    pub turn_interval: f32,
    /// Half-size of the square characters aim to stay inside.
    pub bounds: f32,
}

impl Default for FreeRoam {
    fn default() -> Self {
        Self {
            speed: 3.5,
            turn_interval: 5.0,
            bounds: 50.0,
        }
    }
}

impl FreeRoam {
    /// A random heading inside the unit circle, mirrored on each axis where
    /// following it for a full turn interval would leave the bounds.
    pub fn pick_direction<R: Rng + ?Sized>(&self, position: Vec2, rng: &mut R) -> Vec2 {
        let mut direction = Vec2::from_angle(rng.gen_range(0.0..TAU)) * rng.gen::<f32>().sqrt();
        let aim = position + direction * (self.speed * self.turn_interval);
        if aim.x.abs() > self.bounds {
            direction.x = -direction.x;
        }
        if aim.y.abs() > self.bounds {
            direction.y = -direction.y;
        }
        direction
    }

    /// Moves every character `dt` seconds along its heading, re-rolling
    /// headings whose timer ran out.
    pub fn advance<R: Rng + ?Sized>(&self, crowd: &mut Crowd, dt: f32, rng: &mut R) {
        for (character, timer) in crowd.characters.iter_mut().zip(&mut crowd.turn_timers) {
            *timer -= dt;
            if *timer < 0.0 {
                character.direction = self.pick_direction(character.position, rng);
                *timer = self.turn_interval;
            }
            character.position += character.direction * (self.speed * dt);
        }
    }
}
