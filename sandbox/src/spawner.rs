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

//! Periodic crowd spawning.

use horde_core::math::Vec2;
use horde_data::Character;
use rand::Rng;

use crate::movement::{Crowd, FreeRoam};

/// Distance of the four outer spawn points from the centre on each axis.
pub const SPAWN_SPREAD: f32 = 57.0;
/// Seconds between two waves.
pub const SPAWN_INTERVAL_SECS: f32 = 2.5;

/// Drops one character on each of five spawn points per wave until the
/// crowd reaches capacity.
#[derive(Debug, Clone)]
pub struct Spawner {
    points: [Vec2; 5],
    interval: f32,
    countdown: f32,
    capacity: usize,
    radius: f32,
}

impl Spawner {
    /// Spawns characters of `radius` up to `capacity`, around the origin.
    pub fn new(capacity: usize, radius: f32) -> Self {
        Self {
            points: [
                Vec2::ZERO,
                Vec2::new(SPAWN_SPREAD, SPAWN_SPREAD),
                Vec2::new(-SPAWN_SPREAD, -SPAWN_SPREAD),
                Vec2::new(SPAWN_SPREAD, -SPAWN_SPREAD),
                Vec2::new(-SPAWN_SPREAD, SPAWN_SPREAD),
            ],
            interval: SPAWN_INTERVAL_SECS,
            countdown: SPAWN_INTERVAL_SECS,
            capacity,
            radius,
        }
    }

    /// Whether the crowd has reached capacity.
    pub fn is_done(&self, crowd: &Crowd) -> bool {
        crowd.len() >= self.capacity
    }

    /// Advances the wave timer by `dt` and returns how many characters spawned.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        crowd: &mut Crowd,
        roam: &FreeRoam,
        rng: &mut R,
    ) -> usize {
        self.countdown -= dt;
        if self.countdown >= 0.0 || self.is_done(crowd) {
            return 0;
        }
        self.countdown = self.interval;

        let room = self.capacity - crowd.len();
        let mut spawned = 0;
        for &point in self.points.iter().take(room) {
            let direction = roam.pick_direction(point, rng);
            crowd.push(
                Character::new(point, self.radius).with_direction(direction),
                roam.turn_interval,
            );
            spawned += 1;
        }

        log::debug!("Spawned {spawned} characters, crowd is now {}", crowd.len());
        if self.is_done(crowd) {
            log::info!("Crowd reached capacity of {}", self.capacity);
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_waves_follow_the_interval() {
        let mut spawner = Spawner::new(100, 0.5);
        let mut crowd = Crowd::default();
        let roam = FreeRoam::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(spawner.update(2.0, &mut crowd, &roam, &mut rng), 0);
        assert_eq!(spawner.update(1.0, &mut crowd, &roam, &mut rng), 5);
        assert_eq!(spawner.update(1.0, &mut crowd, &roam, &mut rng), 0);
        assert_eq!(spawner.update(2.0, &mut crowd, &roam, &mut rng), 5);
        assert_eq!(crowd.len(), 10);
        assert_eq!(crowd.characters()[1].position, Vec2::new(57.0, 57.0));
    }

    #[test]
    fn test_last_wave_is_truncated_at_capacity() {
        let mut spawner = Spawner::new(7, 0.5);
        let mut crowd = Crowd::default();
        let roam = FreeRoam::default();
        let mut rng = StdRng::seed_from_u64(0);

        let spawned: usize = (0..10)
            .map(|_| spawner.update(3.0, &mut crowd, &roam, &mut rng))
            .sum();
        assert_eq!(spawned, 7);
        assert_eq!(crowd.len(), 7);
        assert!(spawner.is_done(&crowd));
    }
}
