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

use approx::assert_relative_eq;
use horde_agents::{CollisionAgent, FrameReport};
use horde_core::config::{CollisionConfig, DetectionTier};
use horde_core::error::HordeError;
use horde_core::math::Vec2;
use horde_core::platform::SimdCapability;
use horde_data::{Character, Wall};
use horde_telemetry::{MetricsRegistry, Phase};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn crowd(seed: u64, count: usize) -> Vec<Character> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0));
            let direction = Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU));
            Character::new(position, 0.5).with_direction(direction)
        })
        .collect()
}

fn arena_walls() -> Vec<Wall> {
    vec![
        Wall::from_center(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.5)),
        Wall::from_center(Vec2::new(-5.0, 4.0), Vec2::new(0.5, 3.0)),
        Wall::from_center(Vec2::new(5.0, -4.0), Vec2::new(1.5, 1.5)),
        Wall::from_center(Vec2::new(6.0, 6.0), Vec2::new(0.5, 0.5)),
        Wall::from_center(Vec2::new(-6.0, -6.0), Vec2::new(2.5, 0.5)),
    ]
}

fn run(tier: DetectionTier, frames: usize) -> (Vec<Character>, Vec<FrameReport>) {
    let config = CollisionConfig::default()
        .with_tier(tier)
        .with_max_characters(200);
    let mut agent = CollisionAgent::new(config, arena_walls()).expect("agent");
    let mut characters = crowd(11, 150);
    let mut rng = StdRng::seed_from_u64(99);
    let reports = (0..frames)
        .map(|_| agent.step(&mut characters, &mut rng).expect("step"))
        .collect();
    (characters, reports)
}

#[test]
fn test_every_tier_moves_the_crowd_identically() {
    let (scalar_crowd, scalar_reports) = run(DetectionTier::Scalar, 5);

    for tier in [DetectionTier::Batch, DetectionTier::Simd, DetectionTier::Auto] {
        let (crowd, reports) = run(tier, 5);
        assert_eq!(crowd, scalar_crowd, "{tier} tier diverged");
        for (report, reference) in reports.iter().zip(&scalar_reports) {
            assert_eq!(report.static_contacts, reference.static_contacts, "{tier}");
            assert_eq!(report.dynamic_contacts, reference.dynamic_contacts, "{tier}");
        }
    }
}

#[test]
fn test_crowd_separates_over_frames() {
    let mut agent = CollisionAgent::new(CollisionConfig::default(), Vec::new()).unwrap();
    let mut characters = crowd(3, 60);
    let mut rng = StdRng::seed_from_u64(3);

    let first = agent.step(&mut characters, &mut rng).unwrap();
    let mut last = first;
    for _ in 0..30 {
        last = agent.step(&mut characters, &mut rng).unwrap();
    }
    assert!(first.dynamic_contacts > 0);
    assert!(last.dynamic_contacts < first.dynamic_contacts);
}

#[test]
fn test_capacity_exceeded_leaves_agent_untouched() {
    let config = CollisionConfig::default().with_max_characters(10);
    let mut agent = CollisionAgent::new(config, arena_walls()).unwrap();
    let mut characters = crowd(1, 11);
    let before = characters.clone();
    let mut rng = StdRng::seed_from_u64(0);

    let err = agent.step(&mut characters, &mut rng).unwrap_err();
    assert!(matches!(err, HordeError::CapacityExceeded { live: 11, capacity: 10 }));
    assert_eq!(err.to_string(), "11 live characters exceed the configured capacity of 10");
    assert_eq!(characters, before);
    assert_eq!(agent.frame_count(), 0);

    characters.truncate(10);
    assert!(agent.step(&mut characters, &mut rng).is_ok());
    assert_eq!(agent.frame_count(), 1);
}

#[test]
fn test_empty_frame_is_a_no_op() {
    let mut agent = CollisionAgent::new(CollisionConfig::default(), arena_walls()).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let report = agent.step(&mut [], &mut rng).unwrap();
    assert_eq!(report.characters, 0);
    assert_eq!(report.static_contacts, 0);
    assert_eq!(report.dynamic_contacts, 0);
    assert!(agent.dynamic_collisions().is_empty());
}

#[test]
fn test_character_inside_wall_leaves_along_direction() {
    let walls = vec![Wall::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0))];
    let mut agent = CollisionAgent::new(CollisionConfig::default(), walls).unwrap();
    let mut characters =
        vec![Character::new(Vec2::new(5.0, 5.0), 0.5).with_direction(Vec2::new(1.0, 0.0))];
    let mut rng = StdRng::seed_from_u64(0);

    let report = agent.step(&mut characters, &mut rng).unwrap();
    assert_eq!(report.static_contacts, 1);
    assert!(agent.static_collisions().get(0, 0));
    assert_relative_eq!(characters[0].position.x, 10.5);
    assert_relative_eq!(characters[0].position.y, 5.0);
}

#[test]
fn test_touching_pair_is_pushed_to_contact_distance() {
    let mut agent = CollisionAgent::new(CollisionConfig::default(), Vec::new()).unwrap();
    let mut characters = vec![
        Character::new(Vec2::new(0.0, 0.0), 0.5),
        Character::new(Vec2::new(0.6, 0.0), 0.5),
    ];
    let mut rng = StdRng::seed_from_u64(0);

    agent.step(&mut characters, &mut rng).unwrap();
    let gap = (characters[1].position - characters[0].position).length();
    assert_relative_eq!(gap, 1.0, epsilon = 1e-5);
    assert_relative_eq!(characters[0].position.x + characters[1].position.x, 0.6, epsilon = 1e-5);
}

#[test]
fn test_simd_request_without_vector_unit_runs_batch() {
    let config = CollisionConfig::default().with_tier(DetectionTier::Simd);
    let agent = CollisionAgent::with_capability(config, arena_walls(), SimdCapability::Unsupported)
        .unwrap();
    assert_eq!(agent.effective_tier(), DetectionTier::Batch);
    assert_eq!(agent.capability(), SimdCapability::Unsupported);
}

#[test]
fn test_auto_never_reports_auto() {
    let agent = CollisionAgent::new(CollisionConfig::default(), arena_walls()).unwrap();
    assert_ne!(agent.effective_tier(), DetectionTier::Auto);
    let expected = if SimdCapability::detect().is_supported() {
        DetectionTier::Simd
    } else {
        DetectionTier::Batch
    };
    assert_eq!(agent.effective_tier(), expected);
}

#[test]
fn test_telemetry_tracks_frames() {
    let registry = MetricsRegistry::new();
    let mut agent = CollisionAgent::new(CollisionConfig::default(), arena_walls())
        .unwrap()
        .with_telemetry(&registry)
        .unwrap();
    assert_eq!(registry.get_namespace_metrics("collision").len(), 8);

    let mut characters = crowd(5, 40);
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..3 {
        agent.step(&mut characters, &mut rng).unwrap();
    }

    let frames = registry
        .get_namespace_metrics("collision")
        .into_iter()
        .find(|metric| metric.metadata.id.name == "frames")
        .expect("frames counter");
    assert_eq!(frames.value.as_counter(), Some(3));
}

#[test]
fn test_timings_follow_steps() {
    let config = CollisionConfig {
        timing_warmup_frames: 2,
        ..CollisionConfig::default()
    };
    let mut agent = CollisionAgent::new(config, arena_walls()).unwrap();
    let mut characters = crowd(2, 20);
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..4 {
        agent.step(&mut characters, &mut rng).unwrap();
    }
    let timings = agent.timings();
    assert_eq!(timings.frames(), 4);
    assert!(timings.is_warmed_up());
    for phase in Phase::ALL {
        assert!(timings.average_ms(phase) >= 0.0);
    }
}
