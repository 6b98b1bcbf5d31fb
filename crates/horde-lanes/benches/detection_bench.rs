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

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use horde_core::math::Vec2;
use horde_data::{Character, DynamicCollisionMatrix, LayoutBuilder, StaticCollisionMatrix, Wall};
use horde_lanes::collision_lane::{
    BatchDynamicLane, BatchStaticLane, DynamicDetectionLane, ScalarDynamicLane, ScalarStaticLane,
    SimdDynamicLane, SimdStaticLane, StaticDetectionLane,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CHARACTERS: usize = 2401;

fn scene() -> (Vec<Character>, Vec<Wall>) {
    let mut rng = StdRng::seed_from_u64(1);
    let characters = (0..CHARACTERS)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            Character::new(position, 0.5)
        })
        .collect();
    let walls = (0..37)
        .map(|_| {
            let center = Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            Wall::from_center(center, Vec2::new(rng.gen_range(0.5..6.0), rng.gen_range(0.5..6.0)))
        })
        .collect();
    (characters, walls)
}

fn bench_static(c: &mut Criterion) {
    let (characters, walls) = scene();
    let lanes: [Box<dyn StaticDetectionLane>; 3] = [
        Box::new(ScalarStaticLane::new()),
        Box::new(BatchStaticLane::new()),
        Box::new(SimdStaticLane::default()),
    ];
    let mut builder = LayoutBuilder::with_capacity(CHARACTERS, walls.len());
    let mut out = StaticCollisionMatrix::with_capacity(CHARACTERS, walls.len());

    let mut group = c.benchmark_group("Static Detection");
    for lane in &lanes {
        let layout = builder.build(&characters, &walls, lane.layout_kind());
        group.bench_function(BenchmarkId::from_parameter(lane.strategy_name()), |b| {
            b.iter(|| {
                out.reset(characters.len(), walls.len());
                lane.detect(&layout, &mut out).expect("detect");
                black_box(out.count());
            });
        });
    }
    group.finish();
}

fn bench_dynamic(c: &mut Criterion) {
    let (characters, _) = scene();
    let lanes: [Box<dyn DynamicDetectionLane>; 3] = [
        Box::new(ScalarDynamicLane::new()),
        Box::new(BatchDynamicLane::new()),
        Box::new(SimdDynamicLane::default()),
    ];
    let mut builder = LayoutBuilder::with_capacity(CHARACTERS, 0);
    let mut out = DynamicCollisionMatrix::with_capacity(CHARACTERS);

    let mut group = c.benchmark_group("Dynamic Detection");
    group.sample_size(20);
    for lane in &lanes {
        let layout = builder.build(&characters, &[], lane.layout_kind());
        group.bench_function(BenchmarkId::from_parameter(lane.strategy_name()), |b| {
            b.iter(|| {
                out.reset(characters.len());
                lane.detect(&layout, &mut out).expect("detect");
                black_box(out.count());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let (characters, walls) = scene();
    let mut builder = LayoutBuilder::with_capacity(CHARACTERS, walls.len());

    c.bench_function("Planar Layout Build", |b| {
        b.iter(|| {
            let layout = builder.build(&characters, &walls, horde_data::LayoutKind::Planar);
            black_box(layout.character_count());
        });
    });
}

criterion_group!(benches, bench_static, bench_dynamic, bench_layout);
criterion_main!(benches);
