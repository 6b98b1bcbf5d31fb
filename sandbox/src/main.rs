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

//! Headless crowd demo.
//!
//! Spawns waves of wandering characters into a walled arena and runs the
//! collision agent on them at a fixed time step, logging the averaged phase
//! timings as it goes.

mod arena;
mod movement;
mod spawner;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use horde_agents::CollisionAgent;
use horde_core::config::{CollisionConfig, DetectionTier};
use horde_telemetry::{MetricsRegistry, ScopedMetricTimer};
use rand::rngs::StdRng;
use rand::SeedableRng;

use movement::{Crowd, FreeRoam};
use spawner::Spawner;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TierArg {
    Scalar,
    Batch,
    Simd,
    Auto,
}

impl From<TierArg> for DetectionTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Scalar => DetectionTier::Scalar,
            TierArg::Batch => DetectionTier::Batch,
            TierArg::Simd => DetectionTier::Simd,
            TierArg::Auto => DetectionTier::Auto,
        }
    }
}

/// Crowd collision sandbox
#[derive(Parser, Debug)]
#[command(name = "sandbox")]
#[command(about = "Runs a wandering crowd through the collision engine")]
#[command(version)]
struct Args {
    /// JSON collision configuration; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Detection tier, overriding the configuration file
    #[arg(long, value_enum)]
    tier: Option<TierArg>,

    /// Maximum number of characters, overriding the configuration file
    #[arg(long)]
    capacity: Option<usize>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 7200)]
    frames: u64,

    /// Fixed time step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Seed for spawning, wandering and push directions
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Log the timing summary every N frames (0 disables)
    #[arg(long, default_value_t = 600)]
    report_every: u64,
}

fn load_config(args: &Args) -> anyhow::Result<CollisionConfig> {
    let mut config = match &args.config {
        Some(path) => CollisionConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => CollisionConfig::default(),
    };
    if let Some(tier) = args.tier {
        config.tier = tier.into();
    }
    if let Some(capacity) = args.capacity {
        config.max_characters = capacity;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    horde_telemetry::init_logging("info").context("failed to install the logger")?;

    let config = load_config(&args)?;
    let walls = arena::build_walls();
    log::info!("Arena built with {} walls", walls.len());

    let registry = MetricsRegistry::new();
    let frame_ms = registry
        .register_histogram(
            "sandbox",
            "frame_ms",
            "Whole frame time",
            "ms",
            vec![1.0, 4.0, 8.0, 16.0, 33.0],
        )
        .context("failed to register the frame histogram")?;

    let mut agent = CollisionAgent::new(config.clone(), walls)
        .and_then(|agent| agent.with_telemetry(&registry))
        .context("failed to create the collision agent")?;
    let (static_lane, dynamic_lane) = agent.active_strategies();
    log::info!(
        "Running {} frames on the {} tier ({static_lane} + {dynamic_lane})",
        args.frames,
        agent.effective_tier()
    );

    let mut rng = StdRng::seed_from_u64(args.seed);
    let roam = FreeRoam::default();
    let mut spawner = Spawner::new(config.max_characters, config.default_radius);
    let mut crowd = Crowd::with_capacity(config.max_characters);

    for frame in 1..=args.frames {
        let _timer = ScopedMetricTimer::new(&frame_ms);

        spawner.update(args.dt, &mut crowd, &roam, &mut rng);
        roam.advance(&mut crowd, args.dt, &mut rng);
        let report = agent
            .step(crowd.characters_mut(), &mut rng)
            .with_context(|| format!("collision step failed on frame {frame}"))?;

        if args.report_every > 0 && frame % args.report_every == 0 {
            log::info!(
                "{} characters, {} wall contacts, {} character contacts | {}",
                report.characters,
                report.static_contacts,
                report.dynamic_contacts,
                agent.timings().summary()
            );
        }
    }

    if crowd.is_empty() {
        log::warn!("No character spawned in {} frames", args.frames);
    }
    let summary = agent.timings().summary();
    log::info!("Finished: {summary}");
    log::info!("{} metrics registered", registry.metric_count());
    if let Ok(Some(mean)) = frame_ms.mean() {
        log::info!("Mean frame time {mean:.3} ms");
    }
    println!(
        "{}",
        summary.to_json().context("failed to serialize the timing summary")?
    );
    Ok(())
}
