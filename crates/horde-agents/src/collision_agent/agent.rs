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

//! Defines the CollisionAgent, the per-frame orchestrator of the collision lanes.

use horde_core::config::{CollisionConfig, DetectionTier};
use horde_core::error::{HordeError, HordeResult};
use horde_core::lane::{Lane, Workload};
use horde_core::platform::SimdCapability;
use horde_core::utils::timer::Stopwatch;
use horde_data::{Character, DynamicCollisionMatrix, FrameArena, StaticCollisionMatrix, Wall};
use horde_lanes::collision_lane::{
    BatchDynamicLane, BatchStaticLane, DynamicDetectionLane, ScalarDynamicLane, ScalarStaticLane,
    SimdDynamicLane, SimdStaticLane, StaticDetectionLane,
};
use horde_lanes::resolve_lane::{PushApartResolveLane, ResolveLane};
use horde_telemetry::{
    CounterHandle, FrameTimes, GaugeHandle, HistogramHandle, MetricsRegistry, PhaseTimings,
};
use rand::RngCore;

/// Metric namespace of the collision agent.
pub const METRICS_NAMESPACE: &str = "collision";

/// Histogram bounds for phase durations, in milliseconds.
const PHASE_BUCKETS_MS: [f64; 7] = [0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 16.0];

/// Holds telemetry handles for the collision agent.
struct CollisionMetrics {
    registry: MetricsRegistry,
    frames: CounterHandle,
    live_characters: GaugeHandle,
    static_contacts: GaugeHandle,
    dynamic_contacts: GaugeHandle,
    setup_ms: HistogramHandle,
    static_ms: HistogramHandle,
    dynamic_ms: HistogramHandle,
    resolve_ms: HistogramHandle,
}

impl CollisionMetrics {
    fn register(registry: &MetricsRegistry, tier: DetectionTier) -> HordeResult<Self> {
        let (static_contacts, dynamic_contacts) = Self::contact_gauges(registry, tier)?;
        let histogram = |name: &str, description: &str| {
            registry.register_histogram(
                METRICS_NAMESPACE,
                name,
                description,
                "ms",
                PHASE_BUCKETS_MS.to_vec(),
            )
        };

        Ok(Self {
            registry: registry.clone(),
            frames: registry.register_counter(METRICS_NAMESPACE, "frames", "Frames stepped")?,
            live_characters: registry.register_gauge(
                METRICS_NAMESPACE,
                "live_characters",
                "Characters submitted in the last frame",
                "count",
            )?,
            static_contacts,
            dynamic_contacts,
            setup_ms: histogram("setup_ms", "Layout build time")?,
            static_ms: histogram("static_ms", "Static detection time")?,
            dynamic_ms: histogram("dynamic_ms", "Dynamic detection time")?,
            resolve_ms: histogram("resolve_ms", "Resolve time")?,
        })
    }

    /// Contact gauges are labelled with the tier that produced the counts.
    fn contact_gauges(
        registry: &MetricsRegistry,
        tier: DetectionTier,
    ) -> HordeResult<(GaugeHandle, GaugeHandle)> {
        let tier_label = || vec![("tier".to_string(), tier.to_string())];
        let static_contacts = registry.register_gauge_with_labels(
            METRICS_NAMESPACE,
            "static_contacts",
            "Character/wall overlaps in the last frame",
            "count",
            tier_label(),
        )?;
        let dynamic_contacts = registry.register_gauge_with_labels(
            METRICS_NAMESPACE,
            "dynamic_contacts",
            "Character/character overlaps in the last frame",
            "count",
            tier_label(),
        )?;
        Ok((static_contacts, dynamic_contacts))
    }

    /// Moves the contact gauges to the `tier` label and drops the old series.
    fn retag(&mut self, tier: DetectionTier) -> HordeResult<()> {
        let (static_contacts, dynamic_contacts) = Self::contact_gauges(&self.registry, tier)?;
        let old_static = std::mem::replace(&mut self.static_contacts, static_contacts);
        let old_dynamic = std::mem::replace(&mut self.dynamic_contacts, dynamic_contacts);
        self.registry.unregister(old_static.id())?;
        self.registry.unregister(old_dynamic.id())?;
        Ok(())
    }

    fn record(&self, report: &FrameReport) {
        let ms = |d: std::time::Duration| d.as_secs_f64() * 1000.0;
        let results = [
            self.frames.increment().map(|_| ()),
            self.live_characters.set(report.characters as f64),
            self.static_contacts.set(report.static_contacts as f64),
            self.dynamic_contacts.set(report.dynamic_contacts as f64),
            self.setup_ms.observe(ms(report.times.setup)),
            self.static_ms.observe(ms(report.times.static_detection)),
            self.dynamic_ms.observe(ms(report.times.dynamic_detection)),
            self.resolve_ms.observe(ms(report.times.resolve)),
        ];
        for result in results {
            if let Err(e) = result {
                log::warn!("CollisionAgent: failed to record metric: {e}");
            }
        }
    }
}

/// What one call to [`CollisionAgent::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// The tier that ran.
    pub tier: DetectionTier,
    /// Live characters this frame.
    pub characters: usize,
    /// Walls tested against.
    pub walls: usize,
    /// Overlapping character/wall pairs found before resolution.
    pub static_contacts: usize,
    /// Overlapping character pairs found before resolution.
    pub dynamic_contacts: usize,
    /// Time spent in each phase.
    pub times: FrameTimes,
}

/// The agent responsible for detecting and resolving crowd collisions.
///
/// It keeps every detection tier registered, resolves the configured tier
/// once against the detected vector unit, and runs
/// layout, static detection, dynamic detection and resolution in that order
/// on every [`step`](Self::step).
pub struct CollisionAgent {
    config: CollisionConfig,
    capability: SimdCapability,
    walls: Vec<Wall>,
    /// Available static detection lanes, one per tier.
    static_lanes: Vec<Box<dyn StaticDetectionLane>>,
    /// Available dynamic detection lanes, one per tier.
    dynamic_lanes: Vec<Box<dyn DynamicDetectionLane>>,
    resolver: Box<dyn ResolveLane>,
    /// The tier actually run, never `Auto`.
    tier: DetectionTier,
    arena: FrameArena,
    timings: PhaseTimings,
    frame_count: u64,
    metrics: Option<CollisionMetrics>,
}

impl CollisionAgent {
    /// Creates an agent for a fixed set of walls, probing the host CPU.
    pub fn new(config: CollisionConfig, walls: Vec<Wall>) -> HordeResult<Self> {
        Self::with_capability(config, walls, SimdCapability::detect())
    }

    /// Creates an agent with an already detected vector capability.
    pub fn with_capability(
        config: CollisionConfig,
        walls: Vec<Wall>,
        capability: SimdCapability,
    ) -> HordeResult<Self> {
        config.validate()?;

        let static_lanes: Vec<Box<dyn StaticDetectionLane>> = vec![
            Box::new(ScalarStaticLane::new()),
            Box::new(BatchStaticLane::new()),
            Box::new(SimdStaticLane::new(capability)),
        ];
        let dynamic_lanes: Vec<Box<dyn DynamicDetectionLane>> = vec![
            Box::new(ScalarDynamicLane::new()),
            Box::new(BatchDynamicLane::new()),
            Box::new(SimdDynamicLane::new(capability)),
        ];

        let mut agent = Self {
            arena: FrameArena::with_capacity(config.max_characters, walls.len()),
            timings: PhaseTimings::new(config.timing_warmup_frames),
            resolver: Box::new(PushApartResolveLane::from_config(&config)),
            tier: DetectionTier::Scalar,
            frame_count: 0,
            metrics: None,
            static_lanes,
            dynamic_lanes,
            capability,
            walls,
            config,
        };
        agent.tier = agent.resolve_tier(agent.config.tier)?;

        log::info!(
            "CollisionAgent: {} characters max, {} walls, {} tier requested, running {} ({})",
            agent.config.max_characters,
            agent.walls.len(),
            agent.config.tier,
            agent.tier,
            agent.capability,
        );
        Ok(agent)
    }

    /// Attaches a metrics registry to the agent for observability.
    pub fn with_telemetry(mut self, registry: &MetricsRegistry) -> HordeResult<Self> {
        self.metrics = Some(CollisionMetrics::register(registry, self.tier)?);
        Ok(self)
    }

    /// Switches to another tier, applying the same fallback rules as construction.
    pub fn set_tier(&mut self, requested: DetectionTier) -> HordeResult<()> {
        let tier = self.resolve_tier(requested)?;
        if tier != self.tier {
            if let Some(metrics) = &mut self.metrics {
                metrics.retag(tier)?;
            }
        }
        self.tier = tier;
        log::info!("CollisionAgent: {requested} tier requested, running {}", self.tier);
        Ok(())
    }

    /// Runs one collision frame over `characters` and moves them apart.
    ///
    /// Characters beyond the configured capacity are rejected before any
    /// buffer is touched.
    pub fn step(
        &mut self,
        characters: &mut [Character],
        rng: &mut dyn RngCore,
    ) -> HordeResult<FrameReport> {
        let live = characters.len();
        if live > self.config.max_characters {
            return Err(HordeError::CapacityExceeded {
                live,
                capacity: self.config.max_characters,
            });
        }

        let tier = self.tier;
        let static_lane = lane_for_tier(&self.static_lanes, tier)
            .ok_or_else(|| missing_lane("static detection", tier))?;
        let dynamic_lane = lane_for_tier(&self.dynamic_lanes, tier)
            .ok_or_else(|| missing_lane("dynamic detection", tier))?;
        debug_assert_eq!(static_lane.layout_kind(), dynamic_lane.layout_kind());

        let arena = &mut self.arena;
        let mut stopwatch = Stopwatch::new();

        arena.reset_matrices(live, self.walls.len());
        let layout = arena
            .layouts
            .build(characters, &self.walls, static_lane.layout_kind());
        let setup = stopwatch.lap();

        static_lane
            .detect(&layout, &mut arena.statics)
            .map_err(|source| HordeError::Lane {
                lane: static_lane.strategy_name(),
                source,
            })?;
        let static_detection = stopwatch.lap();

        dynamic_lane
            .detect(&layout, &mut arena.dynamics)
            .map_err(|source| HordeError::Lane {
                lane: dynamic_lane.strategy_name(),
                source,
            })?;
        let dynamic_detection = stopwatch.lap();

        let static_contacts = arena.statics.count();
        let dynamic_contacts = arena.dynamics.count();

        self.resolver
            .resolve(characters, &self.walls, &arena.statics, &arena.dynamics, rng)
            .map_err(|source| HordeError::Lane {
                lane: self.resolver.strategy_name(),
                source,
            })?;
        let resolve = stopwatch.lap();

        let report = FrameReport {
            tier,
            characters: live,
            walls: self.walls.len(),
            static_contacts,
            dynamic_contacts,
            times: FrameTimes {
                setup,
                static_detection,
                dynamic_detection,
                resolve,
            },
        };

        self.timings.record(&report.times);
        self.frame_count += 1;
        if let Some(metrics) = &self.metrics {
            metrics.record(&report);
        }
        log::trace!(
            "CollisionAgent: frame {} with {} characters, {} wall and {} character contacts",
            self.frame_count,
            live,
            static_contacts,
            dynamic_contacts,
        );
        Ok(report)
    }

    /// The tier that runs on every step, never `Auto`.
    pub fn effective_tier(&self) -> DetectionTier {
        self.tier
    }

    /// The vector capability the SIMD lanes were built with.
    pub fn capability(&self) -> SimdCapability {
        self.capability
    }

    /// Character/wall results of the last step, before resolution moved anyone.
    pub fn static_collisions(&self) -> &StaticCollisionMatrix {
        &self.arena.statics
    }

    /// Character/character results of the last step, before resolution moved anyone.
    pub fn dynamic_collisions(&self) -> &DynamicCollisionMatrix {
        &self.arena.dynamics
    }

    /// Averaged phase timings since construction.
    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    /// The validated configuration.
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// The fixed walls.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Number of successful steps.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Strategy names of the static and dynamic lanes that currently run.
    pub fn active_strategies(&self) -> (&'static str, &'static str) {
        (
            lane_for_tier(&self.static_lanes, self.tier).map_or("none", |l| l.strategy_name()),
            lane_for_tier(&self.dynamic_lanes, self.tier).map_or("none", |l| l.strategy_name()),
        )
    }

    fn resolve_tier(&self, requested: DetectionTier) -> HordeResult<DetectionTier> {
        let tier = match requested {
            DetectionTier::Simd if !self.capability.is_supported() => {
                log::warn!(
                    "CollisionAgent: no vector unit for the SIMD tier, falling back to Batch"
                );
                DetectionTier::Batch
            }
            DetectionTier::Auto => self.cheapest_tier()?,
            tier => tier,
        };

        if lane_for_tier(&self.static_lanes, tier).is_none() {
            return Err(missing_lane("static detection", tier));
        }
        if lane_for_tier(&self.dynamic_lanes, tier).is_none() {
            return Err(missing_lane("dynamic detection", tier));
        }
        Ok(tier)
    }

    /// The tier whose static and dynamic lanes together estimate the lowest
    /// cost at full capacity. Ties go to the lane registered first.
    fn cheapest_tier(&self) -> HordeResult<DetectionTier> {
        let workload = Workload::new(self.config.max_characters, self.walls.len());
        self.static_lanes
            .iter()
            .filter_map(|lane| {
                let tier = lane.tier()?;
                let dynamic = lane_for_tier(&self.dynamic_lanes, tier)?;
                Some((tier, lane.estimate_cost(&workload) + dynamic.estimate_cost(&workload)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(tier, _)| tier)
            .ok_or_else(|| HordeError::MissingLane("any detection tier".to_string()))
    }
}

fn lane_for_tier<L: Lane + ?Sized>(lanes: &[Box<L>], tier: DetectionTier) -> Option<&L> {
    lanes
        .iter()
        .find(|lane| lane.tier() == Some(tier))
        .map(|boxed| boxed.as_ref())
}

fn missing_lane(role: &str, tier: DetectionTier) -> HordeError {
    HordeError::MissingLane(format!("{role} at the {tier} tier"))
}
