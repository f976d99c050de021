// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Effectiveness

use super::params::{PerformanceParams, ReservoirParams};

/// Circadian swing in percentage points, amplified by sleep debt.
pub fn performance_rhythm(
    reservoir_level: f64,
    circadian: f64,
    reservoir: &ReservoirParams,
    performance: &PerformanceParams,
) -> f64 {
    let deficit_fraction = ((reservoir.capacity - reservoir_level) / reservoir.capacity).clamp(0.0, 1.0);
    (performance.fixed_amplitude + performance.variable_amplitude * deficit_fraction) * circadian
}

/// Cognitive effectiveness, clamped to `[0, 100]`.
///
/// The raw sum exceeds 100 at a well-rested circadian peak; that is clamped,
/// not treated as an error.
pub fn effectiveness(reservoir_level: f64, rhythm: f64, inertia: f64, reservoir: &ReservoirParams) -> f64 {
    let raw = 100.0 * (reservoir_level / reservoir.capacity) + rhythm + inertia;
    raw.clamp(0.0, 100.0)
}
