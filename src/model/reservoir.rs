// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Homeostatic Reservoir

//! Sleep-debt reservoir, updated once per simulated minute.
//!
//! Awake, the reservoir drains at a fixed performance-use rate. Asleep, it
//! refills through an exponential-saturation term:
//!
//! ```text
//! rate = max_rate · (1 - exp(-f · deficit)) · max(0, 1 + a · c)
//! ```
//!
//! Every factor is non-negative, so sleep can never drain the reservoir.

use super::params::ReservoirParams;

/// Sleep accumulation per minute at `level`. Always `>= 0`.
pub fn sleep_accumulation_rate(level: f64, circadian: f64, params: &ReservoirParams) -> f64 {
    params.max_sleep_rate * sleep_intensity(level, circadian, params)
}

/// Circadian-modulated sleep propensity, normalised to the maximum rate.
///
/// Near 1 when the reservoir is empty at the circadian trough, 0 when full.
pub fn sleep_intensity(level: f64, circadian: f64, params: &ReservoirParams) -> f64 {
    let deficit = (params.capacity - level).clamp(0.0, params.capacity);
    let saturation = 1.0 - (-params.sleep_debt_feedback * deficit).exp();
    let modulation = (1.0 + params.sleep_modulation_amplitude * circadian).max(0.0);
    saturation * modulation
}

/// Reservoir level one minute later, clamped to `[0, capacity]`.
pub fn next_reservoir(prev_level: f64, is_asleep: bool, circadian: f64, params: &ReservoirParams) -> f64 {
    let next = if is_asleep {
        prev_level + sleep_accumulation_rate(prev_level, circadian, params)
    } else {
        prev_level - params.wake_depletion_rate
    };
    next.clamp(0.0, params.capacity)
}
