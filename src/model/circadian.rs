// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Circadian Oscillator

//! Dual-harmonic circadian oscillator.
//!
//! ```text
//! c(h) = cos(2π(h - p) / 24) + β · cos(4π(h - p - p') / 24)
//! ```
//!
//! `h` is the local clock hour, never elapsed simulation time, so the same
//! clock time always yields the same value whatever date the run starts on.

use std::f64::consts::PI;

use chrono::{NaiveDateTime, Timelike};

use super::params::CircadianParams;

impl CircadianParams {
    /// Oscillator value at a fractional clock hour.
    pub fn evaluate(&self, time_of_day_hours: f64) -> f64 {
        let h = time_of_day_hours.rem_euclid(24.0);
        let primary = (2.0 * PI * (h - self.acrophase_hours) / 24.0).cos();
        let harmonic = (4.0 * PI * (h - self.acrophase_hours - self.harmonic_offset_hours) / 24.0).cos();
        primary + self.harmonic_amplitude * harmonic
    }
}

/// Circadian component with default parameters: trough near 04:00, peak near 20:00.
pub fn circadian(time_of_day_hours: f64) -> f64 {
    CircadianParams::default().evaluate(time_of_day_hours)
}

/// Fractional local clock hour in `[0, 24)`.
pub fn time_of_day_hours(t: &NaiveDateTime) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0
}
