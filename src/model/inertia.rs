// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Sleep Inertia

//! Transient impairment after waking.
//!
//! ```text
//! inertia(t) = -max_inertia · exp(-t / (intensity · time_constant))
//! ```
//!
//! `intensity` is captured once in a [`WakeEvent`] and stays fixed for the
//! whole window. Recomputing it from the live reservoir each minute makes
//! the decay rate drift.

use chrono::NaiveDateTime;

use super::params::InertiaParams;
use crate::types::WakeEvent;

/// Inertia `minutes_since_wake` after a wake event. Always `<= 0`.
pub fn sleep_inertia(minutes_since_wake: i64, captured_intensity: f64, params: &InertiaParams) -> f64 {
    if minutes_since_wake < 0 || minutes_since_wake >= params.window_minutes {
        return 0.0;
    }
    let tau = captured_intensity.max(params.min_intensity) * params.time_constant_minutes;
    -params.max_inertia * (-(minutes_since_wake as f64) / tau).exp()
}

/// Holds the most recent wake event and evaluates its decay.
#[derive(Debug, Clone, Default)]
pub struct InertiaProcess {
    wake: Option<WakeEvent>,
}

impl InertiaProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a wake event. The intensity is floored here so the stored
    /// value is the one actually used for the decay.
    pub fn on_wake(&mut self, timestamp: NaiveDateTime, intensity: f64, params: &InertiaParams) -> WakeEvent {
        let event = WakeEvent {
            timestamp,
            captured_intensity: intensity.max(params.min_intensity),
        };
        self.wake = Some(event);
        event
    }

    /// Falling asleep ends any running inertia window.
    pub fn on_sleep(&mut self) {
        self.wake = None;
    }

    /// Inertia at `t` while awake.
    pub fn value_at(&self, t: NaiveDateTime, params: &InertiaParams) -> f64 {
        match &self.wake {
            Some(event) => {
                let elapsed = (t - event.timestamp).num_minutes();
                sleep_inertia(elapsed, event.captured_intensity, params)
            }
            None => 0.0,
        }
    }
}
