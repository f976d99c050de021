// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Model Parameters

//! Physiological and operational constants for the fatigue model.
//!
//! Defaults follow the published SAFTE parameterisation (Hursh et al., 2004)
//! where one exists. Every struct is `#[serde(default)]` so a partial JSON
//! document overrides only the fields it names.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Severity;

// ---------------------------------------------------------------------------
// ModelParams
// ---------------------------------------------------------------------------

/// Complete, immutable model configuration passed into every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelParams {
    pub reservoir: ReservoirParams,
    pub circadian: CircadianParams,
    pub performance: PerformanceParams,
    pub inertia: InertiaParams,
    pub sleep: SleepParams,
    pub window: WindowParams,
    pub thresholds: SeverityThresholds,
    pub scoring: ScoringParams,
}

impl ModelParams {
    /// Check every parameter range. Called once before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reservoir.validate()?;
        self.circadian.validate()?;
        self.performance.validate()?;
        self.inertia.validate()?;
        self.sleep.validate()?;
        self.window.validate()?;
        self.thresholds.validate()?;
        self.scoring.validate()
    }
}

// ---------------------------------------------------------------------------
// ReservoirParams
// ---------------------------------------------------------------------------

/// Homeostatic sleep reservoir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservoirParams {
    /// Full reservoir capacity (units): 2880
    pub capacity: f64,
    /// Level at the start of the window, as a fraction of capacity: 0.9
    pub initial_fraction: f64,
    /// Depletion per awake minute (performance use): 0.5
    pub wake_depletion_rate: f64,
    /// Upper bound on accumulation per sleeping minute: 4.0
    pub max_sleep_rate: f64,
    /// Sleep-debt feedback constant in `1 - exp(-f * deficit)`: 0.0035
    pub sleep_debt_feedback: f64,
    /// Signed circadian modulation of sleep efficiency. Negative values make
    /// sleep most efficient near the nightly trough: -0.3
    pub sleep_modulation_amplitude: f64,
}

impl Default for ReservoirParams {
    fn default() -> Self {
        Self {
            capacity: 2880.0,
            initial_fraction: 0.9,
            wake_depletion_rate: 0.5,
            max_sleep_rate: 4.0,
            sleep_debt_feedback: 0.0035,
            sleep_modulation_amplitude: -0.3,
        }
    }
}

impl ReservoirParams {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("reservoir.capacity", self.capacity)?;
        in_range("reservoir.initial_fraction", self.initial_fraction, 0.0, 1.0)?;
        positive("reservoir.wake_depletion_rate", self.wake_depletion_rate)?;
        positive("reservoir.max_sleep_rate", self.max_sleep_rate)?;
        positive("reservoir.sleep_debt_feedback", self.sleep_debt_feedback)?;
        finite("reservoir.sleep_modulation_amplitude", self.sleep_modulation_amplitude)
    }
}

// ---------------------------------------------------------------------------
// CircadianParams
// ---------------------------------------------------------------------------

/// Dual-harmonic circadian oscillator anchored to clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircadianParams {
    /// Clock hour of the 24-hour component's peak: 18.0
    pub acrophase_hours: f64,
    /// Extra phase offset of the 12-hour harmonic: 3.0
    pub harmonic_offset_hours: f64,
    /// Relative amplitude of the 12-hour harmonic: 0.5
    pub harmonic_amplitude: f64,
}

impl Default for CircadianParams {
    fn default() -> Self {
        Self {
            acrophase_hours: 18.0,
            harmonic_offset_hours: 3.0,
            harmonic_amplitude: 0.5,
        }
    }
}

impl CircadianParams {
    fn validate(&self) -> Result<(), ConfigError> {
        in_range("circadian.acrophase_hours", self.acrophase_hours, 0.0, 24.0)?;
        in_range("circadian.harmonic_offset_hours", self.harmonic_offset_hours, -12.0, 12.0)?;
        in_range("circadian.harmonic_amplitude", self.harmonic_amplitude, 0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// PerformanceParams
// ---------------------------------------------------------------------------

/// Amplitudes of the performance rhythm, in effectiveness percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceParams {
    /// Rhythm amplitude when fully rested: 7.0
    pub fixed_amplitude: f64,
    /// Additional amplitude scaled by the reservoir deficit fraction: 5.0
    pub variable_amplitude: f64,
}

impl Default for PerformanceParams {
    fn default() -> Self {
        Self {
            fixed_amplitude: 7.0,
            variable_amplitude: 5.0,
        }
    }
}

impl PerformanceParams {
    fn validate(&self) -> Result<(), ConfigError> {
        in_range("performance.fixed_amplitude", self.fixed_amplitude, 0.0, 100.0)?;
        in_range("performance.variable_amplitude", self.variable_amplitude, 0.0, 100.0)
    }
}

// ---------------------------------------------------------------------------
// InertiaParams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaParams {
    /// Impairment at the instant of waking, in percentage points: 5.0
    pub max_inertia: f64,
    /// Decay time constant per unit of captured intensity (minutes): 30.0
    pub time_constant_minutes: f64,
    /// Inertia is zero from this many minutes after waking: 120
    pub window_minutes: i64,
    /// Floor on the captured intensity: 0.25
    pub min_intensity: f64,
}

impl Default for InertiaParams {
    fn default() -> Self {
        Self {
            max_inertia: 5.0,
            time_constant_minutes: 30.0,
            window_minutes: 120,
            min_intensity: 0.25,
        }
    }
}

impl InertiaParams {
    fn validate(&self) -> Result<(), ConfigError> {
        in_range("inertia.max_inertia", self.max_inertia, 0.0, 100.0)?;
        positive("inertia.time_constant_minutes", self.time_constant_minutes)?;
        positive("inertia.window_minutes", self.window_minutes as f64)?;
        positive("inertia.min_intensity", self.min_intensity)
    }
}

// ---------------------------------------------------------------------------
// SleepParams
// ---------------------------------------------------------------------------

/// Sleep-opportunity predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepParams {
    /// Travel between duty location and rest location (minutes): 60
    pub commute_minutes: i64,
    /// Wake-up preparation before the commute (minutes): 60
    pub prep_minutes: i64,
    /// Shorter opportunities are dropped: 60
    pub min_sleep_minutes: i64,
    /// Per-day maximum sleep: 480
    pub max_sleep_minutes: i64,
    /// Canonical nightly sleep onset (clock hour): 23
    pub anchor_hour: u32,
    /// Wakes before this clock hour are "morning" wakes: 12
    pub morning_cutoff_hour: u32,
}

impl Default for SleepParams {
    fn default() -> Self {
        Self {
            commute_minutes: 60,
            prep_minutes: 60,
            min_sleep_minutes: 60,
            max_sleep_minutes: 480,
            anchor_hour: 23,
            morning_cutoff_hour: 12,
        }
    }
}

impl SleepParams {
    fn validate(&self) -> Result<(), ConfigError> {
        in_range("sleep.commute_minutes", self.commute_minutes as f64, 0.0, 1440.0)?;
        in_range("sleep.prep_minutes", self.prep_minutes as f64, 0.0, 1440.0)?;
        positive("sleep.min_sleep_minutes", self.min_sleep_minutes as f64)?;
        in_range("sleep.max_sleep_minutes", self.max_sleep_minutes as f64, 1.0, 1440.0)?;
        if self.min_sleep_minutes > self.max_sleep_minutes {
            return Err(ConfigError::SleepDurationOrder {
                min: self.min_sleep_minutes,
                max: self.max_sleep_minutes,
            });
        }
        in_range("sleep.anchor_hour", self.anchor_hour as f64, 0.0, 23.0)?;
        in_range("sleep.morning_cutoff_hour", self.morning_cutoff_hour as f64, 0.0, 24.0)
    }
}

// ---------------------------------------------------------------------------
// WindowParams
// ---------------------------------------------------------------------------

/// Simulation window padding around the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Hours simulated before the first duty period: 12
    pub pre_trip_hours: i64,
    /// Hours simulated after the last duty period: 12
    pub post_trip_hours: i64,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            pre_trip_hours: 12,
            post_trip_hours: 12,
        }
    }
}

impl WindowParams {
    fn validate(&self) -> Result<(), ConfigError> {
        in_range("window.pre_trip_hours", self.pre_trip_hours as f64, 0.0, 168.0)?;
        in_range("window.post_trip_hours", self.post_trip_hours as f64, 0.0, 168.0)
    }
}

// ---------------------------------------------------------------------------
// SeverityThresholds
// ---------------------------------------------------------------------------

/// Effectiveness cutoffs for the three risk brackets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    /// Severe: 60
    pub severe: f64,
    /// Danger: 70
    pub danger: f64,
    /// Caution: 82
    pub caution: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            severe: 60.0,
            danger: 70.0,
            caution: 82.0,
        }
    }
}

impl SeverityThresholds {
    /// Threshold for a given bracket.
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Caution => self.caution,
            Severity::Danger => self.danger,
            Severity::Severe => self.severe,
        }
    }

    /// Most severe bracket whose threshold `effectiveness` falls under.
    pub fn classify(&self, effectiveness: f64) -> Option<Severity> {
        if effectiveness < self.severe {
            Some(Severity::Severe)
        } else if effectiveness < self.danger {
            Some(Severity::Danger)
        } else if effectiveness < self.caution {
            Some(Severity::Caution)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        finite("thresholds.severe", self.severe)?;
        finite("thresholds.danger", self.danger)?;
        finite("thresholds.caution", self.caution)?;
        let ordered = 0.0 < self.severe
            && self.severe < self.danger
            && self.danger < self.caution
            && self.caution <= 100.0;
        if !ordered {
            return Err(ConfigError::ThresholdOrder {
                severe: self.severe,
                danger: self.danger,
                caution: self.caution,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScoringParams
// ---------------------------------------------------------------------------

/// Fatigue score: a tier base keyed by the worst bracket plus a bounded bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Base when the lowest value falls under the severe threshold: 75
    pub severe_base: f64,
    /// Base for the danger bracket: 50
    pub danger_base: f64,
    /// Base for the caution bracket: 25
    pub caution_base: f64,
    /// Score added per minute spent in the worst bracket: 0.1
    pub bonus_per_minute: f64,
    /// Cap on the time bonus: 25
    pub max_bonus: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            severe_base: 75.0,
            danger_base: 50.0,
            caution_base: 25.0,
            bonus_per_minute: 0.1,
            max_bonus: 25.0,
        }
    }
}

impl ScoringParams {
    pub fn base_for(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Caution => self.caution_base,
            Severity::Danger => self.danger_base,
            Severity::Severe => self.severe_base,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        in_range("scoring.severe_base", self.severe_base, 0.0, 100.0)?;
        in_range("scoring.danger_base", self.danger_base, 0.0, 100.0)?;
        in_range("scoring.caution_base", self.caution_base, 0.0, 100.0)?;
        in_range("scoring.bonus_per_minute", self.bonus_per_minute, 0.0, 100.0)?;
        in_range("scoring.max_bonus", self.max_bonus, 0.0, 100.0)
    }
}

// ---------------------------------------------------------------------------
// Range checks
// ---------------------------------------------------------------------------

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, min, max })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
