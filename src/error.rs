// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Error Types

use chrono::NaiveDateTime;

/// Rejected duty schedules or sleep records. Raised before any simulation runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("no valid duty periods found in trip")]
    EmptySchedule,

    #[error("duty period {index} ends at {end} which is not after its start {start}")]
    InvalidDutyPeriod {
        index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("duty period {index} starts at {start} before the previous period ends at {previous_end}")]
    OverlappingDutyPeriods {
        index: usize,
        previous_end: NaiveDateTime,
        start: NaiveDateTime,
    },

    #[error("sleep period {index} ends at {end} which is not after its start {start}")]
    InvalidSleepPeriod {
        index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("sleep period {index} starts at {start} before the previous sleep ends at {previous_end}")]
    OverlappingSleepPeriods {
        index: usize,
        previous_end: NaiveDateTime,
        start: NaiveDateTime,
    },

    #[error("sleep period {index} ({start} to {end}) overlaps a duty period")]
    SleepDuringDuty {
        index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Out-of-range model parameters. Raised at validation time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be finite")]
    NotFinite { name: &'static str },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("severity thresholds must satisfy 0 < severe ({severe}) < danger ({danger}) < caution ({caution}) <= 100")]
    ThresholdOrder { severe: f64, danger: f64, caution: f64 },

    #[error("min sleep ({min} min) exceeds max sleep ({max} min)")]
    SleepDurationOrder { min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FatigueError {
    #[error("invalid schedule: {0}")]
    Input(#[from] InputError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
