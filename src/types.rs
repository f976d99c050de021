// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Type Definitions

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ─── Duty Period ─────────────────────────────────────────────────────────────

/// One duty period in local wall-clock time, as resolved by the upstream parser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DutyPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DutyPeriod {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

// ─── Sleep Period ────────────────────────────────────────────────────────────

/// A predicted sleep opportunity. Always lies in a gap between duty periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SleepPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SleepPeriod {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, duty: &DutyPeriod) -> bool {
        self.start < duty.end && duty.start < self.end
    }
}

// ─── Activity State ──────────────────────────────────────────────────────────

/// Per-minute state of the crew member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    AwakeOnDuty,
    #[default]
    AwakeOffDuty,
    Asleep,
}

impl ActivityState {
    pub fn classify(is_asleep: bool, is_on_duty: bool) -> Self {
        if is_asleep {
            Self::Asleep
        } else if is_on_duty {
            Self::AwakeOnDuty
        } else {
            Self::AwakeOffDuty
        }
    }

    pub fn is_asleep(&self) -> bool {
        matches!(self, Self::Asleep)
    }
}

// ─── Wake Event ──────────────────────────────────────────────────────────────

/// Emitted on every Asleep → awake transition. The intensity is captured once
/// and held for the whole inertia decay window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WakeEvent {
    pub timestamp: NaiveDateTime,
    pub captured_intensity: f64,
}

// ─── Simulation Step ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationStep {
    pub timestamp: NaiveDateTime,
    pub reservoir_level: f64,
    pub circadian_component: f64,
    pub performance_rhythm: f64,
    pub sleep_inertia: f64,
    pub effectiveness: f64,
    pub is_asleep: bool,
    pub is_on_duty: bool,
    pub state: ActivityState,
}

// ─── Severity & Risk Level ───────────────────────────────────────────────────

/// Effectiveness brackets, ordered from mildest to worst.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Caution,
    Danger,
    Severe,
}

/// Qualitative label derived from the fatigue score by fixed cutoffs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::VeryHigh
        } else if score >= 50.0 {
            Self::High
        } else if score >= 25.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY HIGH",
        }
    }
}

// ─── Trip Summary ────────────────────────────────────────────────────────────

/// Minutes spent below each severity threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MinutesBelow {
    pub caution: u32,
    pub danger: u32,
    pub severe: u32,
}

impl MinutesBelow {
    pub fn for_severity(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Caution => self.caution,
            Severity::Danger => self.danger,
            Severity::Severe => self.severe,
        }
    }
}

/// Which minutes the effectiveness metrics of a summary were taken from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricScope {
    OnDuty,
    /// The trip had no on-duty minute inside the window.
    AllMinutes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripFatigueSummary {
    /// Minutes behind `lowest_effectiveness`, `average_effectiveness`,
    /// `minutes_below` and the score.
    pub scope: MetricScope,
    pub lowest_effectiveness: f64,
    pub lowest_effectiveness_at: NaiveDateTime,
    pub average_effectiveness: f64,
    pub minutes_below: MinutesBelow,
    pub worst_severity: Option<Severity>,
    pub fatigue_score: f64,
    pub risk_level: RiskLevel,
    /// Lowest effectiveness over every simulated minute, on duty or not.
    pub window_lowest_effectiveness: f64,
    pub window_lowest_effectiveness_at: NaiveDateTime,
    pub duty_minutes: u32,
    pub sleep_minutes: u32,
    /// First duty start to last duty end (TAFB). Reporting only.
    pub time_away_from_base_minutes: i64,
}

// ─── SimulationResult ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub sleep_periods: Vec<SleepPeriod>,
    pub steps: Vec<SimulationStep>,
    pub summary: TripFatigueSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("test: valid timestamp")
    }

    #[test]
    fn durations_in_whole_minutes() {
        let duty = DutyPeriod::new(at(8, 0), at(16, 0));
        assert_eq!(duty.duration_minutes(), 480);
        let sleep = SleepPeriod { start: at(0, 0), end: at(7, 30) };
        assert_eq!(sleep.duration_minutes(), 450);
    }

    #[test]
    fn abutting_sleep_does_not_overlap() {
        let duty = DutyPeriod::new(at(8, 0), at(16, 0));
        let before = SleepPeriod { start: at(0, 0), end: at(8, 0) };
        let inside = SleepPeriod { start: at(15, 0), end: at(17, 0) };
        assert!(!before.overlaps(&duty));
        assert!(inside.overlaps(&duty));
    }

    #[test]
    fn sleep_takes_precedence_in_classification() {
        assert_eq!(ActivityState::classify(true, true), ActivityState::Asleep);
        assert_eq!(ActivityState::classify(false, true), ActivityState::AwakeOnDuty);
        assert_eq!(ActivityState::classify(false, false), ActivityState::AwakeOffDuty);
        assert_eq!(ActivityState::default(), ActivityState::AwakeOffDuty);
    }

    #[test]
    fn risk_level_cutoffs() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(24.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::VeryHigh.label(), "VERY HIGH");
    }

    #[test]
    fn severity_ordering_worst_last() {
        assert!(Severity::Severe > Severity::Danger);
        assert!(Severity::Danger > Severity::Caution);
    }
}
