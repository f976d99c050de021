// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Risk Aggregation

use chrono::NaiveDateTime;

use crate::model::{ModelParams, ScoringParams, SeverityThresholds};
use crate::types::{DutyPeriod, MetricScope, MinutesBelow, RiskLevel, Severity, SimulationStep, TripFatigueSummary};

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct Tally {
    count: u32,
    sum: f64,
    lowest: Option<(f64, NaiveDateTime)>,
    below: MinutesBelow,
}

impl Tally {
    fn add(&mut self, step: &SimulationStep, thresholds: &SeverityThresholds) {
        let value = step.effectiveness;
        self.count += 1;
        self.sum += value;
        match self.lowest {
            Some((lowest, _)) if value >= lowest => {}
            _ => self.lowest = Some((value, step.timestamp)),
        }
        if value < thresholds.caution {
            self.below.caution += 1;
        }
        if value < thresholds.danger {
            self.below.danger += 1;
        }
        if value < thresholds.severe {
            self.below.severe += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// RiskAccumulator
// ---------------------------------------------------------------------------

/// Single-pass fold of simulation steps into a [`TripFatigueSummary`].
///
/// Effectiveness metrics come from on-duty minutes. A run with no on-duty
/// minute falls back to every minute; the summary's `scope` says which. The
/// window-wide minimum is reported alongside either way.
#[derive(Debug, Clone)]
pub struct RiskAccumulator {
    thresholds: SeverityThresholds,
    scoring: ScoringParams,
    on_duty: Tally,
    all: Tally,
    sleep_minutes: u32,
}

impl RiskAccumulator {
    pub fn new(thresholds: &SeverityThresholds, scoring: &ScoringParams) -> Self {
        Self {
            thresholds: thresholds.clone(),
            scoring: scoring.clone(),
            on_duty: Tally::default(),
            all: Tally::default(),
            sleep_minutes: 0,
        }
    }

    pub fn record(&mut self, step: &SimulationStep) {
        self.all.add(step, &self.thresholds);
        if step.is_on_duty {
            self.on_duty.add(step, &self.thresholds);
        }
        if step.is_asleep {
            self.sleep_minutes += 1;
        }
    }

    /// `None` when nothing was recorded.
    pub fn finish(self, time_away_from_base_minutes: i64) -> Option<TripFatigueSummary> {
        let duty_minutes = self.on_duty.count;
        let (scope, tally) = if duty_minutes > 0 {
            (MetricScope::OnDuty, &self.on_duty)
        } else {
            (MetricScope::AllMinutes, &self.all)
        };
        let (lowest, lowest_at) = tally.lowest?;
        let (window_lowest, window_lowest_at) = self.all.lowest?;

        let worst_severity = self.thresholds.classify(lowest);
        let fatigue_score = fatigue_score(lowest, worst_severity, &tally.below, &self.thresholds, &self.scoring);

        Some(TripFatigueSummary {
            scope,
            lowest_effectiveness: lowest,
            lowest_effectiveness_at: lowest_at,
            average_effectiveness: tally.sum / f64::from(tally.count),
            minutes_below: tally.below,
            worst_severity,
            fatigue_score,
            risk_level: RiskLevel::from_score(fatigue_score),
            window_lowest_effectiveness: window_lowest,
            window_lowest_effectiveness_at: window_lowest_at,
            duty_minutes,
            sleep_minutes: self.sleep_minutes,
            time_away_from_base_minutes,
        })
    }
}

/// Summarize a finished step series for the trip it came from.
pub fn summarize(
    steps: &[SimulationStep],
    duty_periods: &[DutyPeriod],
    params: &ModelParams,
) -> Option<TripFatigueSummary> {
    let mut acc = RiskAccumulator::new(&params.thresholds, &params.scoring);
    for step in steps {
        acc.record(step);
    }
    acc.finish(time_away_from_base(duty_periods))
}

/// First duty start to last duty end, in minutes. Zero for an empty trip.
pub fn time_away_from_base(duty_periods: &[DutyPeriod]) -> i64 {
    let first = duty_periods.iter().map(|d| d.start).min();
    let last = duty_periods.iter().map(|d| d.end).max();
    match (first, last) {
        (Some(first), Some(last)) => (last - first).num_minutes(),
        _ => 0,
    }
}

/// 0-100 score: tier base of the worst bracket plus a capped time bonus.
///
/// Without any bracket the score grades linearly from 0 at 100% up to just
/// under the caution base at the caution threshold.
pub fn fatigue_score(
    lowest: f64,
    worst: Option<Severity>,
    below: &MinutesBelow,
    thresholds: &SeverityThresholds,
    scoring: &ScoringParams,
) -> f64 {
    match worst {
        Some(severity) => {
            let minutes = f64::from(below.for_severity(severity));
            let bonus = (scoring.bonus_per_minute * minutes).min(scoring.max_bonus);
            (scoring.base_for(severity) + bonus).min(100.0)
        }
        None => {
            let headroom = 100.0 - thresholds.caution;
            let graded = if headroom > 0.0 {
                scoring.caution_base * (100.0 - lowest) / headroom
            } else {
                0.0
            };
            let ceiling = (scoring.caution_base - 0.1).max(0.0);
            graded.clamp(0.0, ceiling)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityState;
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("test: valid timestamp")
    }

    fn step(minute: i64, effectiveness: f64, on_duty: bool, asleep: bool) -> SimulationStep {
        SimulationStep {
            timestamp: t0() + Duration::minutes(minute),
            reservoir_level: 2500.0,
            circadian_component: 0.0,
            performance_rhythm: 0.0,
            sleep_inertia: 0.0,
            effectiveness,
            is_asleep: asleep,
            is_on_duty: on_duty,
            state: ActivityState::classify(asleep, on_duty),
        }
    }

    fn run(steps: &[SimulationStep]) -> Option<TripFatigueSummary> {
        let params = ModelParams::default();
        let mut acc = RiskAccumulator::new(&params.thresholds, &params.scoring);
        steps.iter().for_each(|s| acc.record(s));
        acc.finish(0)
    }

    #[test]
    fn nothing_recorded_yields_none() {
        assert!(run(&[]).is_none());
    }

    #[test]
    fn counts_minutes_below_each_threshold() {
        let steps: Vec<_> = [90.0, 80.0, 69.0, 59.0, 59.5]
            .iter()
            .enumerate()
            .map(|(i, &e)| step(i as i64, e, true, false))
            .collect();
        let summary = run(&steps).expect("test: summary");
        assert_eq!(summary.minutes_below, MinutesBelow { caution: 4, danger: 3, severe: 2 });
        assert_eq!(summary.lowest_effectiveness, 59.0);
        assert_eq!(summary.lowest_effectiveness_at, t0() + Duration::minutes(3));
        assert_eq!(summary.worst_severity, Some(Severity::Severe));
        assert!((summary.average_effectiveness - 71.5).abs() < 1e-9);
    }

    #[test]
    fn first_minimum_wins() {
        let steps = [step(0, 70.0, true, false), step(1, 65.0, true, false), step(2, 65.0, true, false)];
        let summary = run(&steps).expect("test: summary");
        assert_eq!(summary.lowest_effectiveness_at, t0() + Duration::minutes(1));
    }

    #[test]
    fn off_duty_minutes_ignored_when_on_duty_present() {
        let steps = [
            step(0, 40.0, false, false),
            step(1, 30.0, false, true),
            step(2, 90.0, true, false),
            step(3, 88.0, true, false),
        ];
        let summary = run(&steps).expect("test: summary");
        assert_eq!(summary.scope, MetricScope::OnDuty);
        assert_eq!(summary.lowest_effectiveness, 88.0);
        assert_eq!(summary.window_lowest_effectiveness, 30.0);
        assert_eq!(summary.window_lowest_effectiveness_at, t0() + Duration::minutes(1));
        assert_eq!(summary.duty_minutes, 2);
        assert_eq!(summary.sleep_minutes, 1);
        assert_eq!(summary.worst_severity, None);
        assert_eq!(summary.risk_level, RiskLevel::Low);
    }

    #[test]
    fn falls_back_to_all_minutes_without_duty() {
        let steps = [step(0, 85.0, false, false), step(1, 65.0, false, false)];
        let summary = run(&steps).expect("test: summary");
        assert_eq!(summary.duty_minutes, 0);
        assert_eq!(summary.scope, MetricScope::AllMinutes);
        assert_eq!(summary.lowest_effectiveness, 65.0);
        assert_eq!(summary.window_lowest_effectiveness, 65.0);
        assert_eq!(summary.worst_severity, Some(Severity::Danger));
    }

    #[test]
    fn score_is_tier_base_plus_bonus() {
        let t = SeverityThresholds::default();
        let s = ScoringParams::default();
        let below = MinutesBelow { caution: 300, danger: 120, severe: 0 };
        assert!((fatigue_score(65.0, Some(Severity::Danger), &below, &t, &s) - 62.0).abs() < 1e-9);

        let capped = MinutesBelow { caution: 600, danger: 600, severe: 600 };
        assert_eq!(fatigue_score(40.0, Some(Severity::Severe), &capped, &t, &s), 100.0);
        assert_eq!(fatigue_score(75.0, Some(Severity::Caution), &capped, &t, &s), 50.0);
    }

    #[test]
    fn graded_score_stays_below_caution_tier() {
        let t = SeverityThresholds::default();
        let s = ScoringParams::default();
        let none = MinutesBelow::default();
        assert_eq!(fatigue_score(100.0, None, &none, &t, &s), 0.0);
        let near = fatigue_score(82.0, None, &none, &t, &s);
        assert!(near < s.caution_base);
        assert_eq!(RiskLevel::from_score(near), RiskLevel::Low);
        let mid = fatigue_score(91.0, None, &none, &t, &s);
        assert!((mid - 12.5).abs() < 1e-9);
    }

    #[test]
    fn risk_level_follows_score() {
        let steps: Vec<_> = (0..300).map(|i| step(i, 55.0, true, false)).collect();
        let summary = run(&steps).expect("test: summary");
        assert_eq!(summary.fatigue_score, 100.0);
        assert_eq!(summary.risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn tafb_spans_first_start_to_last_end() {
        let duties = [
            DutyPeriod::new(t0() + Duration::hours(30), t0() + Duration::hours(38)),
            DutyPeriod::new(t0() + Duration::hours(6), t0() + Duration::hours(14)),
        ];
        assert_eq!(time_away_from_base(&duties), 32 * 60);
        assert_eq!(time_away_from_base(&[]), 0);
    }
}
