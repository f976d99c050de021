// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Crew Fatigue Simulation Engine - Simulation Core

use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use crate::error::{ConfigError, FatigueError, InputError};
use crate::model::{
    effectiveness, next_reservoir, performance_rhythm, sleep_intensity, time_of_day_hours, InertiaProcess,
    ModelParams, WindowParams,
};
use crate::risk::{time_away_from_base, RiskAccumulator};
use crate::schedule::{validate_schedule, validate_sleep, IntervalCursor};
use crate::sleep;
use crate::types::*;

// ─── FatigueSimulator struct ─────────────────────────────────────────────────

/// Reusable simulator holding one validated parameter set.
#[wasm_bindgen]
pub struct FatigueSimulator {
    pub(crate) params: ModelParams,
}

impl Default for FatigueSimulator {
    fn default() -> Self {
        Self {
            params: ModelParams::default(),
        }
    }
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl FatigueSimulator {
    pub fn with_params(params: ModelParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn run(&self, duty_periods: &[DutyPeriod]) -> Result<SimulationResult, FatigueError> {
        simulate(duty_periods, &self.params)
    }

    pub fn run_with_sleep(
        &self,
        duty_periods: &[DutyPeriod],
        sleep_periods: &[SleepPeriod],
    ) -> Result<SimulationResult, FatigueError> {
        simulate_with_sleep(duty_periods, sleep_periods, &self.params)
    }

    /// Sleep prediction alone, after the same schedule validation as `run`.
    pub fn predict_sleep(&self, duty_periods: &[DutyPeriod]) -> Result<Vec<SleepPeriod>, FatigueError> {
        let duties = validate_schedule(duty_periods)?;
        Ok(sleep::predict_sleep(&duties, &self.params.sleep))
    }

    pub fn run_batch(&self, trips: &[Vec<DutyPeriod>]) -> Vec<Result<SimulationResult, FatigueError>> {
        simulate_batch(trips, &self.params)
    }
}

// ─── Single Run ──────────────────────────────────────────────────────────────

/// Simulate one trip minute by minute.
///
/// Parameters and schedule are validated first; a rejected input returns no
/// partial result.
pub fn simulate(duty_periods: &[DutyPeriod], params: &ModelParams) -> Result<SimulationResult, FatigueError> {
    params.validate()?;
    let duties = validate_schedule(duty_periods)?;
    let sleep_periods = sleep::predict_sleep(&duties, &params.sleep);
    run_validated(duties, sleep_periods, params)
}

/// Simulate one trip against a known sleep record instead of predicted sleep.
///
/// An empty record means the crew member stays awake for the whole window.
pub fn simulate_with_sleep(
    duty_periods: &[DutyPeriod],
    sleep_periods: &[SleepPeriod],
    params: &ModelParams,
) -> Result<SimulationResult, FatigueError> {
    params.validate()?;
    let duties = validate_schedule(duty_periods)?;
    let sleep_periods = validate_sleep(sleep_periods, &duties)?;
    run_validated(duties, sleep_periods, params)
}

fn run_validated(
    duties: Vec<DutyPeriod>,
    sleep_periods: Vec<SleepPeriod>,
    params: &ModelParams,
) -> Result<SimulationResult, FatigueError> {
    let (start, end) = simulation_window(&duties, &sleep_periods, &params.window).ok_or(InputError::EmptySchedule)?;

    info!(
        duty_periods = duties.len(),
        sleep_periods = sleep_periods.len(),
        window_start = %start,
        window_end = %end,
        "simulation started"
    );

    let mut risk = RiskAccumulator::new(&params.thresholds, &params.scoring);
    let steps = run_steps(&duties, &sleep_periods, start, end, params, &mut risk);
    let summary = risk
        .finish(time_away_from_base(&duties))
        .ok_or(InputError::EmptySchedule)?;

    info!(
        steps = steps.len(),
        lowest = summary.lowest_effectiveness,
        lowest_at = %summary.lowest_effectiveness_at,
        score = summary.fatigue_score,
        risk = summary.risk_level.label(),
        "simulation finished"
    );

    Ok(SimulationResult {
        sleep_periods,
        steps,
        summary,
    })
}

/// `[start, end)` of the time loop: covers the pre-trip padding and the
/// first predicted sleep, and runs past the last duty period.
fn simulation_window(
    duties: &[DutyPeriod],
    sleeps: &[SleepPeriod],
    window: &WindowParams,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = duties.first()?;
    let last = duties.last()?;
    let mut start = first.start - Duration::hours(window.pre_trip_hours);
    if let Some(sleep) = sleeps.first() {
        start = start.min(sleep.start);
    }
    let end = last.end + Duration::hours(window.post_trip_hours);
    Some((floor_to_minute(start), end))
}

fn floor_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
}

fn run_steps(
    duties: &[DutyPeriod],
    sleeps: &[SleepPeriod],
    start: NaiveDateTime,
    end: NaiveDateTime,
    params: &ModelParams,
    risk: &mut RiskAccumulator,
) -> Vec<SimulationStep> {
    let capacity = (end - start).num_minutes().max(0) as usize;
    let mut steps = Vec::with_capacity(capacity);

    let mut on_duty = IntervalCursor::new(duties);
    let mut asleep = IntervalCursor::new(sleeps);
    let mut inertia = InertiaProcess::new();
    let mut level = params.reservoir.initial_fraction * params.reservoir.capacity;
    let mut previous = ActivityState::default();

    let mut t = start;
    while t < end {
        let is_asleep = asleep.contains(t);
        let is_on_duty = on_duty.contains(t);
        let state = ActivityState::classify(is_asleep, is_on_duty);
        let circadian = params.circadian.evaluate(time_of_day_hours(&t));

        match (previous.is_asleep(), is_asleep) {
            (false, true) => inertia.on_sleep(),
            (true, false) => {
                let intensity = sleep_intensity(level, circadian, &params.reservoir);
                let event = inertia.on_wake(t, intensity, &params.inertia);
                debug!(at = %event.timestamp, intensity = event.captured_intensity, "wake");
            }
            _ => {}
        }

        let sleep_inertia = if is_asleep {
            0.0
        } else {
            inertia.value_at(t, &params.inertia)
        };
        let rhythm = performance_rhythm(level, circadian, &params.reservoir, &params.performance);

        let step = SimulationStep {
            timestamp: t,
            reservoir_level: level,
            circadian_component: circadian,
            performance_rhythm: rhythm,
            sleep_inertia,
            effectiveness: effectiveness(level, rhythm, sleep_inertia, &params.reservoir),
            is_asleep,
            is_on_duty,
            state,
        };
        risk.record(&step);
        steps.push(step);

        level = next_reservoir(level, is_asleep, circadian, &params.reservoir);
        previous = state;
        t += Duration::minutes(1);
    }
    steps
}

// ─── Batch ───────────────────────────────────────────────────────────────────

/// Simulate independent trips. Results keep the input order; a failing trip
/// does not affect the others.
pub fn simulate_batch(trips: &[Vec<DutyPeriod>], params: &ModelParams) -> Vec<Result<SimulationResult, FatigueError>> {
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        use rayon::prelude::*;
        trips.par_iter().map(|trip| simulate(trip, params)).collect()
    }
    #[cfg(not(all(feature = "parallel", not(target_arch = "wasm32"))))]
    {
        trips.iter().map(|trip| simulate(trip, params)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("test: valid timestamp")
    }

    fn day_shift() -> Vec<DutyPeriod> {
        vec![DutyPeriod::new(at(2, 8, 0), at(2, 16, 0))]
    }

    fn step_at(result: &SimulationResult, t: NaiveDateTime) -> &SimulationStep {
        result
            .steps
            .iter()
            .find(|s| s.timestamp == t)
            .expect("test: step inside window")
    }

    #[test]
    fn window_covers_first_sleep_and_padding() {
        let result = simulate(&day_shift(), &ModelParams::default()).expect("test: valid trip");
        // Pre-trip sleep 22:00-06:00 starts after 20:00, so padding wins.
        assert_eq!(result.sleep_periods[0].start, at(1, 22, 0));
        assert_eq!(result.steps.first().map(|s| s.timestamp), Some(at(1, 20, 0)));
        assert_eq!(result.steps.last().map(|s| s.timestamp), Some(at(3, 3, 59)));
        assert_eq!(result.steps.len(), 32 * 60);
    }

    #[test]
    fn window_extends_back_to_early_sleep() {
        let trip = [DutyPeriod::new(at(2, 23, 0), at(3, 7, 0))];
        let result = simulate(&trip, &ModelParams::default()).expect("test: valid trip");
        assert_eq!(result.steps.first().map(|s| s.timestamp), Some(at(1, 23, 0)));
        assert!(result.steps[0].is_asleep);
    }

    #[test]
    fn window_start_floored_to_minute() {
        let odd = NaiveDate::from_ymd_opt(2024, 3, 2)
            .and_then(|d| d.and_hms_opt(8, 0, 30))
            .expect("test: valid timestamp");
        let trip = [DutyPeriod::new(odd, at(2, 16, 0))];
        let result = simulate(&trip, &ModelParams::default()).expect("test: valid trip");
        assert!(result.steps.iter().all(|s| s.timestamp.second() == 0));
    }

    #[test]
    fn first_step_starts_from_initial_reservoir() {
        let params = ModelParams::default();
        let result = simulate(&day_shift(), &params).expect("test: valid trip");
        assert_eq!(result.steps[0].reservoir_level, 0.9 * params.reservoir.capacity);
    }

    #[test]
    fn inertia_fires_at_wake_and_clears_within_window() {
        let params = ModelParams::default();
        let result = simulate(&day_shift(), &params).expect("test: valid trip");
        let wake = at(2, 6, 0);

        assert!(step_at(&result, wake - Duration::minutes(1)).is_asleep);
        assert_eq!(step_at(&result, wake - Duration::minutes(1)).sleep_inertia, 0.0);
        assert_eq!(step_at(&result, wake).sleep_inertia, -params.inertia.max_inertia);
        assert_eq!(step_at(&result, wake).state, ActivityState::AwakeOffDuty);
        assert!(step_at(&result, wake + Duration::minutes(10)).sleep_inertia < 0.0);
        assert_eq!(step_at(&result, wake + Duration::minutes(120)).sleep_inertia, 0.0);
    }

    #[test]
    fn inertia_decays_at_constant_rate_through_the_loop() {
        let params = ModelParams::default();
        let result = simulate(&day_shift(), &params).expect("test: valid trip");
        let wake = at(2, 6, 0);
        let window_end = wake + Duration::minutes(params.inertia.window_minutes);

        let inertia: Vec<f64> = result
            .steps
            .iter()
            .filter(|s| s.timestamp >= wake && s.timestamp < window_end)
            .map(|s| s.sleep_inertia)
            .collect();
        assert_eq!(inertia.len() as i64, params.inertia.window_minutes);

        let first_ratio = inertia[1] / inertia[0];
        assert!(first_ratio > 0.0 && first_ratio < 1.0);
        for (minute, pair) in inertia.windows(2).enumerate() {
            let ratio = pair[1] / pair[0];
            assert!(
                (ratio - first_ratio).abs() < 1e-9,
                "decay ratio drifted at minute {}: {} vs {}",
                minute,
                ratio,
                first_ratio
            );
        }
    }

    #[test]
    fn recorded_sleep_replaces_prediction() {
        let recorded = [SleepPeriod { start: at(2, 0, 0), end: at(2, 5, 0) }];
        let result = simulate_with_sleep(&day_shift(), &recorded, &ModelParams::default()).expect("test: valid trip");
        assert_eq!(result.sleep_periods, recorded.to_vec());
        assert_eq!(step_at(&result, at(1, 23, 0)).state, ActivityState::AwakeOffDuty);
        assert!(step_at(&result, at(2, 0, 0)).is_asleep);
        assert!(!step_at(&result, at(2, 5, 0)).is_asleep);
        assert!(step_at(&result, at(2, 5, 0)).sleep_inertia < 0.0);
    }

    #[test]
    fn no_recorded_sleep_stays_awake() {
        let params = ModelParams::default();
        let result = simulate_with_sleep(&day_shift(), &[], &params).expect("test: valid trip");
        assert!(result.sleep_periods.is_empty());
        assert!(result.steps.iter().all(|s| !s.is_asleep && s.sleep_inertia == 0.0));
        assert_eq!(result.steps.first().map(|s| s.timestamp), Some(at(1, 20, 0)));
        assert_eq!(result.summary.sleep_minutes, 0);
    }

    #[test]
    fn recorded_sleep_on_duty_rejected() {
        let recorded = [SleepPeriod { start: at(2, 7, 0), end: at(2, 9, 0) }];
        let err = simulate_with_sleep(&day_shift(), &recorded, &ModelParams::default())
            .expect_err("test: sleep overlaps duty");
        assert!(matches!(err, FatigueError::Input(InputError::SleepDuringDuty { index: 0, .. })));
    }

    #[test]
    fn states_switch_on_half_open_boundaries() {
        let result = simulate(&day_shift(), &ModelParams::default()).expect("test: valid trip");
        assert_eq!(step_at(&result, at(2, 7, 59)).state, ActivityState::AwakeOffDuty);
        assert_eq!(step_at(&result, at(2, 8, 0)).state, ActivityState::AwakeOnDuty);
        assert_eq!(step_at(&result, at(2, 15, 59)).state, ActivityState::AwakeOnDuty);
        assert_eq!(step_at(&result, at(2, 16, 0)).state, ActivityState::AwakeOffDuty);
        assert_eq!(result.summary.duty_minutes, 480);
    }

    #[test]
    fn reservoir_rises_asleep_and_falls_awake() {
        let result = simulate(&day_shift(), &ModelParams::default()).expect("test: valid trip");
        for pair in result.steps.windows(2) {
            if pair[0].is_asleep {
                assert!(pair[1].reservoir_level >= pair[0].reservoir_level);
            } else {
                assert!(pair[1].reservoir_level <= pair[0].reservoir_level);
            }
        }
    }

    #[test]
    fn invalid_params_rejected_before_schedule() {
        let mut params = ModelParams::default();
        params.reservoir.capacity = 0.0;
        assert!(matches!(simulate(&[], &params), Err(FatigueError::Config(_))));
        assert!(FatigueSimulator::with_params(params).is_err());
    }

    #[test]
    fn simulator_predicts_sleep_for_unsorted_trip() {
        let sim = FatigueSimulator::default();
        let trip = [
            DutyPeriod::new(at(3, 8, 0), at(3, 16, 0)),
            DutyPeriod::new(at(2, 8, 0), at(2, 16, 0)),
        ];
        let sleeps = sim.predict_sleep(&trip).expect("test: valid trip");
        assert_eq!(sleeps.len(), 2);
        assert!(sleeps[0].end <= at(2, 8, 0));
        assert_eq!(sim.predict_sleep(&[]), Err(FatigueError::Input(InputError::EmptySchedule)));
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let sim = FatigueSimulator::default();
        let trips = vec![day_shift(), Vec::new(), vec![DutyPeriod::new(at(5, 22, 0), at(6, 6, 0))]];
        let results = sim.run_batch(&trips);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        let third = results[2].as_ref().expect("test: valid trip");
        assert_eq!(third.summary.duty_minutes, 480);
        assert!(third.steps.iter().any(|s| s.timestamp == at(5, 22, 0) && s.is_on_duty));
    }
}
