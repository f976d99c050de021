// Monte Carlo Sensitivity Analysis — N runs per scenario with statistical aggregation
// Run 0 is the baseline; runs 1..N perturb rate constants by ±spread with seeds base..base+N-1

use fatigue_engine::{simulate, FatigueError, ModelParams, RiskLevel, SimulationResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::warn;

use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Draw one multiplier per perturbed constant, uniform in `[1 - spread, 1 + spread]`.
pub fn sample_perturbation(seed: u64, spread: f64) -> Perturbation {
    if spread <= 0.0 {
        return Perturbation::BASELINE;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut factor = || rng.gen_range((1.0 - spread)..=(1.0 + spread));
    Perturbation {
        wake_depletion_rate: factor(),
        max_sleep_rate: factor(),
        sleep_debt_feedback: factor(),
        fixed_amplitude: factor(),
        max_inertia: factor(),
    }
}

pub fn perturbed_params(base: &ModelParams, p: &Perturbation) -> ModelParams {
    let mut params = base.clone();
    params.reservoir.wake_depletion_rate *= p.wake_depletion_rate;
    params.reservoir.max_sleep_rate *= p.max_sleep_rate;
    params.reservoir.sleep_debt_feedback *= p.sleep_debt_feedback;
    params.performance.fixed_amplitude *= p.fixed_amplitude;
    params.inertia.max_inertia *= p.max_inertia;
    params
}

fn peak_effectiveness(result: &SimulationResult) -> f64 {
    result.steps.iter().map(|s| s.effectiveness).fold(0.0, f64::max)
}

/// Run a single scenario iteration with a specific perturbation.
pub fn run_single(
    scenario: &Scenario,
    base: &ModelParams,
    seed: u64,
    perturbation: Perturbation,
) -> Result<(RunResult, SimulationResult), FatigueError> {
    let start = Instant::now();
    let params = perturbed_params(base, &perturbation);
    let result = simulate(&(scenario.trip)(), &params)?;
    let elapsed_us = start.elapsed().as_micros();

    let peak = peak_effectiveness(&result);
    let pass = scenario.criteria.check(result.summary.lowest_effectiveness, peak);

    let run = RunResult {
        seed,
        perturbation,
        pass,
        peak_effectiveness: peak,
        summary: result.summary.clone(),
        elapsed_us,
    };
    Ok((run, result))
}

/// Run Monte Carlo: N runs of a scenario in parallel, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    base: &ModelParams,
    n_runs: usize,
    base_seed: u64,
    spread: f64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<MonteCarloReport, FatigueError> {
    let n_runs = n_runs.max(1);

    let (baseline, baseline_result) = run_single(scenario, base, base_seed, Perturbation::BASELINE)?;
    if let Some(dir) = time_series_dir {
        let path = dir.join(format!("{}.jsonl", scenario.name.to_lowercase()));
        let recorder = TimeSeriesRecorder::from_steps(&baseline_result.steps);
        if let Err(e) = recorder.write_jsonl(&path) {
            warn!(path = %path.display(), error = %e, "failed to write time series");
        }
    }

    let perturbed: Vec<RunResult> = (1..n_runs)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed + i as u64;
            run_single(scenario, base, seed, sample_perturbation(seed, spread)).map(|(run, _)| run)
        })
        .collect::<Result<_, _>>()?;

    let mut results = Vec::with_capacity(n_runs);
    results.push(baseline);
    results.extend(perturbed);

    Ok(aggregate(scenario, results))
}

fn stats_of(results: &[RunResult], metric: impl Fn(&RunResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(metric).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<RunResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = passed as f64 / n.max(1) as f64;

    let lowest_effectiveness = stats_of(&results, |r| r.summary.lowest_effectiveness);
    let average_effectiveness = stats_of(&results, |r| r.summary.average_effectiveness);
    let peak_effectiveness = stats_of(&results, |r| r.peak_effectiveness);
    let fatigue_score = stats_of(&results, |r| r.summary.fatigue_score);
    let minutes_below_danger = stats_of(&results, |r| f64::from(r.summary.minutes_below.danger));
    let elapsed_us = stats_of(&results, |r| r.elapsed_us as f64);
    let baseline_risk = results
        .first()
        .map(|r| r.summary.risk_level)
        .unwrap_or(RiskLevel::Low);

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        baseline_risk,
        lowest_effectiveness,
        average_effectiveness,
        peak_effectiveness,
        fatigue_score,
        minutes_below_danger,
        elapsed_us,
        individual_runs: results,
    }
}
