// Sensitivity Report Types
// Structured JSON output for independent analysis of model robustness

use fatigue_engine::{RiskLevel, TripFatigueSummary};
use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub seed: u64,
    /// Multipliers applied to the baseline rate constants (all 1.0 for run 0)
    pub perturbation: Perturbation,
    pub pass: bool,
    pub peak_effectiveness: f64,
    pub summary: TripFatigueSummary,
    pub elapsed_us: u128,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Perturbation {
    pub wake_depletion_rate: f64,
    pub max_sleep_rate: f64,
    pub sleep_debt_feedback: f64,
    pub fixed_amplitude: f64,
    pub max_inertia: f64,
}

impl Perturbation {
    pub const BASELINE: Perturbation = Perturbation {
        wake_depletion_rate: 1.0,
        max_sleep_rate: 1.0,
        sleep_debt_feedback: 1.0,
        fixed_amplitude: 1.0,
        max_inertia: 1.0,
    };
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub baseline_risk: RiskLevel,
    pub lowest_effectiveness: Stats,
    pub average_effectiveness: Stats,
    pub peak_effectiveness: Stats,
    pub fatigue_score: Stats,
    pub minutes_below_danger: Stats,
    pub elapsed_us: Stats,
    pub individual_runs: Vec<RunResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub spread: f64,
    pub summary: Summary,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_known_samples() {
        let stats = Stats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.n, 8);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert!(stats.ci_lower < stats.mean && stats.mean < stats.ci_upper);
    }

    #[test]
    fn single_sample_has_zero_width() {
        let stats = Stats::from_samples(&[3.5]);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.half_width(), 0.0);
    }

    #[test]
    fn empty_samples_are_zeroed() {
        assert_eq!(Stats::from_samples(&[]).n, 0);
    }
}
