// Fatigue Sensitivity Runner v0.2.0 — Monte Carlo robustness of trip risk estimates
// Baseline + perturbed parameter runs, seedable PRNG, per-minute audit trail
//
// Usage:
//   cargo run --release --bin bench                          # All scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5              # Quick mode (5 runs each)
//   cargo run --release --bin bench -- RED_EYE               # Filter by name
//   cargo run --release --bin bench -- --time-series         # Baseline JSONL per scenario
//   cargo run --release --bin bench -- --seed 42 --spread 0.2
//   cargo run --release --bin bench -- --params params.json  # Override model constants
//   cargo run --release --bin bench -- --schedule trip.json  # Simulate one trip and exit
//
// Logging goes through RUST_LOG (default "warn").

mod monte_carlo;
mod report;
mod scenarios;
mod time_series;

use fatigue_engine::{simulate, DutyPeriod, MetricScope, ModelParams, SimulationResult};
use report::*;
use scenarios::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use time_series::TimeSeriesRecorder;
use tracing::info;

const PASS_RATE: f64 = 0.9;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    spread: f64,
    time_series: bool,
    params: Option<PathBuf>,
    schedule: Option<PathBuf>,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        spread: 0.1,
        time_series: false,
        params: None,
        schedule: None,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--spread" => {
                i += 1;
                if i < args.len() {
                    cli.spread = args[i].parse::<f64>().unwrap_or(0.1).clamp(0.0, 0.5);
                }
            }
            "--params" => {
                i += 1;
                cli.params = args.get(i).map(PathBuf::from);
            }
            "--schedule" => {
                i += 1;
                cli.schedule = args.get(i).map(PathBuf::from);
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn load_params(path: Option<&Path>) -> Result<ModelParams, Box<dyn Error>> {
    let params = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let params: ModelParams = serde_json::from_str(&text)?;
            info!(path = %path.display(), "loaded parameter overrides");
            params
        }
        None => ModelParams::default(),
    };
    params.validate()?;
    Ok(params)
}

// ─── Single Trip ────────────────────────────────────────────────────────────

fn print_trip(result: &SimulationResult) {
    println!("  Predicted sleep:");
    for sleep in &result.sleep_periods {
        println!("    {} -> {}  ({} min)", sleep.start, sleep.end, sleep.duration_minutes());
    }
    let s = &result.summary;
    println!();
    let scope = match s.scope {
        MetricScope::OnDuty => "on duty",
        MetricScope::AllMinutes => "whole window",
    };
    println!("  Lowest effectiveness:  {:.1} at {} ({})", s.lowest_effectiveness, s.lowest_effectiveness_at, scope);
    println!(
        "  Window lowest:         {:.1} at {}",
        s.window_lowest_effectiveness, s.window_lowest_effectiveness_at
    );
    println!("  Average effectiveness: {:.1}", s.average_effectiveness);
    println!(
        "  Minutes below:         caution {}  danger {}  severe {}",
        s.minutes_below.caution, s.minutes_below.danger, s.minutes_below.severe
    );
    println!("  Fatigue score:         {:.1} ({})", s.fatigue_score, s.risk_level.label());
    println!(
        "  Duty {} min | Sleep {} min | TAFB {} min\n",
        s.duty_minutes, s.sleep_minutes, s.time_away_from_base_minutes
    );
}

fn run_schedule(path: &Path, params: &ModelParams, time_series: bool) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    let trip: Vec<DutyPeriod> = serde_json::from_str(&text)?;
    let result = simulate(&trip, params)?;

    println!("\n  Trip: {} ({} duty periods)\n", path.display(), trip.len());
    print_trip(&result);

    if time_series {
        let out = Path::new("benchmark-results/time-series/schedule.jsonl");
        let recorder = TimeSeriesRecorder::from_steps(&result.steps);
        recorder.write_jsonl(out)?;
        println!("  Time series ({} minutes) saved to: {}\n", recorder.len(), out.display());
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = parse_args();
    let params = load_params(cli.params.as_deref())?;

    if let Some(path) = &cli.schedule {
        return run_schedule(path, &params, cli.time_series);
    }

    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&f_lower)
                        || s.label.to_lowercase().contains(&f_lower)
                        || s.category.to_lowercase().contains(&f_lower)
                })
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = cli.time_series.then(|| PathBuf::from("benchmark-results/time-series"));

    println!("\n  Fatigue Sensitivity Runner v0.2.0");
    println!(
        "  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {} | Spread: ±{:.0}%",
        cli.runs,
        cli.seed,
        cli.spread * 100.0
    );
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!(
        "  {:<28} {:>5} {:>13} {:>8} {:>8} {:>10} {:>8}",
        "Scenario", "Pass%", "Lowest", "Peak", "Score", "Risk", "Time"
    );
    println!("  {}", "-".repeat(88));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, &params, cli.runs, cli.seed, cli.spread, ts_dir.as_deref())?;

        let pass_pct = report.pass_rate * 100.0;
        let status = if report.pass_rate >= PASS_RATE { "PASS" } else { "FAIL" };

        println!(
            "  {:<28} {:>4}% {:>6.1}±{:<5.2} {:>8.1} {:>8.1} {:>10} {:>6.1}ms  {}",
            report.label,
            pass_pct as u32,
            report.lowest_effectiveness.mean,
            report.lowest_effectiveness.half_width(),
            report.peak_effectiveness.mean,
            report.fatigue_score.mean,
            report.baseline_risk.label(),
            report.elapsed_us.mean / 1000.0,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= PASS_RATE).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(88));
    println!(
        "  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total,
        passed,
        failed,
        suite_elapsed.as_secs_f64()
    );

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        spread: cli.spread,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    let dir = Path::new("benchmark-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("fatigue-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
