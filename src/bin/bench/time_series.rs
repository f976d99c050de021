// Per-Minute JSONL Time Series Recorder
// Outputs one JSON line per simulated minute for charting and audit

use chrono::NaiveDateTime;
use fatigue_engine::{ActivityState, SimulationStep};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct MinuteSnapshot {
    pub minute: usize,
    pub timestamp: NaiveDateTime,
    pub state: ActivityState,
    pub reservoir_level: f64,
    pub circadian: f64,
    pub performance_rhythm: f64,
    pub sleep_inertia: f64,
    pub effectiveness: f64,
}

impl MinuteSnapshot {
    pub fn from_step(minute: usize, step: &SimulationStep) -> Self {
        Self {
            minute,
            timestamp: step.timestamp,
            state: step.state,
            reservoir_level: step.reservoir_level,
            circadian: step.circadian_component,
            performance_rhythm: step.performance_rhythm,
            sleep_inertia: step.sleep_inertia,
            effectiveness: step.effectiveness,
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<MinuteSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn from_steps(steps: &[SimulationStep]) -> Self {
        Self {
            snapshots: steps
                .iter()
                .enumerate()
                .map(|(i, step)| MinuteSnapshot::from_step(i, step))
                .collect(),
        }
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
