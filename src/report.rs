/*!
 * JSON run report.
 *
 * The pipeline writes an execution report after every stage so that an
 * aborted run still leaves a usable trace: per-step status, duration and
 * metrics (resolved/unresolved counts), plus run-level paths and timestamps.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat};
use serde::Serialize;

fn now_iso() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Overall status of a run or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Ok,
    Error,
}

/// Error details recorded for a failed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepError {
    /// Short error description
    pub message: String,
}

/// One executed pipeline step.
#[derive(Debug, Serialize)]
pub struct StepReport {
    /// Step name
    pub name: String,

    /// ISO timestamp when the step started
    pub started_at: String,

    /// ISO timestamp when the step finished
    pub finished_at: String,

    /// Step outcome
    pub status: RunStatus,

    /// Wall-clock duration in seconds, rounded to milliseconds
    pub duration_seconds: f64,

    /// Step metrics (counts), sorted for stable output
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, u64>,

    /// Error details when the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
}

/// Environment snapshot recorded once per run.
#[derive(Debug, Serialize)]
pub struct EnvironmentReport {
    /// Crate version
    pub version: String,

    /// Operating system family
    pub os: String,
}

impl Default for EnvironmentReport {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
        }
    }
}

/// The full execution report, rewritten after every step.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// ISO timestamp when the run started
    pub run_started_at: String,

    /// Environment snapshot
    pub environment: EnvironmentReport,

    /// Input/output paths of the run
    pub paths: BTreeMap<String, String>,

    /// Steps executed so far
    pub steps: Vec<StepReport>,

    /// Run outcome so far
    pub status: RunStatus,

    /// ISO timestamp when the run finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_finished_at: Option<String>,

    /// Sum of step durations in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl RunReport {
    /// Start a new report with the given path map.
    pub fn new(paths: BTreeMap<String, String>) -> Self {
        Self {
            run_started_at: now_iso(),
            environment: EnvironmentReport::default(),
            paths,
            steps: Vec::new(),
            status: RunStatus::InProgress,
            run_finished_at: None,
            duration_seconds: None,
        }
    }

    /// Run a step, recording its outcome, metrics and duration. The step
    /// error is recorded before being propagated to the caller.
    pub fn run_step<F>(&mut self, name: &str, step_fn: F) -> Result<BTreeMap<String, u64>>
    where
        F: FnOnce() -> Result<BTreeMap<String, u64>>,
    {
        let started_at = now_iso();
        let t0 = Instant::now();
        let outcome = step_fn();
        let duration = (t0.elapsed().as_secs_f64() * 1000.0).round() / 1000.0;

        match outcome {
            Ok(metrics) => {
                self.steps.push(StepReport {
                    name: name.to_string(),
                    started_at,
                    finished_at: now_iso(),
                    status: RunStatus::Ok,
                    duration_seconds: duration,
                    metrics: metrics.clone(),
                    error: None,
                });
                Ok(metrics)
            }
            Err(error) => {
                self.status = RunStatus::Error;
                self.steps.push(StepReport {
                    name: name.to_string(),
                    started_at,
                    finished_at: now_iso(),
                    status: RunStatus::Error,
                    duration_seconds: duration,
                    metrics: BTreeMap::new(),
                    error: Some(StepError {
                        message: format!("{error:#}"),
                    }),
                });
                Err(error)
            }
        }
    }

    /// Mark the run as finished successfully.
    pub fn finish(&mut self) {
        self.status = RunStatus::Ok;
        self.run_finished_at = Some(now_iso());
        let total: f64 = self.steps.iter().map(|s| s.duration_seconds).sum();
        self.duration_seconds = Some((total * 1000.0).round() / 1000.0);
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create report directory: {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        fs::write(path, json).context(format!("Failed to write run report: {}", path.display()))?;
        Ok(())
    }
}
