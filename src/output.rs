// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports human-readable and JSON-lines output modes.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::charm::{ContentRecord, LifecycleState, UnitState};
use crate::config::CharmConfig;
use crate::types::Port;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output
    Normal,
    /// JSON lines for scripting
    Json,
}

/// Snapshot of the durable unit state, as shown by `status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub lifecycle: LifecycleState,
    pub stop_requested: bool,
    pub opened_port: Option<Port>,
    pub relations: Vec<String>,
    pub port: Option<Port>,
    pub content_dir: Option<PathBuf>,
    pub repository: Option<String>,
}

impl StatusReport {
    pub fn new(
        state: &UnitState,
        config: Option<&CharmConfig>,
        content: Option<&ContentRecord>,
    ) -> Self {
        Self {
            lifecycle: state.lifecycle,
            stop_requested: state.stop_requested,
            opened_port: state.opened_port,
            relations: state.relations.iter().cloned().collect(),
            port: config.map(|c| c.port),
            content_dir: content
                .map(|c| c.dir.clone())
                .or_else(|| config.map(|c| c.webroot.clone())),
            repository: content.map(|c| c.repository.clone()),
        }
    }
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Instant,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: Instant::now(),
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print a success message with timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message} ({:.1}s)", self.elapsed_secs()),
            OutputMode::Json => self.emit_json(&JsonEvent {
                event: "success",
                message,
                duration_secs: Some(self.elapsed_secs()),
            }),
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit_json(&JsonEvent {
                event: "warning",
                message,
                duration_secs: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    duration_secs: Some(self.elapsed_secs()),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print the unit status.
    pub fn report(&self, report: &StatusReport) {
        match self.mode {
            OutputMode::Normal => {
                println!("Container: {}", report.lifecycle);
                if report.stop_requested {
                    println!("Stop requested: yes");
                }
                if let Some(port) = report.opened_port {
                    println!("Opened port: {port}");
                }
                if let Some(ref dir) = report.content_dir {
                    println!("Content: {}", dir.display());
                }
                if let Some(ref repository) = report.repository {
                    println!("Repository: {repository}");
                }
                if !report.relations.is_empty() {
                    println!("Relations: {}", report.relations.join(", "));
                }
            }
            OutputMode::Json => self.emit_json(report),
        }
    }

    fn emit_json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string(value) {
            println!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
