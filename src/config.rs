/*!
 * Simulator Configuration
 *
 * Layered configuration: defaults, then an optional JSON file named by
 * `SIM_CONFIG`, then individual `SIM_*` environment variables.
 *
 * Environment variables:
 * - SIM_CONFIG: path to a JSON config file
 * - SIM_POLICY: fcfs | sjf | rr | priority
 * - SIM_QUANTUM: round-robin quantum in ticks (values below 1 become 1)
 * - SIM_TICK_MS: wall-clock milliseconds per tick
 * - SIM_PROCESSES: number of random processes to create at startup
 * - SIM_SEED: seed for the process generator
 * - SIM_OUTPUT: text | json
 */

use crate::core::errors::SimError;
use crate::core::limits::{DEFAULT_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};
use crate::core::types::SimResult;
use crate::engine::SchedulingEngine;
use crate::process::ProcessSpec;
use crate::scheduler::{Quantum, SchedulingPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// How the binary reports the finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "table" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(SimError::Configuration(format!(
                "invalid output format '{}' (valid: text, json)",
                other
            ))),
        }
    }
}

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulatorConfig {
    pub policy: SchedulingPolicy,
    pub quantum: Quantum,
    pub tick_interval_ms: u64,
    /// Random processes created after the explicit `processes`
    pub initial_processes: usize,
    pub seed: Option<u64>,
    pub processes: Vec<ProcessSpec>,
    pub output: OutputFormat,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            policy: SchedulingPolicy::default(),
            quantum: Quantum::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            initial_processes: 0,
            seed: None,
            processes: Vec::new(),
            output: OutputFormat::default(),
        }
    }
}

impl SimulatorConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "Loaded simulator config");
        Ok(config)
    }

    /// Defaults, then `SIM_CONFIG`, then `SIM_*` overrides
    pub fn from_env() -> SimResult<Self> {
        let base = match std::env::var("SIM_CONFIG") {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `SIM_*` overrides read through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> SimResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SIM_POLICY") {
            self.policy = value.parse()?;
        }
        if let Some(value) = lookup("SIM_QUANTUM") {
            self.quantum = Quantum::new(parse_number("SIM_QUANTUM", &value)?);
        }
        if let Some(value) = lookup("SIM_TICK_MS") {
            self.tick_interval_ms = parse_number("SIM_TICK_MS", &value)?;
        }
        if let Some(value) = lookup("SIM_PROCESSES") {
            self.initial_processes = parse_number("SIM_PROCESSES", &value)?;
        }
        if let Some(value) = lookup("SIM_SEED") {
            self.seed = Some(parse_number("SIM_SEED", &value)?);
        }
        if let Some(value) = lookup("SIM_OUTPUT") {
            self.output = value.parse()?;
        }
        Ok(self)
    }

    /// Tick cadence, never faster than the driver minimum
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }

    /// Build an engine with this configuration's policy, quantum and processes
    pub fn build_engine(&self) -> SchedulingEngine {
        let mut builder = SchedulingEngine::builder()
            .with_policy(self.policy)
            .with_quantum(self.quantum.get() as i64)
            .with_processes(self.processes.iter().copied())
            .with_random_processes(self.initial_processes);
        if let Some(seed) = self.seed {
            builder = builder.with_seed(seed);
        }
        builder.build()
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> SimResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SimError::Configuration(format!("{} must be a number, got '{}'", key, value)))
}
