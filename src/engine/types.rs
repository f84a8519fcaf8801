/*!
 * Engine Output Types
 * What the engine hands back to the rendering layer
 */

use super::stats::SimulationStats;
use crate::core::types::Tick;
use crate::process::Process;
use crate::scheduler::{Quantum, SchedulingPolicy, TickEvent};
use serde::{Deserialize, Serialize};

/// Result of one `advance()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TickOutcome {
    pub clock: Tick,
    pub processes: Vec<Process>,
    pub events: Vec<TickEvent>,
}

/// Full read-only view of the engine, for re-rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Snapshot {
    pub clock: Tick,
    pub policy: SchedulingPolicy,
    pub quantum: Quantum,
    /// Whether a driver is currently ticking the engine
    pub running: bool,
    pub all_terminated: bool,
    pub processes: Vec<Process>,
    pub stats: SimulationStats,
}
