/*!
 * CPU Scheduling Simulator Library
 * Discrete-time FCFS/SJF/RR/Priority scheduling over synthetic processes
 */

pub mod config;
pub mod core;
pub mod driver;
pub mod engine;
pub mod monitoring;
pub mod process;
pub mod scheduler;

// Re-exports
pub use config::{OutputFormat, SimulatorConfig};
pub use crate::core::errors::SimError;
pub use crate::core::types::{Pid, Priority, SimResult, Tick};
pub use driver::{SharedEngine, SimulationTask};
pub use engine::{EngineBuilder, SchedulingEngine, SimulationStats, Snapshot, TickOutcome};
pub use monitoring::init_tracing;
pub use process::{Process, ProcessSpec, ProcessState};
pub use scheduler::{Quantum, SchedulingPolicy, TickEvent};
