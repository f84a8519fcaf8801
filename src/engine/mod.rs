/*!
 * Scheduling Engine
 * Owns the simulated process table, the active policy and the clock
 */

use crate::core::types::{Pid, Tick};
use crate::process::{Process, ProcessGenerator, RandomGenerator};
use crate::scheduler::{Quantum, SchedulingPolicy};
use tracing::info;

mod builder;
mod operations;
mod stats;
mod types;

pub use builder::EngineBuilder;
pub use stats::{ProcessRow, SimulationStats};
pub use types::{Snapshot, TickOutcome};

use stats::Counters;

/// Discrete-time CPU scheduling simulator.
///
/// Every operation is total: invalid inputs are clamped, and adding to a
/// full table or removing from an empty one is a no-op. The engine has no
/// notion of wall-clock time; something external calls [`advance`] once per
/// tick.
///
/// [`advance`]: SchedulingEngine::advance
#[derive(Debug)]
pub struct SchedulingEngine {
    // Insertion order drives FCFS/RR selection and tie-breaks
    processes: Vec<Process>,
    clock: Tick,
    policy: SchedulingPolicy,
    quantum: Quantum,
    next_pid: Pid,
    generator: Box<dyn ProcessGenerator>,
    counters: Counters,
}

impl SchedulingEngine {
    /// Create an engine with an entropy-seeded process generator
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self::with_generator(policy, Box::new(RandomGenerator::new()))
    }

    /// Create an engine drawing new processes from `generator`
    pub fn with_generator(policy: SchedulingPolicy, generator: Box<dyn ProcessGenerator>) -> Self {
        info!(policy = policy.as_str(), "Scheduling engine initialized");
        Self {
            processes: Vec::new(),
            clock: 0,
            policy,
            quantum: Quantum::default(),
            next_pid: 1,
            generator,
            counters: Counters::default(),
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == pid)
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    pub fn quantum(&self) -> Quantum {
        self.quantum
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Process currently holding the CPU
    pub fn running(&self) -> Option<&Process> {
        self.processes.iter().find(|p| p.is_running())
    }

    /// True when every process has terminated (vacuously true when empty)
    pub fn all_terminated(&self) -> bool {
        self.processes.iter().all(Process::is_terminated)
    }
}

impl Default for SchedulingEngine {
    fn default() -> Self {
        Self::new(SchedulingPolicy::default())
    }
}
