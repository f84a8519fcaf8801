/*!
 * Simulation Statistics
 * Per-process turnaround/waiting table and run-wide counters
 */

use super::SchedulingEngine;
use crate::core::types::{Pid, Tick};
use crate::process::ProcessState;
use crate::scheduler::TickEvent;
use serde::{Deserialize, Serialize};

/// Run-wide counters, zeroed by `reset()`
#[derive(Debug, Clone, Default)]
pub(super) struct Counters {
    pub dispatches: u64,
    pub preemptions: u64,
    pub context_switches: u64,
    pub busy_ticks: u64,
    last_holder: Option<Pid>,
}

impl Counters {
    /// Fold one tick's events into the counters
    pub fn record(&mut self, events: &[TickEvent], busy: bool) {
        if busy {
            self.busy_ticks += 1;
        }
        for event in events {
            match *event {
                TickEvent::Dispatched { pid } => self.hand_over(pid),
                TickEvent::Preempted { next, .. } => {
                    self.preemptions += 1;
                    self.hand_over(next);
                }
                TickEvent::Terminated { .. } => {}
            }
        }
    }

    fn hand_over(&mut self, pid: Pid) {
        self.dispatches += 1;
        if self.last_holder != Some(pid) {
            self.context_switches += 1;
        }
        self.last_holder = Some(pid);
    }
}

/// One line of the statistics table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessRow {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    pub turnaround_time: Tick,
    pub waiting_time: Tick,
}

/// Statistics snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationStats {
    pub clock: Tick,
    pub total: usize,
    pub completed: usize,
    /// Averaged over terminated processes only
    pub average_waiting: f64,
    /// Averaged over terminated processes only
    pub average_turnaround: f64,
    pub dispatches: u64,
    pub preemptions: u64,
    pub context_switches: u64,
    pub busy_ticks: u64,
    /// Fraction of elapsed ticks the CPU did work, in [0, 1]
    pub utilization: f64,
    pub rows: Vec<ProcessRow>,
}

impl SchedulingEngine {
    /// Get simulation statistics
    pub fn stats(&self) -> SimulationStats {
        let finished: Vec<_> = self
            .processes
            .iter()
            .filter(|p| p.is_terminated())
            .collect();
        let completed = finished.len();

        let average = |total: Tick| {
            if completed == 0 {
                0.0
            } else {
                total as f64 / completed as f64
            }
        };
        let average_waiting = average(finished.iter().map(|p| p.waiting_time).sum());
        let average_turnaround = average(finished.iter().map(|p| p.turnaround_time).sum());

        let utilization = if self.clock == 0 {
            0.0
        } else {
            self.counters.busy_ticks as f64 / self.clock as f64
        };

        SimulationStats {
            clock: self.clock,
            total: self.processes.len(),
            completed,
            average_waiting,
            average_turnaround,
            dispatches: self.counters.dispatches,
            preemptions: self.counters.preemptions,
            context_switches: self.counters.context_switches,
            busy_ticks: self.counters.busy_ticks,
            utilization,
            rows: self
                .processes
                .iter()
                .map(|p| ProcessRow {
                    pid: p.id,
                    name: p.name.clone(),
                    state: p.state,
                    turnaround_time: p.turnaround_time,
                    waiting_time: p.waiting_time,
                })
                .collect(),
        }
    }
}
