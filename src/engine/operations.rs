/*!
 * Engine Operations
 * Process table mutations and the per-tick transition
 */

use super::types::{Snapshot, TickOutcome};
use super::SchedulingEngine;
use crate::core::limits::MAX_PROCESSES;
use crate::core::types::Pid;
use crate::process::{Color, Process, ProcessSpec};
use crate::scheduler::policy::{self, running_index};
use crate::scheduler::{Quantum, SchedulingPolicy};
use tracing::{debug, info, instrument};

impl SchedulingEngine {
    /// Whether another process fits in the table
    #[inline]
    pub fn can_add(&self) -> bool {
        self.processes.len() < MAX_PROCESSES
    }

    /// Whether there is a process to remove
    #[inline]
    pub fn can_remove(&self) -> bool {
        !self.processes.is_empty()
    }

    /// Whether advancing would still do work
    #[inline]
    pub fn can_run(&self) -> bool {
        !self.all_terminated()
    }

    /// Add a process drawn from the generator. Returns `None` when full.
    pub fn add_process(&mut self) -> Option<Pid> {
        if !self.can_add() {
            debug!(count = self.processes.len(), "process table full, add ignored");
            return None;
        }
        let spec = self.generator.next_spec();
        self.add_process_with(spec)
    }

    /// Add a process with caller-chosen priority and burst, clamped into range.
    /// Returns `None` when full.
    pub fn add_process_with(&mut self, spec: ProcessSpec) -> Option<Pid> {
        if !self.can_add() {
            debug!(count = self.processes.len(), "process table full, add ignored");
            return None;
        }

        let pid = self.next_pid;
        self.next_pid += 1;

        let process = Process::new(pid, spec.clamped(), Color::for_slot(self.processes.len()));
        info!(
            pid,
            priority = process.priority,
            burst = process.burst_time,
            "Process added"
        );
        self.processes.push(process);
        Some(pid)
    }

    /// Remove the most recently added process, whatever its state
    pub fn remove_process(&mut self) -> Option<Process> {
        let removed = self.processes.pop()?;
        info!(pid = removed.id, state = %removed.state, "Process removed");
        Some(removed)
    }

    /// Put every process back to its initial state and rewind the clock.
    /// Ids are kept, so the id counter is not rewound.
    pub fn reset(&mut self) {
        for process in &mut self.processes {
            process.reset();
        }
        self.clock = 0;
        self.counters = Default::default();
        info!(processes = self.processes.len(), "Simulation reset");
    }

    /// Change policy; takes effect on the next `advance()`
    pub fn set_policy(&mut self, policy: SchedulingPolicy) {
        if policy == self.policy {
            return;
        }
        info!(
            from = self.policy.as_str(),
            to = policy.as_str(),
            "Scheduling policy changed"
        );
        self.policy = policy;
    }

    /// Set the round-robin quantum; values below 1 are coerced to 1
    pub fn set_quantum(&mut self, ticks: i64) {
        let quantum = Quantum::new(ticks);
        if quantum != self.quantum {
            info!(quantum = quantum.get(), "Time quantum updated");
        }
        self.quantum = quantum;
    }

    /// Advance the simulation by one tick.
    ///
    /// Increments the clock, applies the policy step with the new clock
    /// value, then charges one tick of waiting to every process left ready.
    /// On an empty or fully terminated table only the clock moves.
    #[instrument(level = "trace", skip(self), fields(policy = self.policy.as_str()))]
    pub fn advance(&mut self) -> TickOutcome {
        self.clock += 1;

        let mut events = Vec::new();
        policy::step(
            self.policy,
            self.quantum,
            &mut self.processes,
            self.clock,
            &mut events,
        );

        for process in self.processes.iter_mut().filter(|p| p.is_ready()) {
            process.waiting_time += 1;
        }

        // Anything dispatched or still running executed this tick
        let busy = running_index(&self.processes).is_some() || !events.is_empty();
        self.counters.record(&events, busy);

        TickOutcome {
            clock: self.clock,
            processes: self.processes.clone(),
            events,
        }
    }

    /// Snapshot for the rendering layer; `running` is the driver's flag
    pub fn snapshot(&self, running: bool) -> Snapshot {
        Snapshot {
            clock: self.clock,
            policy: self.policy,
            quantum: self.quantum,
            running,
            all_terminated: self.all_terminated(),
            processes: self.processes.clone(),
            stats: self.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessState, ScriptedGenerator};
    use crate::scheduler::TickEvent;

    fn engine(policy: SchedulingPolicy, bursts: &[(u8, u32)]) -> SchedulingEngine {
        SchedulingEngine::builder()
            .with_policy(policy)
            .with_processes(bursts.iter().map(|&(p, b)| ProcessSpec::new(p, b)))
            .build()
    }

    #[test]
    fn test_add_until_full() {
        let mut engine = SchedulingEngine::builder().with_seed(5).build();
        for expected in 1..=MAX_PROCESSES as Pid {
            assert_eq!(engine.add_process(), Some(expected));
        }
        assert!(!engine.can_add());
        assert_eq!(engine.add_process(), None);
        assert_eq!(engine.len(), MAX_PROCESSES);
    }

    #[test]
    fn test_ids_survive_removal() {
        let mut engine = engine(SchedulingPolicy::Fcfs, &[(1, 1), (1, 1)]);
        let removed = engine.remove_process().unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(engine.add_process_with(ProcessSpec::new(1, 1)), Some(3));
    }

    #[test]
    fn test_colour_follows_table_size() {
        let mut engine = engine(SchedulingPolicy::Fcfs, &[(1, 1), (1, 1)]);
        engine.remove_process();
        engine.add_process_with(ProcessSpec::new(1, 1));
        assert_eq!(engine.processes()[1].color, Color::Blue);
    }

    #[test]
    fn test_remove_on_empty_is_noop() {
        let mut engine = SchedulingEngine::default();
        assert!(!engine.can_remove());
        assert!(engine.remove_process().is_none());
    }

    #[test]
    fn test_generated_process_starts_with_full_burst() {
        let mut engine = SchedulingEngine::with_generator(
            SchedulingPolicy::Fcfs,
            Box::new(ScriptedGenerator::new(vec![ProcessSpec::new(4, 6)])),
        );
        engine.add_process();
        let p = &engine.processes()[0];
        assert_eq!(p.burst_time, 6);
        assert_eq!(p.remaining_time, 6);
        assert_eq!(p.state, ProcessState::Ready);
    }

    #[test]
    fn test_advance_on_empty_only_moves_clock() {
        let mut engine = SchedulingEngine::default();
        let outcome = engine.advance();
        assert_eq!(outcome.clock, 1);
        assert!(outcome.processes.is_empty());
        assert!(outcome.events.is_empty());
        assert!(engine.all_terminated());
        assert_eq!(engine.stats().busy_ticks, 0);
    }

    #[test]
    fn test_quantum_clamped() {
        let mut engine = SchedulingEngine::default();
        engine.set_quantum(0);
        assert_eq!(engine.quantum().get(), 1);
        engine.set_quantum(-7);
        assert_eq!(engine.quantum().get(), 1);
        engine.set_quantum(5);
        assert_eq!(engine.quantum().get(), 5);
    }

    #[test]
    fn test_policy_switch_keeps_running_process() {
        let mut engine = engine(SchedulingPolicy::Fcfs, &[(1, 5), (9, 1)]);
        engine.advance();
        engine.set_policy(SchedulingPolicy::Priority);
        engine.advance();
        assert_eq!(engine.running().map(|p| p.id), Some(1));
        assert_eq!(engine.processes()[0].remaining_time, 3);
    }

    #[test]
    fn test_advance_reports_events() {
        let mut engine = engine(SchedulingPolicy::Fcfs, &[(1, 1), (1, 1)]);
        let outcome = engine.advance();
        assert_eq!(
            outcome.events,
            vec![
                TickEvent::Dispatched { pid: 1 },
                TickEvent::Terminated {
                    pid: 1,
                    turnaround: 1
                }
            ]
        );
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut engine = engine(SchedulingPolicy::RoundRobin, &[(1, 3), (1, 3)]);
        while engine.can_run() {
            engine.advance();
        }
        assert!(engine.stats().preemptions > 0);

        engine.reset();
        let stats = engine.stats();
        assert_eq!(stats.clock, 0);
        assert_eq!(stats.dispatches, 0);
        assert_eq!(stats.preemptions, 0);
        assert_eq!(stats.completed, 0);
        assert!(engine.can_run());
    }
}
