/*!
 * Policy Step Function
 * Dispatch and execution rules for one simulated tick
 */

use super::types::{Quantum, SchedulingPolicy, TickEvent};
use crate::core::types::Tick;
use crate::process::{Process, ProcessState};
use std::cmp::Reverse;
use tracing::{debug, trace};

/// Index of the process holding the CPU, if any
#[inline]
pub(crate) fn running_index(processes: &[Process]) -> Option<usize> {
    processes.iter().position(Process::is_running)
}

/// Pick the ready process the policy would hand the CPU to next.
/// Ties always go to the earliest-inserted process.
pub(crate) fn select_next(
    policy: SchedulingPolicy,
    processes: &[Process],
    exclude: Option<usize>,
) -> Option<usize> {
    let mut ready = processes
        .iter()
        .enumerate()
        .filter(|&(idx, p)| p.is_ready() && Some(idx) != exclude);

    match policy {
        SchedulingPolicy::Fcfs | SchedulingPolicy::RoundRobin => ready.next().map(|(idx, _)| idx),
        SchedulingPolicy::Sjf => ready
            .min_by_key(|&(_, p)| p.remaining_time)
            .map(|(idx, _)| idx),
        // min_by_key keeps the first of equal keys, max_by_key would keep the last
        SchedulingPolicy::Priority => ready
            .min_by_key(|&(_, p)| Reverse(p.priority))
            .map(|(idx, _)| idx),
    }
}

/// Apply one tick of `policy` at simulated time `clock`.
///
/// An idle CPU is dispatched and the dispatched process executes in the
/// same tick, so a burst of `n` occupies exactly `n` ticks. Under
/// round-robin a process that survives its unit is preempted when `clock`
/// is a multiple of the quantum and another process is ready.
pub(crate) fn step(
    policy: SchedulingPolicy,
    quantum: Quantum,
    processes: &mut [Process],
    clock: Tick,
    events: &mut Vec<TickEvent>,
) {
    let current = match running_index(processes) {
        Some(idx) => idx,
        None => match select_next(policy, processes, None) {
            Some(idx) => {
                processes[idx].state = ProcessState::Running;
                let pid = processes[idx].id;
                debug!(pid, clock, policy = policy.as_str(), "dispatched");
                events.push(TickEvent::Dispatched { pid });
                idx
            }
            None => {
                trace!(clock, "cpu idle");
                return;
            }
        },
    };

    let pid = processes[current].id;
    if processes[current].execute_unit(clock) {
        debug!(pid, clock, "terminated");
        events.push(TickEvent::Terminated {
            pid,
            turnaround: clock,
        });
        return;
    }

    if policy == SchedulingPolicy::RoundRobin && quantum.expires_at(clock) {
        // With nobody else ready the current process keeps the CPU
        if let Some(next) = select_next(policy, processes, Some(current)) {
            processes[current].state = ProcessState::Ready;
            processes[next].state = ProcessState::Running;
            let next_pid = processes[next].id;
            debug!(pid, next = next_pid, clock, "preempted at quantum boundary");
            events.push(TickEvent::Preempted {
                pid,
                next: next_pid,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{Color, ProcessSpec};

    fn table(specs: &[(u8, u32)]) -> Vec<Process> {
        specs
            .iter()
            .enumerate()
            .map(|(i, &(priority, burst))| {
                Process::new(
                    i as u32 + 1,
                    ProcessSpec::new(priority, burst),
                    Color::for_slot(i),
                )
            })
            .collect()
    }

    #[test]
    fn test_select_fcfs_first_ready() {
        let mut procs = table(&[(1, 5), (9, 1), (5, 3)]);
        assert_eq!(select_next(SchedulingPolicy::Fcfs, &procs, None), Some(0));
        procs[0].state = ProcessState::Terminated;
        assert_eq!(select_next(SchedulingPolicy::Fcfs, &procs, None), Some(1));
    }

    #[test]
    fn test_select_sjf_ties_go_first() {
        let procs = table(&[(1, 4), (1, 2), (1, 2)]);
        assert_eq!(select_next(SchedulingPolicy::Sjf, &procs, None), Some(1));
    }

    #[test]
    fn test_select_priority_ties_go_first() {
        let procs = table(&[(3, 4), (9, 2), (9, 1)]);
        assert_eq!(select_next(SchedulingPolicy::Priority, &procs, None), Some(1));
    }

    #[test]
    fn test_select_respects_exclusion() {
        let procs = table(&[(1, 4), (1, 4)]);
        assert_eq!(
            select_next(SchedulingPolicy::RoundRobin, &procs, Some(0)),
            Some(1)
        );
        let single = table(&[(1, 4)]);
        assert_eq!(
            select_next(SchedulingPolicy::RoundRobin, &single, Some(0)),
            None
        );
    }

    #[test]
    fn test_step_dispatches_and_executes_same_tick() {
        let mut procs = table(&[(1, 3)]);
        let mut events = Vec::new();
        step(
            SchedulingPolicy::Fcfs,
            Quantum::default(),
            &mut procs,
            1,
            &mut events,
        );
        assert!(procs[0].is_running());
        assert_eq!(procs[0].remaining_time, 2);
        assert_eq!(events, vec![TickEvent::Dispatched { pid: 1 }]);
    }

    #[test]
    fn test_step_idle_cpu() {
        let mut procs: Vec<Process> = Vec::new();
        let mut events = Vec::new();
        step(
            SchedulingPolicy::Sjf,
            Quantum::default(),
            &mut procs,
            1,
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_round_robin_lone_process_keeps_cpu() {
        let mut procs = table(&[(1, 5)]);
        let mut events = Vec::new();
        for clock in 1..=4 {
            step(
                SchedulingPolicy::RoundRobin,
                Quantum::new(2),
                &mut procs,
                clock,
                &mut events,
            );
        }
        assert!(procs[0].is_running());
        assert_eq!(procs[0].remaining_time, 1);
        assert!(!events
            .iter()
            .any(|e| matches!(e, TickEvent::Preempted { .. })));
    }

    #[test]
    fn test_termination_beats_preemption() {
        let mut procs = table(&[(1, 2), (1, 2)]);
        let mut events = Vec::new();
        step(SchedulingPolicy::RoundRobin, Quantum::new(2), &mut procs, 1, &mut events);
        step(SchedulingPolicy::RoundRobin, Quantum::new(2), &mut procs, 2, &mut events);
        assert!(procs[0].is_terminated());
        assert!(procs[1].is_ready());
        assert_eq!(
            events.last(),
            Some(&TickEvent::Terminated {
                pid: 1,
                turnaround: 2
            })
        );
    }
}
