/*!
 * Process Types
 * Data model for simulated processes
 */

use super::generator::ProcessSpec;
use crate::core::limits::MAX_PROCESSES;
use crate::core::types::{Pid, Priority, Tick};
use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting for the CPU
    Ready,
    /// Holding the CPU this tick
    Running,
    /// Waiting on I/O. The simulator has no I/O model, so no transition
    /// ever produces this state.
    Blocked,
    /// Finished; the process never changes again
    Terminated,
}

impl ProcessState {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Display colour tag, purely cosmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Indigo,
    Orange,
}

/// Palette cycled through by creation order
pub const PALETTE: [Color; MAX_PROCESSES] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Purple,
    Color::Pink,
    Color::Indigo,
    Color::Orange,
];

impl Color {
    /// Colour for the process appended when `count` processes already exist
    #[inline]
    pub const fn for_slot(count: usize) -> Self {
        PALETTE[count % PALETTE.len()]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Indigo => "indigo",
            Self::Orange => "orange",
        }
    }
}

/// A simulated unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pub id: Pid,
    pub name: String,
    pub state: ProcessState,
    pub priority: Priority,
    pub burst_time: u32,
    pub remaining_time: u32,
    pub waiting_time: Tick,
    pub turnaround_time: Tick,
    pub color: Color,
}

impl Process {
    /// Create a ready process; `spec` values are expected to be clamped already.
    #[must_use]
    pub fn new(id: Pid, spec: ProcessSpec, color: Color) -> Self {
        Self {
            id,
            name: format!("P{}", id),
            state: ProcessState::Ready,
            priority: spec.priority,
            burst_time: spec.burst_time,
            remaining_time: spec.burst_time,
            waiting_time: 0,
            turnaround_time: 0,
            color,
        }
    }

    /// Check if process is running
    ///
    /// # Performance
    /// Hot path - checked for every process on every tick
    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }

    /// Check if process is ready
    #[inline(always)]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, ProcessState::Ready)
    }

    /// Check if process is terminated
    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }

    /// Ticks of service already received
    #[inline]
    pub const fn executed_time(&self) -> u32 {
        self.burst_time - self.remaining_time
    }

    /// Run one unit of service. Returns true when the process finished,
    /// in which case it is terminated with `turnaround_time = clock`.
    pub(crate) fn execute_unit(&mut self, clock: Tick) -> bool {
        self.remaining_time = self.remaining_time.saturating_sub(1);
        if self.remaining_time == 0 {
            self.state = ProcessState::Terminated;
            self.turnaround_time = clock;
            true
        } else {
            false
        }
    }

    /// Return to the freshly-created state, keeping id, priority and burst
    pub(crate) fn reset(&mut self) {
        self.state = ProcessState::Ready;
        self.remaining_time = self.burst_time;
        self.waiting_time = 0;
        self.turnaround_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(priority: Priority, burst_time: u32) -> ProcessSpec {
        ProcessSpec {
            priority,
            burst_time,
        }
    }

    #[test]
    fn test_new_process_starts_ready_with_full_burst() {
        let p = Process::new(3, spec(7, 4), Color::Green);
        assert_eq!(p.name, "P3");
        assert!(p.is_ready());
        assert_eq!(p.remaining_time, p.burst_time);
        assert_eq!(p.waiting_time, 0);
        assert_eq!(p.turnaround_time, 0);
    }

    #[test]
    fn test_execute_unit_terminates_at_zero() {
        let mut p = Process::new(1, spec(5, 2), Color::Red);
        p.state = ProcessState::Running;

        assert!(!p.execute_unit(1));
        assert_eq!(p.remaining_time, 1);
        assert!(p.is_running());

        assert!(p.execute_unit(2));
        assert_eq!(p.remaining_time, 0);
        assert!(p.is_terminated());
        assert_eq!(p.turnaround_time, 2);
        assert_eq!(p.executed_time(), 2);
    }

    #[test]
    fn test_reset_restores_burst() {
        let mut p = Process::new(1, spec(5, 3), Color::Red);
        p.state = ProcessState::Terminated;
        p.remaining_time = 0;
        p.waiting_time = 4;
        p.turnaround_time = 7;

        p.reset();
        assert!(p.is_ready());
        assert_eq!(p.remaining_time, 3);
        assert_eq!(p.waiting_time, 0);
        assert_eq!(p.turnaround_time, 0);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(Color::for_slot(0), Color::Red);
        assert_eq!(Color::for_slot(7), Color::Orange);
        assert_eq!(Color::for_slot(8), Color::Red);
    }

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&ProcessState::Terminated).unwrap();
        assert_eq!(json, "\"terminated\"");
    }
}
