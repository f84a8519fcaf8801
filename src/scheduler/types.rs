/*!
 * Scheduler Types
 * Policy, quantum and per-tick event types
 */

use crate::core::errors::SimError;
use crate::core::limits::{DEFAULT_QUANTUM, MIN_QUANTUM};
use crate::core::types::{Pid, Tick};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Scheduler policy
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchedulingPolicy {
    /// First come, first served (insertion order)
    #[default]
    Fcfs,
    /// Shortest job first on remaining time, non-preemptive
    Sjf,
    /// Round-robin, preempting when the clock hits a quantum boundary
    RoundRobin,
    /// Highest priority first, non-preemptive
    Priority,
}

impl SchedulingPolicy {
    pub const ALL: [SchedulingPolicy; 4] = [
        Self::Fcfs,
        Self::Sjf,
        Self::RoundRobin,
        Self::Priority,
    ];

    /// Convert to string representation
    ///
    /// # Performance
    /// Hot path - frequently called for logging and serialization
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::RoundRobin => "rr",
            Self::Priority => "priority",
        }
    }

    /// Human-readable label
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Fcfs => "First Come First Served",
            Self::Sjf => "Shortest Job First",
            Self::RoundRobin => "Round Robin",
            Self::Priority => "Priority",
        }
    }

    /// Whether the quantum affects this policy
    #[inline]
    pub const fn uses_quantum(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl FromStr for SchedulingPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fcfs" | "first_come_first_served" | "fifo" => Ok(Self::Fcfs),
            "sjf" | "shortest_job_first" => Ok(Self::Sjf),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "priority" | "prio" => Ok(Self::Priority),
            _ => Err(SimError::InvalidPolicy(format!(
                "'{}' (valid: fcfs, sjf, rr, priority)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Round-robin quantum in ticks, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantum(u32);

impl Quantum {
    /// Build a quantum, coercing anything below 1 up to 1
    pub fn new(ticks: i64) -> Self {
        let ticks = ticks.clamp(MIN_QUANTUM as i64, u32::MAX as i64);
        Self(ticks as u32)
    }

    #[inline(always)]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// True when `clock` falls on a quantum boundary
    #[inline]
    pub const fn expires_at(&self, clock: Tick) -> bool {
        clock % self.0 as Tick == 0
    }
}

impl Default for Quantum {
    fn default() -> Self {
        Self(DEFAULT_QUANTUM)
    }
}

impl<'de> Deserialize<'de> for Quantum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ticks = i64::deserialize(deserializer)?;
        Ok(Self::new(ticks))
    }
}

/// Something the policy did during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TickEvent {
    /// An idle CPU was handed to `pid`
    Dispatched { pid: Pid },
    /// `pid` lost the CPU at a quantum boundary and `next` took it
    Preempted { pid: Pid, next: Pid },
    /// `pid` finished its burst
    Terminated { pid: Pid, turnaround: Tick },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("fcfs".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Fcfs);
        assert_eq!("SJF".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Sjf);
        assert_eq!(
            "round_robin".parse::<SchedulingPolicy>().unwrap(),
            SchedulingPolicy::RoundRobin
        );
        assert_eq!(
            " prio ".parse::<SchedulingPolicy>().unwrap(),
            SchedulingPolicy::Priority
        );
        assert!("lottery".parse::<SchedulingPolicy>().is_err());
    }

    #[test]
    fn test_policy_round_trips_short_key() {
        for policy in SchedulingPolicy::ALL {
            assert_eq!(policy.as_str().parse::<SchedulingPolicy>().unwrap(), policy);
        }
        let json = serde_json::to_string(&SchedulingPolicy::RoundRobin).unwrap();
        assert_eq!(json, "\"rr\"");
    }

    #[test]
    fn test_quantum_coercion() {
        assert_eq!(Quantum::new(-3).get(), 1);
        assert_eq!(Quantum::new(0).get(), 1);
        assert_eq!(Quantum::new(1).get(), 1);
        assert_eq!(Quantum::new(4).get(), 4);
        assert_eq!(Quantum::default().get(), DEFAULT_QUANTUM);

        let q: Quantum = serde_json::from_str("0").unwrap();
        assert_eq!(q.get(), 1);
    }

    #[test]
    fn test_quantum_boundaries() {
        let q = Quantum::new(3);
        assert!(!q.expires_at(1));
        assert!(!q.expires_at(2));
        assert!(q.expires_at(3));
        assert!(q.expires_at(6));
        assert!(Quantum::new(1).expires_at(5));
    }
}
