/*!
 * Scheduler Module
 * Scheduling policies and the per-tick step function
 */

pub(crate) mod policy;
pub mod types;

// Re-export public API
pub use types::{Quantum, SchedulingPolicy, SchedulingPolicy as Policy, TickEvent};
