/*!
 * Core Types
 * Common types used across the simulator
 */

/// Simulated process ID type (1-based, never reused within a run)
pub type Pid = u32;

/// Priority level (1-10, higher is more urgent)
pub type Priority = u8;

/// Simulated time, in ticks
pub type Tick = u64;

/// Common result type for fallible simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
