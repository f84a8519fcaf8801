/*!
 * Simulator Limits and Constants
 *
 * Centralized location for the simulator's bounds and defaults.
 * Grouped by domain: process table, scheduling, driver.
 */

use crate::core::types::Priority;

// =============================================================================
// PROCESS TABLE
// =============================================================================

/// Maximum number of simulated processes alive at once
pub const MAX_PROCESSES: usize = 8;

/// Lowest priority a process can be created with
pub const MIN_PRIORITY: Priority = 1;

/// Highest priority a process can be created with
pub const MAX_PRIORITY: Priority = 10;

/// Shortest burst (service) time, in ticks
pub const MIN_BURST: u32 = 1;

/// Longest burst (service) time, in ticks
pub const MAX_BURST: u32 = 10;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Round-robin quantum used until the caller picks another one
pub const DEFAULT_QUANTUM: u32 = 2;

/// Smallest accepted quantum; lower inputs are coerced up to it
pub const MIN_QUANTUM: u32 = 1;

// =============================================================================
// DRIVER
// =============================================================================

/// Wall-clock time between two ticks of the driver (1 simulated unit per second)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Fastest tick cadence the driver accepts
pub const MIN_TICK_INTERVAL_MS: u64 = 1;
