/*!
 * Process Module
 * Simulated process model and generation
 */

pub mod generator;
pub mod types;

// Re-export for convenience
pub use generator::{ProcessGenerator, ProcessSpec, RandomGenerator, ScriptedGenerator};
pub use types::{Color, Process, ProcessState, PALETTE};
