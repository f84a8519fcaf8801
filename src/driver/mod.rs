/*!
 * Driver Module
 * Periodic ticker that advances a shared engine
 */

mod task;

pub use task::{SharedEngine, SimulationCommand, SimulationTask};
