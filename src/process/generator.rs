/*!
 * Process Generation
 * Source of priority/burst pairs for newly added processes
 */

use crate::core::limits::{MAX_BURST, MAX_PRIORITY, MIN_BURST, MIN_PRIORITY};
use crate::core::types::Priority;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Creation parameters of a simulated process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub priority: Priority,
    pub burst_time: u32,
}

impl ProcessSpec {
    pub const fn new(priority: Priority, burst_time: u32) -> Self {
        Self {
            priority,
            burst_time,
        }
    }

    /// Coerce both fields into their valid ranges
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            priority: self.priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
            burst_time: self.burst_time.clamp(MIN_BURST, MAX_BURST),
        }
    }
}

/// Produces the parameters of each process the engine creates
pub trait ProcessGenerator: Send + Sync + Debug {
    fn next_spec(&mut self) -> ProcessSpec;
}

/// Uniform draws over the priority and burst ranges
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    rng: StdRng,
}

impl RandomGenerator {
    /// Entropy-seeded generator
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessGenerator for RandomGenerator {
    fn next_spec(&mut self) -> ProcessSpec {
        ProcessSpec {
            priority: self.rng.gen_range(MIN_PRIORITY..=MAX_PRIORITY),
            burst_time: self.rng.gen_range(MIN_BURST..=MAX_BURST),
        }
    }
}

/// Replays a fixed list of specs, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    specs: Vec<ProcessSpec>,
    cursor: usize,
}

impl ScriptedGenerator {
    /// An empty script yields the midpoint of both ranges
    pub fn new(specs: Vec<ProcessSpec>) -> Self {
        Self { specs, cursor: 0 }
    }
}

impl ProcessGenerator for ScriptedGenerator {
    fn next_spec(&mut self) -> ProcessSpec {
        if self.specs.is_empty() {
            return ProcessSpec::new(
                (MIN_PRIORITY + MAX_PRIORITY) / 2,
                (MIN_BURST + MAX_BURST) / 2,
            );
        }
        let spec = self.specs[self.cursor % self.specs.len()];
        self.cursor += 1;
        spec.clamped()
    }
}
