/*!
 * Engine Builder
 * Builder pattern for SchedulingEngine construction
 */

use super::SchedulingEngine;
use crate::process::{ProcessGenerator, ProcessSpec, RandomGenerator};
use crate::scheduler::{Quantum, SchedulingPolicy};

/// Builder for SchedulingEngine
#[derive(Debug, Default)]
pub struct EngineBuilder {
    policy: SchedulingPolicy,
    quantum: Option<Quantum>,
    seed: Option<u64>,
    generator: Option<Box<dyn ProcessGenerator>>,
    initial: Vec<ProcessSpec>,
    random_initial: usize,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Round-robin quantum in ticks; values below 1 are coerced to 1
    pub fn with_quantum(mut self, ticks: i64) -> Self {
        self.quantum = Some(Quantum::new(ticks));
        self
    }

    /// Seed the default random generator (ignored with a custom generator)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_generator(mut self, generator: Box<dyn ProcessGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Processes added, in order, when the engine is built
    pub fn with_processes(mut self, specs: impl IntoIterator<Item = ProcessSpec>) -> Self {
        self.initial.extend(specs);
        self
    }

    /// Number of generated processes added after the explicit ones
    pub fn with_random_processes(mut self, count: usize) -> Self {
        self.random_initial = count;
        self
    }

    /// Build the engine. Initial processes beyond capacity are dropped.
    pub fn build(self) -> SchedulingEngine {
        let generator = match (self.generator, self.seed) {
            (Some(generator), _) => generator,
            (None, Some(seed)) => Box::new(RandomGenerator::seeded(seed)),
            (None, None) => Box::new(RandomGenerator::new()),
        };

        let mut engine = SchedulingEngine::with_generator(self.policy, generator);
        if let Some(quantum) = self.quantum {
            engine.quantum = quantum;
        }
        for spec in self.initial {
            engine.add_process_with(spec);
        }
        for _ in 0..self.random_initial {
            engine.add_process();
        }
        engine
    }
}
