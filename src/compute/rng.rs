//! Random source for weight initialization and the genetic operators.

use rand::prelude::*;

/// Uniform random source consumed by the network and the genetic algorithm.
///
/// The single primitive is a uniform draw in `[0, 1)`; initial weights,
/// selection slices, crossover points and mutation gates are all derived from
/// it. Keeping the primitive this narrow makes a whole run reproducible from
/// one seed and lets tests substitute a scripted sequence of draws.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Initial weight draw: the difference of two independent uniform `[0, 1)`
    /// values, landing in `(-1, 1)`.
    fn next_weight(&mut self) -> f64 {
        self.next_f64() - self.next_f64()
    }
}

/// Seeded random source backing real evolution runs.
#[derive(Debug)]
pub struct WeightRng {
    rng: StdRng,
}

impl WeightRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate the next u64 for seeding child sources.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

impl RandomSource for WeightRng {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::RandomSource;

    /// Deterministic source that replays a scripted sequence of draws.
    pub(crate) struct ScriptedSource {
        values: VecDeque<f64>,
    }

    impl ScriptedSource {
        pub(crate) fn new(values: &[f64]) -> Self {
            Self {
                values: values.iter().copied().collect(),
            }
        }

        pub(crate) fn remaining(&self) -> usize {
            self.values.len()
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_f64(&mut self) -> f64 {
            self.values
                .pop_front()
                .expect("scripted random sequence exhausted")
        }
    }
}
