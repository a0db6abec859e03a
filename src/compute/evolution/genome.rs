//! Genome type and the crossover/mutation operators.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::compute::rng::RandomSource;

/// A candidate solution: a flat network weight vector plus the fitness the
/// caller assigned to it. Fitness starts at 0 and is only ever written by the
/// evaluating side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Genome {
    /// Chromosome, in the network's canonical flat weight order.
    pub weights: Vec<f64>,
    /// Externally assigned fitness score.
    pub fitness: f64,
}

impl Genome {
    /// Fresh genome with fitness 0.
    pub fn new(weights: Vec<f64>) -> Self {
        Self {
            weights,
            fitness: 0.0,
        }
    }

    /// Random genome of `length` weights, each drawn as the difference of two
    /// uniform `[0, 1)` values.
    pub fn random(length: usize, rng: &mut impl RandomSource) -> Self {
        Self::new((0..length).map(|_| rng.next_weight()).collect())
    }
}

/// Genomes compare by fitness alone.
impl PartialEq for Genome {
    fn eq(&self, other: &Self) -> bool {
        self.fitness == other.fitness
    }
}

impl PartialOrd for Genome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.fitness.partial_cmp(&other.fitness)
    }
}

/// Single-point crossover.
///
/// The gate draw is always consumed, even when recombination is skipped, so a
/// run's draw sequence depends only on the configuration. The parents come
/// back unchanged when the gate draw exceeds `crossover_rate` or when both
/// carry identical weights; otherwise a crossover point in `[0, len - 1]` is
/// drawn and the tails are swapped.
pub(crate) fn crossover(
    mum: &[f64],
    dad: &[f64],
    crossover_rate: f64,
    rng: &mut impl RandomSource,
) -> (Vec<f64>, Vec<f64>) {
    if rng.next_f64() > crossover_rate || mum == dad {
        return (mum.to_vec(), dad.to_vec());
    }

    let cp = (rng.next_f64() * mum.len() as f64) as usize;

    let mut baby1 = Vec::with_capacity(mum.len());
    let mut baby2 = Vec::with_capacity(dad.len());
    baby1.extend_from_slice(&mum[..cp]);
    baby1.extend_from_slice(&dad[cp..]);
    baby2.extend_from_slice(&dad[..cp]);
    baby2.extend_from_slice(&mum[cp..]);

    (baby1, baby2)
}

/// Per-gene perturbation mutation.
///
/// Each gene draws a gate against `mutation_rate`; on success the gene moves
/// by `r1 - r2 * max_perturbation`. Note the asymmetry: only the subtractive
/// draw is scaled.
pub(crate) fn mutate(
    chromosome: &mut [f64],
    mutation_rate: f64,
    max_perturbation: f64,
    rng: &mut impl RandomSource,
) {
    for gene in chromosome.iter_mut() {
        if rng.next_f64() < mutation_rate {
            let r1 = rng.next_f64();
            let r2 = rng.next_f64();
            *gene += r1 - r2 * max_perturbation;
        }
    }
}
