//! Generational training driver.
//!
//! The trainer closes the loop the engine leaves open: decode every genome
//! into its own network, score it with the caller's fitness function, hand the
//! scored population back to [`GeneticAlgorithm::epoch`], repeat until a stop
//! condition fires.

use log::debug;
use rayon::prelude::*;

use crate::compute::evolution::engine::GeneticAlgorithm;
use crate::compute::evolution::genome::Genome;
use crate::compute::network::NeuralNet;
use crate::compute::rng::WeightRng;
use crate::schema::{
    EvolutionConfig, EvolutionConfigError, EvolutionHistory, RunStats, StopReason,
};

/// Progress snapshot handed to the run callback once per generation.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Generations completed so far.
    pub generation: usize,
    /// Best fitness in the current population.
    pub generation_best: f64,
    /// Best fitness seen over the whole run.
    pub best_fitness: f64,
    /// Average fitness of the current population.
    pub avg_fitness: f64,
    /// Worst fitness in the current population.
    pub worst_fitness: f64,
    /// Generations since the run best last improved.
    pub stagnation_count: usize,
}

/// Drives the genetic algorithm against a caller-supplied fitness function.
///
/// Fitness evaluation is embarrassingly parallel: genomes are read-only while
/// scored and every evaluation decodes into its own [`NeuralNet`], so workers
/// share no mutable network state.
pub struct Trainer<F> {
    config: EvolutionConfig,
    ga: GeneticAlgorithm<WeightRng>,
    population: Vec<Genome>,
    fitness_fn: F,
    history: EvolutionHistory,
    generation: usize,
    best_fitness: f64,
    best_weights: Vec<f64>,
    stagnation_count: usize,
}

impl<F> Trainer<F>
where
    F: Fn(&NeuralNet) -> f64 + Sync,
{
    /// Create a trainer from a validated configuration.
    ///
    /// `fitness_fn` receives each decoded network and returns its score;
    /// what the network is run against is entirely the caller's business.
    pub fn new(config: EvolutionConfig, fitness_fn: F) -> Result<Self, EvolutionConfigError> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        debug!("training run seeded with {}", seed);

        let ga = GeneticAlgorithm::new(
            config.population.size,
            config.genetics.mutation_rate,
            config.genetics.crossover_rate,
            config.network.num_weights(),
            WeightRng::new(seed),
        )?;
        let population = ga.population().to_vec();

        Ok(Self {
            config,
            ga,
            population,
            fitness_fn,
            history: EvolutionHistory::default(),
            generation: 0,
            best_fitness: f64::NEG_INFINITY,
            best_weights: Vec::new(),
            stagnation_count: 0,
        })
    }

    /// Score every genome in the current population in parallel.
    fn evaluate_population(&mut self) {
        let network = &self.config.network;
        let fitness_fn = &self.fitness_fn;

        self.population.par_iter_mut().for_each(|genome| {
            genome.fitness = NeuralNet::from_weights(network, &genome.weights)
                .map(|net| fitness_fn(&net))
                .unwrap_or(0.0);
        });
    }

    /// Population-wide (best, average, worst) fitness of the scored genomes.
    fn score_stats(&self) -> (f64, f64, f64) {
        let mut best = f64::NEG_INFINITY;
        let mut worst = f64::INFINITY;
        let mut total = 0.0;

        for genome in &self.population {
            best = best.max(genome.fitness);
            worst = worst.min(genome.fitness);
            total += genome.fitness;
        }

        (best, total / self.population.len() as f64, worst)
    }

    /// Track the run-best genome and the stagnation counter.
    fn track_best(&mut self, generation_best: f64) {
        if generation_best > self.best_fitness {
            self.best_fitness = generation_best;
            self.stagnation_count = 0;

            if let Some(best) = self
                .population
                .iter()
                .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
            {
                self.best_weights = best.weights.clone();
            }
        } else {
            self.stagnation_count += 1;
        }
    }

    fn should_stop(&self) -> Option<StopReason> {
        if self.generation >= self.config.population.max_generations {
            return Some(StopReason::MaxGenerations);
        }

        if let Some(target) = self.config.population.target_fitness
            && self.best_fitness >= target
        {
            return Some(StopReason::TargetReached);
        }

        if let Some(limit) = self.config.population.stagnation_limit
            && self.stagnation_count >= limit
        {
            return Some(StopReason::Stagnation);
        }

        None
    }

    /// Run the evolution loop, reporting progress after each evaluation.
    pub fn run_with_callback<C>(&mut self, mut callback: C) -> RunStats
    where
        C: FnMut(&Progress),
    {
        let stop_reason = loop {
            self.evaluate_population();

            let (generation_best, avg, worst) = self.score_stats();
            self.track_best(generation_best);

            self.history.best_fitness.push(generation_best);
            self.history.avg_fitness.push(avg);
            self.history.worst_fitness.push(worst);

            callback(&Progress {
                generation: self.generation,
                generation_best,
                best_fitness: self.best_fitness,
                avg_fitness: avg,
                worst_fitness: worst,
                stagnation_count: self.stagnation_count,
            });

            if let Some(reason) = self.should_stop() {
                break reason;
            }

            let scored = std::mem::take(&mut self.population);
            self.population = self.ga.epoch(scored, &self.config.genetics);
            self.generation += 1;
        };

        let (_, final_avg, _) = self.score_stats();

        RunStats {
            generations: self.generation,
            total_evaluations: ((self.generation + 1) * self.config.population.size) as u64,
            best_fitness: self.best_fitness,
            final_avg_fitness: final_avg,
            stop_reason,
        }
    }

    /// Run the evolution loop (blocking, no progress reporting).
    pub fn run(&mut self) -> RunStats {
        self.run_with_callback(|_| {})
    }

    /// Per-generation statistics recorded so far.
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Flat weights of the best genome seen over the run.
    pub fn best_weights(&self) -> &[f64] {
        &self.best_weights
    }

    /// Decode the best genome seen over the run into a runnable network.
    /// Returns `None` before the first evaluation.
    pub fn best_network(&self) -> Option<NeuralNet> {
        if self.best_weights.is_empty() {
            return None;
        }
        NeuralNet::from_weights(&self.config.network, &self.best_weights).ok()
    }
}
