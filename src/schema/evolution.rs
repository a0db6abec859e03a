//! Evolution configuration and run-bookkeeping types.
//!
//! The hyperparameters here are the explicit replacement for what the rest of
//! the crate would otherwise have to share as process-wide state: everything a
//! generation step needs arrives as a value, per call.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConfigError, NetworkConfig};

/// Genetic operator parameters applied during each generation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticParams {
    /// Probability that a selected parent pair recombines (0.0-1.0).
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Probability that an individual gene is perturbed (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Scale applied to the subtractive half of the mutation perturbation.
    #[serde(default = "default_max_perturbation")]
    pub max_perturbation: f64,
    /// Number of fittest genomes copied unchanged into the next generation.
    #[serde(default = "default_num_elite")]
    pub num_elite: usize,
    /// Copies made of each elite genome.
    #[serde(default = "default_num_copies_elite")]
    pub num_copies_elite: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
            max_perturbation: default_max_perturbation(),
            num_elite: default_num_elite(),
            num_copies_elite: default_num_copies_elite(),
        }
    }
}

fn default_crossover_rate() -> f64 {
    0.7
}
fn default_mutation_rate() -> f64 {
    0.1
}
fn default_max_perturbation() -> f64 {
    0.3
}
fn default_num_elite() -> usize {
    4
}
fn default_num_copies_elite() -> usize {
    1
}

/// Population and generation settings for a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of genomes in the population.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Maximum number of generations.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Target fitness to stop early.
    pub target_fitness: Option<f64>,
    /// Stagnation limit: stop if the best fitness has not improved for N
    /// generations.
    #[serde(default)]
    pub stagnation_limit: Option<usize>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
            target_fitness: None,
            stagnation_limit: None,
        }
    }
}

fn default_population_size() -> usize {
    50
}
fn default_max_generations() -> usize {
    100
}

/// Top-level configuration for a weight-evolution run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Topology and activation parameters of the evolved network.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Genetic operator parameters.
    #[serde(default)]
    pub genetics: GeneticParams,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl EvolutionConfig {
    /// Validate the full configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.network.validate()?;

        if self.population.size < 2 {
            return Err(EvolutionConfigError::PopulationTooSmall);
        }

        check_rate("crossover rate", self.genetics.crossover_rate)?;
        check_rate("mutation rate", self.genetics.mutation_rate)?;

        if self.genetics.max_perturbation < 0.0 {
            return Err(EvolutionConfigError::InvalidPerturbation(
                self.genetics.max_perturbation,
            ));
        }

        if self.genetics.num_elite > self.population.size {
            return Err(EvolutionConfigError::EliteExceedsPopulation {
                elite: self.genetics.num_elite,
                size: self.population.size,
            });
        }

        Ok(())
    }
}

pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<(), EvolutionConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EvolutionConfigError::InvalidRate { name, value });
    }
    Ok(())
}

impl fmt::Display for EvolutionConfig {
    /// Human-readable key/value dump of every hyperparameter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of input neurons: {}", self.network.num_inputs)?;
        writeln!(f, "Number of hidden layers: {}", self.network.num_hidden_layers)?;
        writeln!(
            f,
            "Number of neurons per layer: {}",
            self.network.neurons_per_hidden_layer
        )?;
        writeln!(f, "Number of output neurons: {}", self.network.num_outputs)?;
        writeln!(
            f,
            "Activation response: {}",
            self.network.activation_response
        )?;
        writeln!(f, "Bias: {}", self.network.bias)?;
        writeln!(f, "Crossover rate: {}", self.genetics.crossover_rate)?;
        writeln!(f, "Mutation rate: {}", self.genetics.mutation_rate)?;
        writeln!(f, "Max. perturbation: {}", self.genetics.max_perturbation)?;
        writeln!(f, "Number of elites: {}", self.genetics.num_elite)?;
        writeln!(f, "Number of elite copies: {}", self.genetics.num_copies_elite)?;
        writeln!(f, "Population size: {}", self.population.size)?;
        writeln!(f, "Max. generations: {}", self.population.max_generations)?;
        match self.random_seed {
            Some(seed) => write!(f, "Random seed: {}", seed),
            None => write!(f, "Random seed: from entropy"),
        }
    }
}

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 2")]
    PopulationTooSmall,
    #[error("Population must not be empty")]
    EmptyPopulation,
    #[error("Chromosome must carry at least one weight")]
    EmptyChromosome,
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("Max perturbation must be non-negative, got {0}")]
    InvalidPerturbation(f64),
    #[error("Elite count {elite} exceeds population size {size}")]
    EliteExceedsPopulation { elite: usize, size: usize },
    #[error("Network config validation failed: {0}")]
    Network(#[from] ConfigError),
}

// ============================================================================
// Run bookkeeping
// ============================================================================

/// Per-generation statistics history for a training run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Worst fitness per generation.
    pub worst_fitness: Vec<f64>,
}

/// Reason a training run stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Reached maximum generations.
    MaxGenerations,
    /// Reached target fitness.
    TargetReached,
    /// Stagnation limit hit.
    Stagnation,
}

/// Statistics from a completed training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Total generations run.
    pub generations: usize,
    /// Total fitness evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness achieved.
    pub best_fitness: f64,
    /// Average fitness of the final population.
    pub final_avg_fitness: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}
