//! Genetic-algorithm training for fixed-topology feedforward networks.
//!
//! This crate evolves the weights of a feedforward network whose topology is
//! fixed at construction, for callers who want a trainable classifier or
//! approximator without gradient-based training.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and run-bookkeeping types
//! - `compute`: The network evaluator and the evolution engine
//!
//! The two halves meet at the flat weight encoding: a [`Genome`] carries the
//! same layer-by-layer, neuron-by-neuron, bias-last weight order that
//! [`NeuralNet::weights`] produces and [`NeuralNet::put_weights`] consumes.
//!
//! # Example
//!
//! ```rust,no_run
//! use evonet::{
//!     compute::evolution::Trainer,
//!     schema::EvolutionConfig,
//! };
//!
//! let mut config = EvolutionConfig::default();
//! config.network.num_inputs = 2;
//! config.network.num_hidden_layers = 1;
//! config.network.neurons_per_hidden_layer = 4;
//! config.population.max_generations = 200;
//!
//! // Fitness is the caller's: score each decoded network however fits the
//! // task. Here, proximity to XOR over the four input pairs.
//! let cases = [
//!     ([0.0, 0.0], 0.0),
//!     ([0.0, 1.0], 1.0),
//!     ([1.0, 0.0], 1.0),
//!     ([1.0, 1.0], 0.0),
//! ];
//! let mut trainer = Trainer::new(config, move |net| {
//!     let error: f64 = cases
//!         .iter()
//!         .map(|(inputs, want)| (net.update(inputs)[0] - want).powi(2))
//!         .sum();
//!     4.0 - error
//! })
//! .expect("valid configuration");
//!
//! let stats = trainer.run();
//! println!(
//!     "best fitness {:.3} after {} generations",
//!     stats.best_fitness, stats.generations
//! );
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{GeneticAlgorithm, Genome, Trainer};
pub use compute::{NeuralNet, NetworkError, RandomSource, WeightRng};
pub use schema::{EvolutionConfig, GeneticParams, NetworkConfig};
