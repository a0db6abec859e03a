//! Evolutionary training of network weights.
//!
//! The module consists of:
//!
//! - **Genome** (`genome`): the flat weight chromosome plus its fitness, and
//!   the crossover/mutation operators
//! - **Engine** (`engine`): [`GeneticAlgorithm`], the generational step —
//!   selection, crossover, mutation, elitism, population bookkeeping
//! - **Trainer** (`trainer`): the decode-score-evolve driver loop
//!
//! # Overview
//!
//! The engine never computes fitness. Each generation the caller (usually the
//! [`Trainer`]) decodes every genome into a network, scores it, writes the
//! score back onto the genome, and passes the scored population into
//! [`GeneticAlgorithm::epoch`] to breed the next one.
//!
//! # Example
//!
//! ```rust,no_run
//! use evonet::compute::evolution::Trainer;
//! use evonet::schema::EvolutionConfig;
//!
//! let mut config = EvolutionConfig::default();
//! config.network.num_inputs = 2;
//! config.network.num_hidden_layers = 1;
//! config.network.neurons_per_hidden_layer = 4;
//!
//! // Fitness: how close the network gets to XOR on the four input pairs.
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
//! let stats = trainer.run_with_callback(|progress| {
//!     println!(
//!         "generation {}: best fitness = {:.3}",
//!         progress.generation, progress.best_fitness
//!     );
//! });
//! println!("stopped after {} generations: {:?}", stats.generations, stats.stop_reason);
//! ```

mod engine;
mod genome;
mod trainer;

pub use engine::GeneticAlgorithm;
pub use genome::Genome;
pub use trainer::{Progress, Trainer};
