//! Compute module - the network evaluator and the evolution engine.

mod network;
mod rng;

pub mod evolution;

pub use network::*;
pub use rng::*;
