//! Network configuration types.

use serde::{Deserialize, Serialize};

/// Topology and activation parameters for a feedforward network.
///
/// The topology is fixed once a network is built from it; evolution only ever
/// touches the weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of network inputs.
    #[serde(default = "default_num_inputs")]
    pub num_inputs: usize,
    /// Number of hidden layers. 0 gives a single-layer network.
    #[serde(default)]
    pub num_hidden_layers: usize,
    /// Neurons per hidden layer.
    #[serde(default = "default_neurons_per_hidden_layer")]
    pub neurons_per_hidden_layer: usize,
    /// Number of network outputs.
    #[serde(default = "default_num_outputs")]
    pub num_outputs: usize,
    /// Sigmoid response. Lower values push the curve toward a step function;
    /// must be nonzero.
    #[serde(default = "default_activation_response")]
    pub activation_response: f64,
    /// Constant input the trailing bias weight of each neuron is multiplied by.
    #[serde(default = "default_bias")]
    pub bias: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            num_inputs: default_num_inputs(),
            num_hidden_layers: 0,
            neurons_per_hidden_layer: default_neurons_per_hidden_layer(),
            num_outputs: default_num_outputs(),
            activation_response: default_activation_response(),
            bias: default_bias(),
        }
    }
}

fn default_num_inputs() -> usize {
    1
}
fn default_neurons_per_hidden_layer() -> usize {
    1
}
fn default_num_outputs() -> usize {
    1
}
fn default_activation_response() -> f64 {
    1.0
}
fn default_bias() -> f64 {
    -1.0
}

impl NetworkConfig {
    /// Total weight count for this topology, counting one bias weight per
    /// neuron. This is the chromosome length a matching genome must carry.
    pub fn num_weights(&self) -> usize {
        if self.num_hidden_layers == 0 {
            return self.num_outputs * (self.num_inputs + 1);
        }

        let hidden = self.neurons_per_hidden_layer;
        let first = hidden * (self.num_inputs + 1);
        let middle = (self.num_hidden_layers - 1) * hidden * (hidden + 1);
        let output = self.num_outputs * (hidden + 1);

        first + middle + output
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_inputs == 0 || self.num_outputs == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.num_hidden_layers > 0 && self.neurons_per_hidden_layer == 0 {
            return Err(ConfigError::InvalidHiddenWidth);
        }
        if self.activation_response == 0.0 {
            return Err(ConfigError::InvalidActivationResponse);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Input and output counts must be non-zero")]
    InvalidDimensions,
    #[error("Hidden layers must have at least one neuron")]
    InvalidHiddenWidth,
    #[error("Activation response must be nonzero")]
    InvalidActivationResponse,
}
