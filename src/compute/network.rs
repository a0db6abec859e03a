//! Feedforward network evaluator with a flat weight-vector encoding.
//!
//! The encoding contract both sides of genome/network interop rely on: weights
//! flatten layer by layer (input to output), neuron by neuron (declaration
//! order), and within a neuron per-input weights in order with the bias weight
//! last. `weights` and `put_weights` use the same traversal, so any vector of
//! the right length round-trips exactly.

use serde::{Deserialize, Serialize};

use crate::compute::rng::RandomSource;
use crate::schema::NetworkConfig;

/// A single neuron: one weight per input plus a trailing bias weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neuron {
    weights: Vec<f64>,
}

impl Neuron {
    fn new(num_inputs: usize, rng: &mut impl RandomSource) -> Self {
        Self {
            weights: (0..num_inputs + 1).map(|_| rng.next_weight()).collect(),
        }
    }

    fn zeroed(num_inputs: usize) -> Self {
        Self {
            weights: vec![0.0; num_inputs + 1],
        }
    }

    /// The neuron's weights, bias weight last.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Input width of this neuron, excluding the bias weight.
    pub fn num_inputs(&self) -> usize {
        self.weights.len() - 1
    }
}

/// An ordered group of neurons sharing the same input width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronLayer {
    neurons: Vec<Neuron>,
}

impl NeuronLayer {
    fn new(num_neurons: usize, inputs_per_neuron: usize, rng: &mut impl RandomSource) -> Self {
        Self {
            neurons: (0..num_neurons)
                .map(|_| Neuron::new(inputs_per_neuron, rng))
                .collect(),
        }
    }

    fn zeroed(num_neurons: usize, inputs_per_neuron: usize) -> Self {
        Self {
            neurons: (0..num_neurons)
                .map(|_| Neuron::zeroed(inputs_per_neuron))
                .collect(),
        }
    }

    /// The layer's neurons in declaration order.
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }
}

/// Weight-vector errors when inflating a network from a flat vector.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("Expected {expected} weights, got {got}")]
    WeightCount { expected: usize, got: usize },
}

/// Fixed-topology feedforward network.
///
/// Layers run input to output: the hidden layers (uniform width), then one
/// output layer. Each layer's input width equals the previous layer's neuron
/// count, or the network input width for the first layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralNet {
    num_inputs: usize,
    num_outputs: usize,
    activation_response: f64,
    bias: f64,
    layers: Vec<NeuronLayer>,
}

impl NeuralNet {
    /// Build a network for `config` with randomly initialized weights, each
    /// drawn as the difference of two uniform `[0, 1)` values.
    pub fn new(config: &NetworkConfig, rng: &mut impl RandomSource) -> Self {
        let mut layers = Vec::with_capacity(config.num_hidden_layers + 1);

        if config.num_hidden_layers > 0 {
            let width = config.neurons_per_hidden_layer;
            layers.push(NeuronLayer::new(width, config.num_inputs, rng));
            for _ in 0..config.num_hidden_layers - 1 {
                layers.push(NeuronLayer::new(width, width, rng));
            }
            layers.push(NeuronLayer::new(config.num_outputs, width, rng));
        } else {
            layers.push(NeuronLayer::new(config.num_outputs, config.num_inputs, rng));
        }

        Self {
            num_inputs: config.num_inputs,
            num_outputs: config.num_outputs,
            activation_response: config.activation_response,
            bias: config.bias,
            layers,
        }
    }

    /// Build a network for `config` and inflate `weights` into it in one step.
    /// This is the decode path: a genome's chromosome becomes a runnable
    /// network.
    pub fn from_weights(config: &NetworkConfig, weights: &[f64]) -> Result<Self, NetworkError> {
        let mut layers = Vec::with_capacity(config.num_hidden_layers + 1);

        if config.num_hidden_layers > 0 {
            let width = config.neurons_per_hidden_layer;
            layers.push(NeuronLayer::zeroed(width, config.num_inputs));
            for _ in 0..config.num_hidden_layers - 1 {
                layers.push(NeuronLayer::zeroed(width, width));
            }
            layers.push(NeuronLayer::zeroed(config.num_outputs, width));
        } else {
            layers.push(NeuronLayer::zeroed(config.num_outputs, config.num_inputs));
        }

        let mut net = Self {
            num_inputs: config.num_inputs,
            num_outputs: config.num_outputs,
            activation_response: config.activation_response,
            bias: config.bias,
            layers,
        };
        net.put_weights(weights)?;
        Ok(net)
    }

    /// Number of network inputs.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Number of network outputs.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// The layers in input-to-output order, output layer last.
    pub fn layers(&self) -> &[NeuronLayer] {
        &self.layers
    }

    /// Total number of weights in the network, bias weights included.
    pub fn num_weights(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|layer| &layer.neurons)
            .map(|neuron| neuron.weights.len())
            .sum()
    }

    /// Flatten all weights in the canonical order (layer, neuron, weight with
    /// bias last). The result has exactly `num_weights()` entries.
    pub fn weights(&self) -> Vec<f64> {
        let mut weights = Vec::with_capacity(self.num_weights());
        for layer in &self.layers {
            for neuron in &layer.neurons {
                weights.extend_from_slice(&neuron.weights);
            }
        }
        weights
    }

    /// Inflate a flat weight vector back into the network using the canonical
    /// order. A length mismatch leaves the network untouched and returns
    /// [`NetworkError::WeightCount`].
    pub fn put_weights(&mut self, weights: &[f64]) -> Result<(), NetworkError> {
        let expected = self.num_weights();
        if weights.len() != expected {
            return Err(NetworkError::WeightCount {
                expected,
                got: weights.len(),
            });
        }

        let mut next = weights.iter();
        for layer in &mut self.layers {
            for neuron in &mut layer.neurons {
                for weight in &mut neuron.weights {
                    if let Some(value) = next.next() {
                        *weight = *value;
                    }
                }
            }
        }
        Ok(())
    }

    /// Run the forward pass.
    ///
    /// Returns one value per output neuron, each in the open interval (0, 1).
    /// An input slice of the wrong arity yields an empty vector; callers check
    /// the output length rather than handle an error.
    pub fn update(&self, inputs: &[f64]) -> Vec<f64> {
        if inputs.len() != self.num_inputs {
            return Vec::new();
        }

        let mut outputs = inputs.to_vec();
        for layer in &self.layers {
            let layer_inputs = outputs;
            outputs = Vec::with_capacity(layer.neurons.len());

            for neuron in &layer.neurons {
                let split = neuron.weights.len() - 1;
                let mut net_input = 0.0;
                for (weight, input) in neuron.weights[..split].iter().zip(&layer_inputs) {
                    net_input += weight * input;
                }
                net_input += neuron.weights[split] * self.bias;

                outputs.push(sigmoid(net_input, self.activation_response));
            }
        }

        outputs
    }
}

/// Sigmoid response curve. Smaller `response` values sharpen the curve toward
/// a step function; `response` must be nonzero.
pub fn sigmoid(activation: f64, response: f64) -> f64 {
    1.0 / (1.0 + (-activation / response).exp())
}
