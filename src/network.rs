use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;

/// A fully connected layer: weights, biases, and an activation function.
///
/// The layer caches the inputs and pre-activation outputs of its most recent
/// forward pass; the backward pass consumes those caches.
#[derive(Serialize, Deserialize, Clone)]
pub struct Layer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation_output: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl Layer {
    /// Create a new layer with the given input size, output size, and activation function.
    /// The weights are initialized with random values from a uniform distribution
    /// between -0.1 and 0.1. The biases are initialized with zeros.
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        let weights = Array2::random((input_size, output_size), Uniform::new(-0.1, 0.1));
        let biases = Array1::zeros(output_size);
        Layer {
            weights,
            biases,
            activation,
            pre_activation_output: None,
            inputs: None,
        }
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Self {
        assert_eq!(weights.dim(), self.weights.dim());
        self.weights = weights;
        self
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Self {
        assert_eq!(biases.dim(), self.biases.dim());
        self.biases = biases;
        self
    }

    /// Perform a forward pass for a batch of input vectors, caching the
    /// inputs and pre-activation outputs for a subsequent backward pass.
    fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.clone().insert_axis(Axis(0));
        self.pre_activation_output = Some(outputs.clone());
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Compute gradients for the layer's weights and biases for a batch of
    /// output errors, using the activations cached by the last forward pass.
    /// Returns the error propagated to the layer inputs alongside the
    /// weight and bias gradients.
    fn backward_batch(&self, output_errors: ArrayView2<f32>) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
        let pre_activation_output = self.pre_activation_output.as_ref()
            .expect("No pre-activation output stored. forward_batch() must be called before backward_batch()");
        let inputs = self.inputs.as_ref()
            .expect("No inputs stored. forward_batch() must be called before backward_batch()");
        let activation_deriv = self.activation.derivative_batch(pre_activation_output.view());
        let adjusted_error = output_errors.to_owned() * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));
        (adjusted_error, weight_gradients, bias_gradients)
    }
}

/// An enumeration of the activation functions available to Q-network layers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    /// Apply the activation function to a batch of input arrays in-place.
    fn apply_batch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    /// Compute the derivative of the activation function for a batch of input arrays.
    fn derivative_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => {
                inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
            }
            Activation::Linear => {
                // Derivative of linear activation is always 1
                Array2::ones(inputs.dim())
            }
        }
    }
}

/// A shared, single-threaded handle to a Q-network.
///
/// Action selection reads the network while learning mutates it; the handle
/// enforces the strict act-then-learn alternation at runtime.
pub type SharedQNetwork = Rc<RefCell<QNetwork>>;

/// A value function mapping a batch of states to one scalar value per
/// discrete action.
///
/// Forward passes are plain numeric evaluation; gradients exist only where a
/// caller explicitly runs `backward_batch` afterwards. The network does not
/// own an optimizer; whoever trains it owns the update rule.
#[derive(Serialize, Deserialize, Clone)]
pub struct QNetwork {
    pub layers: Vec<Layer>,
}

impl QNetwork {
    /// Create a new Q-network with the given layer sizes and activations.
    pub fn new(layer_sizes: &[usize], activations: &[Activation]) -> Self {
        assert_eq!(layer_sizes.len() - 1, activations.len());

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| {
                let input_size = window[0];
                let output_size = window[1];
                Layer::new(input_size, output_size, activation)
            })
            .collect::<Vec<_>>();

        QNetwork { layers }
    }

    /// Create a Q-network with the conventional value-function shape:
    /// ReLU hidden layers and a linear output layer.
    pub fn value_network(layer_sizes: &[usize]) -> Self {
        assert!(layer_sizes.len() >= 2, "network needs at least input and output sizes");
        let mut activations = vec![Activation::Relu; layer_sizes.len() - 2];
        activations.push(Activation::Linear);
        Self::new(layer_sizes, &activations)
    }

    pub fn with_layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    /// Wrap the network in a shared handle for use by strategies.
    pub fn into_shared(self) -> SharedQNetwork {
        Rc::new(RefCell::new(self))
    }

    /// Size of the discrete action space this network scores.
    pub fn num_actions(&self) -> usize {
        self.layers.last().map(|layer| layer.biases.len()).unwrap_or(0)
    }

    /// Perform a forward pass for a single state.
    pub fn forward(&mut self, state: ArrayView1<f32>) -> Array1<f32> {
        let state = state.insert_axis(Axis(0)); // Treat single state as a batch of one
        let output = self.forward_batch(state.view());
        let output_shape = output.shape()[1];
        output.into_shape((output_shape,)).unwrap() // Remove the batch dimension
    }

    /// Perform a forward pass for a batch of states.
    pub fn forward_batch(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        let mut current_output = states.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_batch(current_output.view());
        }
        current_output
    }

    /// Backpropagate a batch of output errors through the network, returning
    /// per-layer weight and bias gradients ordered from input to output.
    ///
    /// Consumes the activations cached by the most recent `forward_batch`
    /// call, so the differentiable pass must be the last one run.
    pub fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Vec<(Array2<f32>, Array1<f32>)> {
        let mut gradients: Vec<(Array2<f32>, Array1<f32>)> = Vec::new();
        let mut current_error = output_errors.to_owned();

        let length = self.layers.len();
        for i in (0..length).rev() {
            let layer = &self.layers[i];
            let (adjusted_error, weight_gradients, bias_gradients) =
                layer.backward_batch(current_error.view());
            gradients.push((weight_gradients, bias_gradients));

            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        gradients
    }

    /// Save the network's state to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a network from a file.
    pub fn load(path: &str) -> Result<Self> {
        let data = std::fs::read(path)?;
        let deserialized: Self = bincode::deserialize(&data)?;
        Ok(deserialized)
    }
}
