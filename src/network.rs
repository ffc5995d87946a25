use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use std::path::Path;

use crate::checkpoint::Checkpoint;
use crate::error::{QuestError, Result};
use crate::layers::{Activation, DenseLayer, WeightInit};
use crate::optimizer::{GradientClipper, Optimizer, Sgd};

/// Default ceiling for the L2 norm of each weight gradient.
pub const DEFAULT_MAX_GRAD_NORM: f32 = 10.0;

const WEIGHT_NAMES: [&str; 3] = ["W1", "W2", "W3"];
const BIAS_NAMES: [&str; 3] = ["b1", "b2", "b3"];

/// Three-layer fully connected Q-value approximator.
///
/// `input -> linear -> ReLU -> linear -> ReLU -> linear`. Forward passes cache
/// the activations of the most recent batch, and `backward` re-runs the
/// forward pass before computing gradients, so the caches always match the
/// batch being trained on.
#[derive(Clone, Debug)]
pub struct ValueNetwork {
    layers: Vec<DenseLayer>,
    optimizer: Sgd,
    clipper: GradientClipper,
}

impl ValueNetwork {
    /// Create a network with He-normal weights drawn from `rng` and zero biases.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        for (name, size) in [("input_size", input_size), ("hidden_size", hidden_size), ("output_size", output_size)] {
            if size == 0 {
                return Err(QuestError::invalid_parameter(name, "must be positive"));
            }
        }

        let sizes = [input_size, hidden_size, hidden_size, output_size];
        let activations = [Activation::Relu, Activation::Relu, Activation::Linear];
        let layers = sizes
            .windows(2)
            .zip(activations)
            .map(|(window, activation)| {
                DenseLayer::new_with_init(window[0], window[1], activation, WeightInit::HeNormal, &mut *rng)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ValueNetwork {
            layers,
            optimizer: Sgd::new(),
            clipper: GradientClipper::ClipByNorm {
                max_norm: DEFAULT_MAX_GRAD_NORM,
            },
        })
    }

    pub fn with_clipper(mut self, clipper: GradientClipper) -> Self {
        self.clipper = clipper;
        self
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.layers[0].output_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    /// Perform a forward pass for a batch of observations, one per row.
    pub fn forward(&mut self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        if inputs.ncols() != self.input_size() {
            return Err(QuestError::dimension_mismatch(
                format!("(batch, {})", self.input_size()),
                format!("{:?}", inputs.dim()),
            ));
        }
        let mut current_output = inputs.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_batch(current_output.view());
        }
        Ok(current_output)
    }

    /// Q-values for a single observation.
    pub fn predict(&mut self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// One SGD step on the mean-squared error between the outputs for `inputs` and `targets`.
    ///
    /// Returns the loss measured before the update.
    pub fn backward(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        let outputs = self.forward(inputs)?;
        if outputs.dim() != targets.dim() {
            return Err(QuestError::dimension_mismatch(
                format!("{:?}", outputs.dim()),
                format!("{:?}", targets.dim()),
            ));
        }

        let batch_size = inputs.nrows().max(1) as f32;
        let diff = &outputs - &targets;
        let loss = diff.mapv(|d| d * d).mean().unwrap_or(0.0);
        if !loss.is_finite() {
            return Err(QuestError::NumericalError(format!("non-finite loss {}", loss)));
        }
        let mut current_error = diff / batch_size;

        let mut gradients = Vec::with_capacity(self.layers.len());
        for i in (0..self.layers.len()).rev() {
            let layer = &self.layers[i];
            let grads = layer.backward_batch(current_error.view())?;
            if i != 0 {
                current_error = grads.adjusted_error.dot(&layer.weights.t());
            }
            gradients.push((grads.weights, grads.biases));
        }
        gradients.reverse();

        for (layer, (mut weight_gradients, bias_gradients)) in self.layers.iter_mut().zip(gradients) {
            self.clipper.clip_weights(&mut weight_gradients);
            self.optimizer.update_weights(&mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(&mut layer.biases, &bias_gradients, learning_rate);
        }
        Ok(loss)
    }

    /// Deep-copy every parameter tensor from `other`.
    pub fn copy_from(&mut self, other: &ValueNetwork) -> Result<()> {
        self.check_same_shape(other)?;
        for (dst, src) in self.layers.iter_mut().zip(&other.layers) {
            dst.weights.assign(&src.weights);
            dst.biases.assign(&src.biases);
            dst.clear_cache();
        }
        Ok(())
    }

    fn check_same_shape(&self, other: &ValueNetwork) -> Result<()> {
        let dims = |n: &ValueNetwork| (n.input_size(), n.hidden_size(), n.output_size());
        if dims(self) != dims(other) {
            return Err(QuestError::dimension_mismatch(
                format!("{:?}", dims(self)),
                format!("{:?}", dims(other)),
            ));
        }
        Ok(())
    }

    /// Export the six parameter tensors as `W1, b1, W2, b2, W3, b3`.
    pub fn to_checkpoint(&self) -> Checkpoint {
        let mut checkpoint = Checkpoint::new();
        for (i, layer) in self.layers.iter().enumerate() {
            checkpoint.insert_matrix(WEIGHT_NAMES[i], &layer.weights);
            checkpoint.insert_vector(BIAS_NAMES[i], &layer.biases);
        }
        checkpoint
    }

    /// Replace every parameter with the tensors in `checkpoint`.
    ///
    /// All six tensors are validated before any of them is applied.
    pub fn load_checkpoint(&mut self, checkpoint: &Checkpoint) -> Result<()> {
        let mut loaded = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let weights = checkpoint.matrix(WEIGHT_NAMES[i], layer.weights.dim())?;
            let biases = checkpoint.vector(BIAS_NAMES[i], layer.biases.len())?;
            loaded.push((weights, biases));
        }
        for (layer, (weights, biases)) in self.layers.iter_mut().zip(loaded) {
            layer.weights = weights;
            layer.biases = biases;
            layer.clear_cache();
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_checkpoint().save(path)
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let checkpoint = Checkpoint::load(path)?;
        self.load_checkpoint(&checkpoint)
    }
}
