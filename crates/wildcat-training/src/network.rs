//! A small fully connected feed-forward network with tanh activations.
//!
//! Every layer computes `a = tanh(W x + b)`, including the output layer, so predictions lie
//! in `(-1, 1)`. Rewards and training targets are scaled into that range before they reach
//! the network.
//!
//! # Parameter Layout
//!
//! Each [`Layer`] keeps its parameters in one flat vector: the `outputs × inputs` weight
//! matrix row by row, followed by the `outputs` biases. A [`Gradient`] produced by
//! [`Scorer::gradient`] has one vector per layer in exactly that layout.
//!
//! # Initialization
//!
//! Weights are drawn from `N(0, 1 / fan_in)` and biases start at zero.

use rand::Rng;
use rand_distr::NormalError;
use serde::{Deserialize, Serialize};
use wildcat_evaluator::scorer::{Gradient, Scorer};

use crate::weights;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("a network needs at least an input and an output layer, all non-empty")]
    InvalidSizes,
    #[display("layer {index} has {actual} parameters, expected {expected}")]
    ParameterCount {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[display("layer {index} takes {inputs} inputs but the previous layer has {previous} outputs")]
    Disconnected {
        index: usize,
        inputs: usize,
        previous: usize,
    },
    #[display("{source}")]
    Init { source: NormalError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    inputs: usize,
    outputs: usize,
    params: Vec<f32>,
}

impl Layer {
    fn random<R>(inputs: usize, outputs: usize, rng: &mut R) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let sigma = (1.0 / inputs as f32).sqrt();
        let mut params = weights::random_normal(rng, sigma, inputs * outputs)
            .map_err(|source| NetworkError::Init { source })?;
        params.resize(inputs * outputs + outputs, 0.0);
        Ok(Self {
            inputs,
            outputs,
            params,
        })
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    #[must_use]
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    fn weights(&self) -> &[f32] {
        &self.params[..self.inputs * self.outputs]
    }

    fn biases(&self) -> &[f32] {
        &self.params[self.inputs * self.outputs..]
    }

    fn forward(&self, x: &[f32]) -> Vec<f32> {
        self.weights()
            .chunks_exact(self.inputs)
            .zip(self.biases())
            .map(|(row, b)| (row.iter().zip(x).map(|(w, x)| w * x).sum::<f32>() + b).tanh())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardNet {
    layers: Vec<Layer>,
}

impl FeedForwardNet {
    /// Builds a randomly initialized network with the given layer sizes, input first.
    pub fn new<R>(sizes: &[usize], rng: &mut R) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        if sizes.len() < 2 || sizes.contains(&0) {
            return Err(NetworkError::InvalidSizes);
        }
        let layers = sizes
            .windows(2)
            .map(|pair| Layer::random(pair[0], pair[1], rng))
            .collect::<Result<_, _>>()?;
        Ok(Self { layers })
    }

    /// One hidden layer of `2 * (inputs + outputs) / 3` units.
    pub fn with_hidden_layer<R>(
        inputs: usize,
        outputs: usize,
        rng: &mut R,
    ) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        let hidden = (2 * (inputs + outputs) / 3).max(1);
        Self::new(&[inputs, hidden, outputs], rng)
    }

    /// Checks that the layers chain and every parameter vector has the right length.
    ///
    /// Deserialized networks should be validated before use.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.layers.is_empty() {
            return Err(NetworkError::InvalidSizes);
        }
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.inputs == 0 || layer.outputs == 0 {
                return Err(NetworkError::InvalidSizes);
            }
            let expected = (layer.inputs + 1) * layer.outputs;
            if layer.params.len() != expected {
                return Err(NetworkError::ParameterCount {
                    index,
                    expected,
                    actual: layer.params.len(),
                });
            }
            if index > 0 && self.layers[index - 1].outputs != layer.inputs {
                return Err(NetworkError::Disconnected {
                    index,
                    inputs: layer.inputs,
                    previous: self.layers[index - 1].outputs,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer sizes, input first.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![self.input_len()];
        sizes.extend(self.layers.iter().map(|l| l.outputs));
        sizes
    }

    #[must_use]
    pub fn param_count(&self) -> usize {
        self.layers.iter().map(|l| l.params.len()).sum()
    }

    /// `Σ (output - target)²` for one sample.
    #[must_use]
    pub fn squared_error(&self, inputs: &[f32], targets: &[f32]) -> f32 {
        weights::sum_squared_error(&self.evaluate(inputs), targets)
    }

    /// Activations of every layer, input first.
    fn activations(&self, inputs: &[f32]) -> Vec<Vec<f32>> {
        assert_eq!(inputs.len(), self.input_len(), "network input length");
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(inputs.to_vec());
        for layer in &self.layers {
            let next = layer.forward(&activations[activations.len() - 1]);
            activations.push(next);
        }
        activations
    }
}

impl Scorer for FeedForwardNet {
    fn input_len(&self) -> usize {
        self.layers[0].inputs
    }

    fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].outputs
    }

    fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        self.activations(inputs).pop().unwrap_or_default()
    }

    /// Backpropagates `½ Σ (output - target)²`.
    fn gradient(&self, inputs: &[f32], targets: &[f32]) -> Gradient {
        assert_eq!(targets.len(), self.output_len(), "network target length");
        let activations = self.activations(inputs);
        let output = &activations[activations.len() - 1];

        // error signal at the pre-activation of the current layer
        let mut delta = output
            .iter()
            .zip(targets)
            .map(|(a, t)| (a - t) * (1.0 - a * a))
            .collect::<Vec<_>>();

        let mut layers = vec![Vec::new(); self.layers.len()];
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let input = &activations[index];
            let mut grad = Vec::with_capacity(layer.params.len());
            for d in &delta {
                grad.extend(input.iter().map(|x| d * x));
            }
            grad.extend(&delta);

            if index > 0 {
                delta = (0..layer.inputs)
                    .map(|i| {
                        let back = layer
                            .weights()
                            .chunks_exact(layer.inputs)
                            .zip(&delta)
                            .map(|(row, d)| row[i] * d)
                            .sum::<f32>();
                        back * (1.0 - input[i] * input[i])
                    })
                    .collect();
            }
            layers[index] = grad;
        }
        Gradient::new(layers)
    }

    fn apply_gradient(&mut self, gradient: &Gradient, learning_rate: f32) {
        assert_eq!(gradient.layers.len(), self.layers.len(), "gradient layer count");
        for (layer, grad) in self.layers.iter_mut().zip(&gradient.layers) {
            weights::descend(&mut layer.params, grad, learning_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn sample_net(sizes: &[usize]) -> FeedForwardNet {
        FeedForwardNet::new(sizes, &mut Pcg64::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_shapes() {
        let net = FeedForwardNet::with_hidden_layer(60, 30, &mut Pcg64::seed_from_u64(0)).unwrap();
        assert_eq!(net.sizes(), [60, 60, 30]);
        assert_eq!(net.input_len(), 60);
        assert_eq!(net.output_len(), 30);
        assert_eq!(net.param_count(), 61 * 60 + 61 * 30);
        assert!(net.validate().is_ok());

        let small = FeedForwardNet::with_hidden_layer(3, 2, &mut Pcg64::seed_from_u64(0)).unwrap();
        assert_eq!(small.sizes(), [3, 3, 2]);
    }

    #[test]
    fn test_invalid_sizes() {
        let mut rng = Pcg64::seed_from_u64(0);
        assert_eq!(
            FeedForwardNet::new(&[3], &mut rng),
            Err(NetworkError::InvalidSizes)
        );
        assert_eq!(
            FeedForwardNet::new(&[3, 0, 2], &mut rng),
            Err(NetworkError::InvalidSizes)
        );
    }

    #[test]
    fn test_outputs_are_bounded() {
        let net = sample_net(&[4, 5, 3]);
        let outputs = net.evaluate(&[100.0, -50.0, 3.0, 0.0]);
        assert_eq!(outputs.len(), 3);
        assert!(outputs.iter().all(|o| (-1.0..=1.0).contains(o)));
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let net = sample_net(&[3, 4, 2]);
        let inputs = [0.3, -0.7, 0.5];
        let targets = [0.2, -0.4];
        let gradient = net.gradient(&inputs, &targets);
        let eps = 1e-3;

        for (l, layer) in net.layers.iter().enumerate() {
            assert_eq!(gradient.layers[l].len(), layer.params.len());
            for p in 0..layer.params.len() {
                let mut plus = net.clone();
                plus.layers[l].params[p] += eps;
                let mut minus = net.clone();
                minus.layers[l].params[p] -= eps;
                let numeric = (plus.squared_error(&inputs, &targets)
                    - minus.squared_error(&inputs, &targets))
                    / (4.0 * eps);
                let analytic = gradient.layers[l][p];
                assert!(
                    (numeric - analytic).abs() < 2e-3,
                    "layer {l} param {p}: numeric {numeric} analytic {analytic}"
                );
            }
        }
    }

    #[test]
    fn test_gradient_step_reduces_error() {
        let mut net = sample_net(&[3, 4, 2]);
        let inputs = [0.3, -0.7, 0.5];
        let targets = [0.9, -0.9];
        let before = net.squared_error(&inputs, &targets);
        let gradient = net.gradient(&inputs, &targets);
        net.apply_gradient(&gradient, 0.1);
        assert!(net.squared_error(&inputs, &targets) < before);
    }

    #[test]
    fn test_zero_error_gives_zero_gradient() {
        let net = sample_net(&[2, 3, 2]);
        let inputs = [0.1, 0.2];
        let targets = net.evaluate(&inputs);
        assert!(net.gradient(&inputs, &targets).is_zero());
    }

    #[test]
    fn test_serde_round_trip_keeps_predictions() {
        let net = sample_net(&[3, 3, 2]);
        let json = serde_json::to_string(&net).unwrap();
        let restored: FeedForwardNet = serde_json::from_str(&json).unwrap();
        assert!(restored.validate().is_ok());
        let inputs = [0.1, 0.2, 0.3];
        for (a, b) in restored.evaluate(&inputs).iter().zip(net.evaluate(&inputs)) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_validate_detects_corruption() {
        let mut net = sample_net(&[3, 3, 2]);
        net.layers[1].params.pop();
        assert!(matches!(
            net.validate(),
            Err(NetworkError::ParameterCount { index: 1, .. })
        ));

        let mut net = sample_net(&[3, 3, 2]);
        net.layers[1].inputs = 4;
        net.layers[1].params.resize(10, 0.0);
        assert!(matches!(
            net.validate(),
            Err(NetworkError::Disconnected { index: 1, .. })
        ));
    }
}
