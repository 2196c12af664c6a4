//! The scoring capability consumed by the decision core.
//!
//! A [`Scorer`] is a differentiable function from a fixed-length input vector to a
//! fixed-length output vector. The core never looks inside it: zoom search calls
//! [`Scorer::evaluate`], and reward updates call [`Scorer::gradient`] followed by
//! [`Scorer::apply_gradient`]. Persistence is left to the concrete backend.

use std::fmt;

/// Per-layer parameter gradients of a scorer's error.
///
/// The layout of each layer vector is owned by the scorer that produced it; callers only
/// carry it back to [`Scorer::apply_gradient`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gradient {
    pub layers: Vec<Vec<f32>>,
}

impl Gradient {
    #[must_use]
    pub fn new(layers: Vec<Vec<f32>>) -> Self {
        Self { layers }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.layers.iter().flatten().all(|g| *g == 0.0)
    }

    /// Sum of squared components.
    #[must_use]
    pub fn norm_squared(&self) -> f32 {
        self.layers.iter().flatten().map(|g| g * g).sum()
    }
}

pub trait Scorer: fmt::Debug {
    #[must_use]
    fn input_len(&self) -> usize;

    #[must_use]
    fn output_len(&self) -> usize;

    /// Scores `inputs`, which must have [`input_len`](Self::input_len) elements.
    #[must_use]
    fn evaluate(&self, inputs: &[f32]) -> Vec<f32>;

    /// Gradient of the squared error between `evaluate(inputs)` and `targets`.
    #[must_use]
    fn gradient(&self, inputs: &[f32], targets: &[f32]) -> Gradient;

    /// Moves every parameter by `-learning_rate * gradient`.
    fn apply_gradient(&mut self, gradient: &Gradient, learning_rate: f32);
}

impl<S> Scorer for Box<S>
where
    S: Scorer + ?Sized,
{
    fn input_len(&self) -> usize {
        self.as_ref().input_len()
    }

    fn output_len(&self) -> usize {
        self.as_ref().output_len()
    }

    fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        self.as_ref().evaluate(inputs)
    }

    fn gradient(&self, inputs: &[f32], targets: &[f32]) -> Gradient {
        self.as_ref().gradient(inputs, targets)
    }

    fn apply_gradient(&mut self, gradient: &Gradient, learning_rate: f32) {
        self.as_mut().apply_gradient(gradient, learning_rate);
    }
}
