//! Supervised pre-fit of a scorer against a corpus.
//!
//! Plain stochastic gradient descent: every epoch visits each sample once in a fresh random
//! order and applies its gradient immediately. Training stops early once the summed squared
//! error over the corpus reaches the goal.

use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};
use tracing::info;
use wildcat_evaluator::scorer::Scorer;

use crate::{corpus::Corpus, weights};

pub const DEFAULT_EPOCHS: usize = 500;
pub const DEFAULT_SHOW: usize = 50;
pub const DEFAULT_GOAL: f32 = 0.01;
pub const DEFAULT_LEARNING_RATE: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("corpus has no samples")]
    EmptyCorpus,
    #[display(
        "corpus rows are {corpus_inputs}->{corpus_outputs} but the scorer is {inputs}->{outputs}"
    )]
    ShapeMismatch {
        corpus_inputs: usize,
        corpus_outputs: usize,
        inputs: usize,
        outputs: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub epochs: usize,
    /// Log every `show` epochs; 0 disables progress logs.
    pub show: usize,
    pub goal: f32,
    pub learning_rate: f32,
}

impl Default for Trainer {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            show: DEFAULT_SHOW,
            goal: DEFAULT_GOAL,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub epochs_run: usize,
    /// Summed squared error after each epoch.
    pub errors: Vec<f32>,
    pub reached_goal: bool,
}

impl TrainingReport {
    #[must_use]
    pub fn final_error(&self) -> Option<f32> {
        self.errors.last().copied()
    }
}

impl Trainer {
    pub fn train<S, R>(
        &self,
        scorer: &mut S,
        corpus: &Corpus,
        rng: &mut R,
    ) -> Result<TrainingReport, TrainingError>
    where
        S: Scorer + ?Sized,
        R: Rng + ?Sized,
    {
        if corpus.is_empty() {
            return Err(TrainingError::EmptyCorpus);
        }
        if corpus.input_len() != scorer.input_len() || corpus.output_len() != scorer.output_len()
        {
            return Err(TrainingError::ShapeMismatch {
                corpus_inputs: corpus.input_len(),
                corpus_outputs: corpus.output_len(),
                inputs: scorer.input_len(),
                outputs: scorer.output_len(),
            });
        }

        let samples = corpus.samples();
        let mut order = (0..samples.len()).collect::<Vec<_>>();
        let mut errors = Vec::with_capacity(self.epochs);
        let mut reached_goal = false;

        for epoch in 1..=self.epochs {
            order.shuffle(rng);
            for &i in &order {
                let sample = &samples[i];
                let gradient = scorer.gradient(&sample.inputs, &sample.targets);
                scorer.apply_gradient(&gradient, self.learning_rate);
            }

            let error = samples
                .iter()
                .map(|s| weights::sum_squared_error(&scorer.evaluate(&s.inputs), &s.targets))
                .sum::<f32>();
            errors.push(error);
            reached_goal = error <= self.goal;

            if self.show > 0 && (epoch % self.show == 0 || reached_goal) {
                info!(epoch, epochs = self.epochs, error, "training");
            }
            if reached_goal {
                break;
            }
        }

        Ok(TrainingReport {
            epochs_run: errors.len(),
            errors,
            reached_goal,
        })
    }
}
