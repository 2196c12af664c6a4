//! Online temporal-difference updates of a scorer after a decision plays out.

use serde::{Deserialize, Serialize};

use crate::scorer::Scorer;

pub const DEFAULT_DISCOUNT: f32 = 0.9;
pub const DEFAULT_LEARNING_RATE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("chosen output {chosen} is out of range for {outputs} outputs")]
pub struct InvalidMemoryError {
    chosen: usize,
    outputs: usize,
}

/// What a scorer saw and answered when it last made a decision.
///
/// `chosen` always indexes `outputs`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMemory {
    inputs: Vec<f32>,
    outputs: Vec<f32>,
    chosen: usize,
}

impl DecisionMemory {
    pub fn new(
        inputs: Vec<f32>,
        outputs: Vec<f32>,
        chosen: usize,
    ) -> Result<Self, InvalidMemoryError> {
        if chosen >= outputs.len() {
            return Err(InvalidMemoryError {
                chosen,
                outputs: outputs.len(),
            });
        }
        Ok(Self {
            inputs,
            outputs,
            chosen,
        })
    }

    #[must_use]
    pub fn inputs(&self) -> &[f32] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[f32] {
        &self.outputs
    }

    #[must_use]
    pub fn chosen(&self) -> usize {
        self.chosen
    }

    #[must_use]
    pub fn chosen_output(&self) -> f32 {
        self.outputs[self.chosen]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum RewardOutcome {
    /// There was no decision to reward.
    Skipped,
    /// The prediction was already exact.
    Unchanged,
    Updated { delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardUpdate {
    pub discount: f32,
    pub learning_rate: f32,
}

impl Default for RewardUpdate {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

impl RewardUpdate {
    #[must_use]
    pub fn new(discount: f32, learning_rate: f32) -> Self {
        Self {
            discount,
            learning_rate,
        }
    }

    /// `reward + discount * next_best - predicted`
    #[must_use]
    pub fn temporal_difference(&self, predicted: f32, reward: f32, next_best: f32) -> f32 {
        reward + self.discount * next_best - predicted
    }

    /// Moves the remembered chosen output toward `reward + discount * next_best`.
    ///
    /// Only the chosen entry of the target differs from the remembered outputs, so the other
    /// outputs contribute no error. A zero delta leaves the scorer untouched.
    pub fn apply<S>(
        &self,
        scorer: &mut S,
        memory: &DecisionMemory,
        reward: f32,
        next_best: f32,
    ) -> RewardOutcome
    where
        S: Scorer + ?Sized,
    {
        let predicted = memory.chosen_output();
        let delta = self.temporal_difference(predicted, reward, next_best);
        if delta == 0.0 {
            return RewardOutcome::Unchanged;
        }

        let mut targets = memory.outputs.clone();
        targets[memory.chosen] = predicted + delta;
        let gradient = scorer.gradient(&memory.inputs, &targets);
        scorer.apply_gradient(&gradient, self.learning_rate);
        RewardOutcome::Updated { delta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::testing::LinearScorer;

    fn remember(scorer: &LinearScorer, inputs: Vec<f32>, chosen: usize) -> DecisionMemory {
        let outputs = scorer.evaluate(&inputs);
        DecisionMemory::new(inputs, outputs, chosen).unwrap()
    }

    #[test]
    fn test_temporal_difference() {
        let update = RewardUpdate::new(0.5, 0.1);
        assert!((update.temporal_difference(0.2, 1.0, 0.4) - 1.0).abs() < 1e-6);
        assert!((update.temporal_difference(1.0, 0.0, 0.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_exact_prediction_leaves_scorer_untouched() {
        let mut scorer = LinearScorer::new(3, 2);
        let memory = remember(&scorer, vec![0.5, -0.25, 1.0], 1);
        let before = scorer.clone();
        let update = RewardUpdate::new(0.0, 0.1);

        let outcome = update.apply(&mut scorer, &memory, memory.chosen_output(), 0.0);
        assert_eq!(outcome, RewardOutcome::Unchanged);
        assert_eq!(scorer, before);
    }

    #[test]
    fn test_update_moves_chosen_output_toward_target() {
        let mut scorer = LinearScorer::new(3, 2);
        let memory = remember(&scorer, vec![0.5, -0.25, 1.0], 0);
        let update = RewardUpdate::default();
        let target = 1.0 + update.discount * 0.5;
        let before = (memory.chosen_output() - target).abs();

        let outcome = update.apply(&mut scorer, &memory, 1.0, 0.5);
        assert!(outcome.is_updated());

        let after = scorer.evaluate(memory.inputs());
        assert!((after[0] - target).abs() < before);
        // unchosen outputs have zero error in the target, so their weights stay put
        assert!((after[1] - memory.outputs()[1]).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_rewards_converge() {
        let mut scorer = LinearScorer::new(2, 3);
        let inputs = vec![0.3, 0.7];
        let update = RewardUpdate::new(0.9, 0.5);
        for _ in 0..200 {
            let memory = remember(&scorer, inputs.clone(), 2);
            update.apply(&mut scorer, &memory, -0.4, 0.0);
        }
        assert!((scorer.evaluate(&inputs)[2] + 0.4).abs() < 1e-3);
    }

    #[test]
    fn test_memory_rejects_out_of_range_choice() {
        let err = DecisionMemory::new(vec![1.0], vec![0.2, 0.8], 2).unwrap_err();
        assert_eq!(err.to_string(), "chosen output 2 is out of range for 2 outputs");
        assert!(DecisionMemory::new(vec![1.0], vec![], 0).is_err());

        let memory = DecisionMemory::new(vec![1.0], vec![0.2, 0.8], 1).unwrap();
        assert_eq!(memory.chosen(), 1);
        assert_eq!(memory.chosen_output(), 0.8);
    }
}
