//! Selection policies: turning a scorer's output vector into one chosen index.
//!
//! Scorers answer with one utility per candidate (a tile cell, or a yes/no answer). How a
//! role commits to a candidate is a separate, pluggable decision:
//!
//! - [`SelectionPolicy::Greedy`] always exploits: the first index of the largest output.
//!   Ties go to the lower index and `NaN` outputs never win, so the choice is deterministic
//!   for a given output vector.
//! - [`SelectionPolicy::Proportional`] explores: it samples an index with probability
//!   proportional to its output. It is the policy used while learning from rewards, where
//!   always picking the current favourite would never correct a bad early estimate.
//!
//! Both parse case-insensitively from their variant names, so the CLI accepts `greedy` and
//! `proportional` directly.
//!
//! # Degenerate outputs
//!
//! Proportional sampling needs non-negative weights with a positive finite sum. Negative
//! and `NaN` outputs weigh zero; if the total is still zero or not finite, every index is
//! equally likely.

use rand::Rng;

/// How a cell is picked from a scorer's output vector.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum SelectionPolicy {
    /// First index of the maximum output.
    #[default]
    Greedy,
    /// Index `i` with probability `outputs[i] / sum(outputs)`.
    ///
    /// Negative outputs count as zero. When nothing is left to weight by, every index is
    /// equally likely.
    Proportional,
}

impl SelectionPolicy {
    /// Picks an index into `outputs`.
    ///
    /// # Panics
    ///
    /// Panics if `outputs` is empty.
    pub fn select<R>(self, outputs: &[f32], rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        assert!(!outputs.is_empty(), "cannot select from empty outputs");
        match self {
            Self::Greedy => argmax(outputs),
            Self::Proportional => sample_proportional(outputs, rng),
        }
    }
}

/// First index of the largest value; NaNs never win.
#[must_use]
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] || values[best].is_nan() {
            best = i;
        }
    }
    best
}

fn sample_proportional<R>(outputs: &[f32], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let weight = |v: f32| v.max(0.0);
    let total = outputs.iter().copied().map(weight).sum::<f32>();
    if !(total.is_finite() && total > 0.0) {
        return rng.random_range(0..outputs.len());
    }

    let mut point = rng.random_range(0.0..total);
    let mut last_positive = 0;
    for (i, v) in outputs.iter().copied().enumerate() {
        let w = weight(v);
        if w > 0.0 {
            if point < w {
                return i;
            }
            point -= w;
            last_positive = i;
        }
    }
    // rounding left the point past the final bucket
    last_positive
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn test_greedy_takes_first_maximum() {
        let mut rng = Pcg64::seed_from_u64(0);
        let policy = SelectionPolicy::Greedy;
        assert_eq!(policy.select(&[0.1, 0.9, 0.3, 0.9], &mut rng), 1);
        assert_eq!(policy.select(&[-1.0, -2.0], &mut rng), 0);
        assert_eq!(policy.select(&[f32::NAN, 0.5], &mut rng), 1);
    }

    #[test]
    fn test_proportional_follows_weights() {
        let mut rng = Pcg64::seed_from_u64(1);
        let policy = SelectionPolicy::Proportional;
        let mut counts = [0_usize; 3];
        for _ in 0..10_000 {
            counts[policy.select(&[1.0, 0.0, 3.0], &mut rng)] += 1;
        }
        assert_eq!(counts[1], 0);
        assert!((2000..3000).contains(&counts[0]), "{counts:?}");
        assert!((7000..8000).contains(&counts[2]), "{counts:?}");
    }

    #[test]
    fn test_proportional_ignores_negative_outputs() {
        let mut rng = Pcg64::seed_from_u64(2);
        for _ in 0..1000 {
            let i = SelectionPolicy::Proportional.select(&[-5.0, 0.5, -0.1], &mut rng);
            assert_eq!(i, 1);
        }
    }

    #[test]
    fn test_proportional_zero_sum_falls_back_to_uniform() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..1000 {
            let i = SelectionPolicy::Proportional.select(&[0.0, -1.0, 0.0, -0.5], &mut rng);
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));

        let i = SelectionPolicy::Proportional.select(&[f32::INFINITY, 1.0], &mut rng);
        assert!(i < 2);
    }

    #[test]
    fn test_parse_policy() {
        assert!(matches!("Greedy".parse::<SelectionPolicy>(), Ok(SelectionPolicy::Greedy)));
        assert!(matches!(
            "Proportional".parse::<SelectionPolicy>(),
            Ok(SelectionPolicy::Proportional)
        ));
        assert!(matches!(
            "proportional".parse::<SelectionPolicy>(),
            Ok(SelectionPolicy::Proportional)
        ));
        assert!("best".parse::<SelectionPolicy>().is_err());
    }
}
