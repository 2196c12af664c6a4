//! Parameter vector operations shared by the network and the trainer.
//!
//! - **Initialization**: [`from_fn`] and [`random_normal`]
//! - **Descent**: [`descend`] applies one gradient step in place
//! - **Error**: [`sum_squared_error`] measures a prediction against its target

use rand::Rng;
use rand_distr::{Normal, NormalError};

/// Creates a vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use wildcat_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 5);
/// assert_eq!(weights.len(), 5);
/// assert_eq!(weights[1], 0.5);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Samples `len` values from `N(0, sigma²)`.
///
/// Fails if `sigma` is negative or not finite.
pub fn random_normal<R>(rng: &mut R, sigma: f32, len: usize) -> Result<Vec<f32>, NormalError>
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma)?;
    Ok(from_fn(|_| rng.sample(normal), len))
}

/// `params -= learning_rate * gradient`, element-wise.
///
/// # Panics
///
/// Panics if the two slices differ in length.
pub fn descend(params: &mut [f32], gradient: &[f32], learning_rate: f32) {
    assert_eq!(params.len(), gradient.len());
    for (p, g) in params.iter_mut().zip(gradient) {
        *p -= learning_rate * g;
    }
}

/// `Σ (output - target)²`
#[must_use]
pub fn sum_squared_error(outputs: &[f32], targets: &[f32]) -> f32 {
    outputs
        .iter()
        .zip(targets)
        .map(|(o, t)| (o - t) * (o - t))
        .sum()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn test_random_normal_spread() {
        let mut rng = Pcg64::seed_from_u64(5);
        let values = random_normal(&mut rng, 0.5, 10_000).unwrap();
        #[expect(clippy::cast_precision_loss)]
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.05, "sd {}", var.sqrt());
        assert!(random_normal(&mut rng, f32::NAN, 3).is_err());
    }

    #[test]
    fn test_descend() {
        let mut params = vec![1.0, -1.0, 0.5];
        descend(&mut params, &[2.0, -2.0, 0.0], 0.25);
        assert_eq!(params, [0.5, -0.5, 0.5]);
    }

    #[test]
    fn test_sum_squared_error() {
        assert_eq!(sum_squared_error(&[1.0, 2.0], &[0.0, 4.0]), 5.0);
        assert_eq!(sum_squared_error(&[], &[]), 0.0);
    }
}
