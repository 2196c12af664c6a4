//! Linear min-max normalization.
//!
//! Every feature and reward passes through these helpers before it reaches a scorer. A range
//! whose `max` is not strictly greater than its `min` has no linear mapping, so it is rejected
//! up front instead of producing `NaN` or infinite inputs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum NormalizeError {
    #[display("invalid normalization range: max ({max}) must be greater than min ({min})")]
    InvalidRange { min: f32, max: f32 },
    #[display("cannot normalize non-finite value {value}")]
    NonFinite { value: f32 },
}

/// A validated `[min, max]` range with `min < max`, both finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizeRange {
    min: f32,
    max: f32,
}

impl NormalizeRange {
    pub fn new(min: f32, max: f32) -> Result<Self, NormalizeError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(NormalizeError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Maps `value` linearly so that `min -> 0.0` and `max -> 1.0`.
    ///
    /// Values outside the range are not clamped.
    #[must_use]
    pub fn apply(&self, value: f32) -> f32 {
        (value - self.min) / (self.max - self.min)
    }

    /// Maps `value` linearly so that `min -> out.min` and `max -> out.max`.
    #[must_use]
    pub fn apply_into(&self, value: f32, out: &NormalizeRange) -> f32 {
        out.min + self.apply(value) * (out.max - out.min)
    }
}

/// Normalizes `value` from `[min, max]` to `[0, 1]`.
///
/// ```
/// use wildcat_evaluator::normalize::normalize;
///
/// assert_eq!(normalize(50.0, 0.0, 100.0).unwrap(), 0.5);
/// assert!(normalize(1.0, 3.0, 3.0).is_err());
/// ```
pub fn normalize(value: f32, min: f32, max: f32) -> Result<f32, NormalizeError> {
    scale_into(value, min, max, 0.0, 1.0)
}

/// Normalizes `value` from `[min, max]` to `[out_min, out_max]`.
///
/// Rewards use `out_min = -1.0`, `out_max = 1.0`.
pub fn scale_into(
    value: f32,
    min: f32,
    max: f32,
    out_min: f32,
    out_max: f32,
) -> Result<f32, NormalizeError> {
    if !value.is_finite() {
        return Err(NormalizeError::NonFinite { value });
    }
    let range = NormalizeRange::new(min, max)?;
    let out = NormalizeRange::new(out_min, out_max)?;
    Ok(range.apply_into(value, &out))
}
