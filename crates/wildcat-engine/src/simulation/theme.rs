use serde::{Deserialize, Serialize};

use crate::InvalidThemeError;

/// Value ranges for every simulated site and market attribute.
///
/// A theme is an explicit configuration value: fillers, the price model and the feature
/// extractors each receive it by reference instead of reading shared global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    min_drill_cost: f32,
    max_drill_cost: f32,
    min_tax: f32,
    max_tax: f32,
    max_oil_depth: u32,
    mean_site_reserves: f32,
    min_oil_price: f32,
    max_oil_price: f32,
    initial_oil_price: f32,
    oil_price_volatility: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            min_drill_cost: 1.0,
            max_drill_cost: 25.0,
            min_tax: 100.0,
            max_tax: 1000.0,
            max_oil_depth: 10,
            mean_site_reserves: 100.0,
            min_oil_price: 10.0,
            max_oil_price: 80.0,
            initial_oil_price: 25.0,
            oil_price_volatility: 1.5,
        }
    }
}

impl Theme {
    /// Checks that every range is non-empty and every scale is positive.
    pub fn validate(&self) -> Result<(), InvalidThemeError> {
        if self.min_drill_cost >= self.max_drill_cost {
            return Err(InvalidThemeError::new("drill cost range is empty"));
        }
        if self.min_tax >= self.max_tax {
            return Err(InvalidThemeError::new("tax range is empty"));
        }
        if self.max_oil_depth == 0 {
            return Err(InvalidThemeError::new("max oil depth must be positive"));
        }
        if self.mean_site_reserves <= 0.0 {
            return Err(InvalidThemeError::new("mean site reserves must be positive"));
        }
        if self.min_oil_price <= 0.0 || self.min_oil_price >= self.max_oil_price {
            return Err(InvalidThemeError::new("oil price range is empty or not positive"));
        }
        if !(self.min_oil_price..=self.max_oil_price).contains(&self.initial_oil_price) {
            return Err(InvalidThemeError::new("initial oil price is out of range"));
        }
        if self.oil_price_volatility < 0.0 {
            return Err(InvalidThemeError::new("oil price volatility is negative"));
        }
        Ok(())
    }

    #[must_use]
    pub fn min_drill_cost(&self) -> f32 {
        self.min_drill_cost
    }

    #[must_use]
    pub fn max_drill_cost(&self) -> f32 {
        self.max_drill_cost
    }

    #[must_use]
    pub fn min_tax(&self) -> f32 {
        self.min_tax
    }

    #[must_use]
    pub fn max_tax(&self) -> f32 {
        self.max_tax
    }

    #[must_use]
    pub fn max_oil_depth(&self) -> u32 {
        self.max_oil_depth
    }

    #[must_use]
    pub fn mean_site_reserves(&self) -> f32 {
        self.mean_site_reserves
    }

    #[must_use]
    pub fn min_oil_price(&self) -> f32 {
        self.min_oil_price
    }

    #[must_use]
    pub fn max_oil_price(&self) -> f32 {
        self.max_oil_price
    }

    #[must_use]
    pub fn initial_oil_price(&self) -> f32 {
        self.initial_oil_price
    }

    #[must_use]
    pub fn oil_price_volatility(&self) -> f32 {
        self.oil_price_volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_valid() {
        Theme::default().validate().unwrap();
    }

    #[test]
    fn test_empty_range_is_rejected() {
        let theme = Theme {
            min_tax: 10.0,
            max_tax: 10.0,
            ..Theme::default()
        };
        let err = theme.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid theme: tax range is empty");
    }
}
