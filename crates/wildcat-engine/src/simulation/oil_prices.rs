use rand::Rng;
use rand_distr::Normal;

use crate::{InvalidThemeError, simulation::theme::Theme};

/// Weekly oil price following a bounded Gaussian random walk.
#[derive(Debug, Clone)]
pub struct OilPrices {
    min_price: f32,
    max_price: f32,
    price: f32,
    step: Normal<f32>,
}

impl OilPrices {
    pub fn new(theme: &Theme) -> Result<Self, InvalidThemeError> {
        theme.validate()?;
        let step = Normal::new(0.0, theme.oil_price_volatility())
            .map_err(|_| InvalidThemeError::new("oil price volatility is not finite"))?;
        Ok(Self {
            min_price: theme.min_oil_price(),
            max_price: theme.max_oil_price(),
            price: theme.initial_oil_price(),
            step,
        })
    }

    /// Current price.
    #[must_use]
    pub fn price(&self) -> f32 {
        self.price
    }

    #[must_use]
    pub fn min_price(&self) -> f32 {
        self.min_price
    }

    #[must_use]
    pub fn max_price(&self) -> f32 {
        self.max_price
    }

    /// Advances one week and returns the new price.
    pub fn advance<R>(&mut self, rng: &mut R) -> f32
    where
        R: Rng + ?Sized,
    {
        self.price = (self.price + rng.sample(self.step)).clamp(self.min_price, self.max_price);
        self.price
    }
}
