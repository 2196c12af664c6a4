use serde::{Deserialize, Serialize};

/// An underground oil reservoir shared by a connected group of sites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reservoir {
    size: usize,
    reserves: f32,
}

impl Reservoir {
    #[must_use]
    pub fn new(size: usize, reserves: f32) -> Self {
        Self { size, reserves }
    }

    /// Number of sites the reservoir spans.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Barrels recoverable from a single site of the reservoir.
    #[must_use]
    pub fn reserves(&self) -> f32 {
        self.reserves
    }
}

/// One addressable cell of an [`OilField`](crate::OilField).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    probability: f32,
    drill_cost: f32,
    tax: f32,
    potential_oil_depth: u32,
    oil: bool,
    reservoir: Option<Reservoir>,
}

impl Site {
    /// Surveyed probability of striking oil, in percent (`0.0..=100.0`).
    #[must_use]
    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn set_probability(&mut self, probability: f32) {
        self.probability = probability;
    }

    /// Cost of drilling one layer at this site.
    #[must_use]
    pub fn drill_cost(&self) -> f32 {
        self.drill_cost
    }

    pub fn set_drill_cost(&mut self, drill_cost: f32) {
        self.drill_cost = drill_cost;
    }

    #[must_use]
    pub fn tax(&self) -> f32 {
        self.tax
    }

    pub fn set_tax(&mut self, tax: f32) {
        self.tax = tax;
    }

    /// Depth (in layers) at which oil would be struck, or the bottom of the field if dry.
    #[must_use]
    pub fn potential_oil_depth(&self) -> u32 {
        self.potential_oil_depth
    }

    pub fn set_potential_oil_depth(&mut self, depth: u32) {
        self.potential_oil_depth = depth;
    }

    #[must_use]
    pub fn oil_flag(&self) -> bool {
        self.oil
    }

    pub fn set_oil_flag(&mut self, oil: bool) {
        self.oil = oil;
    }

    #[must_use]
    pub fn reservoir(&self) -> Option<&Reservoir> {
        self.reservoir.as_ref()
    }

    pub fn set_reservoir(&mut self, reservoir: Option<Reservoir>) {
        self.reservoir = reservoir;
    }
}
