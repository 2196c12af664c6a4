//! Random field generation.
//!
//! A generated field is built by running a fixed sequence of fillers over an empty
//! [`OilField`]. Each filler owns one attribute family:
//!
//! 1. [`OilFiller`] - survey probabilities shaped as a few smooth hotspots
//! 2. [`PotentialOilDepthFiller`] - depth at which oil would be struck
//! 3. [`ReservoirFiller`] - oil flags and connected reservoirs, drawn from the probabilities
//! 4. [`DrillCostFiller`] - per-site drilling cost
//! 5. [`TaxFiller`] - per-site tax
//!
//! [`FieldGenerator`] runs them in that order, so later fillers may read what earlier ones wrote.

use std::collections::VecDeque;

use rand::Rng;
use rand_distr::Normal;

use crate::{
    InvalidThemeError,
    core::{oil_field::OilField, site::Reservoir},
    simulation::theme::Theme,
};

/// Fills one family of site attributes.
pub trait Filler {
    fn fill<R>(&self, field: &mut OilField, rng: &mut R)
    where
        R: Rng + ?Sized;
}

const SITES_PER_HOTSPOT: usize = 200;
const MIN_HOTSPOT_RADIUS: f32 = 2.0;
const MAX_HOTSPOT_RADIUS: f32 = 6.0;

/// Survey probabilities: the maximum of a few Gaussian bumps, in percent.
#[derive(Debug, Clone, Default)]
pub struct OilFiller;

impl Filler for OilFiller {
    #[expect(clippy::cast_precision_loss)]
    fn fill<R>(&self, field: &mut OilField, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let count = (field.site_count() / SITES_PER_HOTSPOT).max(1);
        let (width, height) = (field.width() as f32, field.height() as f32);
        let hotspots = (0..count)
            .map(|_| {
                let x = rng.random_range(0.0..width);
                let y = rng.random_range(0.0..height);
                let radius = rng.random_range(MIN_HOTSPOT_RADIUS..=MAX_HOTSPOT_RADIUS);
                (x, y, radius)
            })
            .collect::<Vec<_>>();

        for (pos, site) in field.sites_mut() {
            let (sx, sy) = (pos.x as f32, pos.y as f32);
            let peak = hotspots
                .iter()
                .map(|&(x, y, radius)| {
                    let d2 = (sx - x).powi(2) + (sy - y).powi(2);
                    100.0 * (-d2 / (2.0 * radius * radius)).exp()
                })
                .fold(0.0, f32::max);
            let noise = rng.random_range(-5.0..=5.0);
            site.set_probability((peak + noise).clamp(0.0, 100.0));
        }
    }
}

#[derive(Debug, Clone)]
pub struct PotentialOilDepthFiller {
    max_depth: u32,
}

impl PotentialOilDepthFiller {
    #[must_use]
    pub fn new(theme: &Theme) -> Self {
        Self {
            max_depth: theme.max_oil_depth(),
        }
    }
}

impl Filler for PotentialOilDepthFiller {
    fn fill<R>(&self, field: &mut OilField, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for (_, site) in field.sites_mut() {
            site.set_potential_oil_depth(rng.random_range(1..=self.max_depth));
        }
    }
}

const RESERVOIR_PROBABILITY_THRESHOLD: f32 = 40.0;

/// Marks oil-bearing sites and groups 4-connected ones into reservoirs.
///
/// A site holds oil with probability `probability / 100` once its survey probability passes
/// a threshold. Every site of a connected group shares the group's size; per-site reserves
/// are drawn around the theme's mean.
#[derive(Debug, Clone)]
pub struct ReservoirFiller {
    reserves: Normal<f32>,
}

impl ReservoirFiller {
    pub fn new(theme: &Theme) -> Result<Self, InvalidThemeError> {
        let mean = theme.mean_site_reserves();
        let reserves = Normal::new(mean, mean / 4.0)
            .map_err(|_| InvalidThemeError::new("mean site reserves is not finite"))?;
        Ok(Self { reserves })
    }
}

impl Filler for ReservoirFiller {
    fn fill<R>(&self, field: &mut OilField, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for (_, site) in field.sites_mut() {
            let p = site.probability();
            let oil = p >= RESERVOIR_PROBABILITY_THRESHOLD && rng.random_bool(f64::from(p / 100.0));
            site.set_oil_flag(oil);
            site.set_reservoir(None);
        }

        let (width, height) = (field.width(), field.height());
        let mut visited = vec![false; width * height];
        for start in 0..width * height {
            if visited[start] || !field.site(start / width, start % width).oil_flag() {
                continue;
            }

            let mut group = vec![];
            let mut queue = VecDeque::from([start]);
            visited[start] = true;
            while let Some(i) = queue.pop_front() {
                group.push(i);
                let (row, col) = (i / width, i % width);
                let neighbors = [
                    (row > 0).then(|| i - width),
                    (row + 1 < height).then(|| i + width),
                    (col > 0).then(|| i - 1),
                    (col + 1 < width).then(|| i + 1),
                ];
                for n in neighbors.into_iter().flatten() {
                    if !visited[n] && field.site(n / width, n % width).oil_flag() {
                        visited[n] = true;
                        queue.push_back(n);
                    }
                }
            }

            let size = group.len();
            for i in group {
                let reserves = rng.sample(self.reserves).max(1.0);
                field
                    .site_mut(i / width, i % width)
                    .set_reservoir(Some(Reservoir::new(size, reserves)));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrillCostFiller {
    min: f32,
    max: f32,
}

impl DrillCostFiller {
    #[must_use]
    pub fn new(theme: &Theme) -> Self {
        Self {
            min: theme.min_drill_cost(),
            max: theme.max_drill_cost(),
        }
    }
}

impl Filler for DrillCostFiller {
    fn fill<R>(&self, field: &mut OilField, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for (_, site) in field.sites_mut() {
            site.set_drill_cost(rng.random_range(self.min..=self.max).round());
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaxFiller {
    min: f32,
    max: f32,
}

impl TaxFiller {
    #[must_use]
    pub fn new(theme: &Theme) -> Self {
        Self {
            min: theme.min_tax(),
            max: theme.max_tax(),
        }
    }
}

impl Filler for TaxFiller {
    fn fill<R>(&self, field: &mut OilField, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for (_, site) in field.sites_mut() {
            site.set_tax(rng.random_range(self.min..=self.max).round());
        }
    }
}

/// Generates complete random fields for a theme.
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    oil: OilFiller,
    depth: PotentialOilDepthFiller,
    reservoir: ReservoirFiller,
    drill_cost: DrillCostFiller,
    tax: TaxFiller,
}

impl FieldGenerator {
    pub fn new(theme: &Theme) -> Result<Self, InvalidThemeError> {
        theme.validate()?;
        Ok(Self {
            oil: OilFiller,
            depth: PotentialOilDepthFiller::new(theme),
            reservoir: ReservoirFiller::new(theme)?,
            drill_cost: DrillCostFiller::new(theme),
            tax: TaxFiller::new(theme),
        })
    }

    pub fn generate<R>(&self, width: usize, height: usize, rng: &mut R) -> OilField
    where
        R: Rng + ?Sized,
    {
        let mut field = OilField::new(width, height);
        self.oil.fill(&mut field, rng);
        self.depth.fill(&mut field, rng);
        self.reservoir.fill(&mut field, rng);
        self.drill_cost.fill(&mut field, rng);
        self.tax.fill(&mut field, rng);
        field
    }
}
