//! Site features: scalar measurements of a single [`Site`].
//!
//! A feature maps one site to one named `f32`. Features are the only way the decision core
//! reads the field, and the list of features a role uses fixes the layout of the scorer's
//! input vector (see [`Region::inputs`](crate::region::Region::inputs)).
//!
//! # Available Features
//!
//! | id     | measures                                          | normalized by           |
//! |--------|---------------------------------------------------|-------------------------|
//! | `prob` | [`source::OilProbability`] survey probability     | `[0, 100]`              |
//! | `cost` | [`source::DrillCost`] drilling cost               | theme drill-cost range  |
//! | `tax`  | [`source::Taxes`] tax                             | theme tax range         |
//! | `wet`  | [`source::OilPresence`] reservoir presence (0/1)  | already in `[0, 1]`     |
//! | `bbl`  | [`source::OilReserves`] reserves per site         | not normalized          |
//! | `size` | [`source::ReservoirSize`] sites in the reservoir  | `[0, site_count]`       |
//! | `val`  | [`source::OilValue`] price × reserves             | not normalized          |
//! | `util` | [`source::UtilityEstimator`] survey utility       | self-normalized         |
//!
//! `bbl`, `val`, `wet` and `util` read hidden reservoir data and are meant for training
//! targets, not for inputs at decision time.
//!
//! # Context
//!
//! Normalization ranges, the current oil price and the field size all come from a
//! [`FeatureContext`] passed explicitly to every extraction.

use std::fmt;

use wildcat_engine::{Site, Theme};

use crate::normalize::{NormalizeError, NormalizeRange};

pub use self::source::all_site_features;

pub mod source;

const PROBABILITY_MAX: f32 = 100.0;

/// Everything a feature may need besides the site itself.
#[derive(Debug, Clone)]
pub struct FeatureContext {
    normalize: bool,
    site_count: usize,
    oil_price: f32,
    mean_site_reserves: f32,
    probability: NormalizeRange,
    drill_cost: NormalizeRange,
    tax: NormalizeRange,
    oil_price_range: NormalizeRange,
}

impl FeatureContext {
    /// Builds a context for a field of `site_count` sites at the given oil price.
    ///
    /// Fails if any of the theme's ranges cannot be normalized.
    pub fn new(
        theme: &Theme,
        oil_price: f32,
        site_count: usize,
        normalize: bool,
    ) -> Result<Self, NormalizeError> {
        // utility and value features divide by the price
        if !(oil_price.is_finite() && oil_price > 0.0) {
            return Err(NormalizeError::InvalidRange {
                min: 0.0,
                max: oil_price,
            });
        }
        Ok(Self {
            normalize,
            site_count: site_count.max(1),
            oil_price,
            mean_site_reserves: theme.mean_site_reserves(),
            probability: NormalizeRange::new(0.0, PROBABILITY_MAX)?,
            drill_cost: NormalizeRange::new(theme.min_drill_cost(), theme.max_drill_cost())?,
            tax: NormalizeRange::new(theme.min_tax(), theme.max_tax())?,
            oil_price_range: NormalizeRange::new(theme.min_oil_price(), theme.max_oil_price())?,
        })
    }

    #[must_use]
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    #[must_use]
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    #[must_use]
    pub fn oil_price(&self) -> f32 {
        self.oil_price
    }

    /// Oil price mapped to `[0, 1]` over the theme's price range.
    #[must_use]
    pub fn normalized_oil_price(&self) -> f32 {
        self.oil_price_range.apply(self.oil_price)
    }

    #[must_use]
    pub fn mean_site_reserves(&self) -> f32 {
        self.mean_site_reserves
    }

    #[must_use]
    pub fn probability_range(&self) -> &NormalizeRange {
        &self.probability
    }

    #[must_use]
    pub fn drill_cost_range(&self) -> &NormalizeRange {
        &self.drill_cost
    }

    #[must_use]
    pub fn tax_range(&self) -> &NormalizeRange {
        &self.tax
    }
}

pub trait SiteFeature: fmt::Debug + Send + Sync {
    /// Short lowercase identifier, also used as the corpus column prefix.
    #[must_use]
    fn id(&self) -> &str;

    #[must_use]
    fn name(&self) -> &str;

    #[must_use]
    fn clone_boxed(&self) -> BoxedSiteFeature;

    #[must_use]
    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32;
}

pub type BoxedSiteFeature = Box<dyn SiteFeature>;

impl Clone for BoxedSiteFeature {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl SiteFeature for BoxedSiteFeature {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn clone_boxed(&self) -> BoxedSiteFeature {
        self.as_ref().clone_boxed()
    }

    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32 {
        self.as_ref().extract(site, ctx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown site feature `{id}`")]
pub struct UnknownFeatureError {
    id: String,
}

/// Looks up a feature by its [`id`](SiteFeature::id).
pub fn site_feature(id: &str) -> Result<BoxedSiteFeature, UnknownFeatureError> {
    all_site_features()
        .into_iter()
        .find(|f| f.id() == id)
        .ok_or_else(|| UnknownFeatureError { id: id.to_owned() })
}

/// Looks up several features by id, preserving order.
pub fn site_features<I, S>(ids: I) -> Result<Vec<BoxedSiteFeature>, UnknownFeatureError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter().map(|id| site_feature(id.as_ref())).collect()
}
