//! Concrete site features.

use wildcat_engine::Site;

use crate::site_feature::{BoxedSiteFeature, FeatureContext, SiteFeature};

#[must_use]
pub fn all_site_features() -> Vec<BoxedSiteFeature> {
    vec![
        // survey data, visible to the player
        Box::new(OilProbability),
        Box::new(DrillCost),
        Box::new(Taxes),
        // hidden reservoir data
        Box::new(OilPresence),
        Box::new(OilReserves),
        Box::new(ReservoirSize),
        Box::new(OilValue),
        Box::new(UtilityEstimator),
    ]
}

macro_rules! impl_identity {
    ($ty:ty, $id:literal, $name:literal) => {
        fn id(&self) -> &'static str {
            $id
        }
        fn name(&self) -> &'static str {
            $name
        }
        fn clone_boxed(&self) -> BoxedSiteFeature {
            Box::new(<$ty>::clone(self))
        }
    };
}

/// Surveyed probability of oil, in percent, or in `[0, 1]` when normalizing.
#[derive(Debug, Clone)]
pub struct OilProbability;

impl SiteFeature for OilProbability {
    impl_identity!(OilProbability, "prob", "Oil Probability");

    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32 {
        let prob = site.probability();
        if ctx.normalize() {
            ctx.probability_range().apply(prob)
        } else {
            prob
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrillCost;

impl SiteFeature for DrillCost {
    impl_identity!(DrillCost, "cost", "Drill Cost");

    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32 {
        let cost = site.drill_cost();
        if ctx.normalize() {
            ctx.drill_cost_range().apply(cost)
        } else {
            cost
        }
    }
}

#[derive(Debug, Clone)]
pub struct Taxes;

impl SiteFeature for Taxes {
    impl_identity!(Taxes, "tax", "Taxes");

    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32 {
        let tax = site.tax();
        if ctx.normalize() {
            ctx.tax_range().apply(tax)
        } else {
            tax
        }
    }
}

/// `1.0` if the site sits on a reservoir, `0.0` otherwise.
#[derive(Debug, Clone)]
pub struct OilPresence;

impl SiteFeature for OilPresence {
    impl_identity!(OilPresence, "wet", "Oil Presence");

    fn extract(&self, site: &Site, _ctx: &FeatureContext) -> f32 {
        if site.reservoir().is_some() { 1.0 } else { 0.0 }
    }
}

/// Barrels recoverable from the site.
#[derive(Debug, Clone)]
pub struct OilReserves;

impl SiteFeature for OilReserves {
    impl_identity!(OilReserves, "bbl", "Oil Reserves");

    fn extract(&self, site: &Site, _ctx: &FeatureContext) -> f32 {
        site.reservoir().map_or(0.0, |r| r.reserves())
    }
}

/// Number of sites in the reservoir under this site.
#[derive(Debug, Clone)]
pub struct ReservoirSize;

impl SiteFeature for ReservoirSize {
    impl_identity!(ReservoirSize, "size", "Reservoir Size");

    #[expect(clippy::cast_precision_loss)]
    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32 {
        let size = site.reservoir().map_or(0, |r| r.size()) as f32;
        if ctx.normalize() {
            size / ctx.site_count() as f32
        } else {
            size
        }
    }
}

/// Market value of the site's reserves at the current price.
#[derive(Debug, Clone)]
pub struct OilValue;

impl SiteFeature for OilValue {
    impl_identity!(OilValue, "val", "Oil Value");

    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32 {
        ctx.oil_price() * site.reservoir().map_or(0.0, |r| r.reserves())
    }
}

/// Heuristic estimate of the utility of surveying a site.
///
/// Utility is the expected future monetary gain, assuming the fixed policy of drilling to
/// the oil or to the bottom of the site, whichever comes first, and ignoring the number of
/// weeks left. It reads the real reservoir under the site, so it is a training target, not
/// something a player could compute.
///
/// ```text
/// expense  = cost × depth × 10        if the site has oil
///          = cost × 100               otherwise
/// max_oil  = site_count / 16 × mean_site_reserves × price
/// expected = min(size / 2 × reserves × price, max_oil)
/// utility  = (expected - expense) / max_oil
/// ```
///
/// `max_oil` is a rough upper bound on what a single large reservoir can yield (at most an
/// eighth of the field, half of it extracted), so utilities compare well across sites.
#[derive(Debug, Clone)]
pub struct UtilityEstimator;

impl SiteFeature for UtilityEstimator {
    impl_identity!(UtilityEstimator, "util", "Survey Utility");

    #[expect(clippy::cast_precision_loss)]
    fn extract(&self, site: &Site, ctx: &FeatureContext) -> f32 {
        let price = ctx.oil_price();
        let cost = site.drill_cost();
        let expense = if site.oil_flag() {
            cost * site.potential_oil_depth() as f32 * 10.0
        } else {
            cost * 100.0
        };

        let max_oil = ctx.site_count() as f32 / 16.0 * ctx.mean_site_reserves() * price;
        let expected = site.reservoir().map_or(0.0, |r| {
            (r.size() as f32 / 2.0 * r.reserves() * price).min(max_oil)
        });

        (expected - expense) / max_oil
    }
}
