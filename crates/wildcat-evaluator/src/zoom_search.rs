//! Recursive multi-resolution search for the best site in a field.
//!
//! A scorer only accepts one small tile of cells, but a field is usually much larger. Zoom
//! search bridges the two:
//!
//! 1. The whole field is reduced to the tile and scored.
//! 2. The chosen reduced cell stands for a span of field cells (its reduction window, see
//!    [`OverlapWindows::cells`]).
//! 3. The next window is half the current one along each axis, widened to hold that whole
//!    span and never narrower than the tile. It is placed around the span, clamped into
//!    the field, and searched the same way.
//! 4. Once the window is exactly one tile, it is scored without reduction and the chosen
//!    cell is the site.
//!
//! ```text
//! 100 x 30 -> 50 x 15 -> 25 x 8 -> 13 x 4 -> 10 x 3
//!  reduce     reduce     reduce    reduce    score
//! ```
//!
//! Because every level keeps the chosen span in view, a scorer that always prefers the
//! reduced cell holding the best site never loses that site, whatever the field shape.
//!
//! # Current Limitations
//!
//! - An axis where the tile is a single cell is averaged away at every level, so the
//!   search cannot localize along it. The window still shrinks by one cell per level there
//!   so the search terminates.

use std::ops::Range;

use rand::Rng;
use tracing::debug;
use wildcat_engine::{Extent, OilField, Position};

use crate::{
    region::{OverlapWindows, Region, RegionError},
    scorer::Scorer,
    selection::SelectionPolicy,
    site_feature::{BoxedSiteFeature, FeatureContext},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ZoomSearchError {
    #[display("field {field} is smaller than the {tile} tile")]
    FieldTooSmall { field: Extent, tile: Extent },
    #[display(
        "scorer takes {inputs} inputs and {outputs} outputs, but a {tile} tile of {features} \
         features needs {} and {}",
        tile.area() * features,
        tile.area()
    )]
    ScorerMismatch {
        inputs: usize,
        outputs: usize,
        tile: Extent,
        features: usize,
    },
    #[display("{source}")]
    Region { source: RegionError },
}

impl From<RegionError> for ZoomSearchError {
    fn from(source: RegionError) -> Self {
        Self::Region { source }
    }
}

/// The outcome of one search: where to act and what the scorer saw at the last level.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomDecision {
    pub position: Position,
    pub inputs: Vec<f32>,
    pub outputs: Vec<f32>,
    pub index: usize,
    pub levels: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ZoomSearch {
    tile: Extent,
    policy: SelectionPolicy,
}

impl ZoomSearch {
    /// # Panics
    ///
    /// Panics if `tile` is empty.
    #[must_use]
    pub fn new(tile: Extent, policy: SelectionPolicy) -> Self {
        assert!(!tile.is_empty(), "zoom search tile must be at least 1x1");
        Self { tile, policy }
    }

    #[must_use]
    pub fn tile(&self) -> Extent {
        self.tile
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Largest power of two `s` with `tile × s` inside `field`.
    pub fn initial_scale(&self, field: Extent) -> Result<usize, ZoomSearchError> {
        let fits = (field.width / self.tile.width).min(field.height / self.tile.height);
        if fits == 0 {
            return Err(ZoomSearchError::FieldTooSmall {
                field,
                tile: self.tile,
            });
        }
        Ok(1 << fits.ilog2())
    }

    pub fn choose<S, R>(
        &self,
        scorer: &S,
        field: &OilField,
        features: &[BoxedSiteFeature],
        ctx: &FeatureContext,
        rng: &mut R,
    ) -> Result<ZoomDecision, ZoomSearchError>
    where
        S: Scorer + ?Sized,
        R: Rng + ?Sized,
    {
        let tile = self.tile;
        if scorer.input_len() != tile.area() * features.len() || scorer.output_len() != tile.area()
        {
            return Err(ZoomSearchError::ScorerMismatch {
                inputs: scorer.input_len(),
                outputs: scorer.output_len(),
                tile,
                features: features.len(),
            });
        }

        self.initial_scale(field.extent())?;
        let mut region = Region::map_field(field, features, ctx)?;
        let mut levels = 1;

        while region.extent() != tile {
            let reduced = region.reduce_to(tile);
            let outputs = scorer.evaluate(reduced.inputs());
            let index = self.policy.select(&outputs, rng);

            let windows = OverlapWindows::new(region.extent(), tile);
            let (cols, rows) = windows.cells(index % tile.width, index / tile.width);
            let start = region.origin();
            let cols = start.x + cols.start..start.x + cols.end;
            let rows = start.y + rows.start..start.y + rows.end;

            let extent = Extent::new(
                next_len(region.width(), &cols, tile.width),
                next_len(region.height(), &rows, tile.height),
            );
            let origin = Position::new(
                covering_start(&cols, extent.width, field.width()),
                covering_start(&rows, extent.height, field.height()),
            );
            debug!(
                level = levels,
                index,
                origin = %origin,
                extent = %extent,
                "zoom search narrowed window"
            );

            region = Region::map(field, features, ctx, origin, extent)?;
            levels += 1;
        }

        let inputs = region.inputs().to_vec();
        let outputs = scorer.evaluate(&inputs);
        let index = self.policy.select(&outputs, rng);
        let position = region.origin().offset_by_index(index, tile.width);
        debug!(level = levels, index, position = %position, "zoom search chose site");

        Ok(ZoomDecision {
            position,
            inputs,
            outputs,
            index,
            levels,
        })
    }
}

/// Half of `len`, widened to `span` and `tile`, and always shorter than `len` until it
/// reaches `tile`.
fn next_len(len: usize, span: &Range<usize>, tile: usize) -> usize {
    if len <= tile {
        return tile;
    }
    len.div_ceil(2).max(span.len()).max(tile).min(len - 1)
}

/// Start of a `len` long window around `span`, inside `[0, limit)`.
///
/// The window holds all of `span` whenever it is long enough to.
fn covering_start(span: &Range<usize>, len: usize, limit: usize) -> usize {
    let centered = (span.start + span.end).saturating_sub(len) / 2;
    centered
        .max(span.end.saturating_sub(len))
        .min(span.start)
        .min(limit.saturating_sub(len))
}
