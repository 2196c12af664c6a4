//! Regions: rectangular feature snapshots of a field at some scale.
//!
//! A [`Region`] is an immutable value. [`Region::map`] reads features from the field at
//! scale 1, and [`Region::reduce`] / [`Region::reduce_to`] build smaller regions covering the
//! same field extent at a coarser scale (see [`reduce`] for the overlapping-window reducer).
//!
//! # Layout
//!
//! Feature values are stored as one flat structure-of-arrays indexed by
//! `(row, col, feature)`:
//!
//! ```text
//! values[(row * width + col) * feature_count + feature]
//! ```
//!
//! which is exactly the order a scorer expects its inputs in, so [`Region::inputs`] is a
//! plain slice.

use std::{fmt, slice::ChunksExact};

use wildcat_engine::{Extent, OilField, Position};

use crate::site_feature::{BoxedSiteFeature, FeatureContext, SiteFeature as _};

pub use self::reduce::{OverlapWindows, Window};

pub mod reduce;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RegionError {
    #[display("region extent must be at least 1x1, got {extent}")]
    EmptyExtent { extent: Extent },
    #[display("region at {origin} with extent {extent} exceeds field extent {field}")]
    OutOfBounds {
        origin: Position,
        extent: Extent,
        field: Extent,
    },
    #[display("region needs at least one feature")]
    NoFeatures,
    #[display("cannot partition a {extent} field into {parts}x{parts} tiles")]
    InvalidPartition { extent: Extent, parts: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    origin: Position,
    extent: Extent,
    scale: usize,
    feature_ids: Vec<String>,
    values: Vec<f32>,
}

impl Region {
    /// Reads `features` for every site in `[origin, origin + extent)` at scale 1.
    ///
    /// The rectangle must lie inside the field; callers clamp before mapping, nothing is
    /// read partially.
    pub fn map(
        field: &OilField,
        features: &[BoxedSiteFeature],
        ctx: &FeatureContext,
        origin: Position,
        extent: Extent,
    ) -> Result<Self, RegionError> {
        if extent.is_empty() {
            return Err(RegionError::EmptyExtent { extent });
        }
        if features.is_empty() {
            return Err(RegionError::NoFeatures);
        }
        let exceeds = |start: usize, len: usize, limit: usize| {
            start.checked_add(len).is_none_or(|end| end > limit)
        };
        if exceeds(origin.x, extent.width, field.width())
            || exceeds(origin.y, extent.height, field.height())
        {
            return Err(RegionError::OutOfBounds {
                origin,
                extent,
                field: field.extent(),
            });
        }

        let mut values = Vec::with_capacity(extent.area() * features.len());
        for row in origin.y..origin.y + extent.height {
            for col in origin.x..origin.x + extent.width {
                let site = field.site(row, col);
                values.extend(features.iter().map(|f| f.extract(site, ctx)));
            }
        }

        Ok(Self {
            origin,
            extent,
            scale: 1,
            feature_ids: features.iter().map(|f| f.id().to_owned()).collect(),
            values,
        })
    }

    /// Maps the whole field at scale 1.
    pub fn map_field(
        field: &OilField,
        features: &[BoxedSiteFeature],
        ctx: &FeatureContext,
    ) -> Result<Self, RegionError> {
        Self::map(field, features, ctx, Position::default(), field.extent())
    }

    /// Splits the field into `parts × parts` disjoint tiles of equal extent, row by row.
    ///
    /// Cells left over when the field does not divide evenly are not covered. This is for
    /// offline corpus generation only; decisions use [`Region::reduce`].
    pub fn partition(
        field: &OilField,
        features: &[BoxedSiteFeature],
        ctx: &FeatureContext,
        parts: usize,
    ) -> Result<Vec<Self>, RegionError> {
        let extent = field.extent();
        if parts == 0 || parts > extent.width || parts > extent.height {
            return Err(RegionError::InvalidPartition { extent, parts });
        }
        let tile = Extent::new(extent.width / parts, extent.height / parts);
        let mut tiles = Vec::with_capacity(parts * parts);
        for ty in 0..parts {
            for tx in 0..parts {
                let origin = Position::new(tx * tile.width, ty * tile.height);
                tiles.push(Self::map(field, features, ctx, origin, tile)?);
            }
        }
        Ok(tiles)
    }

    pub(crate) fn from_parts(
        origin: Position,
        extent: Extent,
        scale: usize,
        feature_ids: Vec<String>,
        values: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(values.len(), extent.area() * feature_ids.len());
        Self {
            origin,
            extent,
            scale,
            feature_ids,
            values,
        }
    }

    /// Top-left corner in field coordinates.
    #[must_use]
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Size in region cells.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.extent.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.extent.height
    }

    /// How many field cells one region cell stands for along an axis.
    #[must_use]
    pub fn scale(&self) -> usize {
        self.scale
    }

    #[must_use]
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.feature_ids.len()
    }

    #[must_use]
    pub fn feature_index(&self, id: &str) -> Option<usize> {
        self.feature_ids.iter().position(|f| f == id)
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.extent.area()
    }

    /// All values, cell-major and feature-minor: the scorer input order.
    #[must_use]
    pub fn inputs(&self) -> &[f32] {
        &self.values
    }

    /// Feature values of every cell, row by row.
    pub fn cells(&self) -> ChunksExact<'_, f32> {
        self.values.chunks_exact(self.feature_count())
    }

    /// Feature values of the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the region.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &[f32] {
        assert!(
            row < self.height() && col < self.width(),
            "cell ({row}, {col}) out of {} region",
            self.extent
        );
        let n = self.feature_count();
        let start = (row * self.width() + col) * n;
        &self.values[start..start + n]
    }

    #[must_use]
    pub fn value(&self, row: usize, col: usize, feature: usize) -> f32 {
        self.cell(row, col)[feature]
    }
}

/// Renders the first feature as a grid of rounded values.
impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.feature_count();
        for row in self.values.chunks(self.width() * n) {
            for cell in row.chunks(n) {
                write!(f, "{:.0} ", cell[0])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use wildcat_engine::Theme;

    use super::*;
    use crate::site_feature::site_features;

    pub(crate) fn flat_field(width: usize, height: usize, value: f32) -> OilField {
        let mut field = OilField::new(width, height);
        for (_, site) in field.sites_mut() {
            site.set_probability(value);
            site.set_drill_cost(value);
            site.set_tax(value);
        }
        field
    }

    fn alternating_field(width: usize, height: usize) -> OilField {
        let mut field = OilField::new(width, height);
        for (pos, site) in field.sites_mut() {
            #[expect(clippy::cast_precision_loss)]
            let value = 10.0 * (pos.y % 2) as f32;
            site.set_probability(value);
            site.set_drill_cost(value);
            site.set_tax(value);
        }
        field
    }

    pub(crate) fn raw_context(field: &OilField) -> FeatureContext {
        FeatureContext::new(&Theme::default(), 25.0, field.site_count(), false).unwrap()
    }

    fn survey_features() -> Vec<BoxedSiteFeature> {
        site_features(["prob", "cost", "tax"]).unwrap()
    }

    #[test]
    fn test_map_layout() {
        let mut field = OilField::new(4, 3);
        for (pos, site) in field.sites_mut() {
            #[expect(clippy::cast_precision_loss)]
            site.set_probability((pos.y * 10 + pos.x) as f32);
        }
        let ctx = raw_context(&field);
        let features = site_features(["prob", "cost"]).unwrap();
        let region =
            Region::map(&field, &features, &ctx, Position::new(1, 1), Extent::new(2, 2)).unwrap();

        assert_eq!(region.scale(), 1);
        assert_eq!(region.feature_ids(), ["prob", "cost"]);
        assert_eq!(region.inputs(), [11.0, 0.0, 12.0, 0.0, 21.0, 0.0, 22.0, 0.0]);
        assert_eq!(region.cell(1, 0), [21.0, 0.0]);
        assert_eq!(region.value(0, 1, 0), 12.0);
        assert_eq!(region.feature_index("cost"), Some(1));
        assert_eq!(region.cells().len(), 4);
    }

    #[test]
    fn test_map_rejects_out_of_bounds() {
        let field = flat_field(10, 5, 1.0);
        let ctx = raw_context(&field);
        let features = survey_features();

        let err = Region::map(&field, &features, &ctx, Position::new(5, 0), Extent::new(6, 5))
            .unwrap_err();
        assert!(matches!(err, RegionError::OutOfBounds { .. }));
        let err = Region::map(&field, &features, &ctx, Position::new(0, 3), Extent::new(1, 3))
            .unwrap_err();
        assert!(matches!(err, RegionError::OutOfBounds { .. }));
        let err = Region::map(&field, &features, &ctx, Position::new(0, 0), Extent::new(0, 3))
            .unwrap_err();
        assert!(matches!(err, RegionError::EmptyExtent { .. }));
        let err = Region::map(&field, &[], &ctx, Position::new(0, 0), Extent::new(1, 1))
            .unwrap_err();
        assert_eq!(err, RegionError::NoFeatures);
    }

    #[test]
    fn test_fill_flat() {
        for (scale, width, height) in [(8, 80, 24), (4, 40, 12), (2, 20, 6)] {
            let field = flat_field(width, height, 10.0);
            let ctx = raw_context(&field);
            let map = Region::map_field(&field, &survey_features(), &ctx).unwrap();
            let region = map.reduce(scale);

            assert_eq!(region.cell_count(), 30, "{width}x{height} reduced by {scale}");
            let prob = region.feature_index("prob").unwrap();
            for cell in region.cells() {
                assert_eq!(cell[prob], 10.0);
            }
        }
    }

    #[test]
    fn test_reduce_alternating_rows_stays_in_range() {
        for (scale, width, height) in [(4, 40, 12), (2, 20, 6)] {
            let field = alternating_field(width, height);
            let ctx = raw_context(&field);
            let map = Region::map_field(&field, &survey_features(), &ctx).unwrap();
            let region = map.reduce(scale);
            assert_eq!(region.cell_count(), 30);
            for value in region.inputs() {
                assert!((0.0..=10.0).contains(value), "value {value} out of range");
            }
        }
    }

    #[test]
    fn test_partition() {
        let field = alternating_field(80, 24);
        let ctx = raw_context(&field);
        let tiles = Region::partition(&field, &survey_features(), &ctx, 2).unwrap();

        assert_eq!(tiles.len(), 4);
        let origins = tiles.iter().map(Region::origin).collect::<Vec<_>>();
        assert_eq!(
            origins,
            [
                Position::new(0, 0),
                Position::new(40, 0),
                Position::new(0, 12),
                Position::new(40, 12),
            ]
        );
        for tile in &tiles {
            assert_eq!(tile.extent(), Extent::new(40, 12));
        }

        assert!(Region::partition(&field, &survey_features(), &ctx, 0).is_err());
        assert!(Region::partition(&field, &survey_features(), &ctx, 25).is_err());
    }

    #[test]
    fn test_display_renders_first_feature() {
        let field = flat_field(3, 2, 7.0);
        let ctx = raw_context(&field);
        let region = Region::map_field(&field, &survey_features(), &ctx).unwrap();
        assert_eq!(region.to_string(), "7 7 7 \n7 7 7 \n");
    }
}
