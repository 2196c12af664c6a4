//! The overlapping-window reducer.
//!
//! Reducing a `W × H` region to `w' × h'` places `w' × h'` windows of size
//!
//! ```text
//! w = 2W / (w' + 1)      h = 2H / (h' + 1)
//! ```
//!
//! at strides of half a window, so neighbouring windows overlap by 50% and the first and
//! last windows touch the parent's edges. Every parent cell falls in at least one window.
//! A reduced cell is the unweighted mean of all parent cells whose index range
//! `[floor(x), ceil(x + w))` intersects its window, which keeps constant fields constant
//! at every scale.
//!
//! # Example
//!
//! Reducing a 24-row region to 3 rows gives windows 12 rows high at a stride of 6:
//!
//! ```text
//! rows  0 ..  6 .. 12 .. 18 .. 24
//! r0    [--------)
//! r1          [--------)
//! r2                [--------)
//! ```
//!
//! Fractional windows are widened to whole cells, so reduced cells near a peak can share
//! it. That is what lets [`ZoomSearch`](crate::zoom_search::ZoomSearch) recover the field
//! cells a reduced cell stands for through [`OverlapWindows::cells`].
//!
//! # Scale
//!
//! The reduced region keeps the parent's origin and records `scale * factor`, where the
//! factor is the integer ratio requested ([`Region::reduce`]) or the smaller of the two axis
//! ratios ([`Region::reduce_to`]). The scale is bookkeeping only; the geometry always comes
//! from the extents.

use std::ops::Range;

use wildcat_engine::Extent;

use super::Region;

/// A reduction window in parent-region cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Window {
    /// Centre of the window in parent cell coordinates.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Window geometry for reducing `parent` to `reduced`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapWindows {
    parent: Extent,
    reduced: Extent,
    width: f32,
    height: f32,
}

impl OverlapWindows {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(parent: Extent, reduced: Extent) -> Self {
        Self {
            parent,
            reduced,
            width: 2.0 * parent.width as f32 / (reduced.width as f32 + 1.0),
            height: 2.0 * parent.height as f32 / (reduced.height as f32 + 1.0),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Extent {
        self.parent
    }

    #[must_use]
    pub fn reduced(&self) -> Extent {
        self.reduced
    }

    /// The window behind reduced cell `(rx, ry)`.
    ///
    /// Offsets are computed from the index, not accumulated.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn window(&self, rx: usize, ry: usize) -> Window {
        Window {
            x: rx as f32 * self.width / 2.0,
            y: ry as f32 * self.height / 2.0,
            width: self.width,
            height: self.height,
        }
    }

    /// Parent cells averaged into reduced cell `(rx, ry)`: `(columns, rows)`.
    #[must_use]
    pub fn cells(&self, rx: usize, ry: usize) -> (Range<usize>, Range<usize>) {
        let window = self.window(rx, ry);
        (
            span(window.x, window.width, self.parent.width),
            span(window.y, window.height, self.parent.height),
        )
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn span(start: f32, len: f32, limit: usize) -> Range<usize> {
    let first = (start.floor() as usize).min(limit - 1);
    let end = ((start + len).ceil() as usize).min(limit);
    first..end.max(first + 1)
}

impl Region {
    /// Reduces by `factor` along both axes.
    ///
    /// The result covers the same field extent with `max(extent / factor, 1)` cells per axis
    /// and `scale * factor`. A factor of 1 returns an unchanged copy.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is zero.
    #[must_use]
    pub fn reduce(&self, factor: usize) -> Self {
        assert!(factor > 0, "reduction factor must be positive");
        self.resample(self.extent.div_floor(factor), factor)
    }

    /// Reduces to exactly `target` cells.
    ///
    /// The scale grows by the smaller of the two axis ratios (at least 1).
    ///
    /// # Panics
    ///
    /// Panics if `target` is empty or larger than the region along either axis.
    #[must_use]
    pub fn reduce_to(&self, target: Extent) -> Self {
        assert!(
            !target.is_empty() && target.fits_in(self.extent),
            "cannot reduce a {} region to {target}",
            self.extent
        );
        let factor = (self.width() / target.width)
            .min(self.height() / target.height)
            .max(1);
        self.resample(target, factor)
    }

    fn resample(&self, target: Extent, factor: usize) -> Self {
        if target == self.extent {
            return Self::from_parts(
                self.origin,
                self.extent,
                self.scale * factor,
                self.feature_ids.clone(),
                self.values.clone(),
            );
        }

        let windows = OverlapWindows::new(self.extent, target);
        let n = self.feature_count();
        let mut values = Vec::with_capacity(target.area() * n);
        let mut sums = vec![0.0_f32; n];
        for ry in 0..target.height {
            for rx in 0..target.width {
                let (cols, rows) = windows.cells(rx, ry);
                sums.fill(0.0);
                for row in rows.clone() {
                    for col in cols.clone() {
                        for (sum, v) in sums.iter_mut().zip(self.cell(row, col)) {
                            *sum += v;
                        }
                    }
                }
                #[expect(clippy::cast_precision_loss)]
                let area = (cols.len() * rows.len()) as f32;
                values.extend(sums.iter().map(|sum| sum / area));
            }
        }

        Self::from_parts(
            self.origin,
            target,
            self.scale * factor,
            self.feature_ids.clone(),
            values,
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64;
    use wildcat_engine::{FieldGenerator, OilField, Position, Theme};

    use super::*;
    use crate::{
        region::tests::{flat_field, raw_context},
        site_feature::site_features,
    };

    #[test]
    fn test_windows_touch_both_edges() {
        let windows = OverlapWindows::new(Extent::new(80, 24), Extent::new(10, 3));
        let first = windows.window(0, 0);
        let last = windows.window(9, 2);
        assert!(first.x.abs() < 1e-5 && first.y.abs() < 1e-5);
        assert!((last.x + last.width - 80.0).abs() < 1e-4);
        assert!((last.y + last.height - 24.0).abs() < 1e-4);

        let (cx, cy) = windows.window(4, 1).center();
        assert!((cx - 400.0 / 11.0).abs() < 1e-4);
        assert!((cy - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_every_parent_cell_is_covered() {
        let cases = [
            (Extent::new(80, 24), Extent::new(10, 3)),
            (Extent::new(40, 12), Extent::new(10, 3)),
            (Extent::new(20, 6), Extent::new(10, 3)),
            (Extent::new(17, 9), Extent::new(4, 2)),
            (Extent::new(5, 5), Extent::new(1, 1)),
            (Extent::new(10, 3), Extent::new(10, 3)),
        ];
        for (parent, reduced) in cases {
            let windows = OverlapWindows::new(parent, reduced);
            let mut covered = vec![false; parent.area()];
            for ry in 0..reduced.height {
                for rx in 0..reduced.width {
                    let (cols, rows) = windows.cells(rx, ry);
                    assert!(!cols.is_empty() && !rows.is_empty());
                    assert!(cols.end <= parent.width && rows.end <= parent.height);
                    for row in rows {
                        for col in cols.clone() {
                            covered[row * parent.width + col] = true;
                        }
                    }
                }
            }
            assert!(
                covered.iter().all(|c| *c),
                "{parent} -> {reduced} leaves cells uncovered"
            );
        }
    }

    #[test]
    fn test_constant_field_is_idempotent() {
        let features = site_features(["prob", "cost", "tax"]).unwrap();
        for value in [0.0, 3.5, 10.0, 99.0] {
            let field = flat_field(33, 17, value);
            let ctx = raw_context(&field);
            let map = Region::map_field(&field, &features, &ctx).unwrap();
            for factor in 1..=8 {
                let reduced = map.reduce(factor);
                for v in reduced.inputs() {
                    assert!((v - value).abs() < 1e-4, "factor {factor}: {v} != {value}");
                }
            }
        }
    }

    #[test]
    fn test_reduced_values_stay_within_parent_range() {
        let theme = Theme::default();
        let generator = FieldGenerator::new(&theme).unwrap();
        let mut rng = Pcg64::seed_from_u64(7);
        let features = site_features(["prob", "cost"]).unwrap();

        for _ in 0..5 {
            let width = rng.random_range(10..=80);
            let height = rng.random_range(3..=24);
            let field = generator.generate(width, height, &mut rng);
            let ctx = raw_context(&field);
            let map = Region::map_field(&field, &features, &ctx).unwrap();

            for (f, _) in features.iter().enumerate() {
                let column = map.cells().map(|c| c[f]);
                let lo = column.clone().fold(f32::INFINITY, f32::min);
                let hi = column.fold(f32::NEG_INFINITY, f32::max);
                for factor in [2, 3, 4] {
                    for cell in map.reduce(factor).cells() {
                        assert!(cell[f] >= lo - 1e-3 && cell[f] <= hi + 1e-3);
                    }
                }
            }
        }
    }

    #[test]
    fn test_reduce_updates_geometry() {
        let field = OilField::new(80, 24);
        let ctx = raw_context(&field);
        let features = site_features(["prob"]).unwrap();
        let map = Region::map(&field, &features, &ctx, Position::new(0, 0), Extent::new(80, 24))
            .unwrap();

        let reduced = map.reduce(8);
        assert_eq!(reduced.extent(), Extent::new(10, 3));
        assert_eq!(reduced.scale(), 8);
        assert_eq!(reduced.origin(), map.origin());

        let again = reduced.reduce(2);
        assert_eq!(again.extent(), Extent::new(5, 1));
        assert_eq!(again.scale(), 16);

        let tiny = map.reduce(100);
        assert_eq!(tiny.extent(), Extent::new(1, 1));

        let tile = map.reduce_to(Extent::new(10, 3));
        assert_eq!(tile.extent(), Extent::new(10, 3));
        assert_eq!(tile.scale(), 8);
    }

    #[test]
    fn test_single_peak_lands_in_windows_over_it() {
        let mut field = OilField::new(20, 6);
        field.site_mut(2, 10).set_probability(100.0);
        let ctx = raw_context(&field);
        let features = site_features(["prob"]).unwrap();
        let map = Region::map_field(&field, &features, &ctx).unwrap();
        let reduced = map.reduce(2);
        let windows = OverlapWindows::new(map.extent(), reduced.extent());

        for ry in 0..reduced.height() {
            for rx in 0..reduced.width() {
                let (cols, rows) = windows.cells(rx, ry);
                let over_peak = cols.contains(&10) && rows.contains(&2);
                assert_eq!(reduced.value(ry, rx, 0) > 0.0, over_peak, "cell ({rx}, {ry})");
            }
        }
    }
}
