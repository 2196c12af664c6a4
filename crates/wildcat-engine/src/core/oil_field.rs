use serde::{Deserialize, Serialize};

use crate::core::{
    geometry::{Extent, Position},
    site::Site,
};

/// A fixed-size rectangular grid of [`Site`]s, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilField {
    width: usize,
    height: usize,
    sites: Vec<Site>,
}

impl OilField {
    /// Creates a field of default (empty) sites.
    ///
    /// # Panics
    ///
    /// Panics if either side is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "field must be at least 1x1");
        Self {
            width,
            height,
            sites: vec![Site::default(); width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    #[must_use]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Returns the site at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the field.
    #[must_use]
    pub fn site(&self, row: usize, col: usize) -> &Site {
        assert!(row < self.height && col < self.width, "site ({row}, {col}) out of field");
        &self.sites[row * self.width + col]
    }

    /// Returns the site at `(row, col)` for modification.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the field.
    pub fn site_mut(&mut self, row: usize, col: usize) -> &mut Site {
        assert!(row < self.height && col < self.width, "site ({row}, {col}) out of field");
        &mut self.sites[row * self.width + col]
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&Site> {
        (pos.x < self.width && pos.y < self.height).then(|| &self.sites[pos.y * self.width + pos.x])
    }

    /// Iterates over all sites with their positions, row by row.
    pub fn sites(&self) -> impl Iterator<Item = (Position, &Site)> + '_ {
        let width = self.width;
        self.sites
            .iter()
            .enumerate()
            .map(move |(i, site)| (Position::new(i % width, i / width), site))
    }

    pub fn sites_mut(&mut self) -> impl Iterator<Item = (Position, &mut Site)> + '_ {
        let width = self.width;
        self.sites
            .iter_mut()
            .enumerate()
            .map(move |(i, site)| (Position::new(i % width, i / width), site))
    }
}
