use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate in field space.
///
/// `x` is the column and `y` is the row, both counted from the top-left corner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the position of the `index`-th cell of a row-major grid `width` cells wide,
    /// offset by `self`.
    #[must_use]
    pub const fn offset_by_index(self, index: usize, width: usize) -> Self {
        Self {
            x: self.x + index % width,
            y: self.y + index / width,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a rectangle, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub width: usize,
    pub height: usize,
}

impl Extent {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn area(self) -> usize {
        self.width * self.height
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Divides both sides by `factor`, never going below one cell.
    #[must_use]
    pub fn div_floor(self, factor: usize) -> Self {
        Self {
            width: (self.width / factor).max(1),
            height: (self.height / factor).max(1),
        }
    }

    #[must_use]
    pub const fn scaled(self, factor: usize) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Returns `true` if `self` fits inside `other` on both axes.
    #[must_use]
    pub const fn fits_in(self, other: Self) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_by_index() {
        let origin = Position::new(3, 2);
        assert_eq!(origin.offset_by_index(0, 10), Position::new(3, 2));
        assert_eq!(origin.offset_by_index(9, 10), Position::new(12, 2));
        assert_eq!(origin.offset_by_index(10, 10), Position::new(3, 3));
        assert_eq!(origin.offset_by_index(29, 10), Position::new(12, 4));
    }

    #[test]
    fn test_div_floor_keeps_one_cell() {
        assert_eq!(Extent::new(80, 24).div_floor(8), Extent::new(10, 3));
        assert_eq!(Extent::new(80, 24).div_floor(50), Extent::new(1, 1));
        assert_eq!(Extent::new(10, 3).div_floor(1), Extent::new(10, 3));
    }

    #[test]
    fn test_fits_in() {
        assert!(Extent::new(10, 3).fits_in(Extent::new(80, 24)));
        assert!(Extent::new(80, 24).fits_in(Extent::new(80, 24)));
        assert!(!Extent::new(81, 3).fits_in(Extent::new(80, 24)));
    }
}
