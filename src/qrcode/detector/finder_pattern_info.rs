//! The three finder patterns located in an image, arranged into their
//! symbol-relative roles (spec §4.7).

use crate::qrcode::detector::finder_pattern::FinderPattern;

pub struct FinderPatternInfo {
    bottom_left: FinderPattern,
    top_left: FinderPattern,
    top_right: FinderPattern,
}

impl FinderPatternInfo {
    /// Expects `pattern_centers` already ordered `[bottom_left, top_left,
    /// top_right]`.
    pub const fn new(pattern_centers: [FinderPattern; 3]) -> Self {
        let [bottom_left, top_left, top_right] = pattern_centers;
        Self { bottom_left, top_left, top_right }
    }

    pub const fn bottom_left(&self) -> &FinderPattern {
        &self.bottom_left
    }

    pub const fn top_left(&self) -> &FinderPattern {
        &self.top_left
    }

    pub const fn top_right(&self) -> &FinderPattern {
        &self.top_right
    }
}
