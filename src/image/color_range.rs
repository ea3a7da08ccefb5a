//! Per-plane value ranges.

use crate::image::pixels::ColorVal;

/// Legal value set of each plane, possibly depending on the planes decoded
/// before it at the same pixel.
pub trait ColorRanges {
    fn num_planes(&self) -> usize;
    fn min(&self, p: usize) -> ColorVal;
    fn max(&self, p: usize) -> ColorVal;

    /// Tight bounds for plane `p` given the previously decoded planes of
    /// this pixel. Defaults to the static bounds.
    fn minmax(&self, p: usize, _prev_planes: &[ColorVal]) -> (ColorVal, ColorVal) {
        (self.min(p), self.max(p))
    }

    /// Whether `minmax` ever tightens beyond the static bounds.
    fn is_static(&self) -> bool {
        true
    }
}

/// Plain per-plane bounds.
#[derive(Debug, Clone)]
pub struct StaticColorRanges {
    bounds: Vec<(ColorVal, ColorVal)>,
}

impl StaticColorRanges {
    pub fn new(bounds: Vec<(ColorVal, ColorVal)>) -> Self {
        debug_assert!(bounds.iter().all(|&(lo, hi)| lo <= hi));
        Self { bounds }
    }

    /// Three full planes of `[0, max]`, the shape of untransformed RGB.
    pub fn rgb(max: ColorVal) -> Self {
        Self::new(vec![(0, max); 3])
    }
}

impl ColorRanges for StaticColorRanges {
    fn num_planes(&self) -> usize {
        self.bounds.len()
    }

    fn min(&self, p: usize) -> ColorVal {
        self.bounds[p].0
    }

    fn max(&self, p: usize) -> ColorVal {
        self.bounds[p].1
    }
}
