//! Reversible YCoCg color decorrelation.
//!
//! Y is a near 1:2:1 weighted average of RGB, Co the red/blue difference,
//! Cg the green/purple difference. Working from `p = (R+B)>>1`:
//!
//! ```text
//!  Y = (p + G) >> 1        Co = (R - B) - 1        Cg = (p - G) - 1
//! ```
//!
//! The `-1` offsets and the `+2`/`+1` rounding constants of the inverse are
//! paired; changing either side breaks losslessness. Because the three
//! shifts discard bits that the chroma channels retain, every (R,G,B) in
//! `[0, 4*par-1]` maps to a unique (Y,Co,Cg) and back.
//!
//! The dependent range tables below delimit the legal chroma values for a
//! given luma, and thereby the alphabet the entropy coder works with: they
//! must stay bit-exact.

use crate::image::color_range::ColorRanges;
use crate::image::pixels::{ColorVal, Image};
use crate::transform::base::Transform;

pub fn get_min_y(_par: i32) -> ColorVal {
    0
}

pub fn get_max_y(par: i32) -> ColorVal {
    4 * par - 1
}

pub fn get_min_co(par: i32, y: ColorVal) -> ColorVal {
    debug_assert!(y >= get_min_y(par) && y <= get_max_y(par));
    if y < par - 1 {
        -4 - 4 * y
    } else if y >= 3 * par {
        3 + 4 * (y - 4 * par)
    } else {
        -4 * par
    }
}

pub fn get_max_co(par: i32, y: ColorVal) -> ColorVal {
    debug_assert!(y >= get_min_y(par) && y <= get_max_y(par));
    if y < par - 1 {
        2 + 4 * y
    } else if y >= 3 * par {
        4 * par - 5 - 4 * (y - 3 * par)
    } else {
        4 * par - 2
    }
}

/// Returns `8*par` (an impossible Cg) when `co` is outside its own bounds.
pub fn get_min_cg(par: i32, y: ColorVal, co: ColorVal) -> ColorVal {
    debug_assert!(y >= get_min_y(par) && y <= get_max_y(par));
    if co < get_min_co(par, y) || co > get_max_co(par, y) {
        return 8 * par; // invalid value
    }
    if y < par - 1 {
        -2 - 2 * y + ((co + 1).abs() / 2) * 2
    } else if y >= 3 * par {
        -1 - 2 * (4 * par - 1 - y)
    } else {
        std::cmp::max(
            -4 * par + 1 + (y - 2 * par) * 2,
            -2 * par - (y - par + 1) * 2 + ((co + 1).abs() / 2) * 2,
        )
    }
}

/// Returns `-8*par` (an impossible Cg) when `co` is outside its own bounds.
pub fn get_max_cg(par: i32, y: ColorVal, co: ColorVal) -> ColorVal {
    debug_assert!(y >= get_min_y(par) && y <= get_max_y(par));
    if co < get_min_co(par, y) || co > get_max_co(par, y) {
        return -8 * par; // invalid value
    }
    if y < par - 1 {
        2 * y
    } else if y >= 3 * par {
        -1 + 2 * (4 * par - 1 - y) - ((1 + (co + 1).abs()) / 2) * 2
    } else {
        std::cmp::min(
            2 * par - 2 + (y - par + 1) * 2,
            2 * par - 1 + (3 * par - 1 - y) * 2 - ((1 + (co + 1).abs()) / 2) * 2,
        )
    }
}

/// Ranges of the YCoCg planes, wrapping the source ranges for any plane
/// beyond the first three.
pub struct ColorRangesYCoCg {
    par: i32,
    ranges: Box<dyn ColorRanges>,
}

impl ColorRangesYCoCg {
    pub fn new(par: i32, ranges: Box<dyn ColorRanges>) -> Self {
        Self { par, ranges }
    }

    pub fn par(&self) -> i32 {
        self.par
    }
}

impl ColorRanges for ColorRangesYCoCg {
    fn num_planes(&self) -> usize {
        self.ranges.num_planes()
    }

    fn min(&self, p: usize) -> ColorVal {
        match p {
            0 => 0,
            1 | 2 => -4 * self.par,
            _ => self.ranges.min(p),
        }
    }

    fn max(&self, p: usize) -> ColorVal {
        match p {
            0 => 4 * self.par - 1,
            1 | 2 => 4 * self.par - 2,
            _ => self.ranges.max(p),
        }
    }

    fn minmax(&self, p: usize, pp: &[ColorVal]) -> (ColorVal, ColorVal) {
        match p {
            0 => (0, get_max_y(self.par)),
            1 => (get_min_co(self.par, pp[0]), get_max_co(self.par, pp[0])),
            2 => (
                get_min_cg(self.par, pp[0], pp[1]),
                get_max_cg(self.par, pp[0], pp[1]),
            ),
            _ => self.ranges.minmax(p, pp),
        }
    }

    fn is_static(&self) -> bool {
        false
    }
}

/// The YCoCg transform; `par` scales the chroma lattice to the channel
/// depth, `par = max/4 + 1`.
pub struct TransformYCoCg {
    par: i32,
    orig_max: [ColorVal; 3],
}

impl TransformYCoCg {
    pub fn new() -> Self {
        Self {
            par: 0,
            orig_max: [0; 3],
        }
    }

    pub fn par(&self) -> i32 {
        self.par
    }
}

impl Default for TransformYCoCg {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for TransformYCoCg {
    fn init(&mut self, src_ranges: &dyn ColorRanges) -> bool {
        if src_ranges.num_planes() < 3 {
            return false;
        }
        if src_ranges.min(0) < 0 || src_ranges.min(1) < 0 || src_ranges.min(2) < 0 {
            return false;
        }
        if src_ranges.min(0) == src_ranges.max(0)
            || src_ranges.min(1) == src_ranges.max(1)
            || src_ranges.min(2) == src_ranges.max(2)
        {
            return false;
        }
        let max = src_ranges.max(0).max(src_ranges.max(1)).max(src_ranges.max(2));
        self.par = max / 4 + 1;
        self.orig_max = [src_ranges.max(0), src_ranges.max(1), src_ranges.max(2)];
        true
    }

    fn meta(
        &mut self,
        _images: &mut [Image],
        src_ranges: Box<dyn ColorRanges>,
    ) -> Box<dyn ColorRanges> {
        Box::new(ColorRangesYCoCg::new(self.par, src_ranges))
    }

    fn data(&self, images: &mut [Image]) {
        for image in images.iter_mut() {
            for r in 0..image.rows() {
                for c in 0..image.cols() {
                    let red = image.get(0, r, c);
                    let green = image.get(1, r, c);
                    let blue = image.get(2, r, c);

                    let y = (((red + blue) >> 1) + green) >> 1;
                    let co = (red - blue) - 1;
                    let cg = (((red + blue) >> 1) - green) - 1;

                    image.set(0, r, c, y);
                    image.set(1, r, c, co);
                    image.set(2, r, c, cg);
                }
            }
        }
    }

    fn inv_data(&self, images: &mut [Image]) {
        for image in images.iter_mut() {
            image.undo_make_constant_plane(0);
            image.undo_make_constant_plane(1);
            image.undo_make_constant_plane(2);
            for r in 0..image.rows() {
                for c in 0..image.cols() {
                    let y = image.get(0, r, c);
                    let co = image.get(1, r, c);
                    let cg = image.get(2, r, c);

                    let red = y + ((cg + 2) >> 1) + ((co + 2) >> 1);
                    let green = y - ((cg + 1) >> 1);
                    let blue = y + ((cg + 2) >> 1) - ((co + 1) >> 1);

                    // clipping only matters for lossy or partial decodes
                    image.set(0, r, c, red.clamp(0, self.orig_max[0]));
                    image.set(1, r, c, green.clamp(0, self.orig_max[1]));
                    image.set(2, r, c, blue.clamp(0, self.orig_max[2]));
                }
            }
        }
    }
}
