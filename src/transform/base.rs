//! The transform seam between raw planes and the entropy coder.

use crate::image::color_range::ColorRanges;
use crate::image::pixels::Image;

/// A reversible per-pixel transform.
///
/// The lifecycle is: `init` against the source ranges (returns false when
/// the transform does not apply and must not be installed), `meta` to derive
/// the ranges the coder will see, then `data` on the encode path or
/// `inv_data` on the decode path.
pub trait Transform {
    /// Validates applicability and captures parameters from the source
    /// ranges.
    fn init(&mut self, src_ranges: &dyn ColorRanges) -> bool;

    /// Wraps the source ranges into the ranges of the transformed planes.
    fn meta(
        &mut self,
        images: &mut [Image],
        src_ranges: Box<dyn ColorRanges>,
    ) -> Box<dyn ColorRanges>;

    /// Applies the forward transform in place.
    fn data(&self, images: &mut [Image]);

    /// Applies the inverse transform in place.
    fn inv_data(&self, images: &mut [Image]);
}
