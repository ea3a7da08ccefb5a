//! Multi-plane pixel buffers.
//!
//! Planes hold signed samples so that transformed channels (chroma goes
//! negative) use the same storage as raw ones. A plane that is known to be
//! a single value everywhere can be kept in compact constant form until a
//! transform needs to write through it again.

/// A single sample value.
pub type ColorVal = i32;

#[derive(Debug, Clone)]
enum PlaneData {
    Full(Vec<ColorVal>),
    Constant(ColorVal),
}

/// An image: `width × height` samples in each of `num_planes` planes.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    planes: Vec<PlaneData>,
}

impl Image {
    /// Creates a zero-filled image.
    pub fn new(width: u32, height: u32, num_planes: usize) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            planes: (0..num_planes).map(|_| PlaneData::Full(vec![0; size])).collect(),
        }
    }

    /// Builds a 3-plane image from an 8-bit RGB buffer.
    pub fn from_rgb8(img: &::image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let mut out = Self::new(width, height, 3);
        for (x, y, px) in img.enumerate_pixels() {
            for p in 0..3 {
                out.set(p, y, x, px.0[p] as ColorVal);
            }
        }
        out
    }

    /// Converts the first three planes back to an 8-bit RGB buffer,
    /// clamping each sample into `[0, 255]`.
    pub fn to_rgb8(&self) -> ::image::RgbImage {
        assert!(self.planes.len() >= 3);
        ::image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let px = |p: usize| self.get(p, y, x).clamp(0, 255) as u8;
            ::image::Rgb([px(0), px(1), px(2)])
        })
    }

    pub fn rows(&self) -> u32 {
        self.height
    }

    pub fn cols(&self) -> u32 {
        self.width
    }

    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn get(&self, p: usize, r: u32, c: u32) -> ColorVal {
        debug_assert!(r < self.height && c < self.width);
        match &self.planes[p] {
            PlaneData::Full(data) => data[r as usize * self.width as usize + c as usize],
            PlaneData::Constant(v) => *v,
        }
    }

    #[inline]
    pub fn set(&mut self, p: usize, r: u32, c: u32, v: ColorVal) {
        debug_assert!(r < self.height && c < self.width);
        match &mut self.planes[p] {
            PlaneData::Full(data) => {
                data[r as usize * self.width as usize + c as usize] = v;
            }
            PlaneData::Constant(_) => {
                debug_assert!(false, "writing through a constant plane");
            }
        }
    }

    /// Collapses a plane to a single stored value.
    pub fn make_constant_plane(&mut self, p: usize, v: ColorVal) {
        self.planes[p] = PlaneData::Constant(v);
    }

    /// Re-materializes a constant plane so it can be written again.
    /// Full planes are left untouched.
    pub fn undo_make_constant_plane(&mut self, p: usize) {
        let size = self.width as usize * self.height as usize;
        if let PlaneData::Constant(v) = self.planes[p] {
            self.planes[p] = PlaneData::Full(vec![v; size]);
        }
    }
}
