use crate::foundation::color::Argb;
use crate::foundation::core::FrameRect;
use crate::foundation::error::{HalfGifError, HalfGifResult};

/// Logical-screen sized true-color surface that frames are composited onto.
///
/// Pixels are row-major: `index = y * width + x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Argb>,
}

impl Canvas {
    /// Allocate a canvas filled with `fill`.
    ///
    /// Dimensions come straight from untrusted files, so zero sizes, overflowing pixel counts and
    /// allocation failure are all reported instead of panicking.
    pub fn new(width: u32, height: u32, fill: Argb) -> HalfGifResult<Self> {
        if width == 0 || height == 0 {
            return Err(HalfGifError::resource(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| HalfGifError::resource("canvas pixel count overflows usize"))?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| {
            HalfGifError::resource(format!("failed to allocate {width}x{height} canvas: {e}"))
        })?;
        pixels.resize(len, fill);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Argb] {
        &self.pixels
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) outside {}x{} canvas",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Argb {
        self.pixels[self.offset(x, y)]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Argb) {
        let i = self.offset(x, y);
        self.pixels[i] = color;
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[Argb] {
        let start = self.offset(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    pub fn fill(&mut self, color: Argb) {
        self.pixels.fill(color);
    }

    /// Overwrite a rectangle. The rectangle must lie on the canvas.
    pub fn fill_rect(&mut self, rect: FrameRect, color: Argb) {
        debug_assert!(
            rect.fits_within(self.width, self.height),
            "fill_rect {rect:?} outside {}x{} canvas",
            self.width,
            self.height
        );
        if rect.width == 0 {
            return;
        }
        for y in rect.top..rect.top + rect.height {
            let start = self.offset(rect.left, y);
            self.pixels[start..start + rect.width as usize].fill(color);
        }
    }

    /// Overwrite all pixels from another canvas of the same size.
    pub fn copy_from(&mut self, other: &Canvas) -> HalfGifResult<()> {
        if other.width != self.width || other.height != self.height {
            return Err(HalfGifError::validation(format!(
                "canvas size mismatch: {}x{} vs {}x{}",
                other.width, other.height, self.width, self.height
            )));
        }
        self.pixels.copy_from_slice(&other.pixels);
        Ok(())
    }

    /// Straight RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }
}

#[cfg(test)]
#[path = "../tests/unit/canvas.rs"]
mod tests;
