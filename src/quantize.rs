use rayon::prelude::*;

use crate::canvas::Canvas;
use crate::foundation::color::{Argb, average4, distance};
use crate::foundation::error::{HalfGifError, HalfGifResult};
use crate::palette::Palette;

/// Half-size dimensions for a `width x height` canvas, rounding up.
pub fn output_size(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(2), height.div_ceil(2))
}

/// Box-filter one output pixel from the 2x2 source block at `(2*ox, 2*oy)`.
///
/// On odd-sized canvases the last block is missing a column and/or row; the edge pixel is
/// repeated in its place.
#[inline]
pub fn box_average(canvas: &Canvas, ox: u32, oy: u32) -> Argb {
    let x0 = ox * 2;
    let y0 = oy * 2;
    let x1 = (x0 + 1).min(canvas.width() - 1);
    let y1 = (y0 + 1).min(canvas.height() - 1);
    average4(
        canvas.get_pixel(x0, y0),
        canvas.get_pixel(x1, y0),
        canvas.get_pixel(x0, y1),
        canvas.get_pixel(x1, y1),
    )
}

/// Box-filtered half-size true-color rendering of `canvas`, row-major.
pub fn downsample(canvas: &Canvas) -> HalfGifResult<Canvas> {
    let (w, h) = output_size(canvas.width(), canvas.height());
    let mut out = Canvas::new(w, h, Argb::TRANSPARENT)?;
    for oy in 0..h {
        for ox in 0..w {
            out.set_pixel(ox, oy, box_average(canvas, ox, oy));
        }
    }
    Ok(out)
}

/// Maps true colors back onto one frame's palette.
#[derive(Clone, Copy, Debug)]
pub struct Quantizer<'a> {
    palette: &'a Palette,
    transparent: Option<u8>,
}

impl<'a> Quantizer<'a> {
    /// A transparent index that does not address a palette entry is treated as absent.
    pub fn new(palette: &'a Palette, transparent: Option<u8>) -> HalfGifResult<Self> {
        if palette.is_empty() {
            return Err(HalfGifError::validation(
                "cannot quantize against an empty palette",
            ));
        }
        Ok(Self {
            palette,
            transparent: transparent.filter(|&t| palette.contains_index(t)),
        })
    }

    pub fn transparent(&self) -> Option<u8> {
        self.transparent
    }

    /// Palette index for `color`.
    ///
    /// Zero alpha goes straight to the transparent index when there is one. Everything else is
    /// matched on RGB by linear scan; ties keep the lowest index.
    pub fn nearest_index(&self, color: Argb) -> u8 {
        if color.a() == 0
            && let Some(t) = self.transparent
        {
            return t;
        }

        let mut best: Option<(u8, u32)> = None;
        for (i, &entry) in self.palette.colors().iter().enumerate().take(256) {
            let i = i as u8;
            if Some(i) == self.transparent {
                continue;
            }
            let d = distance(color, entry);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
                if d == 0 {
                    break;
                }
            }
        }

        // only reachable with a palette whose sole entry is the transparent one
        best.map(|(i, _)| i)
            .or(self.transparent)
            .unwrap_or_default()
    }
}

/// Indexed image produced for the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
}

/// Downsample `canvas` by two and quantize the result in one pass.
///
/// With a `pool`, output rows are distributed across its workers. Each worker writes only its own
/// rows and reads the canvas, so the result is identical to the sequential pass.
pub fn downsample_quantize(
    canvas: &Canvas,
    quantizer: &Quantizer<'_>,
    pool: Option<&rayon::ThreadPool>,
) -> HalfGifResult<IndexedImage> {
    let (width, height) = output_size(canvas.width(), canvas.height());
    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| HalfGifError::resource("output pixel count overflows usize"))?;

    let mut indices = Vec::new();
    indices.try_reserve_exact(len).map_err(|e| {
        HalfGifError::resource(format!("failed to allocate {width}x{height} output: {e}"))
    })?;
    indices.resize(len, 0u8);

    let fill_row = |(oy, row): (usize, &mut [u8])| {
        for (ox, out) in row.iter_mut().enumerate() {
            *out = quantizer.nearest_index(box_average(canvas, ox as u32, oy as u32));
        }
    };

    match pool {
        Some(pool) => pool.install(|| {
            indices
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(fill_row)
        }),
        None => indices
            .chunks_mut(width as usize)
            .enumerate()
            .for_each(fill_row),
    }

    Ok(IndexedImage {
        width,
        height,
        indices,
    })
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> HalfGifResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(HalfGifError::validation(
            "'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| HalfGifError::resource(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/quantize.rs"]
mod tests;
