use crate::canvas::Canvas;
use crate::codec::source::FrameRecord;
use crate::foundation::color::Argb;
use crate::foundation::core::{DisposalMode, FrameRect};
use crate::foundation::error::{HalfGifError, HalfGifResult};
use crate::palette::Palette;

/// Rectangle and disposal of the frame painted last, kept for one more iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviousFrame {
    pub rect: FrameRect,
    pub disposal: DisposalMode,
}

/// Accumulator threaded through the frame loop.
///
/// Holds everything the next compositing step needs to know about the frames before it.
#[derive(Clone, Debug, Default)]
pub struct CompositeState {
    next_index: usize,
    previous: Option<PreviousFrame>,
    honor_restore_previous: bool,
    saved: Option<Canvas>,
}

impl CompositeState {
    /// Fresh state for the first frame.
    ///
    /// With `honor_restore_previous` unset, `RestorePrevious` disposal leaves the canvas untouched
    /// like `Unspecified` does.
    pub fn new(honor_restore_previous: bool) -> Self {
        Self {
            honor_restore_previous,
            ..Self::default()
        }
    }

    /// Index of the frame the next [`composite_frame`] call will paint.
    pub fn frame_index(&self) -> usize {
        self.next_index
    }

    pub fn previous(&self) -> Option<PreviousFrame> {
        self.previous
    }
}

/// Paint one frame onto `canvas`, first disposing of the previous one.
///
/// `palette` is the palette in effect for `frame` (local, else global). Returns the state for
/// the next frame. An out-of-range color index aborts the frame with [`HalfGifError::Corrupt`];
/// pixels written before the bad index stay written.
pub fn composite_frame(
    canvas: &mut Canvas,
    frame: &FrameRecord,
    palette: &Palette,
    background: Argb,
    state: CompositeState,
) -> HalfGifResult<CompositeState> {
    let CompositeState {
        next_index: index,
        previous,
        honor_restore_previous,
        mut saved,
    } = state;

    let expected = frame
        .rect
        .area()
        .ok_or_else(|| HalfGifError::corrupt(index, "frame pixel count overflows usize"))?;
    if frame.raster.len() != expected {
        return Err(HalfGifError::corrupt(
            index,
            format!(
                "raster has {} entries, expected {}x{} = {expected}",
                frame.raster.len(),
                frame.rect.width,
                frame.rect.height
            ),
        ));
    }

    tracing::debug!(
        frame = index,
        rect = ?frame.rect,
        disposal = ?frame.disposal,
        transparent = ?frame.transparent,
        "compositing frame"
    );

    let previous_disposal = match (index, previous) {
        (0, _) | (_, None) => {
            canvas.fill(background);
            None
        }
        (_, Some(prev)) => {
            match prev.disposal {
                DisposalMode::RestoreBackground => {
                    if let Some(rect) = prev.rect.clip_to(canvas.width(), canvas.height()) {
                        canvas.fill_rect(rect, Argb::TRANSPARENT);
                    }
                }
                DisposalMode::RestorePrevious if honor_restore_previous => {
                    if let Some(snapshot) = saved.take() {
                        canvas.copy_from(&snapshot)?;
                    }
                }
                DisposalMode::RestorePrevious
                | DisposalMode::Unspecified
                | DisposalMode::DoNotDispose => {}
            }
            Some(prev.disposal)
        }
    };

    if honor_restore_previous && frame.disposal == DisposalMode::RestorePrevious {
        saved = Some(snapshot(canvas, saved.take())?);
    }

    paint(canvas, frame, palette, index, previous_disposal)?;

    Ok(CompositeState {
        next_index: index + 1,
        previous: Some(PreviousFrame {
            rect: frame.rect,
            disposal: frame.disposal,
        }),
        honor_restore_previous,
        saved,
    })
}

fn snapshot(canvas: &Canvas, reuse: Option<Canvas>) -> HalfGifResult<Canvas> {
    let mut out = match reuse {
        Some(c) => c,
        None => Canvas::new(canvas.width(), canvas.height(), Argb::TRANSPARENT)?,
    };
    out.copy_from(canvas)?;
    Ok(out)
}

fn paint(
    canvas: &mut Canvas,
    frame: &FrameRecord,
    palette: &Palette,
    index: usize,
    previous_disposal: Option<DisposalMode>,
) -> HalfGifResult<()> {
    let FrameRect {
        left,
        top,
        width,
        height,
    } = frame.rect;
    let keep_under_transparent = previous_disposal == Some(DisposalMode::DoNotDispose);
    let (screen_w, screen_h) = (u64::from(canvas.width()), u64::from(canvas.height()));

    if !frame.rect.fits_within(canvas.width(), canvas.height()) {
        tracing::warn!(
            frame = index,
            rect = ?frame.rect,
            screen_width = screen_w,
            screen_height = screen_h,
            "frame extends past the logical screen, clipping"
        );
    }

    for (y, row) in (0..height).zip(frame.raster.chunks_exact(width.max(1) as usize)) {
        let render_y = u64::from(top) + u64::from(y);
        for (x, &color_index) in (0..width).zip(row) {
            if !palette.contains_index(color_index) {
                return Err(HalfGifError::corrupt(
                    index,
                    format!(
                        "color index {color_index} out of bounds (palette has {} entries)",
                        palette.len()
                    ),
                ));
            }

            let render_x = u64::from(left) + u64::from(x);
            if render_x >= screen_w || render_y >= screen_h {
                continue;
            }

            let is_transparent = frame.transparent == Some(color_index);
            if is_transparent && keep_under_transparent {
                continue;
            }

            let color = if is_transparent {
                Argb::TRANSPARENT
            } else {
                palette.get(color_index).unwrap_or(Argb::TRANSPARENT)
            };
            canvas.set_pixel(render_x as u32, render_y as u32, color);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/composite.rs"]
mod tests;
