use crate::foundation::core::{DisposalMode, FrameRect, ScreenInfo};
use crate::foundation::error::HalfGifResult;
use crate::palette::Palette;

/// One decoded input frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRecord {
    /// Placement within the logical screen.
    pub rect: FrameRect,
    pub disposal: DisposalMode,
    /// Palette slot that means "draw nothing here", if any.
    pub transparent: Option<u8>,
    /// Display time in hundredths of a second.
    pub delay: u16,
    /// Row-major color indices, `rect.width * rect.height` entries.
    pub raster: Vec<u8>,
    /// Palette in effect for this frame: the local one if present, else the global one.
    pub palette: Option<Palette>,
    /// Whether `palette` came from a local color table.
    pub local_palette: bool,
}

/// Lazy, forward-only sequence of decoded frames plus the logical screen they belong to.
pub trait FrameSource {
    fn screen(&self) -> ScreenInfo;
    fn global_palette(&self) -> Option<&Palette>;
    /// Next frame in display order, `Ok(None)` once the stream is exhausted or closed.
    fn next_frame(&mut self) -> HalfGifResult<Option<FrameRecord>>;
    /// Release the underlying input. Safe to call more than once and after a failed read.
    fn close(&mut self);
}
