use crate::foundation::core::{DisposalMode, FrameRect};
use crate::foundation::error::HalfGifResult;
use crate::palette::Palette;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output logical screen width.
    pub width: u32,
    /// Output logical screen height.
    pub height: u32,
    pub global_palette: Option<Palette>,
    /// `None` loops forever.
    pub loop_count: Option<u16>,
}

/// One quantized output frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFrame {
    pub rect: FrameRect,
    pub disposal: DisposalMode,
    pub transparent: Option<u8>,
    pub delay: u16,
    pub raster: Vec<u8>,
    /// Local palette to attach; `None` uses the global palette.
    pub palette: Option<Palette>,
}

/// Encoder contract.
///
/// Ordering contract: `push_frame` is called in display order, after `begin` and before `finish`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> HalfGifResult<()>;
    fn push_frame(&mut self, frame: &OutputFrame) -> HalfGifResult<()>;
    /// Finalize the container. Idempotent.
    fn finish(&mut self) -> HalfGifResult<()>;
}
