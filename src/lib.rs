#![forbid(unsafe_code)]
//! Half-size GIF transcoding.
//!
//! Each input frame is composited onto a full-size canvas with its disposal rules applied, the
//! canvas is box-filtered down by 2x in both directions, and every output pixel is mapped back to
//! the nearest color of the frame's palette.

pub mod canvas;
pub mod codec;
pub mod composite;
pub mod config;
pub mod foundation;
pub mod palette;
pub mod pipeline;
pub mod quantize;

pub use canvas::Canvas;
pub use codec::gif_file::{GifFileSink, GifFileSource, GifSink, GifSource};
pub use codec::memory::{InMemorySink, InMemorySource};
pub use codec::sink::{FrameSink, OutputFrame, SinkConfig};
pub use codec::source::{FrameRecord, FrameSource};
pub use composite::{CompositeState, PreviousFrame, composite_frame};
pub use config::{BackgroundMode, TranscodeOpts};
pub use foundation::color::{Argb, MAX_COLOR_DISTANCE, average4, distance};
pub use foundation::core::{DisposalMode, FrameRect, ScreenInfo};
pub use foundation::error::{HalfGifError, HalfGifResult};
pub use palette::Palette;
pub use pipeline::{TranscodeStats, render_canvas_frame, transcode, transcode_frames};
pub use quantize::{
    IndexedImage, Quantizer, box_average, downsample, downsample_quantize, output_size,
};
