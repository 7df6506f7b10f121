use std::path::Path;

use crate::canvas::Canvas;
use crate::codec::gif_file::{GifFileSink, GifFileSource};
use crate::codec::sink::{FrameSink, OutputFrame, SinkConfig};
use crate::codec::source::{FrameRecord, FrameSource};
use crate::composite::{CompositeState, composite_frame};
use crate::config::{BackgroundMode, TranscodeOpts};
use crate::foundation::color::Argb;
use crate::foundation::core::{DisposalMode, FrameRect, ScreenInfo};
use crate::foundation::error::{HalfGifError, HalfGifResult};
use crate::palette::Palette;
use crate::quantize::{Quantizer, build_thread_pool, downsample_quantize, output_size};

/// Summary of a finished transcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    /// Frames composited and encoded.
    pub frames: usize,
    pub input_width: u32,
    pub input_height: u32,
    pub output_width: u32,
    pub output_height: u32,
}

/// Transcode the GIF at `input` into a half-size GIF at `output`.
///
/// Success means every frame was composited and encoded. On failure nothing usable is left at
/// `output`: a partially written file is removed.
#[tracing::instrument(skip(opts), fields(input = %input.display(), output = %output.display()))]
pub fn transcode(
    input: &Path,
    output: &Path,
    opts: &TranscodeOpts,
) -> HalfGifResult<TranscodeStats> {
    opts.validate()?;
    if same_file(input, output) {
        return Err(HalfGifError::validation(
            "input and output must be different files",
        ));
    }

    let mut source = GifFileSource::open(input)?;
    let mut sink = GifFileSink::create(output)?;
    let result = transcode_frames(&mut source, &mut sink, opts);
    drop(sink);

    match result {
        Ok(stats) => {
            tracing::info!(
                frames = stats.frames,
                width = stats.output_width,
                height = stats.output_height,
                "transcode finished"
            );
            Ok(stats)
        }
        Err(err) => {
            if let Err(rm) = std::fs::remove_file(output) {
                tracing::warn!(error = %rm, "failed to remove partial output");
            }
            Err(err)
        }
    }
}

/// Drive the frame loop: composite, downsample, quantize, encode.
///
/// Frames reach `sink` in input order. Every output frame covers the whole output screen and is
/// disposed to background, so transparent output pixels never reveal an earlier output frame. The
/// source is closed on every exit path; the sink is finished only on success.
pub fn transcode_frames(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    opts: &TranscodeOpts,
) -> HalfGifResult<TranscodeStats> {
    let result = run_frames(source, sink, opts);
    source.close();
    result
}

fn run_frames(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    opts: &TranscodeOpts,
) -> HalfGifResult<TranscodeStats> {
    opts.validate()?;
    let screen = source.screen();
    let mut canvas = allocate_canvas(&screen, opts)?;
    let background = initial_background(&screen, opts);
    let (output_width, output_height) = output_size(screen.width, screen.height);
    let pool = match opts.parallel {
        true => Some(build_thread_pool(opts.threads)?),
        false => None,
    };

    let global = source.global_palette().cloned();
    sink.begin(SinkConfig {
        width: output_width,
        height: output_height,
        global_palette: global.clone(),
        loop_count: opts.loop_count,
    })?;

    let mut state = CompositeState::new(opts.restore_previous);
    while let Some(frame) = source.next_frame()? {
        let index = state.frame_index();
        let palette = frame_palette(&frame, index)?;

        state = composite_frame(&mut canvas, &frame, palette, background, state)?;

        let quantizer = Quantizer::new(palette, frame.transparent)
            .map_err(|e| HalfGifError::corrupt(index, e.to_string()))?;
        let image = downsample_quantize(&canvas, &quantizer, pool.as_ref())?;

        let attach_palette = frame.local_palette || global.as_ref() != Some(palette);
        let out = OutputFrame {
            rect: FrameRect::new(0, 0, image.width, image.height),
            disposal: DisposalMode::RestoreBackground,
            transparent: quantizer.transparent(),
            delay: if opts.keep_delays { frame.delay } else { 0 },
            raster: image.indices,
            palette: attach_palette.then(|| palette.clone()),
        };
        sink.push_frame(&out).map_err(|e| e.at_frame(index))?;
    }

    sink.finish()?;

    Ok(TranscodeStats {
        frames: state.frame_index(),
        input_width: screen.width,
        input_height: screen.height,
        output_width,
        output_height,
    })
}

/// Composite frames `0..=index` and return the full-size canvas as it looks after frame `index`.
pub fn render_canvas_frame(
    source: &mut dyn FrameSource,
    index: usize,
    opts: &TranscodeOpts,
) -> HalfGifResult<Canvas> {
    let result = composite_until(source, index, opts);
    source.close();
    result
}

fn composite_until(
    source: &mut dyn FrameSource,
    index: usize,
    opts: &TranscodeOpts,
) -> HalfGifResult<Canvas> {
    opts.validate()?;
    let screen = source.screen();
    let mut canvas = allocate_canvas(&screen, opts)?;
    let background = initial_background(&screen, opts);

    let mut state = CompositeState::new(opts.restore_previous);
    while let Some(frame) = source.next_frame()? {
        let current = state.frame_index();
        let palette = frame_palette(&frame, current)?;
        state = composite_frame(&mut canvas, &frame, palette, background, state)?;
        if current == index {
            return Ok(canvas);
        }
    }
    Err(HalfGifError::validation(format!(
        "frame {index} requested but the input has only {} frames",
        state.frame_index()
    )))
}

fn frame_palette(frame: &FrameRecord, index: usize) -> HalfGifResult<&Palette> {
    frame.palette.as_ref().ok_or_else(|| {
        HalfGifError::corrupt(
            index,
            "frame has no local palette and the file has no global palette",
        )
    })
}

fn allocate_canvas(screen: &ScreenInfo, opts: &TranscodeOpts) -> HalfGifResult<Canvas> {
    let pixels = u64::from(screen.width) * u64::from(screen.height);
    if pixels > opts.max_canvas_pixels {
        return Err(HalfGifError::resource(format!(
            "logical screen {}x{} exceeds the {} pixel limit",
            screen.width, screen.height, opts.max_canvas_pixels
        )));
    }
    Canvas::new(screen.width, screen.height, Argb::TRANSPARENT)
}

fn initial_background(screen: &ScreenInfo, opts: &TranscodeOpts) -> Argb {
    match opts.background {
        BackgroundMode::Screen => screen.background.unwrap_or(Argb::TRANSPARENT),
        BackgroundMode::Transparent => Argb::TRANSPARENT,
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
