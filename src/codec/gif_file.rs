use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::codec::sink::{FrameSink, OutputFrame, SinkConfig};
use crate::codec::source::{FrameRecord, FrameSource};
use crate::foundation::core::{FrameRect, ScreenInfo};
use crate::foundation::error::{HalfGifError, HalfGifResult};
use crate::palette::Palette;

/// [`FrameSource`] over any GIF byte stream.
///
/// Frames come out as palette indices; de-interlacing is done by the decoder.
pub struct GifSource<R: Read> {
    decoder: Option<gif::Decoder<R>>,
    screen: ScreenInfo,
    global: Option<Palette>,
    frames_read: usize,
}

/// [`GifSource`] reading a file from disk.
pub type GifFileSource = GifSource<BufReader<File>>;

impl GifFileSource {
    pub fn open(path: &Path) -> HalfGifResult<Self> {
        let file = File::open(path).map_err(|e| {
            HalfGifError::open(format!("cannot open input '{}': {e}", path.display()))
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> GifSource<R> {
    /// Read the header, logical screen descriptor and global palette.
    pub fn new(reader: R) -> HalfGifResult<Self> {
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::Indexed);
        let decoder = opts
            .read_info(reader)
            .map_err(|e| HalfGifError::open(format!("input is not a decodable GIF: {e}")))?;

        let global = decoder
            .global_palette()
            .map(Palette::from_rgb_bytes)
            .transpose()
            .map_err(|e| HalfGifError::open(format!("bad global palette: {e}")))?;
        let background = decoder
            .bg_color()
            .and_then(|i| u8::try_from(i).ok())
            .and_then(|i| global.as_ref()?.get(i));

        let screen = ScreenInfo {
            width: u32::from(decoder.width()),
            height: u32::from(decoder.height()),
            background,
        };
        tracing::debug!(
            width = screen.width,
            height = screen.height,
            global_palette = global.as_ref().map_or(0, Palette::len),
            "opened GIF input"
        );

        Ok(Self {
            decoder: Some(decoder),
            screen,
            global,
            frames_read: 0,
        })
    }
}

impl<R: Read> FrameSource for GifSource<R> {
    fn screen(&self) -> ScreenInfo {
        self.screen
    }

    fn global_palette(&self) -> Option<&Palette> {
        self.global.as_ref()
    }

    fn next_frame(&mut self) -> HalfGifResult<Option<FrameRecord>> {
        let index = self.frames_read;
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(None);
        };

        let frame = match decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => return Err(HalfGifError::corrupt(index, format!("decode failed: {e}"))),
        };

        let (palette, local_palette) = match &frame.palette {
            Some(bytes) => {
                let local = Palette::from_rgb_bytes(bytes)
                    .map_err(|e| HalfGifError::corrupt(index, e.to_string()))?;
                (Some(local), true)
            }
            None => (self.global.clone(), false),
        };

        let record = FrameRecord {
            rect: FrameRect::new(
                u32::from(frame.left),
                u32::from(frame.top),
                u32::from(frame.width),
                u32::from(frame.height),
            ),
            disposal: frame.dispose.into(),
            transparent: frame.transparent,
            delay: frame.delay,
            raster: frame.buffer.to_vec(),
            palette,
            local_palette,
        };
        self.frames_read += 1;
        Ok(Some(record))
    }

    fn close(&mut self) {
        self.decoder = None;
    }
}

enum SinkState<W: Write> {
    Ready(W),
    Encoding(gif::Encoder<W>),
    Finished(W),
    Failed,
}

/// [`FrameSink`] writing a GIF container to any byte stream.
///
/// Dropping the sink mid-stream still releases the writer; the `gif` encoder writes its trailer on
/// drop.
pub struct GifSink<W: Write> {
    state: SinkState<W>,
}

/// [`GifSink`] writing a file on disk.
pub type GifFileSink = GifSink<BufWriter<File>>;

impl GifFileSink {
    /// Create (or truncate) `path`, creating missing parent directories.
    pub fn create(path: &Path) -> HalfGifResult<Self> {
        ensure_parent_dir(path)?;
        let file = File::create(path).map_err(|e| {
            HalfGifError::open(format!("cannot create output '{}': {e}", path.display()))
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> GifSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: SinkState::Ready(writer),
        }
    }

    /// Finish the container if needed and hand back the writer.
    pub fn into_inner(mut self) -> HalfGifResult<W> {
        self.finish()?;
        match self.state {
            SinkState::Finished(writer) => Ok(writer),
            _ => Err(HalfGifError::codec("GIF sink failed earlier, writer is gone")),
        }
    }
}

impl<W: Write> FrameSink for GifSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> HalfGifResult<()> {
        let width = to_u16(cfg.width, "output width")?;
        let height = to_u16(cfg.height, "output height")?;
        let writer = match std::mem::replace(&mut self.state, SinkState::Failed) {
            SinkState::Ready(writer) => writer,
            other => {
                self.state = other;
                return Err(HalfGifError::validation("GIF sink already started"));
            }
        };

        let global = cfg
            .global_palette
            .as_ref()
            .map(Palette::to_rgb_bytes)
            .unwrap_or_default();

        let mut encoder = gif::Encoder::new(writer, width, height, &global)
            .map_err(|e| HalfGifError::codec(format!("failed to write GIF header: {e}")))?;
        let repeat = match cfg.loop_count {
            None => gif::Repeat::Infinite,
            Some(n) => gif::Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| HalfGifError::codec(format!("failed to write loop extension: {e}")))?;

        self.state = SinkState::Encoding(encoder);
        Ok(())
    }

    fn push_frame(&mut self, frame: &OutputFrame) -> HalfGifResult<()> {
        let SinkState::Encoding(encoder) = &mut self.state else {
            return Err(HalfGifError::validation(
                "push_frame called outside begin/finish",
            ));
        };

        let out = gif::Frame {
            left: to_u16(frame.rect.left, "frame left")?,
            top: to_u16(frame.rect.top, "frame top")?,
            width: to_u16(frame.rect.width, "frame width")?,
            height: to_u16(frame.rect.height, "frame height")?,
            dispose: frame.disposal.into(),
            transparent: frame.transparent,
            delay: frame.delay,
            palette: frame.palette.as_ref().map(Palette::to_rgb_bytes),
            buffer: Cow::Borrowed(&frame.raster),
            ..Default::default()
        };
        encoder
            .write_frame(&out)
            .map_err(|e| HalfGifError::codec(format!("failed to write frame: {e}")))
    }

    fn finish(&mut self) -> HalfGifResult<()> {
        match std::mem::replace(&mut self.state, SinkState::Failed) {
            SinkState::Encoding(encoder) => {
                let mut writer = encoder
                    .into_inner()
                    .map_err(|e| HalfGifError::codec(format!("failed to finalize GIF: {e}")))?;
                writer
                    .flush()
                    .map_err(|e| HalfGifError::codec(format!("failed to flush output: {e}")))?;
                self.state = SinkState::Finished(writer);
            }
            SinkState::Ready(writer) | SinkState::Finished(writer) => {
                self.state = SinkState::Finished(writer);
            }
            SinkState::Failed => {}
        }
        Ok(())
    }
}

fn to_u16(v: u32, what: &str) -> HalfGifResult<u16> {
    u16::try_from(v)
        .map_err(|_| HalfGifError::validation(format!("{what} {v} does not fit a GIF u16 field")))
}

pub fn ensure_parent_dir(path: &Path) -> HalfGifResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/codec/gif_file.rs"]
mod tests;
