use std::collections::VecDeque;

use crate::codec::sink::{FrameSink, OutputFrame, SinkConfig};
use crate::codec::source::{FrameRecord, FrameSource};
use crate::foundation::core::ScreenInfo;
use crate::foundation::error::{HalfGifError, HalfGifResult};
use crate::palette::Palette;

/// In-memory source for tests and debugging.
#[derive(Debug)]
pub struct InMemorySource {
    screen: ScreenInfo,
    global: Option<Palette>,
    frames: VecDeque<FrameRecord>,
}

impl InMemorySource {
    pub fn new(screen: ScreenInfo, global: Option<Palette>, frames: Vec<FrameRecord>) -> Self {
        Self {
            screen,
            global,
            frames: frames.into(),
        }
    }
}

impl FrameSource for InMemorySource {
    fn screen(&self) -> ScreenInfo {
        self.screen
    }

    fn global_palette(&self) -> Option<&Palette> {
        self.global.as_ref()
    }

    fn next_frame(&mut self) -> HalfGifResult<Option<FrameRecord>> {
        Ok(self.frames.pop_front())
    }

    fn close(&mut self) {
        self.frames.clear();
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<OutputFrame>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames in display order.
    pub fn frames(&self) -> &[OutputFrame] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> HalfGifResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &OutputFrame) -> HalfGifResult<()> {
        if self.cfg.is_none() || self.finished {
            return Err(HalfGifError::validation(
                "push_frame called outside begin/finish",
            ));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> HalfGifResult<()> {
        self.finished = true;
        Ok(())
    }
}
