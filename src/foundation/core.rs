use crate::foundation::color::Argb;

/// Placement of a frame inside the logical screen, in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Number of pixels covered, `None` on overflow.
    pub fn area(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Intersect with a `width x height` screen anchored at the origin.
    ///
    /// Returns `None` when nothing of the rectangle lies on the screen.
    pub fn clip_to(self, width: u32, height: u32) -> Option<FrameRect> {
        if self.left >= width || self.top >= height {
            return None;
        }
        let right = self.left.saturating_add(self.width).min(width);
        let bottom = self.top.saturating_add(self.height).min(height);
        if right == self.left || bottom == self.top {
            return None;
        }
        Some(FrameRect::new(
            self.left,
            self.top,
            right - self.left,
            bottom - self.top,
        ))
    }

    /// `true` when the rectangle lies entirely on a `width x height` screen.
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        u64::from(self.left) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.top) + u64::from(self.height) <= u64::from(height)
    }
}

/// What happens to a frame's region once its display time elapses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisposalMode {
    /// No disposal specified; the canvas is left as is.
    #[default]
    Unspecified,
    /// Leave the frame in place; the next frame draws on top of it.
    DoNotDispose,
    /// Clear the frame's rectangle before the next frame is drawn.
    RestoreBackground,
    /// Restore the canvas to what it was before this frame was drawn.
    RestorePrevious,
}

impl From<gif::DisposalMethod> for DisposalMode {
    fn from(value: gif::DisposalMethod) -> Self {
        match value {
            gif::DisposalMethod::Any => Self::Unspecified,
            gif::DisposalMethod::Keep => Self::DoNotDispose,
            gif::DisposalMethod::Background => Self::RestoreBackground,
            gif::DisposalMethod::Previous => Self::RestorePrevious,
        }
    }
}

impl From<DisposalMode> for gif::DisposalMethod {
    fn from(value: DisposalMode) -> Self {
        match value {
            DisposalMode::Unspecified => Self::Any,
            DisposalMode::DoNotDispose => Self::Keep,
            DisposalMode::RestoreBackground => Self::Background,
            DisposalMode::RestorePrevious => Self::Previous,
        }
    }
}

/// Logical screen of an input GIF.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    /// Resolved background color, if the file declares one that maps into its global palette.
    pub background: Option<Argb>,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
