use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::foundation::error::{HalfGifError, HalfGifResult};

/// How the canvas is initialized before the first frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    /// Use the logical screen's background color when the file declares one, else transparent.
    #[default]
    Screen,
    /// Always start from a fully transparent canvas.
    Transparent,
}

/// Options for [`crate::transcode`] and [`crate::transcode_frames`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscodeOpts {
    pub background: BackgroundMode,
    /// Honor `RestorePrevious` disposal by snapshotting the canvas.
    pub restore_previous: bool,
    /// Run the downsample/quantize pass on a rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Largest accepted `width * height` of the input logical screen.
    pub max_canvas_pixels: u64,
    /// Copy per-frame delays to the output.
    pub keep_delays: bool,
    /// `None` loops forever.
    pub loop_count: Option<u16>,
}

impl Default for TranscodeOpts {
    fn default() -> Self {
        Self {
            background: BackgroundMode::Screen,
            restore_previous: false,
            parallel: false,
            threads: None,
            // 4096 x 4096
            max_canvas_pixels: 16 * 1024 * 1024,
            keep_delays: true,
            loop_count: None,
        }
    }
}

impl TranscodeOpts {
    pub fn validate(&self) -> HalfGifResult<()> {
        if self.max_canvas_pixels == 0 {
            return Err(HalfGifError::validation("max_canvas_pixels must be > 0"));
        }
        if self.threads == Some(0) {
            return Err(HalfGifError::validation(
                "'threads' must be >= 1 when set",
            ));
        }
        if self.threads.is_some() && !self.parallel {
            return Err(HalfGifError::validation(
                "'threads' only applies when 'parallel' is enabled",
            ));
        }
        Ok(())
    }

    /// Load options from a JSON document. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> HalfGifResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open transcode options '{}'", path.display()))?;
        let opts: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse transcode options '{}'", path.display()))?;
        opts.validate()?;
        Ok(opts)
    }
}
