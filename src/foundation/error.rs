pub type HalfGifResult<T> = Result<T, HalfGifError>;

#[derive(thiserror::Error, Debug)]
pub enum HalfGifError {
    #[error("open error: {0}")]
    Open(String),

    #[error("corrupt frame {frame}: {reason}")]
    Corrupt { frame: usize, reason: String },

    #[error("resource error: {0}")]
    Resource(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HalfGifError {
    pub fn open(msg: impl Into<String>) -> Self {
        Self::Open(msg.into())
    }

    pub fn corrupt(frame: usize, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            frame,
            reason: reason.into(),
        }
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Re-tag a frame-local corruption error with the frame it happened in.
    ///
    /// Components below the orchestrator do not know the frame index and report `0`.
    pub fn at_frame(self, index: usize) -> Self {
        match self {
            Self::Corrupt { reason, .. } => Self::Corrupt {
                frame: index,
                reason,
            },
            other => other,
        }
    }
}
