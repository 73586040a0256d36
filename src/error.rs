use std::io;

pub type RenderResult<T> = Result<T, RenderError>;

/// Failures of the rendering pipeline.
///
/// An unavailable terminal size is not an error: it falls back to
/// [`DEFAULT_TERMINAL_COLUMNS`](crate::shared::constants::DEFAULT_TERMINAL_COLUMNS).
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The source could not be opened or parsed. Only that source is skipped.
    #[error("cannot open {path}: {reason}")]
    SourceOpen { path: String, reason: String },

    /// Decoding failed mid-stream.
    #[error("decode error: {0}")]
    Decode(String),

    /// Writing to the terminal failed. Aborts the whole batch.
    #[error("output write failed: {0}")]
    OutputWrite(#[from] io::Error),
}

impl RenderError {
    pub fn source_open(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(reason: impl ToString) -> Self {
        Self::Decode(reason.to_string())
    }

    /// Whether the batch must stop instead of moving on to the next source.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutputWrite(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = RenderError::source_open("cat.png", "no such file");
        assert_eq!(err.to_string(), "cannot open cat.png: no such file");
        assert!(RenderError::decode("truncated").to_string().starts_with("decode error:"));
    }

    #[test]
    fn test_only_output_failures_are_fatal() {
        assert!(!RenderError::source_open("a", "b").is_fatal());
        assert!(!RenderError::decode("x").is_fatal());
        assert!(RenderError::from(io::Error::other("broken pipe")).is_fatal());
    }
}
