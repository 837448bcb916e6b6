use std::path::PathBuf;

/// Convenience result type used across frameseq.
pub type SeqResult<T> = Result<T, SeqError>;

/// Top-level error taxonomy used by the node APIs.
#[derive(thiserror::Error, Debug)]
pub enum SeqError {
    /// Invalid user-provided node inputs (batch size, tensor shape, prefix).
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes that could not be decoded or encoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// Errors when serializing metadata payloads.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failure tied to a concrete path.
    #[error("io error at '{}': {source}", path.display())]
    Io {
        /// Path that was being read, written or created.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SeqError {
    /// Build a [`SeqError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SeqError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`SeqError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SeqError::Io`] value for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error is an IO error of kind `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
