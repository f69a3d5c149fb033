use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Error {
    #[error("Integer {value} does not fit any of the byte widths {widths:?}")]
    IntegerRangeExceeded { value: String, widths: Vec<usize> },
    #[error("No encoding defined for kind: {0}")]
    UnsupportedKind(String),
    #[error("Unknown variant tag {tag:?} at {path}")]
    UnknownVariantTag { path: String, tag: String },
    #[error("Malformed response at {path}: {reason}")]
    MalformedResponse { path: String, reason: String },
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("Unrecognized key prefix: {0:?}")]
    InvalidKeyPrefix(String),
    #[error("Decoding error: early end of stream")]
    EarlyEndOfStream,
    #[error("Decoding error: {0} left-over bytes")]
    LeftOverBytes(usize),
    #[error("Decoding error: {0}")]
    Formatting(String),
    #[error("Failed to parse Hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("Transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedResponse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_tag(path: impl Into<String>, tag: impl Into<String>) -> Self {
        Error::UnknownVariantTag {
            path: path.into(),
            tag: tag.into(),
        }
    }
}
