use crate::format::Format;

/// Errors that can occur while encoding or decoding a payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The format tag is not one of the known formats.
    #[error("unsupported format tag {0}")]
    UnsupportedFormat(u8),

    /// The payload bytes do not parse under the claimed format.
    #[error("malformed {format} payload: {reason}")]
    MalformedPayload { format: Format, reason: String },
}

impl CodecError {
    pub(crate) fn malformed(format: Format, reason: impl ToString) -> Self {
        Self::MalformedPayload {
            format,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
