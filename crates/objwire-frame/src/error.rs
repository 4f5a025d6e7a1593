use objwire_codec::{CodecError, Format};
use objwire_transport::TransportError;

/// Errors that can occur while sending or receiving a message.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The header carries a format tag no codec handles.
    #[error("unsupported format tag {0}")]
    UnsupportedFormat(u8),

    /// The payload does not parse under the format named in the header.
    #[error("malformed {format} payload: {reason}")]
    MalformedPayload { format: Format, reason: String },

    /// The stream ended cleanly before any byte of a new message arrived.
    #[error("connection closed")]
    ConnectionClosed,

    /// Any other I/O failure, including truncated reads, zero-length writes,
    /// and timeouts.
    #[error("connection error: {0}")]
    ConnectionError(#[from] std::io::Error),

    /// The payload does not fit the 4-byte length field or the configured limit.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

impl From<CodecError> for FrameError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnsupportedFormat(tag) => FrameError::UnsupportedFormat(tag),
            CodecError::MalformedPayload { format, reason } => {
                FrameError::MalformedPayload { format, reason }
            }
        }
    }
}

impl From<TransportError> for FrameError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Io(io) | TransportError::Accept(io) => FrameError::ConnectionError(io),
            TransportError::Bind { source, .. } | TransportError::Connect { source, .. } => {
                FrameError::ConnectionError(source)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
