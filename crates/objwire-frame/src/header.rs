use bytes::{BufMut, Bytes, BytesMut};
use objwire_codec::Format;

use crate::error::{FrameError, Result};

/// Byte layout of the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Total header size in bytes.
    pub size: usize,
    /// Offset of the format tag byte.
    pub tag_offset: usize,
    /// Offset of the big-endian `u32` payload length.
    pub length_offset: usize,
}

/// The header layout: tag (1) + length (4) = 5 bytes.
pub const HEADER: HeaderLayout = HeaderLayout {
    size: 5,
    tag_offset: 0,
    length_offset: 1,
};

/// Frame header size in bytes.
pub const HEADER_SIZE: usize = HEADER.size;

/// Largest payload the length field can describe.
pub const MAX_PAYLOAD: usize = u32::MAX as usize;

/// A parsed frame header.
///
/// The tag is kept raw; [`FrameHeader::format`] validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub tag: u8,
    pub length: u32,
}

impl FrameHeader {
    /// Parse a header from its wire bytes.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        let tag = bytes[HEADER.tag_offset];
        let mut length = [0u8; 4];
        length.copy_from_slice(&bytes[HEADER.length_offset..HEADER.length_offset + 4]);
        Self {
            tag,
            length: u32::from_be_bytes(length),
        }
    }

    /// Serialize the header to its wire bytes.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[HEADER.tag_offset] = self.tag;
        bytes[HEADER.length_offset..HEADER.length_offset + 4]
            .copy_from_slice(&self.length.to_be_bytes());
        bytes
    }

    /// The payload format, if the tag is known.
    pub fn format(&self) -> Result<Format> {
        Format::try_from(self.tag).map_err(FrameError::from)
    }
}

/// A received message before decoding: format plus raw payload.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Format named by the header.
    pub format: Format,
    /// The payload bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(format: Format, payload: impl Into<Bytes>) -> Self {
        Self {
            format,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬─────────────┬──────────────────┐
/// │ Tag (1B) │ Length (4B) │ Payload          │
/// │ 0/1/2    │ big-endian  │ (Length bytes)   │
/// └──────────┴─────────────┴──────────────────┘
/// ```
pub fn encode_frame(format: Format, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let length = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD,
    })?;
    let header = FrameHeader {
        tag: format.tag(),
        length,
    };
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&header.encode());
    dst.put_slice(payload);
    Ok(())
}

/// Configuration for frame readers and writers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: the full 32-bit length range.
    pub max_payload_size: usize,
    /// Read timeout applied to TCP streams.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout applied to TCP streams.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
