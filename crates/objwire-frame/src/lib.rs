//! Tagged, length-prefixed message framing for objwire.
//!
//! Every message is framed with:
//! - A 1-byte format tag (0 = MessagePack, 1 = JSON, 2 = XML)
//! - A 4-byte big-endian payload length
//!
//! followed by the payload. Readers consume exactly one frame per call and
//! handle partial reads; writers handle partial writes.

pub mod error;
pub mod header;
pub mod reader;
pub mod writer;

use std::io::{Read, Write};

pub use error::{FrameError, Result};
pub use header::{
    encode_frame, Frame, FrameConfig, FrameHeader, HeaderLayout, HEADER, HEADER_SIZE, MAX_PAYLOAD,
};
pub use objwire_codec::{Format, Value};
pub use reader::FrameReader;
pub use writer::FrameWriter;

/// Encode `value` in `format` and write it to `stream` as one frame.
///
/// Returns the number of bytes written.
pub fn send<W: Write>(stream: &mut W, value: &Value, format: Format) -> Result<usize> {
    FrameWriter::new(stream).send(value, format)
}

/// Read one frame from `stream` and decode it.
pub fn receive<R: Read>(stream: &mut R) -> Result<(Format, Value)> {
    FrameReader::new(stream).receive()
}
