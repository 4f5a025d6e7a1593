use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use objwire_codec::{Format, Value};
use objwire_transport::WireStream;
use tracing::debug;

use crate::error::{FrameError, Result};
use crate::header::{Frame, FrameConfig, FrameHeader, HEADER_SIZE};

const INITIAL_BUFFER_CAPACITY: usize = 64 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete messages from any `Read` stream.
///
/// Handles partial reads internally. Each call consumes exactly one frame and
/// never reads past its declared payload, so later messages stay in the stream.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read and decode the next message (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when the stream ends before
    /// the first header byte.
    pub fn receive(&mut self) -> Result<(Format, Value)> {
        let frame = self.read_frame()?;
        let value = objwire_codec::decode(frame.payload.as_ref(), frame.format)?;
        debug!(
            format = %frame.format,
            size = frame.payload.len(),
            "received message"
        );
        Ok((frame.format, value))
    }

    /// Read the next frame without decoding its payload (blocking).
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut header = BytesMut::with_capacity(HEADER_SIZE);
        match self.fill(&mut header, HEADER_SIZE)? {
            0 => return Err(FrameError::ConnectionClosed),
            HEADER_SIZE => {}
            got => return Err(truncated("header", HEADER_SIZE, got)),
        }

        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&header);
        let header = FrameHeader::decode(&raw);

        let length = header.length as usize;
        if length > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: length,
                max: self.config.max_payload_size,
            });
        }

        let mut payload = BytesMut::with_capacity(length.min(INITIAL_BUFFER_CAPACITY));
        let got = self.fill(&mut payload, length)?;
        if got < length {
            return Err(truncated("payload", length, got));
        }

        let format = header.format()?;
        Ok(Frame {
            format,
            payload: payload.freeze(),
        })
    }

    /// Read until `dst` holds `want` bytes or the stream ends.
    ///
    /// Returns the number of bytes accumulated.
    fn fill(&mut self, dst: &mut BytesMut, want: usize) -> Result<usize> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while dst.len() < want {
            let limit = (want - dst.len()).min(READ_CHUNK_SIZE);
            let read = match self.inner.read(&mut chunk[..limit]) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::ConnectionError(err)),
            };

            if read == 0 {
                break;
            }

            dst.extend_from_slice(&chunk[..read]);
        }
        Ok(dst.len())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frames.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<WireStream> {
    /// Create a frame reader for `WireStream` and apply read timeout from config.
    pub fn with_config_wire(inner: WireStream, config: FrameConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

fn truncated(section: &str, expected: usize, got: usize) -> FrameError {
    FrameError::ConnectionError(std::io::Error::new(
        ErrorKind::UnexpectedEof,
        format!("truncated {section}: stream ended after {got} of {expected} bytes"),
    ))
}
