use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use objwire_codec::{Format, Value};
use objwire_transport::WireStream;
use tracing::debug;

use crate::error::{FrameError, Result};
use crate::header::{encode_frame, FrameConfig, MAX_PAYLOAD};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete messages to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode a value and send it as one frame (blocking).
    ///
    /// Returns the number of bytes written (header + payload).
    pub fn send(&mut self, value: &Value, format: Format) -> Result<usize> {
        let payload = objwire_codec::encode(value, format)?;
        let written = self.write_frame(format, &payload)?;
        debug!(%format, size = payload.len(), "sent message");
        Ok(written)
    }

    /// Write an already-encoded payload as one frame (blocking).
    ///
    /// Returns the number of bytes written (header + payload).
    pub fn write_frame(&mut self, format: Format, payload: &[u8]) -> Result<usize> {
        let max = self.config.max_payload_size.min(MAX_PAYLOAD);
        if payload.len() > max {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max,
            });
        }

        self.buf.clear();
        encode_frame(format, payload, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => {
                    return Err(FrameError::ConnectionError(std::io::Error::new(
                        ErrorKind::WriteZero,
                        format!(
                            "stream accepted no bytes after {offset} of {}",
                            self.buf.len()
                        ),
                    )))
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::ConnectionError(err)),
            }
        }

        self.flush()?;
        Ok(offset)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::ConnectionError(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frames.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameWriter<WireStream> {
    /// Create a frame writer for `WireStream` and apply write timeout from config.
    pub fn with_config_wire(inner: WireStream, config: FrameConfig) -> Result<Self> {
        inner.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}
