//! Point-to-point exchange of structured values over a byte stream.
//!
//! A value is encoded as MessagePack, JSON or XML, prefixed with a 5-byte
//! header (format tag + big-endian length), and written to a stream. The
//! receiver reads exactly one frame and decodes it back.
//!
//! # Crate Structure
//!
//! - [`codec`]: Value ⇄ payload bytes for each format
//! - [`frame`]: Header layout, frame reader and writer
//! - [`transport`]: TCP listener and stream wrapper
//!
//! ```no_run
//! use objwire::{receive, send, transport::TcpTransport, Format, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut stream = TcpTransport::connect("127.0.0.1", 5000, None)?;
//! let value: Value = serde_json::json!({"user": "alice", "score": 98});
//! send(&mut stream, &value, Format::Xml)?;
//! let (_format, _reply) = receive(&mut stream)?;
//! # Ok(())
//! # }
//! ```

/// Re-export codec types.
pub mod codec {
    pub use objwire_codec::*;
}

/// Re-export frame types.
pub mod frame {
    pub use objwire_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use objwire_transport::*;
}

pub use objwire_codec::{Format, Value};
pub use objwire_frame::{receive, send, FrameError};
