//! TCP transport for objwire.
//!
//! The framing layer works over any `Read + Write` stream. This crate supplies
//! the one the CLI uses: a [`WireStream`] over TCP, plus [`TcpTransport`] for
//! bind/accept/connect.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::WireStream;
pub use tcp::TcpTransport;
