use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::WireStream;

/// TCP listener transport.
///
/// Port 0 binds an ephemeral port; read it back with [`local_addr`](Self::local_addr).
pub struct TcpTransport {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpTransport {
    /// Bind and listen on `host:port`.
    pub fn bind(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind((host, port)).map_err(|e| TransportError::Bind {
            addr: addr.clone(),
            source: e,
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| TransportError::Bind { addr, source: e })?;

        info!(%local_addr, "listening on tcp");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<WireStream> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(%peer, "accepted connection");
        Ok(WireStream::from(stream))
    }

    /// Connect to a listening endpoint (blocking).
    ///
    /// With a timeout, each resolved address is tried in turn and the timeout
    /// also becomes the stream's read and write timeout.
    pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<WireStream> {
        let addr = format!("{host}:{port}");
        let connect_err = |source| TransportError::Connect {
            addr: addr.clone(),
            source,
        };

        let stream = match timeout {
            None => TcpStream::connect((host, port)).map_err(connect_err)?,
            Some(timeout) => {
                let mut last_err = None;
                let mut connected = None;
                for candidate in (host, port).to_socket_addrs().map_err(connect_err)? {
                    match TcpStream::connect_timeout(&candidate, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(err) => last_err = Some(err),
                    }
                }
                let stream = connected.ok_or_else(|| {
                    connect_err(last_err.unwrap_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "host resolved to no addresses",
                        )
                    }))
                })?;
                stream.set_read_timeout(Some(timeout))?;
                stream.set_write_timeout(Some(timeout))?;
                stream
            }
        };

        debug!(%addr, "connected over tcp");
        Ok(WireStream::from(stream))
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
