use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use objwire_frame::{FrameConfig, FrameError, FrameReader};
use objwire_transport::{TcpTransport, WireStream};

use crate::cmd::{parse_duration, ServeArgs};
use crate::exit::{frame_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ServeArgs, output: OutputFormat) -> CliResult<i32> {
    let read_timeout = args
        .read_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    let config = FrameConfig {
        read_timeout,
        ..FrameConfig::default()
    };

    let transport = TcpTransport::bind(&args.host, args.port)
        .map_err(|err| transport_error("bind failed", err))?;

    if args.once {
        let stream = transport
            .accept()
            .map_err(|err| transport_error("accept failed", err))?;
        handle_connection(stream, config, output)
            .map_err(|err| frame_error("receive failed", err))?;
        return Ok(SUCCESS);
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone(), wake_addr(transport.local_addr()))?;

    serve_until_stopped(&transport, &running, config, output)
}

/// Accept connections until `running` is cleared, one worker thread each.
///
/// The flag is checked after every accept, so clearing it must be followed by
/// a connection to the listener.
fn serve_until_stopped(
    transport: &TcpTransport,
    running: &AtomicBool,
    config: FrameConfig,
    output: OutputFormat,
) -> CliResult<i32> {
    loop {
        let stream = transport
            .accept()
            .map_err(|err| transport_error("accept failed", err))?;
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let config = config.clone();
        let spawned = std::thread::Builder::new()
            .name("objwire-conn".to_string())
            .spawn(move || {
                if let Err(err) = handle_connection(stream, config, output) {
                    tracing::warn!(error = %err, "connection ended with error");
                }
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed spawning connection worker");
        }
    }

    tracing::info!("shutting down");
    Ok(SUCCESS)
}

/// Receive and print messages until the peer closes the stream.
///
/// Returns the number of messages received.
fn handle_connection(
    stream: WireStream,
    config: FrameConfig,
    output: OutputFormat,
) -> Result<usize, FrameError> {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let mut reader = FrameReader::with_config_wire(stream, config)?;

    let mut received = 0usize;
    loop {
        match reader.receive() {
            Ok((format, value)) => {
                tracing::info!(%format, %peer, "received value");
                print_message(format, &value, &peer, output);
                received = received.saturating_add(1);
            }
            Err(FrameError::ConnectionClosed) => {
                tracing::debug!(%peer, received, "peer closed connection");
                return Ok(received);
            }
            Err(err) => return Err(err),
        }
    }
}

/// Address a local client can reach the listener on.
fn wake_addr(bound: SocketAddr) -> SocketAddr {
    let ip = match bound.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, bound.port())
}

fn install_ctrlc_handler(running: Arc<AtomicBool>, wake: SocketAddr) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
        // Unblock the pending accept.
        let _ = TcpStream::connect_timeout(&wake, Duration::from_secs(1));
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
