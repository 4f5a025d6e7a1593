use std::fs;

use objwire_codec::{Format, Value};
use objwire_frame::FrameWriter;
use objwire_transport::TcpTransport;
use serde_json::json;

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{
    frame_error, io_error, transport_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE,
};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let value = resolve_value(&args)?;
    let format = Format::from(args.format);

    let stream = TcpTransport::connect(&args.host, args.port, Some(timeout))
        .map_err(|err| transport_error("connect failed", err))?;

    let mut writer = FrameWriter::new(stream);
    let written = writer
        .send(&value, format)
        .map_err(|err| frame_error("send failed", err))?;

    tracing::info!(
        %format,
        host = %args.host,
        port = args.port,
        bytes = written,
        "sent value"
    );

    Ok(SUCCESS)
}

/// The record sent when no value is given.
pub fn sample_value() -> Value {
    json!({
        "user": "alice",
        "score": 98,
        "skills": ["Rust", "Networking", "JSON/XML"],
        "active": true,
    })
}

fn resolve_value(args: &SendArgs) -> CliResult<Value> {
    if let Some(text) = &args.json {
        return serde_json::from_str(text)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(path) = &args.file {
        let bytes = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return serde_json::from_slice(&bytes).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("{} is not valid JSON: {err}", path.display()),
            )
        });
    }
    Ok(sample_value())
}
