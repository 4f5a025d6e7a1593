//! Structured value codecs for objwire.
//!
//! A [`Value`] (null, boolean, integer, float, string, list, or ordered
//! mapping) is converted to payload bytes in one of three formats selected by
//! a [`Format`] tag:
//!
//! - [`Format::MsgPack`]: MessagePack, exact round-trip
//! - [`Format::Json`]: compact JSON, exact round-trip
//! - [`Format::Xml`]: element tree, lossy for nulls and some shapes (see [`xml`])
//!
//! This crate does no I/O. Framing lives in `objwire-frame`.

pub mod codec;
pub mod error;
pub mod format;
pub mod json;
pub mod msgpack;
pub mod xml;

pub use codec::Codec;
pub use error::{CodecError, Result};
pub use format::Format;
pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
pub use xml::XmlCodec;

/// The structured value carried by every message.
pub use serde_json::Value;

/// Encode a value in the given format.
pub fn encode(value: &Value, format: Format) -> Result<Vec<u8>> {
    let bytes = format.codec().encode(value)?;
    tracing::trace!(%format, size = bytes.len(), "encoded payload");
    Ok(bytes)
}

/// Decode payload bytes in the given format.
pub fn decode(bytes: &[u8], format: Format) -> Result<Value> {
    tracing::trace!(%format, size = bytes.len(), "decoding payload");
    format.codec().decode(bytes)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({"user": "alice", "score": 98, "skills": ["x", "y"], "active": true})
    }

    #[test]
    fn every_format_roundtrips_sample() {
        for format in Format::ALL {
            let bytes = encode(&sample(), format).unwrap();
            assert_eq!(decode(&bytes, format).unwrap(), sample(), "format {format}");
        }
    }

    #[test]
    fn exact_formats_roundtrip_all_scalar_kinds() {
        let value = json!({
            "null": null,
            "bool": true,
            "neg": -3,
            "pos": 7,
            "float": 7.0,
            "text": "",
            "list": [null, [], {}],
            "map": {"item": {"item": 1}},
        });
        for format in [Format::MsgPack, Format::Json] {
            let bytes = encode(&value, format).unwrap();
            assert_eq!(decode(&bytes, format).unwrap(), value, "format {format}");
        }
    }

    #[test]
    fn cross_format_decode_fails() {
        let bytes = encode(&sample(), Format::MsgPack).unwrap();
        assert!(matches!(
            decode(&bytes, Format::Json),
            Err(CodecError::MalformedPayload { .. })
        ));
    }
}
