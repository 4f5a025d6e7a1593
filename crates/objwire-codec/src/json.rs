use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::format::Format;
use crate::Value;

/// Compact JSON codec. Key order is preserved and non-ASCII text is written
/// unescaped.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|err| CodecError::malformed(Format::Json, err))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes).map_err(|err| CodecError::malformed(Format::Json, err))
    }
}
