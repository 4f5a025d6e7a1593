use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::format::Format;
use crate::Value;

/// MessagePack codec.
///
/// Integers and floats keep their distinct MessagePack types, so every value
/// round-trips exactly.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackCodec;

impl Codec for MsgPackCodec {
    fn format(&self) -> Format {
        Format::MsgPack
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        rmp_serde::to_vec(value).map_err(|err| CodecError::malformed(Format::MsgPack, err))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        rmp_serde::from_slice(bytes).map_err(|err| CodecError::malformed(Format::MsgPack, err))
    }
}
