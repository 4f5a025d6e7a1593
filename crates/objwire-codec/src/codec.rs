use crate::error::Result;
use crate::format::Format;
use crate::Value;

/// Converts structured values to and from payload bytes for one format.
///
/// Implementations are stateless; obtain one with [`Format::codec`].
pub trait Codec: Send + Sync {
    /// The format this codec implements.
    fn format(&self) -> Format;

    /// Encode a value into payload bytes.
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decode payload bytes into a value.
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}
