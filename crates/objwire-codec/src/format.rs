//! Payload format tags.
//!
//! The tag travels as the first header byte. Assignments are fixed:
//! 0 = MessagePack, 1 = JSON, 2 = XML.

use std::fmt;

use crate::codec::Codec;
use crate::error::CodecError;
use crate::json::JsonCodec;
use crate::msgpack::MsgPackCodec;
use crate::xml::XmlCodec;

/// Wire format of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Format {
    /// Self-describing binary encoding.
    MsgPack = 0,
    /// Compact UTF-8 JSON.
    Json = 1,
    /// Markup tree rooted at `<root>`.
    Xml = 2,
}

impl Format {
    /// Every known format, in tag order.
    pub const ALL: [Format; 3] = [Format::MsgPack, Format::Json, Format::Xml];

    /// The tag byte written to the frame header.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Format::MsgPack => "msgpack",
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }

    /// The codec implementing this format.
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Format::MsgPack => &MsgPackCodec,
            Format::Json => &JsonCodec,
            Format::Xml => &XmlCodec,
        }
    }
}

impl TryFrom<u8> for Format {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Format::MsgPack),
            1 => Ok(Format::Json),
            2 => Ok(Format::Xml),
            other => Err(CodecError::UnsupportedFormat(other)),
        }
    }
}

impl From<Format> for u8 {
    fn from(format: Format) -> Self {
        format.tag()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_fixed() {
        assert_eq!(Format::MsgPack.tag(), 0);
        assert_eq!(Format::Json.tag(), 1);
        assert_eq!(Format::Xml.tag(), 2);
    }

    #[test]
    fn tag_roundtrip() {
        for format in Format::ALL {
            assert_eq!(Format::try_from(format.tag()).unwrap(), format);
        }
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = Format::try_from(99).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat(99)));
        assert!(Format::try_from(3).is_err());
    }

    #[test]
    fn codec_matches_format() {
        for format in Format::ALL {
            assert_eq!(format.codec().format(), format);
        }
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Format::Xml.to_string(), "xml");
        assert_eq!(Format::MsgPack.to_string(), "msgpack");
    }
}
