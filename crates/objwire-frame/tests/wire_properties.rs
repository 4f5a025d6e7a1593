use std::io::{Cursor, ErrorKind, Read};

use objwire_frame::{receive, send, Format, FrameError, FrameReader, Value, HEADER_SIZE};
use serde_json::json;

/// Delivers the wire bytes in fixed-size chunks, then reports end-of-stream.
struct ChunkedReader {
    bytes: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.bytes.len() - self.pos;
        let n = remaining.min(buf.len()).min(self.chunk);
        buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn sample() -> Value {
    json!({"user": "alice", "score": 98, "skills": ["x", "y"], "active": true})
}

fn wire(value: &Value, format: Format) -> Vec<u8> {
    let mut out = Vec::new();
    send(&mut out, value, format).unwrap();
    out
}

#[test]
fn chunked_delivery_reconstructs_every_format() {
    for format in Format::ALL {
        let bytes = wire(&sample(), format);
        for chunk in 1..=7 {
            let mut reader = FrameReader::new(ChunkedReader {
                bytes: bytes.clone(),
                pos: 0,
                chunk,
            });
            let (got_format, value) = reader.receive().unwrap();
            assert_eq!(got_format, format, "chunk size {chunk}");
            assert_eq!(value, sample(), "chunk size {chunk}");
        }
    }
}

#[test]
fn pipelined_messages_over_chunked_stream() {
    let mut bytes = wire(&json!({"seq": 1}), Format::Json);
    bytes.extend(wire(&json!({"seq": 2}), Format::MsgPack));
    bytes.extend(wire(&json!({"seq": 3}), Format::Xml));

    let mut stream = ChunkedReader {
        bytes,
        pos: 0,
        chunk: 3,
    };
    for (seq, format) in [(1, Format::Json), (2, Format::MsgPack), (3, Format::Xml)] {
        assert_eq!(receive(&mut stream).unwrap(), (format, json!({"seq": seq})));
    }
    assert!(matches!(
        receive(&mut stream).unwrap_err(),
        FrameError::ConnectionClosed
    ));
}

#[test]
fn every_truncation_point_is_classified() {
    let bytes = wire(&sample(), Format::Json);
    for cut in 0..bytes.len() {
        let err = receive(&mut Cursor::new(bytes[..cut].to_vec())).unwrap_err();
        if cut == 0 {
            assert!(matches!(err, FrameError::ConnectionClosed));
        } else {
            assert!(
                matches!(err, FrameError::ConnectionError(ref e) if e.kind() == ErrorKind::UnexpectedEof),
                "cut at {cut} of {} gave {err:?}",
                bytes.len()
            );
        }
    }
}

#[test]
fn header_matches_payload() {
    for format in Format::ALL {
        let payload = objwire_codec::encode(&sample(), format).unwrap();
        let bytes = wire(&sample(), format);

        assert_eq!(bytes.len(), HEADER_SIZE + payload.len());
        assert_eq!(bytes[0], format.tag());
        assert_eq!(&bytes[1..5], &(payload.len() as u32).to_be_bytes());
    }
}

#[test]
fn unknown_tag_after_valid_message() {
    let mut bytes = wire(&json!("first"), Format::Json);
    bytes.extend_from_slice(&[99, 0, 0, 0, 0]);

    let mut stream = Cursor::new(bytes);
    assert_eq!(receive(&mut stream).unwrap().1, json!("first"));
    assert!(matches!(
        receive(&mut stream).unwrap_err(),
        FrameError::UnsupportedFormat(99)
    ));
}

#[test]
fn xml_restricted_domain_roundtrips() {
    let value = json!({
        "name": "widget",
        "dims": {"w": 2, "h": 3.5},
        "tags": ["a", "b", "c"],
        "matrix": [[1, 2], [3, 4]],
        "ok": false,
    });
    let (_, decoded) = receive(&mut Cursor::new(wire(&value, Format::Xml))).unwrap();
    assert_eq!(decoded, value);
}
