//! Markup codec.
//!
//! Values map onto an element tree under a `<root>` element:
//!
//! - a mapping becomes an element with one child per key, named by the key;
//! - a list becomes one `<item>` child per element;
//! - a scalar becomes a leaf whose text is its string form (null is empty).
//!
//! Decoding walks the tree back. A leaf's text is typed by [`infer_scalar`].
//! An element whose children are all `<item>` decodes as a list, anything else
//! with children decodes as a mapping. A mapping whose only keys are `item`
//! therefore comes back as a list, and null comes back as `""`.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Number};

use crate::codec::Codec;
use crate::error::{CodecError, Result};
use crate::format::Format;
use crate::Value;

/// Name of the document element.
pub const ROOT_TAG: &str = "root";

/// Name of the children that make up a list.
pub const ITEM_TAG: &str = "item";

/// XML tree codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(malformed)?;
        write_element(&mut writer, ROOT_TAG, value)?;
        Ok(writer.into_inner())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let mut reader = Reader::from_reader(bytes);
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Value> = None;

        loop {
            match reader.read_event().map_err(malformed)? {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(malformed("content after the root element"));
                    }
                    open.push(Element::new(element_name(start.name().as_ref())?));
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(malformed("content after the root element"));
                    }
                    let element = Element::new(element_name(start.name().as_ref())?);
                    close(&mut open, &mut root, element);
                }
                Event::End(_) => {
                    let element = open.pop().ok_or_else(|| malformed("unmatched end tag"))?;
                    close(&mut open, &mut root, element);
                }
                Event::Text(text) => match open.last_mut() {
                    Some(element) => element.text.push_str(&text.unescape().map_err(malformed)?),
                    None if text.iter().all(u8::is_ascii_whitespace) => {}
                    None => return Err(malformed("text outside the root element")),
                },
                Event::CData(data) => match open.last_mut() {
                    Some(element) => {
                        element
                            .text
                            .push_str(std::str::from_utf8(&data).map_err(malformed)?);
                    }
                    None => return Err(malformed("CDATA outside the root element")),
                },
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype.
                _ => {}
            }
        }

        if let Some(element) = open.last() {
            return Err(malformed(format!("unclosed element <{}>", element.name)));
        }
        root.ok_or_else(|| malformed("missing root element"))
    }
}

/// Type a leaf's text.
///
/// The checks run in a fixed order and the first match wins:
///
/// 1. `true` / `false` in any letter case → boolean;
/// 2. an integer (surrounding whitespace allowed) → integer;
/// 3. a finite float (surrounding whitespace allowed) → float;
/// 4. anything else → the text itself, so empty text is `""`.
pub fn infer_scalar(text: &str) -> Value {
    parse_bool(text)
        .or_else(|| parse_integer(text))
        .or_else(|| parse_float(text))
        .unwrap_or_else(|| Value::String(text.to_owned()))
}

fn parse_bool(text: &str) -> Option<Value> {
    if text.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if text.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

fn parse_integer(text: &str) -> Option<Value> {
    let text = numeric_text(text)?;
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<u64>().map(Value::from))
        .ok()
}

fn parse_float(text: &str) -> Option<Value> {
    let float = numeric_text(text)?.parse::<f64>().ok()?;
    Number::from_f64(float).map(Value::Number)
}

/// Trimmed numeric text with `_` digit separators removed.
///
/// A separator must sit between two ASCII digits; anything else is not a number.
fn numeric_text(text: &str) -> Option<Cow<'_, str>> {
    let text = text.trim();
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }

    let bytes = text.as_bytes();
    let mut digits = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        if ch != '_' {
            digits.push(ch);
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(Cow::Owned(digits))
}

/// String form of a scalar leaf. Containers reaching here are empty.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
        Value::Bool(true) => "True".to_owned(),
        Value::Bool(false) => "False".to_owned(),
        // `{:?}` keeps a fraction or exponent, so floats never read back as integers.
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => format!("{float:?}"),
            _ => number.to_string(),
        },
        Value::String(text) => text.clone(),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Object(map) if !map.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(malformed)?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(malformed)?;
        }
        Value::Array(items) if !items.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(malformed)?;
            for item in items {
                write_element(writer, ITEM_TAG, item)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(malformed)?;
        }
        scalar => {
            let text = scalar_text(scalar);
            if text.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(name)))
                    .map_err(malformed)?;
            } else {
                writer
                    .write_event(Event::Start(BytesStart::new(name)))
                    .map_err(malformed)?;
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(malformed)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(malformed)?;
            }
        }
    }
    Ok(())
}

/// An element still being read.
struct Element {
    name: String,
    text: String,
    children: Vec<(String, Value)>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn into_entry(self) -> (String, Value) {
        if self.children.is_empty() {
            let value = infer_scalar(&self.text);
            return (self.name, value);
        }

        let value = if self.children.iter().all(|(name, _)| name == ITEM_TAG) {
            Value::Array(self.children.into_iter().map(|(_, value)| value).collect())
        } else {
            let mut map = Map::new();
            for (name, value) in self.children {
                map.insert(name, value);
            }
            Value::Object(map)
        };
        (self.name, value)
    }
}

/// Attach a finished element to its parent, or make it the document value.
fn close(open: &mut [Element], root: &mut Option<Value>, element: Element) {
    let (name, value) = element.into_entry();
    match open.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None => *root = Some(value),
    }
}

fn element_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(malformed)
}

fn malformed(reason: impl ToString) -> CodecError {
    CodecError::malformed(Format::Xml, reason)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn roundtrip(value: &Value) -> Value {
        let bytes = XmlCodec.encode(value).unwrap();
        XmlCodec.decode(&bytes).unwrap()
    }

    fn decode_str(text: &str) -> Result<Value> {
        XmlCodec.decode(text.as_bytes())
    }

    #[test]
    fn sample_record_roundtrips() {
        let value = json!({
            "user": "alice",
            "score": 98,
            "skills": ["x", "y"],
            "active": true,
        });
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn nested_structure_roundtrips() {
        let value = json!({
            "team": {
                "name": "core",
                "members": [{"id": 1, "ratio": 0.5}, {"id": 2, "ratio": 1.0}],
            },
            "tags": [["a", "b"], ["c"]],
            "enabled": false,
        });
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn wire_shape() {
        let bytes = XmlCodec.encode(&json!({"a": [1, "x"]})).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.ends_with("<root><a><item>1</item><item>x</item></a></root>"));
    }

    #[test]
    fn booleans_written_capitalized() {
        let bytes = XmlCodec.encode(&json!(true)).unwrap();
        assert!(std::str::from_utf8(&bytes)
            .unwrap()
            .ends_with("<root>True</root>"));
    }

    #[test]
    fn null_decodes_as_empty_string() {
        assert_eq!(roundtrip(&Value::Null), json!(""));
        assert_eq!(roundtrip(&json!({"a": null, "b": 1})), json!({"a": "", "b": 1}));
    }

    #[test]
    fn float_without_fraction_stays_float() {
        let decoded = roundtrip(&json!(2.0));
        assert!(decoded.is_f64());
        assert_eq!(decoded, json!(2.0));

        let tiny = roundtrip(&json!(1.5e-9));
        assert_eq!(tiny, json!(1.5e-9));
    }

    #[test]
    fn text_is_escaped() {
        let value = json!({"expr": "a < b && c > \"d\""});
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn inference_order() {
        assert_eq!(infer_scalar("TRUE"), json!(true));
        assert_eq!(infer_scalar("False"), json!(false));
        assert_eq!(infer_scalar("42"), json!(42));
        assert_eq!(infer_scalar(" -7 "), json!(-7));
        assert_eq!(infer_scalar("18446744073709551615"), json!(u64::MAX));
        assert_eq!(infer_scalar("4.5"), json!(4.5));
        assert_eq!(infer_scalar("1e3"), json!(1000.0));
        assert_eq!(infer_scalar("abc"), json!("abc"));
        assert_eq!(infer_scalar(""), json!(""));
        assert_eq!(infer_scalar("inf"), json!("inf"));
        assert_eq!(infer_scalar(" true"), json!(" true"));
    }

    #[test]
    fn digit_separators_between_digits() {
        assert_eq!(infer_scalar("1_000"), json!(1000));
        assert_eq!(infer_scalar(" -2_500 "), json!(-2500));
        assert_eq!(infer_scalar("1_000.5"), json!(1000.5));
        assert_eq!(infer_scalar("1e1_0"), json!(1e10));
        assert_eq!(infer_scalar("_1"), json!("_1"));
        assert_eq!(infer_scalar("1_"), json!("1_"));
        assert_eq!(infer_scalar("1__0"), json!("1__0"));
        assert_eq!(infer_scalar("1_.5"), json!("1_.5"));
        assert_eq!(
            XmlCodec.decode(b"<root>1_000</root>").unwrap(),
            json!(1000)
        );
    }

    #[test]
    fn numeric_strings_are_retyped() {
        assert_eq!(roundtrip(&json!({"zip": "02134"})), json!({"zip": 2134}));
    }

    #[test]
    fn item_only_mapping_reads_as_list() {
        assert_eq!(roundtrip(&json!({"item": 5})), json!([5]));
    }

    #[test]
    fn mixed_children_read_as_mapping() {
        let decoded = decode_str("<root><item>1</item><x>2</x></root>").unwrap();
        assert_eq!(decoded, json!({"item": 1, "x": 2}));
    }

    #[test]
    fn repeated_tag_keeps_last_value() {
        let decoded = decode_str("<root><a>1</a><b>2</b><a>3</a></root>").unwrap();
        assert_eq!(decoded, json!({"a": 3, "b": 2}));
    }

    #[test]
    fn empty_containers_collapse() {
        assert_eq!(roundtrip(&json!([])), json!(""));
        assert_eq!(roundtrip(&json!({"list": [], "map": {}})), json!({"list": "", "map": ""}));
    }

    #[test]
    fn ignores_comments_and_whitespace_between_children() {
        let decoded =
            decode_str("<?xml version=\"1.0\"?>\n<root>\n  <!-- note -->\n  <a>1</a>\n</root>\n")
                .unwrap();
        assert_eq!(decoded, json!({"a": 1}));
    }

    #[test]
    fn cdata_is_text() {
        let decoded = decode_str("<root><![CDATA[x < y]]></root>").unwrap();
        assert_eq!(decoded, json!("x < y"));
    }

    #[test]
    fn malformed_documents_rejected() {
        for doc in [
            "",
            "<root>",
            "<root><a></root>",
            "<a/><b/>",
            "<root>1</root>trailing",
            "</root>",
        ] {
            let err = decode_str(doc).unwrap_err();
            assert!(
                matches!(
                    err,
                    CodecError::MalformedPayload {
                        format: Format::Xml,
                        ..
                    }
                ),
                "expected malformed payload for {doc:?}"
            );
        }
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert!(XmlCodec.decode(b"<root>\xFF</root>").is_err());
    }
}
