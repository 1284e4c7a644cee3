//! Content-type driven decoding of response bodies.

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::transport::HttpResponse;

use super::DecodeError;

/// Key holding an element's attributes in converted XML.
pub const XML_ATTRIBUTES_KEY: &str = "@attributes";

/// Key holding an element's text when it also has attributes or children.
pub const XML_TEXT_KEY: &str = "#text";

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Unwrapped {
    /// Structured data decoded from a JSON or XML body
    Json(Value),
    /// The body as text
    Text(String),
    /// A body that is neither JSON, XML nor UTF-8 text, unmodified
    Bytes(Vec<u8>),
}

impl Unwrapped {
    /// Returns the structured value, if the body was JSON or XML.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) | Self::Bytes(_) => None,
        }
    }

    /// Returns the text, if the body was neither JSON nor XML.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) | Self::Bytes(_) => None,
        }
    }

    /// Returns the raw body, if it was not valid UTF-8 text.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Json(_) | Self::Text(_) => None,
        }
    }

    /// Converts into a JSON value; text becomes a JSON string and raw
    /// bytes a lossily decoded one.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
            Self::Bytes(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

/// Decodes a response body according to its `Content-Type`.
///
/// The content type is matched case-insensitively:
/// - containing `json` or `javascript`: parsed as JSON
/// - otherwise containing `xml`: parsed as XML and converted to a JSON
///   value (see [`xml_to_json`])
/// - anything else, including a missing header: the body as text, or the
///   bytes unchanged when they are not UTF-8
///
/// # Errors
///
/// Returns [`DecodeError`] if a JSON or XML body is malformed.
pub fn unwrap_response(response: &HttpResponse) -> Result<Unwrapped, DecodeError> {
    let content_type = response
        .header_line(http::header::CONTENT_TYPE)
        .to_ascii_lowercase();

    if content_type.contains("json") || content_type.contains("javascript") {
        return Ok(Unwrapped::Json(serde_json::from_slice(&response.body)?));
    }

    if content_type.contains("xml") {
        return Ok(Unwrapped::Json(xml_to_json(&response.body)?));
    }

    Ok(match String::from_utf8(response.body.clone()) {
        Ok(text) => Unwrapped::Text(text),
        Err(e) => Unwrapped::Bytes(e.into_bytes()),
    })
}

/// Element under construction.
#[derive(Default)]
struct Node {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Node {
    fn open(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self, DecodeError> {
        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(xml_error)?;
            let key = decoder.decode(attribute.key.as_ref()).map_err(xml_error)?;
            let value = attribute
                .decode_and_unescape_value(decoder)
                .map_err(xml_error)?;
            attributes.insert(key.into_owned(), Value::String(value.into_owned()));
        }

        Ok(Self {
            name: decoder.decode(start.name().as_ref()).map_err(xml_error)?.into_owned(),
            attributes,
            ..Self::default()
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return if self.text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(self.text)
            };
        }

        let mut object = self.children;
        if !self.attributes.is_empty() {
            object.insert(XML_ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }
        if !self.text.is_empty() {
            object.insert(XML_TEXT_KEY.to_string(), Value::String(self.text));
        }
        Value::Object(object)
    }
}

/// Converts an XML document into a JSON value.
///
/// The root element's name is dropped and its content becomes the result:
/// - child elements become keys; repeated names collect into an array
/// - attributes are grouped under `"@attributes"`
/// - an element holding only text becomes a string
/// - an empty element becomes `{}`
/// - text next to attributes or children is stored under `"#text"`
/// - CDATA sections count as text
///
/// Whitespace around text is trimmed; comments, processing instructions
/// and the declaration are ignored. The input is decoded with the encoding
/// named by its declaration or byte order mark, UTF-8 by default.
///
/// ```
/// use hookline::dispatch::xml_to_json;
/// use serde_json::json;
///
/// let value = xml_to_json(r#"<r><item id="1">a</item><item>b</item></r>"#).unwrap();
///
/// assert_eq!(
///     value,
///     json!({"item": [{"@attributes": {"id": "1"}, "#text": "a"}, "b"]})
/// );
/// ```
///
/// # Errors
///
/// Returns [`DecodeError::Xml`] if the document is malformed, has no root
/// element, or has more than one.
pub fn xml_to_json(xml: impl AsRef<[u8]>) -> Result<Value, DecodeError> {
    let mut reader = Reader::from_reader(xml.as_ref());
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DecodeError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(DecodeError::Xml("multiple root elements".to_string()));
                }
                stack.push(Node::open(&start, reader.decoder())?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(DecodeError::Xml("multiple root elements".to_string()));
                }
                let node = Node::open(&start, reader.decoder())?;
                close(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Xml("unexpected closing tag".to_string()))?;
                close(&mut stack, &mut root, node);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_error)?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let data = data.decode().map_err(xml_error)?;
                append_text(&mut stack, &data)?;
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DecodeError::Xml(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| DecodeError::Xml("document has no root element".to_string()))
}

fn close(stack: &mut [Node], root: &mut Option<Value>, node: Node) {
    let name = node.name.clone();
    let value = node.into_value();
    match stack.last_mut() {
        Some(parent) => parent.add_child(name, value),
        None => *root = Some(value),
    }
}

fn append_text(stack: &mut [Node], text: &str) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(node) => {
            node.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DecodeError::Xml("text outside the root element".to_string())),
    }
}

fn xml_error(error: impl std::fmt::Display) -> DecodeError {
    DecodeError::Xml(error.to_string())
}
