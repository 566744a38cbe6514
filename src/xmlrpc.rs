//! Minimal XML-RPC wire format: request encoding and response parsing.
//!
//! Covers the subset the MetaWeblog API uses: scalars, `dateTime.iso8601`,
//! arrays, and structs. Fault responses are surfaced as errors carrying the
//! remote `faultCode`/`faultString`.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// XML-RPC dateTime.iso8601 layout, e.g. `20230101T10:00:00`.
const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// An XML-RPC value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    Double(f64),
    DateTime(DateTime<Utc>),
    Array(Vec<Value>),
    Struct(Vec<(String, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Look up a struct member by name.
    pub fn member(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

// ─── Encoding ───────────────────────────────────────────────────────

/// Serialize a `<methodCall>` document.
pub fn request_body(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?><methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        encode_value(param, &mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn encode_value(value: &Value, out: &mut String) {
    out.push_str("<value>");
    match value {
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Int(i) => {
            out.push_str("<int>");
            out.push_str(&i.to_string());
            out.push_str("</int>");
        }
        Value::Bool(b) => {
            out.push_str("<boolean>");
            out.push_str(if *b { "1" } else { "0" });
            out.push_str("</boolean>");
        }
        Value::Double(d) => {
            out.push_str("<double>");
            out.push_str(&d.to_string());
            out.push_str("</double>");
        }
        Value::DateTime(dt) => {
            out.push_str("<dateTime.iso8601>");
            out.push_str(&dt.format(DATETIME_FORMAT).to_string());
            out.push_str("</dateTime.iso8601>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(item, out);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                encode_value(member, out);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

// ─── Parsing ────────────────────────────────────────────────────────

/// Parse a `<methodResponse>` document into its single return value.
///
/// A `<fault>` response becomes an error carrying the remote code and
/// message.
pub fn parse_response(xml: &[u8]) -> Result<Value> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_fault = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"fault" => in_fault = true,
                b"value" => {
                    let value = parse_value(&mut reader)?;
                    if in_fault {
                        let code = value
                            .member("faultCode")
                            .and_then(Value::as_i64)
                            .unwrap_or_default();
                        let message = value
                            .member("faultString")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown fault")
                            .to_string();
                        bail!("XML-RPC fault {}: {}", code, message);
                    }
                    return Ok(value);
                }
                _ => {}
            },
            Event::Eof => bail!("malformed XML-RPC response: no return value"),
            _ => {}
        }
        buf.clear();
    }
}

/// Parse one value tree; the opening `<value>` has already been consumed.
fn parse_value(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let tag = e.local_name().as_ref().to_vec();
                let value = match tag.as_slice() {
                    b"string" => Value::String(read_text(reader, b"string")?),
                    b"int" | b"i4" => {
                        let raw = read_text(reader, &tag)?;
                        Value::Int(
                            raw.trim()
                                .parse()
                                .with_context(|| format!("bad XML-RPC int: '{}'", raw))?,
                        )
                    }
                    b"boolean" => {
                        let raw = read_text(reader, b"boolean")?;
                        Value::Bool(matches!(raw.trim(), "1" | "true"))
                    }
                    b"double" => {
                        let raw = read_text(reader, b"double")?;
                        Value::Double(
                            raw.trim()
                                .parse()
                                .with_context(|| format!("bad XML-RPC double: '{}'", raw))?,
                        )
                    }
                    b"dateTime.iso8601" => {
                        let raw = read_text(reader, b"dateTime.iso8601")?;
                        let parsed = NaiveDateTime::parse_from_str(raw.trim(), DATETIME_FORMAT)
                            .with_context(|| format!("bad XML-RPC dateTime: '{}'", raw))?;
                        Value::DateTime(parsed.and_utc())
                    }
                    b"array" => parse_array(reader)?,
                    b"struct" => parse_struct(reader)?,
                    b"nil" => {
                        skip_to_end(reader, b"nil")?;
                        Value::String(String::new())
                    }
                    other => bail!(
                        "unexpected element in XML-RPC value: <{}>",
                        String::from_utf8_lossy(other)
                    ),
                };
                skip_to_end(reader, b"value")?;
                return Ok(value);
            }
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::End(e) if e.local_name().as_ref() == b"value" => {
                // Untyped <value>text</value> is a string.
                return Ok(Value::String(text));
            }
            Event::Eof => bail!("unexpected EOF inside XML-RPC value"),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_array(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"data" => {}
                b"value" => items.push(parse_value(reader)?),
                other => bail!(
                    "unexpected element in XML-RPC array: <{}>",
                    String::from_utf8_lossy(other)
                ),
            },
            Event::End(e) if e.local_name().as_ref() == b"array" => {
                return Ok(Value::Array(items));
            }
            Event::Eof => bail!("unexpected EOF inside XML-RPC array"),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_struct(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut buf = Vec::new();
    let mut members = Vec::new();
    let mut name: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"member" => {}
                b"name" => name = Some(read_text(reader, b"name")?),
                b"value" => {
                    let value = parse_value(reader)?;
                    let key = name
                        .take()
                        .ok_or_else(|| anyhow::anyhow!("XML-RPC struct member without a name"))?;
                    members.push((key, value));
                }
                other => bail!(
                    "unexpected element in XML-RPC struct: <{}>",
                    String::from_utf8_lossy(other)
                ),
            },
            Event::End(e) if e.local_name().as_ref() == b"struct" => {
                return Ok(Value::Struct(members));
            }
            Event::Eof => bail!("unexpected EOF inside XML-RPC struct"),
            _ => {}
        }
        buf.clear();
    }
}

/// Accumulate text until the named closing tag.
fn read_text(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<String> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::End(e) if e.local_name().as_ref() == end => return Ok(text),
            Event::Eof => bail!("unexpected EOF inside XML-RPC element"),
            _ => {}
        }
        buf.clear();
    }
}

/// Discard events until the named closing tag (whitespace, mostly).
fn skip_to_end(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::End(e) if e.local_name().as_ref() == end => return Ok(()),
            Event::Eof => bail!("unexpected EOF inside XML-RPC element"),
            _ => {}
        }
        buf.clear();
    }
}
