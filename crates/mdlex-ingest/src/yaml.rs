//! YAML front matter parsing.
//!
//! The event stream is walked directly because tag resolution depends on the
//! scalar style: only plain scalars are resolved to null, booleans, numbers
//! and timestamps. Quoted and block scalars are always strings.
//!
//! Plain scalars follow the YAML 1.1 rules front matter is usually written
//! against (`yes`/`no`/`on`/`off` are booleans, `2023-01-01` is a date).
//! Sexagesimal numbers and explicit `!!` tags are not interpreted.

use mdlex_core::{DateValue, MetaValue, Metadata};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[-+]?(?:[0-9][0-9_]*\.[0-9_]*|\.[0-9][0-9_]*)(?:[eE][-+]?[0-9]+)?$")
            .expect("float pattern is valid")
    })
}

/// Parse a front matter block into a mapping.
///
/// An empty document or an explicit null is an empty mapping. Any other
/// non-mapping top level is an error.
pub(crate) fn parse_mapping(block: &str) -> Result<Metadata, String> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new(block.chars());
    parser
        .load(&mut builder, false)
        .map_err(|e| e.to_string())?;

    if let Some(error) = builder.error {
        return Err(error);
    }

    match builder.root {
        None | Some(MetaValue::Null) => Ok(Metadata::new()),
        Some(MetaValue::Mapping(map)) => Ok(map),
        Some(other) => Err(format!(
            "front matter must be a mapping, found {}",
            kind(&other)
        )),
    }
}

fn kind(value: &MetaValue) -> &'static str {
    match value {
        MetaValue::Null => "null",
        MetaValue::Boolean(_) => "a boolean",
        MetaValue::Integer(_) | MetaValue::Float(_) => "a number",
        MetaValue::String(_) => "a string",
        MetaValue::Date(_) => "a date",
        MetaValue::List(_) => "a list",
        MetaValue::Mapping(_) => "a mapping",
    }
}

/// Resolve the text of a plain scalar to its typed value.
pub(crate) fn resolve_plain(text: &str) -> MetaValue {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return MetaValue::Null,
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            return MetaValue::Boolean(true)
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            return MetaValue::Boolean(false)
        }
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return MetaValue::Float(f64::INFINITY)
        }
        "-.inf" | "-.Inf" | "-.INF" => return MetaValue::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return MetaValue::Float(f64::NAN),
        _ => {}
    }

    if let Some(value) = parse_int(text) {
        return value;
    }
    if float_pattern().is_match(text) {
        if let Ok(f) = text.replace('_', "").parse::<f64>() {
            return MetaValue::Float(f);
        }
    }
    if let Some(date) = DateValue::parse(text) {
        return MetaValue::Date(date);
    }
    MetaValue::String(text.to_string())
}

/// Decimal, `0x` hex, `0o` octal, and leading-zero octal integers.
/// Decimal values too large for `i64` become floats.
fn parse_int(text: &str) -> Option<MetaValue> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let digits = unsigned.replace('_', "");

    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x") {
        (16, hex)
    } else if let Some(oct) = digits.strip_prefix("0o") {
        (8, oct)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };

    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let signed = if negative {
        format!("-{}", body)
    } else {
        body.to_string()
    };
    match i64::from_str_radix(&signed, radix) {
        Ok(i) => Some(MetaValue::Integer(i)),
        Err(_) if radix == 10 => signed.parse::<f64>().ok().map(MetaValue::Float),
        Err(_) => None,
    }
}

/// Key text for an aliased node used as a mapping key.
fn alias_key(value: &MetaValue) -> Option<String> {
    match value {
        MetaValue::String(s) => Some(s.clone()),
        MetaValue::Integer(i) => Some(i.to_string()),
        MetaValue::Float(f) => Some(f.to_string()),
        MetaValue::Boolean(b) => Some(b.to_string()),
        MetaValue::Date(d) => Some(d.to_iso8601()),
        MetaValue::Null => Some("null".to_string()),
        MetaValue::List(_) | MetaValue::Mapping(_) => None,
    }
}

enum Frame {
    Sequence {
        anchor: usize,
        items: Vec<MetaValue>,
    },
    Mapping {
        anchor: usize,
        entries: Metadata,
        pending_key: Option<String>,
    },
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, MetaValue>,
    root: Option<MetaValue>,
    error: Option<String>,
}

impl TreeBuilder {
    /// Attach a completed node to its parent. `key_text` is what the node
    /// reads as when it sits in key position; collections have none.
    fn finish_node(&mut self, value: MetaValue, key_text: Option<String>, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }

        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(value);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, value);
                }
                None => match key_text {
                    Some(key) => *pending_key = Some(key),
                    None => self.error = Some("front matter keys must be scalars".to_string()),
                },
            },
        }
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(text, style, anchor, ..) => {
                let value = if style == TScalarStyle::Plain {
                    resolve_plain(&text)
                } else {
                    MetaValue::String(text.clone())
                };
                self.finish_node(value, Some(text), anchor);
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Sequence {
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Mapping {
                anchor,
                entries: Metadata::new(),
                pending_key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => {
                let (value, anchor) = match self.stack.pop() {
                    Some(Frame::Sequence { anchor, items }) => (MetaValue::List(items), anchor),
                    Some(Frame::Mapping {
                        anchor, entries, ..
                    }) => (MetaValue::Mapping(entries), anchor),
                    None => return,
                };
                self.finish_node(value, None, anchor);
            }
            Event::Alias(id) => match self.anchors.get(&id).cloned() {
                Some(value) => {
                    let key = alias_key(&value);
                    self.finish_node(value, key, 0);
                }
                None => self.error = Some(format!("unknown alias #{}", id)),
            },
            _ => {}
        }
    }
}
