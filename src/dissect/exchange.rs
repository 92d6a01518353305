//! One chunk → one [`ExchangeRecord`], or an explicit failure.

use super::dig::MARKER;
use super::{FieldMap, KeyedTextParser, ResponseBlock, ResponseBlockParser};
use crate::error::DissectError;
use crate::value::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

static OCTETS_RE: OnceLock<Regex> = OnceLock::new();

fn octets_re() -> &'static Regex {
    OCTETS_RE.get_or_init(|| Regex::new(r"\[(\d+) octets\]").expect("octets regex"))
}

/// Meta fields whose `[N octets]` value is replaced with `N`.
const OCTET_FIELDS: [&str; 2] = ["query", "response"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeKind {
    Request,
    Response,
}

impl ExchangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangeKind::Request => "REQUEST",
            ExchangeKind::Response => "RESPONSE",
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A meta field value: raw text, or an octet count for `query`/`response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Octets(u64),
    Text(String),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::Octets(_) => None,
        }
    }

    pub fn as_octets(&self) -> Option<u64> {
        match self {
            MetaValue::Octets(n) => Some(*n),
            MetaValue::Text(_) => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            MetaValue::Octets(n) => Value::Number(*n as f64),
            MetaValue::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

/// A dissected request or response. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub id: String,
    pub kind: ExchangeKind,
    pub meta: FieldMap<MetaValue>,
    pub packet: ResponseBlock,
}

impl ExchangeRecord {
    /// Source address of the query, if present and non-empty.
    pub fn query_ip(&self) -> Option<&str> {
        self.meta
            .get("query_ip")
            .and_then(MetaValue::as_text)
            .filter(|ip| !ip.is_empty())
    }

    /// Projection used by gauge field paths:
    /// `{id, type, meta: {..}, packet: {header, flags, *_section}}`.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("id".to_string(), Value::from(self.id.as_str()));
        map.insert("type".to_string(), Value::from(self.kind.as_str()));
        map.insert("meta".to_string(), self.meta.to_value_with(MetaValue::to_value));
        map.insert("packet".to_string(), self.packet.to_value());
        Value::Map(map)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExchangeDissector {
    meta: KeyedTextParser,
    packet: ResponseBlockParser,
}

impl Default for ExchangeDissector {
    fn default() -> Self {
        Self {
            meta: KeyedTextParser::meta(),
            packet: ResponseBlockParser::new(),
        }
    }
}

impl ExchangeDissector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dissect(&self, chunk: &str) -> Result<ExchangeRecord, DissectError> {
        let split = chunk.find(MARKER).ok_or(DissectError::MissingMarker)?;
        let (meta_text, packet_text) = chunk.split_at(split);

        let meta = self.meta.parse(meta_text);
        let packet = self.packet.parse(packet_text);
        let (meta, packet) = match (meta, packet) {
            (Some(meta), Ok(packet)) => (meta, packet),
            // The packet's own reason is more specific than "partial".
            (_, Err(e)) => return Err(e),
            (None, Ok(_)) => return Err(DissectError::PartialDissection),
        };

        let meta = meta.map_values(|key, raw| octets(key, raw));

        let kind = if meta.contains_key("query") {
            ExchangeKind::Request
        } else if meta.contains_key("response") {
            ExchangeKind::Response
        } else {
            return Err(DissectError::UnclassifiedExchange);
        };

        let id = packet
            .header
            .get("id")
            .cloned()
            .ok_or(DissectError::MissingIdentifier)?;

        Ok(ExchangeRecord {
            id,
            kind,
            meta,
            packet,
        })
    }
}

fn octets(key: &str, raw: String) -> MetaValue {
    if !OCTET_FIELDS.contains(&key) {
        return MetaValue::Text(raw);
    }
    match octets_re()
        .captures(&raw)
        .and_then(|caps| caps[1].parse::<u64>().ok())
    {
        Some(n) => MetaValue::Octets(n),
        None => MetaValue::Text(raw),
    }
}
