//! Transcript dissection: free-text chunks → structured exchange records.

mod dig;
mod exchange;
mod keyed;

pub use dig::ResponseBlockParser;
pub use exchange::{ExchangeDissector, ExchangeKind, ExchangeRecord, MetaValue};
pub use keyed::KeyedTextParser;

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Insertion-ordered key → value mapping. Re-inserting a key overwrites the
/// value in place (last write wins, first position kept).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap<V = String> {
    entries: Vec<(String, V)>,
}

impl<V> Default for FieldMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> FieldMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn map_values<W>(self, mut f: impl FnMut(&str, V) -> W) -> FieldMap<W> {
        FieldMap {
            entries: self
                .entries
                .into_iter()
                .map(|(k, v)| {
                    let w = f(&k, v);
                    (k, w)
                })
                .collect(),
        }
    }

    pub(crate) fn to_value_with(&self, f: impl Fn(&V) -> Value) -> Value {
        let map: BTreeMap<String, Value> =
            self.entries.iter().map(|(k, v)| (k.clone(), f(v))).collect();
        Value::Map(map)
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for FieldMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Parsed dig-style response block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBlock {
    pub header: FieldMap,
    /// Flag pairs plus the raw flag tokens under the reserved `flags` key.
    pub flags: FieldMap,
    pub question_section: String,
    pub answer_section: String,
    pub authority_section: String,
    pub additional_section: String,
    /// Sections whose name is none of the four standard ones
    /// (e.g. `opt_pseudosection`).
    pub other_sections: FieldMap,
}

impl ResponseBlock {
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("header".to_string(), self.header.to_value_with(|v| Value::from(v.as_str())));
        map.insert("flags".to_string(), self.flags.to_value_with(|v| Value::from(v.as_str())));
        for (name, text) in self.other_sections.iter() {
            map.insert(name.to_string(), Value::from(text.as_str()));
        }
        map.insert("question_section".to_string(), Value::from(self.question_section.as_str()));
        map.insert("answer_section".to_string(), Value::from(self.answer_section.as_str()));
        map.insert("authority_section".to_string(), Value::from(self.authority_section.as_str()));
        map.insert("additional_section".to_string(), Value::from(self.additional_section.as_str()));
        Value::Map(map)
    }
}
