//! Small tagged value tree that exchange records are projected into, and the
//! path lookup gauges resolve their configured fields with.

use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Walk `path` one key at a time. Map steps match keys exactly; list steps
    /// parse the key as an index. Any other step is a type mismatch.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Result<&Value, LookupError> {
        let mut current = self;
        for (depth, key) in path.iter().enumerate() {
            let key = key.as_ref();
            current = match current {
                Value::Map(map) => map.get(key).ok_or_else(|| LookupError::MissingKey {
                    key: key.to_string(),
                    depth,
                })?,
                Value::List(items) => {
                    let index = key.parse::<usize>().map_err(|_| LookupError::TypeMismatch {
                        expected: "map",
                        found: "list",
                        depth,
                    })?;
                    items
                        .get(index)
                        .ok_or(LookupError::IndexOutOfRange { index, depth })?
                }
                other => {
                    return Err(LookupError::TypeMismatch {
                        expected: "map",
                        found: other.kind(),
                        depth,
                    })
                }
            };
        }
        Ok(current)
    }

    /// Lookup that additionally requires a string leaf.
    pub fn lookup_str<S: AsRef<str>>(&self, path: &[S]) -> Result<&str, LookupError> {
        let leaf = self.lookup(path)?;
        leaf.as_str().ok_or(LookupError::TypeMismatch {
            expected: "string",
            found: leaf.kind(),
            depth: path.len(),
        })
    }

    /// Lookup that additionally requires a numeric leaf.
    pub fn lookup_f64<S: AsRef<str>>(&self, path: &[S]) -> Result<f64, LookupError> {
        let leaf = self.lookup(path)?;
        leaf.as_f64().ok_or(LookupError::TypeMismatch {
            expected: "number",
            found: leaf.kind(),
            depth: path.len(),
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}
