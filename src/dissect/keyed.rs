//! Line-oriented `key: value` splitter.

use super::FieldMap;

/// Splits text (or a list of items) into a flat [`FieldMap`].
///
/// Each non-empty item is split on `separator` at most `max_splits` times.
/// Items without the separator are skipped. With `max_splits` above one, an
/// item that splits into more than a key and a value is not a pair and is
/// skipped as well. Keys and values are trimmed.
#[derive(Debug, Clone, Copy)]
pub struct KeyedTextParser {
    separator: char,
    max_splits: usize,
    require_pairs: bool,
}

impl KeyedTextParser {
    pub const fn new(separator: char, max_splits: usize) -> Self {
        Self {
            separator,
            max_splits,
            require_pairs: false,
        }
    }

    /// Transcript metadata lines. Values keep their colons
    /// (`query_ip: 2001:db8::1`, `qtype: TXT (16)`).
    pub const fn meta() -> Self {
        Self::new(':', 1).require_pairs(true)
    }

    /// Comma-separated header and flag pairs (`id: 4242`). Only the first
    /// colon separates, so `weird: a: b` keeps `a: b` as its value.
    pub const fn pairs() -> Self {
        Self::new(':', 1).require_pairs(true)
    }

    /// Fail instead of returning an empty map when nothing was parsed.
    pub const fn require_pairs(mut self, yes: bool) -> Self {
        self.require_pairs = yes;
        self
    }

    /// Split `item` into a trimmed `(key, value)`, or `None` when it is not a pair.
    pub fn split_pair<'a>(&self, item: &'a str) -> Option<(&'a str, &'a str)> {
        let item = item.trim();
        if item.is_empty() || !item.contains(self.separator) {
            return None;
        }
        let mut parts = item.splitn(self.max_splits.max(1) + 1, self.separator);
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        if parts.next().is_some() {
            return None;
        }
        Some((key, value))
    }

    /// Parse newline-separated text.
    pub fn parse(&self, text: &str) -> Option<FieldMap> {
        self.parse_items(text.lines())
    }

    /// Parse pre-split items. `None` only when pairs are required and none
    /// were found.
    pub fn parse_items<'a, I>(&self, items: I) -> Option<FieldMap>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let map: FieldMap = items
            .into_iter()
            .filter_map(|item| self.split_pair(item))
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        if self.require_pairs && map.is_empty() {
            return None;
        }
        Some(map)
    }
}

impl Default for KeyedTextParser {
    fn default() -> Self {
        Self::new(':', 1)
    }
}
