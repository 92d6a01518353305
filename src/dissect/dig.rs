//! Dig-style response block parser.
//!
//! ```text
//! ;; ->>HEADER<<- opcode: QUERY, rcode: NOERROR, id: 4291
//! ;; flags: qr; QUERY: 1, ANSWER: 0, AUTHORITY: 4, ADDITIONAL: 8
//!
//! ;; QUESTION SECTION:
//! ;ya.gds.tmall.com. IN A
//!
//! ;; ANSWER SECTION:
//!
//! ;; AUTHORITY SECTION:
//! gds.tmall.com. 86400 IN NS gdsns1.taobao.com.
//!
//! ;; ADDITIONAL SECTION:
//! gdsns1.tmall.com. 3600 IN A 140.205.122.66
//! ```

use super::{FieldMap, KeyedTextParser, ResponseBlock};
use crate::error::DissectError;
use regex::Regex;
use std::sync::OnceLock;

pub const MARKER: &str = ";;";

/// Header, flags, and at least three sections.
const MIN_SEGMENTS: usize = 5;

static HEADER_RE: OnceLock<Regex> = OnceLock::new();
static FLAGS_RE: OnceLock<Regex> = OnceLock::new();

fn header_re() -> &'static Regex {
    HEADER_RE.get_or_init(|| Regex::new(r"->>HEADER<<- ([\w ,:]+)").expect("header regex"))
}

fn flags_re() -> &'static Regex {
    FLAGS_RE.get_or_init(|| Regex::new(r"flags:([\w ]*); ([\w ,:]+)").expect("flags regex"))
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseBlockParser {
    pairs: KeyedTextParser,
}

impl Default for ResponseBlockParser {
    fn default() -> Self {
        Self {
            pairs: KeyedTextParser::pairs(),
        }
    }
}

impl ResponseBlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse text that begins at the first `;;` marker.
    pub fn parse(&self, text: &str) -> Result<ResponseBlock, DissectError> {
        let segments: Vec<&str> = text
            .trim()
            .split(MARKER)
            .skip(1)
            .map(str::trim)
            .collect();

        if segments.len() < MIN_SEGMENTS {
            return Err(DissectError::Structural {
                found: segments.len(),
                expected: MIN_SEGMENTS,
            });
        }

        let header = self
            .header(segments[0])
            .ok_or_else(|| DissectError::Header(segments[0].to_string()))?;
        let flags = self
            .flags(segments[1])
            .ok_or_else(|| DissectError::Flags(segments[1].to_string()))?;

        let mut block = ResponseBlock {
            header,
            flags,
            ..ResponseBlock::default()
        };

        for segment in &segments[2..] {
            let (name, body) = section(segment).ok_or(DissectError::Structural {
                found: segments.len(),
                expected: MIN_SEGMENTS,
            })?;
            match name.as_str() {
                "question_section" => block.question_section = body.to_string(),
                "answer_section" => block.answer_section = body.to_string(),
                "authority_section" => block.authority_section = body.to_string(),
                "additional_section" => block.additional_section = body.to_string(),
                _ => block.other_sections.insert(name, body.to_string()),
            }
        }

        Ok(block)
    }

    fn header(&self, segment: &str) -> Option<FieldMap> {
        let caps = header_re().captures(segment)?;
        self.pairs.parse_items(caps[1].split(','))
    }

    fn flags(&self, segment: &str) -> Option<FieldMap> {
        let caps = flags_re().captures(segment)?;
        let mut flags = self.pairs.parse_items(caps[2].split(','))?;
        flags.insert("flags", caps[1].trim().to_string());
        Some(flags)
    }
}

/// `"ANSWER SECTION: a. 60 IN A 1.2.3.4"` → `("answer_section", "a. 60 IN A 1.2.3.4")`.
fn section(segment: &str) -> Option<(String, &str)> {
    let (name, body) = segment.split_once(':')?;
    let name = name.trim().to_lowercase().replace(' ', "_");
    Some((name, body.trim()))
}
