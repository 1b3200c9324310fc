//! Scanner Module
//!
//! Lexical scanning of JSX attribute lists and opening tags.
//! Works on raw source text: no AST is built, only brace depth and quote
//! state are tracked so that expression values stay opaque.
//!
//! ## Invariants
//!
//! 1. **Round-trip**: concatenating the `raw` text of every record produced
//!    for an attribute list reproduces that list byte for byte.
//! 2. **Verbatim unnamed records**: spreads, malformed chunks and trailing
//!    whitespace are kept as records without a name and are never rewritten.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Opening of any capitalized JSX tag; the name boundary is checked separately
    static ref COMPONENT_OPEN_RE: Regex = Regex::new(r"<[A-Z][A-Za-z0-9_]*").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORD TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// One attribute of a JSX attribute list, with its leading whitespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    /// None for `{...spread}`, malformed chunks and the whitespace tail
    pub name: Option<String>,
    pub raw: String,
}

impl AttributeRecord {
    /// True for the unnamed record holding only trailing whitespace
    pub fn is_whitespace(&self) -> bool {
        self.name.is_none() && self.raw.trim().is_empty()
    }
}

/// A located JSX opening tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMatch {
    pub name: String,
    /// Byte offset of `<`
    pub start: usize,
    /// Byte offset one past the closing `>`
    pub end: usize,
    pub attributes: Vec<AttributeRecord>,
    pub self_closing: bool,
}

impl TagMatch {
    /// The attribute list exactly as it appears in the source
    pub fn attribute_text(&self) -> String {
        self.attributes.iter().map(|a| a.raw.as_str()).collect()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().filter_map(|a| a.name.as_deref())
    }
}

/// Check if a tag name refers to a component rather than an HTML element
pub fn is_component_tag(tag_name: &str) -> bool {
    tag_name
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}

// ═══════════════════════════════════════════════════════════════════════════════
// CURSOR
// ═══════════════════════════════════════════════════════════════════════════════

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'-' | b':')
}

/// Every stop position is an ASCII byte or the end of input, so slicing
/// between two positions never splits a UTF-8 sequence.
struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Stop at a top-level `>` or `/>`
    tag_mode: bool,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, pos: usize, tag_mode: bool) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos,
            tag_mode,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn at_tag_end(&self) -> bool {
        self.tag_mode
            && match self.peek() {
                Some(b'>') => true,
                Some(b'/') => self.peek_at(1) == Some(b'>'),
                _ => false,
            }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume a `{ ... }` group by depth alone; quotes inside are not special
    fn consume_braced(&mut self) {
        let mut depth = 0i32;
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    fn consume_quoted(&mut self) {
        let Some(quote) = self.peek() else {
            return;
        };
        self.pos += 1;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == quote && self.bytes[self.pos - 2] != b'\\' {
                break;
            }
        }
    }

    fn consume_unquoted(&mut self) {
        while matches!(self.peek(), Some(c) if !c.is_ascii_whitespace() && c != b'>' && c != b'/')
        {
            self.pos += 1;
        }
    }

    fn consume_chunk(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || self.at_tag_end() {
                break;
            }
            self.pos += 1;
        }
    }

    fn record(&self, name: Option<&str>, start: usize) -> AttributeRecord {
        AttributeRecord {
            name: name.map(str::to_string),
            raw: self.src[start..self.pos].to_string(),
        }
    }

    fn next_record(&mut self) -> Option<AttributeRecord> {
        let start = self.pos;
        self.skip_whitespace();

        let c = match self.peek() {
            Some(_) if self.at_tag_end() => None,
            other => other,
        };

        let Some(c) = c else {
            // Trailing whitespace survives as its own record
            return (self.pos > start).then(|| self.record(None, start));
        };

        if c == b'{' {
            self.consume_braced();
            return Some(self.record(None, start));
        }

        if !is_ident_start(c) {
            self.consume_chunk();
            return Some(self.record(None, start));
        }

        let name_start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.pos += 1;
        }
        let name_end = self.pos;
        let src = self.src;
        let name = &src[name_start..name_end];

        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            // Boolean prop: the record ends at the identifier
            self.pos = name_end;
            return Some(self.record(Some(name), start));
        }

        self.pos += 1;
        self.skip_whitespace();

        match self.peek() {
            Some(b'{') => self.consume_braced(),
            Some(b'"') | Some(b'\'') => self.consume_quoted(),
            Some(_) if !self.at_tag_end() => self.consume_unquoted(),
            _ => {}
        }

        Some(self.record(Some(name), start))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════════

/// Tokenize a raw attribute list (the text between a tag name and its `>`)
pub fn scan_attributes(attrs: &str) -> Vec<AttributeRecord> {
    let mut cursor = Cursor::new(attrs, 0, false);
    let mut records = Vec::new();
    while let Some(record) = cursor.next_record() {
        records.push(record);
    }
    records
}

/// Scan the opening tag whose `<` is at `start` and whose name is `name`.
/// Returns None when the tag is not terminated before the end of input.
fn scan_tag(source: &str, start: usize, name: &str) -> Option<TagMatch> {
    let mut cursor = Cursor::new(source, start + 1 + name.len(), true);
    let mut attributes = Vec::new();
    while let Some(record) = cursor.next_record() {
        attributes.push(record);
    }

    let (self_closing, end) = match cursor.peek()? {
        b'>' => (false, cursor.pos + 1),
        _ => (true, cursor.pos + 2),
    };

    Some(TagMatch {
        name: name.to_string(),
        start,
        end,
        attributes,
        self_closing,
    })
}

fn has_name_boundary(source: &str, name_end: usize) -> bool {
    match source.as_bytes().get(name_end) {
        Some(c) => c.is_ascii_whitespace() || *c == b'/' || *c == b'>',
        None => false,
    }
}

fn collect_tags(source: &str, re: &Regex) -> Vec<TagMatch> {
    let mut tags = Vec::new();
    let mut from = 0;

    while let Some(m) = re.find_at(source, from) {
        from = m.end();
        if !has_name_boundary(source, m.end()) {
            continue;
        }
        if let Some(tag) = scan_tag(source, m.start(), &m.as_str()[1..]) {
            from = tag.end;
            tags.push(tag);
        }
    }

    tags
}

/// Find every capitalized JSX opening tag in a document
pub fn find_component_tags(source: &str) -> Vec<TagMatch> {
    collect_tags(source, &COMPONENT_OPEN_RE)
}

/// Find every opening tag of one component in a document
pub fn find_tags_named(source: &str, component: &str) -> Vec<TagMatch> {
    if !is_component_tag(component) {
        return Vec::new();
    }
    match Regex::new(&format!("<{}", regex::escape(component))) {
        Ok(re) => collect_tags(source, &re),
        Err(_) => Vec::new(),
    }
}
