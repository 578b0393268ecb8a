//! Streaming start-tag scanner.
//!
//! Walks an HTML fragment and yields every start tag together with byte
//! offsets for the tag, its name and each attribute. Nothing is re-serialized:
//! callers edit the original text through those offsets, so markup they do not
//! touch stays byte for byte identical.

use std::ops::Range;

/// Elements whose content is raw text and must not be scanned for tags
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// One attribute of a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Value without surrounding quotes; `None` for a bare attribute
    pub value: Option<&'a str>,
    /// Whole attribute, from the first byte of the name to the end of the value
    pub span: Range<usize>,
    /// Value including its quotes, if it has a value
    pub value_span: Option<Range<usize>>,
}

/// A start tag found in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    /// From `<` to `>` inclusive
    pub span: Range<usize>,
    /// Offset just past the tag name
    pub name_end: usize,
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartTag<'a> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// First attribute with the given name (ASCII case-insensitive)
    pub fn attr(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Iterator over the start tags of an HTML fragment
pub struct TagScanner<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> TagScanner<'a> {
    pub fn new(html: &'a str) -> Self {
        Self { html, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.html.as_bytes()
    }

    fn finish(&mut self) -> Option<StartTag<'a>> {
        self.pos = self.html.len();
        None
    }

    fn skip_whitespace(&self, mut i: usize) -> usize {
        let bytes = self.bytes();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }

    /// Parse a start tag whose `<` is at `start`. `None` means the tag is unterminated.
    fn parse_start_tag(&self, start: usize) -> Option<StartTag<'a>> {
        let bytes = self.bytes();
        let len = bytes.len();

        let mut i = start + 1;
        while i < len && !is_name_delimiter(bytes[i]) {
            i += 1;
        }
        let name_end = i;
        let name = &self.html[start + 1..name_end];

        let mut attributes = Vec::new();
        loop {
            while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
                i += 1;
            }
            if i >= len {
                return None;
            }
            if bytes[i] == b'>' {
                return Some(StartTag {
                    name,
                    span: start..i + 1,
                    name_end,
                    attributes,
                });
            }

            // The first byte always belongs to the name, even if it is `=`
            let attr_start = i;
            i += 1;
            while i < len && !is_name_delimiter(bytes[i]) && bytes[i] != b'=' {
                i += 1;
            }
            let attr_name = &self.html[attr_start..i];

            let after_name = self.skip_whitespace(i);
            if after_name < len && bytes[after_name] == b'=' {
                let value_start = self.skip_whitespace(after_name + 1);
                if value_start >= len {
                    return None;
                }
                let (value, value_span) = match bytes[value_start] {
                    quote @ (b'"' | b'\'') => {
                        let close = find_byte(bytes, quote, value_start + 1)?;
                        (
                            &self.html[value_start + 1..close],
                            value_start..close + 1,
                        )
                    }
                    _ => {
                        let mut end = value_start;
                        while end < len && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>'
                        {
                            end += 1;
                        }
                        (&self.html[value_start..end], value_start..end)
                    }
                };
                i = value_span.end;
                attributes.push(Attribute {
                    name: attr_name,
                    value: Some(value),
                    span: attr_start..i,
                    value_span: Some(value_span),
                });
            } else {
                attributes.push(Attribute {
                    name: attr_name,
                    value: None,
                    span: attr_start..i,
                    value_span: None,
                });
            }
        }
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = StartTag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.bytes();
        loop {
            let start = find_byte(bytes, b'<', self.pos)?;
            let rest = &bytes[start..];

            if rest.starts_with(b"<!--") {
                self.pos = match find_from(bytes, b"-->", start + 4) {
                    Some(end) => end + 3,
                    None => return self.finish(),
                };
                continue;
            }

            match rest.get(1) {
                Some(b'!' | b'?' | b'/') => {
                    // Doctype, processing instruction or end tag
                    self.pos = match find_byte(bytes, b'>', start + 1) {
                        Some(end) => end + 1,
                        None => return self.finish(),
                    };
                }
                Some(b) if b.is_ascii_alphabetic() => {
                    let Some(tag) = self.parse_start_tag(start) else {
                        return self.finish();
                    };
                    self.pos = tag.span.end;

                    if let Some(raw) = RAW_TEXT_ELEMENTS.iter().find(|raw| tag.is(raw)) {
                        let closing = format!("</{}", raw);
                        self.pos = find_ascii_ci(bytes, closing.as_bytes(), self.pos)
                            .unwrap_or(bytes.len());
                    }
                    return Some(tag);
                }
                _ => {
                    // A lone `<` in text
                    self.pos = start + 1;
                }
            }
        }
    }
}

fn is_name_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| i + from)
}

fn find_from(bytes: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

fn find_ascii_ci(bytes: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| i + from)
}

/// A replacement of `range` in the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Apply non-overlapping edits, sorted by position, to `html`
pub fn apply_edits(html: &str, edits: &[Edit]) -> String {
    let extra: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(html.len() + extra);
    let mut cursor = 0;

    for edit in edits {
        out.push_str(&html[cursor..edit.range.start]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    out.push_str(&html[cursor..]);
    out
}
