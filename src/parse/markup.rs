//! Tolerant scanning for the semi-structured HTML inside a Takeout.
//!
//! Voice documents are machine-generated with a small, stable set of class
//! markers (`published`, `duration`, `message`, `dt`, `sender`, `full-text`).
//! Scanning for those markers directly is both simpler and more forgiving
//! than a strict DOM parse: a stray unclosed tag elsewhere in the document
//! doesn't take the whole entry down.
//!
//! Invariants this module relies on (and that hold for Voice markup):
//! - attribute values never contain `>`
//! - a tag never nests inside a tag of the same name

use regex::Regex;

/// One matched element: its tag name, parsed attributes, and raw inner
/// content. Borrows from the scanned document.
#[derive(Debug, Clone)]
pub struct Element<'a> {
    /// Tag name as written in the document
    pub tag: &'a str,
    attrs: Vec<(&'a str, &'a str)>,
    /// Raw content between the open tag and its closing tag
    pub inner: &'a str,
}

impl<'a> Element<'a> {
    /// Returns the raw value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name.eq_ignore_ascii_case(name))
            .map(|&(_, value)| value)
    }

    /// Returns `true` if the `class` attribute contains `class_name` as a
    /// whitespace-separated token (`class="sender vcard"` matches `sender`).
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class").is_some_and(|value| {
            value
                .split_whitespace()
                .any(|token| token.eq_ignore_ascii_case(class_name))
        })
    }

    /// Inner content with tags stripped, entities decoded, and whitespace
    /// collapsed to single spaces.
    pub fn text(&self) -> String {
        strip_tags(self.inner)
    }
}

/// Element scanner with the shared tag and attribute patterns compiled once.
///
/// Construct one per conversion and reuse it across documents.
#[derive(Debug)]
pub struct Scanner {
    open_tag: Regex,
    attr: Regex,
}

impl Scanner {
    /// Creates a scanner with freshly compiled patterns.
    pub fn new() -> Self {
        Scanner {
            open_tag: Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)\b([^>]*)>").unwrap(),
            attr: Regex::new(r#"([a-zA-Z][a-zA-Z0-9_-]*)\s*=\s*"([^"]*)""#).unwrap(),
        }
    }

    /// All elements whose `class` attribute contains `class_name` as a token.
    pub fn elements_with_class<'a>(&self, html: &'a str, class_name: &str) -> Vec<Element<'a>> {
        let mut found = Vec::new();
        for caps in self.open_tag.captures_iter(html) {
            let (Some(whole), Some(tag_match)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let attrs_text = caps.get(2).map_or("", |m| m.as_str());
            let element = self.element_at(html, tag_match.as_str(), attrs_text, whole.end());
            if element.has_class(class_name) {
                found.push(element);
            }
        }
        found
    }

    /// First element whose `class` attribute contains `class_name` as a token.
    pub fn first_with_class<'a>(&self, html: &'a str, class_name: &str) -> Option<Element<'a>> {
        for caps in self.open_tag.captures_iter(html) {
            let (Some(whole), Some(tag_match)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let attrs_text = caps.get(2).map_or("", |m| m.as_str());
            let element = self.element_at(html, tag_match.as_str(), attrs_text, whole.end());
            if element.has_class(class_name) {
                return Some(element);
            }
        }
        None
    }

    /// First element with the given tag name, regardless of attributes.
    pub fn first_with_tag<'a>(&self, html: &'a str, tag: &str) -> Option<Element<'a>> {
        for caps in self.open_tag.captures_iter(html) {
            let (Some(whole), Some(tag_match)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if !tag_match.as_str().eq_ignore_ascii_case(tag) {
                continue;
            }
            let attrs_text = caps.get(2).map_or("", |m| m.as_str());
            return Some(self.element_at(html, tag_match.as_str(), attrs_text, whole.end()));
        }
        None
    }

    fn element_at<'a>(
        &self,
        html: &'a str,
        tag: &'a str,
        attrs_text: &'a str,
        inner_start: usize,
    ) -> Element<'a> {
        let attrs = self
            .attr
            .captures_iter(attrs_text)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str();
                let value = caps.get(2)?.as_str();
                Some((name, value))
            })
            .collect();
        // unclosed element: take everything to the end of the document
        let inner_end = find_close(html, inner_start, tag).unwrap_or(html.len());
        Element {
            tag,
            attrs,
            inner: &html[inner_start..inner_end],
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds the byte offset of `</tag>` (case-insensitive, optional whitespace
/// before `>`) at or after `from`.
fn find_close(html: &str, from: usize, tag: &str) -> Option<usize> {
    let lower = html[from..].to_ascii_lowercase();
    let needle = format!("</{}", tag.to_ascii_lowercase());
    let mut search = 0;
    while let Some(pos) = lower[search..].find(&needle) {
        let abs = search + pos;
        let after = &lower[abs + needle.len()..];
        if after.trim_start().starts_with('>') {
            return Some(from + abs);
        }
        search = abs + needle.len();
    }
    None
}

/// Strips tags from a fragment, decodes basic entities, and collapses
/// whitespace runs to single spaces.
pub fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    let mut pending_space = false;
    for ch in fragment.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
                pending_space = true;
            }
            continue;
        }
        match ch {
            '<' => in_tag = true,
            c if c.is_whitespace() => pending_space = true,
            c => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }
    decode_entities(&out)
}

/// Decodes the named entities Voice markup actually uses plus numeric
/// references. Anything unrecognized stays literal.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let name = tail[1..]
            .find(';')
            .filter(|&n| n > 0 && n <= 8)
            .map(|n| &tail[1..=n]);
        match name.and_then(decode_entity) {
            Some(ch) => {
                let consumed = name.map_or(1, |n| n.len() + 2);
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| name.strip_prefix('#').map(str::parse))?;
            char::from_u32(code.ok()?)
        }
    }
}
