//! Tolerant reader and writer for the script-body markup.
//!
//! The script body is a flat run of block elements, one per screenplay line,
//! each tagged with a class such as `script-action`. Only top-level elements
//! become lines; nested markup contributes its text. A top-level void element
//! such as a bare `<br>` is an empty line. Stray top-level text and comments
//! are dropped, and an unterminated element is closed at the end.

use std::ops::Range;

use super::element::ScriptElement;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "meta", "wbr"];

enum Tag {
    Open {
        class: String,
        void: bool,
    },
    Close,
}

/// A top-level line and where it sits in the markup it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    pub element: ScriptElement,
    /// Opening tag through closing tag.
    pub outer: Range<usize>,
    /// Between the tags; empty at `outer.end` for void elements.
    pub inner: Range<usize>,
}

/// Splits `markup` into its top-level lines.
pub fn parse_markup(markup: &str) -> Vec<ScriptElement> {
    parse_spans(markup)
        .into_iter()
        .map(|span| span.element)
        .collect()
}

/// Splits `markup` into its top-level lines with their byte ranges.
pub fn parse_spans(markup: &str) -> Vec<ElementSpan> {
    let mut spans = Vec::new();
    let mut current: Option<ElementSpan> = None;
    let mut depth = 0usize;
    let mut rest = markup;

    while !rest.is_empty() {
        let offset = markup.len() - rest.len();

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }

        if rest.starts_with('<') {
            if let Some(end) = rest.find('>') {
                let tag = parse_tag(&rest[1..end]);
                rest = &rest[end + 1..];
                let tag_end = markup.len() - rest.len();
                match tag {
                    Tag::Open { class, void } => {
                        if depth == 0 {
                            let span = ElementSpan {
                                element: ScriptElement::with_class(class, ""),
                                outer: offset..tag_end,
                                inner: tag_end..tag_end,
                            };
                            if void {
                                spans.push(span);
                            } else {
                                current = Some(span);
                            }
                        }
                        if !void {
                            depth += 1;
                        }
                    }
                    Tag::Close => {
                        if depth > 0 {
                            depth -= 1;
                            if depth == 0 {
                                if let Some(mut span) = current.take() {
                                    span.inner.end = offset;
                                    span.outer.end = tag_end;
                                    spans.push(span);
                                }
                            }
                        }
                    }
                }
                continue;
            }
        }

        // Text runs to the next tag; a '<' that never closes swallows the rest.
        let end = if rest.starts_with('<') {
            rest.len()
        } else {
            rest.find('<').unwrap_or(rest.len())
        };
        if depth > 0 {
            if let Some(span) = current.as_mut() {
                span.element.text.push_str(&decode_entities(&rest[..end]));
            }
        }
        rest = &rest[end..];
    }

    if let Some(mut span) = current {
        span.inner.end = markup.len();
        span.outer.end = markup.len();
        spans.push(span);
    }
    spans
}

/// Opening tag for a line with `class_name`.
pub fn render_open_tag(class_name: &str) -> String {
    if class_name.is_empty() {
        "<div>".to_string()
    } else {
        format!("<div class=\"{}\">", escape(class_name))
    }
}

/// Writes lines back as markup.
pub fn render_markup(elements: &[ScriptElement]) -> String {
    let mut out = String::new();
    for element in elements {
        out.push_str(&render_open_tag(&element.class_name));
        out.push_str(&escape(&element.text));
        out.push_str("</div>");
    }
    out
}

fn parse_tag(inner: &str) -> Tag {
    let inner = inner.trim();
    if inner.starts_with('/') {
        return Tag::Close;
    }
    let name_end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = &inner[..name_end];
    let self_closing = inner.ends_with('/');
    let void = self_closing
        || VOID_ELEMENTS
            .iter()
            .any(|void| name.eq_ignore_ascii_case(void));
    Tag::Open {
        class: class_attribute(&inner[name_end..]),
        void,
    }
}

/// Extracts the value of the `class` attribute from a tag's attribute list.
fn class_attribute(attrs: &str) -> String {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            return String::new();
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let mut value = None;
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (raw, remaining) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(quote) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            value = Some(raw);
            rest = remaining;
        }

        if name.eq_ignore_ascii_case("class") {
            return value.map(decode_entities).unwrap_or_default();
        }
    }
}

/// Decodes the named entities the editor emits plus numeric references.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let hex = number.strip_prefix('x').or_else(|| number.strip_prefix('X'));
            let code = match hex {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escapes text for use in element content or a double-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
