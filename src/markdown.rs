//! Markdown rendering and the HTML allow-list for literal content.
//!
//! Literal values may carry Markdown (and stray HTML). Rendered output is
//! restricted to a fixed set of tags; `a` is the only tag that keeps
//! attributes. Everything else is escaped rather than dropped, so no
//! literal content silently disappears.

use pulldown_cmark::{Parser, html::push_html};

use crate::html::{escape_attribute, escape_text};

/// Tags allowed through the sanitizer.
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "br", "em", "h1", "h2", "h3", "hr", "i", "li", "ol", "p", "strong", "sub", "sup",
    "ul",
];

/// Attributes kept on `a` elements. No other element keeps attributes.
const ALLOWED_A_ATTRIBUTES: &[&str] = &["href", "name", "target", "title", "rel"];

/// Render Markdown to HTML. Inline/raw HTML passes through untouched;
/// callers wanting safe output run the result through [`sanitize`].
pub fn markdown_to_html(source: &str) -> String {
    let parser = Parser::new(source);
    let mut out = String::new();
    push_html(&mut out, parser);
    out
}

/// Filter an HTML fragment against the allow-list.
///
/// Allowed tags are re-emitted with their permitted attributes; anything
/// else (unknown tags, comments, processing instructions) is escaped in
/// place. Text content and typographic whitespace pass through verbatim.
pub fn sanitize(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let Some(end) = rest.find('>') else {
            // unterminated tag, escape the remainder
            out.push_str(&escape_text(rest));
            return out;
        };

        let tag = &rest[..=end];
        match rewrite_tag(tag) {
            Some(rewritten) => out.push_str(&rewritten),
            None => out.push_str(&escape_text(tag)),
        }
        rest = &rest[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Render Markdown and sanitize the result.
pub fn sanitized_markdown(source: &str) -> String {
    sanitize(&markdown_to_html(source))
}

/// Re-emit a single `<...>` chunk if its tag is allowed, else `None`.
fn rewrite_tag(tag: &str) -> Option<String> {
    let inner = tag.strip_prefix('<')?.strip_suffix('>')?.trim();
    let inner = inner.strip_suffix('/').unwrap_or(inner).trim();

    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest.trim()),
        None => (false, inner),
    };

    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }

    if closing {
        return Some(format!("</{name}>"));
    }

    let mut out = format!("<{name}");
    if name == "a" {
        for (attr, value) in parse_attributes(&inner[name_end..]) {
            if ALLOWED_A_ATTRIBUTES.contains(&attr.as_str()) {
                out.push_str(&format!(" {attr}=\"{}\"", escape_attribute(&value)));
            }
        }
    }
    out.push('>');
    Some(out)
}

/// Parse `name="value"` / `name='value'` / bare-name attributes.
fn parse_attributes(source: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        // attribute name
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        let name = source[start..end].to_ascii_lowercase();
        if name.is_empty() {
            break;
        }

        // skip whitespace before a possible '='
        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }

        if chars.peek().is_none_or(|&(_, c)| c != '=') {
            attributes.push((name, String::new()));
            continue;
        }
        chars.next(); // consume '='
        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let value = match chars.peek() {
            Some(&(vstart, quote @ ('"' | '\''))) => {
                chars.next();
                let mut vend = vstart + 1;
                for (i, c) in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    vend = i + c.len_utf8();
                }
                source[vstart + 1..vend].to_string()
            }
            Some(&(vstart, _)) => {
                let mut vend = vstart;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    vend = i + c.len_utf8();
                    chars.next();
                }
                source[vstart..vend].to_string()
            }
            None => String::new(),
        };

        attributes.push((name, value));
    }

    attributes
}
