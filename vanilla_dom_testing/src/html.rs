// Copyright 2026 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! Lenient markup parsing and serialization for the headless document.
//!
//! The parser never fails: mismatched close tags are ignored, open
//! elements auto-close at end of input, stray `<` becomes text. This
//! mirrors how browsers treat `innerHTML` assignment closely enough for
//! test fixtures.

use crate::document::{DocumentInner, ElementData, NodeId, NodeKind};

pub(crate) fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

pub(crate) fn is_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Parse `markup` and append the resulting nodes to `parent`.
pub(crate) fn parse_into(inner: &mut DocumentInner, parent: NodeId, markup: &str) {
    let mut stack = vec![parent];
    let mut text = String::new();
    let mut i = 0;

    while i < markup.len() {
        let rest = &markup[i..];
        let Some(offset) = rest.find('<') else {
            text.push_str(rest);
            break;
        };
        text.push_str(&rest[..offset]);
        i += offset;

        let tail = &markup[i..];
        if tail.starts_with("<!--") {
            flush_text(inner, &stack, &mut text);
            i += match tail.find("-->") {
                Some(end) => end + 3,
                None => tail.len(),
            };
        } else if tail.starts_with("<!") || tail.starts_with("<?") {
            // Doctypes, processing instructions and other declarations
            // produce no nodes.
            flush_text(inner, &stack, &mut text);
            i += skip_past_gt(tail);
        } else if let Some(after) = tail.strip_prefix("</") {
            let name_len = ident_len(after);
            if name_len == 0 {
                // Bogus end tag such as `</>`; swallow it whole.
                i += skip_past_gt(tail);
            } else {
                flush_text(inner, &stack, &mut text);
                let name = after[..name_len].to_ascii_lowercase();
                close_tag(inner, &mut stack, &name);
                i += skip_past_gt(tail);
            }
        } else if tail.as_bytes().get(1).is_some_and(u8::is_ascii_alphabetic) {
            flush_text(inner, &stack, &mut text);
            let start = parse_start_tag(tail);
            let keep_open = !start.self_closing && !is_void_tag(&start.data.tag);
            let id = inner.alloc(NodeKind::Element(start.data));
            let top = stack.last().copied().unwrap_or(parent);
            inner.link(top, id);
            if keep_open {
                stack.push(id);
            }
            i += start.consumed;
        } else {
            // A `<` starting nothing that looks like a tag is text.
            text.push('<');
            i += 1;
        }
    }

    flush_text(inner, &stack, &mut text);
}

fn flush_text(inner: &mut DocumentInner, stack: &[NodeId], text: &mut String) {
    if text.is_empty() {
        return;
    }
    let Some(&top) = stack.last() else {
        return;
    };
    let data = decode_entities(text);
    text.clear();
    let id = inner.alloc(NodeKind::Text(data));
    inner.link(top, id);
}

fn skip_past_gt(tail: &str) -> usize {
    match tail.find('>') {
        Some(end) => end + 1,
        None => tail.len(),
    }
}

fn ident_len(src: &str) -> usize {
    src.bytes().take_while(|&b| is_tag_char(b)).count()
}

/// Close the innermost open element named `name`, and everything nested
/// inside it. Unmatched close tags do nothing; the base of the stack is
/// never popped.
fn close_tag(inner: &DocumentInner, stack: &mut Vec<NodeId>, name: &str) {
    for idx in (1..stack.len()).rev() {
        let found = inner
            .element(stack[idx])
            .is_some_and(|data| data.tag == name);
        if found {
            stack.truncate(idx);
            return;
        }
    }
}

struct StartTag {
    data: ElementData,
    self_closing: bool,
    consumed: usize,
}

/// Parse `<name attr=value ...>` at the start of `src`. The caller has
/// checked that `src` begins with `<` followed by an ASCII letter.
fn parse_start_tag(src: &str) -> StartTag {
    let bytes = src.as_bytes();
    let mut i = 1;
    let name_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let mut data = ElementData::new(&src[name_start..i]);
    let mut self_closing = false;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => break,
            Some(b'>') => {
                i += 1;
                break;
            }
            Some(b'/') => {
                if bytes.get(i + 1) == Some(&b'>') {
                    self_closing = true;
                    i += 2;
                    break;
                }
                i += 1;
            }
            Some(_) => {
                let attr_start = i;
                while i < bytes.len() && is_attr_name_char(bytes[i]) {
                    i += 1;
                }
                if i == attr_start {
                    // Junk byte; step over one whole character.
                    i += src[i..].chars().next().map_or(1, char::len_utf8);
                    continue;
                }
                let name = src[attr_start..i].to_ascii_lowercase();
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let value = if bytes.get(i) == Some(&b'=') {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    match bytes.get(i) {
                        Some(&quote @ (b'"' | b'\'')) => {
                            let start = i + 1;
                            let mut end = start;
                            while end < bytes.len() && bytes[end] != quote {
                                end += 1;
                            }
                            i = (end + 1).min(bytes.len());
                            decode_entities(&src[start..end])
                        }
                        _ => {
                            let start = i;
                            while i < bytes.len()
                                && bytes[i] != b'>'
                                && !bytes[i].is_ascii_whitespace()
                            {
                                i += 1;
                            }
                            decode_entities(&src[start..i])
                        }
                    }
                } else {
                    String::new()
                };
                // The first occurrence of a duplicated attribute wins.
                if data.attr(&name).is_none() {
                    data.set_attr(&name, &value);
                }
            }
        }
    }

    StartTag {
        data,
        self_closing,
        consumed: i,
    }
}

fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_entity(rest) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
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

/// Decode one character reference at the start of `src` (which begins
/// with `&`). Unknown or malformed references are left literal.
fn decode_entity(src: &str) -> Option<(char, usize)> {
    let semicolon = src.find(';')?;
    let name = &src[1..semicolon];
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let hex = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"));
            let code = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((ch, semicolon + 1))
}

/// Serialize `id` (children included) as markup, appending to `out`.
pub(crate) fn serialize_node(doc: &DocumentInner, id: NodeId, out: &mut String) {
    match &doc.nodes[id.0].kind {
        NodeKind::Document | NodeKind::Fragment => {
            for &child in &doc.nodes[id.0].children {
                serialize_node(doc, child, out);
            }
        }
        NodeKind::Text(data) => escape_text(data, out),
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(&data.tag);
            for (name, value) in &data.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');
            if is_void_tag(&data.tag) {
                return;
            }
            for &child in &doc.nodes[id.0].children {
                serialize_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        }
    }
}

fn escape_text(data: &str, out: &mut String) {
    for ch in data.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
