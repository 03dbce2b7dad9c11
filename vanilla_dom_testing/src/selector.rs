// Copyright 2026 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! The selector subset: tag, `*`, `#id`, `.class`, attribute conditions
//! (`[attr]`, `=`, `^=`, `$=`, `*=`), descendant and `>` combinators,
//! comma groups. Pseudo-classes and sibling combinators are out; parsing
//! them yields [`Unsupported`], which the document turns into "matches
//! nothing".

use crate::document::{DocumentInner, NodeId, ROOT};

/// The selector uses syntax this engine does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unsupported;

type ParseResult<T> = Result<T, Unsupported>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrCondition {
    Exists { name: String },
    Eq { name: String, value: String },
    Prefix { name: String, value: String },
    Suffix { name: String, value: String },
    Substring { name: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Step {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    step: Step,
    // Relation to the previous (left) part; `None` on the first.
    combinator: Option<Combinator>,
}

pub(crate) fn parse_groups(selector: &str) -> ParseResult<Vec<Vec<Part>>> {
    let mut groups = Vec::new();
    for group in split_groups(selector)? {
        groups.push(parse_chain(&group)?);
    }
    Ok(groups)
}

fn split_groups(selector: &str) -> ParseResult<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0_usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                bracket_depth = bracket_depth.checked_sub(1).ok_or(Unsupported)?;
                current.push(ch);
            }
            ',' if bracket_depth == 0 => {
                if current.trim().is_empty() {
                    return Err(Unsupported);
                }
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 || current.trim().is_empty() {
        return Err(Unsupported);
    }
    groups.push(current);
    Ok(groups)
}

fn parse_chain(selector: &str) -> ParseResult<Vec<Part>> {
    let mut parts = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(selector)? {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return Err(Unsupported);
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part {
            step: parse_step(&token)?,
            combinator,
        });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(Unsupported);
    }
    Ok(parts)
}

fn tokenize(selector: &str) -> ParseResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0_usize;

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        let token = current.trim();
        if !token.is_empty() {
            tokens.push(token.to_owned());
        }
        current.clear();
    };

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                bracket_depth = bracket_depth.checked_sub(1).ok_or(Unsupported)?;
                current.push(ch);
            }
            '>' if bracket_depth == 0 => {
                flush(&mut current, &mut tokens);
                tokens.push(">".to_owned());
            }
            '+' | '~' | '(' | ')' if bracket_depth == 0 => return Err(Unsupported),
            ch if ch.is_ascii_whitespace() && bracket_depth == 0 => {
                flush(&mut current, &mut tokens);
            }
            _ => current.push(ch),
        }
    }
    if bracket_depth != 0 {
        return Err(Unsupported);
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

fn parse_step(token: &str) -> ParseResult<Step> {
    let bytes = token.as_bytes();
    let mut i = 0_usize;
    let mut step = Step::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() {
                    return Err(Unsupported);
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_ident(token, i + 1).ok_or(Unsupported)?;
                if step.id.replace(id).is_some() {
                    return Err(Unsupported);
                }
                i = next;
            }
            b'.' => {
                let (class, next) = parse_ident(token, i + 1).ok_or(Unsupported)?;
                step.classes.push(class);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_attr_condition(token, i)?;
                step.attrs.push(attr);
                i = next;
            }
            _ => {
                if step.tag.is_some()
                    || step.universal
                    || step.id.is_some()
                    || !step.classes.is_empty()
                    || !step.attrs.is_empty()
                {
                    return Err(Unsupported);
                }
                let (tag, next) = parse_ident(token, i).ok_or(Unsupported)?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step == Step::default() {
        return Err(Unsupported);
    }
    Ok(step)
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    (end > start).then(|| (src[start..end].to_owned(), end))
}

fn parse_attr_condition(src: &str, open_bracket: usize) -> ParseResult<(AttrCondition, usize)> {
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let (name, next) = parse_ident(src, i).ok_or(Unsupported)?;
    let name = name.to_ascii_lowercase();
    i = next;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    match bytes.get(i) {
        Some(b']') => return Ok((AttrCondition::Exists { name }, i + 1)),
        Some(_) => {}
        None => return Err(Unsupported),
    }

    let make_condition: fn(String, String) -> AttrCondition = match bytes[i] {
        b'=' => {
            i += 1;
            |name, value| AttrCondition::Eq { name, value }
        }
        b'^' if bytes.get(i + 1) == Some(&b'=') => {
            i += 2;
            |name, value| AttrCondition::Prefix { name, value }
        }
        b'$' if bytes.get(i + 1) == Some(&b'=') => {
            i += 2;
            |name, value| AttrCondition::Suffix { name, value }
        }
        b'*' if bytes.get(i + 1) == Some(&b'=') => {
            i += 2;
            |name, value| AttrCondition::Substring { name, value }
        }
        _ => return Err(Unsupported),
    };

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let (value, next) = parse_attr_value(src, i)?;
    i = next;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b']') {
        return Err(Unsupported);
    }
    Ok((make_condition(name, value), i + 1))
}

fn parse_attr_value(src: &str, start: usize) -> ParseResult<(String, usize)> {
    let bytes = src.as_bytes();
    match bytes.get(start) {
        Some(&quote @ (b'"' | b'\'')) => {
            let mut end = start + 1;
            while end < bytes.len() && bytes[end] != quote {
                end += 1;
            }
            if end >= bytes.len() {
                return Err(Unsupported);
            }
            Ok((src[start + 1..end].to_owned(), end + 1))
        }
        Some(_) => {
            let mut end = start;
            while end < bytes.len() && bytes[end] != b']' && !bytes[end].is_ascii_whitespace() {
                end += 1;
            }
            if end == start {
                return Err(Unsupported);
            }
            Ok((src[start..end].to_owned(), end))
        }
        None => Err(Unsupported),
    }
}

/// First element in document order matching any of `groups`.
pub(crate) fn select_first(doc: &DocumentInner, groups: &[Vec<Part>]) -> Option<NodeId> {
    fn walk(doc: &DocumentInner, node: NodeId, groups: &[Vec<Part>]) -> Option<NodeId> {
        if doc.nodes[node.0].kind.is_element()
            && groups.iter().any(|parts| matches_chain(doc, node, parts))
        {
            return Some(node);
        }
        for &child in &doc.nodes[node.0].children {
            if let Some(found) = walk(doc, child, groups) {
                return Some(found);
            }
        }
        None
    }
    walk(doc, ROOT, groups)
}

fn matches_chain(doc: &DocumentInner, node: NodeId, parts: &[Part]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !step_matches(doc, node, &last.step) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match last.combinator {
        Some(Combinator::Child) => {
            parent_element(doc, node).is_some_and(|parent| matches_chain(doc, parent, rest))
        }
        Some(Combinator::Descendant) => {
            let mut cursor = parent_element(doc, node);
            while let Some(ancestor) = cursor {
                if matches_chain(doc, ancestor, rest) {
                    return true;
                }
                cursor = parent_element(doc, ancestor);
            }
            false
        }
        // The first part has nothing to its left.
        None => true,
    }
}

fn parent_element(doc: &DocumentInner, node: NodeId) -> Option<NodeId> {
    let parent = doc.nodes[node.0].parent?;
    doc.nodes[parent.0].kind.is_element().then_some(parent)
}

fn step_matches(doc: &DocumentInner, node: NodeId, step: &Step) -> bool {
    let Some(element) = doc.element(node) else {
        return false;
    };
    if let Some(tag) = &step.tag {
        if element.tag != *tag {
            return false;
        }
    }
    if let Some(id) = &step.id {
        if element.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !step
        .classes
        .iter()
        .all(|class| element.classes().any(|token| token == class))
    {
        return false;
    }
    step.attrs.iter().all(|condition| match condition {
        AttrCondition::Exists { name } => element.attr(name).is_some(),
        AttrCondition::Eq { name, value } => element.attr(name) == Some(value.as_str()),
        // Per CSS, the prefix/suffix/substring operators never match an
        // empty value.
        AttrCondition::Prefix { name, value } => {
            !value.is_empty() && element.attr(name).is_some_and(|attr| attr.starts_with(value))
        }
        AttrCondition::Suffix { name, value } => {
            !value.is_empty() && element.attr(name).is_some_and(|attr| attr.ends_with(value))
        }
        AttrCondition::Substring { name, value } => {
            !value.is_empty() && element.attr(name).is_some_and(|attr| attr.contains(value))
        }
    })
}

#[cfg(test)]
mod tests {
    use crate::TestDocument;
    use vanilla_dom::{Document, Element};

    fn first_match(markup: &str, selector: &str) -> Option<String> {
        let doc = TestDocument::from_html(markup);
        doc.query_selector(selector).map(|el| {
            el.attr("data-name").unwrap_or_else(|| el.tag())
        })
    }

    #[test]
    fn tag_and_universal() {
        let markup = r#"<div data-name="a"><span data-name="b"></span></div>"#;
        assert_eq!(first_match(markup, "span"), Some("b".to_owned()));
        // Tag names compare ASCII case-insensitively.
        assert_eq!(first_match(markup, "SPAN"), Some("b".to_owned()));
        assert_eq!(first_match(markup, "*"), Some("html".to_owned()));
    }

    #[test]
    fn id_and_class() {
        let markup =
            r#"<p id="x" class="lead big" data-name="a"></p><p class="lead" data-name="b"></p>"#;
        assert_eq!(first_match(markup, "#x"), Some("a".to_owned()));
        assert_eq!(first_match(markup, ".lead"), Some("a".to_owned()));
        assert_eq!(first_match(markup, "p.lead.big"), Some("a".to_owned()));
        assert_eq!(first_match(markup, ".missing"), None);
    }

    #[test]
    fn attribute_conditions() {
        let markup = r#"<a href="https://example.com/guide" data-name="a"></a>"#;
        assert_eq!(first_match(markup, "[href]"), Some("a".to_owned()));
        assert_eq!(
            first_match(markup, r#"a[href^="https:"]"#),
            Some("a".to_owned())
        );
        assert_eq!(first_match(markup, "[href$=guide]"), Some("a".to_owned()));
        assert_eq!(first_match(markup, "[href*=example]"), Some("a".to_owned()));
        assert_eq!(first_match(markup, "[href=guide]"), None);
        assert_eq!(first_match(markup, r#"[href^=""]"#), None);
    }

    #[test]
    fn combinators() {
        let markup = r#"<ul><li data-name="a"><span data-name="b"></span></li></ul>"#;
        assert_eq!(first_match(markup, "ul span"), Some("b".to_owned()));
        assert_eq!(first_match(markup, "ul > li"), Some("a".to_owned()));
        assert_eq!(first_match(markup, "ul > span"), None);
        assert_eq!(first_match(markup, "body ul li span"), Some("b".to_owned()));
    }

    #[test]
    fn groups_pick_first_in_document_order() {
        let markup = r#"<i data-name="a"></i><b data-name="b"></b>"#;
        assert_eq!(first_match(markup, "b, i"), Some("a".to_owned()));
    }

    #[test]
    fn unsupported_syntax_matches_nothing() {
        let markup = r#"<li data-name="a"></li>"#;
        assert_eq!(first_match(markup, "li:first-child"), None);
        assert_eq!(first_match(markup, "li + li"), None);
        assert_eq!(first_match(markup, ""), None);
        assert_eq!(first_match(markup, "li,"), None);
    }

    #[test]
    fn matches_only_the_attached_tree() {
        let doc = TestDocument::from_html(r#"<div id="here"></div>"#);
        let loose = doc.create_element("div").unwrap();
        loose.set_attribute("id", "loose").unwrap();
        assert!(doc.query_selector("#here").is_some());
        assert!(doc.query_selector("#loose").is_none());
    }
}
