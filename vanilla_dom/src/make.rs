// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

use crate::CowStr;
use crate::dom::{Document, Element, Node, NodeOf};
use crate::error::Result;
use crate::tag::{TagSpec, split_spec};

/// One entry in a child list: an existing node, or text.
///
/// Nodes convert with `From`/`Into`; for strings use [`text`], which keeps
/// the two cases impossible to mix up. Text children are created through
/// the host's text-node factory and therefore never parsed as markup.
#[derive(Debug)]
pub enum Child<N> {
    /// An already-built node, appended as-is.
    Node(N),
    /// Character data, appended as a fresh text node.
    Text(CowStr),
}

impl<N> From<N> for Child<N> {
    fn from(node: N) -> Self {
        Self::Node(node)
    }
}

/// A text child for [`make`].
pub fn text<N>(data: impl Into<CowStr>) -> Child<N> {
    Child::Text(data.into())
}

/// Build an unattached element (or fragment) in one call.
///
/// The specifier is split on `.`: the first segment names the element,
/// every further segment becomes a class, in order. Attributes are applied
/// in slice order, children appended in list order. With
/// [`FRAGMENT`](crate::FRAGMENT) an empty fragment is built instead;
/// fragments take no classes or attributes, and attaching one later
/// splices its children into the new parent.
///
/// Errors on an empty element name or class segment (`""`, `".x"`,
/// `"div."`), and when the host rejects a name.
///
/// ```
/// use vanilla_dom::{FRAGMENT, make, text};
/// use vanilla_dom_testing::TestDocument;
///
/// # fn main() -> vanilla_dom::Result<()> {
/// let doc = TestDocument::new();
///
/// let button = make(&doc, "button.wide.primary", &[("id", "go")], [text("Go")])?;
///
/// let cells = make(&doc, FRAGMENT, &[], [
///     make(&doc, "td", &[], [text("a")])?.into(),
///     make(&doc, "td", &[], [text("b")])?.into(),
/// ])?;
/// # let _ = (button, cells);
/// # Ok(())
/// # }
/// ```
pub fn make<'a, D: Document>(
    doc: &D,
    spec: impl Into<TagSpec<'a>>,
    attrs: &[(&str, &str)],
    children: impl IntoIterator<Item = Child<NodeOf<D>>>,
) -> Result<NodeOf<D>> {
    let node = match spec.into() {
        TagSpec::Fragment => doc.create_fragment(),
        TagSpec::Tag(spec) => {
            let (name, classes) = split_spec(spec)?;
            let element = doc.create_element(name)?;
            for class in classes {
                element.add_class(class)?;
            }
            for (name, value) in attrs {
                element.set_attribute(name, value)?;
            }
            element.into_node()
        }
    };
    for child in children {
        let child = match child {
            Child::Node(node) => node,
            Child::Text(data) => doc.create_text(&data),
        };
        node.append_child(&child)?;
    }
    Ok(node)
}

/// Build a `span` whose content is the *unescaped* parse of `markup`.
///
/// This is the deliberate escape hatch from [`make`]'s text handling:
/// string children there become inert character data, while everything
/// passed here is handed to the host's HTML parser as-is. Never feed it
/// untrusted input.
pub fn raw_html<D: Document>(doc: &D, markup: &str) -> Result<NodeOf<D>> {
    let span = doc.create_element("span")?;
    span.set_inner_html(markup);
    Ok(span.into_node())
}
