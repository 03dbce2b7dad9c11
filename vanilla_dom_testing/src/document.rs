// Copyright 2026 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use vanilla_dom::dom::{Document, Element, ListenerOptions, Node};
use vanilla_dom::{Error, Result};

use crate::events::{self, ListenerStore, TestEvent, TestListener};
use crate::{html, selector};

/// Index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

/// The document node sits at slot zero for the whole arena's life.
pub(crate) const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
    Fragment,
}

impl NodeKind {
    pub(crate) fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    // Insertion-ordered; serialization and tests observe the order.
    pub(crate) attrs: Vec<(String, String)>,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value.to_owned(),
            None => self.attrs.push((name, value.to_owned())),
        }
    }

    pub(crate) fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

pub(crate) struct DocumentInner {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) body: NodeId,
    pub(crate) listeners: ListenerStore,
    pub(crate) next_listener_id: u64,
}

impl DocumentInner {
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Unchecked parent/child wiring, for freshly allocated nodes.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != node);
        }
    }

    fn is_ancestor(&self, maybe_ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.nodes[node.0].parent;
        while let Some(id) = cursor {
            if id == maybe_ancestor {
                return true;
            }
            cursor = self.nodes[id.0].parent;
        }
        false
    }

    fn ensure_can_contain(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if matches!(self.nodes[parent.0].kind, NodeKind::Text(_)) {
            return Err(Error::Host(
                "hierarchy error: text nodes cannot contain children".to_owned(),
            ));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(Error::Host(
                "hierarchy error: node would contain itself".to_owned(),
            ));
        }
        Ok(())
    }

    fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if matches!(self.nodes[child.0].kind, NodeKind::Fragment) {
            // Fragments splice: their children move, the fragment stays
            // behind empty.
            let moved = self.nodes[child.0].children.clone();
            for &node in &moved {
                self.ensure_can_contain(parent, node)?;
            }
            self.nodes[child.0].children.clear();
            for &node in &moved {
                self.nodes[node.0].parent = Some(parent);
                self.nodes[parent.0].children.push(node);
            }
            return Ok(());
        }
        self.ensure_can_contain(parent, child)?;
        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    fn replace(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> Result<()> {
        let Some(position) = self.nodes[parent.0].children.iter().position(|&c| c == old) else {
            return Err(Error::Host(
                "replace_child: old node is not a child of this node".to_owned(),
            ));
        };
        if new == old {
            return Ok(());
        }
        if matches!(self.nodes[new.0].kind, NodeKind::Fragment) {
            let moved = self.nodes[new.0].children.clone();
            for &node in &moved {
                self.ensure_can_contain(parent, node)?;
            }
            self.nodes[new.0].children.clear();
            self.nodes[old.0].parent = None;
            self.nodes[parent.0]
                .children
                .splice(position..=position, moved.iter().copied());
            for &node in &moved {
                self.nodes[node.0].parent = Some(parent);
            }
        } else {
            self.ensure_can_contain(parent, new)?;
            self.detach(new);
            self.nodes[old.0].parent = None;
            self.nodes[parent.0].children[position] = new;
            self.nodes[new.0].parent = Some(parent);
        }
        Ok(())
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }
}

/// A headless document implementing the `vanilla_dom` capability traits.
///
/// Cheap to clone; clones are handles onto the same tree, like the
/// browser's global document object.
#[derive(Clone)]
pub struct TestDocument {
    pub(crate) inner: Rc<RefCell<DocumentInner>>,
}

impl TestDocument {
    /// An empty document: a document node containing `<html><body></body></html>`.
    pub fn new() -> Self {
        let mut inner = DocumentInner {
            nodes: Vec::new(),
            body: ROOT,
            listeners: ListenerStore::default(),
            next_listener_id: 0,
        };
        let root = inner.alloc(NodeKind::Document);
        let html = inner.alloc(NodeKind::Element(ElementData::new("html")));
        let body = inner.alloc(NodeKind::Element(ElementData::new("body")));
        inner.link(root, html);
        inner.link(html, body);
        inner.body = body;
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// A document whose body holds the (leniently) parsed `markup`.
    pub fn from_html(markup: &str) -> Self {
        let doc = Self::new();
        {
            let mut inner = doc.inner.borrow_mut();
            let body = inner.body;
            html::parse_into(&mut inner, body, markup);
        }
        doc
    }

    /// The `body` element.
    pub fn body(&self) -> TestElement {
        let body = self.inner.borrow().body;
        TestElement::from_id(self, body)
    }

    /// Whether `node` is attached to this document's tree.
    pub fn contains(&self, node: &TestNode) -> bool {
        if !Rc::ptr_eq(&self.inner, &node.doc) {
            return false;
        }
        let inner = self.inner.borrow();
        let mut cursor = Some(node.id);
        while let Some(id) = cursor {
            if id == ROOT {
                return true;
            }
            cursor = inner.nodes[id.0].parent;
        }
        false
    }

    /// Total listener registrations across the whole document.
    pub fn total_listener_count(&self) -> usize {
        self.inner.borrow().listeners.total()
    }

    /// Fire a synthetic `event` at the first element matching `selector`,
    /// running the capture, target, and bubble phases.
    ///
    /// Returns whether a target was found. Once-listeners are deregistered
    /// right before they run; the listener list of each node is
    /// snapshotted per phase, so handlers mutating registrations do not
    /// affect the in-flight event. A handler that re-enters dispatch and
    /// reaches *itself* recursively will panic.
    pub fn dispatch(&self, selector: &str, event: &str) -> bool {
        self.dispatch_inner(selector, event, None)
    }

    /// Like [`dispatch`](Self::dispatch), with a payload string the
    /// handler can read back via [`TestEvent::detail`].
    pub fn dispatch_with_detail(&self, selector: &str, event: &str, detail: &str) -> bool {
        self.dispatch_inner(selector, event, Some(detail.to_owned()))
    }

    fn dispatch_inner(&self, selector: &str, event: &str, detail: Option<String>) -> bool {
        let Some(target) = self.query_selector(selector) else {
            return false;
        };
        events::run_dispatch(self, target.node.id, event, detail);
        true
    }
}

impl Default for TestDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TestDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDocument")
            .field("nodes", &self.inner.borrow().nodes.len())
            .finish_non_exhaustive()
    }
}

impl Document for TestDocument {
    type Node = TestNode;
    type Element = TestElement;

    fn create_element(&self, tag: &str) -> Result<TestElement> {
        let valid = tag.as_bytes().first().is_some_and(u8::is_ascii_alphabetic)
            && tag.bytes().all(html::is_tag_char);
        if !valid {
            return Err(Error::Host(format!("invalid element name: {tag:?}")));
        }
        let id = self
            .inner
            .borrow_mut()
            .alloc(NodeKind::Element(ElementData::new(tag)));
        Ok(TestElement::from_id(self, id))
    }

    fn create_fragment(&self) -> TestNode {
        let id = self.inner.borrow_mut().alloc(NodeKind::Fragment);
        TestNode::from_id(self, id)
    }

    fn create_text(&self, data: &str) -> TestNode {
        let id = self
            .inner
            .borrow_mut()
            .alloc(NodeKind::Text(data.to_owned()));
        TestNode::from_id(self, id)
    }

    fn query_selector(&self, selector: &str) -> Option<TestElement> {
        let groups = match selector::parse_groups(selector) {
            Ok(groups) => groups,
            Err(selector::Unsupported) => {
                tracing::warn!(selector, "unsupported selector; treating as no match");
                return None;
            }
        };
        let found = selector::select_first(&self.inner.borrow(), &groups)?;
        Some(TestElement::from_id(self, found))
    }
}

/// Handle to one node in a [`TestDocument`].
///
/// `==` compares node identity (same document, same node), not structure.
#[derive(Clone)]
pub struct TestNode {
    pub(crate) doc: Rc<RefCell<DocumentInner>>,
    pub(crate) id: NodeId,
}

impl TestNode {
    pub(crate) fn from_id(doc: &TestDocument, id: NodeId) -> Self {
        Self {
            doc: Rc::clone(&doc.inner),
            id,
        }
    }

    /// The child nodes, in order.
    pub fn children(&self) -> Vec<Self> {
        let doc = self.doc.borrow();
        doc.nodes[self.id.0]
            .children
            .iter()
            .map(|&id| Self {
                doc: Rc::clone(&self.doc),
                id,
            })
            .collect()
    }

    /// The character data, if this is a text node.
    pub fn text(&self) -> Option<String> {
        match &self.doc.borrow().nodes[self.id.0].kind {
            NodeKind::Text(data) => Some(data.clone()),
            _ => None,
        }
    }

    /// This node as an element, if it is one.
    pub fn as_element(&self) -> Option<TestElement> {
        self.doc.borrow().nodes[self.id.0]
            .kind
            .is_element()
            .then(|| TestElement { node: self.clone() })
    }

    /// The node serialized as markup, children included.
    pub fn outer_html(&self) -> String {
        let doc = self.doc.borrow();
        let mut out = String::new();
        html::serialize_node(&doc, self.id, &mut out);
        out
    }
}

impl PartialEq for TestNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.doc, &other.doc) && self.id == other.id
    }
}

impl Eq for TestNode {}

impl fmt::Debug for TestNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.doc.borrow();
        let kind = match &doc.nodes[self.id.0].kind {
            NodeKind::Document => "document".to_owned(),
            NodeKind::Element(data) => format!("<{}>", data.tag),
            NodeKind::Text(data) => format!("text {data:?}"),
            NodeKind::Fragment => "fragment".to_owned(),
        };
        f.debug_struct("TestNode")
            .field("id", &self.id.0)
            .field("kind", &kind)
            .finish()
    }
}

impl Node for TestNode {
    fn parent(&self) -> Option<Self> {
        let parent = self.doc.borrow().nodes[self.id.0].parent?;
        Some(Self {
            doc: Rc::clone(&self.doc),
            id: parent,
        })
    }

    fn append_child(&self, child: &Self) -> Result<()> {
        if !Rc::ptr_eq(&self.doc, &child.doc) {
            return Err(Error::Host(
                "node belongs to a different document".to_owned(),
            ));
        }
        self.doc.borrow_mut().append(self.id, child.id)
    }

    fn replace_child(&self, new: &Self, old: &Self) -> Result<Self> {
        if !Rc::ptr_eq(&self.doc, &new.doc) || !Rc::ptr_eq(&self.doc, &old.doc) {
            return Err(Error::Host(
                "node belongs to a different document".to_owned(),
            ));
        }
        self.doc.borrow_mut().replace(self.id, new.id, old.id)?;
        Ok(old.clone())
    }
}

/// Handle to one element in a [`TestDocument`].
#[derive(Clone, PartialEq, Eq)]
pub struct TestElement {
    pub(crate) node: TestNode,
}

impl TestElement {
    pub(crate) fn from_id(doc: &TestDocument, id: NodeId) -> Self {
        Self {
            node: TestNode::from_id(doc, id),
        }
    }

    pub(crate) fn from_parts(doc: &Rc<RefCell<DocumentInner>>, id: NodeId) -> Self {
        Self {
            node: TestNode {
                doc: Rc::clone(doc),
                id,
            },
        }
    }

    fn with_data<R>(&self, read: impl FnOnce(&ElementData) -> R) -> R {
        let doc = self.node.doc.borrow();
        let data = doc
            .element(self.node.id)
            .unwrap_or_else(|| unreachable!("TestElement always wraps an element node"));
        read(data)
    }

    /// The (lowercased) tag name.
    pub fn tag(&self) -> String {
        self.with_data(|data| data.tag.clone())
    }

    /// The value of attribute `name`, if set.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.with_data(|data| data.attr(name).map(str::to_owned))
    }

    /// All attributes, in the order they were first set.
    pub fn attrs(&self) -> Vec<(String, String)> {
        self.with_data(|data| data.attrs.clone())
    }

    /// The class tokens, in order.
    pub fn classes(&self) -> Vec<String> {
        self.with_data(|data| data.classes().map(str::to_owned).collect())
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.with_data(|data| data.classes().any(|token| token == class))
    }

    /// The child nodes, in order.
    pub fn children(&self) -> Vec<TestNode> {
        self.node.children()
    }

    /// The element children, in order.
    pub fn child_elements(&self) -> Vec<Self> {
        self.node
            .children()
            .into_iter()
            .filter_map(|child| child.as_element())
            .collect()
    }

    /// The children serialized as markup.
    pub fn inner_html(&self) -> String {
        let doc = self.node.doc.borrow();
        let mut out = String::new();
        for &child in &doc.nodes[self.node.id.0].children {
            html::serialize_node(&doc, child, &mut out);
        }
        out
    }

    /// The element serialized as markup, children included.
    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }

    /// The concatenated data of all descendant text nodes.
    pub fn text_content(&self) -> String {
        fn collect(doc: &DocumentInner, id: NodeId, out: &mut String) {
            match &doc.nodes[id.0].kind {
                NodeKind::Text(data) => out.push_str(data),
                _ => {
                    for &child in &doc.nodes[id.0].children {
                        collect(doc, child, out);
                    }
                }
            }
        }
        let doc = self.node.doc.borrow();
        let mut out = String::new();
        collect(&doc, self.node.id, &mut out);
        out
    }

    /// Listener registrations on this element.
    pub fn listener_count(&self) -> usize {
        self.node.doc.borrow().listeners.count_for(self.node.id)
    }
}

impl fmt::Debug for TestElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TestElement").field(&self.node).finish()
    }
}

impl Element for TestElement {
    type Node = TestNode;
    type Event = TestEvent;
    type Listener = TestListener;

    fn as_node(&self) -> &TestNode {
        &self.node
    }

    fn into_node(self) -> TestNode {
        self.node
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || !name.bytes().all(html::is_attr_name_char) {
            return Err(Error::Host(format!("invalid attribute name: {name:?}")));
        }
        let mut doc = self.node.doc.borrow_mut();
        let Some(data) = doc.element_mut(self.node.id) else {
            return Err(Error::Host("attribute on non-element node".to_owned()));
        };
        data.set_attr(name, value);
        Ok(())
    }

    fn add_class(&self, class: &str) -> Result<()> {
        if class.is_empty() {
            return Err(Error::Host("empty class token".to_owned()));
        }
        if class.contains(|ch: char| ch.is_ascii_whitespace()) {
            return Err(Error::Host(format!(
                "class token contains whitespace: {class:?}"
            )));
        }
        let mut doc = self.node.doc.borrow_mut();
        let Some(data) = doc.element_mut(self.node.id) else {
            return Err(Error::Host("class on non-element node".to_owned()));
        };
        if data.classes().any(|token| token == class) {
            return Ok(());
        }
        let mut list = data.attr("class").unwrap_or("").to_owned();
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(class);
        data.set_attr("class", &list);
        Ok(())
    }

    fn set_inner_html(&self, markup: &str) {
        let mut doc = self.node.doc.borrow_mut();
        let children = std::mem::take(&mut doc.nodes[self.node.id.0].children);
        for child in children {
            doc.nodes[child.0].parent = None;
        }
        html::parse_into(&mut doc, self.node.id, markup);
    }

    fn add_listener(
        &self,
        event: &str,
        options: ListenerOptions,
        callback: Box<dyn FnMut(TestEvent)>,
    ) -> TestListener {
        events::register(self, event, options, callback)
    }
}
