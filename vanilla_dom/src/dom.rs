// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! The capability traits the operations are written against.
//!
//! This is the smallest slice of a retained document tree the six
//! operations need: create nodes, resolve a selector, manage listeners,
//! swap children. [`crate::web`] implements it for the browser document;
//! `vanilla_dom_testing` implements it for a headless arena document.
//! Nothing here knows about views, diffing, or rendering.

use crate::error::Result;

/// A handle to a document: the factory and lookup half of the capability
/// surface.
///
/// Implementations are cheap handles onto shared host state, so all
/// methods take `&self`.
pub trait Document {
    /// The common node currency: elements, text nodes, and fragments.
    type Node: Node;
    /// The element type; upcasts into [`Self::Node`].
    type Element: Element<Node = Self::Node>;

    /// Create an unattached element.
    ///
    /// Hosts reject malformed names, hence the `Result`.
    fn create_element(&self, tag: &str) -> Result<Self::Element>;

    /// Create an empty fragment.
    ///
    /// Appending a fragment to a parent moves the fragment's children into
    /// the parent and leaves the fragment empty.
    fn create_fragment(&self) -> Self::Node;

    /// Create a text node holding `data` verbatim; the data is never
    /// interpreted as markup.
    fn create_text(&self, data: &str) -> Self::Node;

    /// First element matching `selector` in document order, searching only
    /// the attached tree.
    ///
    /// A selector the host cannot parse matches nothing.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;
}

/// Structural operations shared by every node kind.
pub trait Node: Clone {
    /// The parent node, if this node is attached to one.
    fn parent(&self) -> Option<Self>;

    /// Append `child` as the last child, detaching it from any previous
    /// parent. Appending a fragment splices the fragment's children in.
    fn append_child(&self, child: &Self) -> Result<()>;

    /// Replace the child `old` with `new` and return `old`, now detached.
    ///
    /// Errors if `old` is not a child of this node.
    fn replace_child(&self, new: &Self, old: &Self) -> Result<Self>;
}

/// Element-only operations: attributes, classes, markup, listeners.
pub trait Element: Clone {
    /// The node type this element upcasts into.
    type Node: Node;
    /// The host event payload delivered to listeners.
    type Event: 'static;
    /// Registration handle; see [`ListenerHandle`].
    type Listener: ListenerHandle;

    /// Borrow this element as a plain node.
    fn as_node(&self) -> &Self::Node;

    /// Upcast into a plain node.
    fn into_node(self) -> Self::Node;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&self, name: &str, value: &str) -> Result<()>;

    /// Add one class token. Adding a token the element already has is a
    /// no-op; empty or whitespace-containing tokens are host errors.
    fn add_class(&self, class: &str) -> Result<()>;

    /// Replace this element's children with the parse of `markup`.
    ///
    /// The markup is *not* escaped; host parsing is lenient and never
    /// fails.
    fn set_inner_html(&self, markup: &str);

    /// Register `callback` for `event` occurrences on this element.
    ///
    /// The listener stays registered for as long as the returned handle is
    /// alive (or forever, if the handle is [forgotten]).
    ///
    /// [forgotten]: ListenerHandle::forget
    fn add_listener(
        &self,
        event: &str,
        options: ListenerOptions,
        callback: Box<dyn FnMut(Self::Event)>,
    ) -> Self::Listener;
}

/// Keeps a registered listener alive; dropping it deregisters the
/// listener.
pub trait ListenerHandle {
    /// Consume the handle and leave the listener attached for the rest of
    /// its target's life.
    fn forget(self);
}

/// How a listener participates in event propagation.
///
/// Mirrors the host's `AddEventListenerOptions`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Deliver the event on the capture phase (ancestors before target)
    /// instead of the bubble phase. (default = `false`)
    pub capture: bool,
    /// Deregister the listener right before its first invocation.
    /// (default = `false`)
    pub once: bool,
}

impl ListenerOptions {
    /// Bubble-phase, repeating listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the listener runs on the capture phase, *before* the event
    /// reaches targets beneath it in the tree. (default = `false`)
    pub fn capture(mut self, value: bool) -> Self {
        self.capture = value;
        self
    }

    /// Whether the listener deregisters itself after one delivery.
    /// (default = `false`)
    pub fn once(mut self, value: bool) -> Self {
        self.once = value;
        self
    }
}

/// The node type of a document.
pub type NodeOf<D> = <D as Document>::Node;
/// The element type of a document.
pub type ElementOf<D> = <D as Document>::Element;
/// The event payload type delivered by a document's elements.
pub type EventOf<D> = <<D as Document>::Element as Element>::Event;
