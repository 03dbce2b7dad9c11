// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! The browser backend: the capability traits implemented directly on
//! [`web_sys`] types.
//!
//! Everything here drives the live browser document, so it only functions
//! on `wasm32` inside a page. It still compiles on other targets, which
//! keeps docs builds and downstream host-generic code target-independent;
//! off-browser the entry helpers below panic.

use std::fmt;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt};
use web_sys::AddEventListenerOptions;

use crate::dom::{Document, Element, ListenerHandle, ListenerOptions, Node};
use crate::error::{Error, Result};

/// Helper to get the HTML document.
///
/// # Panics
///
/// Outside a browser page (no global `window`).
pub fn document() -> web_sys::Document {
    let window = web_sys::window().expect("no global `window` exists");
    window.document().expect("should have a document on window")
}

/// Helper to get the HTML document's body.
///
/// # Panics
///
/// Outside a browser page.
pub fn document_body() -> web_sys::HtmlElement {
    document().body().expect("HTML document missing body")
}

fn host_error(err: JsValue) -> Error {
    Error::Host(format!("{err:?}"))
}

impl Document for web_sys::Document {
    type Node = web_sys::Node;
    type Element = web_sys::Element;

    fn create_element(&self, tag: &str) -> Result<web_sys::Element> {
        web_sys::Document::create_element(self, tag).map_err(host_error)
    }

    fn create_fragment(&self) -> web_sys::Node {
        self.create_document_fragment().into()
    }

    fn create_text(&self, data: &str) -> web_sys::Node {
        self.create_text_node(data).into()
    }

    fn query_selector(&self, selector: &str) -> Option<web_sys::Element> {
        match web_sys::Document::query_selector(self, selector) {
            Ok(found) => found,
            // An unparseable selector matches nothing, like a missing one.
            Err(err) => {
                web_sys::console::warn_1(&err);
                None
            }
        }
    }
}

impl Node for web_sys::Node {
    fn parent(&self) -> Option<Self> {
        self.parent_node()
    }

    fn append_child(&self, child: &Self) -> Result<()> {
        web_sys::Node::append_child(self, child)
            .map(drop)
            .map_err(host_error)
    }

    fn replace_child(&self, new: &Self, old: &Self) -> Result<Self> {
        web_sys::Node::replace_child(self, new, old).map_err(host_error)
    }
}

impl Element for web_sys::Element {
    type Node = web_sys::Node;
    type Event = web_sys::Event;
    type Listener = WebListener;

    fn as_node(&self) -> &web_sys::Node {
        self.as_ref()
    }

    fn into_node(self) -> web_sys::Node {
        self.into()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        web_sys::Element::set_attribute(self, name, value).map_err(host_error)
    }

    fn add_class(&self, class: &str) -> Result<()> {
        self.class_list().add_1(class).map_err(host_error)
    }

    fn set_inner_html(&self, markup: &str) {
        web_sys::Element::set_inner_html(self, markup);
    }

    fn add_listener(
        &self,
        event: &str,
        options: ListenerOptions,
        callback: Box<dyn FnMut(web_sys::Event)>,
    ) -> WebListener {
        let callback = Closure::wrap(callback);
        let listener_options = AddEventListenerOptions::new();
        listener_options.set_capture(options.capture);
        listener_options.set_once(options.once);
        self.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &listener_options,
        )
        .unwrap_throw();
        WebListener {
            target: self.clone().into(),
            event: event.to_owned(),
            capture: options.capture,
            callback: Some(callback),
        }
    }
}

/// Owns a registered browser listener: the callback closure plus what is
/// needed to deregister it.
pub struct WebListener {
    target: web_sys::EventTarget,
    event: String,
    capture: bool,
    callback: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl ListenerHandle for WebListener {
    fn forget(mut self) {
        // Leaks the closure; the browser keeps the listener alive for the
        // life of its target, as a plain JS registration would.
        if let Some(callback) = self.callback.take() {
            callback.forget();
        }
    }
}

impl Drop for WebListener {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            self.target
                .remove_event_listener_with_callback_and_bool(
                    &self.event,
                    callback.as_ref().unchecked_ref(),
                    self.capture,
                )
                .unwrap_throw();
        }
    }
}

impl fmt::Debug for WebListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebListener")
            .field("event", &self.event)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}
