// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! A thin convenience layer over the browser DOM.
//!
//! No virtual DOM, no diffing, no component lifecycle: six small operations
//! that cut the ceremony out of direct DOM scripting and hand back plain
//! host nodes for the caller to wire together.
//!
//! - [`make`] builds an element from a `"tag.class.class"` specifier (or a
//!   [`FRAGMENT`]), an ordered attribute list, and a child list.
//! - [`raw_html`] wraps already-built markup in a `span`, *without* escaping.
//! - [`get`] resolves a selector to the first matching element, if any.
//! - [`bind`] attaches an event handler through a selector and does nothing,
//!   silently, when the selector misses.
//! - [`wait_for`] returns a future for the next matching event.
//! - [`replace`] swaps an attached node for another and returns the original.
//!
//! All six are generic over the capability traits in [`dom`]. The [`web`]
//! module implements those traits for the live browser document via
//! [`web_sys`]; the `vanilla_dom_testing` crate provides a headless
//! document so the same operations run in ordinary tests.
//!
//! ```
//! use vanilla_dom::{make, text};
//! use vanilla_dom_testing::TestDocument;
//!
//! # fn main() -> vanilla_dom::Result<()> {
//! let doc = TestDocument::new();
//! let link = make(&doc, "a.external", &[("href", "/docs")], [text("docs")])?;
//! let para = make(&doc, "p.lead", &[], [text("See the "), link.into(), text(".")])?;
//! # let _ = para;
//! # Ok(())
//! # }
//! ```

pub mod dom;
mod error;
mod events;
mod make;
mod query;
mod tag;
pub mod web;

pub use self::dom::{Document, Element, ListenerHandle, ListenerOptions, Node};
pub use self::error::{Error, Result};
pub use self::events::{NextEvent, bind, wait_for};
pub use self::make::{Child, make, raw_html, text};
pub use self::query::{get, replace};
pub use self::tag::{FRAGMENT, TagSpec};
pub use self::web::{document, document_body};

/// Copy-on-write string; attribute values and text children tend to be
/// either static or freshly built.
pub type CowStr = std::borrow::Cow<'static, str>;
