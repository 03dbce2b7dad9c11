// Copyright 2026 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! Headless document for testing `vanilla_dom` applications.
//!
//! [`TestDocument`] implements the `vanilla_dom` capability traits against
//! a plain in-memory tree, so every document operation runs in ordinary
//! tests on any target, no browser involved. On top of the traits it adds
//! what a test needs and a real document does not hand out cheaply:
//!
//! - seeding: [`TestDocument::from_html`] parses a markup fragment into
//!   the body;
//! - events: [`TestDocument::dispatch`] fires a synthetic event through
//!   the capture/target/bubble phases, honoring once-listeners;
//! - inspection: tags, attributes, classes, serialized markup, listener
//!   counts, attachment checks, and node identity via `==`.
//!
//! The selector engine supports the subset tests actually write: tag,
//! `*`, `#id`, `.class`, `[attr]` with `=`/`^=`/`$=`/`*=` operators,
//! descendant and `>` combinators, and comma groups. Anything else is
//! logged and treated as matching nothing.
//!
//! ```
//! use vanilla_dom::{Element, Node, get, make, text};
//! use vanilla_dom_testing::TestDocument;
//!
//! # fn main() -> vanilla_dom::Result<()> {
//! let doc = TestDocument::from_html(r#"<div id="app"></div>"#);
//! let app = get(&doc, "#app").unwrap();
//! let note = make(&doc, "p.note", &[], [text("hello")])?;
//! app.as_node().append_child(&note)?;
//! assert_eq!(app.inner_html(), r#"<p class="note">hello</p>"#);
//! # Ok(())
//! # }
//! ```

mod document;
mod events;
mod html;
mod selector;

pub use document::{TestDocument, TestElement, TestNode};
pub use events::{TestEvent, TestListener};
