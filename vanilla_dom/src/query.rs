// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

use crate::dom::{Document, Node};
use crate::error::{Error, Result};

/// First element matching `selector`, or `None`.
///
/// Resolution happens once, against the attached tree only: nodes built
/// with [`crate::make`] are invisible here until something attaches them.
/// A selector the host cannot parse also yields `None`.
pub fn get<D: Document>(doc: &D, selector: &str) -> Option<D::Element> {
    doc.query_selector(selector)
}

/// Swap `node` for `replacement` in place and hand back `node`, detached.
///
/// The returned handle is the same node that went in, so state carried on
/// it (listeners, field values) survives the swap. Errors with
/// [`Error::DetachedNode`] when `node` has no parent to swap under.
pub fn replace<N: Node>(node: &N, replacement: &N) -> Result<N> {
    let parent = node.parent().ok_or(Error::DetachedNode)?;
    parent.replace_child(replacement, node)
}
