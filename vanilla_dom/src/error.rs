// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the document operations.
///
/// Missing selectors are deliberately *not* errors: [`crate::get`] returns
/// `None`, [`crate::bind`] does nothing, and [`crate::wait_for`] stays
/// pending forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A tag specifier with an empty element name or an empty class
    /// segment, e.g. `""`, `".foo"`, or `"div."`. Carries the offending
    /// specifier.
    InvalidTagSpec(String),
    /// [`crate::replace`] was called on a node with no parent.
    DetachedNode,
    /// The host document rejected an operation, such as creating an
    /// element with a malformed name.
    Host(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTagSpec(spec) => write!(f, "invalid tag specifier: {spec:?}"),
            Self::DetachedNode => write!(f, "node has no parent"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
