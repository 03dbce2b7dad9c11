// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};

/// What [`crate::make`] should create: a named element, with optional
/// classes baked into the specifier, or an empty fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagSpec<'a> {
    /// `"tag"` or `"tag.class1.class2"`: the segment before the first `.`
    /// is the element name, every following segment is a class.
    Tag(&'a str),
    /// An unattributed container that splices its children into whatever
    /// it is appended to. Classes cannot apply to it, and this variant
    /// carries none.
    Fragment,
}

/// Fragment sentinel, for call sites that read better with a constant:
/// `make(&doc, FRAGMENT, &[], children)`.
pub const FRAGMENT: TagSpec<'static> = TagSpec::Fragment;

impl<'a> From<&'a str> for TagSpec<'a> {
    fn from(spec: &'a str) -> Self {
        Self::Tag(spec)
    }
}

/// Split `"tag.class.class"` into the element name and its class
/// segments.
///
/// Empty segments are rejected up front, so no malformed name or class
/// token ever reaches the host.
pub(crate) fn split_spec<'a>(spec: &'a str) -> Result<(&'a str, impl Iterator<Item = &'a str>)> {
    let mut segments = spec.split('.');
    let name = segments.next().unwrap_or_default();
    if name.is_empty() || spec.split('.').skip(1).any(str::is_empty) {
        return Err(Error::InvalidTagSpec(spec.to_owned()));
    }
    Ok((name, segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_error(spec: &str) -> Error {
        let Err(err) = split_spec(spec) else {
            panic!("{spec:?} should be rejected");
        };
        err
    }

    #[test]
    fn plain_tag() {
        let (name, classes) = split_spec("div").unwrap();
        assert_eq!(name, "div");
        assert_eq!(classes.count(), 0);
    }

    #[test]
    fn tag_with_classes() {
        let (name, classes) = split_spec("button.wide.primary").unwrap();
        assert_eq!(name, "button");
        assert_eq!(classes.collect::<Vec<_>>(), ["wide", "primary"]);
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(spec_error(""), Error::InvalidTagSpec("".to_owned()));
        assert_eq!(spec_error(".foo"), Error::InvalidTagSpec(".foo".to_owned()));
    }

    #[test]
    fn empty_class_segment_is_rejected() {
        assert_eq!(spec_error("div."), Error::InvalidTagSpec("div.".to_owned()));
        assert_eq!(spec_error("a..b"), Error::InvalidTagSpec("a..b".to_owned()));
    }
}
