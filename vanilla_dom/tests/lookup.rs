// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! Tests for [`get`]: first-match resolution, the attached-tree rule, and
//! the no-error contract for missing or unparseable selectors.

use vanilla_dom::{Element, Node, get, make, text};
use vanilla_dom_testing::TestDocument;

#[test]
fn resolves_the_first_match_in_document_order() {
    let doc = TestDocument::from_html(
        r#"<p class="note" id="first">a</p><p class="note" id="second">b</p>"#,
    );
    let found = get(&doc, ".note").unwrap();
    assert_eq!(found.attr("id").as_deref(), Some("first"));
}

#[test]
fn missing_selector_is_none_not_an_error() {
    let doc = TestDocument::from_html("<div></div>");
    assert!(get(&doc, "#absent").is_none());
}

#[test]
fn unparseable_selector_matches_nothing() {
    let doc = TestDocument::from_html(r#"<div id="here"></div>"#);
    assert!(get(&doc, "div:hover").is_none());
    assert!(get(&doc, "").is_none());
    // Sanity: the same document still answers valid selectors.
    assert!(get(&doc, "#here").is_some());
}

#[test]
fn only_the_attached_tree_is_searched() {
    let doc = TestDocument::new();
    let card = make(&doc, "div.card", &[("id", "card")], [text("hi")]).unwrap();
    assert!(get(&doc, "#card").is_none());

    doc.body().as_node().append_child(&card).unwrap();
    let found = get(&doc, "#card").unwrap();
    assert_eq!(found.as_node(), &card);
}

#[test]
fn compound_selectors_resolve() {
    let doc = TestDocument::from_html(
        r#"<ul id="menu"><li><a href="/a">a</a></li><li><a href="/b" class="active">b</a></li></ul>"#,
    );
    let active = get(&doc, "#menu li > a.active").unwrap();
    assert_eq!(active.attr("href").as_deref(), Some("/b"));
    let by_attr = get(&doc, r#"a[href="/a"]"#).unwrap();
    assert_eq!(by_attr.attr("href").as_deref(), Some("/a"));
}
