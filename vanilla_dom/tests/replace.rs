// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! Tests for [`replace`]: in-place swaps, the returned original, and the
//! detached-node error.

use assert_matches::assert_matches;
use vanilla_dom::{Element, Error, FRAGMENT, bind, get, make, replace, text};
use vanilla_dom_testing::TestDocument;

#[test]
fn swaps_in_place_and_returns_the_original() {
    let doc = TestDocument::from_html(r#"<p>before</p><p id="old">target</p><p>after</p>"#);
    let old = get(&doc, "#old").unwrap().into_node();
    let new = make(&doc, "h2", &[("id", "new")], [text("swapped")]).unwrap();

    let returned = replace(&old, &new).unwrap();
    assert_eq!(returned, old);
    assert!(!doc.contains(&returned));
    assert_eq!(
        doc.body().inner_html(),
        r#"<p>before</p><h2 id="new">swapped</h2><p>after</p>"#
    );
}

#[test]
fn an_unattached_node_cannot_be_replaced() {
    let doc = TestDocument::new();
    let loose = make(&doc, "div", &[], []).unwrap();
    let replacement = make(&doc, "span", &[], []).unwrap();
    assert_matches!(replace(&loose, &replacement), Err(Error::DetachedNode));
}

#[test]
fn replacing_with_a_fragment_splices_its_children_in_position() {
    let doc = TestDocument::from_html(r#"<ul><li>a</li><li id="mid">b</li><li>c</li></ul>"#);
    let mid = get(&doc, "#mid").unwrap().into_node();
    let items = make(
        &doc,
        FRAGMENT,
        &[],
        [
            make(&doc, "li", &[], [text("x")]).unwrap().into(),
            make(&doc, "li", &[], [text("y")]).unwrap().into(),
        ],
    )
    .unwrap();

    replace(&mid, &items).unwrap();
    assert_eq!(
        get(&doc, "ul").unwrap().inner_html(),
        "<li>a</li><li>x</li><li>y</li><li>c</li>"
    );
}

#[test]
fn the_returned_node_keeps_its_listeners_for_reuse() {
    let doc = TestDocument::from_html(r#"<div id="slot"><button id="go">Go</button></div>"#);
    let clicked = std::rc::Rc::new(std::cell::Cell::new(0));
    let seen = clicked.clone();
    bind(
        &doc,
        "#go",
        "click",
        move |_| seen.set(seen.get() + 1),
        false,
    );

    let button = get(&doc, "#go").unwrap().into_node();
    let placeholder = make(&doc, "span", &[], [text("gone")]).unwrap();
    let returned = replace(&button, &placeholder).unwrap();
    // Detached, the button is invisible to selectors and events.
    assert!(!doc.dispatch("#go", "click"));
    assert_eq!(clicked.get(), 0);

    // Put the original back; its registration never went away.
    let restored = replace(&placeholder, &returned).unwrap();
    assert_eq!(restored, placeholder);
    doc.dispatch("#go", "click");
    assert_eq!(clicked.get(), 1);
}

#[test]
fn replacement_detaches_from_its_previous_parent() {
    let doc = TestDocument::from_html(
        r#"<div id="a"><b id="mover">m</b></div><div id="b"><i id="spot">s</i></div>"#,
    );
    let mover = get(&doc, "#mover").unwrap().into_node();
    let spot = get(&doc, "#spot").unwrap().into_node();

    replace(&spot, &mover).unwrap();
    assert_eq!(
        doc.body().inner_html(),
        r#"<div id="a"></div><div id="b"><b id="mover">m</b></div>"#
    );
}
