// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! Tests for [`bind`] and [`wait_for`]: silent misses, propagation
//! phases, the one-shot listener, and cancellation.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use vanilla_dom::{bind, wait_for};
use vanilla_dom_testing::{TestDocument, TestEvent};

/// Shared log the handlers append to, with a handle for each handler.
fn log() -> (Rc<RefCell<Vec<&'static str>>>, Rc<RefCell<Vec<&'static str>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    (log.clone(), log)
}

#[test]
fn bound_handler_runs_once_per_event() {
    let doc = TestDocument::from_html(r#"<button id="go">Go</button>"#);
    let (log, seen) = log();
    bind(
        &doc,
        "#go",
        "click",
        move |_: TestEvent| {
            seen.borrow_mut().push("click");
        },
        false,
    );

    assert!(doc.dispatch("#go", "click"));
    assert!(doc.dispatch("#go", "click"));
    assert_eq!(log.borrow().as_slice(), ["click", "click"]);
}

#[test]
fn bind_on_a_missing_selector_is_silently_inert() {
    let doc = TestDocument::from_html("<div></div>");
    bind(&doc, "#absent", "click", |_| {}, false);
    assert_eq!(doc.total_listener_count(), 0);
}

#[test]
fn bind_ignores_events_of_other_types() {
    let doc = TestDocument::from_html(r#"<input id="name">"#);
    let (log, seen) = log();
    bind(
        &doc,
        "#name",
        "change",
        move |_| {
            seen.borrow_mut().push("change");
        },
        false,
    );

    doc.dispatch("#name", "click");
    assert!(log.borrow().is_empty());
    doc.dispatch("#name", "change");
    assert_eq!(log.borrow().as_slice(), ["change"]);
}

#[test]
fn capture_runs_before_target_and_bubble_after() {
    let doc = TestDocument::from_html(r#"<div id="outer"><button id="inner">x</button></div>"#);
    let (log, a) = log();
    let b = log.clone();
    let c = log.clone();

    bind(
        &doc,
        "#outer",
        "click",
        move |_| a.borrow_mut().push("outer capture"),
        true,
    );
    bind(
        &doc,
        "#outer",
        "click",
        move |_| b.borrow_mut().push("outer bubble"),
        false,
    );
    bind(
        &doc,
        "#inner",
        "click",
        move |_| c.borrow_mut().push("target"),
        false,
    );

    doc.dispatch("#inner", "click");
    assert_eq!(
        log.borrow().as_slice(),
        ["outer capture", "target", "outer bubble"]
    );
}

#[test]
fn target_phase_runs_in_registration_order_regardless_of_capture_flag() {
    let doc = TestDocument::from_html(r#"<button id="go">Go</button>"#);
    let (log, first) = log();
    let second = log.clone();

    bind(
        &doc,
        "#go",
        "click",
        move |_| first.borrow_mut().push("bubble-flagged"),
        false,
    );
    bind(
        &doc,
        "#go",
        "click",
        move |_| second.borrow_mut().push("capture-flagged"),
        true,
    );

    doc.dispatch("#go", "click");
    assert_eq!(
        log.borrow().as_slice(),
        ["bubble-flagged", "capture-flagged"]
    );
}

#[test]
fn handlers_see_target_and_current_target() {
    let doc = TestDocument::from_html(r#"<div id="outer"><button id="inner">x</button></div>"#);
    let (log, seen) = log();

    bind(
        &doc,
        "#outer",
        "click",
        move |event: TestEvent| {
            assert_eq!(event.target().attr("id").as_deref(), Some("inner"));
            assert_eq!(event.current_target().attr("id").as_deref(), Some("outer"));
            seen.borrow_mut().push("checked");
        },
        false,
    );

    doc.dispatch("#inner", "click");
    assert_eq!(log.borrow().as_slice(), ["checked"]);
}

#[test]
fn wait_for_resolves_with_the_first_event_payload() {
    let doc = TestDocument::from_html(r#"<button id="save">Save</button>"#);
    let mut pending = wait_for(&doc, "#save", "click");
    assert!((&mut pending).now_or_never().is_none());

    doc.dispatch_with_detail("#save", "click", "first");
    doc.dispatch_with_detail("#save", "click", "second");

    let event = pending.now_or_never().unwrap();
    assert_eq!(event.event_type(), "click");
    assert_eq!(event.detail(), Some("first"));
}

#[test]
fn wait_for_listener_deregisters_at_delivery() {
    let doc = TestDocument::from_html(r#"<button id="save">Save</button>"#);
    let pending = wait_for(&doc, "#save", "click");
    assert_eq!(doc.total_listener_count(), 1);

    doc.dispatch("#save", "click");
    assert_eq!(doc.total_listener_count(), 0);
    // Further events have nowhere to go and change nothing.
    doc.dispatch("#save", "click");
    assert!(pending.now_or_never().is_some());
}

#[test]
fn wait_for_on_a_missing_selector_stays_pending_forever() {
    let doc = TestDocument::from_html("<div></div>");
    let mut pending = wait_for(&doc, "#absent", "click");
    assert_eq!(doc.total_listener_count(), 0);
    assert!((&mut pending).now_or_never().is_none());
    assert!((&mut pending).now_or_never().is_none());
}

#[test]
fn dropping_the_future_deregisters_the_listener() {
    let doc = TestDocument::from_html(r#"<button id="save">Save</button>"#);
    let pending = wait_for(&doc, "#save", "click");
    assert_eq!(doc.total_listener_count(), 1);

    drop(pending);
    assert_eq!(doc.total_listener_count(), 0);
    // Dispatching afterwards finds the target but no listener; nothing
    // panics.
    assert!(doc.dispatch("#save", "click"));
}

#[test]
fn dropping_a_pending_future_inside_a_handler_is_safe() {
    let doc = TestDocument::from_html(r#"<button id="go">Go</button>"#);
    let slot = Rc::new(RefCell::new(None));
    let dropper = slot.clone();
    bind(
        &doc,
        "#go",
        "click",
        move |_| drop(dropper.borrow_mut().take()),
        false,
    );
    *slot.borrow_mut() = Some(wait_for(&doc, "#go", "click"));
    assert_eq!(doc.total_listener_count(), 2);

    // The handler tears the one-shot down mid-dispatch; its listener is
    // still in this event's snapshot and delivers into a dead channel.
    assert!(doc.dispatch("#go", "click"));
    assert_eq!(doc.total_listener_count(), 1);
    assert!(doc.dispatch("#go", "click"));
}

#[test]
fn wait_for_outlives_the_document_it_was_made_from() {
    let doc = TestDocument::from_html(r#"<button id="go">Go</button>"#);
    let mut pending = wait_for(&doc, "#go", "click");
    assert!((&mut pending).now_or_never().is_none());

    // With the document gone the event can never arrive; polling keeps
    // reporting pending.
    drop(doc);
    assert!((&mut pending).now_or_never().is_none());
    assert!((&mut pending).now_or_never().is_none());
}

#[test]
fn bound_listeners_outlive_dispatches_and_other_futures() {
    let doc = TestDocument::from_html(r#"<button id="go">Go</button>"#);
    let (log, seen) = log();
    bind(
        &doc,
        "#go",
        "click",
        move |_| seen.borrow_mut().push("bound"),
        false,
    );

    // A one-shot next to it comes and goes without disturbing the binding.
    let pending = wait_for(&doc, "#go", "click");
    assert_eq!(doc.total_listener_count(), 2);
    doc.dispatch("#go", "click");
    assert!(pending.now_or_never().is_some());
    assert_eq!(doc.total_listener_count(), 1);

    doc.dispatch("#go", "click");
    assert_eq!(log.borrow().as_slice(), ["bound", "bound"]);
}
