// Copyright 2026 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

//! A small event log page exercising all six document operations.

use vanilla_dom::{
    Element, FRAGMENT, Node, Result, bind, document, document_body, get, make, raw_html, replace,
    text, wait_for,
};
use wasm_bindgen::UnwrapThrowExt;
use wasm_bindgen_futures::spawn_local;

fn build_page(doc: &web_sys::Document) -> Result<web_sys::Node> {
    make(
        doc,
        FRAGMENT,
        &[],
        [
            raw_html(doc, "<h1>Event <em>log</em></h1>")?.into(),
            make(doc, "p.hint", &[], [text("ping logs; clear resets")])?.into(),
            make(
                doc,
                "span.badge",
                &[("id", "status")],
                [text("never cleared")],
            )?
            .into(),
            make(
                doc,
                "div.controls",
                &[],
                [
                    make(doc, "button.wide", &[("id", "ping")], [text("ping")])?.into(),
                    make(doc, "button.wide", &[("id", "clear")], [text("clear")])?.into(),
                ],
            )?
            .into(),
            make(doc, "ul.log", &[("id", "log")], [])?.into(),
        ],
    )
}

fn log_line(doc: &web_sys::Document, message: &str) {
    if let Some(list) = get(doc, "#log") {
        let item = make(doc, "li.entry", &[], [text(message.to_owned())]).unwrap_throw();
        Node::append_child(list.as_node(), &item).unwrap_throw();
    }
}

pub fn main() {
    console_error_panic_hook::set_once();
    let doc = document();

    let page = build_page(&doc).unwrap_throw();
    let body: web_sys::Element = document_body().into();
    Node::append_child(body.as_node(), &page).unwrap_throw();

    let ping_doc = doc.clone();
    bind(
        &doc,
        "#ping",
        "click",
        move |event: web_sys::Event| log_line(&ping_doc, &format!("{} on #ping", event.type_())),
        false,
    );

    // Swap the filled list for a fresh one; the id carries over, so the
    // binding above keeps working against the new list.
    let clear_doc = doc.clone();
    bind(
        &doc,
        "#clear",
        "click",
        move |_| {
            if let Some(list) = get(&clear_doc, "#log") {
                let fresh = make(&clear_doc, "ul.log", &[("id", "log")], []).unwrap_throw();
                replace(list.as_node(), &fresh).unwrap_throw();
            }
        },
        false,
    );

    // One-shot: flip the badge on the first clear, then never again.
    let first_clear = wait_for(&doc, "#clear", "click");
    spawn_local(async move {
        let _ = first_clear.await;
        if let Some(badge) = get(&doc, "#status") {
            let done = make(
                &doc,
                "span.badge.done",
                &[("id", "status")],
                [text("cleared at least once")],
            )
            .unwrap_throw();
            replace(badge.as_node(), &done).unwrap_throw();
        }
    });
}
