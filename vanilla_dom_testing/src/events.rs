// Copyright 2026 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use vanilla_dom::dom::{ListenerHandle, ListenerOptions};

use crate::document::{DocumentInner, NodeId, TestDocument, TestElement};

type Callback = Rc<RefCell<Box<dyn FnMut(TestEvent)>>>;

/// The payload delivered to listeners on a [`TestDocument`].
#[derive(Clone, Debug)]
pub struct TestEvent {
    event_type: String,
    target: TestElement,
    current_target: TestElement,
    detail: Option<String>,
}

impl TestEvent {
    /// The event name it was dispatched under, e.g. `"click"`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The element the event was dispatched at.
    pub fn target(&self) -> &TestElement {
        &self.target
    }

    /// The element whose listener is currently running; differs from
    /// [`target`](Self::target) during the capture and bubble phases.
    pub fn current_target(&self) -> &TestElement {
        &self.current_target
    }

    /// The payload string passed to
    /// [`TestDocument::dispatch_with_detail`].
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[derive(Clone)]
pub(crate) struct ListenerEntry {
    id: u64,
    event: String,
    capture: bool,
    once: bool,
    callback: Callback,
}

#[derive(Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, Vec<ListenerEntry>>,
}

impl ListenerStore {
    fn add(&mut self, node: NodeId, entry: ListenerEntry) {
        self.map.entry(node).or_default().push(entry);
    }

    pub(crate) fn remove(&mut self, node: NodeId, id: u64) {
        if let Some(entries) = self.map.get_mut(&node) {
            entries.retain(|entry| entry.id != id);
            if entries.is_empty() {
                self.map.remove(&node);
            }
        }
    }

    /// Listeners on `node` for `event`, in registration order. `phase`
    /// filters by capture flag; `None` keeps both (target phase).
    fn matching(&self, node: NodeId, event: &str, phase: Option<bool>) -> Vec<ListenerEntry> {
        let Some(entries) = self.map.get(&node) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|entry| entry.event == event)
            .filter(|entry| phase.is_none_or(|capture| entry.capture == capture))
            .cloned()
            .collect()
    }

    pub(crate) fn count_for(&self, node: NodeId) -> usize {
        self.map.get(&node).map_or(0, Vec::len)
    }

    pub(crate) fn total(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }
}

/// Keeps one registration on a [`TestDocument`] alive; dropping it
/// deregisters the listener, [`forget`](ListenerHandle::forget) pins it
/// for the life of the document.
pub struct TestListener {
    doc: Weak<RefCell<DocumentInner>>,
    node: NodeId,
    id: u64,
    forgotten: bool,
}

impl ListenerHandle for TestListener {
    fn forget(mut self) {
        self.forgotten = true;
    }
}

impl Drop for TestListener {
    fn drop(&mut self) {
        if self.forgotten {
            return;
        }
        if let Some(doc) = self.doc.upgrade() {
            doc.borrow_mut().listeners.remove(self.node, self.id);
        }
    }
}

impl fmt::Debug for TestListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestListener")
            .field("node", &self.node.0)
            .field("id", &self.id)
            .field("forgotten", &self.forgotten)
            .finish_non_exhaustive()
    }
}

pub(crate) fn register(
    element: &TestElement,
    event: &str,
    options: ListenerOptions,
    callback: Box<dyn FnMut(TestEvent)>,
) -> TestListener {
    let doc = &element.node.doc;
    let mut inner = doc.borrow_mut();
    let id = inner.next_listener_id;
    inner.next_listener_id += 1;
    inner.listeners.add(
        element.node.id,
        ListenerEntry {
            id,
            event: event.to_owned(),
            capture: options.capture,
            once: options.once,
            callback: Rc::new(RefCell::new(callback)),
        },
    );
    TestListener {
        doc: Rc::downgrade(doc),
        node: element.node.id,
        id,
        forgotten: false,
    }
}

/// Run one event through the capture, target, and bubble phases.
pub(crate) fn run_dispatch(
    doc: &TestDocument,
    target: NodeId,
    event_type: &str,
    detail: Option<String>,
) {
    // Propagation path, outermost element first. Non-element ancestors
    // (the document node itself) carry no listeners and are skipped.
    let path: Vec<NodeId> = {
        let inner = doc.inner.borrow();
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            if inner.nodes[id.0].kind.is_element() {
                path.push(id);
            }
            cursor = inner.nodes[id.0].parent;
        }
        path.reverse();
        path
    };
    tracing::debug!(event = event_type, depth = path.len(), "dispatch");

    let detail = detail.as_deref();
    let last = path.len() - 1;
    for &node in &path[..last] {
        invoke(doc, node, target, event_type, detail, Some(true));
    }
    // Target phase runs in registration order; the capture flag does not
    // order listeners here.
    invoke(doc, target, target, event_type, detail, None);
    for &node in path[..last].iter().rev() {
        invoke(doc, node, target, event_type, detail, Some(false));
    }
}

fn invoke(
    doc: &TestDocument,
    node: NodeId,
    target: NodeId,
    event_type: &str,
    detail: Option<&str>,
    phase: Option<bool>,
) {
    // Snapshot with the borrow released before any callback runs, so
    // handlers may freely touch the document. Once-listeners come off the
    // store before their first (and only) invocation.
    let snapshot = {
        let mut inner = doc.inner.borrow_mut();
        let entries = inner.listeners.matching(node, event_type, phase);
        for entry in &entries {
            if entry.once {
                inner.listeners.remove(node, entry.id);
            }
        }
        entries
    };
    if snapshot.is_empty() {
        return;
    }
    let current_target = TestElement::from_parts(&doc.inner, node);
    let target = TestElement::from_parts(&doc.inner, target);
    for entry in snapshot {
        let event = TestEvent {
            event_type: event_type.to_owned(),
            target: target.clone(),
            current_target: current_target.clone(),
            detail: detail.map(str::to_owned),
        };
        (entry.callback.borrow_mut())(event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use vanilla_dom::{Document, Element, ListenerHandle, ListenerOptions};

    use crate::TestDocument;

    #[test]
    fn handles_gate_registration_lifetime() {
        let doc = TestDocument::from_html(r#"<button id="go"></button>"#);
        let button = doc.query_selector("#go").unwrap();
        let first = button.add_listener("click", ListenerOptions::new(), Box::new(|_| {}));
        let second = button.add_listener("click", ListenerOptions::new(), Box::new(|_| {}));
        assert_eq!(button.listener_count(), 2);
        assert_eq!(doc.total_listener_count(), 2);
        drop(first);
        assert_eq!(button.listener_count(), 1);
        // A forgotten handle leaves its registration in place.
        second.forget();
        assert_eq!(button.listener_count(), 1);
        assert_eq!(doc.total_listener_count(), 1);
    }

    #[test]
    fn listeners_added_during_dispatch_wait_for_the_next_event() {
        let doc = TestDocument::from_html(r#"<button id="go"></button>"#);
        let button = doc.query_selector("#go").unwrap();
        let added_runs = Rc::new(Cell::new(0));
        let adder = {
            let button = button.clone();
            let added_runs = added_runs.clone();
            move |_| {
                let added_runs = added_runs.clone();
                button
                    .add_listener(
                        "click",
                        ListenerOptions::new(),
                        Box::new(move |_| added_runs.set(added_runs.get() + 1)),
                    )
                    .forget();
            }
        };
        button
            .add_listener("click", ListenerOptions::new().once(true), Box::new(adder))
            .forget();
        assert!(doc.dispatch("#go", "click"));
        assert_eq!(added_runs.get(), 0);
        assert!(doc.dispatch("#go", "click"));
        assert_eq!(added_runs.get(), 1);
    }

    #[test]
    fn listeners_removed_during_dispatch_still_hear_the_event() {
        let doc = TestDocument::from_html(r#"<button id="go"></button>"#);
        let button = doc.query_selector("#go").unwrap();
        let slot = Rc::new(RefCell::new(None));
        {
            let slot = slot.clone();
            button
                .add_listener(
                    "click",
                    ListenerOptions::new(),
                    Box::new(move |_| drop(slot.borrow_mut().take())),
                )
                .forget();
        }
        let second_runs = Rc::new(Cell::new(0));
        {
            let second_runs = second_runs.clone();
            let second = button.add_listener(
                "click",
                ListenerOptions::new(),
                Box::new(move |_| second_runs.set(second_runs.get() + 1)),
            );
            *slot.borrow_mut() = Some(second);
        }
        assert_eq!(button.listener_count(), 2);
        // Removal mid-dispatch does not unseat listeners from the event
        // already in flight.
        assert!(doc.dispatch("#go", "click"));
        assert_eq!(second_runs.get(), 1);
        assert_eq!(button.listener_count(), 1);
        assert!(doc.dispatch("#go", "click"));
        assert_eq!(second_runs.get(), 1);
    }

    #[test]
    fn once_listeners_deregister_before_running() {
        let doc = TestDocument::from_html(r#"<button id="go"></button>"#);
        let button = doc.query_selector("#go").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            button
                .add_listener(
                    "click",
                    ListenerOptions::new().once(true),
                    Box::new(move |event| {
                        let live = event.current_target().listener_count();
                        seen.borrow_mut().push(live);
                    }),
                )
                .forget();
        }
        assert!(doc.dispatch("#go", "click"));
        assert!(doc.dispatch("#go", "click"));
        // The entry came off the store before its handler ran, and the
        // second dispatch never reached it.
        assert_eq!(*seen.borrow(), [0]);
    }
}
