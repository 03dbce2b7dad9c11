// Copyright 2025 the Vanilla DOM Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::dom::{Document, Element, ElementOf, EventOf, ListenerHandle, ListenerOptions};

/// Attach `handler` to the first element matching `selector`.
///
/// The selector resolves once, now; if nothing matches, this is silently a
/// no-op. On a match the handler is registered for good — it lives as long
/// as its target element. `capture` selects the capture phase instead of
/// the bubble phase.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use vanilla_dom::bind;
/// use vanilla_dom_testing::TestDocument;
///
/// let doc = TestDocument::from_html(r#"<button id="go">Go</button>"#);
/// let clicks = Rc::new(Cell::new(0));
/// let seen = clicks.clone();
/// bind(&doc, "#go", "click", move |_event| seen.set(seen.get() + 1), false);
///
/// doc.dispatch("#go", "click");
/// doc.dispatch("#go", "click");
/// assert_eq!(clicks.get(), 2);
/// ```
pub fn bind<D, F>(doc: &D, selector: &str, event: &str, handler: F, capture: bool)
where
    D: Document,
    F: FnMut(EventOf<D>) + 'static,
{
    let Some(target) = doc.query_selector(selector) else {
        return;
    };
    let listener = target.add_listener(
        event,
        ListenerOptions::new().capture(capture),
        Box::new(handler),
    );
    listener.forget();
}

/// A future for the next `event` occurrence on the first element matching
/// `selector`.
///
/// The listener is registered immediately (not on first poll) with
/// once-semantics: it deregisters itself at delivery, so exactly one event
/// is ever captured. If the selector matches nothing the returned future
/// never resolves — and never errors — mirroring [`bind`]'s silence.
/// Dropping the future before the event arrives deregisters the listener.
///
/// ```
/// use futures::FutureExt;
/// use vanilla_dom::wait_for;
/// use vanilla_dom_testing::TestDocument;
///
/// let doc = TestDocument::from_html(r#"<button id="save">Save</button>"#);
/// let mut saved = wait_for(&doc, "#save", "click");
/// assert!((&mut saved).now_or_never().is_none());
///
/// doc.dispatch("#save", "click");
/// assert!(saved.now_or_never().is_some());
/// ```
pub fn wait_for<D: Document>(doc: &D, selector: &str, event: &str) -> NextEvent<ElementOf<D>> {
    let Some(target) = doc.query_selector(selector) else {
        return NextEvent {
            state: State::Inert,
        };
    };
    let (sender, receiver) = oneshot::channel();
    let mut sender = Some(sender);
    let listener = target.add_listener(
        event,
        ListenerOptions::new().once(true),
        Box::new(move |event| {
            if let Some(sender) = sender.take() {
                let _ = sender.send(event);
            }
        }),
    );
    NextEvent {
        state: State::Waiting {
            receiver,
            _listener: listener,
        },
    }
}

/// Future returned by [`wait_for`]; resolves with the first matching
/// event's payload, at most once.
pub struct NextEvent<E: Element> {
    state: State<E>,
}

enum State<E: Element> {
    Waiting {
        receiver: oneshot::Receiver<E::Event>,
        // Held so that dropping the future deregisters the listener.
        _listener: E::Listener,
    },
    Inert,
}

// The receiver is `Unpin` and the listener handle is never polled.
impl<E: Element> Unpin for NextEvent<E> {}

impl<E: Element> fmt::Debug for NextEvent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Waiting { .. } => "Waiting",
            State::Inert => "Inert",
        };
        f.debug_struct("NextEvent").field("state", &state).finish()
    }
}

impl<E: Element> Future for NextEvent<E> {
    type Output = E::Event;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            State::Waiting { receiver, .. } => match Pin::new(receiver).poll(cx) {
                Poll::Ready(Ok(event)) => Poll::Ready(event),
                // The sender vanished without firing (its whole document
                // is gone); stay pending, like a missed selector.
                Poll::Ready(Err(oneshot::Canceled)) => Poll::Pending,
                Poll::Pending => Poll::Pending,
            },
            State::Inert => Poll::Pending,
        }
    }
}
