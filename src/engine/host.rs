//! Host binding capability.
//!
//! The engine never touches a document directly. Everything it needs from the
//! environment (selector matching, event listeners, load state, visibility
//! observation, timers) goes through the [`Host`] trait. Firing is driven
//! entirely by the host invoking the callbacks handed to it; the engine never
//! polls.
//!
//! Callbacks are `Rc`-based: the engine is single-threaded and cooperative, so
//! shared state behind a handler lives in `Cell`/`RefCell`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Zero-argument callback fired by the host on an event or timer.
pub type Callback = Rc<dyn Fn()>;

/// Visibility callback; the argument is `true` when the target entered the
/// viewport (crossed the observation threshold) and `false` when it left.
pub type VisibilityCallback = Rc<dyn Fn(bool)>;

/// Event names the engine speaks to the host.
pub mod events {
    pub const CLICK: &str = "click";
    pub const DOUBLE_CLICK: &str = "dblclick";
    pub const PRESS_START: &str = "mousedown";
    pub const PRESS_END: &str = "mouseup";
    pub const PRESS_LEAVE: &str = "mouseleave";
    pub const POINTER_ENTER: &str = "mouseenter";
    pub const LOAD: &str = "load";
    pub const CONTENT_READY: &str = "DOMContentLoaded";
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope<T> {
    /// Window-level listener.
    Global,
    /// Document-level listener (content-ready signal).
    Document,
    /// A single matched element.
    Target(T),
}

/// The environment the engine binds into.
pub trait Host {
    type Target: Clone + fmt::Debug + 'static;

    /// Elements currently matching `selector`, in host order.
    fn query_matches(&self, selector: &str) -> Vec<Self::Target>;

    /// Attach `callback` to `event` on `scope`.
    fn listen(&self, scope: Scope<Self::Target>, event: &str, callback: Callback) -> Subscription;

    /// Whether the initial content-ready signal has already occurred.
    fn is_initial_content_ready(&self) -> bool;

    /// Whether the document has finished loading.
    fn is_fully_loaded(&self) -> bool;

    /// Observe `target` for visibility changes at `threshold` (0.0..=1.0).
    /// Cancelling the returned subscription unobserves the target.
    fn observe_visibility(&self, target: &Self::Target, threshold: f64, callback: VisibilityCallback)
    -> Subscription;

    /// Run `callback` once after `delay`. Cancelling the returned subscription
    /// before the delay elapses prevents the run.
    fn schedule(&self, delay: Duration, callback: Callback) -> Subscription;
}

/// Handle to something registered with the host.
///
/// Dropping a subscription does *not* cancel it; registrations live as long
/// as the page unless [`Subscription::cancel`] is called explicitly.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Subscription { cancel: Some(Box::new(cancel)) }
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Subscription { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}

/// A slot holding at most one live subscription (a pending timer or an
/// observation). Replacing or clearing the slot cancels what it held.
#[derive(Debug, Default, Clone)]
pub(crate) struct SubscriptionSlot(Rc<RefCell<Option<Subscription>>>);

impl SubscriptionSlot {
    pub(crate) fn replace(&self, next: Subscription) {
        let previous = self.0.borrow_mut().replace(next);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    pub(crate) fn clear(&self) {
        let previous = self.0.borrow_mut().take();
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Drop the held subscription without cancelling it (it already ran).
    pub(crate) fn forget(&self) {
        self.0.borrow_mut().take();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.borrow().is_none()
    }
}
