//! Rule dispatch: binding parsed rules into the host.
//!
//! For every trigger clause of every block, the dispatcher resolves an
//! [`Activation`] (see `trigger.rs`) and registers listeners, observers or
//! timers with the [`Host`]. Nothing runs at bind time except the two
//! "already elapsed" cases (window load, content ready). Everything else fires
//! later, when the host invokes a callback.
//!
//! ```text
//! RuleBlock ──┬─ TriggerClause ── Activation::resolve ──┐
//!             └─ ...                                    v
//!                                     wire listeners / observers / timers
//!                                                       │  host event
//!                                                       v
//!                                     Firing::run ── route_action (routing.rs)
//! ```
//!
//! ## Targets of a fire
//!
//! Listeners, hold timers and reveal observations are registered per matched
//! element, but every fire re-queries the selector and routes to all current
//! matches: clicking one `.btn` runs the actions on every `.btn`. A fire that
//! finds no match reports `NoMatchingTargets` and runs nothing.
//!
//! ## State per (target, clause)
//!
//! - Hold keeps one pending timer in a [`SubscriptionSlot`]. A new press
//!   replaces (cancels and restarts) it; release or leave cancels it.
//! - Reveal keeps the observation in a slot plus a `fired` flag; the first
//!   entry fires, unobserves, and the flag blocks any late signal.

use super::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use super::host::{Callback, Host, Scope, Subscription, SubscriptionSlot, VisibilityCallback, events};
use super::routing::route_action;
use super::trigger::Activation;
use crate::{EffectRegistry, Options, PropertyAction, RuleBlock, TriggerClause};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Binds rule blocks into a host.
///
/// Usage: `Engine::new(effects, host)`, optionally `.with_options(..)` /
/// `.with_sink(..)`, then [`Engine::bind`].
pub struct Engine<H: Host> {
    host: Rc<H>,
    effects: Rc<EffectRegistry<H::Target>>,
    sink: Rc<dyn DiagnosticSink>,
    options: Options,
}

impl<H: Host + 'static> Engine<H> {
    pub fn new(effects: EffectRegistry<H::Target>, host: H) -> Self {
        Engine { host: Rc::new(host), effects: Rc::new(effects), sink: Rc::new(TracingSink), options: Options::default() }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Replace the default `tracing` diagnostics sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Rc::new(sink);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Bind every trigger clause of every block.
    ///
    /// Clauses whose selector matches nothing (for per-element activations)
    /// are reported and left out of the result.
    pub fn bind(&self, blocks: &[RuleBlock]) -> Bindings {
        let handlers: Vec<BoundHandler> = blocks
            .iter()
            .flat_map(|block| block.triggers.iter().map(move |clause| (block.selector.as_str(), clause)))
            .filter_map(|(selector, clause)| self.bind_clause(selector, clause))
            .collect();

        debug!(handlers = handlers.len(), "bound rule blocks");
        Bindings { handlers }
    }

    fn bind_clause(&self, selector: &str, clause: &TriggerClause) -> Option<BoundHandler> {
        let activation = Activation::resolve(&clause.name);
        let firing = Rc::new(Firing {
            host: Rc::clone(&self.host),
            effects: Rc::clone(&self.effects),
            sink: Rc::clone(&self.sink),
            selector: selector.to_string(),
            trigger: clause.name.clone(),
            actions: clause.actions.iter().cloned().collect(),
            fired: Cell::new(0),
        });

        let targets = if activation.binds_per_target() {
            let targets = self.host.query_matches(selector);
            if targets.is_empty() {
                firing.report_no_targets();
                return None;
            }
            targets
        } else {
            Vec::new()
        };

        let mut wiring = Wiring::default();
        match &activation {
            Activation::SingleClick => self.listen_each(&targets, events::CLICK, &firing, &mut wiring),
            Activation::DoubleClick => self.listen_each(&targets, events::DOUBLE_CLICK, &firing, &mut wiring),
            Activation::Element { event } => self.listen_each(&targets, event, &firing, &mut wiring),
            Activation::Hold => self.wire_hold(&targets, &firing, &mut wiring),
            Activation::Reveal => self.wire_reveal(&targets, &firing, &mut wiring),
            Activation::ContentReady => {
                if self.host.is_initial_content_ready() {
                    debug!(selector, "content already ready, firing now");
                    firing.run_all();
                } else {
                    wiring.subscriptions.push(self.host.listen(
                        Scope::Document,
                        events::CONTENT_READY,
                        firing.all_callback(),
                    ));
                }
            }
            Activation::Window { event } => {
                wiring.subscriptions.push(self.host.listen(Scope::Global, event, firing.all_callback()));
                // Rules injected after the page loaded would otherwise never run.
                if event == events::LOAD && self.host.is_fully_loaded() {
                    debug!(selector, "window already loaded, firing now");
                    firing.run_all();
                }
            }
        }

        debug!(selector, trigger = %clause.name, %activation, targets = targets.len(), "bound trigger");
        Some(BoundHandler { firing: firing as Rc<dyn Fire>, activation, wiring })
    }

    fn listen_each(&self, targets: &[H::Target], event: &str, firing: &Rc<Firing<H>>, wiring: &mut Wiring) {
        for target in targets {
            let callback = firing.all_callback();
            wiring.subscriptions.push(self.host.listen(Scope::Target(target.clone()), event, callback));
        }
    }

    fn wire_hold(&self, targets: &[H::Target], firing: &Rc<Firing<H>>, wiring: &mut Wiring) {
        let threshold = self.options.hold_threshold;

        for target in targets {
            let pending = SubscriptionSlot::default();
            let on_elapsed = firing.all_callback();

            let press: Callback = {
                let host = Rc::clone(&self.host);
                let pending = pending.clone();
                Rc::new(move || {
                    pending.clear();
                    let elapsed_now = Rc::new(Cell::new(false));
                    let elapsed: Callback = {
                        let pending = pending.clone();
                        let elapsed_now = Rc::clone(&elapsed_now);
                        let on_elapsed = Rc::clone(&on_elapsed);
                        Rc::new(move || {
                            elapsed_now.set(true);
                            pending.forget();
                            on_elapsed();
                        })
                    };
                    let timer = host.schedule(threshold, elapsed);
                    // A host may run a zero-length timer inside `schedule`.
                    if !elapsed_now.get() {
                        pending.replace(timer);
                    }
                })
            };
            let release: Callback = {
                let pending = pending.clone();
                Rc::new(move || pending.clear())
            };

            let scope = || Scope::Target(target.clone());
            wiring.subscriptions.push(self.host.listen(scope(), events::PRESS_START, press));
            wiring.subscriptions.push(self.host.listen(scope(), events::PRESS_END, Rc::clone(&release)));
            wiring.subscriptions.push(self.host.listen(scope(), events::PRESS_LEAVE, release));
            wiring.slots.push(pending);
        }
    }

    fn wire_reveal(&self, targets: &[H::Target], firing: &Rc<Firing<H>>, wiring: &mut Wiring) {
        for target in targets {
            let observation = SubscriptionSlot::default();
            let fired = Rc::new(Cell::new(false));

            let on_visibility: VisibilityCallback = {
                let observation = observation.clone();
                let fired = Rc::clone(&fired);
                let on_enter = firing.all_callback();
                Rc::new(move |entered: bool| {
                    if !entered || fired.get() {
                        return;
                    }
                    fired.set(true);
                    observation.clear();
                    on_enter();
                })
            };

            let subscription =
                self.host.observe_visibility(target, self.options.reveal_threshold, on_visibility);
            // The host may report an initial entry while registering.
            if fired.get() {
                subscription.cancel();
            } else {
                observation.replace(subscription);
            }
            wiring.slots.push(observation);
        }
    }
}

impl<H: Host> fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").field("effects", &self.effects).field("options", &self.options).finish()
    }
}

/// Everything one clause needs when it fires.
struct Firing<H: Host> {
    host: Rc<H>,
    effects: Rc<EffectRegistry<H::Target>>,
    sink: Rc<dyn DiagnosticSink>,
    selector: String,
    trigger: String,
    actions: Rc<[PropertyAction]>,
    fired: Cell<usize>,
}

impl<H: Host + 'static> Firing<H> {
    /// Run every action, in source order, against `targets`.
    fn run(&self, targets: &[H::Target]) {
        if targets.is_empty() {
            self.report_no_targets();
            return;
        }
        self.fired.set(self.fired.get() + 1);

        debug!(selector = %self.selector, trigger = %self.trigger, targets = targets.len(), "trigger fired");
        for action in self.actions.iter() {
            route_action(action, targets, &self.effects, self.sink.as_ref());
        }
    }

    fn run_all(&self) {
        let targets = self.host.query_matches(&self.selector);
        self.run(&targets);
    }

    fn report_no_targets(&self) {
        self.sink.report(Diagnostic::NoMatchingTargets { selector: self.selector.clone(), trigger: self.trigger.clone() });
    }

    fn all_callback(self: &Rc<Self>) -> Callback {
        let firing = Rc::clone(self);
        Rc::new(move || firing.run_all())
    }
}

/// Type-erased view of a [`Firing`], so handlers are not generic over the host.
trait Fire {
    fn fire_all(&self);
    fn fire_count(&self) -> usize;
    fn selector(&self) -> &str;
    fn trigger(&self) -> &str;
    fn actions(&self) -> &[PropertyAction];
}

impl<H: Host + 'static> Fire for Firing<H> {
    fn fire_all(&self) {
        self.run_all();
    }

    fn fire_count(&self) -> usize {
        self.fired.get()
    }

    fn selector(&self) -> &str {
        &self.selector
    }

    fn trigger(&self) -> &str {
        &self.trigger
    }

    fn actions(&self) -> &[PropertyAction] {
        &self.actions
    }
}

/// Registrations made for one clause.
#[derive(Debug, Default)]
struct Wiring {
    subscriptions: Vec<Subscription>,
    slots: Vec<SubscriptionSlot>,
}

/// The runtime object produced for one trigger clause.
pub struct BoundHandler {
    firing: Rc<dyn Fire>,
    activation: Activation,
    wiring: Wiring,
}

impl BoundHandler {
    pub fn selector(&self) -> &str {
        self.firing.selector()
    }

    /// Raw trigger name from the source.
    pub fn trigger(&self) -> &str {
        self.firing.trigger()
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    pub fn actions(&self) -> &[PropertyAction] {
        self.firing.actions()
    }

    /// Fire the clause now against every current match of its selector.
    pub fn fire(&self) {
        self.firing.fire_all();
    }

    /// How many fires found at least one target (immediate fires included).
    pub fn fire_count(&self) -> usize {
        self.firing.fire_count()
    }

    /// Number of listener registrations held (observers and timers excluded).
    pub fn listener_count(&self) -> usize {
        self.wiring.subscriptions.len()
    }

    /// Whether a hold timer is currently pending for any target.
    pub fn has_pending_timer(&self) -> bool {
        matches!(self.activation, Activation::Hold) && self.wiring.slots.iter().any(|slot| !slot.is_empty())
    }

    /// Cancel every listener, observation and pending timer of this clause.
    pub fn unbind(self) {
        for subscription in self.wiring.subscriptions {
            subscription.cancel();
        }
        for slot in &self.wiring.slots {
            slot.clear();
        }
    }
}

impl fmt::Debug for BoundHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHandler")
            .field("selector", &self.selector())
            .field("trigger", &self.trigger())
            .field("activation", &self.activation)
            .field("actions", &self.actions().len())
            .field("fired", &self.fire_count())
            .finish()
    }
}

/// Handle returned by [`Engine::bind`]: one [`BoundHandler`] per bound clause.
///
/// Registrations stay live while the page does; call [`Bindings::unbind`] to
/// release them.
#[derive(Debug, Default)]
pub struct Bindings {
    handlers: Vec<BoundHandler>,
}

impl Bindings {
    pub fn handlers(&self) -> &[BoundHandler] {
        &self.handlers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundHandler> {
        self.handlers.iter()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Bound handlers for the clause named `trigger` (raw name, exact match).
    pub fn find(&self, selector: &str, trigger: &str) -> Option<&BoundHandler> {
        self.handlers.iter().find(|h| h.selector() == selector && h.trigger() == trigger)
    }

    pub fn unbind(self) {
        for handler in self.handlers {
            handler.unbind();
        }
    }
}

impl IntoIterator for Bindings {
    type Item = BoundHandler;
    type IntoIter = std::vec::IntoIter<BoundHandler>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.into_iter()
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = &'a BoundHandler;
    type IntoIter = std::slice::Iter<'a, BoundHandler>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.iter()
    }
}
