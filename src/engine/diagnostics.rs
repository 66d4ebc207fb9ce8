//! Diagnostics sink.
//!
//! Every recoverable condition the engine meets while binding or firing is
//! reported here instead of being raised:
//!
//! - an effect name absent from the registry,
//! - an effect not permitted for the action's property category,
//! - a selector matching nothing at bind or fire time.
//!
//! The default sink forwards to `tracing`; callers that need to inspect
//! diagnostics (tests, editor tooling) install their own [`DiagnosticSink`].

use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnknownEffect { effect: String, property: String },
    IncompatibleEffect { effect: String, property: String },
    NoMatchingTargets { selector: String, trigger: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownEffect { effect, property } => {
                write!(f, "unknown effect '{effect}' (property '{property}')")
            }
            Diagnostic::IncompatibleEffect { effect, property } => {
                write!(f, "effect '{effect}' is not compatible with property '{property}'")
            }
            Diagnostic::NoMatchingTargets { selector, trigger } => {
                write!(f, "no element matches '{selector}' for '{trigger}'")
            }
        }
    }
}

pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that turns diagnostics into structured `tracing` events.
///
/// Missing targets are routine on pages that share one stylesheet, so they log
/// at `debug`; effect problems are authoring mistakes and log at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnknownEffect { effect, property } => {
                warn!(effect = %effect, property = %property, "unknown effect");
            }
            Diagnostic::IncompatibleEffect { effect, property } => {
                warn!(effect = %effect, property = %property, "effect not compatible with property");
            }
            Diagnostic::NoMatchingTargets { selector, trigger } => {
                debug!(selector = %selector, trigger = %trigger, "no matching targets");
            }
        }
    }
}

impl<F: Fn(Diagnostic)> DiagnosticSink for F {
    fn report(&self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}
