//! Action routing.
//!
//! When a trigger fires, each of its actions is routed here. The action value
//! is split into effect calls and every call passes a double gate before it
//! runs:
//!
//! ```text
//! "fall(600ms), paint(#f00)"
//!        │ split_composite + parse_call
//!        v
//! [fall(600ms)] [paint(#f00)]
//!        │ 1. registered?          no -> Diagnostic::UnknownEffect
//!        │ 2. category permits it? no -> Diagnostic::IncompatibleEffect
//!        v
//! effect(target, arg) for each matched target
//! ```
//!
//! A failed gate skips only that call; sibling calls still run. Diagnostics are
//! reported once per call, not once per target.

use super::compat::is_compatible;
use super::diagnostics::{Diagnostic, DiagnosticSink};
use crate::{EffectRegistry, PropertyAction};

/// Route one action to `targets`. Returns the number of effect invocations.
pub(crate) fn route_action<T>(
    action: &PropertyAction,
    targets: &[T],
    effects: &EffectRegistry<T>,
    sink: &dyn DiagnosticSink,
) -> usize {
    let mut invoked = 0;

    for call in action.effect_calls() {
        let Some(effect) = effects.lookup(&call.name) else {
            sink.report(Diagnostic::UnknownEffect { effect: call.name, property: action.property.clone() });
            continue;
        };

        if !is_compatible(&action.property, &call.name) {
            sink.report(Diagnostic::IncompatibleEffect { effect: call.name, property: action.property.clone() });
            continue;
        }

        for target in targets {
            effect(target, call.argument.as_deref());
            invoked += 1;
        }
    }

    invoked
}
