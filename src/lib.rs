use std::fmt;

#[macro_use]
mod macros;
mod api;
mod effects;
mod engine;
mod error;
pub mod values;

pub use api::{Options, bind, bind_with, parse, process};
pub use effects::{Effect, EffectRegistry};
pub use engine::{
    Activation, Bindings, BoundHandler, Callback, Category, CategorySet, Diagnostic, DiagnosticSink, Engine, Host,
    Scope, Subscription, TracingSink, VisibilityCallback, categories_for, events, is_compatible,
};
pub use error::ValueError;

// --- AST ---------------------------------------------------------------------

/// One top-level `selector { ... }` group.
///
/// The selector is opaque: it is forwarded verbatim to the host and never
/// interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    pub selector: String,
    pub triggers: Vec<TriggerClause>,
}

/// An event-name-scoped group of actions inside a [`RuleBlock`].
///
/// `name` is the raw dotted text (`window.onLoad`, `onHold.click`, `hover`)
/// and is never empty. `actions` keep source order; they run in that order
/// when the trigger fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerClause {
    pub name: String,
    pub actions: Vec<PropertyAction>,
}

/// One `property: value;` pair.
///
/// `value` is the unparsed composite expression, e.g.
/// `fall(600ms), paint(#ff0000)`. Use [`PropertyAction::effect_calls`] to split it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAction {
    pub property: String,
    pub value: String,
}

/// A single named invocation parsed out of a [`PropertyAction`] value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectCall {
    pub name: String,
    pub argument: Option<String>,
}

impl PropertyAction {
    /// Split the value on top-level commas into effect calls.
    pub fn effect_calls(&self) -> Vec<EffectCall> {
        values::call::split_composite(&self.value).into_iter().map(values::call::parse_call).collect()
    }
}

// Canonical rendering, re-parseable into the same AST.

impl fmt::Display for PropertyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property, self.value)
    }
}

impl fmt::Display for TriggerClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for action in &self.actions {
            write!(f, " {action}")?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for RuleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for trigger in &self.triggers {
            write!(f, " {trigger}")?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for EffectCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(arg) => write!(f, "{}({})", self.name, arg),
            None => f.write_str(&self.name),
        }
    }
}
