//! Parsing and dispatch engine.
//!
//! This module is the internal home of the rule language. The public entry
//! points live in `api.rs`; this module holds the pipeline they drive.
//!
//! ## How the parts work together
//!
//! ```text
//! source text
//!     │  parse_document                 (parser.rs)
//!     │    - strip comments
//!     │    - brace-match blocks and clauses
//!     │    - extract `prop: value;` actions
//!     v
//! Vec<RuleBlock>
//!     │  Engine::bind                   (dispatch.rs)
//!     │    - Activation::resolve        (trigger.rs)
//!     │    - register with the Host     (host.rs)
//!     v
//! Bindings ── host event ──> route_action (routing.rs)
//!                              - split value into effect calls
//!                              - registry lookup
//!                              - category gate   (compat.rs)
//!                              - Diagnostic on skip (diagnostics.rs)
//! ```
//!
//! Data flows one way: text, then AST, then bound handlers. Parsing is pure;
//! binding only registers callbacks; firing is driven by the host.
//!
//! ## Responsibilities by module
//!
//! - `parser.rs`: comment stripping and the two-level brace scanner.
//! - `trigger.rs`: trigger name to `Activation`.
//! - `compat.rs`: the property-category compatibility table.
//! - `routing.rs`: one action to effect invocations, with the double gate.
//! - `dispatch.rs`: `Engine`, `BoundHandler`, `Bindings`.
//! - `host.rs`: the `Host` capability and subscription handles.
//! - `diagnostics.rs`: the non-fatal reporting channel.
//!
//! ## Adding a trigger
//!
//! - Add the name to `Activation::resolve` at the right priority.
//! - Wire it in `Engine::bind_clause`; per-target state belongs in a
//!   `SubscriptionSlot` so `BoundHandler::unbind` can release it.
//!
//! ## Debugging
//!
//! Bind and fire traces are emitted at `debug` level through `tracing`.

#[path = "engine/compat.rs"]
mod compat;
#[path = "engine/diagnostics.rs"]
mod diagnostics;
#[path = "engine/dispatch.rs"]
mod dispatch;
#[path = "engine/host.rs"]
mod host;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/routing.rs"]
mod routing;
#[path = "engine/trigger.rs"]
mod trigger;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use compat::{Category, CategorySet, categories_for, is_compatible};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use dispatch::{Bindings, BoundHandler, Engine};
pub use host::{Callback, Host, Scope, Subscription, VisibilityCallback, events};
pub(crate) use parser::parse_document;
pub use trigger::Activation;
