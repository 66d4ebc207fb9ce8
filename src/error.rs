//! Error types for strict value parsing.
//!
//! Nothing on the parse/bind/fire path fails: malformed rules and unknown
//! effects are reported as [`crate::Diagnostic`]s instead. `ValueError` only
//! surfaces from the strict helpers in [`crate::values`]; their lenient
//! counterparts fall back to defaults.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("invalid duration: '{0}'")]
    InvalidDuration(String),

    #[error("invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("invalid color: '{0}'")]
    InvalidColor(String),

    #[error("unknown direction: '{0}'")]
    UnknownDirection(String),
}
