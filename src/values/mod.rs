//! Value-parsing helpers shared by the router and by effect implementations.
//!
//! - `call`: composite splitting (`a(1, 2), b`) and `name(arg)` call syntax.
//! - `duration`: `600ms` / `1.5s` / bare-number durations.
//! - `args`: typed argument records for the standard effect catalog.
//! - `color`: hex and `rgb()` color normalization.

pub mod args;
pub mod call;
pub mod color;
pub mod duration;

pub use args::{Direction, FadeColorArgs, ScaleArgs, ShakeArgs, ShakeStyle, SlideArgs, parse_scale};
pub use call::{parse_call, split_composite};
pub use color::{Color, ColorFormat};
pub use duration::{DEFAULT_DURATION, duration_or, parse_duration};

/// Split an argument list on top-level commas, trimming each part.
///
/// Empty input produces no parts, so `None` and `Some("")` behave the same.
/// Empty slots in between are kept so later arguments keep their position.
pub(crate) fn arg_parts(arg: Option<&str>) -> Vec<&str> {
    let Some(text) = arg.filter(|t| !t.trim().is_empty()) else {
        return Vec::new();
    };

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}
