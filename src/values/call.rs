//! Composite effect expressions.
//!
//! A property value such as `slideIn(left, 30px, 600ms), fadeIn(200ms)` is a
//! comma-separated list of calls. Commas nested in parentheses belong to the
//! call's argument and never split.

use crate::EffectCall;

/// Split `value` on top-level commas, returning trimmed non-empty segments.
///
/// ```
/// use csscript::values::split_composite;
///
/// let parts = split_composite("slideIn(left, 30px, 600ms), fadeIn(200ms)");
/// assert_eq!(parts, vec!["slideIn(left, 30px, 600ms)", "fadeIn(200ms)"]);
/// ```
pub fn split_composite(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (idx, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            // Unbalanced `)` must not underflow and swallow later commas.
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_segment(&mut parts, &value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    push_segment(&mut parts, &value[start..]);

    parts
}

fn push_segment<'a>(parts: &mut Vec<&'a str>, segment: &'a str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        parts.push(segment);
    }
}

/// Parse one segment as `identifier` or `identifier(argument-text)`.
///
/// The argument runs to the last closing parenthesis, so nested calls such as
/// `fadeColor(rgb(0, 0, 0), #fff)` keep their inner parentheses. A segment that
/// does not fit the syntax becomes a call named after the whole segment; the
/// router then reports it as an unknown effect.
pub fn parse_call(segment: &str) -> EffectCall {
    let segment = segment.trim();
    match regex!(r"(?s)^([A-Za-z0-9_-]+)\s*(?:\((.*)\))?$").captures(segment) {
        Some(caps) => EffectCall {
            name: caps[1].to_string(),
            argument: caps.get(2).map(|m| m.as_str().trim().to_string()).filter(|a| !a.is_empty()),
        },
        None => EffectCall { name: segment.to_string(), argument: None },
    }
}
