//! Brace-matching rule parser.
//!
//! Turns source text into an ordered list of [`RuleBlock`]s without a grammar
//! library. The document shape is fixed at two levels:
//!
//! ```text
//! selector {                      <- RuleBlock (opaque selector text)
//!     trigger.name {              <- TriggerClause
//!         property: a(1), b;      <- PropertyAction (value unparsed)
//!     };                          <- trailing `;` optional
//! }
//! ```
//!
//! ## Pass structure
//!
//! ```text
//! (0) strip comments       -> `/* .. */` and `// ..` removed once, up front
//! (1) scan top level       -> selector text up to `{`, brace-matched body
//! (2) scan each body       -> trigger name up to `{`, brace-matched body
//! (3) extract actions      -> `prop: value;` pairs from the flat clause text
//! ```
//!
//! ## Recovery
//!
//! The parser never fails. Unbalanced input truncates locally:
//!
//! - A body whose braces never close runs to the end of the text; the parse
//!   ends there with whatever that body held.
//! - A stray `}` where a selector or trigger name is expected is skipped, so it
//!   cannot leak into the next name.
//! - Text with no following `{` (trailing garbage) is discarded.
//! - `prop: value` without a terminating `;` is dropped.
//!
//! The brace matcher counts arbitrary depth, but action extraction is flat:
//! deeper blocks inside a clause body are not parsed as clauses.

use crate::{PropertyAction, RuleBlock, TriggerClause};
use tracing::debug;

/// Remove `/* ... */` spans (across lines) and `//` comments to end of line.
pub(crate) fn strip_comments(source: &str) -> String {
    let without_blocks = regex!(r"(?s)/\*.*?\*/").replace_all(source, "");
    regex!(r"(?m)//.*$").replace_all(&without_blocks, "").into_owned()
}

/// Cursor over one brace-delimited level of text.
///
/// The same two-step scan (name up to `{`, then a brace-matched body) is used
/// for both the top level and the inside of each rule block.
///
/// ```text
/// "  #hero { click { text: fall; } }  "
///    ^ pos
/// next_group() -> Some(("#hero", " click { text: fall; } "))
///                                                          ^ pos
/// ```
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Scanner { text, pos: 0 }
    }

    fn rest(&self) -> &'a [u8] {
        &self.text.as_bytes()[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while self.rest().first().is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    /// Read the next `name { body }` group.
    ///
    /// Returns `None` once no further `{` exists. All delimiters are ASCII, so
    /// byte offsets always land on char boundaries.
    fn next_group(&mut self) -> Option<(&'a str, &'a str)> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            let open = rest.iter().position(|&b| b == b'{')?;

            // A `}` before the next `{` closes nothing: skip past it.
            if let Some(stray) = rest[..open].iter().position(|&b| b == b'}') {
                debug!(offset = self.pos + stray, "skipping unmatched closing brace");
                self.pos += stray + 1;
                continue;
            }

            let name = self.text[self.pos..self.pos + open].trim();
            self.pos += open + 1;
            let body = self.match_braces();
            return Some((name, body));
        }
    }

    /// Consume a body whose opening `{` was already read; depth starts at 1.
    fn match_braces(&mut self) -> &'a str {
        let start = self.pos;
        let mut depth = 1usize;
        let bytes = self.text.as_bytes();

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let body = &self.text[start..self.pos];
                        self.pos += 1;
                        return body;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }

        debug!(offset = start, depth, "unterminated block, truncating at end of input");
        &self.text[start..]
    }

    /// Consume an optional `;` after a clause.
    fn skip_terminator(&mut self) {
        self.skip_whitespace();
        if self.rest().first() == Some(&b';') {
            self.pos += 1;
        }
    }
}

/// Parse a rule-language document.
///
/// Empty or whitespace-only input yields no blocks.
pub(crate) fn parse_document(source: &str) -> Vec<RuleBlock> {
    let code = strip_comments(source);
    let mut blocks = Vec::new();
    let mut top = Scanner::new(&code);

    while let Some((selector, inner)) = top.next_group() {
        blocks.push(RuleBlock { selector: selector.to_string(), triggers: parse_triggers(inner) });
    }

    debug!(blocks = blocks.len(), "parsed document");
    blocks
}

fn parse_triggers(inner: &str) -> Vec<TriggerClause> {
    let mut triggers = Vec::new();
    let mut scanner = Scanner::new(inner);

    while let Some((name, body)) = scanner.next_group() {
        scanner.skip_terminator();
        if name.is_empty() {
            debug!("skipping trigger block without a name");
            continue;
        }
        triggers.push(TriggerClause { name: name.to_string(), actions: parse_actions(body) });
    }

    triggers
}

/// Extract `property: value;` pairs from flat clause text, in source order.
///
/// Values stop at `;` and never span braces, so text of a nested block
/// contributes its own pairs rather than swallowing the braces.
fn parse_actions(body: &str) -> Vec<PropertyAction> {
    regex!(r"([a-zA-Z-]+)\s*:\s*([^;{}]+);")
        .captures_iter(body)
        .filter_map(|caps| {
            let value = caps[2].trim();
            if value.is_empty() {
                return None;
            }
            Some(PropertyAction { property: caps[1].to_string(), value: value.to_string() })
        })
        .collect()
}
