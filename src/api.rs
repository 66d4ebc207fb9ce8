use crate::engine::{self, Bindings, Engine, Host};
use crate::{EffectRegistry, RuleBlock};
use std::time::Duration;

/// Options that affect binding behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// How long a press must last before `onHold.click` fires.
    pub hold_threshold: Duration,
    /// Visible ratio (0.0..=1.0) at which `reveal.onScroll` counts as entered.
    pub reveal_threshold: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self { hold_threshold: Duration::from_millis(500), reveal_threshold: 0.1 }
    }
}

/// Parse rule-language `source` into rule blocks.
///
/// Never fails: malformed input yields the blocks that could be recovered.
///
/// # Example
/// ```
/// let blocks = csscript::parse("#hero { window.onLoad { text: fall(600ms); } }");
///
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].selector, "#hero");
/// assert_eq!(blocks[0].triggers[0].name, "window.onLoad");
/// assert_eq!(blocks[0].triggers[0].actions[0].value, "fall(600ms)");
/// ```
pub fn parse(source: &str) -> Vec<RuleBlock> {
    engine::parse_document(source)
}

/// Bind `blocks` into `host` with default [`Options`] and `tracing` diagnostics.
///
/// Use [`Engine`] directly to install a custom diagnostics sink.
pub fn bind<H: Host + 'static>(blocks: &[RuleBlock], effects: EffectRegistry<H::Target>, host: H) -> Bindings {
    bind_with(blocks, effects, host, &Options::default())
}

/// Bind `blocks` into `host` with the provided `options`.
pub fn bind_with<H: Host + 'static>(
    blocks: &[RuleBlock],
    effects: EffectRegistry<H::Target>,
    host: H,
    options: &Options,
) -> Bindings {
    Engine::new(effects, host).with_options(options.clone()).bind(blocks)
}

/// Parse `source` and bind the result in one step.
pub fn process<H: Host + 'static>(source: &str, effects: EffectRegistry<H::Target>, host: H) -> Bindings {
    bind(&parse(source), effects, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Options::default();
        assert_eq!(opts.hold_threshold, Duration::from_millis(500));
        assert_eq!(opts.reveal_threshold, 0.1);
    }

    #[test]
    fn parse_is_pure() {
        let src = "#a { hover { text: rise; } }";
        assert_eq!(parse(src), parse(src));
    }
}
