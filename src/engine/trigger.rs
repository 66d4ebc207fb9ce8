//! Trigger-name resolution.
//!
//! A trigger name is raw dotted text from the source (`window.onLoad`,
//! `onHold.click`, `hover`). Resolution turns it into an [`Activation`]: the
//! concrete listening/timing semantics the dispatcher wires up.
//!
//! Names are checked in priority order:
//!
//! ```text
//! 1. composite words   onSing.click | onDbl.click | onHold.click
//!                      reveal.onScroll | DOMContent.onLoad
//! 2. window.<event>    global listener (+ immediate fire for an elapsed load)
//! 3. anything else     per-element listener on the event segment
//! ```
//!
//! Composite words match case-insensitively as a whole. For the generic forms
//! the event segment (the part after the dot in a two-part name, otherwise the
//! whole name) loses a leading `on`, is lowercased, and is mapped to the
//! host's vocabulary (`hover` becomes the pointer-enter event).

use super::host::events;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// `onSing.click`: standard click on each matched element.
    SingleClick,
    /// `onDbl.click`: double click on each matched element.
    DoubleClick,
    /// `onHold.click`: press-and-hold past the hold threshold.
    Hold,
    /// `reveal.onScroll`: first viewport entry of each matched element, once.
    Reveal,
    /// `DOMContent.onLoad`: initial content ready (immediately if already past).
    ContentReady,
    /// `window.<event>`: global listener.
    Window { event: String },
    /// Bare or unrecognized two-part name: listener on each matched element.
    Element { event: String },
}

impl Activation {
    /// Resolve a raw trigger name.
    ///
    /// ```
    /// use csscript::Activation;
    ///
    /// assert_eq!(Activation::resolve("onHold.click"), Activation::Hold);
    /// assert_eq!(Activation::resolve("window.onLoad"), Activation::Window { event: "load".into() });
    /// assert_eq!(Activation::resolve("onHover"), Activation::Element { event: "mouseenter".into() });
    /// ```
    pub fn resolve(name: &str) -> Activation {
        let name = name.trim();

        match name.to_ascii_lowercase().as_str() {
            "onsing.click" => return Activation::SingleClick,
            "ondbl.click" => return Activation::DoubleClick,
            "onhold.click" => return Activation::Hold,
            "reveal.onscroll" => return Activation::Reveal,
            "domcontent.onload" => return Activation::ContentReady,
            _ => {}
        }

        let parts: Vec<&str> = name.split('.').collect();
        let (target, event) = match parts[..] {
            [target, event] => (Some(target.trim()), event.trim()),
            _ => (None, name),
        };
        let event = host_event_name(event);

        match target {
            Some(t) if t.eq_ignore_ascii_case("window") => Activation::Window { event },
            _ => Activation::Element { event },
        }
    }

    /// Whether binding needs matched elements up front.
    pub fn binds_per_target(&self) -> bool {
        !matches!(self, Activation::Window { .. } | Activation::ContentReady)
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::SingleClick => f.write_str("single click"),
            Activation::DoubleClick => f.write_str("double click"),
            Activation::Hold => f.write_str("press-and-hold"),
            Activation::Reveal => f.write_str("reveal once on scroll"),
            Activation::ContentReady => f.write_str("content ready"),
            Activation::Window { event } => write!(f, "window '{event}'"),
            Activation::Element { event } => write!(f, "element '{event}'"),
        }
    }
}

/// Strip a leading `on`, lowercase, and translate DSL names to host names.
fn host_event_name(event: &str) -> String {
    let lower = event.to_ascii_lowercase();
    let bare = lower.strip_prefix("on").unwrap_or(&lower);
    match bare {
        "hover" => events::POINTER_ENTER.to_string(),
        other => other.to_string(),
    }
}
