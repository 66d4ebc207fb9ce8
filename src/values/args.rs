//! Argument records for the standard effect catalog.
//!
//! Effects receive their argument as raw text (`slideIn(left, 50px, 800ms)`
//! hands `left, 50px, 800ms` to the effect). These records give effect
//! implementations a typed view with the catalog defaults filled in. Parsing
//! is lenient: unreadable parts fall back to the default for that slot.

use super::arg_parts;
use super::duration::{DEFAULT_DURATION, duration_or};
use crate::ValueError;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ValueError::UnknownDirection(s.to_string())),
        }
    }
}

/// `slideIn` / `slideOut`: `(direction, distance, duration)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideArgs {
    pub direction: Direction,
    pub distance: String,
    pub duration: Duration,
}

impl SlideArgs {
    pub fn parse(arg: Option<&str>) -> Self {
        let parts = arg_parts(arg);
        let direction = match parts.first().filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!(%err, "slide direction falls back to left");
                Direction::Left
            }),
            None => Direction::Left,
        };

        SlideArgs {
            direction,
            distance: slot(&parts, 1).unwrap_or("30px").to_string(),
            duration: duration_or(slot(&parts, 2), DEFAULT_DURATION),
        }
    }

    /// Signed horizontal offset the element starts from when sliding in.
    pub fn start_offset(&self) -> String {
        match self.direction {
            Direction::Left => format!("-{}", self.distance),
            Direction::Right => self.distance.clone(),
        }
    }
}

/// `pop` / `implode`: `(scale, duration)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleArgs {
    pub scale: f64,
    pub duration: Duration,
}

impl ScaleArgs {
    pub const DEFAULT_SCALE: f64 = 1.2;
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

    pub fn parse(arg: Option<&str>) -> Self {
        let parts = arg_parts(arg);
        let scale = match slot(&parts, 0) {
            Some(raw) => parse_scale(raw).unwrap_or_else(|err| {
                warn!(%err, "scale falls back to {}", Self::DEFAULT_SCALE);
                Self::DEFAULT_SCALE
            }),
            None => Self::DEFAULT_SCALE,
        };

        ScaleArgs { scale, duration: duration_or(slot(&parts, 1), Self::DEFAULT_DURATION) }
    }
}

/// Strict scale factor: finite and non-zero.
pub fn parse_scale(text: &str) -> Result<f64, ValueError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s != 0.0)
        .ok_or_else(|| ValueError::InvalidNumber(text.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShakeStyle {
    #[default]
    Sideways,
    Seesaw,
    CocktailShaker,
}

/// `shake`: `(style, intensity, duration)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeArgs {
    pub style: ShakeStyle,
    pub intensity: String,
    pub duration: Duration,
}

impl ShakeArgs {
    pub fn parse(arg: Option<&str>) -> Self {
        let parts = arg_parts(arg);
        let style = match slot(&parts, 0).map(str::to_ascii_lowercase).as_deref() {
            Some("seesaw") => ShakeStyle::Seesaw,
            Some("cocktail-shaker") => ShakeStyle::CocktailShaker,
            _ => ShakeStyle::Sideways,
        };

        ShakeArgs {
            style,
            intensity: slot(&parts, 1).unwrap_or("10px").to_string(),
            duration: duration_or(slot(&parts, 2), DEFAULT_DURATION),
        }
    }

    /// Transform applied at each keyframe, first to last.
    pub fn keyframes(&self) -> Vec<String> {
        let i = &self.intensity;
        match self.style {
            ShakeStyle::Seesaw => ["0deg", "5deg", "-5deg", "3deg", "-3deg", "0deg"]
                .iter()
                .map(|deg| format!("rotate({deg})"))
                .collect(),
            ShakeStyle::CocktailShaker => axis_wobble("translateY", i),
            ShakeStyle::Sideways => axis_wobble("translateX", i),
        }
    }

    /// Time spent on each keyframe transition.
    pub fn frame_duration(&self) -> Duration {
        let frames = self.keyframes().len().saturating_sub(1).max(1) as u32;
        self.duration / frames
    }
}

fn axis_wobble(axis: &str, intensity: &str) -> Vec<String> {
    vec![
        format!("{axis}(0)"),
        format!("{axis}(-{intensity})"),
        format!("{axis}({intensity})"),
        format!("{axis}(-{intensity})"),
        format!("{axis}({intensity})"),
        format!("{axis}(0)"),
    ]
}

/// `fadeColor`: `(from, to, duration)`. Colors stay raw text; see
/// [`crate::values::Color`] for normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeColorArgs {
    pub from: String,
    pub to: String,
    pub duration: Duration,
}

impl FadeColorArgs {
    pub fn parse(arg: Option<&str>) -> Self {
        let parts = arg_parts(arg);
        FadeColorArgs {
            from: slot(&parts, 0).unwrap_or("#000000").to_string(),
            to: slot(&parts, 1).unwrap_or("#ffffff").to_string(),
            duration: duration_or(slot(&parts, 2), Duration::from_millis(1000)),
        }
    }
}

fn slot<'a>(parts: &[&'a str], idx: usize) -> Option<&'a str> {
    parts.get(idx).copied().filter(|p| !p.is_empty())
}
