use crate::ValueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Hex,
    Rgb,
    Rgba,
}

/// A color argument normalized for effect implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color {
    pub format: ColorFormat,
    pub original: String,
    /// `#RRGGBB` for hex input, `rgb(r, g, b)` for functional input.
    pub normalized: String,
    /// Packed `0xRRGGBB`.
    pub numeric: u32,
}

impl Color {
    /// Parse `#RGB`, `#RRGGBB`, `rgb(..)` or `rgba(..)`.
    ///
    /// Named colors (`red`, `orange`) need the host's color resolution and are
    /// rejected here.
    pub fn parse(input: &str) -> Result<Color, ValueError> {
        let text = input.trim().to_ascii_lowercase();
        let invalid = || ValueError::InvalidColor(input.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return Err(invalid()),
            };
            let numeric = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
            return Ok(Color {
                format: ColorFormat::Hex,
                original: input.to_string(),
                normalized: format!("#{}", expanded.to_ascii_uppercase()),
                numeric,
            });
        }

        if text.starts_with("rgb") {
            let format = if text.starts_with("rgba") { ColorFormat::Rgba } else { ColorFormat::Rgb };
            let channels: Vec<u32> = regex!(r"\d+(?:\.\d+)?")
                .find_iter(&text)
                .take(3)
                .filter_map(|m| m.as_str().parse::<f64>().ok())
                .map(|v| v.clamp(0.0, 255.0) as u32)
                .collect();
            let [r, g, b] = channels[..] else {
                return Err(invalid());
            };
            return Ok(Color {
                format,
                original: input.to_string(),
                normalized: format!("rgb({r}, {g}, {b})"),
                numeric: (r << 16) | (g << 8) | b,
            });
        }

        Err(invalid())
    }
}
