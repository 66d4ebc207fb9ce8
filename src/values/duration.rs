use crate::ValueError;
use std::time::Duration;

/// Fallback used when an effect receives no (or an unreadable) duration.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(600);

/// Parse a duration written as `600ms`, `1.5s` or a bare number of milliseconds.
///
/// ```
/// use csscript::values::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// assert_eq!(parse_duration("250").unwrap(), Duration::from_millis(250));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, ValueError> {
    let caps = regex!(r"(?i)^\s*(\d+(?:\.\d*)?|\.\d+)\s*(ms|s)?\s*$")
        .captures(text)
        .ok_or_else(|| ValueError::InvalidDuration(text.to_string()))?;

    let amount: f64 = caps[1].parse().map_err(|_| ValueError::InvalidDuration(text.to_string()))?;
    let millis = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit == "s" => amount * 1000.0,
        _ => amount,
    };

    Ok(Duration::from_nanos((millis * 1_000_000.0).round() as u64))
}

/// Lenient form of [`parse_duration`]: missing or unreadable input yields `default`.
pub fn duration_or(text: Option<&str>, default: Duration) -> Duration {
    match text {
        Some(t) if !t.trim().is_empty() => parse_duration(t).unwrap_or(default),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(parse_duration("600ms").unwrap(), Duration::from_millis(600));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration(" 0.25s ").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("40").unwrap(), Duration::from_millis(40));
        assert_eq!(parse_duration("300MS").unwrap(), Duration::from_millis(300));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_duration("fast"), Err(ValueError::InvalidDuration("fast".into())));
        assert!(parse_duration("-5ms").is_err());
        assert!(parse_duration("5min").is_err());
    }

    #[test]
    fn lenient_fallback() {
        assert_eq!(duration_or(None, DEFAULT_DURATION), DEFAULT_DURATION);
        assert_eq!(duration_or(Some("  "), DEFAULT_DURATION), DEFAULT_DURATION);
        assert_eq!(duration_or(Some("soon"), Duration::from_millis(300)), Duration::from_millis(300));
        assert_eq!(duration_or(Some("1s"), DEFAULT_DURATION), Duration::from_secs(1));
    }
}
