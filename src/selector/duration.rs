//! Duration shorthand, e.g. `30d` or `1d2h30m`

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{SelectorError, SelectorResult};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9]+)([a-zA-Z]+)").expect("segment pattern compiles"))
}

fn unit_seconds(unit: &str) -> Option<u64> {
    match unit {
        "d" => Some(SECONDS_PER_DAY),
        "h" => Some(SECONDS_PER_HOUR),
        "m" => Some(SECONDS_PER_MINUTE),
        "s" => Some(1),
        _ => None,
    }
}

/// Parses a duration shorthand into seconds.
///
/// The input is a run of `<integer><unit>` segments with unit one of
/// `d`, `h`, `m`, `s`; segments are summed.
///
/// # Errors
///
/// - `UnsupportedSelectorDurationType` if a segment has an unknown unit
/// - `UnsupportedSelectorDuration` if no segment is found, the total is zero,
///   or the total overflows
pub fn parse_duration(duration: &str) -> SelectorResult<u64> {
    let mut total: u64 = 0;
    let mut segments = 0usize;

    for captures in segment_pattern().captures_iter(duration) {
        segments += 1;
        let unit = &captures[2];
        let multiplier =
            unit_seconds(unit).ok_or_else(|| SelectorError::unsupported_duration_type(unit))?;
        let amount: u64 = captures[1].parse().map_err(|_| {
            SelectorError::unsupported_selector_duration(format!(
                "Duration amount '{}' is too large",
                &captures[1]
            ))
        })?;

        total = amount
            .checked_mul(multiplier)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(|| {
                SelectorError::unsupported_selector_duration(format!(
                    "Duration '{}' is too large",
                    duration
                ))
            })?;
    }

    if segments == 0 {
        return Err(SelectorError::unsupported_selector_duration(format!(
            "No duration segments found in '{}'",
            duration
        )));
    }
    if total == 0 {
        return Err(SelectorError::unsupported_selector_duration(
            "Duration must be positive",
        ));
    }

    Ok(total)
}

/// Formats seconds back into shorthand, largest unit first, zero units
/// omitted. `0` formats as the empty string.
pub fn duration_to_string(seconds: u64) -> String {
    let mut out = String::new();
    let mut remaining = seconds;

    for (unit, size) in [
        ("d", SECONDS_PER_DAY),
        ("h", SECONDS_PER_HOUR),
        ("m", SECONDS_PER_MINUTE),
    ] {
        let count = remaining / size;
        if count > 0 {
            out.push_str(&format!("{}{}", count, unit));
            remaining %= size;
        }
    }
    if remaining != 0 {
        out.push_str(&format!("{}s", remaining));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectorErrorCode;

    #[test]
    fn test_segments_sum() {
        assert_eq!(parse_duration("1d2h").unwrap(), 93600);
        assert_eq!(parse_duration("30d").unwrap(), 2592000);
        assert_eq!(parse_duration("1h30m15s").unwrap(), 5415);
        assert_eq!(parse_duration("90s").unwrap(), 90);
    }

    #[test]
    fn test_unknown_unit() {
        let err = parse_duration("30x").unwrap_err();
        assert_eq!(err.code(), SelectorErrorCode::UnsupportedSelectorDurationType);

        let err = parse_duration("1d2w").unwrap_err();
        assert_eq!(err.code(), SelectorErrorCode::UnsupportedSelectorDurationType);
    }

    #[test]
    fn test_no_segments() {
        for input in ["", "d", "30", "   "] {
            let err = parse_duration(input).unwrap_err();
            assert_eq!(err.code(), SelectorErrorCode::UnsupportedSelectorDuration);
        }
    }

    #[test]
    fn test_zero_and_overflow_rejected() {
        assert_eq!(
            parse_duration("0d").unwrap_err().code(),
            SelectorErrorCode::UnsupportedSelectorDuration
        );
        assert_eq!(
            parse_duration("99999999999999999999d").unwrap_err().code(),
            SelectorErrorCode::UnsupportedSelectorDuration
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(duration_to_string(93600), "1d2h");
        assert_eq!(duration_to_string(2592000), "30d");
        assert_eq!(duration_to_string(3661), "1h1m1s");
        assert_eq!(duration_to_string(0), "");
    }

    #[test]
    fn test_format_parses_back() {
        for seconds in [59, 3600, 93784, 2592000] {
            assert_eq!(parse_duration(&duration_to_string(seconds)).unwrap(), seconds);
        }
    }
}
