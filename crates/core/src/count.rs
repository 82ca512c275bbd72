/// Marker the scraper writes when a profile does not expose a value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Converts an abbreviated count such as `3.2K`, `1.5M` or `<5` to a number.
///
/// Never fails: absent, empty, `N/A` and unparsable input all yield `0.0`.
/// Comparison markers are dropped and only the magnitude is kept, so `<5`
/// reads as `5`. The result is always finite and non-negative.
pub fn parse_count(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return 0.0;
    }

    let normalized = raw.trim().to_ascii_uppercase();
    let (number_part, multiplier) = if let Some(prefix) = normalized.strip_suffix('K') {
        (prefix, 1_000.0)
    } else if let Some(prefix) = normalized.strip_suffix('M') {
        (prefix, 1_000_000.0)
    } else {
        (normalized.as_str(), 1.0)
    };

    let literal = number_part.trim().trim_start_matches(|c: char| c == '<' || c == '>').trim();
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value * multiplier,
        _ => 0.0,
    }
}

/// Convenience wrapper for display strings already held by a record.
pub fn parse_count_str(raw: &str) -> f64 {
    parse_count(Some(raw))
}
