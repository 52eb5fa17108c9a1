// src/process/utils.rs

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Lenient numeric parse: anything that isn't a finite-or-infinite number is `None`.
/// FRED marks missing observations with `.`, which lands here as `None`.
pub fn parse_f64(raw: &str) -> Option<f64> {
    clean_str(raw).parse::<f64>().ok().filter(|v| !v.is_nan())
}
