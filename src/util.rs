// Utility helpers for parsing, rounding and number formatting.
//
// This module centralizes the "dirty" CSV/number handling so the rest of the
// code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a numeric CSV cell.
///
/// - Empty or missing cells are `Ok(None)`.
/// - Trims whitespace and strips thousands separators like `","`.
/// - Scientific notation (`1.5E3`) is accepted. Anything `f64` cannot parse,
///   and `nan`/`inf`, is rejected with the trimmed text as the error.
pub fn parse_f64_cell(s: Option<&str>) -> Result<Option<f64>, String> {
    let Some(s) = s else {
        return Ok(None);
    };
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.replace(',', "").parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(s.to_string()),
    }
}

/// Decode an uploaded file. UTF-8 is taken as-is; anything else is read as
/// Latin-1, where every byte maps to the code point of the same value.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Round to two decimal places, ties to even.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Closeness test with the usual relative/absolute tolerances
/// (`rtol = 1e-5`, `atol = 1e-8`).
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let s = format!("{:.*}", decimals, n.abs());
    let neg = n < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Two-decimal display of a possibly-null figure.
pub fn format_optional(v: Option<f64>) -> String {
    match v {
        Some(v) => format_number(v, 2),
        None => "n/a".to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Ten-cell bar for a 0–100 score, filled from low to high.
pub fn score_bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 100.0) / 10.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
