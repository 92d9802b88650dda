//! Field rules shared by the profile form and the server-side actions.
//!
//! Every check returns the user-facing message on failure so callers can
//! attach it to the offending field.

use once_cell::sync::Lazy;
use regex::Regex;


static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]*[0-9]$").expect("phone regex"));
static TIME_24H_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").expect("24h regex"));
static TIME_12H_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0?[1-9]|1[0-2]):[0-5][0-9] ?([AaPp][Mm])$").expect("12h regex"));

pub type FieldResult<T> = Result<T, String>;

/// Trimmed length within `min..=max` characters.
pub fn text_len(value: &str, min: usize, max: usize) -> FieldResult<()> {
    let n = value.trim().chars().count();
    if n == 0 {
        return Err("is required".into());
    }
    if n < min {
        return Err(format!("must be at least {min} characters"));
    }
    if n > max {
        return Err(format!("must be at most {max} characters"));
    }
    Ok(())
}

pub fn company_name(value: &str) -> FieldResult<()> { text_len(value, 3, 30) }

pub fn type_of_provider(value: &str) -> FieldResult<()> { text_len(value, 3, 30) }

pub fn bio(value: &str) -> FieldResult<()> { text_len(value, 3, 1000) }

pub fn service_name(value: &str) -> FieldResult<()> { text_len(value, 3, 64) }

pub fn type_of_service(value: &str) -> FieldResult<()> { text_len(value, 3, 64) }

pub fn description(value: &str) -> FieldResult<()> { text_len(value, 3, 1000) }

/// Digits with an optional leading `+`; spaces and dashes allowed between
/// digits; 7 to 15 digits in total.
pub fn phone_number(value: &str) -> FieldResult<()> {
    let v = value.trim();
    if v.is_empty() {
        return Err("is required".into());
    }
    if !PHONE_RE.is_match(v) {
        return Err("must contain only digits, spaces or dashes".into());
    }
    let digits = v.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        return Err("must have between 7 and 15 digits".into());
    }
    Ok(())
}

/// `HH:MM` (24h) or `H:MM AM/PM`.
pub fn time_of_day(value: &str) -> FieldResult<()> {
    let v = value.trim();
    if v.is_empty() {
        return Err("is required".into());
    }
    if TIME_24H_RE.is_match(v) || TIME_12H_RE.is_match(v) {
        Ok(())
    } else {
        Err("must look like 08:00 or 8:00 AM".into())
    }
}

/// Parse a non-negative integer typed into a number input. Malformed or
/// missing input is an error, never zero.
pub fn non_negative_int(value: &str) -> FieldResult<u32> {
    let v = value.trim();
    if v.is_empty() {
        return Err("is required".into());
    }
    if !v.chars().all(|c| c.is_ascii_digit()) {
        return Err("must be a non-negative whole number".into());
    }
    v.parse::<u32>().map_err(|_| "is too large".to_string())
}

pub fn duration_minutes(value: u32) -> FieldResult<()> {
    if value == 0 {
        return Err("must be greater than zero".into());
    }
    Ok(())
}

pub fn price(value: f64) -> FieldResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err("must be a non-negative amount".into());
    }
    Ok(())
}

/// Either empty (an upload will fill it in), an http(s) URL, or an inline
/// image preview.
pub fn image_url(value: &str) -> FieldResult<()> {
    let v = value.trim();
    if v.is_empty() || v.starts_with("http://") || v.starts_with("https://") || v.starts_with("data:image/") {
        Ok(())
    } else {
        Err("must be an image URL".into())
    }
}
