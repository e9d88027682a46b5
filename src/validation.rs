// src/validation.rs
// DOCUMENTATION: Field rules shared by request DTOs
// PURPOSE: Thai phone numbers and slug generation

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// Mobile: 06/08/09 + 8 digits. Landline: 02-07 + 7 digits. `+66` replaces the leading 0.
const THAI_PHONE_PATTERN: &str = r"^(?:\+66|0)(?:[689]\d{8}|[2-7]\d{7})$";

static THAI_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(THAI_PHONE_PATTERN).expect("valid regex"));

/// Strip the separators people type into phone fields
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

pub fn is_valid_thai_phone(raw: &str) -> bool {
    THAI_PHONE_RE.is_match(&normalize_phone(raw))
}

/// `validator` hook for phone fields
pub fn validate_thai_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_thai_phone(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("thai_phone");
        err.message = Some(Cow::from("must be a valid Thai phone number"));
        Err(err)
    }
}

/// `validator` hook for "HH:MM" check-in/out times
pub fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    match chrono::NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut err = ValidationError::new("clock_time");
            err.message = Some(Cow::from("must be formatted as HH:MM"));
            Err(err)
        }
    }
}

/// URL slug from a listing name. Non-ASCII (Thai) names fall back to "campsite".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "campsite".to_string()
    } else {
        slug.truncate(80);
        slug.trim_end_matches('-').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_thai_numbers() {
        for phone in [
            "0812345678",
            "081-234-5678",
            "091 234 5678",
            "0612345678",
            "+66812345678",
            "021234567",
            "053123456",
            "+6621234567",
        ] {
            assert!(is_valid_thai_phone(phone), "{} should be valid", phone);
        }
    }

    #[test]
    fn test_invalid_thai_numbers() {
        for phone in [
            "",
            "12345",
            "0112345678",
            "081234567",
            "08123456789",
            "+660812345678",
            "+1 415 555 0100",
            "08a2345678",
            "011234567",
        ] {
            assert!(!is_valid_thai_phone(phone), "{} should be invalid", phone);
        }
    }

    #[test]
    fn test_validate_hook_message() {
        let err = validate_thai_phone("nope").unwrap_err();
        assert_eq!(err.code, "thai_phone");
    }

    #[test]
    fn test_clock_time() {
        assert!(validate_clock_time("14:00").is_ok());
        assert!(validate_clock_time("25:00").is_err());
        assert!(validate_clock_time("2pm").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Doi Inthanon  Camp & Glamp!"), "doi-inthanon-camp-glamp");
        assert_eq!(slugify("  Khao Yai "), "khao-yai");
        assert_eq!(slugify("ลานกางเต็นท์"), "campsite");
        assert_eq!(slugify("Pai 2024"), "pai-2024");
    }
}
