//! Request validation utilities.

use std::sync::LazyLock;

use jiff::civil::Date;
use regex::Regex;
use validator::ValidationError;

/// Weights of the first checksum pass over the first ten digits.
const PIC_WEIGHTS_FIRST: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 1];
/// Weights of the second pass, used when the first yields 10.
const PIC_WEIGHTS_SECOND: [u32; 10] = [3, 4, 5, 6, 7, 8, 9, 1, 2, 3];

/// Digits with optional spaces or dashes and a leading `+`, e.g. `+372 5555 1234`.
static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-]{4,18}[0-9]$").expect("phone number pattern is a valid regex")
});

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Returns whether `code` is a well-formed Estonian personal identification code.
///
/// The code is `GYYMMDDSSSC`: a century and gender digit, the birth date, a
/// serial number and a modulo-11 check digit.
pub fn is_valid_personal_identification_code(code: &str) -> bool {
    if code.len() != 11 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = code.bytes().map(|b| u32::from(b - b'0')).collect();

    let century = match digits[0] {
        1 | 2 => 1800,
        3 | 4 => 1900,
        5 | 6 => 2000,
        7 | 8 => 2100,
        _ => return false,
    };

    let year = century + (digits[1] * 10 + digits[2]) as i16;
    let month = (digits[3] * 10 + digits[4]) as i8;
    let day = (digits[5] * 10 + digits[6]) as i8;
    if Date::new(year, month, day).is_err() {
        return false;
    }

    checksum(&digits) == digits[10]
}

fn checksum(digits: &[u32]) -> u32 {
    let weighted = |weights: &[u32; 10]| -> u32 {
        digits
            .iter()
            .zip(weights)
            .map(|(digit, weight)| digit * weight)
            .sum::<u32>()
            % 11
    };

    match weighted(&PIC_WEIGHTS_FIRST) {
        10 => match weighted(&PIC_WEIGHTS_SECOND) {
            10 => 0,
            check => check,
        },
        check => check,
    }
}

pub fn validate_personal_identification_code(code: &str) -> Result<(), ValidationError> {
    if is_valid_personal_identification_code(code) {
        return Ok(());
    }

    Err(validation_error(
        "invalid_personal_identification_code",
        "Personal identification code is not valid",
    ))
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "Value must not be blank"));
    }
    Ok(())
}

/// Blank values pass; they are normalized to no phone number.
pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || PHONE_NUMBER.is_match(value) {
        return Ok(());
    }
    Err(validation_error("phone", "Phone number may contain digits, spaces, dashes and a leading +"))
}

/// Trims a string and drops it when nothing remains.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_codes() {
        assert!(is_valid_personal_identification_code("37605030299"));
        assert!(is_valid_personal_identification_code("49403136526"));
    }

    #[test]
    fn rejects_wrong_check_digit() {
        assert!(!is_valid_personal_identification_code("37605030291"));
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(!is_valid_personal_identification_code(""));
        assert!(!is_valid_personal_identification_code("3760503029"));
        assert!(!is_valid_personal_identification_code("3760503029a"));
        assert!(!is_valid_personal_identification_code("97605030299"));
    }

    #[test]
    fn rejects_impossible_birth_date() {
        // 1976-02-30
        assert!(!is_valid_personal_identification_code("37602300299"));
    }

    #[test]
    fn validator_wrapper_reports_code() {
        let error = validate_personal_identification_code("37605030291").unwrap_err();
        assert_eq!(error.code, "invalid_personal_identification_code");
        assert!(validate_personal_identification_code("37605030299").is_ok());
    }

    #[test]
    fn phone_numbers() {
        assert!(validate_phone_number("+372 5555 1234").is_ok());
        assert!(validate_phone_number("5555-1234").is_ok());
        assert!(validate_phone_number(" 55551234 ").is_ok());
        assert!(validate_phone_number("  ").is_ok());
        assert!(validate_phone_number("call me").is_err());
        assert!(validate_phone_number("+3").is_err());
    }

    #[test]
    fn blank_and_optional_helpers() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("Mari").is_ok());
        assert_eq!(normalize_optional(Some("  ".to_owned())), None);
        assert_eq!(
            normalize_optional(Some(" +372 5555 ".to_owned())),
            Some("+372 5555".to_owned())
        );
    }
}
