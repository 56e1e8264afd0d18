//! Validation utilities for the Paddy Reception Platform
//!
//! Includes Chile-specific validations (RUT, phone numbers, license plates).

use std::borrow::Cow;

use validator::ValidationError;

// ============================================================================
// Chile-Specific Validations
// ============================================================================

/// Compute the RUT check digit (modulo 11) for the numeric body
pub fn rut_check_digit(body: u32) -> char {
    let mut sum = 0;
    let mut factor = 2;
    let mut n = body;
    while n > 0 {
        sum += (n % 10) * factor;
        n /= 10;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Validate a Chilean RUT
/// Accepts: 12.345.678-5, 12345678-5, 123456785, 7.654.321-k
pub fn validate_rut(rut: &str) -> Result<(), &'static str> {
    let cleaned: String = rut
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .collect::<String>()
        .to_uppercase();

    if cleaned.len() < 2 {
        return Err("RUT is too short");
    }

    let (body, dv) = cleaned.split_at(cleaned.len() - 1);
    if body.len() > 8 || !body.chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid RUT format");
    }
    let body: u32 = body.parse().map_err(|_| "Invalid RUT format")?;
    if body == 0 {
        return Err("Invalid RUT format");
    }

    let expected = rut_check_digit(body);
    if dv.chars().next() != Some(expected) {
        return Err("Invalid RUT check digit");
    }
    Ok(())
}

/// Format a RUT as `12.345.678-5`
pub fn format_rut(rut: &str) -> Option<String> {
    validate_rut(rut).ok()?;
    let cleaned: String = rut
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();
    let (body, dv) = cleaned.split_at(cleaned.len() - 1);

    let mut grouped = String::new();
    for (i, c) in body.chars().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    Some(format!("{}-{}", grouped, dv))
}

/// Validate Chilean phone number format
/// Accepts: 912345678, 9 1234 5678, +56912345678, 56223456789
pub fn validate_chile_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 9 {
        return Ok(());
    }
    if digits.len() == 11 && digits.starts_with("56") {
        return Ok(());
    }

    Err("Invalid Chilean phone number format")
}

/// Validate Chilean license plate
/// Accepts the old format AB1234 and the current BCDF12, with optional separators
pub fn validate_license_plate(plate: &str) -> Result<(), &'static str> {
    let cleaned: Vec<char> = plate
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() != 6 {
        return Err("License plate must have 6 characters");
    }

    let letters = |s: &[char]| s.iter().all(|c| c.is_ascii_uppercase());
    let digits = |s: &[char]| s.iter().all(|c| c.is_ascii_digit());

    let old_format = letters(&cleaned[..2]) && digits(&cleaned[2..]);
    let new_format = letters(&cleaned[..4]) && digits(&cleaned[4..]);

    if old_format || new_format {
        Ok(())
    } else {
        Err("Invalid license plate format")
    }
}

// ============================================================================
// validator adapters
// ============================================================================

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

pub fn validate_rut_field(rut: &str) -> Result<(), ValidationError> {
    validate_rut(rut).map_err(|_| field_error("rut", "RUT inválido"))
}

pub fn validate_phone_field(phone: &str) -> Result<(), ValidationError> {
    validate_chile_phone(phone).map_err(|_| field_error("phone", "Teléfono inválido"))
}
