//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a phone number (digits, spaces, and +-() separators)
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        // Phone stays optional on booking requests
        return Ok(());
    }

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 ()-]{5,19}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone) {
        return Err("Invalid phone number".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_emails() {
        assert!(validate_email("renter@example.com").is_ok());
        assert!(validate_email("owner.name+tag@mail.co.in").is_ok());
    }

    #[test]
    fn rejects_invalid_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough1").is_ok());
    }

    #[test]
    fn phone_is_optional_but_checked_when_present() {
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("98765-43210").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Asha Rao").is_ok());
    }
}
