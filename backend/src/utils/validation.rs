// utils/validation.rs
use std::borrow::Cow;
use validator::ValidationError;

pub const PHONE_MIN_DIGITS: usize = 7;
pub const PHONE_MAX_DIGITS: usize = 15;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Valider un numéro de téléphone : `+` facultatif suivi de 7 à 15 chiffres
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);

    if digits.is_empty() {
        return Err(error("blank", "This field may not be blank."));
    }

    let well_formed = digits.chars().all(|c| c.is_ascii_digit())
        && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len());

    if !well_formed {
        return Err(error("phone_number", "Enter a valid phone number."));
    }

    Ok(())
}

/// Refuser les chaînes vides ou composées uniquement d'espaces
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "This field may not be blank."));
    }
    Ok(())
}

/// Email facultatif : une chaîne vide efface la valeur
pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || validator::validate_email(email) {
        return Ok(());
    }
    Err(error("email", "Enter a valid email address."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10001234567")]
    #[case("+33612345678")]
    #[case("1234567")]
    fn accepts_valid_phone_numbers(#[case] phone: &str) {
        assert!(validate_phone_number(phone).is_ok());
    }

    #[rstest]
    #[case("111")]
    #[case("+")]
    #[case("1234567890123456")]
    #[case("12-34-56-78")]
    #[case("phone")]
    fn rejects_malformed_phone_numbers(#[case] phone: &str) {
        assert!(validate_phone_number(phone).is_err());
    }

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("Ada").is_ok());
    }

    #[test]
    fn empty_email_is_allowed() {
        assert!(validate_optional_email("").is_ok());
        assert!(validate_optional_email("ada@example.com").is_ok());
        assert!(validate_optional_email("not-an-email").is_err());
    }
}
