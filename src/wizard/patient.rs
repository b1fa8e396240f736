use crate::error::{ValidationError, ValidationErrors};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local country-code prefix stripped from phone numbers.
pub const COUNTRY_PREFIX: &str = "506";
pub const PHONE_DIGITS: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\+\s*506").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatientField {
    FirstName,
    LastName,
    Email,
    Identification,
    Phone,
}

impl PatientField {
    pub const ALL: [PatientField; 5] = [
        PatientField::FirstName,
        PatientField::LastName,
        PatientField::Email,
        PatientField::Identification,
        PatientField::Phone,
    ];
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PatientField::FirstName => "First name",
            PatientField::LastName => "Last name",
            PatientField::Email => "Email",
            PatientField::Identification => "Identification",
            PatientField::Phone => "Phone",
        })
    }
}

/// Identity and contact details collected in step 2. All free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub identification: String,
    pub phone: String,
}

impl PatientData {
    pub fn get(&self, field: PatientField) -> &str {
        match field {
            PatientField::FirstName => &self.first_name,
            PatientField::LastName => &self.last_name,
            PatientField::Email => &self.email,
            PatientField::Identification => &self.identification,
            PatientField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: PatientField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PatientField::FirstName => self.first_name = value,
            PatientField::LastName => self.last_name = value,
            PatientField::Email => self.email = value,
            PatientField::Identification => self.identification = value,
            PatientField::Phone => self.phone = value,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        for field in [
            PatientField::FirstName,
            PatientField::LastName,
            PatientField::Identification,
        ] {
            if self.get(field).trim().is_empty() {
                errors.push(ValidationError::Required(field));
            }
        }
        if self.email.trim().is_empty() {
            errors.push(ValidationError::Required(PatientField::Email));
        } else if !is_valid_email(&self.email) {
            errors.push(ValidationError::InvalidEmail(self.email.clone()));
        }
        if self.phone.trim().is_empty() {
            errors.push(ValidationError::Required(PatientField::Phone));
        } else if !is_valid_phone(&self.phone) {
            errors.push(ValidationError::InvalidPhone(self.phone.clone()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Strips a leading `+506` and every non-digit.
///
/// A bare `506` prefix is only stripped when it leaves a full local number,
/// so local numbers that happen to start with 506 survive.
pub fn normalize_phone(phone: &str) -> String {
    let without_prefix = PHONE_PREFIX.replace(phone, "");
    let digits: String = without_prefix.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.strip_prefix(COUNTRY_PREFIX) {
        Some(local) if digits.len() == COUNTRY_PREFIX.len() + PHONE_DIGITS => local.to_string(),
        _ => digits,
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    normalize_phone(phone).len() == PHONE_DIGITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("+50688887777"));
        assert!(!is_valid_phone("+5068888777"));
        assert!(is_valid_phone("88887777"));
        assert!(is_valid_phone("+506 8888-7777"));
        assert!(is_valid_phone("(506) 8888 7777"));
        assert!(!is_valid_phone("8888-777"));
        assert_eq!(normalize_phone("+506 8888-7777"), "88887777");
        assert_eq!(normalize_phone("50612345"), "50612345");
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(is_valid_email("a.b@c.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
    }

    #[test]
    fn test_validate_reports_every_field() {
        let data = PatientData {
            first_name: "  ".to_string(),
            last_name: "Mora".to_string(),
            email: "ana@".to_string(),
            identification: String::new(),
            phone: "123".to_string(),
        };
        let errors = data.validate().unwrap_err();
        assert_eq!(errors.0.len(), 4);
        assert!(errors.has_field(PatientField::FirstName));
        assert!(errors.has_field(PatientField::Identification));
        assert!(errors.has_field(PatientField::Email));
        assert!(errors.has_field(PatientField::Phone));
        assert!(!errors.has_field(PatientField::LastName));
    }
}
