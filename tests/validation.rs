//! Input validation rules as seen through the public API.
mod common;
use common::*;
use consulta::error::ValidationError;
use consulta::prelude::*;
use consulta::submission::parse_duration_minutes;
use consulta::wizard::{is_valid_email, is_valid_phone, normalize_phone};

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_phone_examples() {
        assert!(is_valid_phone("+50688887777"));
        assert!(!is_valid_phone("+5068888777"));
        assert!(is_valid_phone("88887777"));
        assert_eq!(normalize_phone("+506 8888 7777"), "88887777");
    }

    #[test]
    fn test_email_examples() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(is_valid_email("a.b@c.com"));
    }

    #[test]
    fn test_duration_examples() {
        assert_eq!(parse_duration_minutes("45 min (1ª vez) / 30 min"), Some(45));
        assert_eq!(parse_duration_minutes("30 min"), Some(30));
        assert_eq!(parse_duration_minutes("a convenir"), None);
    }

    #[test]
    fn test_catalog_durations_are_parseable() {
        let catalog = catalog();
        for service in catalog.iter() {
            assert!(
                parse_duration_minutes(&service.duration).is_some(),
                "'{}' has no minutes in '{}'",
                service.id,
                service.duration
            );
        }
        assert_eq!(catalog.get("consulta-gine").unwrap().duration_minutes(), 45);
    }

    #[test]
    fn test_empty_patient_lists_all_required_fields() {
        let errors = PatientData::default().validate().unwrap_err();
        assert_eq!(errors.0.len(), 5);
        for field in PatientField::ALL {
            assert!(errors.0.contains(&ValidationError::Required(field)));
        }
    }

    #[test]
    fn test_time_slot_format() {
        assert!("09:00".parse::<TimeSlot>().is_ok());
        assert_eq!(
            "9:00".parse::<TimeSlot>().unwrap_err(),
            ValidationError::InvalidTimeFormat("9:00".to_string())
        );
    }

    #[test]
    fn test_error_messages_join() {
        let mut patient = valid_patient();
        patient.email = "a@b".to_string();
        patient.phone = "123".to_string();
        let errors = patient.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "'a@b' is not a valid email address; '123' does not contain exactly 8 digits"
        );
    }
}
