use super::patient::{PatientData, PatientField};
use crate::error::IntakeError;
use crate::i18n::Language;
use crate::submission::{IntakePayload, PatientPayload};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeKind {
    FirstTime,
    Returning,
}

/// Medical history asked of a patient the clinic has never seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstTimeAnswers {
    pub birth_date: Option<NaiveDate>,
    pub reason_for_visit: String,
    pub last_menstrual_period: Option<NaiveDate>,
    pub pregnancies: Option<u8>,
    pub births: Option<u8>,
    pub allergies: String,
    pub current_medications: String,
    pub chronic_conditions: String,
    pub previous_surgeries: String,
    pub contraceptive_method: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

/// Changes since the last visit, asked of a returning patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturningAnswers {
    pub reason_for_visit: String,
    pub last_menstrual_period: Option<NaiveDate>,
    pub changes_since_last_visit: String,
    pub current_medications: String,
    pub new_allergies: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntakeAnswers {
    FirstTime(FirstTimeAnswers),
    Returning(ReturningAnswers),
}

/// An intake form opened after booking.
///
/// Identity fields come pre-filled from the booking and cannot be edited here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeForm {
    kind: IntakeKind,
    identity: PatientData,
    contact_id: Option<String>,
    answers: IntakeAnswers,
}

impl IntakeForm {
    pub fn new(kind: IntakeKind, identity: PatientData, contact_id: Option<String>) -> Self {
        let answers = match kind {
            IntakeKind::FirstTime => IntakeAnswers::FirstTime(FirstTimeAnswers::default()),
            IntakeKind::Returning => IntakeAnswers::Returning(ReturningAnswers::default()),
        };
        Self {
            kind,
            identity,
            contact_id,
            answers,
        }
    }

    pub fn kind(&self) -> IntakeKind {
        self.kind
    }

    pub fn identity(&self) -> &PatientData {
        &self.identity
    }

    pub fn contact_id(&self) -> Option<&str> {
        self.contact_id.as_deref()
    }

    pub fn is_locked(&self, field: PatientField) -> bool {
        !self.identity.get(field).trim().is_empty()
    }

    /// Edits an identity field; collected fields are locked.
    pub fn set_identity_field(
        &mut self,
        field: PatientField,
        value: impl Into<String>,
    ) -> Result<(), IntakeError> {
        if self.is_locked(field) {
            return Err(IntakeError::FieldLocked(field));
        }
        self.identity.set(field, value);
        Ok(())
    }

    pub fn answers(&self) -> &IntakeAnswers {
        &self.answers
    }

    pub fn first_time_mut(&mut self) -> Option<&mut FirstTimeAnswers> {
        match &mut self.answers {
            IntakeAnswers::FirstTime(answers) => Some(answers),
            IntakeAnswers::Returning(_) => None,
        }
    }

    pub fn returning_mut(&mut self) -> Option<&mut ReturningAnswers> {
        match &mut self.answers {
            IntakeAnswers::Returning(answers) => Some(answers),
            IntakeAnswers::FirstTime(_) => None,
        }
    }

    /// Builds the webhook payload, keyed by the contact id from the booking response.
    pub fn payload(
        &self,
        language: Language,
        submitted_at: DateTime<Utc>,
    ) -> Result<IntakePayload, IntakeError> {
        let contact_id = self.contact_id.clone().ok_or(IntakeError::MissingContact)?;
        Ok(IntakePayload {
            contact_id,
            form_type: self.kind,
            patient: PatientPayload::from(&self.identity),
            answers: self.answers.clone(),
            language,
            submitted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> PatientData {
        PatientData {
            first_name: "Ana".to_string(),
            last_name: "Mora".to_string(),
            email: "ana@example.com".to_string(),
            identification: "1-1234-5678".to_string(),
            phone: "88887777".to_string(),
        }
    }

    #[test]
    fn test_collected_fields_are_locked() {
        let mut form = IntakeForm::new(IntakeKind::FirstTime, identity(), Some("c-1".to_string()));
        assert_eq!(
            form.set_identity_field(PatientField::Email, "other@example.com"),
            Err(IntakeError::FieldLocked(PatientField::Email))
        );
        assert_eq!(form.identity().email, "ana@example.com");
    }

    #[test]
    fn test_answers_match_kind() {
        let mut form = IntakeForm::new(IntakeKind::Returning, identity(), None);
        assert!(form.first_time_mut().is_none());
        form.returning_mut().unwrap().reason_for_visit = "Control".to_string();
        assert!(matches!(form.answers(), IntakeAnswers::Returning(a) if a.reason_for_visit == "Control"));
    }

    #[test]
    fn test_payload_requires_contact() {
        let form = IntakeForm::new(IntakeKind::FirstTime, identity(), None);
        assert_eq!(
            form.payload(Language::Es, Utc::now()).unwrap_err(),
            IntakeError::MissingContact
        );
    }
}
