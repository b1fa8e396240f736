use crate::availability::TimeSlot;
use crate::catalog::{Category, Service};
use crate::i18n::Language;
use crate::wizard::{IntakeAnswers, IntakeKind, PatientData, normalize_phone};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use crate::catalog::{DEFAULT_DURATION_MINUTES, parse_duration_minutes};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub identification: String,
    pub phone: String,
    /// The phone reduced to its 8 local digits.
    pub phone_digits: String,
}

impl From<&PatientData> for PatientPayload {
    fn from(data: &PatientData) -> Self {
        Self {
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            full_name: data.full_name(),
            email: data.email.trim().to_string(),
            identification: data.identification.trim().to_string(),
            phone: data.phone.trim().to_string(),
            phone_digits: normalize_phone(&data.phone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price: u64,
    pub duration: String,
    pub duration_minutes: u32,
}

impl ServicePayload {
    pub fn new(service: &Service, language: Language) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name(language).to_string(),
            category: service.category,
            price: service.price,
            duration: service.duration.clone(),
            duration_minutes: service.duration_minutes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<FixedOffset>>,
}

impl AppointmentPayload {
    pub fn new(date: NaiveDate, time: TimeSlot, timezone: Tz, duration_minutes: u32) -> Self {
        let local = date.and_time(time.time());
        // Gaps during DST changes have no instant; the earlier reading wins on overlaps
        let starts_at = timezone.from_local_datetime(&local).earliest();
        if starts_at.is_none() {
            warn!(%local, timezone = %timezone.name(), "appointment time does not exist in timezone");
        }
        let starts_at = starts_at.map(|dt| dt.fixed_offset());
        let ends_at = starts_at.map(|dt| dt + Duration::minutes(i64::from(duration_minutes)));
        Self {
            date,
            time,
            timezone: timezone.name().to_string(),
            starts_at,
            ends_at,
        }
    }
}

/// Everything the booking webhook receives on confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub patient: PatientPayload,
    pub service: ServicePayload,
    pub appointment: AppointmentPayload,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

impl BookingPayload {
    pub fn new(
        patient: &PatientData,
        service: &Service,
        date: NaiveDate,
        time: TimeSlot,
        timezone: Tz,
        language: Language,
        created_at: DateTime<Utc>,
    ) -> Self {
        let service = ServicePayload::new(service, language);
        let appointment = AppointmentPayload::new(date, time, timezone, service.duration_minutes);
        Self {
            patient: PatientPayload::from(patient),
            service,
            appointment,
            language,
            created_at,
        }
    }
}

/// The booking webhook's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub contact_id: String,
    #[serde(default)]
    pub contact_existed: bool,
}

/// An intake form submission, keyed by the contact id from the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakePayload {
    pub contact_id: String,
    pub form_type: IntakeKind,
    pub patient: PatientPayload,
    pub answers: IntakeAnswers,
    pub language: Language,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ServiceCatalog;
    use serde_json::json;

    #[test]
    fn test_booking_payload_shape() {
        let catalog = ServiceCatalog::clinic();
        let patient = PatientData {
            first_name: " Ana ".to_string(),
            last_name: "Mora".to_string(),
            email: "ana@example.com".to_string(),
            identification: "1-1234-5678".to_string(),
            phone: "+506 8888-7777".to_string(),
        };
        let payload = BookingPayload::new(
            &patient,
            catalog.get("consulta-gine").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            "09:00".parse().unwrap(),
            chrono_tz::America::Costa_Rica,
            Language::Es,
            Utc::now(),
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["patient"]["firstName"], json!("Ana"));
        assert_eq!(value["patient"]["phoneDigits"], json!("88887777"));
        assert_eq!(value["service"]["durationMinutes"], json!(45));
        assert_eq!(value["service"]["category"], json!("consulta"));
        assert_eq!(value["appointment"]["date"], json!("2026-10-19"));
        assert_eq!(value["appointment"]["time"], json!("09:00"));
        assert_eq!(value["appointment"]["timezone"], json!("America/Costa_Rica"));
        assert_eq!(value["appointment"]["startsAt"], json!("2026-10-19T09:00:00-06:00"));
        assert_eq!(value["appointment"]["endsAt"], json!("2026-10-19T09:45:00-06:00"));
        assert_eq!(value["language"], json!("es"));
    }

    #[test]
    fn test_receipt_defaults_contact_existed() {
        let receipt: BookingReceipt = serde_json::from_str(r#"{"contactId":"abc"}"#).unwrap();
        assert_eq!(receipt.contact_id, "abc");
        assert!(!receipt.contact_existed);
    }
}
