use crate::catalog::ServiceCatalog;
use crate::i18n::Language;
use crate::submission::BookingPayload;
use crate::tree::TreePath;
use itertools::Itertools;

/// Formats bookings and decision paths into display strings.
pub struct SummaryFormatter;

impl SummaryFormatter {
    /// Formats a price in colones, grouping thousands the way each language does.
    pub fn format_price(price: u64, language: Language) -> String {
        let separator = match language {
            Language::Es => '.',
            Language::En => ',',
        };
        let digits = price.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(separator);
            }
            grouped.push(c);
        }
        format!("₡{}", grouped)
    }

    /// The step-4 summary of a booking, one line per item.
    pub fn format_booking(payload: &BookingPayload, catalog: &ServiceCatalog) -> String {
        let lang = payload.language;
        let labels = Labels::for_language(lang);
        let service = &payload.service;

        let mut price = Self::format_price(service.price, lang);
        if let Some(note) = catalog.get(&service.id).and_then(|s| s.price_note.as_ref()) {
            price.push_str(&format!(" ({})", note.get(lang)));
        }

        let lines = [
            format!("{}: {}", labels.service, service.name),
            format!("{}: {}", labels.duration, service.duration),
            format!("{}: {}", labels.price, price),
            format!("{}: {}", labels.patient, payload.patient.full_name),
            format!("{}: {}", labels.identification, payload.patient.identification),
            format!("{}: {}", labels.email, payload.patient.email),
            format!("{}: +506 {}", labels.phone, payload.patient.phone_digits),
            format!(
                "{}: {} {} ({})",
                labels.appointment,
                payload.appointment.date.format("%d/%m/%Y"),
                payload.appointment.time,
                payload.appointment.timezone
            ),
        ];
        lines.join("\n")
    }

    /// A tree path as `label > label > service`.
    pub fn format_path(path: &TreePath, catalog: &ServiceCatalog, language: Language) -> String {
        let service = catalog
            .get(&path.service_id)
            .map(|s| s.name(language).to_string())
            .unwrap_or_else(|| path.service_id.clone());
        path.labels
            .iter()
            .map(|label| label.get(language).to_string())
            .chain(std::iter::once(service))
            .join(" > ")
    }
}

struct Labels {
    service: &'static str,
    duration: &'static str,
    price: &'static str,
    patient: &'static str,
    identification: &'static str,
    email: &'static str,
    phone: &'static str,
    appointment: &'static str,
}

impl Labels {
    fn for_language(language: Language) -> Self {
        match language {
            Language::Es => Labels {
                service: "Servicio",
                duration: "Duración",
                price: "Precio",
                patient: "Paciente",
                identification: "Cédula",
                email: "Correo",
                phone: "Teléfono",
                appointment: "Cita",
            },
            Language::En => Labels {
                service: "Service",
                duration: "Duration",
                price: "Price",
                patient: "Patient",
                identification: "ID",
                email: "Email",
                phone: "Phone",
                appointment: "Appointment",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::TimeSlot;
    use crate::wizard::PatientData;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_price_grouping() {
        assert_eq!(SummaryFormatter::format_price(120000, Language::Es), "₡120.000");
        assert_eq!(SummaryFormatter::format_price(120000, Language::En), "₡120,000");
        assert_eq!(SummaryFormatter::format_price(1500000, Language::Es), "₡1.500.000");
        assert_eq!(SummaryFormatter::format_price(950, Language::En), "₡950");
        assert_eq!(SummaryFormatter::format_price(0, Language::Es), "₡0");
    }

    #[test]
    fn test_booking_summary() {
        let catalog = ServiceCatalog::clinic();
        let patient = PatientData {
            first_name: "Ana".into(),
            last_name: "Mora".into(),
            email: "ana@example.com".into(),
            identification: "1-1234-5678".into(),
            phone: "+506 8888 7777".into(),
        };
        let payload = BookingPayload::new(
            &patient,
            catalog.get("t-cobre").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            TimeSlot::new(9, 0).unwrap(),
            chrono_tz::America::Costa_Rica,
            Language::Es,
            Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap(),
        );

        let summary = SummaryFormatter::format_booking(&payload, &catalog);
        assert!(summary.contains("Precio: ₡120.000 (Incluye el dispositivo)"));
        assert!(summary.contains("Paciente: Ana Mora"));
        assert!(summary.contains("Teléfono: +506 88887777"));
        assert!(summary.contains("Cita: 19/10/2026 09:00 (America/Costa_Rica)"));
    }
}
