//! Common test utilities for building wizards, patients and backends.
use async_trait::async_trait;
use consulta::prelude::*;
use consulta::submission::{BookingReceipt, IntakePayload};
use std::sync::{Arc, Mutex};

/// The day the mock calendar treats as today: Friday 2026-10-16.
#[allow(dead_code)]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn slot(s: &str) -> TimeSlot {
    s.parse().unwrap()
}

#[allow(dead_code)]
pub fn mock_availability() -> MockAvailability {
    MockAvailability::starting(today())
}

#[allow(dead_code)]
pub fn catalog() -> Arc<ServiceCatalog> {
    Arc::new(ServiceCatalog::clinic())
}

#[allow(dead_code)]
pub fn tree(catalog: &ServiceCatalog) -> Arc<DecisionTree> {
    Arc::new(DecisionTree::clinic(catalog).expect("built-in tree is valid"))
}

#[allow(dead_code)]
pub fn navigator() -> TreeNavigator {
    let catalog = catalog();
    TreeNavigator::new(tree(&catalog), catalog)
}

/// A wizard over the built-in catalog and tree with default settings.
#[allow(dead_code)]
pub fn wizard() -> BookingWizard {
    let catalog = catalog();
    let tree = tree(&catalog);
    BookingWizard::new(catalog, tree, &Settings::default()).expect("default settings are valid")
}

#[allow(dead_code)]
pub fn valid_patient() -> PatientData {
    PatientData {
        first_name: "Ana".to_string(),
        last_name: "Mora".to_string(),
        email: "ana.mora@example.com".to_string(),
        identification: "1-1234-5678".to_string(),
        phone: "+506 8888 7777".to_string(),
    }
}

/// Drives a fresh wizard to step 4 with `service_id`, a valid patient and
/// Monday 2026-10-19 at 09:00.
#[allow(dead_code)]
pub async fn wizard_ready_to_confirm(service_id: &str) -> BookingWizard {
    let mut wizard = wizard();
    wizard.select_service_by_id(service_id).unwrap();
    wizard.advance().unwrap();
    wizard.set_patient_data(valid_patient()).unwrap();
    wizard.advance().unwrap();
    wizard
        .load_month(&mock_availability(), 2026, 10)
        .await
        .unwrap();
    wizard.select_date(date(2026, 10, 19)).unwrap();
    wizard.select_time(slot("09:00")).unwrap();
    wizard.advance().unwrap();
    wizard
}

/// A backend that records every payload and answers with fixed outcomes.
#[allow(dead_code)]
pub struct RecordingBackend {
    booking_outcome: SubmissionOutcome<BookingReceipt>,
    intake_outcome: SubmissionOutcome<()>,
    pub bookings: Mutex<Vec<BookingPayload>>,
    pub intakes: Mutex<Vec<IntakePayload>>,
}

#[allow(dead_code)]
impl RecordingBackend {
    pub fn new(booking_outcome: SubmissionOutcome<BookingReceipt>) -> Self {
        Self {
            booking_outcome,
            intake_outcome: SubmissionOutcome::Delivered(()),
            bookings: Mutex::new(Vec::new()),
            intakes: Mutex::new(Vec::new()),
        }
    }

    pub fn delivering(contact_id: &str, contact_existed: bool) -> Self {
        Self::new(SubmissionOutcome::Delivered(BookingReceipt {
            contact_id: contact_id.to_string(),
            contact_existed,
        }))
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }

    pub fn last_booking(&self) -> Option<BookingPayload> {
        self.bookings.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl BookingBackend for RecordingBackend {
    async fn submit_booking(&self, payload: &BookingPayload) -> SubmissionOutcome<BookingReceipt> {
        self.bookings.lock().unwrap().push(payload.clone());
        self.booking_outcome.clone()
    }

    async fn submit_intake(&self, payload: &IntakePayload) -> SubmissionOutcome<()> {
        self.intakes.lock().unwrap().push(payload.clone());
        self.intake_outcome.clone()
    }
}
