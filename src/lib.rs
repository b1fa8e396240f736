//! # Consulta - Clinic Booking Engine
//!
//! **Consulta** powers the appointment booking flow of a bilingual (Spanish/English)
//! gynecology clinic. It pairs a validated decision tree, which guides a patient to
//! the right service, with a four-step booking wizard that collects patient data, a
//! date and a time slot, and submits the booking to an external webhook.
//!
//! ## Core Workflow
//!
//! 1.  **Load the Catalog**: Use `ServiceCatalog::clinic()` or load your own with `ServiceCatalog::from_json`.
//! 2.  **Build the Tree**: Describe questions with `TreeDefinition` (or implement `IntoTree` for your own format) and validate it against the catalog with `DecisionTree::builder`. Every terminal must name a known service and the tree must be acyclic.
//! 3.  **Run the Wizard**: Create a `BookingWizard`, pick a service (directly or through the tree), fill in the patient, load availability and choose a slot.
//! 4.  **Confirm**: Hand the wizard a `BookingBackend` such as `WebhookClient`. Transport failures are logged and never block the patient.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use consulta::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! let settings = Settings::from_env()?;
//! let catalog = Arc::new(ServiceCatalog::clinic());
//! let tree = Arc::new(DecisionTree::clinic(&catalog)?);
//! let mut wizard = BookingWizard::new(Arc::clone(&catalog), tree, &settings)?;
//!
//! // Step 1: answer the tree until it resolves to a service
//! wizard.select_tree_label("Ultrasonido")?;
//! wizard.select_tree_label("Sí, estoy embarazada")?;
//! wizard.select_tree_label("Ultrasonido de embarazo (normal)")?;
//! wizard.advance()?;
//!
//! // Step 2: patient data
//! wizard.set_patient_data(PatientData {
//!     first_name: "Ana".into(),
//!     last_name: "Mora".into(),
//!     email: "ana@example.com".into(),
//!     identification: "1-1234-5678".into(),
//!     phone: "8888 7777".into(),
//! })?;
//! wizard.advance()?;
//!
//! // Step 3: date and time from the availability provider
//! let availability = MockAvailability::new(wizard.timezone());
//! let today = availability.today();
//! wizard.load_month(&availability, today.year(), today.month()).await?;
//! if let Some(day) = wizard.displayed_month().and_then(|m| m.first_day()) {
//!     wizard.select_date(day)?;
//!     wizard.select_time("09:00".parse()?)?;
//! }
//! wizard.advance()?;
//!
//! // Step 4: confirm
//! let backend = WebhookClient::new(&settings)?;
//! let outcome = wizard.confirm(&backend, None).await?;
//! println!("Delivered: {}", outcome.is_delivered());
//! # Ok(())
//! # }
//! ```

pub mod availability;
pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod prelude;
pub mod submission;
pub mod summary;
pub mod tree;
pub mod wizard;
