//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the consulta crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use consulta::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = ServiceCatalog::clinic();
//! let tree = DecisionTree::clinic(&catalog)?;
//!
//! for path in tree.paths() {
//!     println!("{}", SummaryFormatter::format_path(&path, &catalog, Language::Es));
//! }
//! # Ok(())
//! # }
//! ```

// Catalog and decision tree
pub use crate::catalog::{Category, Service, ServiceCatalog};
pub use crate::tree::{
    ChoiceOutcome, DecisionTree, IntoTree, TreeDefinition, TreeNavigator, TreePath,
};

// Wizard
pub use crate::availability::{AvailabilityProvider, MockAvailability, MonthAvailability, TimeSlot};
pub use crate::wizard::{BookingWizard, IntakeForm, Overlay, PatientData, PatientField, Step};

// Submission
pub use crate::submission::{
    BookingBackend, BookingPayload, ContactStore, FileContactStore, SubmissionOutcome,
    WebhookClient,
};

// Settings and localization
pub use crate::config::Settings;
pub use crate::i18n::{Language, Localized};

// Error types
pub use crate::error::{TreeError, ValidationErrors, WizardError};

// Summary formatting
pub use crate::summary::SummaryFormatter;

// Date helpers commonly used with the wizard
pub use chrono::{Datelike, NaiveDate};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
