use crate::wizard::{PatientField, Step};
use std::fmt;
use thiserror::Error;

/// Errors raised while assembling the service catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Failed to parse catalog JSON: {0}")]
    JsonParseError(String),

    #[error("Service id '{0}' appears more than once in the catalog")]
    DuplicateService(String),
}

/// Errors raised while building or walking a decision tree.
///
/// Everything except `InvalidChoice` is a data-integrity problem in the tree
/// definition and is reported by `TreeBuilder::build` before a tree can exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Failed to parse tree JSON: {0}")]
    JsonParseError(String),

    #[error("Root question '{0}' is not defined in the tree")]
    RootNotFound(String),

    #[error("Question id '{0}' is defined more than once")]
    DuplicateNode(String),

    #[error("Question '{missing_node_id}' not found, which is required by a choice on question '{source_node_id}'")]
    NodeNotFound {
        missing_node_id: String,
        source_node_id: String,
    },

    #[error("Question '{node_id}' points to service '{service_id}', which is not in the catalog")]
    UnknownService { node_id: String, service_id: String },

    #[error("Question '{0}' has no choices")]
    EmptyQuestion(String),

    #[error("Question '{0}' can reach itself")]
    Cycle(String),

    #[error("Question '{node_id}' has no choice at index {index}")]
    InvalidChoice { node_id: String, index: usize },

    #[error("Question '{node_id}' has no choice labelled '{label}'")]
    LabelNotFound { node_id: String, label: String },
}

/// A single field-level validation failure on user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No service has been selected")]
    ServiceMissing,

    #[error("{0} is required")]
    Required(PatientField),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("'{0}' does not contain exactly 8 digits")]
    InvalidPhone(String),

    #[error("No date has been selected")]
    DateMissing,

    #[error("No time has been selected")]
    TimeMissing,

    #[error("{0} is not an available day")]
    DateUnavailable(chrono::NaiveDate),

    #[error("{time} is not an available slot on {date}")]
    TimeUnavailable {
        date: chrono::NaiveDate,
        time: String,
    },

    #[error("'{0}' is not a valid HH:mm time")]
    InvalidTimeFormat(String),
}

/// Every validation failure of one step, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns true when the given patient field has at least one failure.
    pub fn has_field(&self, field: PatientField) -> bool {
        self.0.iter().any(|e| match e {
            ValidationError::Required(f) => *f == field,
            ValidationError::InvalidEmail(_) => field == PatientField::Email,
            ValidationError::InvalidPhone(_) => field == PatientField::Phone,
            _ => false,
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = itertools::join(self.0.iter(), "; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

/// Errors raised by wizard navigation and confirmation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Step {step} is not valid: {errors}")]
    Invalid { step: Step, errors: ValidationErrors },

    #[error("Cannot jump to step {requested}; the furthest reachable step is {reachable}")]
    StepLocked { requested: u8, reachable: u8 },

    #[error("There is no step {0}")]
    NoSuchStep(u8),

    #[error("Cannot advance from step {from}; the wizard is on step {current}")]
    StepMismatch { from: Step, current: Step },

    #[error("Step {0} is the last step")]
    LastStep(Step),

    #[error("This action is only available on step {expected}, not {current}")]
    WrongStep { expected: Step, current: Step },

    #[error("The booking has already been confirmed")]
    AlreadyConfirmed,

    #[error("The current overlay does not allow this action")]
    InvalidOverlay,

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("Service '{0}' is not in the catalog")]
    UnknownService(String),
}

/// Errors raised while editing an intake form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("{0} was already collected during booking and cannot be edited")]
    FieldLocked(PatientField),

    #[error("No contact id is available to key this form")]
    MissingContact,
}

/// Transport or backend failures while talking to a webhook. Never shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("Webhook '{url}' answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Webhook '{url}' returned a malformed body: {message}")]
    MalformedBody { url: String, message: String },

    #[error("Failed to build the HTTP client: {0}")]
    Client(String),
}

/// Errors raised by an availability provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("{year}-{month:02} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Availability could not be fetched: {0}")]
    Unavailable(String),
}

/// Errors raised while loading settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("'{0}' is not a known IANA timezone")]
    InvalidTimezone(String),

    #[error("'{0}' is not a supported language")]
    InvalidLanguage(String),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Errors raised by the contact id store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Contact store '{path}' could not be accessed: {message}")]
    Io { path: String, message: String },

    #[error("Contact store '{path}' is corrupt: {message}")]
    Corrupt { path: String, message: String },
}
