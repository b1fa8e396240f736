//! The four-step booking wizard and its post-confirmation overlays.
use crate::availability::{AvailabilityProvider, AvailabilityRequest, MonthAvailability, TimeSlot};
use crate::catalog::{Service, ServiceCatalog};
use crate::config::Settings;
use crate::error::{
    AvailabilityError, ConfigError, ValidationError, ValidationErrors, WizardError,
};
use crate::i18n::Language;
use crate::submission::{BookingBackend, BookingPayload, BookingReceipt, ContactStore, SubmissionOutcome};
use crate::tree::{ChoiceOutcome, DecisionTree, TreeNavigator};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

mod intake;
mod overlay;
mod patient;
mod step;

pub use intake::*;
pub use overlay::Overlay;
pub use patient::*;
pub use step::Step;

/// Drives a patient through service, patient data, date/time and confirmation.
///
/// The wizard exclusively owns its state. During step 1 it hosts a
/// `TreeNavigator`; a service resolved there becomes the wizard's selection.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    catalog: Arc<ServiceCatalog>,
    selector: TreeNavigator,
    language: Language,
    timezone: Tz,

    current: Step,
    completed: BTreeSet<Step>,
    service: Option<Service>,
    patient: PatientData,
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,

    months: BTreeMap<(i32, u32), MonthAvailability>,
    latest_request: u64,
    displayed_month: Option<(i32, u32)>,

    confirmed: bool,
    overlay: Overlay,
    contact_id: Option<String>,
    contact_existed: Option<bool>,
    submitted: Option<BookingPayload>,
}

impl BookingWizard {
    pub fn new(
        catalog: Arc<ServiceCatalog>,
        tree: Arc<DecisionTree>,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        let timezone = settings.tz()?;
        Ok(Self {
            selector: TreeNavigator::new(tree, Arc::clone(&catalog)),
            catalog,
            language: settings.language,
            timezone,
            current: Step::Service,
            completed: BTreeSet::new(),
            service: None,
            patient: PatientData::default(),
            date: None,
            time: None,
            months: BTreeMap::new(),
            latest_request: 0,
            displayed_month: None,
            confirmed: false,
            overlay: Overlay::Hidden,
            contact_id: None,
            contact_existed: None,
            submitted: None,
        })
    }

    // --- Accessors ---

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn completed_steps(&self) -> &BTreeSet<Step> {
        &self.completed
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed.contains(&step)
    }

    pub fn selected_service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn patient(&self) -> &PatientData {
        &self.patient
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn selected_time(&self) -> Option<TimeSlot> {
        self.time
    }

    pub fn selector(&self) -> &TreeNavigator {
        &self.selector
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn contact_id(&self) -> Option<&str> {
        self.contact_id.as_deref()
    }

    /// What the backend said about the contact; `None` when it never answered.
    pub fn contact_existed(&self) -> Option<bool> {
        self.contact_existed
    }

    /// The payload sent on confirmation.
    pub fn submitted_payload(&self) -> Option<&BookingPayload> {
        self.submitted.as_ref()
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.confirmed {
            return Err(WizardError::AlreadyConfirmed);
        }
        Ok(())
    }

    // --- Step 1: service ---

    /// Sets the service. A different service invalidates the chosen date and time.
    pub fn select_service(&mut self, service: Service) -> Result<(), WizardError> {
        self.ensure_open()?;
        let changed = self.service.as_ref().map(|s| s.id.as_str()) != Some(service.id.as_str());
        if changed {
            if self.date.is_some() || self.time.is_some() {
                info!(service = %service.id, "service changed, clearing date and time");
            }
            self.date = None;
            self.time = None;
            self.completed.remove(&Step::DateTime);
        }
        debug!(service = %service.id, "service selected");
        self.service = Some(service);
        Ok(())
    }

    /// Picks a service straight from the catalog.
    pub fn select_service_by_id(&mut self, id: &str) -> Result<(), WizardError> {
        let service = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| WizardError::UnknownService(id.to_string()))?;
        self.select_service(service)
    }

    /// Answers the current question of the hosted decision tree.
    ///
    /// Resolving a service selects it; entering another question drops the
    /// current service along with its date and time.
    pub fn select_tree_choice(&mut self, index: usize) -> Result<ChoiceOutcome, WizardError> {
        self.ensure_open()?;
        let outcome = self.selector.select_choice(index)?;
        self.follow_tree(&outcome)?;
        Ok(outcome)
    }

    /// Answers the current question by label in the wizard's language.
    pub fn select_tree_label(&mut self, label: &str) -> Result<ChoiceOutcome, WizardError> {
        self.ensure_open()?;
        let outcome = self.selector.select_by_label(label, self.language)?;
        self.follow_tree(&outcome)?;
        Ok(outcome)
    }

    fn follow_tree(&mut self, outcome: &ChoiceOutcome) -> Result<(), WizardError> {
        match outcome {
            ChoiceOutcome::Resolved(service) => self.select_service(service.clone()),
            ChoiceOutcome::Advanced(_) => {
                self.clear_service();
                Ok(())
            }
        }
    }

    /// Steps the tree back one question, dropping the current service.
    /// Returns false at the root.
    pub fn tree_go_back(&mut self) -> Result<bool, WizardError> {
        self.ensure_open()?;
        let moved = self.selector.go_back();
        if moved {
            self.clear_service();
        }
        Ok(moved)
    }

    pub fn tree_restart(&mut self) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.selector.restart();
        self.clear_service();
        Ok(())
    }

    pub fn hover_tree_choice(&mut self, index: usize) -> Result<Option<&Service>, WizardError> {
        self.ensure_open()?;
        Ok(self.selector.preview_on_hover(index))
    }

    pub fn clear_tree_preview(&mut self) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.selector.clear_preview();
        Ok(())
    }

    fn clear_service(&mut self) {
        if let Some(service) = self.service.take() {
            debug!(service = %service.id, "service cleared by tree navigation");
        }
        self.date = None;
        self.time = None;
        self.completed.remove(&Step::Service);
        self.completed.remove(&Step::DateTime);
    }

    // --- Step 2: patient data ---

    pub fn set_patient_field(
        &mut self,
        field: PatientField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.patient.set(field, value);
        self.recheck_patient();
        Ok(())
    }

    pub fn set_patient_data(&mut self, data: PatientData) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.patient = data;
        self.recheck_patient();
        Ok(())
    }

    // A completed step must stay valid
    fn recheck_patient(&mut self) {
        if self.completed.contains(&Step::PatientData) && self.patient.validate().is_err() {
            self.completed.remove(&Step::PatientData);
        }
    }

    // --- Step 3: date and time ---

    /// Registers a month fetch and returns its ticket. Older tickets become stale.
    pub fn begin_month_load(&mut self, year: i32, month: u32) -> AvailabilityRequest {
        self.latest_request += 1;
        self.displayed_month = Some((year, month));
        AvailabilityRequest {
            token: self.latest_request,
            year,
            month,
        }
    }

    /// Stores a fetched month unless a newer fetch has been started since.
    pub fn apply_month(&mut self, request: AvailabilityRequest, availability: MonthAvailability) -> bool {
        if request.token != self.latest_request {
            debug!(
                token = request.token,
                latest = self.latest_request,
                "discarding stale availability response"
            );
            return false;
        }
        if (availability.year, availability.month) != (request.year, request.month) {
            warn!(
                requested = %format!("{}-{:02}", request.year, request.month),
                received = %format!("{}-{:02}", availability.year, availability.month),
                "availability response is for another month"
            );
            return false;
        }
        self.months.insert((request.year, request.month), availability);
        self.recheck_schedule();
        true
    }

    /// Fetches a month through `provider` and applies it.
    pub async fn load_month(
        &mut self,
        provider: &dyn AvailabilityProvider,
        year: i32,
        month: u32,
    ) -> Result<bool, AvailabilityError> {
        let request = self.begin_month_load(year, month);
        let availability = provider.month(year, month).await?;
        Ok(self.apply_month(request, availability))
    }

    /// Refreshes the slots of one already loaded day.
    pub async fn refresh_day(
        &mut self,
        provider: &dyn AvailabilityProvider,
        date: NaiveDate,
    ) -> Result<(), AvailabilityError> {
        let slots = provider.day(date).await?;
        if let Some(month) = self.months.get_mut(&(date.year(), date.month())) {
            if slots.is_empty() {
                month.days.remove(&date);
            } else {
                month.days.insert(date, slots);
            }
        }
        self.recheck_schedule();
        Ok(())
    }

    // A date or slot that is no longer offered is dropped
    fn recheck_schedule(&mut self) {
        if self.confirmed {
            return;
        }
        if let Some(date) = self.date {
            if !self.is_available(date) {
                info!(%date, "selected day is no longer available");
                self.date = None;
                self.time = None;
            } else if let Some(time) = self.time {
                if !self.availability_for(date).is_some_and(|m| m.contains(date, time)) {
                    info!(%date, %time, "selected slot is no longer available");
                    self.time = None;
                }
            }
        }
        if self.completed.contains(&Step::DateTime) && self.validate_schedule().is_err() {
            self.completed.remove(&Step::DateTime);
        }
    }

    pub fn displayed_month(&self) -> Option<&MonthAvailability> {
        self.displayed_month.and_then(|key| self.months.get(&key))
    }

    pub fn availability_for(&self, date: NaiveDate) -> Option<&MonthAvailability> {
        self.months.get(&(date.year(), date.month()))
    }

    fn is_available(&self, date: NaiveDate) -> bool {
        self.availability_for(date)
            .is_some_and(|m| m.is_available(date))
    }

    /// Picks a day; it must be bookable. Picking another day clears the time.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        self.ensure_open()?;
        if !self.is_available(date) {
            return Err(WizardError::Invalid {
                step: Step::DateTime,
                errors: ValidationError::DateUnavailable(date).into(),
            });
        }
        if self.date != Some(date) {
            self.time = None;
        }
        self.date = Some(date);
        Ok(())
    }

    /// Picks a slot of the selected day.
    pub fn select_time(&mut self, slot: TimeSlot) -> Result<(), WizardError> {
        self.ensure_open()?;
        let date = self.date.ok_or_else(|| WizardError::Invalid {
            step: Step::DateTime,
            errors: ValidationError::DateMissing.into(),
        })?;
        let offered = self
            .availability_for(date)
            .is_some_and(|m| m.contains(date, slot));
        if !offered {
            return Err(WizardError::Invalid {
                step: Step::DateTime,
                errors: ValidationError::TimeUnavailable {
                    date,
                    time: slot.to_string(),
                }
                .into(),
            });
        }
        self.time = Some(slot);
        Ok(())
    }

    // --- Navigation ---

    /// Checks the fields a step requires.
    pub fn validate_step(&self, step: Step) -> Result<(), ValidationErrors> {
        match step {
            Step::Service => match self.service {
                Some(_) => Ok(()),
                None => Err(ValidationError::ServiceMissing.into()),
            },
            Step::PatientData => self.patient.validate(),
            Step::DateTime => self.validate_schedule(),
            Step::Confirm => Ok(()),
        }
    }

    fn validate_schedule(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        match self.date {
            None => errors.push(ValidationError::DateMissing),
            Some(date) if !self.is_available(date) => {
                errors.push(ValidationError::DateUnavailable(date))
            }
            Some(_) => {}
        }
        match (self.date, self.time) {
            (_, None) => errors.push(ValidationError::TimeMissing),
            (Some(date), Some(time)) if self.is_available(date) => {
                if !self.availability_for(date).is_some_and(|m| m.contains(date, time)) {
                    errors.push(ValidationError::TimeUnavailable {
                        date,
                        time: time.to_string(),
                    });
                }
            }
            _ => {}
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    pub fn can_advance(&self) -> bool {
        self.current != Step::Confirm && self.validate_step(self.current).is_ok()
    }

    /// Moves forward from the current step.
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        self.advance_from(self.current)
    }

    /// Completes `from` and moves to the next step, if `from` is current and valid.
    pub fn advance_from(&mut self, from: Step) -> Result<Step, WizardError> {
        self.ensure_open()?;
        if from != self.current {
            return Err(WizardError::StepMismatch {
                from,
                current: self.current,
            });
        }
        let next = from.next().ok_or(WizardError::LastStep(from))?;
        self.validate_step(from)
            .map_err(|errors| WizardError::Invalid { step: from, errors })?;
        self.completed.insert(from);
        self.current = next;
        debug!(step = %next, "advanced");
        Ok(next)
    }

    /// The furthest step the user may jump to: one past the furthest completed step.
    pub fn reachable_step(&self) -> u8 {
        let furthest = self.completed.iter().map(Step::number).max().unwrap_or(0);
        (furthest + 1).min(Step::Confirm.number())
    }

    /// Jumps to step `n`: any completed step, or the single next one.
    pub fn go_to_step(&mut self, n: u8) -> Result<(), WizardError> {
        self.ensure_open()?;
        let step = Step::from_number(n).ok_or(WizardError::NoSuchStep(n))?;
        if step == self.current {
            return Ok(());
        }
        let furthest = self.completed.iter().map(Step::number).max().unwrap_or(0);
        if n > furthest + 1 {
            return Err(WizardError::StepLocked {
                requested: n,
                reachable: self.reachable_step(),
            });
        }
        self.current = step;
        Ok(())
    }

    // --- Step 4: confirmation ---

    /// Builds the submission payload from the current state.
    pub fn payload(&self, created_at: DateTime<Utc>) -> Result<BookingPayload, WizardError> {
        for step in [Step::Service, Step::PatientData, Step::DateTime] {
            self.validate_step(step)
                .map_err(|errors| WizardError::Invalid { step, errors })?;
        }
        match (&self.service, self.date, self.time) {
            (Some(service), Some(date), Some(time)) => Ok(BookingPayload::new(
                &self.patient,
                service,
                date,
                time,
                self.timezone,
                self.language,
                created_at,
            )),
            // Unreachable after validation
            _ => Err(WizardError::Invalid {
                step: Step::DateTime,
                errors: ValidationError::DateMissing.into(),
            }),
        }
    }

    /// Submits the booking and opens the thank-you overlay.
    ///
    /// Backend failures do not stop the flow; they are logged and returned in the
    /// outcome. Only an invalid wizard state is an error.
    pub async fn confirm(
        &mut self,
        backend: &dyn BookingBackend,
        store: Option<&dyn ContactStore>,
    ) -> Result<SubmissionOutcome<BookingReceipt>, WizardError> {
        self.ensure_open()?;
        if self.current != Step::Confirm {
            return Err(WizardError::WrongStep {
                expected: Step::Confirm,
                current: self.current,
            });
        }
        let payload = self.payload(Utc::now())?;
        let outcome = backend.submit_booking(&payload).await;

        match &outcome {
            SubmissionOutcome::Delivered(receipt) => {
                self.contact_existed = Some(receipt.contact_existed);
                self.contact_id = Some(Self::persist_contact(store, &receipt.contact_id));
            }
            SubmissionOutcome::TransportError(e) => {
                warn!(error = %e, "booking not confirmed by backend, completing locally");
            }
            SubmissionOutcome::ConfigAbsent => {
                info!("booking completed without a backend");
            }
        }

        self.completed.insert(Step::Confirm);
        self.confirmed = true;
        self.submitted = Some(payload);
        self.overlay = Overlay::ThankYou;
        Ok(outcome)
    }

    // Write, then read back once; the stored value wins if it can be read
    fn persist_contact(store: Option<&dyn ContactStore>, contact_id: &str) -> String {
        let Some(store) = store else {
            return contact_id.to_string();
        };
        if let Err(e) = store.save_contact_id(contact_id) {
            warn!(error = %e, "could not persist contact id");
            return contact_id.to_string();
        }
        match store.load_contact_id() {
            Ok(Some(stored)) => stored,
            Ok(None) => contact_id.to_string(),
            Err(e) => {
                warn!(error = %e, "could not read back contact id");
                contact_id.to_string()
            }
        }
    }

    // --- Post-confirmation overlays ---

    /// Leaves the thank-you overlay for the new- or returning-patient choice.
    /// An unknown contact status counts as a new patient.
    pub fn continue_from_thank_you(&mut self) -> Result<&Overlay, WizardError> {
        if self.overlay != Overlay::ThankYou {
            return Err(WizardError::InvalidOverlay);
        }
        self.overlay = if self.contact_existed == Some(true) {
            Overlay::ReturningPatientChoice
        } else {
            Overlay::NewPatientChoice
        };
        Ok(&self.overlay)
    }

    /// Opens the matching intake form, pre-filled with the booking's identity fields.
    pub fn fill_now(&mut self) -> Result<&mut IntakeForm, WizardError> {
        let kind = match self.overlay {
            Overlay::NewPatientChoice => IntakeKind::FirstTime,
            Overlay::ReturningPatientChoice => IntakeKind::Returning,
            _ => return Err(WizardError::InvalidOverlay),
        };
        let form = IntakeForm::new(kind, self.patient.clone(), self.contact_id.clone());
        self.overlay = match kind {
            IntakeKind::FirstTime => Overlay::FirstTimeForm(form),
            IntakeKind::Returning => Overlay::ReturningForm(form),
        };
        self.overlay.form_mut().ok_or(WizardError::InvalidOverlay)
    }

    /// Defers the intake form to the clinic visit and exits to the home page.
    pub fn fill_at_clinic(&mut self) -> Result<(), WizardError> {
        match self.overlay {
            Overlay::NewPatientChoice | Overlay::ReturningPatientChoice => {
                self.overlay = Overlay::ExitToHome;
                Ok(())
            }
            _ => Err(WizardError::InvalidOverlay),
        }
    }

    pub fn intake_form_mut(&mut self) -> Option<&mut IntakeForm> {
        self.overlay.form_mut()
    }

    /// Sends the open intake form and exits to the home page, whatever the outcome.
    /// Without a contact id from the booking there is nothing to key the form by,
    /// so it is skipped.
    pub async fn submit_intake(
        &mut self,
        backend: &dyn BookingBackend,
    ) -> Result<SubmissionOutcome<()>, WizardError> {
        let form = self.overlay.form().ok_or(WizardError::InvalidOverlay)?;
        if form.contact_id().is_none() {
            info!(form = ?form.kind(), "no contact id from booking, intake form not sent");
            self.overlay = Overlay::ExitToHome;
            return Ok(SubmissionOutcome::ConfigAbsent);
        }
        let payload = form.payload(self.language, Utc::now())?;
        let outcome = backend.submit_intake(&payload).await;
        if let SubmissionOutcome::TransportError(e) = &outcome {
            warn!(error = %e, "intake form not confirmed by backend");
        }
        self.overlay = Overlay::ExitToHome;
        Ok(outcome)
    }

    /// Closes whatever overlay is open.
    pub fn close_overlay(&mut self) {
        if self.overlay != Overlay::Hidden {
            self.overlay = Overlay::ExitToHome;
        }
    }
}
