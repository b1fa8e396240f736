use super::intake::IntakeForm;

/// The post-confirmation overlays. At most one is visible at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Hidden,
    ThankYou,
    NewPatientChoice,
    ReturningPatientChoice,
    FirstTimeForm(IntakeForm),
    ReturningForm(IntakeForm),
    ExitToHome,
}

impl Overlay {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Overlay::Hidden | Overlay::ExitToHome)
    }

    pub fn form(&self) -> Option<&IntakeForm> {
        match self {
            Overlay::FirstTimeForm(form) | Overlay::ReturningForm(form) => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut IntakeForm> {
        match self {
            Overlay::FirstTimeForm(form) | Overlay::ReturningForm(form) => Some(form),
            _ => None,
        }
    }
}
