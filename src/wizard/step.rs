use serde::{Deserialize, Serialize};
use std::fmt;

/// The four ordered steps of the booking wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    Service = 1,
    PatientData = 2,
    DateTime = 3,
    Confirm = 4,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Service, Step::PatientData, Step::DateTime, Step::Confirm];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(n: u8) -> Option<Step> {
        match n {
            1 => Some(Step::Service),
            2 => Some(Step::PatientData),
            3 => Some(Step::DateTime),
            4 => Some(Step::Confirm),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Step> {
        Step::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Step> {
        Step::from_number(self.number().saturating_sub(1))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Service => "service",
            Step::PatientData => "patient data",
            Step::DateTime => "date and time",
            Step::Confirm => "confirmation",
        };
        write!(f, "{} ({})", self.number(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbering() {
        assert_eq!(Step::from_number(3), Some(Step::DateTime));
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(5), None);
        assert_eq!(Step::Service.next(), Some(Step::PatientData));
        assert_eq!(Step::Confirm.next(), None);
        assert_eq!(Step::Service.previous(), None);
        assert_eq!(Step::Confirm.to_string(), "4 (confirmation)");
    }
}
