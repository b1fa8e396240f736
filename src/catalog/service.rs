use crate::i18n::{Language, Localized};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback appointment length when a duration string carries no number.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// The fixed set of service categories offered by the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Consulta,
    Ultrasonido,
    Dispositivos,
    Procedimientos,
    Laboratorio,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Consulta,
        Category::Ultrasonido,
        Category::Dispositivos,
        Category::Procedimientos,
        Category::Laboratorio,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Consulta => "consulta",
            Category::Ultrasonido => "ultrasonido",
            Category::Dispositivos => "dispositivos",
            Category::Procedimientos => "procedimientos",
            Category::Laboratorio => "laboratorio",
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Category::Consulta, Language::Es) => "Consultas",
            (Category::Consulta, Language::En) => "Consultations",
            (Category::Ultrasonido, Language::Es) => "Ultrasonidos",
            (Category::Ultrasonido, Language::En) => "Ultrasounds",
            (Category::Dispositivos, Language::Es) => "Anticonceptivos",
            (Category::Dispositivos, Language::En) => "Contraceptive devices",
            (Category::Procedimientos, Language::Es) => "Procedimientos",
            (Category::Procedimientos, Language::En) => "Procedures",
            (Category::Laboratorio, Language::Es) => "Laboratorio",
            (Category::Laboratorio, Language::En) => "Laboratory",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An immutable catalog record for one bookable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: Localized,
    /// Free text, sometimes holding two values, e.g. "45 min (1ª vez) / 30 min".
    pub duration: String,
    /// Price in colones.
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_note: Option<Localized>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_key: Option<String>,
}

impl Service {
    pub fn name(&self, language: Language) -> &str {
        self.name.get(language)
    }

    /// Appointment length in minutes, taken from the first integer in `duration`.
    pub fn duration_minutes(&self) -> u32 {
        parse_duration_minutes(&self.duration).unwrap_or(DEFAULT_DURATION_MINUTES)
    }
}

/// Returns the first integer found in a free-text duration.
///
/// `"45 min (1ª vez) / 30 min"` yields 45, `"30 min"` yields 30.
pub fn parse_duration_minutes(duration: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(duration)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_takes_first_integer() {
        assert_eq!(parse_duration_minutes("45 min (1ª vez) / 30 min"), Some(45));
        assert_eq!(parse_duration_minutes("30 min"), Some(30));
        assert_eq!(parse_duration_minutes("1 hora"), Some(1));
        assert_eq!(parse_duration_minutes("variable"), None);
    }

    #[test]
    fn test_duration_minutes_falls_back() {
        let service = Service {
            id: "x".to_string(),
            name: Localized::new("X", "X"),
            duration: "a convenir".to_string(),
            price: 0,
            price_note: None,
            category: Category::Laboratorio,
            info_key: None,
        };
        assert_eq!(service.duration_minutes(), DEFAULT_DURATION_MINUTES);
    }

    #[test]
    fn test_category_serializes_as_spanish_key() {
        let json = serde_json::to_string(&Category::Dispositivos).unwrap();
        assert_eq!(json, "\"dispositivos\"");
    }
}
