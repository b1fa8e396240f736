//! Site-wide settings, passed explicitly to whatever needs them.
use crate::error::ConfigError;
use crate::i18n::Language;
use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_TIMEZONE: &str = "America/Costa_Rica";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration. An absent webhook URL disables that call, never the flow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    pub timezone: String,
    pub booking_webhook_url: Option<String>,
    pub first_time_form_webhook_url: Option<String>,
    pub returning_form_webhook_url: Option<String>,
    pub request_timeout_secs: u64,
    pub contact_store_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::Es,
            timezone: DEFAULT_TIMEZONE.to_string(),
            booking_webhook_url: None,
            first_time_form_webhook_url: None,
            returning_form_webhook_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            contact_store_path: None,
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.normalized()
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults overlaid with `.env` and `CONSULTA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from any key lookup; `with_env_overrides` passes the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(language) = lookup("CONSULTA_LANGUAGE") {
            self.language = language.parse()?;
        }
        if let Some(timezone) = lookup("CONSULTA_TIMEZONE") {
            self.timezone = timezone;
        }
        if let Some(url) = lookup("CONSULTA_BOOKING_WEBHOOK_URL") {
            self.booking_webhook_url = Some(url);
        }
        if let Some(url) = lookup("CONSULTA_FIRST_TIME_FORM_WEBHOOK_URL") {
            self.first_time_form_webhook_url = Some(url);
        }
        if let Some(url) = lookup("CONSULTA_RETURNING_FORM_WEBHOOK_URL") {
            self.returning_form_webhook_url = Some(url);
        }
        if let Some(timeout) = lookup("CONSULTA_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "CONSULTA_REQUEST_TIMEOUT_SECS".to_string(),
                        value: timeout.clone(),
                    })?;
        }
        if let Some(path) = lookup("CONSULTA_CONTACT_STORE") {
            self.contact_store_path = Some(PathBuf::from(path));
        }
        self.normalized()
    }

    /// Blank URLs count as absent; the timezone must be a known IANA name.
    fn normalized(mut self) -> Result<Self, ConfigError> {
        for url in [
            &mut self.booking_webhook_url,
            &mut self.first_time_form_webhook_url,
            &mut self.returning_form_webhook_url,
        ] {
            if url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                *url = None;
            }
        }
        self.tz()?;
        Ok(self)
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }
}
