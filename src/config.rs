//! Speak configuration, read-only after initialization.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    Asset,
    LanguageFormat,
    Locale,
};

/// A single configuration validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLocales[0]").
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Translation configuration for one application.
///
/// Built once at startup and never mutated afterwards; the live session state
/// ([`SpeakState`](crate::state::SpeakState)) holds it by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakConfig {
    /// Format of the translation language tag.
    #[serde(default)]
    pub language_format: LanguageFormat,

    /// Separator of nested keys.
    #[serde(default = "default_key_separator")]
    pub key_separator: String,

    /// Separator between a key and its inline default value.
    #[serde(default = "default_key_value_separator")]
    pub key_value_separator: String,

    /// The default locale, used as fallback.
    pub default_locale: Locale,

    /// Supported locales.
    pub supported_locales: Vec<Locale>,

    /// Assets resolved once and assumed present on the client without
    /// a re-fetch (e.g. bundled at build time).
    #[serde(default)]
    pub assets: Vec<Asset>,

    /// Assets fetched freshly wherever code executes; their data is carried
    /// across the server-to-client boundary.
    #[serde(default)]
    pub runtime_assets: Vec<Asset>,
}

fn default_key_separator() -> String {
    ".".to_string()
}

fn default_key_value_separator() -> String {
    "@@".to_string()
}

impl SpeakConfig {
    /// Creates a configuration with default separators and language format.
    #[must_use]
    pub fn new(default_locale: Locale, supported_locales: Vec<Locale>) -> Self {
        Self {
            language_format: LanguageFormat::default(),
            key_separator: default_key_separator(),
            key_value_separator: default_key_value_separator(),
            default_locale,
            supported_locales,
            assets: Vec::new(),
            runtime_assets: Vec::new(),
        }
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    /// - JSON parse error
    /// - Validation error
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!(default_locale = %config.default_locale.language, "Configuration loaded");
        Ok(config)
    }

    /// # Errors
    /// - Empty separator
    /// - Missing or unsupported default locale
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.key_value_separator.is_empty() {
            errors.push(ValidationError::new(
                "keyValueSeparator",
                "The separator cannot be empty. Please specify a separator, for example: \"@@\"",
            ));
        }

        if self.default_locale.language.is_empty() {
            errors.push(ValidationError::new("defaultLocale", "The language cannot be empty"));
        }

        for (i, locale) in self.supported_locales.iter().enumerate() {
            if locale.language.is_empty() {
                errors.push(ValidationError::new(
                    format!("supportedLocales[{i}]"),
                    "The language cannot be empty",
                ));
            }
        }

        if !self.supported_locales.is_empty()
            && !self.supported_locales.iter().any(|l| l.language == self.default_locale.language)
        {
            errors.push(ValidationError::new(
                "defaultLocale",
                "The default locale must be listed in supportedLocales",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
