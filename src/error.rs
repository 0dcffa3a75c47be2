//! Error types for loading and resolution.

use thiserror::Error;

/// Failure reported by the injected asset loader.
///
/// `Clone` so the same failed load can be handed out again by the memoization
/// cache without re-running the loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load asset '{asset}' for language '{language}': {message}")]
pub struct LoadError {
    /// Language tag the load was requested for.
    pub language: String,
    /// Display form of the asset identifier.
    pub asset: String,
    /// Loader-provided description of the failure.
    pub message: String,
}

impl LoadError {
    /// Creates a load error for the given request.
    #[must_use]
    pub fn new(
        language: impl Into<String>,
        asset: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self { language: language.into(), asset: asset.into(), message: message.into() }
    }
}

/// Errors surfaced by [`load_translations`](crate::loader::load_translations).
#[derive(Error, Debug)]
pub enum SpeakError {
    /// The injected loader rejected an asset fetch.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A path asset was requested but no `load_translation` capability exists.
    #[error("asset '{0}' requires a loadTranslation capability, but none was provided")]
    MissingLoadCapability(String),
}

/// Errors surfaced by [`get_value`](crate::resolver::get_value).
#[derive(Error, Debug)]
pub enum ResolveError {
    /// An inline default claimed to be structured JSON but failed to parse.
    #[error("inline default for key '{key}' is not valid JSON: {source}")]
    DefaultParse {
        /// The lookup key the default belongs to.
        key: String,
        /// Underlying parse failure.
        source: serde_json::Error,
    },

    /// A structured value no longer parsed after parameter substitution.
    #[error("substituted value for key '{key}' is not valid JSON: {source}")]
    Reparse {
        /// The lookup key that was resolved.
        key: String,
        /// Underlying parse failure.
        source: serde_json::Error,
    },
}
