//! Live session state and the injected capability record.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{
    Deserialize,
    Serialize,
};

use crate::config::SpeakConfig;
use crate::error::LoadError;
use crate::loader::MemoCache;
use crate::types::{
    Asset,
    Locale,
    Params,
    Translation,
    TranslationTree,
    Value,
};

/// Where the code is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Server-rendered execution.
    Server,
    /// Client (browser-like) execution.
    Client,
}

/// Execution-context facts supplied by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeEnv {
    /// Server or client execution.
    pub platform: Platform,
    /// Development mode: diagnostics on, request memoization off.
    pub dev_mode: bool,
}

impl RuntimeEnv {
    /// A server execution context.
    #[must_use]
    pub const fn server(dev_mode: bool) -> Self {
        Self { platform: Platform::Server, dev_mode }
    }

    /// A client execution context.
    #[must_use]
    pub const fn client(dev_mode: bool) -> Self {
        Self { platform: Platform::Client, dev_mode }
    }

    /// Whether this is a server execution context.
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self.platform, Platform::Server)
    }
}

/// Must contain the logic to get translation data for `(language, asset)`.
pub type LoadTranslationFn =
    Arc<dyn Fn(&str, &Asset) -> BoxFuture<'static, Result<Translation, LoadError>> + Send + Sync>;

/// Must contain the logic to get the user language.
pub type GetUserLanguageFn = Arc<dyn Fn() -> BoxFuture<'static, Option<String>> + Send + Sync>;

/// Must contain the logic to store the locale.
pub type WriteLocaleFn = Arc<dyn Fn(Locale) -> BoxFuture<'static, ()> + Send + Sync>;

/// Must contain the logic to read the locale from storage.
pub type ReadLocaleFn = Arc<dyn Fn() -> BoxFuture<'static, Option<Locale>> + Send + Sync>;

/// Must contain the logic to handle missing values.
pub type HandleMissingTranslationFn =
    Arc<dyn Fn(&str, Option<&Value>, Option<&Params>) -> Value + Send + Sync>;

/// Record of injected capabilities.
///
/// Callers supply only what they need; absence is checked before use.
#[derive(Clone, Default)]
pub struct TranslateFn {
    /// Function to load translation data.
    pub load_translation: Option<LoadTranslationFn>,
    /// Function to get the user language.
    pub get_user_language: Option<GetUserLanguageFn>,
    /// Function to store the locale.
    pub write_locale: Option<WriteLocaleFn>,
    /// Function to read the locale from storage.
    pub read_locale: Option<ReadLocaleFn>,
    /// Function to handle missing values.
    pub handle_missing_translation: Option<HandleMissingTranslationFn>,
}

impl fmt::Debug for TranslateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslateFn")
            .field("load_translation", &self.load_translation.as_ref().map(|_| "<fn>"))
            .field("get_user_language", &self.get_user_language.as_ref().map(|_| "<fn>"))
            .field("write_locale", &self.write_locale.as_ref().map(|_| "<fn>"))
            .field("read_locale", &self.read_locale.as_ref().map(|_| "<fn>"))
            .field(
                "handle_missing_translation",
                &self.handle_missing_translation.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

/// The live session state.
///
/// `locale` and `translation` mutate during loading; `config` and
/// `translate_fn` are fixed after construction. `translation` is the
/// serializable tree: the subset of loaded data that must survive the
/// server-to-client handoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakState {
    /// Current locale.
    pub locale: Locale,
    /// Serializable translation data, keyed by language.
    pub translation: TranslationTree,
    /// Speak configuration.
    pub config: SpeakConfig,
    /// Injected capabilities. Never serialized; the client re-injects its own.
    #[serde(skip)]
    pub translate_fn: TranslateFn,
}

impl SpeakState {
    /// Creates a session for the configured default locale.
    #[must_use]
    pub fn new(config: SpeakConfig, translate_fn: TranslateFn) -> Self {
        Self {
            locale: config.default_locale.clone(),
            translation: TranslationTree::new(),
            config,
            translate_fn,
        }
    }
}

/// Server/client shared translation context.
///
/// Holds the shared tree (the union of everything ever loaded, never
/// serialized) and the request memoization cache. One context lives per
/// server request or per client session; it is passed by reference into the
/// loader and discarded at teardown.
#[derive(Debug, Default)]
pub struct SpeakContext {
    /// Shared translation data, keyed by language.
    pub translation: TranslationTree,
    /// Deduplicates in-flight and completed asset fetches.
    pub memo: MemoCache,
}

impl SpeakContext {
    /// Creates an empty shared context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
