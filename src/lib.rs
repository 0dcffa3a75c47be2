//! speak-core
//!
//! Runtime translation resolution for client/server web applications: given a
//! locale and a set of translation asset sources, load, merge, cache and look
//! up localized strings, substituting parameters and falling back to default
//! values.
//!
//! Two cooperating components: the translation loader
//! ([`load_translations`]), which resolves which assets to fetch for which
//! languages, deduplicates concurrent fetches and merges results into the
//! shared store; and the value resolver ([`get_value`]), which extracts a
//! value for a dotted key, applying inline defaults and `{{ name }}`
//! parameter substitution.
//!
//! Translation payloads are already-parsed key-value trees; fetching bytes is
//! the job of the injected [`LoadTranslationFn`](state::LoadTranslationFn)
//! capability.

pub mod config;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod state;
pub mod types;

pub use config::SpeakConfig;
pub use error::{
    LoadError,
    ResolveError,
    SpeakError,
};
pub use loader::{
    MemoCache,
    load_translations,
};
pub use resolver::{
    get_value,
    transpile_params,
};
pub use state::{
    RuntimeEnv,
    SpeakContext,
    SpeakState,
    TranslateFn,
};
pub use types::{
    Asset,
    Locale,
    Params,
    Translation,
    TranslationTree,
    Value,
};
