//! Translation loading and merging.
//!
//! Resolves which assets to fetch for which languages, deduplicates
//! concurrent fetches on the client, and merges the resulting fragments into
//! the shared and serializable trees.

mod cache;

pub use cache::{
    MemoCache,
    SharedLoad,
};

use futures::FutureExt;
use futures::future::{
    BoxFuture,
    try_join_all,
};

use crate::config::SpeakConfig;
use crate::error::{
    LoadError,
    SpeakError,
};
use crate::state::{
    LoadTranslationFn,
    RuntimeEnv,
    SpeakContext,
    SpeakState,
};
use crate::types::{
    Asset,
    Translation,
    TranslationTree,
};

/// Loads translation data and merges it into the session.
///
/// Loading happens only on the server, or when `runtime_assets` is non-empty:
/// on the client, static assets are assumed already present and only runtime
/// assets are (re)fetched.
///
/// - `assets`: identifiers resolved once and assumed present on the client
///   without a re-fetch.
/// - `runtime_assets`: identifiers fetched freshly wherever code executes;
///   their data is merged into the serializable tree on the server so it
///   reaches the client.
/// - `langs`: extra languages to preload in addition to the active locale's
///   language.
///
/// Languages are processed sequentially; all assets of one language are
/// fetched concurrently, and a single failed fetch discards every fragment of
/// that language's batch. Safe to call repeatedly across the lifecycle;
/// callers must not overlap calls against the same state.
///
/// # Errors
/// - A fetch was rejected by the injected loader
/// - A path asset was requested without a `load_translation` capability
pub async fn load_translations(
    env: &RuntimeEnv,
    ctx: &mut SpeakContext,
    state: &mut SpeakState,
    assets: &[Asset],
    runtime_assets: &[Asset],
    langs: &[String],
) -> Result<(), SpeakError> {
    if !env.is_server() && runtime_assets.is_empty() {
        return Ok(());
    }

    diagnose_conflicting_assets(env, assets, runtime_assets, &state.config);

    let resolved_assets: Vec<&Asset> = if env.is_server() {
        assets.iter().chain(runtime_assets).collect()
    } else {
        runtime_assets.iter().collect()
    };
    if resolved_assets.is_empty() {
        return Ok(());
    }

    // Multilingual: extra languages first, then the active locale's language.
    let mut resolved_langs: Vec<&str> = Vec::new();
    for lang in langs.iter().map(String::as_str).chain([state.locale.language.as_str()]) {
        if !resolved_langs.contains(&lang) {
            resolved_langs.push(lang);
        }
    }

    // Cache requests on the client in prod mode: dev needs fresh data on every
    // reload, and server-side requests are per-request-scoped already.
    let memoized = !env.dev_mode && !env.is_server();
    let load_fn = state.translate_fn.load_translation.clone();

    let mut merged_fragments: usize = 0;
    for &lang in &resolved_langs {
        let tasks = resolved_assets
            .iter()
            .map(|&asset| fetch_task(lang, asset, load_fn.as_ref(), memoized, &ctx.memo))
            .collect::<Result<Vec<_>, _>>()?;

        let sources = try_join_all(tasks).await.map_err(SpeakError::Load)?;

        for (&asset, source) in resolved_assets.iter().zip(sources) {
            // Empty fragments carry nothing to merge.
            if source.is_empty() {
                continue;
            }
            if env.is_server() {
                // On server:
                // - assets & runtimeAssets into the shared tree
                // - runtimeAssets also into the serializable tree, so they
                //   reach the client
                merge_fragment(&mut ctx.translation, lang, &source);
                if !assets.contains(asset) {
                    merge_fragment(&mut state.translation, lang, &source);
                }
            } else {
                // On client: everything into the shared tree only.
                merge_fragment(&mut ctx.translation, lang, &source);
            }
            merged_fragments += 1;
        }
    }

    tracing::debug!(
        languages = resolved_langs.len(),
        fragments = merged_fragments,
        "Translations loaded"
    );
    Ok(())
}

/// Builds the fetch future for one `(language, asset)` pair.
///
/// Inline assets resolve without the loader capability; path assets require
/// one. When `memoized`, the fetch goes through the deduplicating cache.
fn fetch_task(
    lang: &str,
    asset: &Asset,
    load_fn: Option<&LoadTranslationFn>,
    memoized: bool,
    memo: &MemoCache,
) -> Result<BoxFuture<'static, Result<Translation, LoadError>>, SpeakError> {
    if let Asset::Inline(data) = asset {
        let data = data.clone();
        return Ok(async move { Ok(data) }.boxed());
    }

    let Some(load_fn) = load_fn else {
        return Err(SpeakError::MissingLoadCapability(asset.to_string()));
    };

    if memoized {
        Ok(memo.get_or_insert(lang, asset, || (**load_fn)(lang, asset)).boxed())
    } else {
        Ok((**load_fn)(lang, asset))
    }
}

/// Shallow per-language merge: fragment keys overwrite existing keys, keys
/// absent from the fragment are untouched.
fn merge_fragment(tree: &mut TranslationTree, lang: &str, fragment: &Translation) {
    let entry = tree.entry(lang.to_string()).or_default();
    for (key, value) in fragment {
        entry.insert(key.clone(), value.clone());
    }
}

/// Dev-mode-only diagnostic: warns when an asset is listed as both static
/// and runtime, explicitly or through the configuration. Redundant loading
/// intent, never fatal. Returns whether the warning fired.
fn diagnose_conflicting_assets(
    env: &RuntimeEnv,
    assets: &[Asset],
    runtime_assets: &[Asset],
    config: &SpeakConfig,
) -> bool {
    if !env.dev_mode {
        return false;
    }
    let Some(conflicting) = conflicting_asset(assets, runtime_assets, config) else {
        return false;
    };
    tracing::warn!(asset = %conflicting, "Conflict between assets and runtimeAssets");
    true
}

/// Finds an asset listed as both static and runtime, explicitly or through
/// the configuration.
fn conflicting_asset<'a>(
    assets: &'a [Asset],
    runtime_assets: &'a [Asset],
    config: &'a SpeakConfig,
) -> Option<&'a Asset> {
    assets
        .iter()
        .find(|asset| runtime_assets.contains(asset))
        .or_else(|| assets.iter().find(|asset| config.runtime_assets.contains(asset)))
        .or_else(|| runtime_assets.iter().find(|asset| config.assets.contains(asset)))
}
