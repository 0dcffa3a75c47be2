//! End-to-end lifecycle: server-side load, serialized handoff, client-side
//! load and value resolution.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use futures::FutureExt;
use pretty_assertions::assert_eq;
use speak_core::state::LoadTranslationFn;
use speak_core::{
    Asset,
    Locale,
    LoadError,
    RuntimeEnv,
    SpeakConfig,
    SpeakContext,
    SpeakState,
    Translation,
    TranslateFn,
    Value,
    get_value,
    load_translations,
};

/// Loader backed by an in-memory `language:asset` table, counting calls.
fn table_loader(
    table: HashMap<String, &'static str>,
    calls: Arc<AtomicUsize>,
) -> LoadTranslationFn {
    Arc::new(move |lang: &str, asset: &Asset| {
        calls.fetch_add(1, Ordering::SeqCst);
        let result = table
            .get(&format!("{lang}:{asset}"))
            .map(|json| serde_json::from_str::<Translation>(json).unwrap())
            .ok_or_else(|| LoadError::new(lang, asset.to_string(), "asset not found"));
        async move { result }.boxed()
    })
}

fn fixture_table() -> HashMap<String, &'static str> {
    [
        ("en-US:i18n/app", r#"{"app": {"title": "Hi", "subtitle": "Welcome"}}"#),
        ("it-IT:i18n/app", r#"{"app": {"title": "Ciao", "subtitle": "Benvenuto"}}"#),
        ("en-US:i18n/runtime", r#"{"runtime": {"greeting": "Hello {{name}}"}}"#),
        ("it-IT:i18n/runtime", r#"{"runtime": {"greeting": "Ciao {{name}}"}}"#),
    ]
    .into_iter()
    .map(|(key, json)| (key.to_string(), json))
    .collect()
}

fn config() -> SpeakConfig {
    SpeakConfig {
        assets: vec![Asset::path("i18n/app")],
        runtime_assets: vec![Asset::path("i18n/runtime")],
        ..SpeakConfig::new(Locale::new("en-US"), vec![Locale::new("en-US"), Locale::new("it-IT")])
    }
}

fn resolve(state_tree: &Translation, key: &str, params: Option<&speak_core::Params>) -> Value {
    get_value(key, state_tree, params, ".", "@@").unwrap()
}

#[tokio::test]
async fn server_load_handoff_and_client_load() {
    let table = fixture_table();
    let server_calls = Arc::new(AtomicUsize::new(0));
    let config = config();

    // Per-request server context and session.
    let mut server_ctx = SpeakContext::new();
    let mut server_state = SpeakState::new(
        config.clone(),
        TranslateFn {
            load_translation: Some(table_loader(table.clone(), Arc::clone(&server_calls))),
            ..TranslateFn::default()
        },
    );

    load_translations(
        &RuntimeEnv::server(false),
        &mut server_ctx,
        &mut server_state,
        &config.assets,
        &config.runtime_assets,
        &[],
    )
    .await
    .unwrap();

    assert_eq!(server_calls.load(Ordering::SeqCst), 2);

    // The shared tree resolves everything on the server.
    let shared = &server_ctx.translation["en-US"];
    assert_eq!(resolve(shared, "app.title", None).as_text(), Some("Hi"));
    let params: speak_core::Params = [("name".to_string(), Value::from("Ann"))].into_iter().collect();
    assert_eq!(
        resolve(shared, "runtime.greeting", Some(&params)),
        Value::from("Hello Ann")
    );

    // Only runtime-sourced data crosses the boundary.
    let handoff = serde_json::to_string(&server_state).unwrap();
    assert!(handoff.contains("greeting"));
    assert!(!handoff.contains("subtitle"));

    // Client session: restore the state, re-inject capabilities, seed the
    // shared tree from the serialized one.
    let client_calls = Arc::new(AtomicUsize::new(0));
    let mut client_state: SpeakState = serde_json::from_str(&handoff).unwrap();
    client_state.translate_fn =
        TranslateFn {
            load_translation: Some(table_loader(table, Arc::clone(&client_calls))),
            ..TranslateFn::default()
        };
    let mut client_ctx = SpeakContext::new();
    client_ctx.translation = client_state.translation.clone();

    // Static assets are already present on the client; nothing to fetch.
    load_translations(
        &RuntimeEnv::client(false),
        &mut client_ctx,
        &mut client_state,
        &config.assets,
        &[],
        &[],
    )
    .await
    .unwrap();
    assert_eq!(client_calls.load(Ordering::SeqCst), 0);

    // A locale change re-fetches runtime assets for the new language.
    client_state.locale = Locale::new("it-IT");
    load_translations(
        &RuntimeEnv::client(false),
        &mut client_ctx,
        &mut client_state,
        &[],
        &config.runtime_assets,
        &[],
    )
    .await
    .unwrap();
    assert_eq!(client_calls.load(Ordering::SeqCst), 1);

    let shared = &client_ctx.translation["it-IT"];
    assert_eq!(
        resolve(shared, "runtime.greeting", Some(&params)),
        Value::from("Ciao Ann")
    );

    // Same load again: the memoization cache absorbs it.
    load_translations(
        &RuntimeEnv::client(false),
        &mut client_ctx,
        &mut client_state,
        &[],
        &config.runtime_assets,
        &[],
    )
    .await
    .unwrap();
    assert_eq!(client_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_keys_resolve_to_a_visible_placeholder() {
    let mut ctx = SpeakContext::new();
    let mut state = SpeakState::new(
        config(),
        TranslateFn {
            load_translation: Some(table_loader(fixture_table(), Arc::new(AtomicUsize::new(0)))),
            ..TranslateFn::default()
        },
    );

    load_translations(
        &RuntimeEnv::server(false),
        &mut ctx,
        &mut state,
        &[Asset::path("i18n/app")],
        &[],
        &[],
    )
    .await
    .unwrap();

    let shared = &ctx.translation["en-US"];
    assert_eq!(resolve(shared, "app.nope", None), Value::from("app.nope"));
    assert_eq!(
        resolve(shared, "app.nope@@Not translated", None),
        Value::from("Not translated")
    );
}
