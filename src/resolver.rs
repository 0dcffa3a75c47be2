//! Key lookup, inline defaults and parameter substitution.

use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

use crate::error::ResolveError;
use crate::types::{
    Params,
    Translation,
    Value,
};

/// `{{ name }}`: contiguous non-brace, non-whitespace token, one optional
/// space on each side.
#[allow(clippy::expect_used)]
static PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s?([^{}\s]*)\s?\}\}").expect("valid placeholder pattern"));

/// Gets a translation value for a dotted key.
///
/// The key may carry an inline default after `key_value_separator`, e.g.
/// `"greeting@@Hello {{name}}"`. Resolution order:
///
/// 1. the value found under `key` in `data` (parameters substituted when
///    `params` is given; structured values are serialized, substituted and
///    re-parsed so parameters may appear inside nested fields);
/// 2. the inline default, parsed as structured data when it looks like a
///    serialized array/object;
/// 3. the requested key itself, echoed back as text so missing translations
///    stay visible in the UI.
///
/// # Errors
/// - The inline default claims to be structured JSON but is not
/// - A structured value stops parsing after substitution
pub fn get_value(
    key: &str,
    data: &Translation,
    params: Option<&Params>,
    key_separator: &str,
    key_value_separator: &str,
) -> Result<Value, ResolveError> {
    let (key, default_value) = separate_key_value(key, key_value_separator);

    if let Some(value) = lookup(data, key, key_separator) {
        match value {
            // An empty string is as good as missing; fall through.
            Value::Text(text) if text.is_empty() => {}
            Value::Text(text) => {
                return Ok(match params {
                    Some(params) => Value::Text(transpile_params(text, params)),
                    None => value.clone(),
                });
            }
            Value::List(_) | Value::Map(_) => {
                let Some(params) = params else {
                    return Ok(value.clone());
                };
                let serialized = to_json(value);
                let substituted = transpile_params(&serialized, params);
                return serde_json::from_str(&substituted)
                    .map_err(|source| ResolveError::Reparse { key: key.to_string(), source });
            }
            // Numeric leaves fall through to the default, like missing keys.
            Value::Number(_) => {}
        }
    }

    if let Some(default_value) = default_value
        && !default_value.is_empty()
    {
        if !looks_structured(default_value) {
            return Ok(Value::Text(match params {
                Some(params) => transpile_params(default_value, params),
                None => default_value.to_string(),
            }));
        }
        // Default value is an array/object.
        let substituted = match params {
            Some(params) => transpile_params(default_value, params),
            None => default_value.to_string(),
        };
        return serde_json::from_str(&substituted)
            .map_err(|source| ResolveError::DefaultParse { key: key.to_string(), source });
    }

    Ok(Value::Text(key.to_string()))
}

/// Separates a key from its inline default value on the first occurrence of
/// the separator.
#[must_use]
pub fn separate_key_value<'a>(key: &'a str, key_value_separator: &str) -> (&'a str, Option<&'a str>) {
    match key.split_once(key_value_separator) {
        Some((key, default_value)) => (key, Some(default_value)),
        None => (key, None),
    }
}

/// Replaces every `{{ name }}` placeholder with `params[name]`.
///
/// Undefined parameters leave the placeholder text unchanged, so unmatched
/// placeholders stay visibly unresolved. Single left-to-right pass: replaced
/// text is never re-substituted.
#[must_use]
pub fn transpile_params(value: &str, params: &Params) -> String {
    PARAM_RE
        .replace_all(value, |caps: &Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            params.get(name).map_or_else(
                || caps.get(0).map_or_else(String::new, |m| m.as_str().to_string()),
                render_param,
            )
        })
        .into_owned()
}

/// Descends `data` one path segment at a time; any absent segment means not
/// found. Never fails.
fn lookup<'a>(data: &'a Translation, key: &str, key_separator: &str) -> Option<&'a Value> {
    let mut segments = key.split(key_separator);
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        let Value::Map(map) = current else {
            return None;
        };
        current = map.get(segment)?;
    }
    Some(current)
}

/// Whether an inline default looks like a serialized array/object.
///
/// A leading `{{` takes precedence as a parameter placeholder, so such a
/// default is plain text even though it starts with a brace.
fn looks_structured(default_value: &str) -> bool {
    if default_value.starts_with("{{") {
        return false;
    }
    default_value.len() >= 2
        && (default_value.starts_with('[') || default_value.starts_with('{'))
        && (default_value.ends_with(']') || default_value.ends_with('}'))
}

/// Textual rendering of a parameter: text is inserted as-is, everything else
/// as its JSON encoding.
fn render_param(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::List(_) | Value::Map(_) => to_json(value),
    }
}

/// JSON encoding of a value. `Value` has string keys only, so encoding never
/// fails in practice.
fn to_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
