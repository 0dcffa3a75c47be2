//! Core types used throughout the crate.

use std::collections::BTreeMap;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// The active localization context.
///
/// Immutable once selected for a render cycle; a locale change goes through a
/// fresh load, never through in-place mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    /// `language[-script][-region][-extension]`
    ///
    /// - language: ISO 639 two-letter or three-letter code
    /// - script: ISO 15924 four-letter script code
    /// - region: ISO 3166 two-letter, uppercase code
    /// - extension: 'u' (Unicode) extensions
    pub language: String,
    /// ISO 4217 three-letter code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Time zone name from the IANA time zone database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Key value pairs of unit identifiers, keyed by category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<BTreeMap<String, String>>,
}

impl Locale {
    /// Creates a locale with only a language tag set.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self { language: language.into(), currency: None, time_zone: None, units: None }
    }
}

/// Shape of the language tag handed to asset loaders and formatters.
///
/// Pattern: `language[-script][-region]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageFormat {
    /// Language subtag only, e.g. `en`.
    #[default]
    Language,
    /// Language and script subtags, e.g. `zh-Hans`.
    LanguageScript,
    /// Language and region subtags, e.g. `en-US`.
    LanguageRegion,
    /// Language, script and region subtags, e.g. `zh-Hans-CN`.
    LanguageScriptRegion,
}

impl LanguageFormat {
    /// Cuts a BCP 47-like tag down to the subtags this format requests.
    ///
    /// Unknown or out-of-order subtags (extensions, variants) are dropped.
    #[must_use]
    pub fn extract(self, language: &str) -> String {
        let mut subtags = language.split('-');
        let Some(lang) = subtags.next() else {
            return String::new();
        };

        let mut script: Option<&str> = None;
        let mut region: Option<&str> = None;
        for subtag in subtags {
            if script.is_none() && region.is_none() && is_script_subtag(subtag) {
                script = Some(subtag);
            } else if region.is_none() && is_region_subtag(subtag) {
                region = Some(subtag);
            } else {
                break;
            }
        }

        let mut out = lang.to_string();
        if matches!(self, Self::LanguageScript | Self::LanguageScriptRegion)
            && let Some(script) = script
        {
            out.push('-');
            out.push_str(script);
        }
        if matches!(self, Self::LanguageRegion | Self::LanguageScriptRegion)
            && let Some(region) = region
        {
            out.push('-');
            out.push_str(region);
        }
        out
    }
}

/// ISO 15924: four alphabetic characters.
fn is_script_subtag(subtag: &str) -> bool {
    subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic())
}

/// ISO 3166 alpha-2 or UN M49 numeric-3.
fn is_region_subtag(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
}

/// A JSON-like translation value.
///
/// Closed set of shapes so parameter substitution and structured re-parse can
/// be matched exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A leaf string, possibly holding `{{ name }}` placeholders.
    Text(String),
    /// A numeric leaf.
    Number(serde_json::Number),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A nested mapping. `BTreeMap` keeps the canonical JSON encoding stable.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the text content if this is a textual leaf.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

/// One language's translation data: string key to value.
pub type Translation = BTreeMap<String, Value>;

/// Translation data for every loaded language, keyed by language tag.
pub type TranslationTree = BTreeMap<String, Translation>;

/// Substitution parameters for `{{ name }}` placeholders.
pub type Params = BTreeMap<String, Value>;

/// A translation data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    /// An identifier (e.g. a path) resolved by the injected loader.
    Path(String),
    /// Translation data provided inline; resolves without a loader.
    Inline(Translation),
}

impl Asset {
    /// Creates a path asset.
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Inline(_) => f.write_str("<inline translation>"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::language(LanguageFormat::Language, "en-US", "en")]
    #[case::language_region(LanguageFormat::LanguageRegion, "en-US", "en-US")]
    #[case::language_script(LanguageFormat::LanguageScript, "zh-Hans-CN", "zh-Hans")]
    #[case::language_script_region(LanguageFormat::LanguageScriptRegion, "zh-Hans-CN", "zh-Hans-CN")]
    #[case::missing_script(LanguageFormat::LanguageScriptRegion, "en-US", "en-US")]
    #[case::missing_region(LanguageFormat::LanguageRegion, "en", "en")]
    #[case::numeric_region(LanguageFormat::LanguageRegion, "es-419", "es-419")]
    #[case::extension_dropped(LanguageFormat::LanguageRegion, "en-US-u-ca-buddhist", "en-US")]
    fn extract_subtags(#[case] format: LanguageFormat, #[case] tag: &str, #[case] expected: &str) {
        assert_that!(format.extract(tag), eq(expected));
    }

    #[rstest]
    fn as_text_returns_only_textual_leaves() {
        assert_that!(Value::from("Hi").as_text(), some(eq("Hi")));
        assert_that!(Value::from(2).as_text(), none());
        assert_that!(Value::List(vec!["Hi".into()]).as_text(), none());
    }

    #[rstest]
    fn value_deserializes_untagged() {
        let value: Value =
            serde_json::from_str(r#"{"title":"Hi","count":2,"tags":["a","b"]}"#).unwrap();

        let Value::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map["title"], Value::from("Hi"));
        assert_eq!(map["count"], Value::from(2));
        assert_eq!(map["tags"], Value::List(vec!["a".into(), "b".into()]));
    }

    #[rstest]
    fn locale_serializes_camel_case_without_empty_fields() {
        let locale = Locale { time_zone: Some("Europe/Rome".to_string()), ..Locale::new("it-IT") };

        let json = serde_json::to_string(&locale).unwrap();

        assert_eq!(json, r#"{"language":"it-IT","timeZone":"Europe/Rome"}"#);
    }

    #[rstest]
    fn asset_deserializes_path_or_inline() {
        let path: Asset = serde_json::from_str(r#""i18n/app""#).unwrap();
        let inline: Asset = serde_json::from_str(r#"{"title":"Hi"}"#).unwrap();

        assert_eq!(path, Asset::path("i18n/app"));
        let Asset::Inline(data) = inline else {
            panic!("expected inline data");
        };
        assert_eq!(data["title"], Value::from("Hi"));
    }
}
