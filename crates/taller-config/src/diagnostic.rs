// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment extraction errors into miette reports.
//!
//! A report points at the offending line of a `taller.toml` when the value came
//! from a file, or names the environment variable (legacy or `TALLER_`) that
//! carried it. Unknown keys and unknown enum values get a Jaro-Winkler
//! "did you mean" hint.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader::env_names_for;

/// Minimum Jaro-Winkler similarity for a suggestion (`prot` -> `port`,
/// `whatsap` -> `whatsapp`).
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem found at startup.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key no section declares. Every section denies unknown fields.
    #[error("unknown configuration key `{key}`{}", origin_suffix(.origin))]
    #[diagnostic(
        code(taller::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted key, e.g. `server.prot`.
        key: String,
        suggestion: Option<String>,
        /// Keys the section accepts, comma separated.
        valid_keys: String,
        /// File path or environment variable the key came from.
        origin: Option<String>,
        #[label("not a key of this section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type, or a string outside an enum's variants
    /// (`channel = "sms"`, `environment = "staging"`).
    #[error("invalid value for `{key}`: {detail}{}", origin_suffix(.origin))]
    #[diagnostic(
        code(taller::config::invalid_value),
        help("{}", invalid_value_help(suggestion.as_deref(), expected))
    )]
    InvalidValue {
        key: String,
        detail: String,
        expected: String,
        suggestion: Option<String>,
        origin: Option<String>,
        #[label("rejected value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A well-typed value that fails a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(taller::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(taller::config::other))]
    Other(String),
}

fn origin_suffix(origin: &Option<String>) -> String {
    origin
        .as_deref()
        .map(|o| format!(" (from {o})"))
        .unwrap_or_default()
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? accepted keys: {valid_keys}"),
        None => format!("accepted keys: {valid_keys}"),
    }
}

fn invalid_value_help(suggestion: Option<&str>, expected: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? expected {expected}"),
        None => format!("expected {expected}"),
    }
}

/// Where a rejected key or value was written.
enum Origin<'a> {
    File {
        name: &'a str,
        content: &'a str,
        span: (usize, usize),
    },
    Env(String),
    Unknown,
}

impl Origin<'_> {
    fn into_parts(self) -> (Option<String>, Option<SourceSpan>, Option<NamedSource<String>>) {
        match self {
            Origin::File {
                name,
                content,
                span: (offset, len),
            } => (
                Some(name.to_string()),
                Some(SourceSpan::new(offset.into(), len)),
                Some(NamedSource::new(name, content.to_string())),
            ),
            Origin::Env(var) => (Some(format!("environment variable `{var}`")), None, None),
            Origin::Unknown => (None, None, None),
        }
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` are `(path, content)` pairs of the files that were merged.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            // Depending on the figment version the path may or may not end with the field.
            let section = error
                .path
                .strip_suffix(std::slice::from_ref(field))
                .unwrap_or(error.path.as_slice());
            let key = dotted(section, field);
            let (origin, span, src) =
                locate(error, section, field, &key, toml_sources, find_key_span).into_parts();
            ConfigError::UnknownKey {
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                key,
                origin,
                span,
                src,
            }
        }
        Kind::UnknownVariant(actual, variants) => {
            let (section, field) = split_path(&error.path);
            let key = dotted(section, field);
            let (origin, span, src) =
                locate(error, section, field, &key, toml_sources, find_value_span).into_parts();
            ConfigError::InvalidValue {
                detail: format!("`{actual}` is not recognized"),
                expected: format!("one of: {}", variants.join(", ")),
                suggestion: suggest_key(actual, variants),
                key,
                origin,
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) | Kind::InvalidValue(actual, expected) => {
            let (section, field) = split_path(&error.path);
            let key = dotted(section, field);
            let (origin, span, src) =
                locate(error, section, field, &key, toml_sources, find_value_span).into_parts();
            ConfigError::InvalidValue {
                detail: format!("found {actual}"),
                expected: expected.clone(),
                suggestion: None,
                key,
                origin,
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

fn split_path(path: &[String]) -> (&[String], &str) {
    match path.split_last() {
        Some((field, section)) => (section, field.as_str()),
        None => (path, ""),
    }
}

fn dotted(section: &[String], field: &str) -> String {
    section
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
        .collect::<Vec<_>>()
        .join(".")
}

/// Finds where `section.field` was written.
///
/// Values tagged by an env provider are attributed to the variable that is
/// actually set. Otherwise the merged files are searched, the one figment
/// names first, and finally the environment again: unknown keys are often
/// tagged with the defaults' metadata.
fn locate<'a>(
    error: &figment::Error,
    section: &[String],
    field: &str,
    key: &str,
    toml_sources: &'a [(String, String)],
    span_of: fn(&str, &[String], &str) -> Option<(usize, usize)>,
) -> Origin<'a> {
    let metadata = error.metadata.as_ref();
    let from_env = metadata.is_some_and(|m| m.name.contains("environment"));
    if from_env && let Some(var) = set_env_var(key) {
        return Origin::Env(var);
    }

    let named_file = metadata
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.clone()),
            _ => None,
        });
    let mut candidates: Vec<&'a (String, String)> = toml_sources.iter().collect();
    if let Some(path) = &named_file {
        candidates.sort_by_key(|(name, _)| !path.ends_with(name.as_str()));
    }
    for (name, content) in candidates {
        if let Some(span) = span_of(content, section, field) {
            return Origin::File {
                name,
                content,
                span,
            };
        }
    }

    set_env_var(key).map_or(Origin::Unknown, Origin::Env)
}

/// The highest-precedence environment variable currently set for `key`.
fn set_env_var(key: &str) -> Option<String> {
    env_names_for(key)
        .into_iter()
        .rev()
        .find(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()))
}

/// Byte offset of `field` as a key inside the `[section]` table (or at top level).
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    if field.is_empty() {
        return None;
    }
    let (start, table) = match section.first() {
        Some(name) => {
            let header = format!("[{name}]");
            let pos = content.find(&header)? + header.len();
            (pos, &content[pos..])
        }
        None => (0, content),
    };

    let mut line_start = 0;
    for line in table.split_inclusive('\n') {
        let trimmed = line.trim_start();
        // The next table header ends the section.
        if !section.is_empty() && trimmed.starts_with('[') {
            return None;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && after.trim_start().starts_with('=')
        {
            return Some(start + line_start + (line.len() - trimmed.len()));
        }
        line_start += line.len();
    }
    None
}

fn find_key_span(content: &str, section: &[String], field: &str) -> Option<(usize, usize)> {
    find_key_offset(content, section, field).map(|offset| (offset, field.len()))
}

/// Span of the value assigned to `field`, without a trailing comment.
fn find_value_span(content: &str, section: &[String], field: &str) -> Option<(usize, usize)> {
    let key_offset = find_key_offset(content, section, field)?;
    let line = content[key_offset..].lines().next()?;
    let eq = line.find('=')?;
    let raw = &line[eq + 1..];
    let value = raw.split(" #").next().unwrap_or(raw).trim();
    if value.is_empty() {
        return None;
    }
    let lead = raw.len() - raw.trim_start().len();
    Some((key_offset + eq + 1 + lead, value.len()))
}

/// Best match for `unknown` among `valid_keys`, if any is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
