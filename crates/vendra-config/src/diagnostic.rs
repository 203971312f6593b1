// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment's deserialization failures into miette diagnostics.
//!
//! Unknown keys get a "did you mean?" suggestion, picked by Jaro-Winkler
//! similarity over the section's valid keys, and a source span pointing at
//! the offending key whenever the TOML file it came from is on hand.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity floor below which no suggestion is offered. One transposition
/// in keys like `default_model` or `log_level` still clears it.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error rendered as a miette diagnostic.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no config section recognizes.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(vendra::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, when one is similar enough.
        suggestion: Option<String>,
        /// The keys the section does accept.
        valid_keys: Vec<String>,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value whose TOML type does not match the field.
    #[error("invalid type for key `{key}`: found {found}")]
    #[diagnostic(code(vendra::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    /// A key the model requires but no layer provided.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(vendra::config::missing_key),
        help("set `{key}` in vendra.toml or through the matching `VENDRA_` variable")
    )]
    MissingKey { key: String },

    /// A semantic constraint violated by an otherwise well-typed value.
    #[error("validation error: {message}")]
    #[diagnostic(code(vendra::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(vendra::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &[String]) -> String {
    let listing = valid_keys.join(", ");
    match suggestion {
        Some(candidate) => format!("did you mean `{candidate}`? valid keys are: {listing}"),
        None => format!("valid keys are: {listing}"),
    }
}

/// Converts every entry of a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` maps file paths to their contents so unknown-key errors
/// can carry a span into the file the key actually came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| classify(error, toml_sources))
        .collect()
}

fn classify(error: figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let candidates = expected.to_vec();
            let suggestion = suggest_key(field, &candidates);
            let (span, src) = spanned_source(&error, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion,
                valid_keys: candidates.iter().map(|k| k.to_string()).collect(),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.clone().into_owned(),
        },
        Kind::InvalidType(found, expected) => ConfigError::InvalidType {
            key: dotted_path(&error),
            found: found.to_string(),
            expected: expected.clone(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

fn dotted_path(error: &figment::Error) -> String {
    error
        .path
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolves the file and span for an unknown key, when the error's
/// metadata names a TOML file whose contents we collected.
fn spanned_source(
    error: &figment::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    let Some(path) = file else {
        return (None, None);
    };
    let Some((_, content)) = toml_sources.iter().find(|(p, _)| *p == path) else {
        return (None, None);
    };

    let section = error.path.first().map(|s| s.to_string());
    match key_span(content, section.as_deref(), field) {
        Some(span) => (Some(span), Some(NamedSource::new(path, content.clone()))),
        None => (None, None),
    }
}

/// Finds the span of `key` within its TOML section.
///
/// Walks the file line by line tracking which `[section]` header is
/// active, and only matches while inside `section` (top level when
/// `None`). A match must be a whole key followed by `=` or whitespace,
/// so `default` never matches inside `default_model`.
pub fn key_span(content: &str, section: Option<&str>, key: &str) -> Option<SourceSpan> {
    let mut offset = 0;
    let mut current: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .trim_start_matches('[')
                .split(']')
                .next()
                .map(|name| name.trim().to_string());
        } else if current.as_deref() == section
            && let Some(after) = trimmed.strip_prefix(key)
            && matches!(after.chars().next(), Some(' ' | '\t' | '='))
        {
            let indent = line.len() - trimmed.len();
            return Some(SourceSpan::new((offset + indent).into(), key.len()));
        }
        offset += line.len() + 1;
    }

    None
}

/// Picks the closest valid key by Jaro-Winkler similarity, if any clears
/// the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, key)| key.to_string())
}

/// Renders every error to stderr through miette's graphical handler,
/// falling back to plain `Display` if a report cannot be rendered.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    let mut report = String::new();

    for error in errors {
        let rendered_from = report.len();
        if handler
            .render_report(&mut report, error as &dyn Diagnostic)
            .is_err()
        {
            report.truncate(rendered_from);
            report.push_str(&error.to_string());
        }
        report.push('\n');
    }

    eprint!("{report}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typos_earn_a_suggestion() {
        let valid = ["default_model", "max_retries"];
        assert_eq!(
            suggest_key("default_modle", &valid),
            Some("default_model".into())
        );
        assert_eq!(suggest_key("max_retires", &valid), Some("max_retries".into()));
    }

    #[test]
    fn distant_keys_earn_no_suggestion() {
        assert_eq!(suggest_key("qqqq", &["default_model", "max_retries"]), None);
    }

    #[test]
    fn key_span_points_at_the_key_in_its_section() {
        let content = "[engine]\nname = \"vendra\"\n\n[ai]\nmax_retries = 1\n";
        let span = key_span(content, Some("ai"), "max_retries").unwrap();
        assert_eq!(
            &content[span.offset()..span.offset() + span.len()],
            "max_retries"
        );
        assert!(span.offset() > content.find("[ai]").unwrap());
    }

    #[test]
    fn key_span_stays_inside_its_section() {
        // `name` exists only under [engine]; asking under [ai] finds nothing.
        let content = "[engine]\nname = \"vendra\"\n\n[ai]\nmax_retries = 1\n";
        assert!(key_span(content, Some("ai"), "name").is_none());
    }

    #[test]
    fn key_span_requires_a_whole_key() {
        let content = "[ai]\ndefault_model = \"x\"\n";
        assert!(key_span(content, Some("ai"), "default").is_none());
    }

    #[test]
    fn top_level_keys_match_before_any_header() {
        let content = "title = \"x\"\n\n[engine]\ntitle = \"y\"\n";
        let span = key_span(content, None, "title").unwrap();
        assert_eq!(span.offset(), 0);
    }
}
