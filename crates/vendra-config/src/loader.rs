// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vendra.toml` > `~/.config/vendra/vendra.toml` > `/etc/vendra/vendra.toml`
//! with environment variable overrides via `VENDRA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VendraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vendra/vendra.toml` (system-wide)
/// 3. `~/.config/vendra/vendra.toml` (user XDG config)
/// 4. `./vendra.toml` (local directory)
/// 5. `VENDRA_*` environment variables
pub fn load_config() -> Result<VendraConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VendraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VendraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VendraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VendraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VendraConfig::default()))
        .merge(Toml::file("/etc/vendra/vendra.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vendra/vendra.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vendra.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `VENDRA_AI_DEFAULT_MODEL` must map to
/// `ai.default_model`, not `ai.default.model`. The trailing `split(".")`
/// is what nests the mapped key under its section dict; without it the
/// dotted name stays a flat top-level key and `deny_unknown_fields`
/// rejects every override.
fn env_provider() -> Env {
    Env::prefixed("VENDRA_")
        .map(|key| {
            // `key` is the lowercased env var name with prefix stripped.
            let key_str = key.as_str();
            let mapped = key_str
                .replacen("engine_", "engine.", 1)
                .replacen("ai_", "ai.", 1)
                .replacen("delivery_", "delivery.", 1)
                .replacen("notify_", "notify.", 1);
            mapped.into()
        })
        .split(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.engine.name, "vendra");
        assert_eq!(config.engine.log_level, "info");
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[ai]
default_model = "qwen-max"
request_timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.ai.default_model, "qwen-max");
        assert_eq!(config.ai.request_timeout_secs, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.ai.max_retries, 1);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
[engine]
log_lvel = "debug"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides_apply_to_nested_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VENDRA_ENGINE_LOG_LEVEL", "debug");
            jail.set_env("VENDRA_AI_DEFAULT_MODEL", "qwen-max");
            let config: VendraConfig = build_figment().extract()?;
            assert_eq!(config.engine.log_level, "debug");
            assert_eq!(config.ai.default_model, "qwen-max");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_beat_the_local_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("vendra.toml", "[ai]\ndefault_model = \"from-file\"\n")?;
            jail.set_env("VENDRA_AI_DEFAULT_MODEL", "from-env");
            let config: VendraConfig = build_figment().extract()?;
            assert_eq!(config.ai.default_model, "from-env");
            Ok(())
        });
    }

    #[test]
    fn api_key_env_var_loads_into_the_ai_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VENDRA_AI_API_KEY", "sk-live");
            let config: VendraConfig = build_figment().extract()?;
            assert_eq!(config.ai.api_key, "sk-live");
            Ok(())
        });
    }
}
