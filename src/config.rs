//! Application constants and pipeline configuration.
//!
//! `PipelineConfig` is built once (defaults, optionally overlaid from the
//! environment) and handed to the processor. Nothing here is mutable
//! process state.

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "BloodLens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "bloodlens=info"
}

pub const ENV_OLLAMA_URL: &str = "BLOODLENS_OLLAMA_URL";
pub const ENV_MODEL: &str = "BLOODLENS_MODEL";
pub const ENV_LLM_TIMEOUT_SECS: &str = "BLOODLENS_LLM_TIMEOUT_SECS";
pub const ENV_DISABLE_LLM: &str = "BLOODLENS_DISABLE_LLM";

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Settings for one `BloodReportProcessor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base URL of the Ollama server used for model extraction.
    pub ollama_url: String,
    /// Model tag to use. `None` picks the first preferred model installed.
    pub model: Option<String>,
    /// Upper bound on each request to the model server.
    pub llm_timeout_secs: u64,
    /// When false, only pattern extraction runs.
    pub use_language_model: bool,
    /// Pages beyond this are ignored.
    pub max_pages: usize,
    /// Characters beyond this are ignored.
    pub max_text_length: usize,
    /// Length of `raw_text_preview` in characters.
    pub preview_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model: None,
            llm_timeout_secs: 30,
            use_language_model: true,
            max_pages: 50,
            max_text_length: 100_000,
            preview_chars: 500,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Environment overlay
// ═══════════════════════════════════════════════════════════

impl PipelineConfig {
    /// Defaults overlaid with `BLOODLENS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns per variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_OLLAMA_URL).filter(|v| !v.trim().is_empty()) {
            config.ollama_url = url.trim().to_string();
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            config.model = Some(model.trim().to_string());
        }
        if let Some(raw) = lookup(ENV_LLM_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.llm_timeout_secs = secs,
                _ => tracing::warn!(
                    variable = ENV_LLM_TIMEOUT_SECS,
                    value = %raw,
                    default = config.llm_timeout_secs,
                    "Invalid timeout, keeping default"
                ),
            }
        }
        if let Some(raw) = lookup(ENV_DISABLE_LLM) {
            if matches!(
                raw.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ) {
                config.use_language_model = false;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.model, None);
        assert_eq!(config.llm_timeout_secs, 30);
        assert!(config.use_language_model);
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.max_text_length, 100_000);
        assert_eq!(config.preview_chars, 500);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(PipelineConfig::from_lookup(|_| None), PipelineConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (ENV_OLLAMA_URL, "http://gpu-box:11434"),
            (ENV_MODEL, "mistral:7b"),
            (ENV_LLM_TIMEOUT_SECS, "90"),
            (ENV_DISABLE_LLM, "TRUE"),
        ]));
        assert_eq!(config.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.model.as_deref(), Some("mistral:7b"));
        assert_eq!(config.llm_timeout_secs, 90);
        assert!(!config.use_language_model);
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let config = PipelineConfig::from_lookup(lookup_from(&[(ENV_LLM_TIMEOUT_SECS, "soon")]));
        assert_eq!(config.llm_timeout_secs, 30);
        let config = PipelineConfig::from_lookup(lookup_from(&[(ENV_LLM_TIMEOUT_SECS, "0")]));
        assert_eq!(config.llm_timeout_secs, 30);
    }

    #[test]
    fn disable_flag_must_be_truthy() {
        let config = PipelineConfig::from_lookup(lookup_from(&[(ENV_DISABLE_LLM, "0")]));
        assert!(config.use_language_model);
    }

    #[test]
    fn config_serializes() {
        let json = serde_json::to_value(PipelineConfig::default()).unwrap();
        assert_eq!(json["llm_timeout_secs"], 30);
        assert_eq!(json["model"], serde_json::Value::Null);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(APP_NAME, "BloodLens");
    }
}
