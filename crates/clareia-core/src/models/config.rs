//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fallback::FallbackKind;

/// Environment variable that overrides `service.endpoint`.
pub const ENDPOINT_ENV: &str = "CLAREIA_ENDPOINT";

/// Default name of the environment variable holding the API credential.
pub const DEFAULT_API_KEY_ENV: &str = "CLAREIA_API_KEY";

/// Main configuration for the clareia pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClareiaConfig {
    /// Extraction service connection settings.
    pub service: ServiceConfig,

    /// Generation parameters sent with every request.
    pub generation: GenerationConfig,

    /// Pipeline behaviour.
    pub pipeline: PipelineConfig,

    /// Upload policy applied by the CLI before the pipeline runs.
    pub upload: UploadConfig,
}

/// Extraction service connection settings.
///
/// The credential itself is never stored here, only the name of the
/// environment variable that carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Full `generateContent` URL of the extraction service.
    pub endpoint: Option<String>,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Header used to send the API key.
    pub api_key_header: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries after a transport failure (0 or 1).
    pub transport_retries: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key_header: "x-goog-api-key".to_string(),
            timeout_secs: 60,
            transport_retries: 1,
        }
    }
}

/// Generation parameters for the extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Sampling temperature. Kept low to favour structured output.
    pub temperature: f32,

    /// Top-k sampling.
    pub top_k: u32,

    /// Nucleus sampling.
    pub top_p: f32,

    /// Upper bound on reply length.
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 4096,
        }
    }
}

/// What the pipeline does with an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Call the extraction service and propagate every failure.
    #[default]
    Live,
    /// Skip the service and return a fixed example dataset.
    Demo,
}

/// Pipeline behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Live extraction or demo dataset.
    pub mode: PipelineMode,

    /// Dataset returned in demo mode.
    pub demo_dataset: FallbackKind,
}

/// Upload policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    pub max_file_bytes: u64,

    /// Media types accepted without a warning.
    pub accepted_media_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            accepted_media_types: vec![
                "application/pdf".to_string(),
                "image/jpeg".to_string(),
                "image/png".to_string(),
            ],
        }
    }
}

impl UploadConfig {
    /// Whether a media type is on the accepted list.
    pub fn accepts(&self, media_type: &str) -> bool {
        self.accepted_media_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(media_type))
    }
}

/// Endpoint and credential resolved from configuration and environment.
#[derive(Clone)]
pub struct ResolvedService {
    pub endpoint: String,
    api_key: String,
    pub api_key_header: String,
    pub timeout: Duration,
    pub transport_retries: u32,
}

impl ResolvedService {
    /// Build directly from values, bypassing environment lookup.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let defaults = ServiceConfig::default();
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_key_header: defaults.api_key_header,
            timeout: Duration::from_secs(defaults.timeout_secs),
            transport_retries: defaults.transport_retries,
        }
    }

    /// Set the number of retries after a transport failure.
    pub fn with_transport_retries(mut self, retries: u32) -> Self {
        self.transport_retries = retries.min(1);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API credential.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ResolvedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedService")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("api_key_header", &self.api_key_header)
            .field("timeout", &self.timeout)
            .field("transport_retries", &self.transport_retries)
            .finish()
    }
}

impl ServiceConfig {
    /// Resolve endpoint and credential from the process environment.
    pub fn resolve(&self) -> Result<ResolvedService, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve endpoint and credential using `lookup` for environment values.
    ///
    /// `CLAREIA_ENDPOINT` wins over `endpoint`. Fails if either value ends up
    /// missing or blank.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedService, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENDPOINT_ENV)
            .or_else(|| self.endpoint.clone())
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ConfigError::MissingEndpoint(ENDPOINT_ENV.to_string()))?;

        let api_key = lookup(&self.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(self.api_key_env.clone()))?;

        Ok(ResolvedService {
            endpoint,
            api_key,
            api_key_header: self.api_key_header.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            transport_retries: self.transport_retries.min(1),
        })
    }
}

impl ClareiaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;

        if !(1024..=4096).contains(&generation.max_output_tokens) {
            return Err(invalid(
                "generation.max_output_tokens",
                format!("{} is outside 1024..=4096", generation.max_output_tokens),
            ));
        }
        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(invalid(
                "generation.temperature",
                format!("{} is outside 0.0..=2.0", generation.temperature),
            ));
        }
        if !(0.0..=1.0).contains(&generation.top_p) {
            return Err(invalid(
                "generation.top_p",
                format!("{} is outside 0.0..=1.0", generation.top_p),
            ));
        }
        if self.service.transport_retries > 1 {
            return Err(invalid(
                "service.transport_retries",
                "at most one retry is supported".to_string(),
            ));
        }
        if self.service.timeout_secs == 0 {
            return Err(invalid("service.timeout_secs", "must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ClareiaConfig::default();
        assert_eq!(config.pipeline.mode, PipelineMode::Live);
        assert_eq!(config.generation.max_output_tokens, 4096);
        assert_eq!(config.service.endpoint, None);
        assert!(config.upload.accepts("IMAGE/PNG"));
        assert!(!config.upload.accepts("text/plain"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credential_fails_fast() {
        let mut service = ServiceConfig::default();
        service.endpoint = Some("https://example.test/generate".to_string());

        let vars = env(&[]);
        let err = service.resolve_with(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(name) if name == "CLAREIA_API_KEY"));
    }

    #[test]
    fn test_missing_endpoint() {
        let service = ServiceConfig::default();
        let vars = env(&[("CLAREIA_API_KEY", "secret")]);
        let err = service.resolve_with(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEndpoint(_)));
    }

    #[test]
    fn test_environment_endpoint_overrides_file() {
        let mut service = ServiceConfig::default();
        service.endpoint = Some("https://file.test".to_string());
        service.api_key_env = "MY_KEY".to_string();

        let vars = env(&[("CLAREIA_ENDPOINT", "https://env.test"), ("MY_KEY", " secret ")]);
        let resolved = service.resolve_with(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(resolved.endpoint, "https://env.test");
        assert_eq!(resolved.api_key(), "secret");
        assert!(!format!("{:?}", resolved).contains("secret"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_tokens() {
        let mut config = ClareiaConfig::default();
        config.generation.max_output_tokens = 8192;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let json = r#"{ "pipeline": { "mode": "demo", "demo_dataset": "utility-bill" } }"#;
        let config: ClareiaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.pipeline.mode, PipelineMode::Demo);
        assert_eq!(config.pipeline.demo_dataset, FallbackKind::UtilityBill);
        assert_eq!(config.service.api_key_env, "CLAREIA_API_KEY");
    }
}
