use crate::config::proxy::ProxyConfig;
use crate::core::composition::Vessel;
use crate::core::loading::{LoadingTicker, DEFAULT_STEP_DELAY};
use crate::domain::catalog::Catalog;
use crate::utils::error::{ArchitectError, Result};
use crate::utils::validation::{validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectConfig {
    pub proxy: ClientConfig,
    pub upstream: ProxyConfig,
    pub assistant: AssistantConfig,
    pub catalog: CatalogConfig,
    pub vessel: VesselConfig,
}

/// Where the terminal shell sends prompts. Without a URL the proxy handler
/// runs in-process and reads the key from `upstream.api_key_env`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub loading_step_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            loading_step_ms: DEFAULT_STEP_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    pub budget_px: f64,
    pub reference_volume_ml: f64,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            budget_px: Vessel::STANDARD.budget_px,
            reference_volume_ml: Vessel::STANDARD.reference_volume_ml,
        }
    }
}

impl ArchitectConfig {
    /// Load from a TOML file; `${VAR}` references are expanded first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ArchitectError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Unset variables are left as written, e.g. `${PROXY_URL}`.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ArchitectError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Built-in catalog unless `catalog.path` points at a TOML catalog.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog.path {
            Some(path) => {
                tracing::info!("Loading catalog from {}", path);
                Catalog::from_file(path)
            }
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn vessel(&self) -> Result<Vessel> {
        Vessel::new(self.vessel.budget_px, self.vessel.reference_volume_ml)
    }

    pub fn ticker(&self) -> LoadingTicker {
        LoadingTicker::with_step_delay(Duration::from_millis(self.assistant.loading_step_ms))
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy.timeout_seconds)
    }
}

impl Validate for ArchitectConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.proxy.url {
            validate_url("proxy.url", url)?;
        }
        validate_range("proxy.timeout_seconds", self.proxy.timeout_seconds, 1, 900)?;
        validate_range("assistant.loading_step_ms", self.assistant.loading_step_ms, 0, 10_000)?;
        self.upstream.validate()?;
        self.vessel()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ArchitectConfig::from_toml_str("").unwrap();
        assert_eq!(config, ArchitectConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.vessel().unwrap(), Vessel::STANDARD);
        assert_eq!(config.ticker().total_duration(), Duration::from_millis(3200));
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[proxy]
url = "https://coffee.example.com/.netlify/functions/openai"
timeout_seconds = 30

[upstream]
model = "gpt-4o-mini"
max_tokens = 300

[assistant]
loading_step_ms = 0

[vessel]
budget_px = 400
reference_volume_ml = 250
"#;

        let config = ArchitectConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.proxy.url.as_deref(),
            Some("https://coffee.example.com/.netlify/functions/openai")
        );
        assert_eq!(config.upstream.model, "gpt-4o-mini");
        assert_eq!(config.upstream.temperature, 0.7);
        assert_eq!(config.vessel().unwrap().scale_factor(), 1.6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("COFFEE_TEST_PROXY_URL", "https://proxy.test/openai");

        let config = ArchitectConfig::from_toml_str(
            r#"
[proxy]
url = "${COFFEE_TEST_PROXY_URL}"
"#,
        )
        .unwrap();
        assert_eq!(config.proxy.url.as_deref(), Some("https://proxy.test/openai"));

        std::env::remove_var("COFFEE_TEST_PROXY_URL");
    }

    #[test]
    fn test_oversized_vessel_is_rejected() {
        let config = ArchitectConfig::from_toml_str(
            r#"
[vessel]
budget_px = 1e300
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_proxy_url() {
        let config = ArchitectConfig::from_toml_str(
            r#"
[proxy]
url = "not-a-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file_with_catalog() {
        let mut catalog_file = NamedTempFile::new().unwrap();
        catalog_file
            .write_all(toml::to_string(&Catalog::builtin()).unwrap().as_bytes())
            .unwrap();

        let mut config_file = NamedTempFile::new().unwrap();
        let content = format!(
            "[catalog]\npath = '{}'\n",
            catalog_file.path().to_str().unwrap()
        );
        config_file.write_all(content.as_bytes()).unwrap();

        let config = ArchitectConfig::from_file(config_file.path()).unwrap();
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog, Catalog::builtin());
    }
}
