//! RoomMakeover configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::BudgetLimits;

/// Placeholder every platform URL template must contain
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Upper bound for `llm.max-retries`
pub const MAX_TRANSPORT_RETRIES: u32 = 10;

/// Main RoomMakeover configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Allowed budget range
    pub budget: BudgetConfig,

    /// Detection filtering
    pub detection: DetectionConfig,

    /// Planning thresholds and timeouts
    pub planner: PlannerConfig,

    /// Retail platforms used for shopping links
    pub shopping: ShoppingConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        debug!("Config::validate: called");
        if self.budget.min <= Decimal::ZERO || self.budget.min > self.budget.max {
            return Err(eyre::eyre!(
                "Invalid budget range {}-{}: min must be positive and not above max",
                self.budget.min,
                self.budget.max
            ));
        }

        if !(0.0..=1.0).contains(&self.detection.min_confidence) {
            return Err(eyre::eyre!(
                "detection.min-confidence must be within [0, 1], got {}",
                self.detection.min_confidence
            ));
        }

        if !(0.0..=1.0).contains(&self.planner.confidence_threshold) {
            return Err(eyre::eyre!(
                "planner.confidence-threshold must be within [0, 1], got {}",
                self.planner.confidence_threshold
            ));
        }

        if self.llm.max_retries > MAX_TRANSPORT_RETRIES {
            return Err(eyre::eyre!(
                "llm.max-retries must be at most {}, got {}",
                MAX_TRANSPORT_RETRIES,
                self.llm.max_retries
            ));
        }

        if self.planner.model_timeout_ms == 0 {
            return Err(eyre::eyre!("planner.model-timeout-ms must be greater than zero"));
        }

        for platform in &self.shopping.platforms {
            if platform.name.trim().is_empty() {
                return Err(eyre::eyre!("Shopping platform with empty name"));
            }
            if !platform.url_template.contains(QUERY_PLACEHOLDER) {
                return Err(eyre::eyre!(
                    "Shopping platform '{}' url-template must contain {}",
                    platform.name,
                    QUERY_PLACEHOLDER
                ));
            }
        }

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .roommakeover.yml
        let local_config = PathBuf::from(".roommakeover.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/roommakeover/roommakeover.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("roommakeover").join("roommakeover.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => {
                let local = PathBuf::from(".roommakeover.yml");
                if local.exists() {
                    local
                } else {
                    dirs::config_dir()?.join("roommakeover").join("roommakeover.yml")
                }
            }
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic", "openai" or "gemini")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Transport-level retries on network errors and 5xx responses
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 120_000,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(api_key_env = %self.api_key_env, "LlmConfig::get_api_key: called");
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| eyre::eyre!("LLM API key not found. Set the {} environment variable.", self.api_key_env))
    }
}

/// Allowed budget range, in whole currency units
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let limits = BudgetLimits::default();
        Self {
            min: limits.min,
            max: limits.max,
        }
    }
}

impl BudgetConfig {
    pub fn limits(&self) -> BudgetLimits {
        BudgetLimits {
            min: self.min,
            max: self.max,
        }
    }
}

/// Detection filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detections below this confidence are ignored
    #[serde(rename = "min-confidence")]
    pub min_confidence: f64,

    /// Labels that never count towards the inventory
    #[serde(rename = "ignored-labels")]
    pub ignored_labels: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            ignored_labels: vec![
                "person".to_string(),
                "cat".to_string(),
                "dog".to_string(),
                "bird".to_string(),
            ],
        }
    }
}

/// Planning thresholds and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Plans below this confidence are reported as partial successes
    #[serde(rename = "confidence-threshold")]
    pub confidence_threshold: f64,

    /// Hard limit on the model call, in milliseconds
    #[serde(rename = "model-timeout-ms")]
    pub model_timeout_ms: u64,

    /// Max tokens requested for the plan response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.9,
            model_timeout_ms: 90_000,
            max_tokens: 4096,
        }
    }
}

/// One retail platform search template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTemplate {
    pub name: String,

    /// URL containing `{query}`
    #[serde(rename = "url-template")]
    pub url_template: String,
}

impl PlatformTemplate {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
        }
    }
}

/// Retail platforms used for shopping links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingConfig {
    pub platforms: Vec<PlatformTemplate>,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            platforms: vec![
                PlatformTemplate::new("amazon", "https://www.amazon.in/s?k={query}"),
                PlatformTemplate::new("flipkart", "https://www.flipkart.com/search?q={query}"),
                PlatformTemplate::new("pepperfry", "https://www.pepperfry.com/search?q={query}"),
                PlatformTemplate::new("urban_ladder", "https://www.urbanladder.com/search?q={query}"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.budget.min, Decimal::from(500));
        assert_eq!(config.budget.max, Decimal::from(50_000));
        assert_eq!(config.detection.min_confidence, 0.3);
        assert_eq!(config.planner.confidence_threshold, 0.9);
        assert_eq!(config.shopping.platforms.len(), 4);
        assert_eq!(config.llm.max_retries, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug
llm:
  provider: openai
  model: gpt-4o
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 8192
  timeout-ms: 60000
  max-retries: 2

budget:
  min: 1000
  max: 20000

detection:
  min-confidence: 0.5
  ignored-labels: [person]

planner:
  confidence-threshold: 0.75
  model-timeout-ms: 30000

shopping:
  platforms:
    - name: ikea
      url-template: "https://www.ikea.com/in/en/search/?q={query}"
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_retries, 2);
        assert_eq!(config.budget.limits().min, Decimal::from(1000));
        assert_eq!(config.detection.ignored_labels, vec!["person"]);
        assert_eq!(config.planner.confidence_threshold, 0.75);
        assert_eq!(config.planner.max_tokens, 4096);
        assert_eq!(config.shopping.platforms[0].name, "ikea");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-2.0-flash
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "gemini-2.0-flash");

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.shopping.platforms.len(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.budget.min = Decimal::from(60_000);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.planner.confidence_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.max_retries = MAX_TRANSPORT_RETRIES + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max-retries"));

        let mut config = Config::default();
        config.llm.max_retries = MAX_TRANSPORT_RETRIES;
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.shopping.platforms = vec![PlatformTemplate::new("broken", "https://example.com/search")];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{query}"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "planner:\n  confidence-threshold: 0.6\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.planner.confidence_threshold, 0.6);

        assert!(Config::load(Some(&dir.path().join("missing.yml"))).is_err());
    }

    #[test]
    fn test_load_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "log-level: TRACE\n").unwrap();

        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("TRACE"));
        assert_eq!(Config::load_log_level(Some(&dir.path().join("missing.yml"))), None);
    }

    #[test]
    #[serial]
    fn test_get_api_key() {
        let config = LlmConfig {
            api_key_env: "RMK_TEST_API_KEY".to_string(),
            ..Default::default()
        };

        unsafe { std::env::remove_var("RMK_TEST_API_KEY") };
        assert!(config.get_api_key().is_err());

        unsafe { std::env::set_var("RMK_TEST_API_KEY", "secret") };
        assert_eq!(config.get_api_key().unwrap(), "secret");
        unsafe { std::env::remove_var("RMK_TEST_API_KEY") };
    }
}
