#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;

use crate::domain::model::PromoTable;
use crate::utils::error::{HimayaError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_BREACH_API: &str = "https://haveibeenpwned.com/api/v3";

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env substitution pattern is a valid regex")
});

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pricing: PricingConfig,
    pub breach_api: BreachApiConfig,
    pub notification: NotificationConfig,
    pub breach_table: BreachTableConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub unit_price: f64,
    pub promos: PromoTable,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            unit_price: 2.00,
            promos: PromoTable::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BreachApiConfig {
    pub base_url: String,
    pub user_agent: String,
    pub api_key: Option<SecretString>,
    pub timeout_seconds: u64,
}

impl Default for BreachApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BREACH_API.to_string(),
            user_agent: concat!("himaya/", env!("CARGO_PKG_VERSION")).to_string(),
            api_key: None,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub sender: String,
    pub subject: String,
    pub source_domain: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            sender: "no-reply@himaya.tech".to_string(),
            subject: "Order request received".to_string(),
            source_domain: "himaya.tech".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BreachTableConfig {
    pub path: String,
}

impl Default for BreachTableConfig {
    fn default() -> Self {
        Self {
            path: "breaches.json".to_string(),
        }
    }
}

impl Settings {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HimayaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut settings: Self =
            toml::from_str(&processed_content).map_err(|e| HimayaError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        // 未設定的環境變數不可當成 API key 送出
        if let Some(key) = &settings.breach_api.api_key {
            if ENV_VAR_RE.is_match(key.expose_secret()) {
                tracing::warn!("⚠️ breach_api.api_key references an unset environment variable");
                settings.breach_api.api_key = None;
            }
        }

        Ok(settings)
    }

    /// `HIMAYA_CONFIG` points at a TOML file; built-in defaults otherwise.
    pub fn load() -> Result<Self> {
        match std::env::var("HIMAYA_CONFIG") {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("📋 Loading configuration from {}", path);
                Self::from_file(path)
            }
            _ => {
                tracing::info!("📋 HIMAYA_CONFIG not set, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// 替換環境變數 (例如 ${HIBP_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl PricingConfig {
    /// (identifier count) x unit price x promo factor, rounded to cents.
    pub fn amount(&self, identifiers: usize, promo_factor: f64) -> f64 {
        let cents = identifiers as f64 * self.unit_price * 100.0 * promo_factor;
        cents.round() / 100.0
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if !(self.pricing.unit_price.is_finite() && self.pricing.unit_price >= 0.0) {
            return Err(HimayaError::InvalidConfigValueError {
                field: "pricing.unit_price".to_string(),
                value: self.pricing.unit_price.to_string(),
                reason: "Unit price must be a non-negative number".to_string(),
            });
        }

        for (code, factor) in self.pricing.promos.iter() {
            // 折扣係數必須落在 (0, 1]
            if !(*factor > 0.0 && *factor <= 1.0) {
                return Err(HimayaError::InvalidConfigValueError {
                    field: format!("pricing.promos.{}", code),
                    value: factor.to_string(),
                    reason: "Promo factor must be greater than 0 and at most 1".to_string(),
                });
            }
        }

        validation::validate_url("breach_api.base_url", &self.breach_api.base_url)?;
        validation::validate_non_empty_string("breach_api.user_agent", &self.breach_api.user_agent)?;
        validation::validate_range("breach_api.timeout_seconds", self.breach_api.timeout_seconds, 1, 900)?;

        if !validation::validate_email(&self.notification.sender) {
            return Err(HimayaError::InvalidConfigValueError {
                field: "notification.sender".to_string(),
                value: self.notification.sender.clone(),
                reason: "Sender must be a valid email address".to_string(),
            });
        }
        if !self
            .notification
            .sender
            .ends_with(&format!("@{}", self.notification.source_domain))
        {
            return Err(HimayaError::InvalidConfigValueError {
                field: "notification.sender".to_string(),
                value: self.notification.sender.clone(),
                reason: format!(
                    "Sender must belong to the verified domain {}",
                    self.notification.source_domain
                ),
            });
        }
        validation::validate_non_empty_string("notification.subject", &self.notification.subject)?;

        validation::validate_path("breach_table.path", &self.breach_table.path)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
