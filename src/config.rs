//! Configuration types for profit-estrategista

use crate::catalog::Product;
use crate::lead::FormDefinition;
use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides `crm.api_token`
pub const CRM_TOKEN_ENV: &str = "PROFIT_CRM_API_TOKEN";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crm: CrmConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub messaging: MessagingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Lead-capture forms; built-in forms are used when empty
    #[serde(default)]
    pub forms: Vec<FormDefinition>,
    /// Product catalog; built-in products are used when empty
    #[serde(default)]
    pub catalog: Vec<Product>,
}

/// CRM ingestion endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrmConfig {
    /// Webhook URL that accepts lead payloads
    #[serde(default = "default_crm_endpoint")]
    pub endpoint: String,

    /// Bearer token sent with every delivery
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(default = "default_crm_timeout_secs")]
    pub timeout_secs: u64,

    /// Tags attached to every lead regardless of form
    #[serde(default = "default_crm_tags")]
    pub default_tags: Vec<String>,
}

fn default_crm_endpoint() -> String {
    "http://localhost:8080/leads".to_string()
}
fn default_crm_timeout_secs() -> u64 {
    10
}
fn default_crm_tags() -> Vec<String> {
    vec!["site".to_string()]
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_crm_endpoint(),
            api_token: None,
            timeout_secs: default_crm_timeout_secs(),
            default_tags: default_crm_tags(),
        }
    }
}

impl CrmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pending-lead store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON file holding leads awaiting delivery
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/pending_leads.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// CRM sync worker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Delay between sweeps (seconds)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Attempt delivery right after a lead is saved
    #[serde(default = "default_true")]
    pub fast_path: bool,

    /// Give up after this many failed attempts (0 = infinite)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Give up once a lead is older than this many hours (0 = infinite)
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

fn default_true() -> bool {
    true
}
fn default_sweep_interval_secs() -> u64 {
    60
}
fn default_max_attempts() -> u32 {
    20
}
fn default_max_age_hours() -> u64 {
    168 // one week
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            fast_path: true,
            max_attempts: default_max_attempts(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

impl SyncConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Messaging handoff configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Recipient number for WhatsApp deep links, country code included
    #[serde(default = "default_whatsapp_number")]
    pub whatsapp_number: String,

    /// Message used when a form has no template of its own
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_whatsapp_number() -> String {
    "5511999999999".to_string()
}
fn default_greeting() -> String {
    "Olá! Meu nome é {name} e gostaria de saber mais sobre as estratégias.".to_string()
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: default_whatsapp_number(),
            greeting: default_greeting(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; exporter disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if let Ok(token) = std::env::var(CRM_TOKEN_ENV) {
            if !token.is_empty() {
                config.crm.api_token = Some(token);
            }
        }
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
