//! # Client Configuration
//!
//! Configuration for the storefront: where the API lives, UI timings and an
//! optional saved login.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SWEETSHOP_API_URL=https://shop.example.com/api                     │
//! │     SWEETSHOP_TOKEN=eyJhbGciOi...                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/config.toml (Linux)                           │
//! │     ~/Library/Application Support/com.sweetshop.storefront/ (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8081/api, 500 ms debounce, no session             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:8081/api"
//! timeout_secs = 30
//!
//! [ui]
//! search_debounce_ms = 500
//! notice_secs = 5
//! profile_notice_secs = 3
//! low_stock_threshold = 10
//! currency_symbol = "₹"
//!
//! [session]
//! token = "eyJhbGciOi..."
//! user_id = "42"
//! email = "asha@example.com"
//! role = "USER"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use sweetshop_core::{Role, Session, LOW_STOCK_THRESHOLD};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the inventory/auth API lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Prefix for every endpoint path, e.g. `http://localhost:8081/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8081/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// UI Settings
// =============================================================================

/// Timings and display settings shared by every view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Quiet period before a catalog filter change is sent (milliseconds).
    #[serde(default = "default_debounce")]
    pub search_debounce_ms: u64,

    /// Lifetime of inventory manager and catalog notices (seconds).
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,

    /// Lifetime of the profile success notice (seconds).
    #[serde(default = "default_profile_notice_secs")]
    pub profile_notice_secs: u64,

    /// Quantity below which an item counts as low stock.
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: i64,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_debounce() -> u64 {
    500
}
fn default_notice_secs() -> u64 {
    5
}
fn default_profile_notice_secs() -> u64 {
    3
}
fn default_low_stock() -> i64 {
    LOW_STOCK_THRESHOLD
}
fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            search_debounce_ms: default_debounce(),
            notice_secs: default_notice_secs(),
            profile_notice_secs: default_profile_notice_secs(),
            low_stock_threshold: default_low_stock(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl UiSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }

    pub fn profile_notice_ttl(&self) -> Duration {
        Duration::from_secs(self.profile_notice_secs)
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// A login saved from a previous visit. Every field must be set for it to
/// be restored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl SessionSettings {
    /// Builds the session if the saved login is complete.
    pub fn to_session(&self) -> Option<Session> {
        match (&self.token, &self.user_id, &self.email, self.role) {
            (Some(token), Some(user_id), Some(email), Some(role)) if !token.is_empty() => {
                Some(Session::new(user_id.clone(), email.clone(), role, token.clone()))
            }
            _ => None,
        }
    }

    pub fn from_session(session: &Session) -> Self {
        SessionSettings {
            token: Some(session.token.clone()),
            user_id: Some(session.user_id.clone()),
            email: Some(session.email.clone()),
            role: Some(session.role),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.ui.search_debounce_ms == 0 {
            return Err(ClientError::InvalidConfig(
                "search_debounce_ms must be greater than 0".into(),
            ));
        }

        if self.ui.notice_secs == 0 || self.ui.profile_notice_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "notice durations must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SWEETSHOP_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = var("SWEETSHOP_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.api.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric SWEETSHOP_TIMEOUT_SECS"),
            }
        }

        if let Some(debounce) = var("SWEETSHOP_DEBOUNCE_MS") {
            match debounce.parse::<u64>() {
                Ok(ms) => self.ui.search_debounce_ms = ms,
                Err(_) => warn!(value = %debounce, "Ignoring non-numeric SWEETSHOP_DEBOUNCE_MS"),
            }
        }

        if let Some(token) = var("SWEETSHOP_TOKEN") {
            debug!("Overriding session token from environment");
            self.session.token = Some(token);
        }

        if let Some(email) = var("SWEETSHOP_EMAIL") {
            self.session.email = Some(email);
        }

        if let Some(user_id) = var("SWEETSHOP_USER_ID") {
            self.session.user_id = Some(user_id);
        }

        if let Some(role) = var("SWEETSHOP_ROLE") {
            match role.parse::<Role>() {
                Ok(parsed) => self.session.role = Some(parsed),
                Err(e) => warn!(error = %e, "Ignoring SWEETSHOP_ROLE"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sweetshop", "storefront")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    /// The saved login, if complete.
    pub fn session(&self) -> Option<Session> {
        self.session.to_session()
    }
}
