use crate::domain::signature::{HashAlgorithm, Passphrase};
use crate::error::{FeedbackError, Result};
use crate::interfaces::settings_text::{Brand, LocaleMap};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable that overrides the configured SHA-OUT passphrase.
pub const SHA_OUT_ENV: &str = "FEEDBACK_SHA_OUT";

/// Merchant-side settings of the off-site gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub sha_out: Passphrase,
    pub sha_algorithm: HashAlgorithm,
    /// Log every raw feedback received, signature included.
    pub log_feedback: bool,
    pub language_from_ui: bool,
    pub language_from_ui_map: LocaleMap,
    pub enable_brands: bool,
    pub brands: Vec<Brand>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            sha_out: Passphrase::new(""),
            sha_algorithm: HashAlgorithm::default(),
            log_feedback: false,
            language_from_ui: false,
            language_from_ui_map: LocaleMap::new(),
            enable_brands: false,
            brands: Vec::new(),
        }
    }
}

impl GatewayConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| FeedbackError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| FeedbackError::Config(format!("{}: {e}", path.display())))
    }

    /// Applies `FEEDBACK_SHA_OUT` when it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(secret) = env::var(SHA_OUT_ENV)
            && !secret.is_empty()
        {
            self.sha_out = Passphrase::new(secret);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sha_out.is_empty() {
            return Err(FeedbackError::Config(format!(
                "sha_out passphrase is empty (set it in the config file or {SHA_OUT_ENV})"
            )));
        }
        Ok(())
    }

    /// Processor UI locale for a site locale, when the mapping is enabled.
    pub fn processor_locale(&self, site_locale: &str) -> Option<&str> {
        if !self.language_from_ui {
            return None;
        }
        self.language_from_ui_map
            .get(site_locale)
            .map(String::as_str)
    }

    /// Brands offered before the redirect, when the selection is enabled.
    pub fn offered_brands(&self) -> &[Brand] {
        if self.enable_brands { self.brands.as_slice() } else { &[] }
    }
}
