//! Subsystem configuration with validation.
//!
//! ```toml
//! [submission]
//! auto_commit = true
//!
//! [protection]
//! max_accept_fee = 1000000
//! min_payment_window = 10
//! max_reference_amount = 1000000
//!
//! [fees]
//! fee_per_kilobyte = 10000
//! pay_at_least_custom_fee = false
//! ```

use omni_types::COIN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::fee_policy::{FeePolicy, FeeRate};

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcTxConfig {
    pub submission: SubmissionConfig,
    pub protection: ProtectionConfig,
    pub fees: FeeConfig,
}

impl RpcTxConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string; missing keys take defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protection.max_accept_fee < 0 {
            return Err(ConfigError::Invalid(
                "max_accept_fee cannot be negative".into(),
            ));
        }
        if self.protection.max_reference_amount < 0 {
            return Err(ConfigError::Invalid(
                "max_reference_amount cannot be negative".into(),
            ));
        }
        if self.fees.fee_per_kilobyte < 0 {
            return Err(ConfigError::Invalid(
                "fee_per_kilobyte cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// Fee policy the process starts with.
    pub fn initial_fee_policy(&self) -> FeePolicy {
        FeePolicy::new(
            FeeRate::per_kilobyte(self.fees.fee_per_kilobyte),
            self.fees.pay_at_least_custom_fee,
        )
    }
}

/// How built transactions leave the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Broadcast built transactions; when false, return them unsigned.
    pub auto_commit: bool,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self { auto_commit: true }
    }
}

/// Sanity ceilings protecting callers from costly mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Highest minimum accept fee a DEx accept pays without override (minor units).
    pub max_accept_fee: i64,
    /// Shortest payment window a DEx accept tolerates without override (blocks).
    pub min_payment_window: u8,
    /// Highest reference output a simple send may attach (minor units).
    pub max_reference_amount: i64,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            max_accept_fee: COIN / 100,
            min_payment_window: 10,
            max_reference_amount: COIN / 100,
        }
    }
}

/// Operator fee settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Custom fee rate per 1000 bytes; zero lets the wallet estimate.
    pub fee_per_kilobyte: i64,
    pub pay_at_least_custom_fee: bool,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
