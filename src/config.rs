use crate::domain::notification::{MerchantCredentials, SecretCode};
use crate::domain::ports::CredentialsProvider;
use crate::error::{NotifyError, Result};
use crate::infrastructure::logging::LogLevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Merchant section of the settings file. Either value may instead come from
/// the command line or the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MerchantSettings {
    pub merchant_id: Option<u64>,
    pub secret_code: Option<SecretCode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: LogLevelFilter,
    /// Append notification records to this file instead of the tracing output.
    pub file: Option<PathBuf>,
    pub channel_capacity: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: LogLevelFilter::default(),
            file: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Runtime settings, usually read from a TOML file:
///
/// ```toml
/// [merchant]
/// merchant_id = 123
/// secret_code = "..."
///
/// [logging]
/// filter = "errors_and_transaction"
/// file = "logs/notify.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub merchant: MerchantSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Command-line or environment values take precedence over the file.
    pub fn with_overrides(mut self, merchant_id: Option<u64>, secret_code: Option<String>) -> Self {
        if merchant_id.is_some() {
            self.merchant.merchant_id = merchant_id;
        }
        if let Some(secret) = secret_code {
            self.merchant.secret_code = Some(SecretCode::new(secret));
        }
        self
    }

    /// Fails when the merchant id or a non-empty secret is missing.
    pub fn validate(&self) -> Result<MerchantCredentials> {
        let merchant_id = self
            .merchant
            .merchant_id
            .ok_or_else(|| NotifyError::ConfigError("merchant_id is not set".to_string()))?;
        let secret_code = match &self.merchant.secret_code {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                return Err(NotifyError::ConfigError(
                    "secret_code is not set".to_string(),
                ));
            }
        };
        Ok(MerchantCredentials {
            merchant_id,
            secret_code,
        })
    }
}

/// Validated settings with credentials guaranteed to be present.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub credentials: MerchantCredentials,
    pub logging: LoggingSettings,
}

impl TryFrom<Settings> for ResolvedSettings {
    type Error = NotifyError;

    fn try_from(settings: Settings) -> Result<Self> {
        let credentials = settings.validate()?;
        Ok(Self {
            credentials,
            logging: settings.logging,
        })
    }
}

impl CredentialsProvider for ResolvedSettings {
    fn credentials(&self) -> MerchantCredentials {
        self.credentials.clone()
    }
}
