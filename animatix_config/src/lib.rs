use std::{net::IpAddr, path::Path};

use animatix_models::email_address::EmailAddress;
use anyhow::Context;
use config::{File, FileFormat};
use serde::Deserialize;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variable holding the SMTP account identifier.
pub const SMTP_USER_VAR: &str = "ANIMATIX_SMTP_USER";
/// Environment variable holding the SMTP account secret.
pub const SMTP_PASSWORD_VAR: &str = "ANIMATIX_SMTP_PASSWORD";

pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    /// Address the operator account sends as. Must match what the transport
    /// will accept for the authenticated account.
    pub from: EmailAddress,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Operator mailbox that receives contact form submissions.
    pub recipient: EmailAddress,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

/// SMTP account identifier and secret from the environment.
///
/// Absence of both variables is not an error: the server starts without a
/// transport and reports the misconfiguration per request. A partial pair is
/// almost certainly a deployment mistake and fails loudly instead.
#[derive(Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: String,
}

impl SmtpCredentials {
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        use std::env::VarError;

        match (
            std::env::var(SMTP_USER_VAR),
            std::env::var(SMTP_PASSWORD_VAR),
        ) {
            (Ok(user), Ok(password)) => Ok(Some(Self { user, password })),
            (Err(VarError::NotPresent), Err(VarError::NotPresent)) => Ok(None),
            (Ok(_), Err(VarError::NotPresent)) => {
                anyhow::bail!("{SMTP_USER_VAR} is set but {SMTP_PASSWORD_VAR} is not")
            }
            (Err(VarError::NotPresent), Ok(_)) => {
                anyhow::bail!("{SMTP_PASSWORD_VAR} is set but {SMTP_USER_VAR} is not")
            }
            (Err(err), _) | (_, Err(err)) => {
                Err(err).context("Failed to read smtp credentials from the environment")
            }
        }
    }
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .finish()
    }
}
