use animatix_config::{Config, SmtpCredentials};
use animatix_email_contracts::{ContentType, Email, EmailService};
use animatix_models::email_address::EmailAddressWithName;
use anyhow::{ensure, Context};
use clap::Subcommand;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let credentials = SmtpCredentials::from_env()?
        .context("Smtp credentials are not configured in the environment")?;
    let email_service = email::connect(&config.email, credentials)?;

    let ok = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            content_type: ContentType::Text,
            reply_to: None,
            from_name: None,
        })
        .await?;

    ensure!(ok, "Failed to send email");

    Ok(())
}
