use animatix_config::EmailConfig;
use animatix_email_impl::EmailServiceImpl;
use anyhow::Context;

/// Build the SMTP transport for the operator account.
pub fn connect(
    config: &EmailConfig,
    credentials: animatix_config::SmtpCredentials,
) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(
        &config.smtp_url,
        config.from.clone(),
        animatix_email_impl::SmtpCredentials {
            user: credentials.user,
            password: credentials.password,
        },
    )
    .context("Failed to configure smtp transport")
}
