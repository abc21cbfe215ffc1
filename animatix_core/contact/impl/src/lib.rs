use std::sync::Arc;

use animatix_core_contact_contracts::{ContactSendMessageError, ContactService};
use animatix_email_contracts::{ContentType, Email, EmailService};
use animatix_models::{contact::ContactSubmission, email_address::EmailAddress};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email> {
    email: Option<Email>,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Operator mailbox that receives all submissions.
    pub recipient: Arc<EmailAddress>,
}

impl<Email> ContactServiceImpl<Email> {
    /// `email` is `None` when the transport credentials were not present in
    /// the environment at startup; submissions then fail with
    /// [`ContactSendMessageError::NotConfigured`] without contacting the
    /// transport.
    pub fn new(email: Option<Email>, config: ContactServiceConfig) -> Self {
        Self { email, config }
    }
}

impl<EmailS> ContactService for ContactServiceImpl<EmailS>
where
    EmailS: EmailService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let Some(email) = &self.email else {
            return Err(ContactSendMessageError::NotConfigured);
        };

        let message = Email {
            recipient: (*self.config.recipient).clone().into(),
            subject: format!("New Contact Form Submission from {}", *submission.name),
            body: format!(
                "Name: {}\nEmail: {}\nMessage:\n{}",
                *submission.name, *submission.email, *submission.message
            ),
            content_type: ContentType::Text,
            // The submitter address is only shape-checked; skip the header if
            // it does not form a real mailbox.
            reply_to: submission.email.parse().ok(),
            from_name: Some((*submission.name).clone()),
        };

        if !email.send(message).await? {
            return Err(ContactSendMessageError::Send);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use animatix_email_contracts::MockEmailService;
    use animatix_models::contact::{ContactEmail, ContactMessageBody, ContactName};
    use animatix_utils::assert_matches;

    use super::*;

    #[tokio::test]
    async fn ok() {
        // Arrange
        let config = ContactServiceConfig {
            recipient: Arc::new("studio@animatix.example".try_into().unwrap()),
        };

        let email = MockEmailService::new().with_send(expected_email(&config), true);

        let sut = ContactServiceImpl::new(Some(email), config);

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn transport_rejects() {
        // Arrange
        let config = ContactServiceConfig {
            recipient: Arc::new("studio@animatix.example".try_into().unwrap()),
        };

        let email = MockEmailService::new().with_send(expected_email(&config), false);

        let sut = ContactServiceImpl::new(Some(email), config);

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Send));
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let config = ContactServiceConfig {
            recipient: Arc::new("studio@animatix.example".try_into().unwrap()),
        };

        let sut = ContactServiceImpl::<MockEmailService>::new(None, config);

        // Act
        let result = sut.send_message(submission()).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::NotConfigured));
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: ContactName::try_new("Jane Doe").unwrap(),
            email: ContactEmail::try_new("jane@example.com").unwrap(),
            message: ContactMessageBody::try_new("Hello from the form!").unwrap(),
        }
    }

    fn expected_email(config: &ContactServiceConfig) -> Email {
        Email {
            recipient: (*config.recipient).clone().into(),
            subject: "New Contact Form Submission from Jane Doe".into(),
            body: "Name: Jane Doe\nEmail: jane@example.com\nMessage:\nHello from the form!".into(),
            content_type: ContentType::Text,
            reply_to: Some("jane@example.com".parse().unwrap()),
            from_name: Some("Jane Doe".into()),
        }
    }
}
