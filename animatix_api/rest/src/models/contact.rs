use animatix_models::contact::{ContactEmail, ContactMessageBody, ContactName, ContactSubmission};
use serde::Deserialize;

/// Raw form fields as submitted. Field-level validation happens in
/// [`TryFrom`], so missing and malformed fields produce the endpoint's own
/// messages instead of a deserializer rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiContactFormError {
    MissingFields,
    InvalidEmail,
}

impl TryFrom<ApiContactForm> for ContactSubmission {
    type Error = ApiContactFormError;

    fn try_from(value: ApiContactForm) -> Result<Self, Self::Error> {
        // Presence of all three fields is checked before the email shape.
        let name = value
            .name
            .and_then(|name| ContactName::try_new(name).ok())
            .ok_or(ApiContactFormError::MissingFields)?;
        let email = value
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(ApiContactFormError::MissingFields)?;
        let message = value
            .message
            .and_then(|message| ContactMessageBody::try_new(message).ok())
            .ok_or(ApiContactFormError::MissingFields)?;

        let email =
            ContactEmail::try_new(email).map_err(|_| ApiContactFormError::InvalidEmail)?;

        Ok(Self {
            name,
            email,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn form(name: Option<&str>, email: Option<&str>, message: Option<&str>) -> ApiContactForm {
        ApiContactForm {
            name: name.map(Into::into),
            email: email.map(Into::into),
            message: message.map(Into::into),
        }
    }

    #[test]
    fn complete_form_converts() {
        // Arrange
        let form = form(Some("Jane"), Some("jane@x.com"), Some("Hello"));

        // Act
        let submission = ContactSubmission::try_from(form).unwrap();

        // Assert
        assert_eq!(
            submission,
            ContactSubmission {
                name: ContactName::try_new("Jane").unwrap(),
                email: ContactEmail::try_new("jane@x.com").unwrap(),
                message: ContactMessageBody::try_new("Hello").unwrap(),
            }
        );
    }

    #[test]
    fn absent_or_blank_fields_are_missing() {
        for form in [
            form(None, Some("jane@x.com"), Some("Hello")),
            form(Some("  "), Some("jane@x.com"), Some("Hello")),
            form(Some("Jane"), None, Some("Hello")),
            form(Some("Jane"), Some(" "), Some("Hello")),
            form(Some("Jane"), Some("jane@x.com"), None),
            form(Some("Jane"), Some("jane@x.com"), Some("\n")),
        ] {
            assert_eq!(
                ContactSubmission::try_from(form),
                Err(ApiContactFormError::MissingFields)
            );
        }
    }

    #[test]
    fn email_shape_checked_after_presence() {
        // A malformed email together with a missing field reports the
        // missing field first.
        assert_eq!(
            ContactSubmission::try_from(form(Some("Jane"), Some("not-an-email"), None)),
            Err(ApiContactFormError::MissingFields)
        );

        assert_eq!(
            ContactSubmission::try_from(form(Some("Jane"), Some("not-an-email"), Some("Hello"))),
            Err(ApiContactFormError::InvalidEmail)
        );
    }
}
