use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Address shape accepted from submitters: `\S+@\S+.\S+`.
///
/// Intentionally looser than a full mailbox grammar; the form client and the
/// relay endpoint must agree on the same check.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessageBody,
}

#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageBody(String);

/// Outcome of one submission attempt as reported to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
}

impl SubmissionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        for (input, valid) in [
            ("a@b.c", true),
            ("jane@x.com", true),
            ("user.name@studio.co.uk", true),
            ("plainaddress", false),
            ("x", false),
            ("a@b", false),
            ("a b@c.d", false),
            ("a@b .c", false),
            ("", false),
        ] {
            assert_eq!(
                ContactEmail::try_new(input).is_ok(),
                valid,
                "unexpected verdict for {input:?}"
            );
        }
    }

    #[test]
    fn name_trimmed_and_non_empty() {
        assert_eq!(*ContactName::try_new("  Jane ").unwrap(), "Jane");
        assert!(ContactName::try_new("   ").is_err());
        assert!(ContactName::try_new("").is_err());
    }

    #[test]
    fn message_non_empty() {
        assert!(ContactMessageBody::try_new("Hello").is_ok());
        assert!(ContactMessageBody::try_new(" \n\t").is_err());
    }

    #[test]
    fn submission_result_serializes_flat() {
        let json = serde_json::to_value(SubmissionResult::ok("Message sent successfully!")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Message sent successfully!"})
        );
    }
}
