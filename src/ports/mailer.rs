//! Mailer port for sending email with attachments.

use serde::{Deserialize, Serialize};

use super::PortFuture;

/// A file attached to an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Filename shown to the recipient.
    pub filename: String,
    /// MIME type of the attachment.
    pub mime_type: String,
    /// Attachment bytes.
    #[serde(with = "super::base64_bytes")]
    pub content: Vec<u8>,
}

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Attached files.
    pub attachments: Vec<Attachment>,
}

/// Dispatches email.
pub trait Mailer: Send + Sync {
    /// Sends the email.
    ///
    /// # Errors
    ///
    /// Returns an error if the mail service rejects the message.
    fn send<'a>(&'a self, email: &'a Email) -> PortFuture<'a, ()>;
}
