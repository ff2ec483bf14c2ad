//! Live adapter for the `Mailer` port: posts messages as JSON to a mail service.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{ensure_success, transport};
use crate::config::MailConfig;
use crate::ports::{Email, Mailer, PortFuture};

/// Mail service reached over HTTP.
pub struct HttpMailer {
    client: Client,
    url: String,
    from: String,
    token: Option<String>,
}

impl HttpMailer {
    /// Creates a client for the configured mail service.
    #[must_use]
    pub fn new(config: &MailConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.url.clone(),
            from: config.from.clone(),
            token: config.token.clone(),
        }
    }
}

/// Request body sent to the mail service.
#[derive(Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    attachments: Vec<MailAttachment<'a>>,
}

/// An attachment with base64 content.
#[derive(Serialize)]
struct MailAttachment<'a> {
    filename: &'a str,
    content_type: &'a str,
    content_base64: String,
}

impl Mailer for HttpMailer {
    fn send<'a>(&'a self, email: &'a Email) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let what = format!("send mail to {}", email.to);
            let body = MailRequest {
                from: &self.from,
                to: &email.to,
                subject: &email.subject,
                text: &email.body,
                attachments: email
                    .attachments
                    .iter()
                    .map(|a| MailAttachment {
                        filename: &a.filename,
                        content_type: &a.mime_type,
                        content_base64: STANDARD.encode(&a.content),
                    })
                    .collect(),
            };
            debug!(to = %email.to, attachments = body.attachments.len(), "sending mail");

            let mut request = self.client.post(&self.url).json(&body);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            let response = request.send().await.map_err(transport(&what))?;
            ensure_success(response, &what).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::ports::{Attachment, PortError};

    fn mailer(server: &MockServer) -> HttpMailer {
        HttpMailer::new(&MailConfig {
            url: format!("{}/send", server.uri()),
            from: "noreply@lab.test".to_string(),
            token: None,
        })
    }

    fn email() -> Email {
        Email {
            to: "pi@lab.test".to_string(),
            subject: "Participant links for Pilot".to_string(),
            body: "links attached".to_string(),
            attachments: vec![Attachment {
                filename: "pilot_participant_links.txt".to_string(),
                mime_type: "text/plain".to_string(),
                content: b"hi".to_vec(),
            }],
        }
    }

    #[tokio::test]
    async fn posts_message_with_encoded_attachment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(body_partial_json(json!({
                "from": "noreply@lab.test",
                "to": "pi@lab.test",
                "subject": "Participant links for Pilot",
                "attachments": [{
                    "filename": "pilot_participant_links.txt",
                    "content_type": "text/plain",
                    "content_base64": "aGk="
                }]
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        mailer(&server).send(&email()).await.unwrap();
    }

    #[tokio::test]
    async fn service_error_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = mailer(&server).send(&email()).await.unwrap_err();
        assert_eq!(
            err,
            PortError::Upstream("send mail to pi@lab.test failed with status 502".to_string())
        );
    }
}
