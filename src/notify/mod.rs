/**
 * Outbound Email Notifications
 *
 * Sends notification emails through the Resend HTTP API. The mailer is
 * configured from the environment at startup; when unconfigured, sends fail
 * with `Unconfigured` and callers decide whether that fails the request
 * (meeting requests) or only surfaces a warning (contact submissions).
 *
 * Delivery is fire-per-call with no retry or queueing; a failed send never
 * rolls back the write it accompanied.
 */

use serde_json::json;
use thiserror::Error;

use crate::outreach::{ContactSubmission, MeetingRequest};

const RESEND_API_URL: &str = "https://api.resend.com";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email notifications are not configured")]
    Unconfigured,

    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email provider rejected the message (status {0})")]
    Rejected(u16),
}

#[derive(Clone)]
struct MailerConfig {
    api_key: String,
    base_url: String,
    from: String,
    to: Vec<String>,
}

/// Notification mailer. Cheap to clone; holds a shared HTTP client.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: Option<MailerConfig>,
}

impl Mailer {
    /// Build from `RESEND_API_KEY`, `EMAIL_FROM`, and `EMAIL_TO`
    /// (comma-separated). Missing key or recipients leaves the mailer
    /// unconfigured; that is logged once here and surfaced per send.
    pub fn from_env() -> Self {
        let api_key = std::env::var("RESEND_API_KEY").ok().filter(|k| !k.is_empty());
        let to: Vec<String> = std::env::var("EMAIL_TO")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = match api_key {
            Some(api_key) if !to.is_empty() => Some(MailerConfig {
                api_key,
                base_url: RESEND_API_URL.to_string(),
                from: std::env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "notifications@opsdesk.example".to_string()),
                to,
            }),
            _ => {
                tracing::warn!("Email notifications disabled (RESEND_API_KEY/EMAIL_TO not set)");
                None
            }
        };

        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Unconfigured mailer: every send fails with `Unconfigured`.
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            config: None,
        }
    }

    /// Fully specified mailer, used by tests to point at a mock server.
    pub fn with_endpoint(api_key: &str, base_url: &str, from: &str, to: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: Some(MailerConfig {
                api_key: api_key.to_string(),
                base_url: base_url.trim_end_matches('/').to_string(),
                from: from.to_string(),
                to,
            }),
        }
    }

    async fn send(
        &self,
        subject: &str,
        html: String,
        reply_to: Option<&str>,
    ) -> Result<(), NotifyError> {
        let config = self.config.as_ref().ok_or(NotifyError::Unconfigured)?;

        let mut payload = json!({
            "from": config.from,
            "to": config.to,
            "subject": subject,
            "html": html,
        });
        if let Some(reply_to) = reply_to {
            payload["reply_to"] = json!(reply_to);
        }

        let response = self
            .client
            .post(format!("{}/emails", config.base_url))
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }

        tracing::info!("Notification email sent: {}", subject);
        Ok(())
    }

    /// Notify the team of a new contact-form submission.
    pub async fn send_contact_notice(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), NotifyError> {
        let mut body = format!(
            "<h2>Message Received</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>",
            submission.name, submission.email
        );
        if let Some(firm) = &submission.firm {
            body.push_str(&format!("<p><strong>Firm:</strong> {}</p>", firm));
        }
        if let Some(phone) = &submission.phone {
            body.push_str(&format!("<p><strong>Phone:</strong> {}</p>", phone));
        }
        body.push_str(&format!(
            "<p><strong>Message:</strong></p><p>{}</p>",
            submission.comments
        ));

        self.send("WEBSITE: Message Received", body, Some(&submission.email))
            .await
    }

    /// Notify the team of a meeting request. Nothing is persisted for
    /// these; the email is the whole record.
    pub async fn send_meeting_notice(&self, request: &MeetingRequest) -> Result<(), NotifyError> {
        let advisors = if request.advisors().is_empty() {
            "Not specified".to_string()
        } else {
            request.advisors().join(" and ")
        };

        let times = request
            .selected_times
            .iter()
            .enumerate()
            .map(|(i, t)| format!("<li>Option {}: {}</li>", i + 1, t.to_rfc3339()))
            .collect::<String>();

        let mut body = format!(
            "<h2>Meeting Requested</h2>\
             <p><strong>Meeting with:</strong> {}</p>\
             <p><strong>Requested by:</strong> {} ({})</p>\
             <ul>{}</ul>",
            advisors, request.name, request.email, times
        );
        if let Some(notes) = &request.notes {
            body.push_str(&format!("<p><strong>Notes:</strong> {}</p>", notes));
        }

        self.send("WEBSITE: Meeting Requested", body, Some(&request.email))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> ContactSubmission {
        ContactSubmission {
            id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            firm: Some("Doe Capital".to_string()),
            phone: None,
            comments: "Please get in touch".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_contact_notice_posts_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(bearer_token("test-key"))
            .and(body_partial_json(serde_json::json!({
                "from": "site@opsdesk.example",
                "to": ["team@opsdesk.example"],
                "subject": "WEBSITE: Message Received",
                "reply_to": "jane@example.com",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = Mailer::with_endpoint(
            "test-key",
            &server.uri(),
            "site@opsdesk.example",
            vec!["team@opsdesk.example".to_string()],
        );

        mailer.send_contact_notice(&submission()).await.unwrap();
    }

    #[tokio::test]
    async fn test_provider_rejection_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let mailer = Mailer::with_endpoint(
            "test-key",
            &server.uri(),
            "site@opsdesk.example",
            vec!["team@opsdesk.example".to_string()],
        );

        let err = mailer.send_contact_notice(&submission()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Rejected(422)));
    }

    #[tokio::test]
    async fn test_disabled_mailer_reports_unconfigured() {
        let err = Mailer::disabled()
            .send_contact_notice(&submission())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Unconfigured));
    }
}
