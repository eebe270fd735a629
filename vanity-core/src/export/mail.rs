//! E-mail delivery of quotes through an HTTP mail service.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{Branding, MailSettings};
use crate::error::{QuoteError, Result};
use crate::model::{PricingBreakdown, QuoteArtifact, VanityConfiguration};
use crate::validation::check_email;

use super::pdf::quote_pdf_filename;
use super::summary::render_quote_summary;

/// PDF attached to a quote e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfAttachment {
    pub filename: String,
    /// Standard base64 of the PDF bytes.
    pub content_base64: String,
}

/// Payload handed to the mail collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteEmail {
    pub reference: String,
    pub recipient_email: String,
    pub customer_name: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub configuration: VanityConfiguration,
    pub pricing: PricingBreakdown,
    pub pdf_attachment: Option<PdfAttachment>,
}

impl QuoteEmail {
    /// Build the e-mail for a quote; `pdf` is attached when present.
    pub fn from_artifact(
        artifact: &QuoteArtifact,
        branding: &Branding,
        recipient: &str,
        pdf: Option<&[u8]>,
    ) -> Self {
        let pdf_attachment = pdf.map(|bytes| PdfAttachment {
            filename: quote_pdf_filename(&artifact.created_at),
            content_base64: STANDARD.encode(bytes),
        });

        Self {
            reference: artifact.reference.clone(),
            recipient_email: recipient.trim().to_string(),
            customer_name: artifact.customer.as_ref().map(|c| c.name.clone()),
            subject: format!(
                "Your vanity quote {} from {}",
                artifact.reference, branding.company_name
            ),
            text_body: render_quote_summary(artifact, branding),
            configuration: artifact.configuration.clone(),
            pricing: artifact.pricing.clone(),
            pdf_attachment,
        }
    }
}

/// Delivers quote e-mails. Implementations do not retry.
#[async_trait]
pub trait QuoteMailer: Send + Sync {
    async fn send(&self, email: &QuoteEmail) -> Result<()>;
}

/// Posts quote e-mails as JSON to a mail service endpoint.
#[derive(Debug, Clone)]
pub struct HttpQuoteMailer {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpQuoteMailer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vanity-quote/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteError::MailSendFailed {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Create a mailer from settings; fails when no endpoint is configured.
    pub fn from_settings(settings: &MailSettings) -> Result<Self> {
        let endpoint = settings
            .endpoint
            .clone()
            .ok_or_else(|| QuoteError::MailSendFailed {
                message: "no mail endpoint configured".to_string(),
            })?;
        Self::new(
            endpoint,
            settings.api_key(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

#[async_trait]
impl QuoteMailer for HttpQuoteMailer {
    async fn send(&self, email: &QuoteEmail) -> Result<()> {
        let mut request = self.http.post(&self.endpoint).json(email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request
            .send()
            .await
            .map_err(|e| QuoteError::MailSendFailed {
                message: e.to_string(),
            })?;

        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        let body = res.text().await.unwrap_or_default();
        Err(QuoteError::MailSendFailed {
            message: format!("{} {}", status, body.trim()).trim_end().to_string(),
        })
    }
}

/// Validate the recipient and hand the quote to the mailer.
pub async fn send_quote_email(
    mailer: &dyn QuoteMailer,
    artifact: &QuoteArtifact,
    branding: &Branding,
    recipient: &str,
    pdf: Option<&[u8]>,
) -> Result<()> {
    check_email(recipient)?;

    let email = QuoteEmail::from_artifact(artifact, branding, recipient, pdf);
    match mailer.send(&email).await {
        Ok(()) => {
            tracing::info!("Sent quote {} to {}", artifact.reference, email.recipient_email);
            Ok(())
        }
        Err(err) => {
            tracing::warn!("Quote {} was not sent: {}", artifact.reference, err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerInfo, Money};
    use crate::pricing::{calculate_pricing, RateTable};
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<QuoteEmail>>,
    }

    #[async_trait]
    impl QuoteMailer for RecordingMailer {
        async fn send(&self, email: &QuoteEmail) -> Result<()> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    struct RejectingMailer;

    #[async_trait]
    impl QuoteMailer for RejectingMailer {
        async fn send(&self, _email: &QuoteEmail) -> Result<()> {
            Err(QuoteError::MailSendFailed {
                message: "503 Service Unavailable".to_string(),
            })
        }
    }

    fn sample() -> QuoteArtifact {
        let config = VanityConfiguration::default();
        let pricing = calculate_pricing(&config, &RateTable::default()).unwrap();
        QuoteArtifact::new(
            config,
            pricing,
            Some(CustomerInfo::new("Lee Park", "lee@example.com")),
            Utc.with_ymd_and_hms(2026, 1, 20, 8, 30, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_send_with_attachment() {
        let mailer = RecordingMailer::default();
        let artifact = sample();

        send_quote_email(
            &mailer,
            &artifact,
            &Branding::default(),
            " lee@example.com ",
            Some(&b"%PDF-1.4"[..]),
        )
        .await
        .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let email = &sent[0];
        assert_eq!(email.recipient_email, "lee@example.com");
        assert_eq!(email.customer_name.as_deref(), Some("Lee Park"));
        assert_eq!(email.reference, artifact.reference);
        assert!(email.text_body.contains(&artifact.reference));

        let attachment = email.pdf_attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "vanity-quote-20260120-083000.pdf");
        assert_eq!(STANDARD.decode(&attachment.content_base64).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_invalid_recipient_not_sent() {
        let mailer = RecordingMailer::default();
        let err = send_quote_email(&mailer, &sample(), &Branding::default(), "not-an-email", None)
            .await
            .unwrap_err();

        assert!(matches!(err, QuoteError::InvalidEmail { .. }));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mailer_failure_propagates() {
        let err = send_quote_email(
            &RejectingMailer,
            &sample(),
            &Branding::default(),
            "lee@example.com",
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, QuoteError::MailSendFailed { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_email_payload_json() {
        let email = QuoteEmail::from_artifact(&sample(), &Branding::default(), "lee@example.com", None);
        let json = serde_json::to_value(&email).unwrap();

        assert_eq!(json["recipient_email"], "lee@example.com");
        assert!(json["pdf_attachment"].is_null());
        assert!(json["pricing"]["total_price"].as_i64().unwrap() > Money::zero().cents);
    }

    #[test]
    fn test_from_settings_requires_endpoint() {
        let err = HttpQuoteMailer::from_settings(&MailSettings::default()).unwrap_err();
        assert!(matches!(err, QuoteError::MailSendFailed { .. }));

        let settings = MailSettings {
            endpoint: Some("http://127.0.0.1:9/send".to_string()),
            ..Default::default()
        };
        assert!(HttpQuoteMailer::from_settings(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_send_failure() {
        let mailer = HttpQuoteMailer::new(
            "http://127.0.0.1:9/send",
            None,
            Duration::from_millis(500),
        )
        .unwrap();
        let email = QuoteEmail::from_artifact(&sample(), &Branding::default(), "lee@example.com", None);

        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, QuoteError::MailSendFailed { .. }));
    }
}
