use crate::config::NotificationConfig;
use crate::core::notification::{html_content, text_content};
use crate::domain::ports::{NotificationReceipt, Notifier};
use crate::utils::error::{HimayaError, Result};
use async_trait::async_trait;
use aws_sdk_sesv2::error::DisplayErrorContext;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;

const CHARSET: &str = "UTF-8";

/// Sends order notifications through Amazon SES.
#[derive(Debug, Clone)]
pub struct SesNotifier {
    client: SesClient,
    config: NotificationConfig,
}

impl SesNotifier {
    pub fn new(client: SesClient, config: NotificationConfig) -> Self {
        Self { client, config }
    }
}

fn content(data: String) -> Result<Content> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| HimayaError::upstream("SES", format!("invalid email content: {}", e)))
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> Result<NotificationReceipt> {
        tracing::info!("📧 Sending email using SES");

        let email = Message::builder()
            .subject(content(self.config.subject.clone())?)
            .body(
                Body::builder()
                    .text(content(text_content(recipient, message)?)?)
                    .html(content(html_content(recipient, message)?)?)
                    .build(),
            )
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(&self.config.sender)
            .destination(Destination::builder().to_addresses(recipient).build())
            .content(EmailContent::builder().simple(email).build())
            .send()
            .await
            .map_err(|e| HimayaError::upstream("SES", DisplayErrorContext(&e).to_string()))?;

        let receipt = NotificationReceipt {
            message_id: output.message_id().map(str::to_string),
        };
        tracing::info!("📨 Send status: {:?}", receipt);
        Ok(receipt)
    }
}
