use crate::domain::model::BreachName;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Breach database lookup for a single email address or phone number.
#[async_trait]
pub trait BreachLookup: Send + Sync {
    /// Returns an empty list when the identifier appears in no breach.
    async fn breached_account(&self, identifier: &str) -> Result<Vec<BreachName>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    #[serde(rename = "MessageId")]
    pub message_id: Option<String>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, message: &str) -> Result<NotificationReceipt>;
}
