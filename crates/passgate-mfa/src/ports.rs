use async_trait::async_trait;
use std::collections::BTreeMap;

/// Path-scoped secret storage the challenge is issued against.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn write(&self, path: &str, data: &BTreeMap<String, String>) -> anyhow::Result<()>;

    /// Whether a secret exists at `path`. A missing path is `Ok(false)`, not an error.
    async fn read(&self, path: &str) -> anyhow::Result<bool>;

    async fn delete(&self, path: &str) -> anyhow::Result<()>;
}

/// Channel for user-facing messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> anyhow::Result<()>;
}
