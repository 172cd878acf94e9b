use crate::client::VaultClient;
use async_trait::async_trait;
use passgate_mfa::SecretStore;
use std::collections::BTreeMap;

#[async_trait]
impl SecretStore for VaultClient {
    async fn write(&self, path: &str, data: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let body = serde_json::to_value(data)?;
        self.write_json(path, &body).await
    }

    async fn read(&self, path: &str) -> anyhow::Result<bool> {
        Ok(self.read_json(path).await?.is_some())
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        self.delete_path(path).await
    }
}
