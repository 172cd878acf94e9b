use async_trait::async_trait;
use passgate_mfa::Notifier;

/// Writes messages to the job log.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        println!("{text}");
        Ok(())
    }
}
