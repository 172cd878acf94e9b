//! User-facing notifiers.

#![forbid(unsafe_code)]

mod console;
mod mattermost;

use anyhow::bail;
use passgate_mfa::Notifier;
use passgate_settings::LoggerConfig;

pub use console::ConsoleNotifier;
pub use mattermost::MattermostNotifier;

/// Build the notifier named by the namespace logger settings.
///
/// `mattermost` needs string options `url`, `token` and `channelId`. Any other name
/// selects the console.
pub async fn notifier_from_config(
    cfg: &LoggerConfig,
    job: &str,
) -> anyhow::Result<Box<dyn Notifier>> {
    if !cfg.name.eq_ignore_ascii_case("mattermost") {
        return Ok(Box::new(ConsoleNotifier));
    }

    let option = |key: &str| cfg.options.get(key).and_then(|v| v.as_str());
    let Some(url) = option("url") else {
        bail!("the mattermost logger needs an instance `url` option");
    };
    let Some(token) = option("token") else {
        bail!("the mattermost logger needs a `token` option");
    };
    let Some(channel_id) = option("channelId") else {
        bail!("the mattermost logger needs a `channelId` option");
    };

    let notifier = MattermostNotifier::connect(url, token, channel_id, job).await?;
    Ok(Box::new(notifier))
}
