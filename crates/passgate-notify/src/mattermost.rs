use anyhow::Context;
use async_trait::async_trait;
use passgate_mfa::Notifier;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct NewPost<'a> {
    channel_id: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    root_id: &'a str,
}

#[derive(Deserialize)]
struct Post {
    id: String,
}

/// Posts messages to a Mattermost channel, threaded under one post per job run.
#[derive(Clone, Debug)]
pub struct MattermostNotifier {
    http: Client,
    url: String,
    token: String,
    channel_id: String,
    root_id: String,
}

impl MattermostNotifier {
    /// Open the thread for `job` by creating its root post.
    pub async fn connect(url: &str, token: &str, channel_id: &str, job: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build HTTP client")?;

        let mut notifier = Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            channel_id: channel_id.to_string(),
            root_id: String::new(),
        };

        let root = notifier
            .post(&format!("## {job} CI/CD Run"))
            .await
            .context("create mattermost thread")?;
        notifier.root_id = root.id;
        Ok(notifier)
    }

    async fn post(&self, message: &str) -> anyhow::Result<Post> {
        let body = NewPost {
            channel_id: &self.channel_id,
            message,
            root_id: &self.root_id,
        };

        let post = self
            .http
            .post(format!("{}/api/v4/posts", self.url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("send mattermost post")?
            .error_for_status()
            .context("send mattermost post")?
            .json::<Post>()
            .await
            .context("decode mattermost post")?;

        debug!(post = %post.id, "mattermost post created");
        Ok(post)
    }
}

#[async_trait]
impl Notifier for MattermostNotifier {
    async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        self.post(text).await.map(|_| ())
    }
}
