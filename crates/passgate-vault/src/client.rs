use anyhow::{Context, bail};
use passgate_domain::whitelist::Whitelist;
use passgate_settings::{NamespaceConfig, ProjectConfig, parse_namespace_config, parse_project_config};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

const TOKEN_HEADER: &str = "X-Vault-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How to obtain a Vault token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultAuth {
    Token(String),
    Jwt {
        login_path: String,
        role: String,
        jwt: String,
    },
}

impl VaultAuth {
    /// Prefer a CI-issued JWT over a static token. Having neither is a configuration error.
    pub fn from_parts(
        token: Option<String>,
        jwt: Option<String>,
        login_path: &str,
        role: &str,
    ) -> anyhow::Result<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        match (non_empty(jwt), non_empty(token)) {
            (Some(jwt), _) => Ok(VaultAuth::Jwt {
                login_path: login_path.to_string(),
                role: role.to_string(),
                jwt,
            }),
            (None, Some(token)) => Ok(VaultAuth::Token(token)),
            (None, None) => bail!("either a Vault token or a JWT is required"),
        }
    }
}

#[derive(Deserialize)]
struct SecretResponse {
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: LoginAuth,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
}

/// Thin client over the Vault logical API (`/v1/<path>`).
#[derive(Clone, Debug)]
pub struct VaultClient {
    http: Client,
    addr: String,
    token: String,
}

impl VaultClient {
    pub fn with_token(addr: &str, token: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            addr: addr.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub async fn connect(addr: &str, auth: &VaultAuth) -> anyhow::Result<Self> {
        match auth {
            VaultAuth::Token(token) => Self::with_token(addr, token),
            VaultAuth::Jwt {
                login_path,
                role,
                jwt,
            } => Self::login_jwt(addr, login_path, role, jwt).await,
        }
    }

    /// Exchange a JWT for a Vault token at `login_path` (e.g. `auth/jwt/login`).
    pub async fn login_jwt(
        addr: &str,
        login_path: &str,
        role: &str,
        jwt: &str,
    ) -> anyhow::Result<Self> {
        let mut client = Self::with_token(addr, "")?;
        let resp = client
            .http
            .post(client.url(login_path))
            .json(&json!({ "jwt": jwt, "role": role }))
            .send()
            .await
            .context("unable to authenticate to vault")?
            .error_for_status()
            .context("unable to authenticate to vault")?;

        let login: LoginResponse = resp.json().await.context("decode vault login response")?;
        client.token = login.auth.client_token;
        info!(role, "authenticated to vault");
        Ok(client)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.addr, path.trim_start_matches('/'))
    }

    /// The `data` object stored at `path`, or `None` when nothing is stored there.
    pub async fn read_json(&self, path: &str) -> anyhow::Result<Option<Value>> {
        let resp = self
            .http
            .get(self.url(path))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .with_context(|| format!("read {path}"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(path, "secret not found");
            return Ok(None);
        }

        let body: SecretResponse = resp
            .error_for_status()
            .with_context(|| format!("read {path}"))?
            .json()
            .await
            .with_context(|| format!("decode {path}"))?;
        Ok(body.data.filter(|d| !d.is_null()))
    }

    pub async fn write_json(&self, path: &str, data: &Value) -> anyhow::Result<()> {
        self.http
            .post(self.url(path))
            .header(TOKEN_HEADER, &self.token)
            .json(data)
            .send()
            .await
            .with_context(|| format!("write {path}"))?
            .error_for_status()
            .with_context(|| format!("write {path}"))?;
        Ok(())
    }

    pub async fn delete_path(&self, path: &str) -> anyhow::Result<()> {
        self.http
            .delete(self.url(path))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .with_context(|| format!("delete {path}"))?
            .error_for_status()
            .with_context(|| format!("delete {path}"))?;
        Ok(())
    }

    /// Project policy at `path`; a missing secret yields the built-in policy.
    pub async fn read_project_config(&self, path: &str) -> anyhow::Result<ProjectConfig> {
        let raw = self
            .read_raw(path)
            .await
            .with_context(|| format!("unable to access project config at {path}"))?;
        parse_project_config(&raw)
    }

    /// Namespace settings at `path`; a missing secret yields the defaults.
    pub async fn read_namespace_config(&self, path: &str) -> anyhow::Result<NamespaceConfig> {
        let raw = self
            .read_raw(path)
            .await
            .with_context(|| format!("unable to access namespace config at {path}"))?;
        parse_namespace_config(&raw)
    }

    /// Namespace whitelist followed by project whitelist. Both must exist.
    pub async fn read_whitelists(
        &self,
        namespace_path: &str,
        project_path: &str,
    ) -> anyhow::Result<Whitelist> {
        let mut whitelist = self
            .read_whitelist(namespace_path)
            .await
            .with_context(|| format!("unable to read namespace whitelist at {namespace_path}"))?;
        let project = self
            .read_whitelist(project_path)
            .await
            .with_context(|| format!("unable to read project whitelist at {project_path}"))?;

        whitelist.merge(project);
        Ok(whitelist)
    }

    async fn read_whitelist(&self, path: &str) -> anyhow::Result<Whitelist> {
        let Some(data) = self.read_json(path).await? else {
            bail!("no whitelist stored at {path}");
        };
        serde_json::from_value(data).context("decode whitelist")
    }

    async fn read_raw(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        match self.read_json(path).await? {
            Some(data) => serde_json::to_vec(&data).context("re-encode config"),
            None => Ok(Vec::new()),
        }
    }
}
