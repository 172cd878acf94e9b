/// Secret layout for one project under a Vault mount.
///
/// ```text
/// <root>/<namespace>/config      namespace settings
/// <root>/<namespace>/whitelist   namespace whitelist
/// <root>/<project>/config        project policy
/// <root>/<project>/whitelist     project whitelist
/// <root>/<project>/scratch/...   confirmation secrets
/// ```
///
/// The namespace is the project path without its last segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultPaths {
    pub root: String,
    pub project_path: String,
}

impl VaultPaths {
    pub fn new(root: &str, project_path: &str) -> Self {
        Self {
            root: root.trim_matches('/').to_string(),
            project_path: project_path.trim_matches('/').to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        self.project_path
            .rsplit_once('/')
            .map(|(ns, _)| ns)
            .unwrap_or(&self.project_path)
    }

    pub fn namespace_config(&self) -> String {
        format!("{}/{}/config", self.root, self.namespace())
    }

    pub fn namespace_whitelist(&self) -> String {
        format!("{}/{}/whitelist", self.root, self.namespace())
    }

    pub fn project_config(&self) -> String {
        format!("{}/{}/config", self.root, self.project_path)
    }

    pub fn project_whitelist(&self) -> String {
        format!("{}/{}/whitelist", self.root, self.project_path)
    }

    pub fn scratch_mount(&self) -> String {
        format!("{}/{}/scratch", self.root, self.project_path)
    }

    /// Browser link to the project whitelist.
    pub fn whitelist_ui(&self, external_addr: &str) -> String {
        format!(
            "{}/ui/vault/secrets/{}/show/{}/whitelist",
            external_addr.trim_end_matches('/'),
            self.root,
            self.project_path
        )
    }

    /// Browser link to the scratch folder; the user email is appended per challenge.
    pub fn scratch_ui(&self, external_addr: &str) -> String {
        format!(
            "{}/ui/vault/secrets/{}/list/{}/scratch",
            external_addr.trim_end_matches('/'),
            self.root,
            self.project_path
        )
    }
}

/// Login role used when none is configured: the project path with `/` replaced by `-`.
pub fn default_role(project_path: &str) -> String {
    project_path.replace('/', "-")
}
