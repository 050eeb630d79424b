use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::ExistsError;
use crate::repo::http_repository::Credentials;
use crate::util::checksum::ChecksumAlgorithm;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// check the distribution repositories before deploying
    #[default]
    Remote,
    /// check the local repository before installing
    Local,
}

/// Everything a verification run is configured with. Deserialized from JSON with camelCase keys;
///  every field has a default.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExistsConfig {
    pub mode: Mode,

    /// groupId:artifactId[:type]:version
    pub project: String,
    pub packaging: Option<String>,
    pub classifier: Option<String>,
    /// file extensions for types unknown to Maven's artifact handlers
    pub extensions: HashMap<String, String>,

    pub repository: Option<String>,
    pub snapshot_repository: Option<String>,
    pub local_repository: Option<PathBuf>,
    pub credentials: Option<Credentials>,
    pub headers: HashMap<String, String>,

    pub skip_if_snapshot: bool,
    pub compare_checksum: bool,
    pub checksum_algorithm: ChecksumAlgorithm,
    pub fail_if_exists: bool,
    pub fail_if_not_exists: bool,
    pub fail_if_checksum_mismatch: bool,

    pub property: Option<String>,
    pub snapshot_time_property: Option<String>,

    /// the just built artifact
    pub artifact: Option<PathBuf>,
    pub pom: PathBuf,
}

impl Default for ExistsConfig {
    fn default() -> Self {
        ExistsConfig {
            mode: Mode::Remote,
            project: String::new(),
            packaging: None,
            classifier: None,
            extensions: HashMap::new(),
            repository: None,
            snapshot_repository: None,
            local_repository: None,
            credentials: None,
            headers: HashMap::new(),
            skip_if_snapshot: true,
            compare_checksum: false,
            checksum_algorithm: ChecksumAlgorithm::Sha1,
            fail_if_exists: false,
            fail_if_not_exists: false,
            fail_if_checksum_mismatch: true,
            property: None,
            snapshot_time_property: None,
            artifact: None,
            pom: PathBuf::from("pom.xml"),
        }
    }
}

impl ExistsConfig {
    pub fn parse(json: &str) -> anyhow::Result<ExistsConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: &Path) -> anyhow::Result<ExistsConfig> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::parse(&json)
            .with_context(|| format!("invalid configuration {}", path.display()))
    }

    pub fn property_name(&self) -> &str {
        match (&self.property, self.mode) {
            (Some(p), _) => p,
            (None, Mode::Remote) => "maven.deploy.skip",
            (None, Mode::Local) => "maven.install.skip",
        }
    }

    /// The base location to check: the local repository in local mode, otherwise the snapshot or
    ///  release distribution repository depending on the version.
    pub fn repository_base(&self, is_snapshot: bool) -> Result<String, ExistsError> {
        let base = match self.mode {
            Mode::Local => match &self.local_repository {
                Some(path) => path.to_string_lossy().to_string(),
                None => {
                    let home = std::env::var("HOME")
                        .map_err(|_| ExistsError::RepositoryBaseUnset("localRepository"))?;
                    format!("{}/.m2/repository", home)
                }
            },
            Mode::Remote if is_snapshot => self.snapshot_repository.clone()
                .ok_or(ExistsError::RepositoryBaseUnset("distributionManagement snapshotRepository"))?,
            Mode::Remote => self.repository.clone()
                .ok_or(ExistsError::RepositoryBaseUnset("distributionManagement repository"))?,
        };

        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return Err(ExistsError::RepositoryBaseUnset("repository base"));
        }
        Ok(base.to_string())
    }
}
