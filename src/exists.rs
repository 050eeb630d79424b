use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::config::{ExistsConfig, Mode};
use crate::error::{ExistsError, PolicyViolation};
use crate::maven::coordinates::MavenArtifactRef;
use crate::maven::snapshot::resolve_snapshot_path;
use crate::repo::Repository;
use crate::repo::repository_accessor::RepositoryAccessor;
use crate::util::checksum::{checksums_equal, parse_checksum_sidecar, ChecksumAlgorithm, CheckSum};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// snapshot versions are not checked - no property is set
    Skipped,
    NotFound,
    FoundNoChecksum,
    /// the repository has no checksum for the artifact, so there is nothing to compare - no
    ///  property is set
    ChecksumUnavailable,
    ChecksumMatch,
    ChecksumMismatch {
        build: String,
        repository: String,
    },
}
impl Outcome {
    /// `None` means no result at all, which is different from `Some(false)`
    pub fn result(&self) -> Option<bool> {
        match self {
            Outcome::Skipped | Outcome::ChecksumUnavailable => None,
            Outcome::NotFound | Outcome::ChecksumMismatch { .. } => Some(false),
            Outcome::FoundNoChecksum | Outcome::ChecksumMatch => Some(true),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Verification {
    pub outcome: Outcome,
    /// the repository path that was checked
    pub location: Option<String>,
    /// publication time of the resolved snapshot
    pub snapshot_time: Option<String>,
}
impl Verification {
    fn skipped(artifact_ref: &MavenArtifactRef) -> Verification {
        info!("skipping -SNAPSHOT {}", artifact_ref);
        Verification {
            outcome: Outcome::Skipped,
            location: None,
            snapshot_time: None,
        }
    }

    /// The output properties to set, in order. Empty if the check did not apply.
    pub fn properties(&self, property: &str, snapshot_time_property: Option<&str>) -> Vec<(String, String)> {
        let Some(result) = self.outcome.result() else {
            return vec![];
        };

        let mut properties = vec![];
        if let (Some(name), Some(time)) = (snapshot_time_property, &self.snapshot_time) {
            properties.push((name.to_string(), time.clone()));
        }
        properties.push((property.to_string(), result.to_string()));
        properties
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VerifyPolicy {
    pub skip_if_snapshot: bool,
    pub compare_checksum: bool,
    pub checksum_algorithm: ChecksumAlgorithm,
    pub fail_if_exists: bool,
    pub fail_if_not_exists: bool,
    pub fail_if_checksum_mismatch: bool,
}
impl Default for VerifyPolicy {
    fn default() -> Self {
        VerifyPolicy {
            skip_if_snapshot: true,
            compare_checksum: false,
            checksum_algorithm: ChecksumAlgorithm::Sha1,
            fail_if_exists: false,
            fail_if_not_exists: false,
            fail_if_checksum_mismatch: true,
        }
    }
}
impl From<&ExistsConfig> for VerifyPolicy {
    fn from(config: &ExistsConfig) -> Self {
        VerifyPolicy {
            skip_if_snapshot: config.skip_if_snapshot,
            compare_checksum: config.compare_checksum,
            checksum_algorithm: config.checksum_algorithm,
            fail_if_exists: config.fail_if_exists,
            fail_if_not_exists: config.fail_if_not_exists,
            fail_if_checksum_mismatch: config.fail_if_checksum_mismatch,
        }
    }
}
impl VerifyPolicy {
    pub fn skips(&self, artifact_ref: &MavenArtifactRef) -> bool {
        self.skip_if_snapshot && artifact_ref.is_snapshot()
    }
}

/// The files a build produced, to compare against the repository's checksums
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub artifact: PathBuf,
    pub pom: PathBuf,
}
impl BuildOutput {
    /// POMs are compared against the project's pom file, everything else against the artifact
    pub fn file_for(&self, artifact_ref: &MavenArtifactRef) -> &Path {
        if artifact_ref.artifact_type == "pom" {
            &self.pom
        }
        else {
            &self.artifact
        }
    }
}

/// Decides whether an artifact identical to the just built one is already in a repository.
pub struct ExistenceVerifier<A: RepositoryAccessor> {
    accessor: A,
    policy: VerifyPolicy,
}

impl <A: RepositoryAccessor> ExistenceVerifier<A> {
    pub fn new(accessor: A, policy: VerifyPolicy) -> ExistenceVerifier<A> {
        ExistenceVerifier { accessor, policy }
    }

    /// Verifies and then disconnects the accessor, whether verification succeeded or not
    pub async fn run(self, artifact_ref: &MavenArtifactRef, build: &BuildOutput) -> anyhow::Result<Verification> {
        let result = self.verify(artifact_ref, build).await;
        if let Err(e) = self.accessor.disconnect().await {
            debug!("error disconnecting from {} - ignored: {}", self.accessor.base(), e);
        }
        result
    }

    pub async fn verify(&self, artifact_ref: &MavenArtifactRef, build: &BuildOutput) -> anyhow::Result<Verification> {
        if self.policy.skips(artifact_ref) {
            return Ok(Verification::skipped(artifact_ref));
        }

        let (location, snapshot_time) = if artifact_ref.is_snapshot() {
            match resolve_snapshot_path(artifact_ref, &self.accessor).await {
                Some(resolved) => (resolved.location, resolved.updated),
                None => {
                    let metadata_path = artifact_ref.metadata_location(self.accessor.metadata_file_name());
                    return self.not_found(artifact_ref, metadata_path);
                }
            }
        }
        else {
            (artifact_ref.artifact_location(), None)
        };

        let uri = self.accessor.location(&location);
        info!("checking for artifact at {}", uri);
        let exists = self.accessor.exists(&location)
            .await
            .with_context(|| format!("failed to check for {}", artifact_ref))?;
        if !exists {
            return self.not_found(artifact_ref, location);
        }

        info!("{} exists", artifact_ref);
        if self.policy.fail_if_exists {
            return Err(ExistsError::from(PolicyViolation::ArtifactExists {
                coordinates: artifact_ref.to_string(),
                location: uri,
            }).into());
        }

        let outcome = if self.policy.compare_checksum {
            self.compare_checksum(artifact_ref, build, &location).await?
        }
        else {
            Outcome::FoundNoChecksum
        };

        Ok(Verification {
            outcome,
            location: Some(location),
            snapshot_time,
        })
    }

    fn not_found(&self, artifact_ref: &MavenArtifactRef, location: String) -> anyhow::Result<Verification> {
        if self.policy.fail_if_not_exists {
            return Err(ExistsError::from(PolicyViolation::ArtifactMissing {
                coordinates: artifact_ref.to_string(),
                location: self.accessor.location(&location),
            }).into());
        }

        info!("{} does not exist", artifact_ref);
        Ok(Verification {
            outcome: Outcome::NotFound,
            location: Some(location),
            snapshot_time: None,
        })
    }

    async fn compare_checksum(&self, artifact_ref: &MavenArtifactRef, build: &BuildOutput, location: &str) -> anyhow::Result<Outcome> {
        let build_file = build.file_for(artifact_ref);
        if !tokio::fs::metadata(build_file).await.map(|m| m.is_file()).unwrap_or(false) {
            return Err(ExistsError::BuildArtifactMissing(build_file.to_path_buf()))
                .with_context(|| format!("cannot compare {} with {}", artifact_ref, self.accessor.location(location)));
        }

        let check_sum = CheckSum::new(self.policy.checksum_algorithm);
        let build_checksum = check_sum.digest_file(build_file).await?;

        let sidecar = format!("{}.{}", location, self.policy.checksum_algorithm.extension());
        let content = match self.accessor.fetch_text(&sidecar).await {
            Ok(content) => content,
            Err(e) if e.is_not_found() => String::new(),
            Err(e) => return Err(e).with_context(|| format!("failed to fetch checksum of {}", artifact_ref)),
        };
        let Some(repository_checksum) = parse_checksum_sidecar(&content).map(|s| s.to_string()) else {
            info!("no checksum for {} at {} - not comparing", artifact_ref, self.accessor.location(&sidecar));
            return Ok(Outcome::ChecksumUnavailable);
        };

        if checksums_equal(&build_checksum, &repository_checksum) {
            info!("{} has the same checksum as the build: {}", artifact_ref, build_checksum);
            return Ok(Outcome::ChecksumMatch);
        }
        debug!("build checksum ({}) != repository checksum ({})", build_checksum, repository_checksum);

        if self.policy.fail_if_checksum_mismatch {
            return Err(ExistsError::from(PolicyViolation::ChecksumMismatch {
                coordinates: artifact_ref.to_string(),
                location: self.accessor.location(location),
                build: build_checksum,
                repository: repository_checksum,
            }).into());
        }

        info!("{} differs from the build", artifact_ref);
        Ok(Outcome::ChecksumMismatch {
            build: build_checksum,
            repository: repository_checksum,
        })
    }
}

/// A complete verification run as configured: parse the coordinate, pick and connect the
///  repository, verify, disconnect.
pub async fn verify_artifact(config: &ExistsConfig) -> anyhow::Result<Verification> {
    let artifact_ref = MavenArtifactRef::parse(
        &config.project,
        config.packaging.as_deref(),
        config.classifier.as_deref(),
        Some(&config.extensions),
    )?;

    let policy = VerifyPolicy::from(config);
    if policy.skips(&artifact_ref) {
        return Ok(Verification::skipped(&artifact_ref));
    }

    let base = config.repository_base(artifact_ref.is_snapshot())
        .with_context(|| format!("cannot verify {}", artifact_ref))?;
    let repository = Repository::connect(&base, config.mode == Mode::Local, config.credentials.as_ref(), &config.headers)
        .with_context(|| format!("cannot verify {} against {}", artifact_ref, base))?;

    let build = BuildOutput {
        artifact: config.artifact.clone()
            .unwrap_or_else(|| PathBuf::from("target").join(artifact_ref.artifact_file_name())),
        pom: config.pom.clone(),
    };

    ExistenceVerifier::new(repository, policy)
        .run(&artifact_ref, &build)
        .await
}
