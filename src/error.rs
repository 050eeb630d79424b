use std::path::PathBuf;

use thiserror::Error;

/// Failures of a verification run.
///
/// Everything except [ExistsError::PolicyViolation] is structural and always fatal. Policy
///  violations are only raised when the corresponding `failIf...` flag is set; otherwise the
///  verifier turns them into a plain boolean outcome.
#[derive(Error, Debug)]
pub enum ExistsError {
    #[error("project coordinate must be in format groupId:artifactId[:packaging]:version - was {0:?}")]
    MalformedCoordinate(String),

    #[error("{0} is not set")]
    RepositoryBaseUnset(&'static str),

    #[error("the project artifact {} has not been created", .0.display())]
    BuildArtifactMissing(PathBuf),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("failed to access {path}")]
    Transport {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    PolicyViolation(#[from] PolicyViolation),
}

impl ExistsError {
    pub fn transport(path: impl Into<String>, source: impl Into<anyhow::Error>) -> ExistsError {
        ExistsError::Transport {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ExistsError::NotFound(_))
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum PolicyViolation {
    #[error("Artifact already exists in repository: {coordinates} ({location})")]
    ArtifactExists {
        coordinates: String,
        location: String,
    },

    #[error("Artifact does not exist in repository: {coordinates} ({location})")]
    ArtifactMissing {
        coordinates: String,
        location: String,
    },

    #[error("Artifact checksum differs from repository: {coordinates} ({location}) - build checksum {build}, repository checksum {repository}")]
    ChecksumMismatch {
        coordinates: String,
        location: String,
        build: String,
        repository: String,
    },
}
