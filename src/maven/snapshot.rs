use tracing::{debug, warn};

use crate::maven::coordinates::MavenArtifactRef;
use crate::maven::metadata_xml::Metadata;
use crate::repo::repository_accessor::RepositoryAccessor;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResolvedSnapshot {
    /// Repository path of the currently published snapshot file
    pub location: String,
    /// When the snapshot was published, as listed in the metadata
    pub updated: Option<String>,
}

/// Finds the file a '-SNAPSHOT' artifact is currently published as, using the repository's
///  metadata for the snapshot version.
///
/// Metadata that is missing, unreadable or lists no matching file means there is no published
///  snapshot - that includes transport failures while fetching it.
pub async fn resolve_snapshot_path<A: RepositoryAccessor + ?Sized>(artifact_ref: &MavenArtifactRef, accessor: &A) -> Option<ResolvedSnapshot> {
    let metadata_path = artifact_ref.metadata_location(accessor.metadata_file_name());
    debug!("resolving snapshot {} through {}", artifact_ref, accessor.location(&metadata_path));

    let xml = match accessor.fetch_text(&metadata_path).await {
        Ok(xml) => xml,
        Err(e) if e.is_not_found() => {
            debug!("no snapshot metadata for {}", artifact_ref);
            return None;
        }
        Err(e) => {
            warn!("treating snapshot {} as not published: {}", artifact_ref, e);
            return None;
        }
    };

    let metadata = match Metadata::parse(&xml) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("treating snapshot {} as not published - unreadable metadata {}: {}", artifact_ref, metadata_path, e);
            return None;
        }
    };

    let Some(snapshot_version) = metadata.find_snapshot_version(&artifact_ref.file_extension, artifact_ref.classifier.as_option()) else {
        debug!("metadata {} lists no {} file", metadata_path, artifact_ref.file_extension);
        return None;
    };

    debug!("snapshot {} resolved to version {}", artifact_ref, snapshot_version.value);
    Some(ResolvedSnapshot {
        location: artifact_ref.snapshot_location(&snapshot_version.value),
        updated: snapshot_version.updated.clone(),
    })
}
