use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ExistsError;

pub const METADATA_FILE_NAME: &str = "maven-metadata.xml";
pub const LOCAL_METADATA_FILE_NAME: &str = "maven-metadata-local.xml";

/// Narrow view of a Maven repository: existence checks and fetching small resources (checksums,
///  metadata). Paths are relative to the repository base, e.g. "org/acme/widget/1.0/widget-1.0.jar".
///
/// An accessor owns its connection. Callers release it with [RepositoryAccessor::disconnect] once
///  they are done, on every exit path.
#[async_trait]
pub trait RepositoryAccessor: Send + Sync {
    /// Base location for diagnostics, without trailing '/'
    fn base(&self) -> &str;

    /// The name of the metadata file that lists a snapshot's published versions
    fn metadata_file_name(&self) -> &'static str {
        METADATA_FILE_NAME
    }

    async fn exists(&self, path: &str) -> Result<bool, ExistsError>;

    /// Fails with [ExistsError::NotFound] if there is no resource at `path`
    async fn fetch_bytes(&self, path: &str) -> Result<Bytes, ExistsError>;

    /// Content is decoded as ISO-8859-1, so this never fails on encoding
    async fn fetch_text(&self, path: &str) -> Result<String, ExistsError> {
        let bytes = self.fetch_bytes(path).await?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        format!("{}/{}", self.base(), strip_leading_slash(path))
    }
}

pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
