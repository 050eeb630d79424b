use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::{metadata, read};
use tracing::trace;

use crate::error::ExistsError;
use crate::repo::repository_accessor::{strip_leading_slash, RepositoryAccessor, LOCAL_METADATA_FILE_NAME, METADATA_FILE_NAME};

/// A repository in the local file system - either the local Maven repository (which keeps its
///  snapshot metadata in maven-metadata-local.xml) or a file: distribution repository.
pub struct LocalRepository {
    root: PathBuf,
    base: String,
    metadata_file_name: &'static str,
}
impl LocalRepository {
    pub fn new(root: PathBuf, is_local_repository: bool) -> LocalRepository {
        let base = root.to_string_lossy()
            .trim_end_matches('/')
            .to_string();

        LocalRepository {
            root,
            base,
            metadata_file_name: if is_local_repository { LOCAL_METADATA_FILE_NAME } else { METADATA_FILE_NAME },
        }
    }

    fn file_path(&self, path: &str) -> PathBuf {
        let mut result = self.root.clone();
        result.push(strip_leading_slash(path));
        result
    }
}

#[async_trait]
impl RepositoryAccessor for LocalRepository {
    fn base(&self) -> &str {
        &self.base
    }

    fn metadata_file_name(&self) -> &'static str {
        self.metadata_file_name
    }

    async fn exists(&self, path: &str) -> Result<bool, ExistsError> {
        let file_path = self.file_path(path);
        trace!("checking for file {}", file_path.display());

        match metadata(&file_path).await {
            Ok(m) => Ok(m.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ExistsError::transport(self.location(path), e)),
        }
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Bytes, ExistsError> {
        let file_path = self.file_path(path);
        trace!("reading file {}", file_path.display());

        match read(&file_path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ExistsError::NotFound(self.location(path))),
            Err(e) => Err(ExistsError::transport(self.location(path), e)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    async fn repo_with_file(path: &str, content: &[u8]) -> (tempfile::TempDir, LocalRepository) {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join(path);
        tokio::fs::create_dir_all(file_path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&file_path, content).await.unwrap();
        let repo = LocalRepository::new(dir.path().to_path_buf(), true);
        (dir, repo)
    }

    #[tokio::test]
    async fn test_exists() {
        let (_dir, repo) = repo_with_file("g/a/1.0/a-1.0.jar", b"jar").await;
        assert!(repo.exists("g/a/1.0/a-1.0.jar").await.unwrap());
        assert!(repo.exists("/g/a/1.0/a-1.0.jar").await.unwrap());
        assert!(!repo.exists("g/a/1.0/a-1.0.pom").await.unwrap());
    }

    #[tokio::test]
    async fn test_directory_does_not_exist_as_artifact() {
        let (_dir, repo) = repo_with_file("g/a/1.0/a-1.0.jar", b"jar").await;
        assert!(!repo.exists("g/a/1.0").await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch() {
        let (_dir, repo) = repo_with_file("g/a/1.0/a-1.0.jar.sha1", b"abcdef\n").await;
        assert_eq!(repo.fetch_text("g/a/1.0/a-1.0.jar.sha1").await.unwrap(), "abcdef\n");
        assert_eq!(repo.fetch_bytes("g/a/1.0/a-1.0.jar.sha1").await.unwrap(), Bytes::from_static(b"abcdef\n"));
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let (_dir, repo) = repo_with_file("g/a/1.0/a-1.0.jar", b"jar").await;
        let actual = repo.fetch_text("g/a/1.0/a-1.0.jar.sha1").await;
        assert!(matches!(actual, Err(ExistsError::NotFound(p)) if p.ends_with("/g/a/1.0/a-1.0.jar.sha1")));
    }

    #[test]
    fn test_metadata_file_name() {
        assert_eq!(LocalRepository::new(PathBuf::from("/tmp/repo"), true).metadata_file_name(), "maven-metadata-local.xml");
        assert_eq!(LocalRepository::new(PathBuf::from("/tmp/repo/"), false).metadata_file_name(), "maven-metadata.xml");
        assert_eq!(LocalRepository::new(PathBuf::from("/tmp/repo/"), false).base(), "/tmp/repo");
    }
}
