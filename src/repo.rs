pub mod repository_accessor;
pub mod local_repository;
pub mod http_repository;
#[cfg(test)]
pub mod transient_repository;

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::ExistsError;
use crate::repo::http_repository::{Credentials, HttpRepository};
use crate::repo::local_repository::LocalRepository;
use crate::repo::repository_accessor::RepositoryAccessor;

/// The repository kinds, selected by the scheme of the base location
pub enum Repository {
    Local(LocalRepository),
    Http(HttpRepository),
}

impl Repository {
    /// Plain paths and file: URLs are local, http(s): URLs (optionally with the WebDAV 'dav:'
    ///  prefix) are remote. `is_local_repository` marks the local Maven repository, which has its
    ///  own snapshot metadata file name.
    pub fn connect(
        base: &str,
        is_local_repository: bool,
        credentials: Option<&Credentials>,
        headers: &HashMap<String, String>,
    ) -> Result<Repository, ExistsError> {
        let url = base.strip_prefix("dav:").unwrap_or(base);

        if url.starts_with("http://") || url.starts_with("https://") {
            debug!("connecting to remote repository {}", url);
            let repository = HttpRepository::new(url, credentials, headers)
                .map_err(|e| ExistsError::transport(base, e))?;
            return Ok(Repository::Http(repository));
        }

        if let Some(path) = url.strip_prefix("file://").or_else(|| url.strip_prefix("file:")) {
            debug!("opening file repository {}", path);
            return Ok(Repository::Local(LocalRepository::new(PathBuf::from(path), is_local_repository)));
        }

        match scheme(url) {
            None => {
                debug!("opening file repository {}", url);
                Ok(Repository::Local(LocalRepository::new(PathBuf::from(url), is_local_repository)))
            }
            Some(scheme) => Err(ExistsError::transport(base, anyhow::anyhow!("unsupported repository protocol {:?}", scheme))),
        }
    }
}

/// URL scheme, if any. Single letters are Windows drive letters rather than schemes.
fn scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once(':')?;
    let is_scheme = scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.');
    if is_scheme { Some(scheme) } else { None }
}

#[async_trait]
impl RepositoryAccessor for Repository {
    fn base(&self) -> &str {
        match self {
            Repository::Local(r) => r.base(),
            Repository::Http(r) => r.base(),
        }
    }

    fn metadata_file_name(&self) -> &'static str {
        match self {
            Repository::Local(r) => r.metadata_file_name(),
            Repository::Http(r) => r.metadata_file_name(),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, ExistsError> {
        match self {
            Repository::Local(r) => r.exists(path).await,
            Repository::Http(r) => r.exists(path).await,
        }
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Bytes, ExistsError> {
        match self {
            Repository::Local(r) => r.fetch_bytes(path).await,
            Repository::Http(r) => r.fetch_bytes(path).await,
        }
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        match self {
            Repository::Local(r) => r.disconnect().await,
            Repository::Http(r) => r.disconnect().await,
        }
    }
}

#[cfg(test)]
mod test {
    use rstest::*;
    use super::*;

    #[rstest]
    #[case::plain_path("/home/user/.m2/repository", false, "/home/user/.m2/repository")]
    #[case::file_url("file:///srv/repo/", false, "/srv/repo")]
    #[case::file_without_slashes("file:/srv/repo", false, "/srv/repo")]
    #[case::windows_path("C:/Users/me/.m2/repository", false, "C:/Users/me/.m2/repository")]
    #[case::http("http://repo.example.com/releases/", true, "http://repo.example.com/releases")]
    #[case::https("https://repo.example.com/releases", true, "https://repo.example.com/releases")]
    #[case::dav("dav:https://repo.example.com/releases", true, "https://repo.example.com/releases")]
    fn test_connect(#[case] base: &str, #[case] is_http: bool, #[case] expected_base: &str) {
        let repository = Repository::connect(base, false, None, &HashMap::new()).unwrap();
        assert_eq!(matches!(repository, Repository::Http(_)), is_http);
        assert_eq!(repository.base(), expected_base);
    }

    #[rstest]
    #[case::scp("scp://host/repo")]
    #[case::ftp("ftp://host/repo")]
    fn test_connect_unsupported(#[case] base: &str) {
        let actual = Repository::connect(base, false, None, &HashMap::new());
        assert!(matches!(actual, Err(ExistsError::Transport { path, .. }) if path == base));
    }

    #[test]
    fn test_local_repository_metadata_file_name() {
        let repository = Repository::connect("/tmp/repo", true, None, &HashMap::new()).unwrap();
        assert_eq!(repository.metadata_file_name(), "maven-metadata-local.xml");
    }
}
