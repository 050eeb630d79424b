use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use futures::StreamExt;
use futures_core::Stream;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, trace};

/// Size of the chunks files are read in - a file is never held in memory as a whole
pub const BUFFER_SIZE: usize = 0x10000;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Sha1,
    Md5,
}
impl ChecksumAlgorithm {
    /// The suffix of checksum sidecar files in a Maven repository, without the '.'
    pub fn extension(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Md5 => "md5",
        }
    }

    fn hasher(&self) -> Box<dyn ChecksumHasher> {
        match self {
            ChecksumAlgorithm::Sha1 => Box::new(Sha1ChecksumHasher { hasher: Default::default() }),
            ChecksumAlgorithm::Md5 => Box::new(Md5ChecksumHasher { context: md5::Context::new() }),
        }
    }
}

trait ChecksumHasher: Send {
    fn add_data(&mut self, data: &[u8]);
    fn finish(self: Box<Self>) -> Vec<u8>;
}

struct Sha1ChecksumHasher {
    hasher: Sha1,
}
impl ChecksumHasher for Sha1ChecksumHasher {
    fn add_data(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.hasher.finalize().to_vec()
    }
}

struct Md5ChecksumHasher {
    context: md5::Context,
}
impl ChecksumHasher for Md5ChecksumHasher {
    fn add_data(&mut self, data: &[u8]) {
        self.context.consume(data);
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        let hash: [u8; 16] = self.context.compute().into();
        hash.to_vec()
    }
}

/// Calculates digests as lowercase hex strings. Every call starts from a fresh hasher, so an
///  instance can be reused for any number of files.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckSum {
    algorithm: ChecksumAlgorithm,
}
impl CheckSum {
    pub fn new(algorithm: ChecksumAlgorithm) -> CheckSum {
        CheckSum { algorithm }
    }

    pub fn digest_bytes(&self, data: &[u8]) -> String {
        let mut hasher = self.algorithm.hasher();
        hasher.add_data(data);
        hex::encode(hasher.finish())
    }

    pub async fn digest_stream<E: Into<anyhow::Error>>(&self, data: impl Stream<Item = Result<Bytes, E>>) -> anyhow::Result<String> {
        let mut data = Box::pin(data);
        let mut hasher = self.algorithm.hasher();

        loop {
            match data.next().await {
                Some(bytes) => {
                    let bytes = bytes.map_err(Into::<anyhow::Error>::into)?;
                    hasher.add_data(&bytes);
                }
                None =>
                    break,
            }
        }

        Ok(hex::encode(hasher.finish()))
    }

    pub async fn digest_reader(&self, reader: impl AsyncRead) -> anyhow::Result<String> {
        self.digest_stream(ReaderStream::with_capacity(reader, BUFFER_SIZE)).await
    }

    pub async fn digest_file(&self, path: &Path) -> anyhow::Result<String> {
        debug!("calculating {:?} checksum for {}", self.algorithm, path.display());
        let file = File::open(path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        self.digest_reader(file)
            .await
            .with_context(|| format!("failed to read {}", path.display()))
    }

    /// Writes the digest of `path` to its sidecar `<path>.<algorithm>`, returning the sidecar's path
    pub async fn write_checksum(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let checksum = self.digest_file(path).await?;
        let sidecar_path = sidecar_path(path, self.algorithm);
        trace!("writing checksum {} to {}", checksum, sidecar_path.display());

        let mut file = File::create(&sidecar_path)
            .await
            .with_context(|| format!("failed to create {}", sidecar_path.display()))?;
        file.write_all(format!("{}\n", checksum).as_bytes()).await?;
        file.flush().await?;
        Ok(sidecar_path)
    }
}

pub fn sidecar_path(path: &Path, algorithm: ChecksumAlgorithm) -> PathBuf {
    let mut file_name: OsString = path.as_os_str().to_owned();
    file_name.push(".");
    file_name.push(algorithm.extension());
    PathBuf::from(file_name)
}

/// Extracts the digest from a checksum sidecar's content. Some repositories append the file name
///  after the hex string, so only the first token counts.
pub fn parse_checksum_sidecar(content: &str) -> Option<&str> {
    content.split_whitespace().next()
}

pub fn checksums_equal(build: &str, repository: &str) -> bool {
    build.eq_ignore_ascii_case(repository)
}
