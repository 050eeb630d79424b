use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ExistsError;
use crate::repo::repository_accessor::{strip_leading_slash, RepositoryAccessor};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RepositoryCall {
    Exists(String),
    Fetch(String),
    Disconnect,
}

/// in-memory repository, neither optimized nor particularly robust - for testing purposes.
///  Records every call so tests can check which round trips were made. Clones share their data.
#[derive(Clone, Default)]
pub struct TransientRepository {
    resources: Arc<Mutex<HashMap<String, Bytes>>>,
    calls: Arc<Mutex<Vec<RepositoryCall>>>,
    failing: Arc<Mutex<bool>>,
}
impl TransientRepository {
    pub fn new() -> TransientRepository {
        Default::default()
    }

    pub fn insert(&self, path: &str, data: impl Into<Bytes>) {
        self.resources.lock()
            .unwrap()
            .insert(strip_leading_slash(path).to_string(), data.into());
    }

    /// Every subsequent call fails with a transport error
    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RepositoryCall) -> Result<(), ExistsError> {
        let path = match &call {
            RepositoryCall::Exists(p) | RepositoryCall::Fetch(p) => Some(self.location(p)),
            RepositoryCall::Disconnect => None,
        };
        self.calls.lock().unwrap().push(call);

        match path {
            Some(path) if *self.failing.lock().unwrap() => Err(ExistsError::transport(path, anyhow::anyhow!("connection refused"))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RepositoryAccessor for TransientRepository {
    fn base(&self) -> &str {
        "mem://repository"
    }

    async fn exists(&self, path: &str) -> Result<bool, ExistsError> {
        let path = strip_leading_slash(path);
        self.record(RepositoryCall::Exists(path.to_string()))?;
        Ok(self.resources.lock().unwrap().contains_key(path))
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Bytes, ExistsError> {
        let path = strip_leading_slash(path);
        self.record(RepositoryCall::Fetch(path.to_string()))?;
        self.resources.lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ExistsError::NotFound(self.location(path)))
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        self.record(RepositoryCall::Disconnect)?;
        Ok(())
    }
}
