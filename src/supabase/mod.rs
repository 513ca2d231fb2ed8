// src/supabase/mod.rs

//! Data-access client for the hosted table and object store.
//!
//! Screens never talk HTTP themselves. They ask [`DataAccess`] for a
//! [`DataClient`] and build table queries or storage calls through it. When
//! the service credentials are missing the handle is
//! [`DataAccess::Unconfigured`] and every screen falls back to its static
//! setup view.

pub mod error;
pub mod memory;
pub mod query;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::config::Config;

pub use error::DataError;
pub use query::{Direction, Order, Query, TableQuery};

/// Table operations of the remote service.
///
/// Rows travel as JSON objects; typing happens in [`TableQuery`].
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, DataError>;

    /// Inserts one or many rows and returns them as stored.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, DataError>;

    /// Patches every row matching `query` and returns the updated rows.
    async fn update(&self, table: &str, query: &Query, patch: Value)
    -> Result<Vec<Value>, DataError>;

    async fn delete(&self, table: &str, query: &Query) -> Result<(), DataError>;
}

/// Object storage operations of the remote service.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), DataError>;

    /// Public URL of an object. Pure string construction, no request.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), DataError>;
}

/// Handle for issuing table queries and storage calls.
#[derive(Clone)]
pub struct DataClient {
    tables: Arc<dyn TableApi>,
    storage: Arc<dyn ObjectStorage>,
}

impl DataClient {
    pub fn new(tables: Arc<dyn TableApi>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { tables, storage }
    }

    /// Builds a client for a Supabase project.
    pub fn supabase(url: &str, anon_key: &str) -> Result<Self, DataError> {
        let http = reqwest::Client::builder().build()?;
        let tables = rest::PostgrestClient::new(http.clone(), url, anon_key)?;
        let storage = storage::StorageClient::new(http, url, anon_key)?;
        Ok(Self::new(Arc::new(tables), Arc::new(storage)))
    }

    /// Starts a query against `table`.
    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery::new(self.tables.clone(), table)
    }

    /// Selects a storage bucket.
    pub fn storage<'a>(&'a self, bucket: &'a str) -> Bucket<'a> {
        Bucket {
            storage: self.storage.as_ref(),
            name: bucket,
        }
    }
}

/// A storage bucket bound to a client.
pub struct Bucket<'a> {
    storage: &'a dyn ObjectStorage,
    name: &'a str,
}

impl Bucket<'_> {
    pub async fn upload(&self, path: &str, body: Bytes, content_type: &str) -> Result<(), DataError> {
        self.storage.upload(self.name, path, body, content_type).await
    }

    pub fn public_url(&self, path: &str) -> String {
        self.storage.public_url(self.name, path)
    }

    pub async fn remove(&self, paths: &[String]) -> Result<(), DataError> {
        self.storage.remove(self.name, paths).await
    }
}

/// Process-wide data access: either a working client or a marker saying the
/// credentials were never provided.
#[derive(Clone)]
pub enum DataAccess {
    Configured(DataClient),
    Unconfigured,
}

impl DataAccess {
    /// Builds the handle from configuration. Missing or placeholder
    /// credentials yield [`DataAccess::Unconfigured`]; a malformed URL is an
    /// error.
    pub fn from_config(config: &Config) -> Result<Self, DataError> {
        match config.credentials() {
            Some((url, key)) => Ok(DataAccess::Configured(DataClient::supabase(url, key)?)),
            None => Ok(DataAccess::Unconfigured),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, DataAccess::Configured(_))
    }

    pub fn client(&self) -> Option<&DataClient> {
        match self {
            DataAccess::Configured(client) => Some(client),
            DataAccess::Unconfigured => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_config_is_unconfigured() {
        let config = Config {
            supabase_url: Some(crate::config::PLACEHOLDER_URL.to_string()),
            supabase_anon_key: Some(crate::config::PLACEHOLDER_KEY.to_string()),
            ..Config::default()
        };
        let access = DataAccess::from_config(&config).unwrap();
        assert!(!access.is_configured());
        assert!(access.client().is_none());
    }

    #[test]
    fn real_config_builds_a_client() {
        let config = Config {
            supabase_url: Some("https://abc.supabase.co".to_string()),
            supabase_anon_key: Some("anon".to_string()),
            ..Config::default()
        };
        let access = DataAccess::from_config(&config).unwrap();
        assert!(access.is_configured());
    }

    #[test]
    fn malformed_url_is_rejected() {
        let config = Config {
            supabase_url: Some("not a url".to_string()),
            supabase_anon_key: Some("anon".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            DataAccess::from_config(&config),
            Err(DataError::InvalidConfig(_))
        ));
    }
}
