// src/supabase/storage.rs

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, header::CONTENT_TYPE};
use url::Url;

use super::{
    DataError, ObjectStorage,
    rest::{check, project_base},
};

/// Storage client for `<project>/storage/v1`.
pub struct StorageClient {
    http: Client,
    storage_url: Url,
    api_key: String,
}

impl StorageClient {
    pub fn new(http: Client, project_url: &str, api_key: &str) -> Result<Self, DataError> {
        let storage_url = project_base(project_url)?.join("storage/v1/")?;
        Ok(Self {
            http,
            storage_url,
            api_key: api_key.to_string(),
        })
    }

    fn object_url(&self, bucket: &str, path: &str) -> Result<Url, DataError> {
        Ok(self.storage_url.join(&format!("object/{bucket}/{path}"))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl ObjectStorage for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), DataError> {
        let request = self
            .http
            .post(self.object_url(bucket, path)?)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(body);
        check(self.authorize(request).send().await?).await?;
        tracing::debug!(bucket, path, "Uploaded object");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}object/public/{bucket}/{path}", self.storage_url)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), DataError> {
        let url = self.storage_url.join(&format!("object/{bucket}"))?;
        let request = self
            .http
            .delete(url)
            .json(&serde_json::json!({ "prefixes": paths }));
        check(self.authorize(request).send().await?).await?;
        Ok(())
    }
}

/// Recovers the object path from a public URL: everything after the first
/// `/<bucket>/` segment. `None` when the URL does not point into `bucket`.
pub fn object_path_from_public_url(url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/{bucket}/");
    let (_, path) = url.split_once(&marker)?;
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

/// Builds a collision-free object name that keeps the upload's extension.
///
/// Only ASCII alphanumeric extensions are kept, so the name is always a
/// single clean URL path segment.
pub fn unique_object_name(original_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("{id}.{ext}")
        }
        _ => id.to_string(),
    }
}
