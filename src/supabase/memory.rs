// src/supabase/memory.rs

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::{DataError, Direction, ObjectStorage, Query, TableApi};

/// Operation that can be forced to fail, per table or bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Select(String),
    Insert(String),
    Update(String),
    Delete(String),
    Upload(String),
    Remove(String),
}

type Row = Map<String, Value>;

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Row>>,
    next_id: HashMap<String, i64>,
    defaults: HashMap<String, Row>,
    objects: HashMap<(String, String), (Bytes, String)>,
    failures: HashSet<FailPoint>,
}

/// In-process stand-in for the hosted service.
///
/// Assigns `id` and `created_at` on insert the way the hosted tables do,
/// applies per-table column defaults, and serves public URLs under
/// `base_url` using the same layout as the real storage API.
pub struct MemoryBackend {
    base_url: String,
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Backend preloaded with the forum's column defaults.
    pub fn forum() -> Self {
        let backend = Self::new("http://storage.local");
        backend.set_default("posts", "upvotes", Value::from(0));
        backend
    }

    pub fn set_default(&self, table: &str, column: &str, value: Value) {
        self.lock()
            .defaults
            .entry(table.to_string())
            .or_default()
            .insert(column.to_string(), value);
    }

    pub fn fail(&self, point: FailPoint) {
        self.lock().failures.insert(point);
    }

    pub fn heal(&self, point: &FailPoint) {
        self.lock().failures.remove(point);
    }

    /// Snapshot of every row in `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock()
            .tables
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Stored object body and content type.
    pub fn object(&self, bucket: &str, path: &str) -> Option<(Bytes, String)> {
        self.lock()
            .objects
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    pub fn object_count(&self, bucket: &str) -> usize {
        self.lock()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn guard(&self, point: FailPoint) -> Result<(), DataError> {
        if self.failures.contains(&point) {
            return Err(DataError::Unavailable(format!("injected failure: {point:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl TableApi for MemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, DataError> {
        let inner = self.lock();
        inner.guard(FailPoint::Select(table.to_string()))?;

        let mut rows: Vec<&Row> = inner
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column))
                    .then_with(|| compare(a.get("id"), b.get("id")));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        Ok(rows.into_iter().cloned().map(Value::Object).collect())
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, DataError> {
        let mut inner = self.lock();
        inner.guard(FailPoint::Insert(table.to_string()))?;

        let defaults = inner.defaults.get(table).cloned().unwrap_or_default();
        let mut stored = Vec::with_capacity(rows.len());

        for row in rows {
            let Value::Object(mut row) = row else {
                return Err(DataError::Api {
                    status: 400,
                    message: "rows must be JSON objects".to_string(),
                });
            };

            let next_id = inner.next_id.entry(table.to_string()).or_insert(0);
            *next_id += 1;
            row.entry("id").or_insert(Value::from(*next_id));
            row.entry("created_at").or_insert_with(|| {
                Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
            });
            for (column, value) in &defaults {
                match row.get(column) {
                    None | Some(Value::Null) => {
                        row.insert(column.clone(), value.clone());
                    }
                    Some(_) => {}
                }
            }

            stored.push(row);
        }

        inner
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());

        Ok(stored.into_iter().map(Value::Object).collect())
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, DataError> {
        let mut inner = self.lock();
        inner.guard(FailPoint::Update(table.to_string()))?;

        let Value::Object(patch) = patch else {
            return Err(DataError::Api {
                status: 400,
                message: "patch must be a JSON object".to_string(),
            });
        };

        let mut updated = Vec::new();
        if let Some(rows) = inner.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| query.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                updated.push(Value::Object(row.clone()));
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, query: &Query) -> Result<(), DataError> {
        let mut inner = self.lock();
        inner.guard(FailPoint::Delete(table.to_string()))?;

        if let Some(rows) = inner.tables.get_mut(table) {
            rows.retain(|row| !query.matches(row));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MemoryBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), DataError> {
        let mut inner = self.lock();
        inner.guard(FailPoint::Upload(bucket.to_string()))?;

        let key = (bucket.to_string(), path.to_string());
        if inner.objects.contains_key(&key) {
            return Err(DataError::Api {
                status: 409,
                message: "The resource already exists".to_string(),
            });
        }
        inner.objects.insert(key, (body, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), DataError> {
        let mut inner = self.lock();
        inner.guard(FailPoint::Remove(bucket.to_string()))?;

        for path in paths {
            inner.objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }
}

/// Orders JSON scalars: nulls first, then numbers, then strings.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::supabase::Order;

    fn ordered(column: &str, direction: Direction) -> Query {
        Query {
            filters: Vec::new(),
            order: Some(Order {
                column: column.to_string(),
                direction,
            }),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_timestamps_and_defaults() {
        let backend = MemoryBackend::forum();
        let stored = backend
            .insert("posts", vec![json!({ "title": "a" }), json!({ "title": "b", "upvotes": 5 })])
            .await
            .unwrap();

        assert_eq!(stored[0]["id"], json!(1));
        assert_eq!(stored[1]["id"], json!(2));
        assert_eq!(stored[0]["upvotes"], json!(0));
        assert_eq!(stored[1]["upvotes"], json!(5));
        assert!(stored[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn select_filters_and_orders() {
        let backend = MemoryBackend::forum();
        backend
            .insert(
                "comments",
                vec![
                    json!({ "post_id": 1, "content": "first" }),
                    json!({ "post_id": 2, "content": "other" }),
                    json!({ "post_id": 1, "content": "second" }),
                ],
            )
            .await
            .unwrap();

        let mut query = ordered("id", Direction::Descending);
        query.filters.push(("post_id".to_string(), json!(1)));
        let rows = backend.select("comments", &query).await.unwrap();

        let contents: Vec<_> = rows.iter().map(|r| r["content"].clone()).collect();
        assert_eq!(contents, vec![json!("second"), json!("first")]);
    }

    #[tokio::test]
    async fn update_returns_patched_rows_only() {
        let backend = MemoryBackend::forum();
        backend
            .insert("posts", vec![json!({ "title": "a" }), json!({ "title": "b" })])
            .await
            .unwrap();

        let query = Query {
            filters: vec![("id".to_string(), json!(2))],
            order: None,
        };
        let updated = backend
            .update("posts", &query, json!({ "upvotes": 9 }))
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["title"], json!("b"));
        assert_eq!(updated[0]["upvotes"], json!(9));
        assert_eq!(backend.rows("posts")[0]["upvotes"], json!(0));
    }

    #[tokio::test]
    async fn fail_points_can_be_healed() {
        let backend = MemoryBackend::forum();
        let point = FailPoint::Select("posts".to_string());
        backend.fail(point.clone());
        assert!(backend.select("posts", &Query::default()).await.is_err());

        backend.heal(&point);
        assert!(backend.select("posts", &Query::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn objects_round_trip_through_public_urls() {
        let backend = MemoryBackend::forum();
        backend
            .upload("post-images", "a.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        assert_eq!(
            backend.public_url("post-images", "a.png"),
            "http://storage.local/storage/v1/object/public/post-images/a.png"
        );
        assert!(
            backend
                .upload("post-images", "a.png", Bytes::new(), "image/png")
                .await
                .is_err()
        );

        backend
            .remove("post-images", &["a.png".to_string()])
            .await
            .unwrap();
        assert_eq!(backend.object_count("post-images"), 0);
    }
}
