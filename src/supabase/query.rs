// src/supabase/query.rs

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::{DataError, TableApi};

/// Sort direction for an `order` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Filters and ordering shared by select, update and delete.
///
/// Only equality filters exist; every filter must hold for a row to match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order: Option<Order>,
}

impl Query {
    /// True when `row` satisfies every equality filter.
    pub fn matches(&self, row: &serde_json::Map<String, Value>) -> bool {
        self.filters
            .iter()
            .all(|(column, expected)| row.get(column) == Some(expected))
    }
}

/// Builder returned by [`DataClient::from`](super::DataClient::from).
///
/// Mirrors the shape of a PostgREST call: pick a table, add filters and an
/// order, then finish with one of the terminal operations.
pub struct TableQuery {
    tables: Arc<dyn TableApi>,
    table: String,
    query: Query,
}

impl TableQuery {
    pub(super) fn new(tables: Arc<dyn TableApi>, table: &str) -> Self {
        Self {
            tables,
            table: table.to_string(),
            query: Query::default(),
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.query.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.query.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub async fn fetch_all<T: DeserializeOwned>(self) -> Result<Vec<T>, DataError> {
        let rows = self.tables.select(&self.table, &self.query).await?;
        decode_rows(rows)
    }

    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, DataError> {
        Ok(self.fetch_all().await?.into_iter().next())
    }

    /// Inserts `rows` and returns what the service stored, defaults included.
    pub async fn insert<R, T>(self, rows: &[R]) -> Result<Vec<T>, DataError>
    where
        R: Serialize,
        T: DeserializeOwned,
    {
        let rows = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let stored = self.tables.insert(&self.table, rows).await?;
        decode_rows(stored)
    }

    /// Applies `patch` to every matching row and returns the updated rows.
    pub async fn update<P, T>(self, patch: &P) -> Result<Vec<T>, DataError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let patch = serde_json::to_value(patch)?;
        let updated = self.tables.update(&self.table, &self.query, patch).await?;
        decode_rows(updated)
    }

    pub async fn delete(self) -> Result<(), DataError> {
        self.tables.delete(&self.table, &self.query).await
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, DataError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(DataError::from))
        .collect()
}
