// src/supabase/rest.rs

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use super::{DataError, Direction, Query, TableApi};

/// PostgREST client for `<project>/rest/v1`.
pub struct PostgrestClient {
    http: Client,
    rest_url: Url,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(http: Client, project_url: &str, api_key: &str) -> Result<Self, DataError> {
        let rest_url = project_base(project_url)?.join("rest/v1/")?;
        Ok(Self {
            http,
            rest_url,
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, DataError> {
        Ok(self.rest_url.join(table)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl TableApi for PostgrestClient {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, DataError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query_params(query));

        let request = self.http.get(self.table_url(table)?).query(&params);
        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, DataError> {
        let request = self
            .http
            .post(self.table_url(table)?)
            .header("Prefer", "return=representation")
            .json(&rows);
        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, DataError> {
        let request = self
            .http
            .patch(self.table_url(table)?)
            .query(&filter_params(query))
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, table: &str, query: &Query) -> Result<(), DataError> {
        let request = self
            .http
            .delete(self.table_url(table)?)
            .query(&filter_params(query));
        check(self.authorize(request).send().await?).await?;
        Ok(())
    }
}

/// Normalizes the project URL so relative joins land under it.
pub(super) fn project_base(project_url: &str) -> Result<Url, DataError> {
    let trimmed = project_url.trim().trim_end_matches('/');
    Ok(Url::parse(&format!("{trimmed}/"))?)
}

/// Equality filters in PostgREST syntax: `column=eq.value`.
fn filter_params(query: &Query) -> Vec<(String, String)> {
    query
        .filters
        .iter()
        .map(|(column, value)| (column.clone(), format!("eq.{}", plain_value(value))))
        .collect()
}

/// Filters plus the `order` clause.
fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = filter_params(query);
    if let Some(order) = &query.order {
        let direction = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }
    params
}

fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turns a non-2xx response into [`DataError::Api`] carrying the body.
pub(super) async fn check(response: Response) -> Result<Response, DataError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(DataError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::supabase::Order;

    #[test]
    fn encodes_filters_and_order() {
        let query = Query {
            filters: vec![("post_id".to_string(), json!(7))],
            order: Some(Order {
                column: "created_at".to_string(),
                direction: Direction::Descending,
            }),
        };
        assert_eq!(
            query_params(&query),
            vec![
                ("post_id".to_string(), "eq.7".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn string_filters_are_not_quoted() {
        let query = Query {
            filters: vec![("tag".to_string(), json!("Prayer Request"))],
            order: None,
        };
        assert_eq!(
            filter_params(&query),
            vec![("tag".to_string(), "eq.Prayer Request".to_string())]
        );
    }

    #[test]
    fn table_urls_live_under_rest_v1() {
        let client = PostgrestClient::new(Client::new(), "https://abc.supabase.co/", "k").unwrap();
        assert_eq!(
            client.table_url("posts").unwrap().as_str(),
            "https://abc.supabase.co/rest/v1/posts"
        );
    }
}
