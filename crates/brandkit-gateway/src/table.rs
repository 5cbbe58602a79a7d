//! Row access over the REST table API.
//!
//! Queries follow the PostgREST conventions: filters are query parameters of
//! the form `column=eq.value`, ordering is `order=column.desc`, and a single
//! object is requested with the `application/vnd.pgrst.object+json` media
//! type.

use crate::gateway::Gateway;
use crate::request::RemoteRequest;
use brandkit_core::ClientError;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// A query against one table, built with chained filters.
#[must_use = "a query does nothing until fetched or executed"]
pub struct TableQuery<'a> {
    gateway: &'a Gateway,
    table: String,
    params: Vec<(String, String)>,
    single: bool,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(gateway: &'a Gateway, table: &str) -> Self {
        Self {
            gateway,
            table: table.to_string(),
            params: Vec::new(),
            single: false,
        }
    }

    fn set_param(&mut self, key: &str, value: String) {
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_string(), value));
    }

    /// Columns to return, in PostgREST select syntax (embeds allowed).
    pub fn select(mut self, columns: &str) -> Self {
        let compact: String = columns.split_whitespace().collect();
        self.set_param("select", compact);
        self
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.set_param("order", format!("{column}.{direction}"));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.set_param("limit", count.to_string());
        self
    }

    /// Expect exactly one row. Zero or several rows are a rejection.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Fetch the matching rows.
    pub async fn fetch<T: DeserializeOwned>(mut self) -> Result<Vec<T>, ClientError> {
        if self.single {
            return self.fetch_one().await.map(|row| vec![row]);
        }
        if !self.params.iter().any(|(k, _)| k == "select") {
            self.set_param("select", "*".to_string());
        }
        let request = self.build(Method::GET).await?;
        self.gateway
            .send(request)
            .await?
            .error_for_status()?
            .decode()
    }

    /// Fetch exactly one row.
    pub async fn fetch_one<T: DeserializeOwned>(mut self) -> Result<T, ClientError> {
        self.single = true;
        if !self.params.iter().any(|(k, _)| k == "select") {
            self.set_param("select", "*".to_string());
        }
        let request = self.build(Method::GET).await?;
        self.gateway
            .send(request)
            .await?
            .error_for_status()?
            .decode()
    }

    /// Insert one row.
    pub fn insert<B: Serialize + ?Sized>(self, row: &B) -> Mutation<'a> {
        Mutation::new(self, Method::POST, Some(row))
    }

    /// Apply a partial update to every matching row.
    pub fn update<B: Serialize + ?Sized>(self, patch: &B) -> Mutation<'a> {
        Mutation::new(self, Method::PATCH, Some(patch))
    }

    /// Delete every matching row.
    pub fn delete(self) -> Mutation<'a> {
        Mutation::new::<()>(self, Method::DELETE, None)
    }

    async fn build(&self, method: Method) -> Result<RemoteRequest, ClientError> {
        let mut request = self
            .gateway
            .request(method, &format!("rest/v1/{}", self.table))
            .await?;
        for (key, value) in &self.params {
            request = request.query(key, value);
        }
        if self.single {
            request = request.header("Accept", SINGLE_OBJECT);
        }
        Ok(request)
    }
}

/// A pending write. Run it with [`execute`](Self::execute) or
/// [`returning`](Self::returning).
#[must_use = "a mutation does nothing until executed"]
pub struct Mutation<'a> {
    query: TableQuery<'a>,
    method: Method,
    body: Result<Option<serde_json::Value>, ClientError>,
}

impl<'a> Mutation<'a> {
    fn new<B: Serialize + ?Sized>(query: TableQuery<'a>, method: Method, body: Option<&B>) -> Self {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ClientError::Unknown(format!("failed to encode row: {e}")));
        Self {
            query,
            method,
            body,
        }
    }

    /// Restrict the write to rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.query = self.query.eq(column, value);
        self
    }

    /// Run the write without asking for the affected rows.
    pub async fn execute(self) -> Result<(), ClientError> {
        let request = self.build("return=minimal").await?;
        self.query
            .gateway
            .send(request)
            .await?
            .error_for_status()
            .map(|_| ())
    }

    /// Run the write and return the single affected row.
    pub async fn returning<T: DeserializeOwned>(mut self) -> Result<T, ClientError> {
        self.query.single = true;
        if !self.query.params.iter().any(|(k, _)| k == "select") {
            self.query.set_param("select", "*".to_string());
        }
        let request = self.build("return=representation").await?;
        self.query
            .gateway
            .send(request)
            .await?
            .error_for_status()?
            .decode()
    }

    async fn build(&self, prefer: &str) -> Result<RemoteRequest, ClientError> {
        let body = self.body.clone()?;
        let mut request = self
            .query
            .build(self.method.clone())
            .await?
            .header("Prefer", prefer);
        if let Some(body) = body {
            request = request.json(&body)?;
        }
        Ok(request)
    }
}
