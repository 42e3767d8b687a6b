use std::fmt::Display;

use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{Result, StoreError};

/// PostgREST answers this code when a single row was requested but zero or
/// several matched.
pub const NO_SINGLE_ROW: &str = "PGRST116";

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Filter, ordering and paging parameters in PostgREST's query-string syntax.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("eq.{value}"))
    }

    pub fn lt(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("lt.{value}"))
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.push("order", format!("{column}.desc"))
    }

    pub fn limit(self, n: usize) -> Self {
        self.push("limit", n.to_string())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn push(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}

/// Conflict handling for `POST` with `on_conflict`.
#[derive(Debug, Clone, Copy)]
pub enum Resolution {
    MergeDuplicates,
    IgnoreDuplicates,
}

impl Resolution {
    fn prefer(self) -> &'static str {
        match self {
            Self::MergeDuplicates => "resolution=merge-duplicates,return=minimal",
            Self::IgnoreDuplicates => "resolution=ignore-duplicates,return=minimal",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Thin row-oriented client for a PostgREST endpoint (`{base}/rest/v1`).
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(http: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>> {
        let resp = self
            .request(Method::GET, table)
            .query(&[("select", "*")])
            .query(query.params())
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Exactly one matching row, or `None` when zero or several match.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Option<T>> {
        let resp = self
            .request(Method::GET, table)
            .header(header::ACCEPT, SINGLE_OBJECT)
            .query(&[("select", "*")])
            .query(query.params())
            .send()
            .await?;
        match check(resp).await {
            Ok(resp) => Ok(Some(resp.json().await?)),
            Err(e) if e.code() == Some(NO_SINGLE_ROW) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn insert<B: Serialize + ?Sized>(&self, table: &str, row: &B) -> Result<()> {
        let resp = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Inserts one row and returns it as the store saved it.
    pub async fn insert_returning<B, T>(&self, table: &'static str, row: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let mut rows: Vec<T> = check(resp).await?.json().await?;
        if rows.is_empty() {
            return Err(StoreError::EmptyInsert(table));
        }
        Ok(rows.swap_remove(0))
    }

    pub async fn upsert<B: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &B,
        on_conflict: &str,
        resolution: Resolution,
    ) -> Result<()> {
        let resp = self
            .request(Method::POST, table)
            .header("Prefer", resolution.prefer())
            .query(&[("on_conflict", on_conflict)])
            .json(row)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &Query,
        patch: &B,
    ) -> Result<()> {
        let resp = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=minimal")
            .query(query.params())
            .json(patch)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn delete(&self, table: &str, query: &Query) -> Result<()> {
        let resp = self
            .request(Method::DELETE, table)
            .header("Prefer", "return=minimal")
            .query(query.params())
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

/// Passes 2xx responses through and turns anything else into `StoreError::Api`.
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).ok();
    let code = body.as_ref().and_then(|b| b.code.clone());
    let message = body
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        });

    debug!("Store returned {}: {}", status, message);
    Err(StoreError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}
