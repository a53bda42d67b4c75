//! Backend HTTP source
//!
//! Reads the first page of each list endpoint. No retry, no explicit timeout:
//! a failed fetch is reported to the store, which decides what to do.

use super::payload::{CompanyPayload, Envelope, NewsPayload, VcPayload};
use super::RecordSource;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Default backend root
pub const DEFAULT_BASE_URL: &str = "http://localhost:1000";

const COMPANIES_PAGE_SIZE: usize = 200;
const VCS_PAGE_SIZE: usize = 100;
const NEWS_PAGE_SIZE: usize = 50;

/// [`RecordSource`] backed by the backend list endpoints.
pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a source that reuses an existing client
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list_url(&self, path: &str, page_size: usize) -> String {
        format!("{}/{}?page=1&page_size={}", self.base_url, path, page_size)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str, page_size: usize) -> Result<Vec<T>> {
        let url = self.list_url(path, page_size);
        tracing::debug!(%url, "fetching collection");

        let resp = check_response(self.http.get(&url).send().await?, &url)?;
        let envelope: Envelope<T> = resp.json().await?;

        tracing::debug!(%url, count = envelope.results.len(), "collection fetched");
        Ok(envelope.results)
    }
}

/// Turn a non-success status into [`Error::Api`]
fn check_response(resp: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    if !resp.status().is_success() {
        return Err(Error::Api {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp)
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn fetch_companies(&self) -> Result<Vec<CompanyPayload>> {
        self.fetch_list("companies", COMPANIES_PAGE_SIZE).await
    }

    async fn fetch_vcs(&self) -> Result<Vec<VcPayload>> {
        self.fetch_list("vcs", VCS_PAGE_SIZE).await
    }

    async fn fetch_news(&self) -> Result<Vec<NewsPayload>> {
        self.fetch_list("news", NEWS_PAGE_SIZE).await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_list_url_trims_trailing_slash() {
        let source = HttpSource::new("http://localhost:1000/");
        assert_eq!(source.base_url(), "http://localhost:1000");
        assert_eq!(
            source.list_url("companies", 200),
            "http://localhost:1000/companies?page=1&page_size=200"
        );
    }

    #[tokio::test]
    async fn test_fetch_companies_reads_results() {
        let app = Router::new().route(
            "/companies",
            get(|| async {
                Json(serde_json::json!({
                    "total": 2,
                    "page": 1,
                    "page_size": 200,
                    "results": [
                        {"id": 1, "name": "OpenAI", "industry_segment": "ai-natives"},
                        {"id": 2, "name": "Uber"}
                    ]
                }))
            }),
        );
        let source = HttpSource::new(serve(app).await);

        let companies = source.fetch_companies().await.unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].industry.as_deref(), Some("ai-natives"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let app = Router::new().route(
            "/vcs",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let source = HttpSource::new(serve(app).await);

        let err = source.fetch_vcs().await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_missing_route_fails_independently() {
        let app = Router::new().route(
            "/news",
            get(|| async { Json(serde_json::json!({"results": []})) }),
        );
        let source = HttpSource::new(serve(app).await);

        assert!(source.fetch_news().await.unwrap().is_empty());
        assert!(matches!(
            source.fetch_companies().await.unwrap_err(),
            Error::Api { status: 404, .. }
        ));
    }
}
