use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::query::QueryEngine;
use crate::record::RecordKind;
use crate::server::AppState;
use crate::source::Envelope;

/// Default and maximum page sizes of the list endpoints
const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 200;

const DEFAULT_TOP_N: usize = 5;

type ApiResult = Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)>;

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub kind: Option<String>,
}

#[derive(Deserialize)]
pub struct TopParams {
    pub field: Option<String>,
    pub n: Option<usize>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { error: message.into() }))
}

fn to_json<T: Serialize>(value: &T) -> ApiResult {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// Slice one page out of `records`. Pages are 1-based; the page size is
/// clamped to `1..=MAX_PAGE_SIZE`.
fn paginate<'a, T>(records: &'a [T], params: &PageParams) -> Envelope<&'a T> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let start = (page - 1).saturating_mul(page_size);

    Envelope {
        page,
        page_size,
        total: records.len(),
        results: records.iter().skip(start).take(page_size).collect(),
    }
}

fn not_found(kind: RecordKind, id: u64) -> (StatusCode, Json<ErrorResponse>) {
    error(StatusCode::NOT_FOUND, format!("No {} record with id {}", kind, id))
}

pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult {
    Ok(Json(serde_json::json!({
        "status": "ok",
        "origin": state.origin,
        "companies": state.store.companies().len(),
        "vcs": state.store.vcs().len(),
        "news": state.store.news().len(),
    })))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> ApiResult {
    to_json(&QueryEngine::new(&state.store).dashboard_stats())
}

pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> ApiResult {
    to_json(&paginate(state.store.companies(), &params))
}

pub async fn list_vcs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> ApiResult {
    to_json(&paginate(state.store.vcs(), &params))
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> ApiResult {
    to_json(&paginate(state.store.news(), &params))
}

pub async fn get_company(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> ApiResult {
    let company = QueryEngine::new(&state.store)
        .company(id)
        .ok_or_else(|| not_found(RecordKind::Companies, id))?;
    to_json(company)
}

pub async fn get_vc(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> ApiResult {
    let vc = QueryEngine::new(&state.store)
        .vc(id)
        .ok_or_else(|| not_found(RecordKind::Vcs, id))?;
    to_json(vc)
}

pub async fn get_article(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> ApiResult {
    let article = QueryEngine::new(&state.store)
        .article(id)
        .ok_or_else(|| not_found(RecordKind::News, id))?;
    to_json(article)
}

/// Articles referencing the company. The reference is not enforced, so an
/// unknown company id simply yields an empty list.
pub async fn get_company_news(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> ApiResult {
    to_json(&QueryEngine::new(&state.store).news_for_company(id))
}

pub async fn get_company_investors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    let engine = QueryEngine::new(&state.store);
    let company = engine
        .company(id)
        .ok_or_else(|| not_found(RecordKind::Companies, id))?;
    to_json(&engine.investors_of(company))
}

/// Free-text search. Without `kind` all three collections are searched.
/// Non-blank queries are recorded in the recent-search list.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult {
    let engine = QueryEngine::new(&state.store);

    let results = match params.kind.as_deref() {
        Some(kind) => {
            let kind: RecordKind = kind
                .parse()
                .map_err(|e: crate::Error| error(StatusCode::BAD_REQUEST, e.to_string()))?;
            serde_json::json!({ kind.as_str(): engine.search(kind, &params.q) })
        }
        None => serde_json::to_value(engine.search_all(&params.q))
            .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    };

    state
        .prefs
        .lock()
        .await
        .record_search(&params.q)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(serde_json::json!({
        "query": params.q,
        "results": results,
    })))
}

/// Field ranked by `/top/{kind}` when none is given
pub fn default_rank_field(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Companies => "valuation",
        RecordKind::Vcs => "final_score",
        RecordKind::News => "published_at",
    }
}

pub async fn top(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<TopParams>,
) -> ApiResult {
    let kind: RecordKind = kind
        .parse()
        .map_err(|e: crate::Error| error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let field = params
        .field
        .as_deref()
        .unwrap_or_else(|| default_rank_field(kind));
    if !QueryEngine::knows_field(kind, field) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("Unknown field '{}' for {}", field, kind),
        ));
    }

    let n = params.n.unwrap_or(DEFAULT_TOP_N);
    to_json(&QueryEngine::new(&state.store).top(kind, field, n))
}

pub async fn recent_searches(State(state): State<Arc<AppState>>) -> ApiResult {
    let searches = state
        .prefs
        .lock()
        .await
        .recent_searches()
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    to_json(&searches)
}

pub async fn clear_recent_searches(State(state): State<Arc<AppState>>) -> ApiResult {
    state
        .prefs
        .lock()
        .await
        .clear_recent_searches()
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(serde_json::json!({ "cleared": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::router;
    use crate::source::{HttpSource, Skin};
    use crate::storage::PrefsStore;
    use crate::store::{LoadOrigin, RecordStore};

    async fn serve_fallback() -> String {
        serve(RecordStore::fallback(Skin::DigitalNatives).unwrap()).await
    }

    async fn serve(store: RecordStore) -> String {
        let state = Arc::new(AppState::new(
            store,
            LoadOrigin::Fallback,
            PrefsStore::open_in_memory().unwrap(),
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state, None)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn get_json(url: &str) -> (u16, serde_json::Value) {
        let resp = reqwest::get(url).await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    #[test]
    fn test_paginate() {
        let data: Vec<u32> = (1..=25).collect();

        let first = paginate(&data, &PageParams { page: None, page_size: None });
        assert_eq!(first.page, 1);
        assert_eq!(first.total, 25);
        assert_eq!(first.results.len(), DEFAULT_PAGE_SIZE);

        let last = paginate(&data, &PageParams { page: Some(3), page_size: Some(10) });
        assert_eq!(last.results, vec![&21, &22, &23, &24, &25]);

        let beyond = paginate(&data, &PageParams { page: Some(9), page_size: Some(0) });
        assert_eq!(beyond.page_size, 1);
        assert!(beyond.results.is_empty());
    }

    #[tokio::test]
    async fn test_served_store_loads_as_live_source() {
        let base = serve_fallback().await;

        let loaded = RecordStore::load(&HttpSource::new(base), Skin::Biotech)
            .await
            .unwrap();
        assert_eq!(loaded.origin, LoadOrigin::Live);
        assert_eq!(loaded.store, RecordStore::fallback(Skin::DigitalNatives).unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id_and_not_found() {
        let base = serve_fallback().await;

        let (status, body) = get_json(&format!("{}/companies/1", base)).await;
        assert_eq!(status, 200);
        assert_eq!(body["name"], "OpenAI");

        let (status, body) = get_json(&format!("{}/vcs/999", base)).await;
        assert_eq!(status, 404);
        assert!(body["error"].as_str().unwrap().contains("999"));
    }

    #[tokio::test]
    async fn test_search_records_recent_searches() {
        let base = serve_fallback().await;

        let (status, body) = get_json(&format!("{}/search?q=openai", base)).await;
        assert_eq!(status, 200);
        assert_eq!(body["results"]["companies"].as_array().unwrap().len(), 1);

        get_json(&format!("{}/search?q=fintech&kind=companies", base)).await;
        let (_, recent) = get_json(&format!("{}/recent-searches", base)).await;
        assert_eq!(recent, serde_json::json!(["fintech", "openai"]));

        let (status, _) = get_json(&format!("{}/search?q=x&kind=people", base)).await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_top_endpoint() {
        let base = serve_fallback().await;

        let (status, body) = get_json(&format!("{}/top/companies?n=2", base)).await;
        assert_eq!(status, 200);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Stripe", "Uber"]);

        let (status, _) = get_json(&format!("{}/top/vcs?field=valuation", base)).await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let base = serve_fallback().await;

        let (_, health) = get_json(&format!("{}/health", base)).await;
        assert_eq!(health["origin"], "fallback");
        assert_eq!(health["companies"], 12);

        let (_, stats) = get_json(&format!("{}/stats", base)).await;
        assert_eq!(stats["partners"]["partner_companies"], 8);
    }

    #[tokio::test]
    async fn test_stats_saturate_huge_totals() {
        use crate::company::sample_company;

        let store = RecordStore::new(
            vec![sample_company(1, "A", u64::MAX), sample_company(2, "B", u64::MAX)],
            Vec::new(),
            Vec::new(),
        );
        let base = serve(store).await;

        let (status, stats) = get_json(&format!("{}/stats", base)).await;
        assert_eq!(status, 200);
        assert_eq!(stats["companies"]["total_valuation"], u64::MAX);
    }
}
