//! Exercises `HttpBracketSource` against an in-process bracket service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use tax_core::{
    BracketSource, CachedBracketSource, SourceError, TaxBracket, TaxBracketResponse, calculate_tax,
};
use tax_http::HttpBracketSource;

const YEAR_PATH: &str = "/tax-calculator/tax-year/{year}";

fn brackets_2022() -> Vec<TaxBracket> {
    vec![
        TaxBracket::bounded(0.0, 50197.0, 0.15),
        TaxBracket::bounded(50197.0, 100392.0, 0.205),
        TaxBracket::bounded(100392.0, 155625.0, 0.26),
        TaxBracket::bounded(155625.0, 221708.0, 0.29),
        TaxBracket::unbounded(221708.0, 0.33),
    ]
}

/// Serves 2022 and answers 404 for every other year. Counts requests.
async fn year_handler(
    State(hits): State<Arc<AtomicUsize>>,
    Path(year): Path<i32>,
) -> Result<Json<TaxBracketResponse>, StatusCode> {
    hits.fetch_add(1, Ordering::SeqCst);
    if year == 2022 {
        Ok(Json(TaxBracketResponse {
            tax_brackets: brackets_2022(),
        }))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test router");
    });
    format!("http://{addr}")
}

async fn spawn_bracket_service() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(YEAR_PATH, get(year_handler))
        .with_state(hits.clone());
    (spawn_service(router).await, hits)
}

fn source_for(base_url: &str) -> HttpBracketSource {
    HttpBracketSource::new(base_url, Duration::from_secs(5)).expect("valid base URL")
}

#[tokio::test]
async fn fetches_and_decodes_brackets() {
    let (base_url, _) = spawn_bracket_service().await;

    let brackets = source_for(&base_url).fetch_tax_brackets(2022).await.unwrap();

    assert_eq!(brackets, brackets_2022());
}

#[tokio::test]
async fn fetched_brackets_feed_the_calculator() {
    let (base_url, _) = spawn_bracket_service().await;

    let brackets = source_for(&base_url).fetch_tax_brackets(2022).await.unwrap();
    let result = calculate_tax(50197.0, &brackets);

    assert_eq!(result.per_band.len(), 1);
    assert!((result.total_tax - 7529.55).abs() < 1e-6);
}

#[tokio::test]
async fn missing_year_maps_to_api_error_with_status_text() {
    let (base_url, _) = spawn_bracket_service().await;

    let result = source_for(&base_url).fetch_tax_brackets(1999).await;

    assert_eq!(result, Err(SourceError::Api("Not Found".to_string())));
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let router = Router::new().route(
        YEAR_PATH,
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = spawn_service(router).await;

    let result = source_for(&base_url).fetch_tax_brackets(2022).await;

    assert_eq!(
        result,
        Err(SourceError::Api("Internal Server Error".to_string()))
    );
}

#[tokio::test]
async fn malformed_body_is_unexpected_error() {
    let router = Router::new().route(YEAR_PATH, get(|| async { "not json" }));
    let base_url = spawn_service(router).await;

    let result = source_for(&base_url).fetch_tax_brackets(2022).await;

    assert!(
        matches!(result, Err(SourceError::Unexpected(_))),
        "got {result:?}"
    );
}

#[tokio::test]
async fn refused_connection_is_no_response() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = source_for(&format!("http://{addr}"))
        .fetch_tax_brackets(2022)
        .await;

    assert_eq!(result, Err(SourceError::NoResponse));
}

#[tokio::test]
async fn slow_service_times_out_as_no_response() {
    let router = Router::new().route(
        YEAR_PATH,
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "late"
        }),
    );
    let base_url = spawn_service(router).await;
    let source = HttpBracketSource::new(&base_url, Duration::from_millis(200)).unwrap();

    let result = source.fetch_tax_brackets(2022).await;

    assert_eq!(result, Err(SourceError::NoResponse));
}

#[tokio::test]
async fn cache_avoids_repeat_requests() {
    let (base_url, hits) = spawn_bracket_service().await;
    let source = CachedBracketSource::new(source_for(&base_url));

    source.fetch_tax_brackets(2022).await.unwrap();
    source.fetch_tax_brackets(2022).await.unwrap();
    let _ = source.fetch_tax_brackets(2020).await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(source.cached_years(), vec![2022]);
}
