use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::types::{CrawlRequest, MatchRecord};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /crawl`
///
/// 無法解析的內容、缺少關鍵字或部落格 ID 都視為零筆結果，一律回傳 JSON 陣列。
pub async fn crawl_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<Vec<MatchRecord>> {
    let searches = match serde_json::from_slice::<CrawlRequest>(&body) {
        Ok(request) => request.into_searches(),
        Err(e) => {
            tracing::warn!(error = %e, "無法解析請求內容");
            Vec::new()
        }
    };

    Json(state.checker.check_all(&searches).await)
}

#[cfg(test)]
mod tests {
    use crate::checker::RankChecker;
    use crate::checker::testing::{GENERAL_PAGE, StaticFetcher};
    use crate::config::AllowedOrigins;
    use crate::parser::ResultParser;
    use crate::server::{AppState, build_app};
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use std::sync::Arc;
    use tower::util::ServiceExt; // for `oneshot`

    fn app(origins: AllowedOrigins) -> Router {
        let fetcher = StaticFetcher::default().with_page("cafe", GENERAL_PAGE);
        let checker =
            RankChecker::new(Arc::new(fetcher), Arc::new(ResultParser::new().unwrap()));
        build_app(AppState { checker: Arc::new(checker) }, &origins)
    }

    fn crawl_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/crawl")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_crawl_returns_records() {
        let response = app(AllowedOrigins::Any)
            .oneshot(crawl_request(r#"{"keyword": "cafe", "blog_ids": ["alpha"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body,
            serde_json::json!([{
                "Keyword": "cafe",
                "Blog ID": "alpha",
                "Section": "general results",
                "Position": 2,
                "Title": "Mine"
            }])
        );
    }

    #[tokio::test]
    async fn test_crawl_accepts_pairs() {
        let response = app(AllowedOrigins::Any)
            .oneshot(crawl_request(r#"[["cafe", "alpha"], ["cafe", "other"]]"#))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bad_requests_yield_empty_array() {
        for body in [
            "not json",
            r#"{"keyword": "cafe"}"#,
            r#"{"blog_ids": ["alpha"]}"#,
            "",
        ] {
            let response = app(AllowedOrigins::Any)
                .oneshot(crawl_request(body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await, serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_array() {
        let response = app(AllowedOrigins::Any)
            .oneshot(crawl_request(r#"{"keyword": "unknown", "blog_ids": ["alpha"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_cors_wildcard() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/crawl")
            .header("origin", "https://anywhere.example")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app(AllowedOrigins::Any).oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_list_rejects_unknown_origin() {
        let origins = AllowedOrigins::List(vec!["https://ok.example".to_string()]);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/crawl")
            .header("origin", "https://evil.example")
            .body(Body::from("{}"))
            .unwrap();

        let response = app(origins).oneshot(request).await.unwrap();

        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app(AllowedOrigins::Any).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({"status": "ok"}));
    }
}
