pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::documents::handlers as documents;
use crate::matching::handlers as matching;
use crate::state::AppState;

/// Uploads are résumés and transcripts; 10 MiB is plenty.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route(
            "/api/v1/matches",
            post(matching::handle_create_match)
                .get(matching::handle_get_last_match)
                .delete(matching::handle_clear_last_match),
        )
        // Lab directory
        .route("/api/v1/labs", get(catalog::handle_list_labs))
        .route("/api/v1/labs/:id", get(catalog::handle_get_lab))
        // Document utilities
        .route("/api/v1/documents/text", post(documents::handle_pdf_text))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::matching::session::SESSION_HEADER;
    use crate::test_support::{lab, memory_cache, pipeline, CatalogReply, Reply};

    const BOUNDARY: &str = "labmatch-test-boundary";
    const PROFILE_TEXT: &str = "Major: Biology\nKeywords: genetics, microscopy";
    const SCORING_TEXT: &str = "Lab ID: 2\nSimilarity Score: 5\nMatch Reason: Great fit\n---\nLab ID: 1\nSimilarity Score: 2\nMatch Reason: Weak fit";

    fn app(scoring: Reply) -> Router {
        let (pipeline, services) = pipeline(
            Reply::text(PROFILE_TEXT),
            scoring,
            CatalogReply::Labs(vec![lab(1, "Plant Lab"), lab(2, "Gene Lab")]),
        );
        build_router(AppState {
            catalog: services.catalog,
            cache: Arc::new(memory_cache()),
            pipeline: Arc::new(pipeline),
        })
    }

    fn upload(session: Option<Uuid>, content_type: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"resume\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             %PDF-1.7 fake\r\n\
             --{BOUNDARY}--\r\n"
        );
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/matches")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session.to_string());
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn with_session(method: Method, uri: &str, session: Uuid) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(SESSION_HEADER, session.to_string())
            .body(Body::empty())
            .unwrap()
    }

    async fn json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Reply::Empty)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_match_requires_session_header() {
        let response = app(Reply::text(SCORING_TEXT))
            .oneshot(upload(None, "application/pdf"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_then_load_then_clear() {
        let app = app(Reply::text(SCORING_TEXT));
        let session = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(upload(Some(session), "application/pdf"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["status"], "matched");
        assert_eq!(body["matches"].as_array().unwrap().len(), 1);
        assert_eq!(body["matches"][0]["id"], 2);
        assert_eq!(body["matches"][0]["lab_name"], "Gene Lab");
        assert_eq!(body["matches"][0]["similarity_score"], 5);
        assert_eq!(body["matches"][0]["match_reason"], "Great fit");

        let response = app
            .clone()
            .oneshot(with_session(Method::GET, "/api/v1/matches", session))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["matches"][0]["id"], 2);

        let response = app
            .clone()
            .oneshot(with_session(Method::DELETE, "/api/v1/matches", session))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(with_session(Method::GET, "/api/v1/matches", session))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_match_with_nothing_above_threshold_is_explicit() {
        let response = app(Reply::text("Lab ID: 1\nSimilarity Score: 3\nMatch Reason: close"))
            .oneshot(upload(Some(Uuid::new_v4()), "image/png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["status"], "no_qualifying_matches");
        assert!(body["matches"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_unsupported_type_is_415() {
        let response = app(Reply::text(SCORING_TEXT))
            .oneshot(upload(Some(Uuid::new_v4()), "image/gif"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            json(response).await["error"]["code"],
            "UNSUPPORTED_DOCUMENT_TYPE"
        );
    }

    #[tokio::test]
    async fn test_scoring_failure_surfaces_its_kind() {
        let response = app(Reply::Fail)
            .oneshot(upload(Some(Uuid::new_v4()), "application/pdf"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json(response).await["error"]["code"], "SCORING_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn test_lab_lookup() {
        let app = app(Reply::Empty);

        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/labs/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["lab_name"], "Plant Lab");

        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/labs/99").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(Request::get("/api/v1/labs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_pdf_text_rejects_invalid_base64() {
        let request = Request::post("/api/v1/documents/text")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"file": "%%% not base64"}"#))
            .unwrap();
        let response = app(Reply::Empty).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
