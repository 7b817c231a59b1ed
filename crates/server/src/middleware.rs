use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use models::product::NewProduct;

use crate::errors::JsonApiError;

/// Payloads larger than this are rejected before parsing.
const BODY_LIMIT: usize = 1 << 20;

/// The decoded, validated payload a mutating handler reads from the request
/// extensions. Present exactly when the middleware delegated to the handler.
#[derive(Clone, Debug)]
pub struct ValidatedProduct(pub NewProduct);

/// Middleware: decode and validate the product payload for mutating routes.
///
/// On success the validated value is injected into the request and the wrapped
/// handler runs; on any failure the error response is written here and the
/// handler is never invoked. Unparsable body -> 400, parsed but rule-violating
/// payload -> 422 with every violated rule listed.
pub async fn validate_product(req: Request, next: Next) -> Result<Response, JsonApiError> {
    let (parts, body) = req.into_parts();

    let bytes = to_bytes(body, BODY_LIMIT).await.map_err(|e| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed Payload", Some(e.to_string()))
    })?;

    let input: NewProduct = serde_json::from_slice(&bytes).map_err(|e| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed Payload", Some(e.to_string()))
    })?;

    if let Err(violations) = input.validate() {
        return Err(JsonApiError::validation_failed(violations));
    }

    let mut req = Request::from_parts(parts, Body::empty());
    req.extensions_mut().insert(ValidatedProduct(input));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Extension, State},
        http::{header, Request as HttpRequest},
        middleware as axum_middleware,
        routing::post,
        Json, Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tower::ServiceExt;

    /// Probe handler recording how often the middleware delegated, echoing
    /// back the value it observed.
    async fn probe(
        State(hits): State<Arc<AtomicUsize>>,
        Extension(ValidatedProduct(input)): Extension<ValidatedProduct>,
    ) -> Json<NewProduct> {
        hits.fetch_add(1, Ordering::SeqCst);
        Json(input)
    }

    fn app(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route("/products", post(probe))
            .route_layer(axum_middleware::from_fn(validate_product))
            .with_state(hits)
    }

    fn post_json(body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri("/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_body_never_reaches_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let res = app(hits.clone()).oneshot(post_json("{not json")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_rule_lists_violation_and_skips_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let res = app(hits.clone())
            .oneshot(post_json(r#"{"name":"","price":2.5,"sku":"abc-de-fgh"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let body = to_bytes(res.into_body(), BODY_LIMIT).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let violations = json["violations"].as_array().expect("violations listed");
        assert!(violations.iter().any(|v| v.as_str().unwrap().contains("name")));
    }

    #[tokio::test]
    async fn valid_payload_reaches_handler_exactly_once_unchanged() {
        let hits = Arc::new(AtomicUsize::new(0));
        let payload = r#"{"name":"Latte","description":"milk","price":2.45,"sku":"lat-mil-cof"}"#;
        let res = app(hits.clone()).oneshot(post_json(payload)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // the handler observed the identical value the middleware validated
        let body = to_bytes(res.into_body(), BODY_LIMIT).await.unwrap();
        let echoed: NewProduct = serde_json::from_slice(&body).unwrap();
        let original: NewProduct = serde_json::from_str(payload).unwrap();
        assert_eq!(echoed, original);
    }
}
