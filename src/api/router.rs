//! HTTP router.
//!
//! Resource routes live under `/api/` behind bearer authentication. The
//! health check is public, the real-time channel is mounted at `/ws`, and
//! in production the built client bundle is served for every other path
//! with `index.html` as the single-page fallback.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::api::websocket;

/// Build the application router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost
/// layer of the protected routes). Handlers use `State<ApiContext>`.
pub fn build_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/appointments/:id",
            get(endpoints::appointments::detail).put(endpoints::appointments::update),
        )
        .route("/appointments/:id/cancel", put(endpoints::appointments::cancel))
        .route(
            "/treatment-plans",
            get(endpoints::treatment_plans::list).post(endpoints::treatment_plans::create),
        )
        .route(
            "/treatment-plans/:id",
            get(endpoints::treatment_plans::detail).put(endpoints::treatment_plans::update),
        )
        .route(
            "/treatment-plans/:id/progress",
            post(endpoints::treatment_plans::add_progress),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    // Merged after the layers above so it stays unauthenticated.
    let api = protected.route("/health", get(endpoints::health::check));

    let ws_routes = Router::new()
        .route("/ws", get(websocket::ws_upgrade))
        .with_state(ctx.clone());

    let mut app = Router::new().nest("/api", api).merge(ws_routes);

    if ctx.config.production {
        let dist = &ctx.config.client_dist;
        tracing::info!(dist = %dist.display(), "Serving client bundle");
        app = app.fallback_service(
            ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html"))),
        );
    }

    app.layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ServerConfig;
    use crate::db::DocumentStore;

    fn test_ctx(config: ServerConfig) -> ApiContext {
        ApiContext::new(DocumentStore::open_in_memory().unwrap(), config)
    }

    fn app() -> Router {
        build_router(test_ctx(ServerConfig::default()))
    }

    fn authed(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(AUTHORIZATION, "Bearer test-token");
        match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn appointment_body() -> Value {
        json!({
            "patient": "p1",
            "provider": "dr1",
            "treatment": { "_id": "t1", "name": "Botox", "duration": 30 },
            "date": "2024-07-01T10:00:00Z"
        })
    }

    fn plan_body() -> Value {
        json!({
            "name": "Skin plan",
            "patient": "p1",
            "provider": "dr1",
            "goal": "Even tone",
            "treatments": [
                { "treatment": { "_id": "t1", "name": "Peel", "price": 150.0 }, "quantity": 3 }
            ],
            "discount": { "type": "fixed", "value": 50.0 }
        })
    }

    // ── Health ──

    #[tokio::test]
    async fn health_needs_no_token() {
        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"status": "ok", "message": "Server is running"}));
    }

    // ── Auth ──

    #[tokio::test]
    async fn resource_routes_require_bearer() {
        let req = Request::builder()
            .uri("/api/appointments")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app(), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Authentication required");
    }

    #[tokio::test]
    async fn shared_token_must_match() {
        let app = build_router(test_ctx(ServerConfig {
            api_token: Some("secret".into()),
            ..Default::default()
        }));

        let (status, _) = send(&app, authed(Method::GET, "/api/appointments", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .uri("/api/appointments")
            .header(AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn authed_responses_are_not_cached() {
        let response = app()
            .oneshot(authed(Method::GET, "/api/treatment-plans", None))
            .await
            .unwrap();
        assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");
    }

    // ── Appointments ──

    #[tokio::test]
    async fn appointment_lifecycle() {
        let app = app();

        let (status, created) = send(
            &app,
            authed(Method::POST, "/api/appointments", Some(appointment_body())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["_id"].as_str().unwrap().to_string();
        assert_eq!(created["status"], "scheduled");
        assert_eq!(created["duration"], 30);
        assert_eq!(created["feedbackSubmitted"], false);

        let (status, updated) = send(
            &app,
            authed(
                Method::PUT,
                &format!("/api/appointments/{id}"),
                Some(json!({"status": "confirmed", "location": "Room 2"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "confirmed");
        assert_eq!(updated["location"], "Room 2");
        assert_eq!(updated["patient"], "p1");

        let (status, cancelled) = send(
            &app,
            authed(
                Method::PUT,
                &format!("/api/appointments/{id}/cancel"),
                Some(json!({})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["status"], "cancelled");

        let (_, fetched) = send(
            &app,
            authed(Method::GET, &format!("/api/appointments/{id}"), None),
        )
        .await;
        assert_eq!(fetched["status"], "cancelled");

        let (_, list) = send(&app, authed(Method::GET, "/api/appointments", None)).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_appointment_is_404_with_message() {
        let (status, json) = send(
            &app(),
            authed(Method::GET, "/api/appointments/nope", None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Appointment not found");
    }

    #[tokio::test]
    async fn incomplete_appointment_is_400() {
        let (status, json) = send(
            &app(),
            authed(Method::POST, "/api/appointments", Some(json!({"patient": "p1"}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("is required"));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/appointments")
            .header(AUTHORIZATION, "Bearer t")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, json) = send(&app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let mut body = appointment_body();
        body["status"] = json!("postponed");
        let (status, _) = send(&app(), authed(Method::POST, "/api/appointments", Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ── Treatment plans ──

    #[tokio::test]
    async fn plan_prices_are_derived() {
        let (status, plan) = send(
            &app(),
            authed(Method::POST, "/api/treatment-plans", Some(plan_body())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(plan["totalPrice"], 450.0);
        assert_eq!(plan["finalPrice"], 400.0);
        assert_eq!(plan["status"], "active");
        assert_eq!(plan["paymentStatus"], "unpaid");
    }

    #[tokio::test]
    async fn progress_entries_append_in_order() {
        let app = app();
        let (_, plan) = send(
            &app,
            authed(Method::POST, "/api/treatment-plans", Some(plan_body())),
        )
        .await;
        let id = plan["_id"].as_str().unwrap().to_string();
        let path = format!("/api/treatment-plans/{id}/progress");

        for notes in ["week 1", "week 2"] {
            let (status, _) = send(
                &app,
                authed(Method::POST, &path, Some(json!({"notes": notes}))),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (_, plan) = send(
            &app,
            authed(
                Method::POST,
                &path,
                Some(json!({"notes": "week 3", "imageUrls": ["https://cdn/a.jpg"]})),
            ),
        )
        .await;

        let history = plan["progressTracking"].as_array().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2]["notes"], "week 3");
        assert_eq!(history[2]["imageUrls"][0], "https://cdn/a.jpg");
        assert!(history[0]["date"].is_string());
    }

    #[tokio::test]
    async fn progress_on_missing_plan_is_404() {
        let (status, json) = send(
            &app(),
            authed(
                Method::POST,
                "/api/treatment-plans/missing/progress",
                Some(json!({"notes": "x"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Treatment plan not found");
    }

    #[tokio::test]
    async fn plan_update_merges_fields() {
        let app = app();
        let (_, plan) = send(
            &app,
            authed(Method::POST, "/api/treatment-plans", Some(plan_body())),
        )
        .await;
        let id = plan["_id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            authed(
                Method::PUT,
                &format!("/api/treatment-plans/{id}"),
                Some(json!({"paymentStatus": "partial", "status": "on-hold"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["paymentStatus"], "partial");
        assert_eq!(updated["status"], "on-hold");
        assert_eq!(updated["goal"], "Even tone");
        assert_eq!(updated["finalPrice"], 400.0);
    }

    // ── Static bundle ──

    #[tokio::test]
    async fn production_serves_spa_fallback() {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "<html>clinic</html>").unwrap();

        let app = build_router(test_ctx(ServerConfig {
            production: true,
            client_dist: dist.path().to_path_buf(),
            ..Default::default()
        }));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/patients/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<html>clinic</html>");

        let (status, _) = send(
            &app,
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn development_has_no_static_fallback() {
        let (status, _) = send(
            &app(),
            Request::builder()
                .uri("/patients/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
