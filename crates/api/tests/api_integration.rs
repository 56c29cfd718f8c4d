//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::{InMemoryHealthCheck, InMemoryOrderRepository, InMemoryUserRepository, InjectedFailure};
use tower::ServiceExt;
use usecase::{OrderService, UserService};

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup_with_state() -> (Router, Arc<api::InMemoryState>) {
    let state = api::create_in_memory_state(Duration::from_millis(800));
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

fn setup() -> Router {
    setup_with_state().0
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_user(app: &Router, name: &str, email: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/users",
            serde_json::json!({ "name": name, "email": email }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn order_body(user_id: &str) -> serde_json::Value {
    serde_json::json!({
        "user_id": user_id,
        "items": [
            { "sku": "SKU1", "qty": 2, "price": 10.0 },
            { "sku": "SKU2", "qty": 1, "price": 15.0 }
        ]
    })
}

mod probes {
    use super::*;

    #[tokio::test]
    async fn test_livez() {
        let response = setup().oneshot(get_request("/livez")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], true);
    }

    #[tokio::test]
    async fn test_healthz_ready() {
        let response = setup().oneshot(get_request("/healthz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["details"]["memory"], "ok");
    }

    #[tokio::test]
    async fn test_healthz_not_ready() {
        let check = InMemoryHealthCheck::new();
        check.set_ready(false);

        let state = api::AppState::new(
            UserService::new(InMemoryUserRepository::new()),
            OrderService::new(InMemoryOrderRepository::new()),
        )
        .with_health_check(Arc::new(check));
        let app = api::create_app(Arc::new(state), get_metrics_handle());

        let response = app.oneshot(get_request("/healthz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["ok"], false);
        assert_ne!(json["details"]["memory"], "ok");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = setup();
        create_user(&app, "Metric", "metric@example.com").await;

        let response = app.oneshot(get_request("/metrics")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("users_created_total"));
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let app = setup();
        let created = create_user(&app, "Alice", "alice@example.com").await;

        assert_eq!(created["name"], "Alice");
        assert_eq!(created["email"], "alice@example.com");
        assert_eq!(created["avatar_url"], "");
        let id = created["id"].as_str().unwrap();

        let response = app
            .oneshot(get_request(&format!("/users/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn test_invalid_user_is_bad_request() {
        let response = setup()
            .oneshot(json_request(
                "POST",
                "/users",
                serde_json::json!({ "name": "Bob", "email": "not-an-email" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_INPUT");
        assert!(
            json["error"]["message"]
                .as_str()
                .unwrap()
                .contains("email")
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let app = setup();
        create_user(&app, "Bob", "bob@x.co").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/users",
                serde_json::json!({ "name": "Robert", "email": "bob@x.co" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let id = uuid::Uuid::new_v4();
        let response = setup()
            .oneshot(get_request(&format!("/users/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let response = setup()
            .oneshot(get_request("/users/not-a-uuid"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = setup()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"name\": "))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_update_avatar() {
        let app = setup();
        let created = create_user(&app, "Alice", "alice@example.com").await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/users/{id}/avatar"),
                serde_json::json!({ "avatar_url": "avatars/alice.png" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["avatar_url"], "avatars/alice.png");

        let fetched = app
            .oneshot(get_request(&format!("/users/{id}")))
            .await
            .unwrap();
        assert_eq!(body_json(fetched).await["avatar_url"], "avatars/alice.png");
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let (app, state) = setup_with_state();
        state
            .user_service
            .repository()
            .faults()
            .fail_next(InjectedFailure::Backend);

        let response = app
            .oneshot(json_request(
                "POST",
                "/users",
                serde_json::json!({ "name": "Bob", "email": "bob@x.co" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "2");
        assert_eq!(
            body_json(response).await["error"]["code"],
            "SERVICE_UNAVAILABLE"
        );
    }

    #[tokio::test]
    async fn test_slow_storage_is_unavailable() {
        let state = api::create_in_memory_state(Duration::from_millis(20));
        state
            .user_service
            .repository()
            .faults()
            .set_latency(Some(Duration::from_millis(500)));
        let app = api::create_app(state, get_metrics_handle());

        let response = app
            .oneshot(get_request(&format!("/users/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
    }
}

mod orders {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_order() {
        let app = setup();
        let user = create_user(&app, "Alice", "alice@example.com").await;
        let user_id = user["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(json_request("POST", "/orders", order_body(user_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = body_json(response).await;
        assert_eq!(created["user_id"], user_id);
        assert_eq!(created["status"], "pending");
        assert_eq!(created["total"], 35.0);
        assert_eq!(created["items"].as_array().unwrap().len(), 2);
        assert_eq!(created["items"][0]["sku"], "SKU1");
        assert_eq!(created["items"][0]["order_id"], created["id"]);
        assert!(created["items"][0]["id"].as_i64().is_some());

        let id = created["id"].as_str().unwrap();
        let response = app
            .oneshot(get_request(&format!("/orders/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn test_invalid_item_is_bad_request() {
        let body = serde_json::json!({
            "user_id": uuid::Uuid::new_v4().to_string(),
            "items": [{ "sku": "SKU1", "qty": 0, "price": 1.0 }]
        });

        let response = setup()
            .oneshot(json_request("POST", "/orders", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_INPUT");
        assert!(
            json["error"]["message"]
                .as_str()
                .unwrap()
                .contains("quantity")
        );
    }

    #[tokio::test]
    async fn test_empty_order_is_bad_request() {
        let body = serde_json::json!({
            "user_id": uuid::Uuid::new_v4().to_string(),
            "items": []
        });

        let response = setup()
            .oneshot(json_request("POST", "/orders", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_missing_user_id_is_bad_request() {
        for user_id in ["", "not-a-uuid"] {
            let response = setup()
                .oneshot(json_request("POST", "/orders", order_body(user_id)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"]["code"], "INVALID_INPUT");
        }
    }

    #[tokio::test]
    async fn test_missing_order_is_not_found() {
        let id = uuid::Uuid::new_v4();
        let response = setup()
            .oneshot(get_request(&format!("/orders/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "ORDER_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let (app, state) = setup_with_state();
        state
            .order_service
            .repository()
            .faults()
            .fail_next(InjectedFailure::Backend);

        let response = app
            .oneshot(json_request(
                "POST",
                "/orders",
                order_body(&uuid::Uuid::new_v4().to_string()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "2");
    }
}
