#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront::build_app;
use storefront::config::{AppConfig, Environment, JwtConfig, StoreBackend};
use storefront::state::AppState;

pub const SECRET: &str = "integration-secret";

/// An in-process app over the in-memory store.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        store: StoreBackend::Memory,
        jwt: JwtConfig {
            secret: SECRET.into(),
            secret_is_fallback: false,
            ttl_days: 7,
        },
        host: "127.0.0.1".into(),
        port: 0,
        environment: Environment::Development,
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
    }
}

pub fn spawn_app() -> TestApp {
    let state = AppState::in_memory(test_config());
    let router = build_app(state.clone());
    TestApp { state, router }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.expect("router is infallible");
        let status = res.status();
        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        TestResponse {
            status,
            content_type,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register a user and return (token, user id).
    pub async fn signup(&self, name: &str, email: &str) -> (String, String) {
        let res = self.register(name, email, "password123").await;
        assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.text);
        let body = res.json();
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_product(&self, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, "/api/products", Some(token), Some(body))
            .await
    }

    pub async fn list_products(&self) -> Vec<Value> {
        let res = self.request(Method::GET, "/api/products", None, None).await;
        assert_eq!(res.status, StatusCode::OK);
        res.json().as_array().cloned().unwrap_or_default()
    }

    pub async fn delete_product(&self, token: &str, id: &str) -> TestResponse {
        self.request(Method::DELETE, &format!("/api/products/{id}"), Some(token), None)
            .await
    }
}
