//! Shared helpers for HTTP integration tests.
//!
//! [`TestApp`] wires the full router over in-memory backends and drives it
//! in-process with `tower::ServiceExt::oneshot`; no socket is opened.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use showroom::assets::{AssetStorage, MemoryAssetStore};
use showroom::auth::{NewUser, Tokens};
use showroom::config::ServerConfig;
use showroom::constants::MAX_UPLOAD_BYTES;
use showroom::http::{AppState, build_router};
use showroom::records::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const BOUNDARY: &str = "showroom-test-boundary";

/// One multipart form field.
pub enum Part {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl Part {
    pub fn text(name: &'static str, value: &str) -> Self {
        Self::Text {
            name,
            value: value.to_string(),
        }
    }

    pub fn image(len: usize) -> Self {
        Self::File {
            name: "image",
            file_name: "photo.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x42; len],
        }
    }

    pub fn file(content_type: &str, file_name: &str, bytes: &[u8]) -> Self {
        Self::File {
            name: "image",
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        }
    }
}

/// Encodes `parts` as a `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            },
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            },
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| {
            panic!(
                "Response is not JSON ({err}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap_or_default().to_string()
    }
}

/// Full application over in-memory backends, with one admin and one
/// regular user already provisioned.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub assets: Arc<MemoryAssetStore>,
    pub tokens: Tokens,
    pub admin_token: String,
    pub user_token: String,
    pub user_id: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let assets = Arc::new(MemoryAssetStore::new("gallery"));
        let tokens = Tokens::new("integration-secret", Duration::from_secs(3600))
            .expect("Failed to create tokens");
        let state = AppState::with_backends(
            RecordStore::memory(),
            AssetStorage::from_shared(assets.clone()),
            Some(tokens.clone()),
            MAX_UPLOAD_BYTES,
        );

        let admin = state
            .guard
            .users()
            .create(NewUser {
                name: "Owner".to_string(),
                email: "owner@example.com".to_string(),
                is_admin: true,
            })
            .await
            .expect("Failed to create admin");
        let user = state
            .guard
            .users()
            .create(NewUser {
                name: "Customer".to_string(),
                email: "customer@example.com".to_string(),
                is_admin: false,
            })
            .await
            .expect("Failed to create user");

        let admin_token = tokens.issue(&admin.id).expect("Failed to sign admin token");
        let user_token = tokens.issue(&user.id).expect("Failed to sign user token");
        let router = build_router(state.clone(), &ServerConfig::default());

        Self {
            router,
            state,
            assets,
            tokens,
            admin_token,
            user_token,
            user_id: user.id,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        TestResponse { status, body }
    }

    fn builder(method: Method, path: &str, token: Option<&str>) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(
            Self::builder(Method::GET, path, None)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(
            Self::builder(Method::DELETE, path, token)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }

    pub async fn json(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> TestResponse {
        self.send(
            Self::builder(method, path, token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
        )
        .await
    }

    pub async fn multipart(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        parts: &[Part],
    ) -> TestResponse {
        self.send(
            Self::builder(method, path, token)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(parts)))
                .expect("Failed to build request"),
        )
        .await
    }

    /// Uploads a small image as admin and returns the created entry.
    pub async fn upload(&self, alt_text: &str) -> serde_json::Value {
        let resp = self
            .multipart(
                Method::POST,
                "/gallery",
                Some(&self.admin_token),
                &[Part::image(64), Part::text("altText", alt_text)],
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.message());
        resp.json()
    }
}
