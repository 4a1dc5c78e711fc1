//! Shared fixtures for the HTTP-level tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use translate_backend::{
    build_app,
    stats::{StatsHandle, StatsStore},
    translate::{RawTranslation, TranslationError, Translator},
    AppState, Config,
};

/// Answers every request with a fixed translation and metadata payload.
pub struct StubTranslator {
    pub translated: String,
    pub raw: Value,
}

impl StubTranslator {
    pub fn detecting(lang: &str) -> Self {
        Self {
            translated: "Olá".to_string(),
            raw: json!({ "src": lang }),
        }
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        _text: &str,
        _target_lang: &str,
        _source_lang: Option<&str>,
    ) -> Result<RawTranslation, TranslationError> {
        Ok(RawTranslation {
            text: self.translated.clone(),
            raw: self.raw.clone(),
        })
    }
}

pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(
        &self,
        _text: &str,
        _target_lang: &str,
        _source_lang: Option<&str>,
    ) -> Result<RawTranslation, TranslationError> {
        Err(TranslationError::Service("quota exceeded".to_string()))
    }
}

pub struct PanickingTranslator;

#[async_trait]
impl Translator for PanickingTranslator {
    async fn translate(
        &self,
        _text: &str,
        _target_lang: &str,
        _source_lang: Option<&str>,
    ) -> Result<RawTranslation, TranslationError> {
        panic!("translator exploded");
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self::with_env(translator, "production")
    }

    pub fn with_env(translator: Arc<dyn Translator>, node_env: &str) -> Self {
        let node_env = node_env.to_string();
        Self::with_config(translator, move |config| config.node_env = node_env)
    }

    pub fn with_config(translator: Arc<dyn Translator>, configure: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let public = dir.path().join("public");
        std::fs::create_dir_all(&public).expect("public dir");
        std::fs::write(public.join("index.html"), "<html><body>dashboard</body></html>")
            .expect("index.html");

        let mut config = Config {
            node_env: "production".to_string(),
            stats_file: dir.path().join("stats.json").display().to_string(),
            public_dir: public.display().to_string(),
            ..Config::default()
        };
        configure(&mut config);

        let (stats, _task) = StatsHandle::spawn(StatsStore::new(config.stats_path()));
        let state = AppState::new(config, translator, stats);
        let router = build_app(state.clone());

        Self { router, state, dir }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST a raw body with the given content type, returning the JSON reply.
    pub async fn post_raw(&self, uri: &str, content_type: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.request(method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn translate(&self, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, "/api/v1/translate", Some(body)).await
    }
}
