use std::collections::HashMap;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use groupdash::AppState;
use groupdash::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::MockServer;

/// Router wired to a wiremock server standing in for every platform API.
pub struct TestApp {
    pub router: Router,
    pub mock: MockServer,
}

impl TestApp {
    pub async fn new(env: &[(&str, &str)]) -> Self {
        let mock = MockServer::start().await;
        let mut vars: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for key in ["GAMES_API_URL", "ECONOMY_API_URL", "DEVELOP_API_URL"] {
            vars.insert(key.to_string(), mock.uri());
        }

        let config = Config::from_lookup(|key| vars.get(key).cloned());
        let router = groupdash::server::router(AppState::new(config));
        Self { router, mock }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let resp = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}
