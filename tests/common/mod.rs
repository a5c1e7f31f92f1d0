//! Test harness: the full application over an in-memory database, driven
//! through `tower::ServiceExt::oneshot` with a single cookie jar.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use snippetbox::{app, config::Config, db, session, state::AppState};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower::ServiceExt;

pub const SESSION_COOKIE: &str = "id";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    /// The CSRF token embedded in the page's forms
    pub fn csrf_token(&self) -> String {
        let marker = r#"name="csrf_token" value=""#;
        let start = self.body.find(marker).expect("page has no csrf_token field") + marker.len();
        let len = self.body[start..].find('"').expect("unterminated csrf_token value");
        self.body[start..start + len].to_string()
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub cookie: Option<String>,
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        ui_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ui"),
        session_lifetime_hours: 12,
        secure_cookies: false,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = test_config();
        let pool = db::connect_in_memory().await.unwrap();
        let store = session::store(&pool).await.unwrap();
        let state = AppState::with_pool(pool.clone(), &config).unwrap();
        let router = app::build(state, &config, store).unwrap();

        Self {
            router,
            pool,
            cookie: None,
        }
    }

    /// Send `request` with the current session cookie and keep any new one
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                format!("{}={}", SESSION_COOKIE, cookie).parse().unwrap(),
            );
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();

        for value in parts.headers.get_all(header::SET_COOKIE) {
            if let Some(id) = session_id(value.to_str().unwrap()) {
                self.cookie = if id.is_empty() { None } else { Some(id) };
            }
        }

        let bytes = body.collect().await.unwrap().to_bytes();
        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// Rows in the session store's table
    pub async fn session_rows(&self) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tower_sessions")
            .fetch_one(&self.pool)
            .await
            .unwrap();
        count
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Fetch `form_page` for a fresh token, then post `fields` with it
    pub async fn submit(&mut self, form_page: &str, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let token = self.get(form_page).await.csrf_token();
        let mut fields = fields.to_vec();
        fields.push(("csrf_token", &token));
        self.post_form(uri, &fields).await
    }

    pub async fn sign_up(&mut self, name: &str, email: &str, password: &str) -> TestResponse {
        self.submit(
            "/user/signup",
            "/user/signup",
            &[("name", name), ("email", email), ("password", password)],
        )
        .await
    }

    pub async fn log_in(&mut self, email: &str, password: &str) -> TestResponse {
        self.submit(
            "/user/login",
            "/user/login",
            &[("email", email), ("password", password)],
        )
        .await
    }

    /// Sign up and log in as a fresh user
    pub async fn logged_in(&mut self) {
        let response = self.sign_up("Alice", "alice@example.com", "pa55word!").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);

        let response = self.log_in("alice@example.com", "pa55word!").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/snippet/create"));
    }
}

fn session_id(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    let (name, value) = pair.trim().split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_string())
}
