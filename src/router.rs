//! # Route Table
//!
//! A thin builder over `axum::Router` that checks every pattern as it is
//! registered. Patterns are made of:
//! - static segments: `/snippet/view`
//! - named segments: `/snippet/view/{id}`
//! - a trailing catch-all: `/static/{*filepath}` (static assets only)
//!
//! Two patterns registered for the same method must not be able to match the
//! same path. `/snippet/view/{id}` next to `/snippet/view/latest` is rejected
//! with [`RouteError::Ambiguous`], and the application refuses to start.
//!
//! Dispatch itself is axum's: unknown paths go to the fallback (404), and a
//! known path with the wrong method gets a 405 whose `Allow` header lists the
//! methods registered for that path.

use crate::middleware::auth::require_authentication;
use axum::{
    handler::Handler,
    http::Method,
    middleware,
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use std::path::Path;
use thiserror::Error;
use tower_http::services::ServeDir;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("{method} {pattern} is ambiguous with already registered {method} {existing}")]
    Ambiguous {
        method: Method,
        pattern: String,
        existing: String,
    },

    #[error("unsupported method {0}")]
    UnsupportedMethod(Method),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

#[derive(Debug, Clone)]
struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason| RouteError::InvalidPattern {
            pattern: raw.to_string(),
            reason,
        };

        let rest = raw.strip_prefix('/').ok_or_else(|| invalid("must start with '/'"))?;
        if rest.is_empty() {
            return Ok(Self {
                raw: raw.to_string(),
                segments: Vec::new(),
            });
        }

        let parts: Vec<&str> = rest.split('/').collect();
        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }

            let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(inner) => match inner.strip_prefix('*') {
                    Some(_) if i + 1 != parts.len() => {
                        return Err(invalid("catch-all must be the last segment"))
                    }
                    Some("") => return Err(invalid("catch-all needs a name")),
                    Some(name) => Segment::CatchAll(name.to_string()),
                    None if inner.is_empty() => return Err(invalid("parameter needs a name")),
                    None => Segment::Param(inner.to_string()),
                },
                None if part.contains(['{', '}']) => {
                    return Err(invalid("parameters must span a whole segment"))
                }
                None => Segment::Static(part.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Whether some request path would match both patterns
    fn overlaps(&self, other: &Pattern) -> bool {
        segments_overlap(&self.segments, &other.segments)
    }
}

fn segments_overlap(a: &[Segment], b: &[Segment]) -> bool {
    match (a.split_first(), b.split_first()) {
        (None, None) => true,
        (Some((Segment::CatchAll(_), _)), _) | (_, Some((Segment::CatchAll(_), _))) => true,
        (None, _) | (_, None) => false,
        (Some((Segment::Static(x), rest_a)), Some((Segment::Static(y), rest_b))) => {
            x == y && segments_overlap(rest_a, rest_b)
        }
        (Some((_, rest_a)), Some((_, rest_b))) => segments_overlap(rest_a, rest_b),
    }
}

/// Builder for the application's routes
pub struct RouteTable<S = ()> {
    registered: Vec<(Method, Pattern)>,
    router: Router<S>,
}

impl<S> Default for RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RouteTable<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            registered: Vec::new(),
            router: Router::new(),
        }
    }

    /// Register `handler` for `method` on `path`
    pub fn route<H, T>(self, method: Method, path: &str, handler: H) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let endpoint = on(method_filter(&method)?, handler);
        self.add(method, path, endpoint)
    }

    /// Register a route that only logged-in users may reach
    pub fn protected<H, T>(self, method: Method, path: &str, handler: H) -> Result<Self, RouteError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let endpoint = on(method_filter(&method)?, handler)
            .route_layer(middleware::from_fn(require_authentication));
        self.add(method, path, endpoint)
    }

    /// Serve files from `dir` under `prefix`, e.g. `/static/css/main.css`
    pub fn static_files(mut self, prefix: &str, dir: impl AsRef<Path>) -> Result<Self, RouteError> {
        let pattern = format!("{}/{{*filepath}}", prefix.trim_end_matches('/'));
        self.register(Method::GET, &pattern)?;
        self.router = self.router.nest_service(prefix, ServeDir::new(dir));
        Ok(self)
    }

    /// Responder for paths that match no route
    pub fn not_found<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.router = self.router.fallback(handler);
        self
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }

    fn add(mut self, method: Method, path: &str, endpoint: MethodRouter<S>) -> Result<Self, RouteError> {
        self.register(method, path)?;
        self.router = self.router.route(path, endpoint);
        Ok(self)
    }

    fn register(&mut self, method: Method, path: &str) -> Result<(), RouteError> {
        let pattern = Pattern::parse(path)?;

        if let Some((_, existing)) = self
            .registered
            .iter()
            .find(|(m, p)| *m == method && p.overlaps(&pattern))
        {
            return Err(RouteError::Ambiguous {
                method,
                pattern: pattern.raw,
                existing: existing.raw.clone(),
            });
        }

        tracing::debug!("Registered route {} {}", method, pattern.raw);
        self.registered.push((method, pattern));
        Ok(())
    }
}

fn method_filter(method: &Method) -> Result<MethodFilter, RouteError> {
    MethodFilter::try_from(method.clone()).map_err(|_| RouteError::UnsupportedMethod(method.clone()))
}
