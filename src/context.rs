//! Per-request context
//!
//! Built by the middleware chain and stored in the request extensions:
//! the CSRF guard creates it with the session's token, the authentication
//! resolver fills in the identity. Handlers receive it read-only through
//! `Extension<RequestContext>`.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Token forms must echo back on state-changing requests
    pub csrf_token: String,

    /// Validated id of the logged-in user
    pub user_id: Option<i64>,

    /// True only after the resolver confirmed the account still exists
    pub is_authenticated: bool,
}

impl RequestContext {
    pub fn anonymous(csrf_token: String) -> Self {
        Self {
            csrf_token,
            ..Default::default()
        }
    }

    pub fn authenticated(self, user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            is_authenticated: true,
            ..self
        }
    }
}
