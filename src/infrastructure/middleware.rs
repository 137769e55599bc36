use super::http::{ApiRequest, ApiResponse, bearer_value};
use super::session::SessionContext;
use crate::domain::ApiResult;
use reqwest::header::AUTHORIZATION;
use std::rc::Rc;

/// A hook pair run around every request dispatched by the client.
///
/// Post-receive hooks only observe the outcome; the caller always gets it
/// back unchanged.
pub trait Middleware {
    fn before_send(&self, _request: &mut ApiRequest) {}

    fn after_receive(&self, _outcome: &ApiResult<ApiResponse>) {}
}

/// Attaches the current session token as a bearer credential.
pub struct BearerAuth {
    session: Rc<SessionContext>,
}

impl BearerAuth {
    pub fn new(session: Rc<SessionContext>) -> Self {
        Self { session }
    }
}

impl Middleware for BearerAuth {
    fn before_send(&self, request: &mut ApiRequest) {
        let Some(token) = self.session.token() else {
            return;
        };
        match bearer_value(&token) {
            Ok(value) => {
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => tracing::warn!("session token is not a valid header value, sending without it"),
        }
    }
}

/// Tears the session down when the server answers 401.
pub struct SessionGuard {
    session: Rc<SessionContext>,
}

impl SessionGuard {
    pub fn new(session: Rc<SessionContext>) -> Self {
        Self { session }
    }
}

impl Middleware for SessionGuard {
    fn after_receive(&self, outcome: &ApiResult<ApiResponse>) {
        if let Err(e) = outcome {
            if e.is_unauthorized() {
                self.session.invalidate();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApiError;
    use crate::infrastructure::persistence::MemoryTokenStore;
    use crate::infrastructure::session::SessionEvent;
    use reqwest::StatusCode;
    use serde_json::Value;

    fn session(token: Option<&str>) -> Rc<SessionContext> {
        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        };
        Rc::new(SessionContext::new(store, "/login"))
    }

    #[test]
    fn test_bearer_auth_attaches_token() {
        let hook = BearerAuth::new(session(Some("abc")));
        let mut request = ApiRequest::get("/products");

        hook.before_send(&mut request);

        assert_eq!(request.authorization(), Some("Bearer abc"));
    }

    #[test]
    fn test_bearer_auth_replaces_existing_header() {
        let hook = BearerAuth::new(session(Some("fresh")));
        let mut request = ApiRequest::get("/products").bearer("stale");

        hook.before_send(&mut request);

        assert_eq!(request.headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(request.authorization(), Some("Bearer fresh"));
    }

    #[test]
    fn test_bearer_auth_without_token() {
        let hook = BearerAuth::new(session(None));
        let mut request = ApiRequest::get("/products");

        hook.before_send(&mut request);

        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_session_guard_on_401() {
        let session = session(Some("abc"));
        let events = session.subscribe();
        let hook = SessionGuard::new(Rc::clone(&session));

        hook.after_receive(&Err(ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: Value::Null,
        }));

        assert!(session.token().is_none());
        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received.len(), 1);
        assert!(matches!(received[0], SessionEvent::Expired { .. }));
    }

    #[test]
    fn test_session_guard_ignores_other_outcomes() {
        let session = session(Some("abc"));
        let events = session.subscribe();
        let hook = SessionGuard::new(Rc::clone(&session));

        hook.after_receive(&Ok(ApiResponse::new(StatusCode::OK, Value::Null)));
        hook.after_receive(&Err(ApiError::Status {
            status: StatusCode::FORBIDDEN,
            body: Value::Null,
        }));
        hook.after_receive(&Err(ApiError::Transport("timed out".to_string())));

        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(events.try_iter().count(), 0);
    }
}
