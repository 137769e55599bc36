//! The shared API client.
//!
//! Every workflow sends through one [`ApiClient`], which runs the request
//! through its middleware pipeline around a [`Transport`]. Pre-send hooks run
//! in registration order, post-receive hooks in reverse order.

use super::config::ClientConfig;
use super::middleware::{BearerAuth, Middleware, SessionGuard};
use super::session::SessionContext;
use crate::domain::{ApiError, ApiResult, MultipartForm, PartValue};
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// A request relative to the client's base address.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Sets `Authorization: Bearer <token>`, replacing any previous value.
    pub fn bearer(mut self, token: &str) -> Self {
        match bearer_value(token) {
            Ok(value) => {
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => tracing::warn!("session token is not a valid header value, not attaching it"),
        }
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    }
}

pub fn bearer_value(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// A 2xx response with its JSON body (`Null` when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| ApiError::Transport(format!("unexpected response body: {}", e)))
    }
}

/// Sends a fully prepared request. Non-2xx answers come back as [`ApiError::Status`].
pub trait Transport {
    fn send(&self, url: &str, request: &ApiRequest) -> ApiResult<ApiResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, url: &str, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());

        // reqwest sets the multipart content type itself, boundary included.
        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(to_reqwest_form(form)?),
        };

        let response = builder.send().map_err(|e| {
            if e.is_builder() {
                ApiError::Request(e.to_string())
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = parse_body(&text);

        if status.is_success() {
            Ok(ApiResponse { status, body })
        } else {
            Err(ApiError::Status { status, body })
        }
    }
}

fn to_reqwest_form(form: &MultipartForm) -> ApiResult<Form> {
    let mut out = Form::new();
    for part in &form.parts {
        out = match &part.value {
            PartValue::Text(value) => out.text(part.name.clone(), value.clone()),
            PartValue::File(file) => {
                let file_part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)
                    .map_err(|e| ApiError::Request(e.to_string()))?;
                out.part(part.name.clone(), file_part)
            }
        };
    }
    Ok(out)
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// The one client all workflows send through.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
    middleware: Vec<Box<dyn Middleware>>,
    session: Rc<SessionContext>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Rc<SessionContext>) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(&config.base_url, transport, session))
    }

    /// Builds a client with the default pipeline: bearer auth, then the session guard.
    pub fn with_transport(
        base_url: &str,
        transport: impl Transport + 'static,
        session: Rc<SessionContext>,
    ) -> Self {
        let mut client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport: Box::new(transport),
            middleware: Vec::new(),
            session: Rc::clone(&session),
        };
        client.push_middleware(BearerAuth::new(Rc::clone(&session)));
        client.push_middleware(SessionGuard::new(session));
        client
    }

    pub fn push_middleware(&mut self, middleware: impl Middleware + 'static) {
        self.middleware.push(Box::new(middleware));
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Rc<SessionContext> {
        &self.session
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn dispatch(&self, mut request: ApiRequest) -> ApiResult<ApiResponse> {
        for middleware in &self.middleware {
            middleware.before_send(&mut request);
        }

        let url = self.url_for(&request.path);
        tracing::debug!(method = %request.method, %url, "dispatching request");
        let outcome = self.transport.send(&url, &request);

        match &outcome {
            Ok(response) => tracing::debug!(status = %response.status, %url, "request succeeded"),
            Err(e) => tracing::debug!(error = %e, %url, "request failed"),
        }

        for middleware in self.middleware.iter().rev() {
            middleware.after_receive(&outcome);
        }
        outcome
    }

    pub fn post_json<T: Serialize>(&self, path: &str, body: &T) -> ApiResult<ApiResponse> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Request(e.to_string()))?;
        self.dispatch(ApiRequest::post(path).json(value))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// In-memory transport that records requests and replays canned outcomes.
    #[derive(Clone, Default)]
    pub struct RecordingTransport {
        outcomes: Rc<RefCell<VecDeque<ApiResult<ApiResponse>>>>,
        requests: Rc<RefCell<Vec<(String, ApiRequest)>>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, outcome: ApiResult<ApiResponse>) {
            self.outcomes.borrow_mut().push_back(outcome);
        }

        pub fn respond_json(&self, status: u16, body: Value) {
            let status = StatusCode::from_u16(status).unwrap();
            if status.is_success() {
                self.respond(Ok(ApiResponse::new(status, body)));
            } else {
                self.respond(Err(ApiError::Status { status, body }));
            }
        }

        pub fn requests(&self) -> Vec<(String, ApiRequest)> {
            self.requests.borrow().clone()
        }

        pub fn last_request(&self) -> Option<ApiRequest> {
            self.requests.borrow().last().map(|(_, request)| request.clone())
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, url: &str, request: &ApiRequest) -> ApiResult<ApiResponse> {
            self.requests.borrow_mut().push((url.to_string(), request.clone()));
            self.outcomes
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::new(StatusCode::OK, Value::Null)))
        }
    }
}
