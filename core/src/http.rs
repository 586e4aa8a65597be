//! HTTP requests and responses as plain data.
//!
//! The client never touches the network: it produces `HttpRequest` values and
//! consumes `HttpResponse` values, and the caller runs the round-trip with
//! whatever transport it has.

pub const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A request for the caller to execute. `path` is the absolute URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: String) -> Self {
        Self {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body and the matching content type.
    pub fn with_json_body(mut self, body: String) -> Self {
        let (name, value) = CONTENT_TYPE_JSON;
        self.headers.push((name.to_string(), value.to_string()));
        self.body = Some(body);
        self
    }
}

/// What the caller got back after executing an `HttpRequest`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}
