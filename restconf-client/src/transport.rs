use crate::error::RestconfResult;
use core::fmt;
use core::fmt::Display;
use std::time::Duration;

pub mod http;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Put => write!(f, "PUT"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A single exchange with the datastore. `path` is relative to the RESTCONF root.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub content_type: Option<&'static str>,
    pub accept: Option<&'static str>,
    pub body: Option<Vec<u8>>,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
}

impl Request {
    pub fn get(path: &str) -> Request {
        Request::new(Method::Get, path, None)
    }

    pub fn put(path: &str, body: Vec<u8>, content_type: &'static str) -> Request {
        Request::new(Method::Put, path, Some(body)).with_content_type(content_type)
    }

    pub fn post(path: &str, body: Vec<u8>, content_type: &'static str) -> Request {
        Request::new(Method::Post, path, Some(body)).with_content_type(content_type)
    }

    fn new(method: Method, path: &str, body: Option<Vec<u8>>) -> Request {
        Request {
            method,
            path: path.to_string(),
            content_type: None,
            accept: None,
            body,
            timeout: None,
        }
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.to_string(),
        }
    }

    /// Body cut down to at most `limit` characters, for diagnostics.
    pub fn truncated_body(&self, limit: usize) -> &str {
        match self.body.char_indices().nth(limit) {
            Some((idx, _)) => &self.body[..idx],
            None => &self.body,
        }
    }
}

/// Trait for RESTCONF transport
pub trait Transport {
    fn send(&mut self, request: &Request) -> RestconfResult<Response>;
}
