use crate::config::LoaderConfig;
use crate::error::RestconfResult;
use crate::transport::{Method, Request, Response, Transport};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Blocking HTTP transport carrying basic auth on every request.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &LoaderConfig) -> RestconfResult<HttpTransport> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls())
            .timeout(config.timeout())
            .build()?;
        Ok(HttpTransport {
            client,
            base_url: config.base_url().to_string(),
            username: config.username().to_string(),
            password: config.password().to_string(),
            timeout: config.timeout(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, request: &Request) -> RestconfResult<Response> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Put => self.client.put(&url),
            Method::Post => self.client.post(&url),
        };
        builder = builder
            .basic_auth(&self.username, Some(&self.password))
            .timeout(request.timeout.unwrap_or(self.timeout));
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(accept) = request.accept {
            builder = builder.header(ACCEPT, accept);
        }
        if let Some(body) = &request.body {
            debug!("{} {} ({} bytes)", request.method, url, body.len());
            builder = builder.body(body.clone());
        } else {
            debug!("{} {}", request.method, url);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_else(|err| {
            warn!("Could not read response body from {}: {}", url, err);
            String::new()
        });
        debug!("HTTP {} from {}:\n{}", status, url, body);
        Ok(Response { status, body })
    }
}
