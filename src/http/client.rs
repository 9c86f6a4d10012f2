//! HTTP client for sending user requests
//!
//! Wraps a reqwest `Client` and turns a resolved `RequestInfo` into a
//! `Response` holding the status line and a pretty-printed body.

use reqwest::Client;
use thiserror::Error;

use super::{prettify_json, Method, RequestInfo, Response};

/// Errors that can occur when sending a request
#[derive(Debug, Error)]
pub enum RequestError {
    /// The `-X` flag named a method that is not supported
    #[error("Invalid HTTP method received: {0}")]
    InvalidMethod(String),

    /// The request could not be sent or no response was received
    #[error("Error performing {method} request on {url}: {source}")]
    Send {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read
    #[error("Couldn't read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Client for sending requests described by `RequestInfo`
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HttpClient with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a request and read the whole response
    ///
    /// The body is only attached when it is non-empty, and never for GET.
    ///
    /// # Returns
    /// * `Ok(Response)` - Status line and formatted body
    /// * `Err(RequestError)` - If sending or reading the body fails
    pub async fn send(&self, request: &RequestInfo) -> Result<Response, RequestError> {
        let mut builder = self.client.request(request.method.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if request.method != Method::Get && !request.data.is_empty() {
            builder = builder.body(request.data.clone());
        }

        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = builder.send().await.map_err(|source| RequestError::Send {
            method: request.method,
            url: request.url.clone(),
            source,
        })?;

        let status = response.status();
        let status = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_str(), reason),
            None => status.as_str().to_string(),
        };
        let text = response.text().await.map_err(RequestError::Body)?;

        Ok(Response {
            status,
            data: prettify_json(&text),
        })
    }
}
