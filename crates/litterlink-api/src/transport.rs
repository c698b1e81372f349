// Shared HTTP transport.
//
// Both vendor clients go through `Transport::send`, which performs one
// round trip and hands back the raw status and body. Interpreting status
// codes (401 retry, envelopes) is the caller's job.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, floor_char_boundary};

const DEFAULT_USER_AGENT: &str = concat!("litterlink/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Fixed per-request budget. A timeout is reported as [`Error::Timeout`].
    pub timeout: Duration,
    /// `User-Agent` sent when a vendor does not mandate its own.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl TransportConfig {
    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `Transport` from this config.
    pub fn build(&self) -> Result<Transport, Error> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(Error::Transport)?;
        Ok(Transport {
            http,
            timeout: self.timeout,
        })
    }
}

/// Request payload variants used by the vendor APIs.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// No body (plain GET).
    Empty,
    /// `application/x-www-form-urlencoded`, already encoded.
    Form(String),
    /// `application/json`.
    Json(serde_json::Value),
    /// Pre-serialized body with a vendor-specific content type.
    Raw {
        content_type: &'static str,
        data: String,
    },
}

/// Status code plus body of a completed round trip.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// Turn any status >= 400 into [`Error::Http`], passing successes through.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.status.as_u16() >= 400 {
            let cut = floor_char_boundary(&self.body, 200);
            return Err(Error::Http {
                status: self.status.as_u16(),
                body: self.body[..cut].to_owned(),
            });
        }
        Ok(self)
    }
}

/// Thin wrapper around `reqwest::Client` performing single round trips.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    timeout: Duration,
}

impl Transport {
    /// Perform one request and return status + body.
    ///
    /// Only network-level failures are errors here; HTTP error statuses are
    /// returned as a `RawResponse` for the caller to interpret.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: RequestBody,
    ) -> Result<RawResponse, Error> {
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url).headers(headers);
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Form(encoded) => builder
                .header(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                )
                .body(encoded),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Raw { content_type, data } => builder
                .header(CONTENT_TYPE, HeaderValue::from_static(content_type))
                .body(data),
        };

        let resp = builder.send().await.map_err(|e| self.classify(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.classify(e))?;
        trace!(%status, bytes = body.len(), "response received");

        Ok(RawResponse { status, body })
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}
