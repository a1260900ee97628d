// src/repository/client.rs

//! HTTP client for Guvnor REST requests
//!
//! Every request is a single blocking GET carrying Basic-Auth credentials and
//! a fixed header set. There are no retries and no connection reuse is
//! relied upon; a failed request is reported once to the caller.
//!
//! The network layer sits behind [`Transport`] so tests can script responses.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::blocking::Client;
use tracing::debug;

use crate::config::GuvnorConfig;
use crate::error::{Error, Result};

/// User-Agent sent with every request
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10.6; en-US; rv:1.9.2.16) Gecko/20110319 Firefox/3.6.16";

/// Accept header for content fetches
pub const ACCEPT_DEFAULT: &str = "text/plain,text/html,application/xhtml+xml,application/xml";

/// Accept header for asset probes and the server presence check
pub const ACCEPT_ATOM: &str = "application/atom+xml";

/// Status code and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking GET transport
///
/// Implementations return `Ok` for any HTTP status; `Err` is reserved for
/// transport failures (connect, timeout, body read).
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;

    /// Status of a GET without keeping the body
    fn status(&self, url: &str, headers: &[(&str, &str)]) -> Result<u16> {
        self.get(url, headers).map(|r| r.status)
    }
}

/// reqwest-backed transport with connect and read timeouts
pub struct ReqwestTransport {
    client: Client,
    read_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            read_timeout,
        })
    }

    fn send(&self, url: &str, headers: &[(&str, &str)]) -> Result<reqwest::blocking::Response> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        request.send().map_err(|e| {
            if e.is_timeout() {
                Error::DownloadError(format!(
                    "Request to {url} timed out after {}ms",
                    self.read_timeout.as_millis()
                ))
            } else {
                Error::DownloadError(format!("Failed to fetch {url}: {e}"))
            }
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let response = self.send(url, headers)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| Error::DownloadError(format!("Failed to read response from {url}: {e}")))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }

    fn status(&self, url: &str, headers: &[(&str, &str)]) -> Result<u16> {
        Ok(self.send(url, headers)?.status().as_u16())
    }
}

/// `Basic base64(user:pass)`
pub fn basic_auth_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

/// Authenticated Guvnor HTTP client
pub struct RepositoryClient {
    transport: Box<dyn Transport>,
    authorization: String,
}

impl RepositoryClient {
    /// Create a client over the network using the configured timeouts
    ///
    /// Fails when a timeout is invalid or the password cannot be resolved.
    pub fn new(config: &GuvnorConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.connect_timeout()?, config.read_timeout()?)?;
        Self::with_transport(config, Box::new(transport))
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: &GuvnorConfig, transport: Box<dyn Transport>) -> Result<Self> {
        let authorization = basic_auth_header(&config.user(), &config.password()?);
        Ok(Self {
            transport,
            authorization,
        })
    }

    fn headers<'a>(&'a self, accept: &'a str) -> [(&'a str, &'a str); 4] {
        [
            ("User-Agent", USER_AGENT),
            ("Accept", accept),
            ("charset", "UTF-8"),
            ("Authorization", self.authorization.as_str()),
        ]
    }

    /// GET returning the response whatever its status
    pub fn get(&self, url: &str, accept: &str) -> Result<HttpResponse> {
        debug!("GET {}", url);
        self.transport.get(url, &self.headers(accept))
    }

    /// GET returning only the status code
    pub fn status(&self, url: &str, accept: &str) -> Result<u16> {
        debug!("GET (status) {}", url);
        self.transport.status(url, &self.headers(accept))
    }

    /// Whether `url` answers 200; failures count as absent
    pub fn exists(&self, url: &str, accept: &str) -> bool {
        match self.status(url, accept) {
            Ok(status) => status == 200,
            Err(e) => {
                debug!("Presence check for {} failed: {}", url, e);
                false
            }
        }
    }

    /// Fetch a body, failing on any non-2xx status
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url, ACCEPT_DEFAULT)?;
        if !response.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }

    /// Fetch a body as UTF-8 text; malformed sequences become U+FFFD
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
