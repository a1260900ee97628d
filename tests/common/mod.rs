// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use guvnor_client::repository::HttpResponse;
use guvnor_client::{Error, GuvnorConfig, Result, Transport};

pub const BASE: &str = "http://guvnor.local:8080/drools-guvnor";

/// Connection settings pointing at [`BASE`], with optional allow-list
pub fn test_config(packages: Option<&str>) -> GuvnorConfig {
    let mut pairs = vec![
        ("protocol", "http"),
        ("host", "guvnor.local:8080"),
        ("subdomain", "drools-guvnor"),
        ("usr", "bob"),
        ("pwd", "secret"),
    ];
    if let Some(list) = packages {
        pairs.push(("packages", list));
    }
    GuvnorConfig::from_pairs(pairs)
}

/// Package feed listing `titles` in order, preceded by the sentinel entry
pub fn package_feed(titles: &[&str]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<packages>\n  <package><title>Packages</title></package>\n",
    );
    for (i, title) in titles.iter().enumerate() {
        xml.push_str(&format!(
            "  <package><uuid>uuid-{i}</uuid><title>{title}</title><archived>false</archived></package>\n"
        ));
    }
    xml.push_str("</packages>\n");
    xml
}

/// Asset feed with one `(title, format)` entry per asset
pub fn asset_feed(assets: &[(&str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<assets>\n");
    for (title, format) in assets {
        xml.push_str(&format!(
            "  <asset><title>{title}</title><metadata><format>{format}</format></metadata></asset>\n"
        ));
    }
    xml.push_str("</assets>\n");
    xml
}

/// Single-asset metadata document
pub fn asset_metadata(format: &str) -> String {
    format!("<asset><metadata><format>{format}</format></metadata></asset>")
}

/// Process definition source with the given process id
pub fn process_source(process_id: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<definitions>\n  <bpmn2:process processType=\"Private\" id=\"{process_id}\" name=\"Test\">\n  </bpmn2:process>\n</definitions>\n"
    )
}

#[derive(Clone)]
enum Route {
    Respond(u16, Vec<u8>),
    Fail,
}

/// In-memory transport with canned responses per URL
///
/// Unknown URLs answer 404. Every request URL is recorded in order.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), Route::Respond(status, body.into()));
        self
    }

    pub fn ok(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> &Self {
        self.respond(url, 200, body)
    }

    /// Make requests to `url` fail at the transport level
    pub fn fail(&self, url: impl Into<String>) -> &Self {
        self.routes.lock().unwrap().insert(url.into(), Route::Fail);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn boxed(&self) -> Box<dyn Transport> {
        Box::new(self.clone())
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, _headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.routes.lock().unwrap().get(url).cloned() {
            Some(Route::Respond(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Route::Fail) => Err(Error::DownloadError(format!("connection refused: {url}"))),
            None => Ok(HttpResponse::new(404, Vec::new())),
        }
    }
}

/// In-memory log sink for a fmt subscriber
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with INFO-level events recorded; returns its result and the log text
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}
