// src/repository/mod.rs

//! Guvnor repository access
//!
//! This module provides functionality for:
//! - Authenticated HTTP requests against the Guvnor REST API
//! - Streaming scans of package and asset feeds
//! - Package, process and form-template discovery
//! - Presence checks for package binaries and process diagrams

mod client;
mod feed;
mod metadata;
mod resolver;
mod urls;

pub use client::{
    ACCEPT_ATOM, ACCEPT_DEFAULT, HttpResponse, RepositoryClient, ReqwestTransport, Transport,
    USER_AGENT, basic_auth_header,
};
pub use feed::{ScanError, has_format, scan_packages, scan_processes};
pub use metadata::{
    FEED_SENTINEL_TITLE, FORM_TEMPLATE_FORMAT, PROCESS_FORMATS, Package, is_process_format,
};
pub use resolver::{DEFAULT_TEMPLATE_FORMAT, GuvnorResolver, filter_package_names, filter_packages};
pub use urls::GuvnorUrls;
