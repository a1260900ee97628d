// src/repository/resolver.rs

//! Package and process discovery against a Guvnor repository
//!
//! Operations come in two flavours. The `try_*` operations return a
//! [`Result`] and let the caller decide what a failure means. The plain
//! operations log the failure and degrade to an empty value, so an
//! unreachable package simply drops out of a listing.
//!
//! Enumeration is sequential: one request per package and per process, in
//! the order the server returns them.

use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, error, info, warn};

use super::client::{ACCEPT_ATOM, ACCEPT_DEFAULT, RepositoryClient, Transport};
use super::feed::{has_format, scan_packages, scan_processes};
use super::metadata::{FORM_TEMPLATE_FORMAT, Package};
use super::urls::GuvnorUrls;
use crate::config::GuvnorConfig;
use crate::error::Result;

/// Default format suffix for form template URLs
pub const DEFAULT_TEMPLATE_FORMAT: &str = "drl";

/// Resolves packages, processes and templates from a Guvnor server
pub struct GuvnorResolver {
    client: RepositoryClient,
    urls: GuvnorUrls,
    allow_list: Option<Vec<String>>,
}

impl GuvnorResolver {
    /// Create a resolver talking to the configured server over HTTP
    pub fn new(config: &GuvnorConfig) -> Result<Self> {
        Ok(Self::from_client(config, RepositoryClient::new(config)?))
    }

    /// Create a resolver over a caller-supplied transport
    pub fn with_transport(config: &GuvnorConfig, transport: Box<dyn Transport>) -> Result<Self> {
        Ok(Self::from_client(
            config,
            RepositoryClient::with_transport(config, transport)?,
        ))
    }

    fn from_client(config: &GuvnorConfig, client: RepositoryClient) -> Self {
        Self {
            client,
            urls: GuvnorUrls::new(config),
            allow_list: config.allowed_packages(),
        }
    }

    pub fn urls(&self) -> &GuvnorUrls {
        &self.urls
    }

    // ------------------------------------------------------------------
    // Packages
    // ------------------------------------------------------------------

    /// Every package the server lists, unfiltered
    pub fn try_all_packages(&self) -> Result<Vec<Package>> {
        let xml = self.client.fetch_text(&self.urls.packages())?;
        Ok(scan_packages(&xml)?)
    }

    /// Allow-listed packages, failing on transport or parse errors
    pub fn try_list_packages(&self) -> Result<Vec<Package>> {
        let packages = self.try_all_packages()?;
        Ok(filter_packages(packages, self.allow_list.as_deref()))
    }

    /// Allow-listed packages; empty when the server cannot be read
    pub fn list_packages(&self) -> Vec<Package> {
        self.try_list_packages().unwrap_or_else(|e| {
            error!("Error retrieving packages from guvnor: {}", e);
            Vec::new()
        })
    }

    /// Titles of the allow-listed packages
    pub fn package_names(&self) -> Vec<String> {
        let names = match self.try_all_packages() {
            Ok(packages) => packages.into_iter().map(|p| p.title).collect(),
            Err(e) => {
                error!("Error retrieving packages from guvnor: {}", e);
                Vec::new()
            }
        };
        filter_package_names(names, self.allow_list.as_deref())
    }

    /// Whether the package binary can be fetched (HTTP 200)
    pub fn can_build_package(&self, package: &str) -> bool {
        self.client.exists(&self.urls.binary(package), ACCEPT_DEFAULT)
    }

    /// Allow-listed packages that have a built binary
    pub fn built_packages(&self) -> Vec<Package> {
        self.list_packages()
            .into_iter()
            .filter(|pkg| {
                let buildable = self.can_build_package(&pkg.title);
                if !buildable {
                    info!("Excluding package: {} because it cannot be built.", pkg.title);
                }
                buildable
            })
            .collect()
    }

    /// Names of the allow-listed packages that have a built binary
    pub fn built_package_names(&self) -> Vec<String> {
        self.package_names()
            .into_iter()
            .filter(|name| {
                let buildable = self.can_build_package(name);
                if !buildable {
                    info!("Excluding package: {} because it cannot be built.", name);
                }
                buildable
            })
            .collect()
    }

    /// Whether the server answers the package listing with 200
    pub fn guvnor_exists(&self) -> bool {
        match self.client.status(&self.urls.packages(), ACCEPT_ATOM) {
            Ok(status) => status == 200,
            Err(e) => {
                error!("Error checking guvnor existence: {}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Processes
    // ------------------------------------------------------------------

    /// Titles of the bpmn/bpmn2 assets in a package
    pub fn try_processes_in(&self, package: &str) -> Result<Vec<String>> {
        let xml = self.client.fetch_text(&self.urls.assets(package))?;
        Ok(scan_processes(&xml)?)
    }

    pub fn processes_in(&self, package: &str) -> Vec<String> {
        self.try_processes_in(package).unwrap_or_else(|e| {
            error!("Error finding processes in package {}: {}", package, e);
            Vec::new()
        })
    }

    /// Raw source of an asset; empty when it cannot be fetched
    pub fn process_source(&self, package: &str, asset: &str) -> String {
        self.client
            .fetch_text(&self.urls.asset_source(package, asset))
            .unwrap_or_else(|e| {
                error!("Error retrieving asset content: {}", e);
                String::new()
            })
    }

    /// Locate the diagram image of the process whose definition has
    /// `id="<process_id>"`
    ///
    /// Every process source of every allow-listed package is searched in
    /// feed order. A source match is only returned once the image URL
    /// answers 200; otherwise the search continues.
    pub fn find_process_image_url(&self, process_id: &str) -> Option<String> {
        let pattern = match process_id_pattern(process_id) {
            Ok(p) => p,
            Err(e) => {
                error!("Invalid process id pattern for {}: {}", process_id, e);
                return None;
            }
        };

        for pkg in self.package_names() {
            for process in self.processes_in(&pkg) {
                let source = self.process_source(&pkg, &process);
                if !pattern.is_match(&source) {
                    continue;
                }

                let image_url = self.urls.process_image(&pkg, process_id);
                match self.client.status(&image_url, ACCEPT_DEFAULT) {
                    Ok(200) => return Some(image_url),
                    Ok(status) => {
                        debug!("Process {} matched in {} but image returned HTTP {}", process_id, pkg, status)
                    }
                    Err(e) => warn!("Could not check process image {}: {}", image_url, e),
                }
            }
        }

        info!("Did not find process image for: {}", process_id);
        None
    }

    /// PNG bytes of a process diagram
    ///
    /// `Ok(None)` when no image exists; `Err` when a located image cannot
    /// be read.
    pub fn process_image(&self, process_id: &str) -> Result<Option<Vec<u8>>> {
        match self.find_process_image_url(process_id) {
            Some(url) => self.client.fetch_bytes(&url).map(Some),
            None => {
                info!("Invalid process image for: {}", process_id);
                Ok(None)
            }
        }
    }

    // ------------------------------------------------------------------
    // Form templates
    // ------------------------------------------------------------------

    /// URL of a form template in the first package that holds the asset
    ///
    /// A transport failure ends the search.
    pub fn form_template_url(&self, template_name: &str, format: &str) -> Option<String> {
        for pkg in self.package_names() {
            let asset_url = self.urls.asset(&pkg, template_name);
            match self.client.status(&asset_url, ACCEPT_ATOM) {
                Ok(200) => return Some(self.urls.form_template(&pkg, template_name, format)),
                Ok(_) => {}
                Err(e) => {
                    error!("Exception returning template url: {}", e);
                    return None;
                }
            }
        }

        info!("Could not find process template url for: {}", template_name);
        None
    }

    /// Content of a form template (default `drl` format)
    pub fn form_template(&self, template_name: &str) -> Option<String> {
        let Some(url) = self.form_template_url(template_name, DEFAULT_TEMPLATE_FORMAT) else {
            info!("Could not get the form template from guvnor");
            return None;
        };

        match self.client.fetch_text(&url) {
            Ok(content) => Some(content),
            Err(e) => {
                error!("Exception getting form template from {}: {}", url, e);
                None
            }
        }
    }

    /// Whether the first package holding `template_name` marks it as a
    /// form template (`flt` format)
    pub fn template_exists(&self, template_name: &str) -> bool {
        for pkg in self.package_names() {
            let asset_url = self.urls.asset(&pkg, template_name);
            let response = match self.client.get(&asset_url, ACCEPT_ATOM) {
                Ok(r) => r,
                Err(e) => {
                    error!("Exception checking template url: {}", e);
                    return false;
                }
            };
            if response.status != 200 {
                continue;
            }

            let xml = String::from_utf8_lossy(&response.body);
            return has_format(&xml, FORM_TEMPLATE_FORMAT).unwrap_or_else(|e| {
                error!("Exception checking template url: {}", e);
                false
            });
        }

        info!("Could not find process template for: {}", template_name);
        false
    }
}

/// Keep packages whose title is allow-listed, in feed order
///
/// No allow-list keeps everything; configured names the server does not
/// know are ignored.
pub fn filter_packages(packages: Vec<Package>, allow_list: Option<&[String]>) -> Vec<Package> {
    let Some(allowed) = allow_list else {
        return packages;
    };
    let allowed: HashSet<&str> = allowed.iter().map(String::as_str).collect();
    packages
        .into_iter()
        .filter(|pkg| allowed.contains(pkg.title.as_str()))
        .collect()
}

/// Name-only counterpart of [`filter_packages`]
pub fn filter_package_names(names: Vec<String>, allow_list: Option<&[String]>) -> Vec<String> {
    let Some(allowed) = allow_list else {
        return names;
    };
    let allowed: HashSet<&str> = allowed.iter().map(String::as_str).collect();
    names
        .into_iter()
        .filter(|name| allowed.contains(name.as_str()))
        .collect()
}

/// `<…process…id="<process_id>"`, matched anywhere in the source
fn process_id_pattern(process_id: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"<\S*process[\s\S]*id="{}""#,
        regex::escape(process_id)
    ))
}
