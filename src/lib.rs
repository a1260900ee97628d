// src/lib.rs

//! Guvnor repository client
//!
//! Queries a Guvnor rules repository over its REST/Atom API to enumerate
//! packages, locate process definitions and their diagrams, resolve form
//! templates, and render a change-set document referencing built packages.
//!
//! # Architecture
//!
//! - Configuration: immutable connection settings loaded once and passed in
//! - Repository: authenticated blocking HTTP plus streaming feed scanners
//! - Resolver: package/process discovery with allow-list filtering
//! - Change sets: one `<resource>` per built package, rendered from a template

pub mod changeset;
pub mod config;
mod error;
pub mod repository;

pub use changeset::{ChangeSetGenerator, TemplateSource};
pub use config::{ConfigKey, GuvnorConfig, PbeCipher};
pub use error::{Error, Result};
pub use repository::{GuvnorResolver, GuvnorUrls, Package, RepositoryClient, Transport};
