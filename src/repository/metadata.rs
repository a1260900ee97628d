// src/repository/metadata.rs

//! Repository metadata data structures
//!
//! Records built while scanning Guvnor feeds. They are plain values owned by
//! the caller; nothing is cached between requests.

use std::fmt;

/// Asset formats that identify a process definition
pub const PROCESS_FORMATS: [&str; 2] = ["bpmn", "bpmn2"];

/// Asset format of a form template
pub const FORM_TEMPLATE_FORMAT: &str = "flt";

/// Title of the feed-level wrapper entry, never a real package
pub const FEED_SENTINEL_TITLE: &str = "Packages";

/// A package as listed by `/rest/packages/`
///
/// The title is the package identity: it is what allow-lists match against
/// and what goes into request URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub uuid: String,
    pub title: String,
    pub archived: bool,
}

impl Package {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether this record is the feed wrapper rather than a package
    pub fn is_feed_sentinel(&self) -> bool {
        self.title.eq_ignore_ascii_case(FEED_SENTINEL_TITLE)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if self.archived {
            write!(f, " (archived)")?;
        }
        Ok(())
    }
}

/// Whether an asset format names a process definition
pub fn is_process_format(format: &str) -> bool {
    PROCESS_FORMATS.contains(&format.trim())
}
