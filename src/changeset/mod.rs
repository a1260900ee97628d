// src/changeset/mod.rs

//! Change-set document generation
//!
//! A change set tells a knowledge-base builder which packages to load. Each
//! package becomes one resource element pointing at its snapshot in the
//! repository:
//!
//! ```text
//! <resource source="{base}/org.drools.guvnor.Guvnor/package/{pkg}/{snapshot}" type="PKG" />
//! ```
//!
//! When both a user name and a password are configured the element also
//! carries `basicAuthentication="enabled"` and XML-escaped credentials.

use std::fs;
use std::path::PathBuf;

use quick_xml::escape::escape;
use tracing::{debug, error};

use crate::config::GuvnorConfig;
use crate::error::{Error, Result};
use crate::repository::GuvnorUrls;

/// Placeholder replaced by the resource elements
pub const DATA_PLACEHOLDER: &str = "$data$";

/// Template shipped with the crate
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/changeset.st");

/// Where the change-set template comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    #[default]
    Embedded,
    File(PathBuf),
}

impl TemplateSource {
    pub fn load(&self) -> Result<String> {
        match self {
            Self::Embedded => Ok(DEFAULT_TEMPLATE.to_string()),
            Self::File(path) => fs::read_to_string(path).map_err(|e| {
                Error::TemplateError(format!("Failed to read {}: {e}", path.display()))
            }),
        }
    }
}

/// Renders change-set documents for a fixed connection
pub struct ChangeSetGenerator {
    urls: GuvnorUrls,
    credentials: Option<(String, String)>,
    template: TemplateSource,
}

impl ChangeSetGenerator {
    /// Fails only when the configured password cannot be resolved
    pub fn new(config: &GuvnorConfig) -> Result<Self> {
        let user = config.user();
        let password = config.password()?;
        let credentials = if user.trim().is_empty() || password.trim().is_empty() {
            None
        } else {
            Some((user, password))
        };

        Ok(Self {
            urls: GuvnorUrls::new(config),
            credentials,
            template: TemplateSource::Embedded,
        })
    }

    pub fn with_template(mut self, template: TemplateSource) -> Self {
        self.template = template;
        self
    }

    /// Resource element for one package
    pub fn resource_entry(&self, package: &str) -> String {
        let mut entry = format!(
            r#"<resource source="{}" type="PKG""#,
            self.urls.package_resource(package)
        );
        if let Some((user, password)) = &self.credentials {
            entry.push_str(&format!(
                r#" basicAuthentication="enabled" username="{}" password="{}""#,
                escape(user.as_str()),
                escape(password.as_str())
            ));
        }
        entry.push_str(" />");
        entry
    }

    /// Render the full document for `packages`
    ///
    /// An unreadable template yields an empty document.
    pub fn generate<S: AsRef<str>>(&self, packages: &[S]) -> String {
        let template = match self.template.load() {
            Ok(t) => t,
            Err(e) => {
                error!("Exception creating changeset: {}", e);
                return String::new();
            }
        };

        let entries: Vec<String> = packages
            .iter()
            .map(|pkg| self.resource_entry(pkg.as_ref()))
            .collect();
        debug!("Rendering change set with {} resources", entries.len());

        render_template(&template, &entries)
    }
}

/// Substitute `$data$` with `entries`, one per line, each indented like the
/// placeholder's line
pub fn render_template(template: &str, entries: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    for line in template.split_inclusive('\n') {
        if line.contains(DATA_PLACEHOLDER) {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            let joined = entries.join(&format!("\n{indent}"));
            out.push_str(&line.replace(DATA_PLACEHOLDER, &joined));
        } else {
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config(user: &str, password: &str) -> GuvnorConfig {
        GuvnorConfig::from_pairs([
            ("protocol", "http"),
            ("host", "localhost:8080"),
            ("subdomain", "jbpm-console"),
            ("usr", user),
            ("pwd", password),
        ])
    }

    #[test]
    fn test_resources_without_credentials() {
        let generator = ChangeSetGenerator::new(&config("", "")).unwrap();
        let doc = generator.generate(&["p1", "p2"]);

        assert_eq!(doc.matches("<resource ").count(), 2);
        assert_eq!(doc.matches(r#"type="PKG" />"#).count(), 2);
        assert!(!doc.contains("basicAuthentication"));
        assert!(doc.contains(
            r#"source="http://localhost:8080/jbpm-console/org.drools.guvnor.Guvnor/package/p1/LATEST""#
        ));
        assert!(doc.contains(
            r#"source="http://localhost:8080/jbpm-console/org.drools.guvnor.Guvnor/package/p2/LATEST""#
        ));
    }

    #[test]
    fn test_credentials_are_escaped() {
        let generator = ChangeSetGenerator::new(&config("bob", "se<cr>et")).unwrap();
        let entry = generator.resource_entry("p1");
        assert!(entry.contains(r#"basicAuthentication="enabled""#));
        assert!(entry.contains(r#"username="bob""#));
        assert!(entry.contains(r#"password="se&lt;cr&gt;et""#));
    }

    #[test]
    fn test_credentials_need_both_values() {
        let generator = ChangeSetGenerator::new(&config("bob", "")).unwrap();
        assert!(!generator.resource_entry("p1").contains("basicAuthentication"));

        let generator = ChangeSetGenerator::new(&config("  ", "secret")).unwrap();
        assert!(!generator.resource_entry("p1").contains("basicAuthentication"));
    }

    #[test]
    fn test_render_template_indents_entries() {
        let template = "<add>\n    $data$\n</add>\n";
        let rendered = render_template(template, &["<a />".to_string(), "<b />".to_string()]);
        assert_eq!(rendered, "<add>\n    <a />\n    <b />\n</add>\n");

        assert_eq!(render_template(template, &[]), "<add>\n    \n</add>\n");
    }

    #[test]
    fn test_custom_template_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<custom>$data$</custom>").unwrap();

        let generator = ChangeSetGenerator::new(&config("", ""))
            .unwrap()
            .with_template(TemplateSource::File(file.path().to_path_buf()));
        let doc = generator.generate(&["p1"]);
        assert!(doc.starts_with("<custom><resource "));
        assert!(doc.ends_with(" /></custom>"));
    }

    #[test]
    fn test_missing_template_gives_empty_document() {
        let generator = ChangeSetGenerator::new(&config("", ""))
            .unwrap()
            .with_template(TemplateSource::File(PathBuf::from("/nonexistent/changeset.st")));
        assert_eq!(generator.generate(&["p1"]), "");
    }

    #[test]
    fn test_embedded_template_has_placeholder() {
        assert!(DEFAULT_TEMPLATE.contains(DATA_PLACEHOLDER));
        assert!(DEFAULT_TEMPLATE.contains("<change-set"));
    }
}
