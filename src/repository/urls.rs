// src/repository/urls.rs

//! URL construction for Guvnor endpoints

use crate::config::GuvnorConfig;

/// Builds REST and package-resource URLs from the connection settings
///
/// All URLs share the base `{protocol}://{host}/{subdomain}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuvnorUrls {
    base: String,
    snapshot: String,
}

impl GuvnorUrls {
    pub fn new(config: &GuvnorConfig) -> Self {
        Self {
            base: config.base_url(),
            snapshot: config.snapshot_name(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `{base}/rest/packages/`
    pub fn packages(&self) -> String {
        format!("{}/rest/packages/", self.base)
    }

    /// `{base}/rest/packages/{pkg}/assets/`
    pub fn assets(&self, package: &str) -> String {
        format!("{}/rest/packages/{package}/assets/", self.base)
    }

    /// `{base}/rest/packages/{pkg}/assets/{asset}` with the asset name encoded
    pub fn asset(&self, package: &str, asset: &str) -> String {
        format!(
            "{}/rest/packages/{package}/assets/{}",
            self.base,
            urlencoding::encode(asset)
        )
    }

    /// `{base}/rest/packages/{pkg}/assets/{asset}/source/`
    pub fn asset_source(&self, package: &str, asset: &str) -> String {
        format!("{}/rest/packages/{package}/assets/{asset}/source/", self.base)
    }

    /// `{base}/rest/packages/{pkg}/binary`
    pub fn binary(&self, package: &str) -> String {
        format!("{}/rest/packages/{package}/binary", self.base)
    }

    /// `{base}/org.drools.guvnor.Guvnor/package/{pkg}/{snapshot}`
    pub fn package_resource(&self, package: &str) -> String {
        format!(
            "{}/org.drools.guvnor.Guvnor/package/{package}/{}",
            self.base, self.snapshot
        )
    }

    /// Process diagram: `{package_resource}/{processId}-image.png`
    pub fn process_image(&self, package: &str, process_id: &str) -> String {
        format!(
            "{}/{}-image.png",
            self.package_resource(package),
            urlencoding::encode(process_id)
        )
    }

    /// Form template: `{package_resource}/{name}.{format}`
    pub fn form_template(&self, package: &str, name: &str, format: &str) -> String {
        format!(
            "{}/{}.{format}",
            self.package_resource(package),
            urlencoding::encode(name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> GuvnorUrls {
        GuvnorUrls::new(&GuvnorConfig::from_pairs([
            ("protocol", "http"),
            ("host", "/localhost:8080/"),
            ("subdomain", "drools-guvnor"),
        ]))
    }

    #[test]
    fn test_rest_urls() {
        let urls = urls();
        assert_eq!(urls.packages(), "http://localhost:8080/drools-guvnor/rest/packages/");
        assert_eq!(
            urls.assets("mortgages"),
            "http://localhost:8080/drools-guvnor/rest/packages/mortgages/assets/"
        );
        assert_eq!(
            urls.asset_source("mortgages", "Evaluation"),
            "http://localhost:8080/drools-guvnor/rest/packages/mortgages/assets/Evaluation/source/"
        );
        assert_eq!(
            urls.binary("mortgages"),
            "http://localhost:8080/drools-guvnor/rest/packages/mortgages/binary"
        );
    }

    #[test]
    fn test_resource_urls_use_snapshot() {
        let urls = urls();
        assert_eq!(
            urls.package_resource("p1"),
            "http://localhost:8080/drools-guvnor/org.drools.guvnor.Guvnor/package/p1/LATEST"
        );
        assert_eq!(
            urls.process_image("p1", "com.sample.evaluation"),
            "http://localhost:8080/drools-guvnor/org.drools.guvnor.Guvnor/package/p1/LATEST/com.sample.evaluation-image.png"
        );
    }

    #[test]
    fn test_names_are_percent_encoded() {
        let urls = urls();
        assert!(urls.asset("p1", "my form").ends_with("/assets/my%20form"));
        assert!(
            urls.form_template("p1", "my form", "drl")
                .ends_with("/LATEST/my%20form.drl")
        );
    }
}
