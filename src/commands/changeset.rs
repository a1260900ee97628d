// src/commands/changeset.rs
//! Change-set generation command

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use guvnor_client::{ChangeSetGenerator, GuvnorConfig, GuvnorResolver, TemplateSource};
use tracing::info;

/// Render a change set
///
/// With no package names the built packages of the repository are used.
pub fn cmd_changeset(
    config: &GuvnorConfig,
    packages: Vec<String>,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let (count, document) =
        render_changeset(config, packages, template, || GuvnorResolver::new(config))?;

    match output {
        Some(path) => {
            fs::write(&path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Wrote change set for {} package(s) to {}",
                count,
                path.display()
            );
        }
        None => print!("{}", document),
    }
    Ok(())
}

/// Resolve the package list and render the document
///
/// `resolver` is only invoked when no packages were given.
fn render_changeset<F>(
    config: &GuvnorConfig,
    packages: Vec<String>,
    template: Option<PathBuf>,
    resolver: F,
) -> Result<(usize, String)>
where
    F: FnOnce() -> guvnor_client::Result<GuvnorResolver>,
{
    let packages = if packages.is_empty() {
        info!("No packages given, using built packages");
        resolver()?.built_package_names()
    } else {
        packages
    };

    let source = template.map(TemplateSource::File).unwrap_or_default();
    let document = ChangeSetGenerator::new(config)?
        .with_template(source)
        .generate(&packages);
    Ok((packages.len(), document))
}
