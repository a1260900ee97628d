// src/commands/processes.rs
//! Process asset commands

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use guvnor_client::{GuvnorConfig, GuvnorResolver};
use tracing::info;

/// List the processes of a package
pub fn cmd_processes(config: &GuvnorConfig, package: &str) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    let processes = resolver.try_processes_in(package)?;

    if processes.is_empty() {
        println!("No processes in package {}", package);
    } else {
        for process in processes {
            println!("{}", process);
        }
    }
    Ok(())
}

/// Print the source of an asset
pub fn cmd_process_source(config: &GuvnorConfig, package: &str, asset: &str) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    let source = resolver.process_source(package, asset);
    if source.is_empty() {
        return Err(anyhow::anyhow!("No source for {}/{}", package, asset));
    }
    print!("{}", source);
    Ok(())
}

/// Print the diagram URL of a process
pub fn cmd_image_url(config: &GuvnorConfig, process_id: &str) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    match resolver.find_process_image_url(process_id) {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => Err(anyhow::anyhow!("No process image found for {}", process_id)),
    }
}

/// Download the diagram of a process
pub fn cmd_image(config: &GuvnorConfig, process_id: &str, output: &Path) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    let bytes = resolver
        .process_image(process_id)?
        .ok_or_else(|| anyhow::anyhow!("No process image found for {}", process_id))?;

    fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {} bytes to {}", bytes.len(), output.display());
    println!("Saved process image to {}", output.display());
    Ok(())
}
