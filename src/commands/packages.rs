// src/commands/packages.rs
//! Package listing and presence commands

use anyhow::Result;
use guvnor_client::{GuvnorConfig, GuvnorResolver};
use tracing::info;

/// Check that the repository answers
pub fn cmd_ping(config: &GuvnorConfig) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    let url = resolver.urls().packages();
    if resolver.guvnor_exists() {
        println!("Guvnor is reachable at {}", url);
        Ok(())
    } else {
        Err(anyhow::anyhow!("Guvnor is not reachable at {}", url))
    }
}

/// List packages
pub fn cmd_packages(config: &GuvnorConfig, built: bool, names_only: bool) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    info!("Listing packages from {}", resolver.urls().base());

    if names_only {
        let names = if built {
            resolver.built_package_names()
        } else {
            resolver.package_names()
        };
        for name in names {
            println!("{}", name);
        }
        return Ok(());
    }

    let packages = if built {
        resolver.built_packages()
    } else {
        resolver.list_packages()
    };

    if packages.is_empty() {
        println!("No packages found");
    } else {
        println!("Packages:");
        for pkg in packages {
            println!("  {} [{}]", pkg, pkg.uuid);
        }
    }
    Ok(())
}

/// Check whether a package binary exists
pub fn cmd_can_build(config: &GuvnorConfig, package: &str) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    if resolver.can_build_package(package) {
        println!("{}: buildable", package);
    } else {
        println!("{}: not buildable", package);
    }
    Ok(())
}
