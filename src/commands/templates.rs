// src/commands/templates.rs
//! Form template commands

use anyhow::Result;
use guvnor_client::{GuvnorConfig, GuvnorResolver};

pub fn cmd_template_url(config: &GuvnorConfig, name: &str, format: &str) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    match resolver.form_template_url(name, format) {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => Err(anyhow::anyhow!("No form template named {}", name)),
    }
}

pub fn cmd_template(config: &GuvnorConfig, name: &str) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    match resolver.form_template(name) {
        Some(content) => {
            print!("{}", content);
            Ok(())
        }
        None => Err(anyhow::anyhow!("Could not fetch form template {}", name)),
    }
}

pub fn cmd_template_exists(config: &GuvnorConfig, name: &str) -> Result<()> {
    let resolver = GuvnorResolver::new(config)?;
    if resolver.template_exists(name) {
        println!("{}: form template", name);
    } else {
        println!("{}: not a form template", name);
    }
    Ok(())
}
