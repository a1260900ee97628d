// src/cli/mod.rs
//! CLI definitions for the Guvnor client
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Commands:
//! - `ping` - Check that the repository answers
//! - `packages` - List (allow-listed, optionally built) packages
//! - `processes` / `process-source` - Inspect process assets of a package
//! - `image-url` / `image` - Locate or download a process diagram
//! - `template-url` / `template` / `template-exists` - Form templates
//! - `can-build` - Check whether a package binary exists
//! - `changeset` - Render a change-set document
//! - `encrypt-password` - Produce an encrypted `pwd` value

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "guvnor-client")]
#[command(author, version, about = "Query a Guvnor rules repository and generate change sets", long_about = None)]
pub struct Cli {
    /// Connection settings file (TOML, `[guvnor]` table)
    #[arg(short, long, global = true, env = "GUVNOR_CONFIG", default_value = "guvnor.toml")]
    pub config: PathBuf,

    /// File holding the key used to decrypt an encrypted password
    #[arg(long, global = true, env = "GUVNOR_PWD_KEY_FILE", value_name = "PATH")]
    pub pwd_key_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the repository answers the package listing
    Ping,

    /// List packages (allow-list applied)
    Packages {
        /// Only packages with a built binary
        #[arg(long)]
        built: bool,

        /// Print package names only
        #[arg(long)]
        names: bool,
    },

    /// List the process definitions (bpmn/bpmn2 assets) of a package
    Processes {
        /// Package name
        package: String,
    },

    /// Print the source of an asset
    ProcessSource {
        /// Package name
        package: String,

        /// Asset name
        asset: String,
    },

    /// Print the diagram URL of a process
    ImageUrl {
        /// Process id, as in the definition's `id` attribute
        process_id: String,
    },

    /// Download the diagram of a process
    Image {
        /// Process id, as in the definition's `id` attribute
        process_id: String,

        /// Destination file for the PNG
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the URL of a form template
    TemplateUrl {
        /// Template name
        name: String,

        /// Format suffix of the template URL
        #[arg(short, long, default_value = "drl")]
        format: String,
    },

    /// Print the content of a form template
    Template {
        /// Template name
        name: String,
    },

    /// Check whether an asset is a form template (flt)
    TemplateExists {
        /// Template name
        name: String,
    },

    /// Check whether a package binary can be fetched
    CanBuild {
        /// Package name
        package: String,
    },

    /// Render a change set for packages (built packages when none are given)
    Changeset {
        /// Package names
        packages: Vec<String>,

        /// Template file to use instead of the embedded one
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Encrypt a password with the key from --pwd-key-file
    EncryptPassword {
        /// Plain-text password
        plaintext: String,
    },
}
