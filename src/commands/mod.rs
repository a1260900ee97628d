// src/commands/mod.rs
//! Command handlers for the Guvnor client CLI

mod changeset;
mod packages;
mod password;
mod processes;
mod templates;

// Re-export all command handlers
pub use changeset::cmd_changeset;
pub use packages::{cmd_can_build, cmd_packages, cmd_ping};
pub use password::cmd_encrypt_password;
pub use processes::{cmd_image, cmd_image_url, cmd_process_source, cmd_processes};
pub use templates::{cmd_template, cmd_template_exists, cmd_template_url};
