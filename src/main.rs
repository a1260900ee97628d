// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use guvnor_client::GuvnorConfig;
use tracing::debug;

use cli::{Cli, Commands};

fn load_config(cli: &Cli) -> Result<GuvnorConfig> {
    let config = GuvnorConfig::load(&cli.config)?;
    let config = match &cli.pwd_key_file {
        Some(path) => config.with_pwd_key_file(path),
        None => config,
    };
    debug!("Using configuration {:?}", config);
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging; stdout is reserved for output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = || load_config(&cli);

    match &cli.command {
        Commands::EncryptPassword { plaintext } => {
            commands::cmd_encrypt_password(cli.pwd_key_file.as_deref(), plaintext)
        }
        Commands::Ping => commands::cmd_ping(&config()?),
        Commands::Packages { built, names } => commands::cmd_packages(&config()?, *built, *names),
        Commands::Processes { package } => commands::cmd_processes(&config()?, package),
        Commands::ProcessSource { package, asset } => {
            commands::cmd_process_source(&config()?, package, asset)
        }
        Commands::ImageUrl { process_id } => commands::cmd_image_url(&config()?, process_id),
        Commands::Image { process_id, output } => {
            commands::cmd_image(&config()?, process_id, output)
        }
        Commands::TemplateUrl { name, format } => {
            commands::cmd_template_url(&config()?, name, format)
        }
        Commands::Template { name } => commands::cmd_template(&config()?, name),
        Commands::TemplateExists { name } => commands::cmd_template_exists(&config()?, name),
        Commands::CanBuild { package } => commands::cmd_can_build(&config()?, package),
        Commands::Changeset {
            packages,
            template,
            output,
        } => commands::cmd_changeset(&config()?, packages.clone(), template.clone(), output.clone()),
    }
}
