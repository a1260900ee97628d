// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: package name
fn package_arg() -> Arg {
    Arg::new("package").required(true).help("Package name")
}

/// Common argument: process id
fn process_id_arg() -> Arg {
    Arg::new("process_id")
        .required(true)
        .help("Process id, as in the definition's id attribute")
}

/// Common argument: template name
fn template_name_arg() -> Arg {
    Arg::new("name").required(true).help("Template name")
}

fn build_cli() -> Command {
    Command::new("guvnor-client")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Guvnor Client Contributors")
        .about("Query a Guvnor rules repository and generate change sets")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .default_value("guvnor.toml")
                .help("Connection settings file (env: GUVNOR_CONFIG)"),
        )
        .arg(
            Arg::new("pwd_key_file")
                .long("pwd-key-file")
                .value_name("PATH")
                .help("Key file for an encrypted password (env: GUVNOR_PWD_KEY_FILE)"),
        )
        .subcommand(Command::new("ping").about("Check that the repository answers the package listing"))
        .subcommand(
            Command::new("packages")
                .about("List packages (allow-list applied)")
                .arg(
                    Arg::new("built")
                        .long("built")
                        .action(clap::ArgAction::SetTrue)
                        .help("Only packages with a built binary"),
                )
                .arg(
                    Arg::new("names")
                        .long("names")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print package names only"),
                ),
        )
        .subcommand(
            Command::new("processes")
                .about("List the process definitions of a package")
                .arg(package_arg()),
        )
        .subcommand(
            Command::new("process-source")
                .about("Print the source of an asset")
                .arg(package_arg())
                .arg(Arg::new("asset").required(true).help("Asset name")),
        )
        .subcommand(
            Command::new("image-url")
                .about("Print the diagram URL of a process")
                .arg(process_id_arg()),
        )
        .subcommand(
            Command::new("image")
                .about("Download the diagram of a process")
                .arg(process_id_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .required(true)
                        .help("Destination file for the PNG"),
                ),
        )
        .subcommand(
            Command::new("template-url")
                .about("Print the URL of a form template")
                .arg(template_name_arg())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .default_value("drl")
                        .help("Format suffix of the template URL"),
                ),
        )
        .subcommand(
            Command::new("template")
                .about("Print the content of a form template")
                .arg(template_name_arg()),
        )
        .subcommand(
            Command::new("template-exists")
                .about("Check whether an asset is a form template (flt)")
                .arg(template_name_arg()),
        )
        .subcommand(
            Command::new("can-build")
                .about("Check whether a package binary can be fetched")
                .arg(package_arg()),
        )
        .subcommand(
            Command::new("changeset")
                .about("Render a change set (built packages when none are given)")
                .arg(Arg::new("packages").num_args(0..).help("Package names"))
                .arg(
                    Arg::new("template")
                        .short('t')
                        .long("template")
                        .help("Template file to use instead of the embedded one"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write the document here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("encrypt-password")
                .about("Encrypt a password with the key from --pwd-key-file")
                .arg(Arg::new("plaintext").required(true).help("Plain-text password")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("guvnor-client.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
