// src/config/mod.rs

//! Connection settings for a Guvnor repository
//!
//! Settings live in a TOML file with a single `[guvnor]` table:
//!
//! ```toml
//! [guvnor]
//! protocol = "http"
//! host = "localhost:8080"
//! subdomain = "drools-guvnor"
//! usr = "admin"
//! pwd = "admin"
//! # pwd_enc = true        # pwd holds an encrypted value
//! packages = "defaultPackage, mortgages"
//! connect_timeout = 10000
//! read_timeout = 10000
//! snapshot_name = "LATEST"
//! ```
//!
//! Every key has a fixed fallback (see [`ConfigKey::default_value`]). Values
//! are read as trimmed strings; a value made only of whitespace counts as
//! absent. The configuration is loaded once and never mutated; components
//! receive it explicitly.

pub mod crypto;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
pub use crypto::{CryptoError, PbeCipher};

/// Environment variable naming the file that holds the password key
pub const PWD_KEY_FILE_ENV: &str = "GUVNOR_PWD_KEY_FILE";

/// Known configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Protocol,
    Host,
    Subdomain,
    User,
    Password,
    PasswordEncrypted,
    Packages,
    ConnectTimeout,
    ReadTimeout,
    SnapshotName,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 10] = [
        ConfigKey::Protocol,
        ConfigKey::Host,
        ConfigKey::Subdomain,
        ConfigKey::User,
        ConfigKey::Password,
        ConfigKey::PasswordEncrypted,
        ConfigKey::Packages,
        ConfigKey::ConnectTimeout,
        ConfigKey::ReadTimeout,
        ConfigKey::SnapshotName,
    ];

    /// Key name inside the `[guvnor]` table
    pub fn name(self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::Host => "host",
            Self::Subdomain => "subdomain",
            Self::User => "usr",
            Self::Password => "pwd",
            Self::PasswordEncrypted => "pwd_enc",
            Self::Packages => "packages",
            Self::ConnectTimeout => "connect_timeout",
            Self::ReadTimeout => "read_timeout",
            Self::SnapshotName => "snapshot_name",
        }
    }

    /// Fallback used when the key is absent or blank
    pub fn default_value(self) -> &'static str {
        match self {
            Self::ConnectTimeout | Self::ReadTimeout => "10000",
            Self::SnapshotName => "LATEST",
            Self::PasswordEncrypted => "false",
            _ => "",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    guvnor: BTreeMap<String, toml::Value>,
}

/// Immutable Guvnor connection settings
#[derive(Clone, Default)]
pub struct GuvnorConfig {
    values: BTreeMap<String, String>,
    pwd_key_file: Option<PathBuf>,
}

impl GuvnorConfig {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        let values = file
            .guvnor
            .iter()
            .map(|(k, v)| (k.clone(), render_value(v)))
            .collect();

        Ok(Self {
            values,
            pwd_key_file: None,
        })
    }

    /// Build settings from key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            pwd_key_file: None,
        }
    }

    /// Set the file holding the key for an encrypted password
    pub fn with_pwd_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.pwd_key_file = Some(path.into());
        self
    }

    pub fn pwd_key_file(&self) -> Option<&Path> {
        self.pwd_key_file.as_deref()
    }

    /// Trimmed value for `key`, or its default when absent or blank
    pub fn get(&self, key: ConfigKey) -> String {
        match self.values.get(key.name()) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => key.default_value().to_string(),
        }
    }

    pub fn protocol(&self) -> String {
        self.get(ConfigKey::Protocol)
    }

    /// Host with one leading and one trailing slash removed
    pub fn host(&self) -> String {
        let host = self.get(ConfigKey::Host);
        let host = host.strip_prefix('/').unwrap_or(&host);
        let host = host.strip_suffix('/').unwrap_or(host);
        host.to_string()
    }

    pub fn subdomain(&self) -> String {
        self.get(ConfigKey::Subdomain)
    }

    pub fn user(&self) -> String {
        self.get(ConfigKey::User)
    }

    pub fn snapshot_name(&self) -> String {
        self.get(ConfigKey::SnapshotName)
    }

    pub fn password_encrypted(&self) -> bool {
        self.get(ConfigKey::PasswordEncrypted)
            .eq_ignore_ascii_case("true")
    }

    /// Repository password, decrypted when `pwd_enc` is set
    ///
    /// Fails with [`Error::MissingSetting`] when the password is encrypted but
    /// no key file was supplied, and with [`Error::DecryptionError`] when the
    /// key file cannot be read or the value does not decrypt.
    pub fn password(&self) -> Result<String> {
        let pwd = self.get(ConfigKey::Password);
        if !self.password_encrypted() {
            return Ok(pwd);
        }

        let key_file = self.pwd_key_file().ok_or_else(|| {
            Error::MissingSetting(format!(
                "{PWD_KEY_FILE_ENV} (required when {} is true)",
                ConfigKey::PasswordEncrypted
            ))
        })?;

        let key = read_key_file(key_file)?;
        PbeCipher::new(&key)
            .decrypt(&pwd)
            .map_err(|e| Error::DecryptionError(e.to_string()))
    }

    /// Configured package allow-list, if any
    ///
    /// Names are separated by commas; whitespace after a comma is ignored.
    pub fn allowed_packages(&self) -> Option<Vec<String>> {
        let raw = self.get(ConfigKey::Packages);
        if raw.is_empty() {
            return None;
        }
        Some(
            raw.split(',')
                .map(|name| name.trim_start().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }

    pub fn connect_timeout(&self) -> Result<Duration> {
        self.timeout(ConfigKey::ConnectTimeout)
    }

    pub fn read_timeout(&self) -> Result<Duration> {
        self.timeout(ConfigKey::ReadTimeout)
    }

    fn timeout(&self, key: ConfigKey) -> Result<Duration> {
        let raw = self.get(key);
        raw.parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| Error::ConfigError(format!("{key} must be milliseconds, got '{raw}'")))
    }

    /// `{protocol}://{host}/{subdomain}`
    pub fn base_url(&self) -> String {
        format!("{}://{}/{}", self.protocol(), self.host(), self.subdomain())
    }
}

impl fmt::Debug for GuvnorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&str, &str> = self
            .values
            .iter()
            .map(|(k, v)| {
                let shown = if k == ConfigKey::Password.name() { "***" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();
        f.debug_struct("GuvnorConfig")
            .field("values", &redacted)
            .field("pwd_key_file", &self.pwd_key_file)
            .finish()
    }
}

/// Read a password key file, dropping line breaks
pub fn read_key_file(path: &Path) -> Result<String> {
    let key = fs::read_to_string(path).map_err(|e| {
        Error::DecryptionError(format!("cannot read key file {}: {e}", path.display()))
    })?;
    Ok(key.replace(['\n', '\r'], ""))
}

fn render_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = GuvnorConfig::default();
        assert_eq!(config.get(ConfigKey::ConnectTimeout), "10000");
        assert_eq!(config.get(ConfigKey::ReadTimeout), "10000");
        assert_eq!(config.get(ConfigKey::SnapshotName), "LATEST");
        assert_eq!(config.get(ConfigKey::PasswordEncrypted), "false");
        assert_eq!(config.get(ConfigKey::Host), "");
        assert_eq!(config.connect_timeout().unwrap(), Duration::from_millis(10000));
        assert!(config.allowed_packages().is_none());
    }

    #[test]
    fn test_blank_value_falls_back() {
        let config = GuvnorConfig::from_pairs([("snapshot_name", "   "), ("usr", "  bob ")]);
        assert_eq!(config.snapshot_name(), "LATEST");
        assert_eq!(config.user(), "bob");
    }

    #[test]
    fn test_host_strips_one_slash_each_side() {
        let config = GuvnorConfig::from_pairs([("host", "/localhost:8080/")]);
        assert_eq!(config.host(), "localhost:8080");

        let config = GuvnorConfig::from_pairs([("host", "//localhost//")]);
        assert_eq!(config.host(), "/localhost/");
    }

    #[test]
    fn test_from_toml_renders_scalars() {
        let config = GuvnorConfig::from_toml_str(
            r#"
            [guvnor]
            protocol = "https"
            host = "guvnor.example.com"
            subdomain = "drools-guvnor"
            connect_timeout = 2500
            pwd_enc = false
            packages = ["a", "b"]
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "https://guvnor.example.com/drools-guvnor");
        assert_eq!(config.connect_timeout().unwrap(), Duration::from_millis(2500));
        assert!(!config.password_encrypted());
        assert_eq!(
            config.allowed_packages(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = GuvnorConfig::from_toml_str("[guvnor\nhost=").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_invalid_timeout() {
        let config = GuvnorConfig::from_pairs([("read_timeout", "soon")]);
        assert!(matches!(config.read_timeout(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_allow_list_split() {
        let config = GuvnorConfig::from_pairs([("packages", " alpha,  beta,gamma ")]);
        assert_eq!(
            config.allowed_packages().unwrap(),
            vec!["alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn test_plain_password() {
        let config = GuvnorConfig::from_pairs([("pwd", " secret ")]);
        assert_eq!(config.password().unwrap(), "secret");
    }

    #[test]
    fn test_encrypted_password_requires_key_file() {
        let config = GuvnorConfig::from_pairs([("pwd", "AQIDBAUGBwhKnlBHHfy1vZqzuFvG7CpR"), ("pwd_enc", "TRUE")]);
        assert!(config.pwd_key_file().is_none());
        assert!(matches!(config.password(), Err(Error::MissingSetting(_))));
    }

    #[test]
    fn test_encrypted_password_with_key_file() {
        let mut key_file = NamedTempFile::new().unwrap();
        write!(key_file, "s3cr3t-\r\nkey\n").unwrap();

        let config = GuvnorConfig::from_pairs([
            ("pwd", "AQIDBAUGBwhKnlBHHfy1vZqzuFvG7CpR"),
            ("pwd_enc", "true"),
        ])
        .with_pwd_key_file(key_file.path());

        assert_eq!(config.pwd_key_file(), Some(key_file.path()));
        assert_eq!(config.password().unwrap(), "guvnor-pass");
    }

    #[test]
    fn test_unreadable_key_file_is_decryption_error() {
        let config = GuvnorConfig::from_pairs([("pwd", "x"), ("pwd_enc", "true")])
            .with_pwd_key_file("/nonexistent/guvnor/key");
        assert!(matches!(config.password(), Err(Error::DecryptionError(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = GuvnorConfig::from_pairs([("pwd", "hunter2")]);
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::from_name(key.name()), Some(key));
        }
        assert_eq!(ConfigKey::from_name("nope"), None);
    }
}
