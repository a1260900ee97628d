// src/commands/password.rs
//! Password encryption command

use std::path::Path;

use anyhow::Result;
use guvnor_client::PbeCipher;
use guvnor_client::config::read_key_file;

/// Print the encrypted form of `plaintext` for use as `pwd` with `pwd_enc = true`
pub fn cmd_encrypt_password(key_file: Option<&Path>, plaintext: &str) -> Result<()> {
    let key_file = key_file.ok_or_else(|| {
        anyhow::anyhow!("--pwd-key-file (or GUVNOR_PWD_KEY_FILE) is required to encrypt")
    })?;
    let key = read_key_file(key_file)?;
    let encrypted = PbeCipher::new(&key)
        .encrypt(plaintext)
        .map_err(|e| anyhow::anyhow!("Encryption failed: {}", e))?;
    println!("{}", encrypted);
    Ok(())
}
