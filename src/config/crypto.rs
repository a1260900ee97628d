// src/config/crypto.rs

//! Password-based encryption for the repository password
//!
//! Encrypted passwords use the layout produced by Jasypt's
//! `StandardPBEStringEncryptor` configured with `PBEWithMD5AndTripleDES`:
//!
//! ```text
//! base64( salt[8] || 3DES-EDE3-CBC(PKCS#7(plaintext)) )
//! ```
//!
//! The 24-byte key and 8-byte IV come from the PBES1-style derivation used by
//! the JCE provider for this algorithm: each salt half is hashed together with
//! the key text, MD5 iterated `iterations` times, and the two 16-byte digests
//! are concatenated. When both salt halves are equal the first half is
//! reversed before hashing.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use md5::{Digest, Md5};
use rand::RngCore;
use thiserror::Error;

type TdesCbcDec = cbc::Decryptor<des::TdesEde3>;
type TdesCbcEnc = cbc::Encryptor<des::TdesEde3>;

/// Salt length, equal to the DES block size
pub const SALT_LEN: usize = 8;

/// Iteration count used by Jasypt's standard encryptor
pub const DEFAULT_ITERATIONS: u32 = 1000;

const BLOCK_LEN: usize = 8;
const KEY_LEN: usize = 24;

/// Cipher failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encrypted value is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("encrypted value is too short ({0} bytes)")]
    TooShort(usize),

    #[error("ciphertext length {0} is not a multiple of the block size")]
    InvalidLength(usize),

    #[error("bad padding (wrong key?)")]
    BadPadding,

    #[error("decrypted password is not valid UTF-8")]
    InvalidUtf8,

    #[error("cipher initialization failed")]
    Init,

    #[error("key contains characters outside printable ASCII")]
    InvalidKey,
}

/// PBEWithMD5AndTripleDES string cipher keyed by a secret text
pub struct PbeCipher {
    secret: Vec<u8>,
    iterations: u32,
}

impl PbeCipher {
    /// Create a cipher using the default iteration count
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Override the iteration count (minimum 1)
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Decrypt a base64 `salt || ciphertext` value
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let raw = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;

        if raw.len() < SALT_LEN + BLOCK_LEN {
            return Err(CryptoError::TooShort(raw.len()));
        }

        let secret = self.key_bytes()?;
        let (salt, ciphertext) = raw.split_at(SALT_LEN);
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CryptoError::InvalidLength(ciphertext.len()));
        }

        let mut salt_arr = [0u8; SALT_LEN];
        salt_arr.copy_from_slice(salt);
        let (key, iv) = derive_key_iv(secret, &salt_arr, self.iterations);

        let decryptor = TdesCbcDec::new_from_slices(&key, &iv).map_err(|_| CryptoError::Init)?;
        let mut buf = ciphertext.to_vec();
        let plain = decryptor
            .decrypt_padded_mut::<Pkcs7>(&mut buf)
            .map_err(|_| CryptoError::BadPadding)?;

        String::from_utf8(plain.to_vec()).map_err(|_| CryptoError::InvalidUtf8)
    }

    /// Encrypt with a fresh random salt
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        self.encrypt_with_salt(plaintext, &salt)
    }

    /// Encrypt with a caller-supplied salt
    pub fn encrypt_with_salt(
        &self,
        plaintext: &str,
        salt: &[u8; SALT_LEN],
    ) -> Result<String, CryptoError> {
        let (key, iv) = derive_key_iv(self.key_bytes()?, salt, self.iterations);
        let encryptor = TdesCbcEnc::new_from_slices(&key, &iv).map_err(|_| CryptoError::Init)?;

        let msg = plaintext.as_bytes();
        let padded_len = (msg.len() / BLOCK_LEN + 1) * BLOCK_LEN;
        let mut buf = vec![0u8; padded_len];
        buf[..msg.len()].copy_from_slice(msg);
        let ciphertext = encryptor
            .encrypt_padded_mut::<Pkcs7>(&mut buf, msg.len())
            .map_err(|_| CryptoError::Init)?;

        let mut out = Vec::with_capacity(SALT_LEN + ciphertext.len());
        out.extend_from_slice(salt);
        out.extend_from_slice(ciphertext);
        Ok(STANDARD.encode(out))
    }

    /// The JCE PBE key only admits printable ASCII (0x20..=0x7E)
    fn key_bytes(&self) -> Result<&[u8], CryptoError> {
        if self.secret.iter().all(|b| (0x20..=0x7e).contains(b)) {
            Ok(&self.secret)
        } else {
            Err(CryptoError::InvalidKey)
        }
    }
}

fn derive_key_iv(
    secret: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> ([u8; KEY_LEN], [u8; BLOCK_LEN]) {
    let mut salt = *salt;
    if salt[..4] == salt[4..] {
        salt.swap(0, 3);
        salt.swap(1, 2);
    }

    let mut derived = [0u8; KEY_LEN + BLOCK_LEN];
    for (half, chunk) in salt.chunks(SALT_LEN / 2).enumerate() {
        let mut digest = chunk.to_vec();
        for _ in 0..iterations {
            let mut md = Md5::new();
            md.update(&digest);
            md.update(secret);
            digest = md.finalize().to_vec();
        }
        derived[half * 16..(half + 1) * 16].copy_from_slice(&digest);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; BLOCK_LEN];
    key.copy_from_slice(&derived[..KEY_LEN]);
    iv.copy_from_slice(&derived[KEY_LEN..]);
    (key, iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Produced independently with the same PBES1/3DES construction
    const KNOWN_VALUE: &str = "AQIDBAUGBwhKnlBHHfy1vZqzuFvG7CpR";
    const KNOWN_EQUAL_HALVES: &str = "CQkJCQkJCQkYsyW+EkW5Ti2/oIUSWYMj";

    #[test]
    fn test_decrypt_known_value() {
        let cipher = PbeCipher::new("s3cr3t-key");
        assert_eq!(cipher.decrypt(KNOWN_VALUE).unwrap(), "guvnor-pass");
    }

    #[test]
    fn test_decrypt_equal_salt_halves() {
        let cipher = PbeCipher::new("s3cr3t-key");
        assert_eq!(cipher.decrypt(KNOWN_EQUAL_HALVES).unwrap(), "se<cr>et");
    }

    #[test]
    fn test_encrypt_with_salt_matches_known_value() {
        let cipher = PbeCipher::new("s3cr3t-key");
        let encoded = cipher
            .encrypt_with_salt("guvnor-pass", &[1, 2, 3, 4, 5, 6, 7, 8])
            .unwrap();
        assert_eq!(encoded, KNOWN_VALUE);
    }

    #[test]
    fn test_random_salt_decrypts() {
        let cipher = PbeCipher::new("another key");
        let encoded = cipher.encrypt("p@ss word").unwrap();
        assert_eq!(cipher.decrypt(&encoded).unwrap(), "p@ss word");
    }

    #[test]
    fn test_iteration_count_changes_derivation() {
        let salt = [1, 2, 3, 4, 5, 6, 7, 8];
        let single = PbeCipher::new("s3cr3t-key").with_iterations(1);
        let encoded = single.encrypt_with_salt("guvnor-pass", &salt).unwrap();
        assert_ne!(encoded, KNOWN_VALUE);
        assert_eq!(single.decrypt(&encoded).unwrap(), "guvnor-pass");

        // zero is raised to one
        let zero = PbeCipher::new("s3cr3t-key").with_iterations(0);
        assert_eq!(zero.encrypt_with_salt("guvnor-pass", &salt).unwrap(), encoded);
    }

    #[test]
    fn test_non_ascii_key_rejected() {
        let cipher = PbeCipher::new("schl\u{fc}ssel");
        assert_eq!(cipher.decrypt(KNOWN_VALUE), Err(CryptoError::InvalidKey));
        assert_eq!(cipher.encrypt("x"), Err(CryptoError::InvalidKey));

        let tab = PbeCipher::new("s3cr3t\tkey");
        assert_eq!(tab.decrypt(KNOWN_VALUE), Err(CryptoError::InvalidKey));
    }

    #[test]
    fn test_decrypt_rejects_garbage() {
        let cipher = PbeCipher::new("s3cr3t-key");
        assert!(matches!(
            cipher.decrypt("not base64!!"),
            Err(CryptoError::InvalidEncoding(_))
        ));
        assert_eq!(cipher.decrypt("AQIDBAUGBwg="), Err(CryptoError::TooShort(8)));
        // salt + 9 bytes of ciphertext
        let odd = STANDARD.encode([0u8; 17]);
        assert_eq!(cipher.decrypt(&odd), Err(CryptoError::InvalidLength(9)));
    }
}
