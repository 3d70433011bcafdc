//! Password digests.
//!
//! Two schemes share the credential file:
//!
//! - **Legacy**: a rolling polynomial hash (`h = h * 31 + c`) over the
//!   password bytes in a wrapping `u64`, rendered as lowercase hex. This is
//!   what every existing `users.txt` contains. It is *not* a cryptographic
//!   hash and offers no protection against an attacker who can read the file.
//! - **Argon2**: a salted Argon2id PHC string. PHC strings contain commas, so
//!   they are stored as `argon2:` followed by the hex of the PHC string.
//!
//! Choosing Argon2 is a deliberate behavior change: digests it writes cannot
//! be read by tools that only know the legacy format.

use std::str::FromStr;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{BookVerseError, Result};

const LEGACY_PRIME: u64 = 31;
const ARGON2_PREFIX: &str = "argon2:";
const SALT_LENGTH: usize = 16;

/// Digest scheme used for newly registered credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestScheme {
    #[default]
    Legacy,
    Argon2,
}

impl FromStr for DigestScheme {
    type Err = BookVerseError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(DigestScheme::Legacy),
            "argon2" => Ok(DigestScheme::Argon2),
            _ => Err(BookVerseError::InvalidInput(format!(
                "Unknown digest scheme '{}' (use legacy or argon2)",
                value
            ))),
        }
    }
}

/// Legacy rolling hash.
///
/// Bytes are sign-extended before accumulation so non-ASCII passwords hash
/// the same way they did when the files were first written.
pub fn legacy_digest(password: &str) -> String {
    let hash = password.bytes().fold(0u64, |hash, byte| {
        hash.wrapping_mul(LEGACY_PRIME)
            .wrapping_add(byte as i8 as i64 as u64)
    });
    format!("{:x}", hash)
}

/// Hash `password` with Argon2id and a random salt, in storable form.
pub fn argon2_digest(password: &str) -> Result<String> {
    let mut salt_bytes = Zeroizing::new([0u8; SALT_LENGTH]);
    getrandom::getrandom(&mut salt_bytes[..])
        .map_err(|e| BookVerseError::Digest(format!("Failed to generate salt: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes[..])?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(format!("{}{}", ARGON2_PREFIX, hex::encode(phc)))
}

/// Digest `password` with `scheme`.
pub fn digest(scheme: DigestScheme, password: &str) -> Result<String> {
    match scheme {
        DigestScheme::Legacy => Ok(legacy_digest(password)),
        DigestScheme::Argon2 => argon2_digest(password),
    }
}

/// Check `password` against a stored digest of either scheme.
///
/// A malformed Argon2 value never verifies; it is not an error, so one bad
/// row cannot block logins that match a later row.
pub fn verify(password: &str, stored: &str) -> bool {
    match stored.strip_prefix(ARGON2_PREFIX) {
        Some(encoded) => {
            let Ok(bytes) = hex::decode(encoded) else {
                return false;
            };
            let Ok(phc) = String::from_utf8(bytes) else {
                return false;
            };
            let Ok(parsed) = PasswordHash::new(&phc) else {
                return false;
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        }
        None => legacy_digest(password) == stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_digest_known_values() {
        assert_eq!(legacy_digest(""), "0");
        // 'a' = 97 = 0x61
        assert_eq!(legacy_digest("a"), "61");
        // 97 * 31 + 98 = 3105 = 0xc21
        assert_eq!(legacy_digest("ab"), "c21");
    }

    #[test]
    fn test_legacy_digest_wraps_instead_of_overflowing() {
        let long = "x".repeat(64);
        let digest = legacy_digest(&long);
        assert!(digest.len() <= 16);
        assert_eq!(digest, legacy_digest(&long));
    }

    #[test]
    fn test_legacy_digest_sign_extends_high_bytes() {
        // "\u{00e9}" is [0xC3, 0xA9]; as signed chars those are -61 and -87.
        let expected = (0u64.wrapping_sub(61))
            .wrapping_mul(31)
            .wrapping_sub(87);
        assert_eq!(legacy_digest("\u{00e9}"), format!("{:x}", expected));
    }

    #[test]
    fn test_argon2_round_trip_and_delimiter_free() {
        let stored = argon2_digest("hunter2").unwrap();
        assert!(stored.starts_with(ARGON2_PREFIX));
        assert!(!stored.contains(','));
        assert!(verify("hunter2", &stored));
        assert!(!verify("hunter3", &stored));
    }

    #[test]
    fn test_verify_legacy() {
        let stored = legacy_digest("pw1");
        assert!(verify("pw1", &stored));
        assert!(!verify("wrong", &stored));
    }

    #[test]
    fn test_verify_malformed_argon2_is_false() {
        assert!(!verify("pw", "argon2:zz"));
        assert!(!verify("pw", "argon2:6869"));
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("ARGON2".parse::<DigestScheme>().unwrap(), DigestScheme::Argon2);
        assert!("md5".parse::<DigestScheme>().is_err());
    }
}
