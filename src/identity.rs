//! Seeds from e-mail addresses.
//!
//! Avatars are keyed by a hash, never by the address itself. The address is
//! trimmed and lower-cased so `Alice@Example.com ` and `alice@example.com`
//! get the same avatar; a site-wide salt keeps the hash from matching other
//! services' public avatar URLs.

use sha2::{Digest, Sha256};

/// SHA-256 hex of `salt` followed by the normalized address.
pub fn hash_email(email: &str, salt: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_sha256() {
        let hash = hash_email("alice@example.com", "");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, format!("{:x}", Sha256::digest(b"alice@example.com")));
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(
            hash_email("  Alice@Example.COM\n", "s"),
            hash_email("alice@example.com", "s")
        );
    }

    #[test]
    fn salt_changes_hash() {
        assert_ne!(
            hash_email("alice@example.com", "one"),
            hash_email("alice@example.com", "two")
        );
    }
}
