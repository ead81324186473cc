// API key generation and hashing
// Decision: Keys are 32 random bytes, hex-encoded (64 chars), never derived from input
// Decision: Full key is shown only once at creation, stored as a SHA-256 digest

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of random bytes in a key (64 hex chars once encoded)
pub const API_KEY_BYTES: usize = 32;

/// Length of the encoded key
pub const API_KEY_LENGTH: usize = API_KEY_BYTES * 2;

/// Characters of the key kept for display
const KEY_PREFIX_LENGTH: usize = 8;

/// Generated API key (full key shown only at creation)
pub struct GeneratedApiKey {
    /// Full API key (64 hex chars)
    pub key: String,
    /// SHA-256 hash for database storage
    pub key_hash: String,
    /// Prefix for display (first 8 chars)
    pub key_prefix: String,
}

/// Generate a new API key from the thread-local CSPRNG
pub fn generate_api_key() -> GeneratedApiKey {
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; API_KEY_BYTES] = rng.gen();
    let key = hex::encode(random_bytes);

    let key_hash = hash_api_key(&key);
    let key_prefix = key[..KEY_PREFIX_LENGTH].to_string();

    GeneratedApiKey {
        key,
        key_hash,
        key_prefix,
    }
}

/// Hash an API key for database storage/lookup
pub fn hash_api_key(key: &str) -> String {
    let hash = Sha256::digest(key.as_bytes());
    hex::encode(hash)
}

/// Check that a presented key has the generated shape (64 hex chars)
pub fn is_valid_api_key_format(key: &str) -> bool {
    key.len() == API_KEY_LENGTH && key.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_api_key() {
        let key = generate_api_key();

        assert_eq!(key.key.len(), 64);
        assert!(is_valid_api_key_format(&key.key));
        assert_eq!(key.key_hash, hash_api_key(&key.key));
        assert_eq!(key.key_prefix.len(), 8);
        assert!(key.key.starts_with(&key.key_prefix));
    }

    #[test]
    fn test_different_keys() {
        let key1 = generate_api_key();
        let key2 = generate_api_key();

        assert_ne!(key1.key, key2.key);
        assert_ne!(key1.key_hash, key2.key_hash);
    }

    #[test]
    fn test_is_valid_api_key_format() {
        let key = generate_api_key();
        assert!(is_valid_api_key_format(&key.key));

        // Too short
        assert!(!is_valid_api_key_format("1234"));

        // Non-hex characters
        assert!(!is_valid_api_key_format(&"g".repeat(64)));

        // Too long
        assert!(!is_valid_api_key_format(&"a".repeat(65)));
    }

    #[test]
    fn test_hash_consistency() {
        let key = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
        assert_eq!(hash_api_key(key), hash_api_key(key));
        assert_ne!(hash_api_key(key), key);
        assert_eq!(hash_api_key(key).len(), 64);
    }
}
