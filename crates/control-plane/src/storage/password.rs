// Password hashing using Argon2id
// Decision: Use Argon2id as it's the recommended algorithm for password hashing
// Decision: Use default parameters which are secure for most use cases

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use snippets_core::StorageError;
use std::sync::OnceLock;

/// Hash a password using Argon2id with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    Ok(hash.to_string())
}

/// Check the fields of a new account and hash its password.
///
/// A username containing ':' is refused: Basic credentials split on the
/// first colon, so that account could never log in.
pub fn hash_new_user(username: &str, password: &str) -> snippets_core::Result<String> {
    if username.is_empty() {
        return Err(StorageError::invalid_input("username must not be empty"));
    }
    if username.contains(':') {
        return Err(StorageError::invalid_input("username must not contain ':'"));
    }
    if password.is_empty() {
        return Err(StorageError::invalid_input("password must not be empty"));
    }
    Ok(hash_password(password)?)
}

/// Verify a password against a hash (constant-time comparison)
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Burn the same amount of work as a real verification.
///
/// Called when the username is unknown so that response time does not
/// reveal whether an account exists.
pub fn verify_dummy_password(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let hash = DUMMY_HASH.get_or_init(|| hash_password("snippets-dummy-password").ok());
    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "snippets123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Different salts
        assert_ne!(hash1, hash2);

        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_hash_format_and_length() {
        let password = "snippets123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, password);
        assert!(hash.len() > password.len() * 4);
        assert!(!hash.contains(password));
    }

    #[test]
    fn test_new_user_fields_are_checked() {
        for (username, password) in [("", "pw"), ("ad:min", "pw"), ("admin", "")] {
            let err = hash_new_user(username, password).unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidInput(_)),
                "{username:?}/{password:?}"
            );
        }

        let hash = hash_new_user("admin", "snippets123").unwrap();
        assert!(verify_password("snippets123", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_verify_dummy_password_does_not_panic() {
        verify_dummy_password("whatever");
        verify_dummy_password("");
    }
}
