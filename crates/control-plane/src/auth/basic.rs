// Parsing of `Authorization: Basic` headers

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Upper bound on the encoded credential accepted from the header
pub const MAX_BASIC_CREDENTIAL_SIZE: usize = 4096;

/// Username/password pair decoded from a Basic header
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Why a Basic header could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BasicParseError {
    #[error("authorization scheme is not Basic")]
    WrongScheme,
    #[error("credential exceeds maximum size")]
    TooLarge,
    #[error("credential is not valid base64")]
    InvalidBase64,
    #[error("credential is not valid UTF-8")]
    InvalidUtf8,
    #[error("credential has no ':' separator")]
    MissingSeparator,
}

/// Decode `Basic base64(username:password)`.
///
/// The scheme tag is case-insensitive. The password may contain colons;
/// only the first one separates it from the username.
pub fn parse_basic(header: &str) -> Result<BasicCredentials, BasicParseError> {
    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(BasicParseError::WrongScheme)?;

    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(BasicParseError::WrongScheme);
    }

    let encoded = encoded.trim();
    if encoded.len() > MAX_BASIC_CREDENTIAL_SIZE {
        return Err(BasicParseError::TooLarge);
    }

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| BasicParseError::InvalidBase64)?;
    let decoded = String::from_utf8(decoded).map_err(|_| BasicParseError::InvalidUtf8)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(BasicParseError::MissingSeparator)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Encode credentials as a Basic header value
pub fn encode_basic(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}
