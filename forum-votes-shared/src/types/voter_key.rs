use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest identity accepted, the maximum length of an email address.
const MAX_IDENTITY_LEN: usize = 320;

/// Errors raised while normalizing a voter identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidIdentity {
    #[error("Voter identity is empty")]
    Empty,
    #[error("Voter identity exceeds {MAX_IDENTITY_LEN} bytes")]
    TooLong,
    #[error("Voter identity contains whitespace or control characters")]
    IllegalCharacter,
    #[error("Voter identity is not an email address: {0}")]
    NotAnEmail(String),
}

/// The normalized form of a voter identity, used as the key of a post's voter map.
///
/// Identities are trimmed and lowercased, then the characters that document stores
/// reject in field names (`.` and `$`) are percent-escaped together with `%` itself.
/// Escaping the escape character keeps the encoding uniquely decodable, so two
/// different identities never share a key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterKey(String);

impl VoterKey {
    /// Normalizes a raw voter identity (an account email) into a `VoterKey`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` when the identity is empty, too long, contains
    /// whitespace or control characters, or lacks a local part or domain around `@`.
    pub fn normalize(identity: &str) -> Result<Self, InvalidIdentity> {
        let identity = identity.trim().to_lowercase();

        if identity.is_empty() {
            return Err(InvalidIdentity::Empty);
        }
        if identity.len() > MAX_IDENTITY_LEN {
            return Err(InvalidIdentity::TooLong);
        }
        if identity.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(InvalidIdentity::IllegalCharacter);
        }
        match identity.rsplit_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(InvalidIdentity::NotAnEmail(identity)),
        }

        let mut key = String::with_capacity(identity.len());
        for c in identity.chars() {
            match c {
                '%' => key.push_str("%25"),
                '.' => key.push_str("%2E"),
                '$' => key.push_str("%24"),
                other => key.push(other),
            }
        }
        Ok(Self(key))
    }

    /// Recovers the normalized identity a key was built from.
    ///
    /// Returns `None` for keys that `normalize` could not have produced.
    pub fn decode(&self) -> Option<String> {
        let mut out = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let escape = rest.get(pos..pos + 3)?;
            out.push(match escape {
                "%25" => '%',
                "%2E" => '.',
                "%24" => '$',
                _ => return None,
            });
            rest = &rest[pos + 3..];
        }
        out.push_str(rest);
        Some(out)
    }

    /// Wraps a key read back from a store. No normalization is applied.
    pub fn from_stored(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
