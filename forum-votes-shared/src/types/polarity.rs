use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents the direction of a vote cast by a user.
///
/// The same value is recorded per voter on a post, so a voter's current state
/// on a post is `Option<Polarity>` where `None` means "never voted".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

impl Polarity {
    /// Returns the lowercase wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Up => "up",
            Polarity::Down => "down",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unrecognized polarity: {0}")]
pub struct ParsePolarityError(pub String);

impl FromStr for Polarity {
    type Err = ParsePolarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Polarity::Up),
            "down" => Ok(Polarity::Down),
            _ => Err(ParsePolarityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_polarity() {
        assert_eq!("up".parse::<Polarity>(), Ok(Polarity::Up));
        assert_eq!("DOWN".parse::<Polarity>(), Ok(Polarity::Down));
        assert_eq!(
            "sideways".parse::<Polarity>(),
            Err(ParsePolarityError("sideways".to_string()))
        );
    }

    #[test]
    fn test_serde_matches_as_str() {
        for polarity in [Polarity::Up, Polarity::Down] {
            let json = serde_json::to_string(&polarity).unwrap();
            assert_eq!(json, format!("\"{}\"", polarity.as_str()));
        }
    }
}
