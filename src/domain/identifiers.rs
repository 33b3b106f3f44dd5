//! Identifier and bounded text types
//!
//! The protocol treats identifiers as opaque strings with length limits.
//! Each type validates once at construction, so the rest of the crate can
//! pass them around without re-checking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures for identifier and bounded text values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },

    #[error("{kind} exceeds {max} characters (got {length})")]
    TooLong {
        kind: &'static str,
        max: usize,
        length: usize,
    },

    #[error("{kind} contains invalid character {character:?}")]
    InvalidCharacter { kind: &'static str, character: char },

    #[error("{kind} is not valid hexadecimal: {reason}")]
    InvalidHex { kind: &'static str, reason: String },
}

fn check_length(kind: &'static str, text: &str, max: usize) -> Result<(), IdentifierError> {
    if text.is_empty() {
        return Err(IdentifierError::Empty { kind });
    }
    let length = text.chars().count();
    if length > max {
        return Err(IdentifierError::TooLong { kind, max, length });
    }
    Ok(())
}

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $max:expr, reject_whitespace = $ws:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub const MAX_LENGTH: usize = $max;

            pub fn parse(text: &str) -> Result<Self, IdentifierError> {
                check_length($kind, text, Self::MAX_LENGTH)?;
                if $ws {
                    if let Some(character) = text.chars().find(|c| c.is_whitespace()) {
                        return Err(IdentifierError::InvalidCharacter {
                            kind: $kind,
                            character,
                        });
                    }
                }
                Ok(Self(text.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_identifier!(
    /// Identity of a charge point or other networking node (charge box identity).
    NetworkingNodeId,
    "networking node id",
    48,
    reject_whitespace = true
);

string_identifier!(
    /// Correlation id of one request/response exchange (OCPP-J unique id).
    RequestId,
    "request id",
    36,
    reject_whitespace = true
);

string_identifier!(
    /// Tracing id propagated alongside a request. Never written to the wire.
    EventTrackingId,
    "event tracking id",
    128,
    reject_whitespace = false
);

impl RequestId {
    /// Fresh random correlation id (UUID v4, 36 characters).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl EventTrackingId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

// ── BoundedString ──────────────────────────────────────────────

/// Text of at most `N` characters (the protocol's `CiStringN` types).
///
/// The value is kept exactly as sent; comparisons are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundedString<const N: usize>(String);

impl<const N: usize> BoundedString<N> {
    pub const MAX_LENGTH: usize = N;

    /// Empty strings are allowed; only the upper bound is enforced.
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        let length = text.chars().count();
        if length > N {
            return Err(IdentifierError::TooLong {
                kind: "string",
                max: N,
                length,
            });
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> FromStr for BoundedString<N> {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<const N: usize> TryFrom<String> for BoundedString<N> {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<const N: usize> From<BoundedString<N>> for String {
    fn from(value: BoundedString<N>) -> Self {
        value.0
    }
}

impl<const N: usize> fmt::Display for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `CiString20Type`
pub type CiString20 = BoundedString<20>;
/// `CiString25Type`
pub type CiString25 = BoundedString<25>;
/// `CiString50Type`
pub type CiString50 = BoundedString<50>;
/// `CiString255Type`
pub type CiString255 = BoundedString<255>;
/// `CiString500Type`
pub type CiString500 = BoundedString<500>;

/// Identifier of an authorization token (`IdToken`).
pub type IdToken = CiString20;

// ── HexDigest ──────────────────────────────────────────────────

/// Hash value in hexadecimal notation, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexDigest(String);

impl HexDigest {
    pub const MAX_LENGTH: usize = 128;

    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        check_length("hex digest", text, Self::MAX_LENGTH)?;
        hex::decode(text).map_err(|e| IdentifierError::InvalidHex {
            kind: "hex digest",
            reason: e.to_string(),
        })?;
        Ok(Self(text.to_string()))
    }

    /// Digest for raw bytes, in lowercase hex.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexDigest {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexDigest {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexDigest> for String {
    fn from(value: HexDigest) -> Self {
        value.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
