//! Token type definitions

use crate::error::TokenError;
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// Caller-supplied header fields, in insertion order
pub type HeaderMap = Map<String, Value>;

/// Caller-supplied claims, in insertion order
pub type ClaimMap = Map<String, Value>;

/// Supported token algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSASSA-PSS with SHA-256, salt length 32
    Ps256,
    /// RSASSA-PKCS1-v1.5 with SHA-256
    Rs256,
    /// Plain SHA-256 digest of the signing input.
    ///
    /// Digest-only, not authenticated: no key is involved, so anyone can
    /// produce a matching third segment. Kept for harnesses that only need a
    /// well-formed token shape.
    Sha256,
}

impl Algorithm {
    /// Every supported algorithm, in the order reported to callers
    pub const ALL: [Algorithm; 3] = [Algorithm::Ps256, Algorithm::Rs256, Algorithm::Sha256];

    /// Header `alg` value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::Ps256 => "PS256",
            Algorithm::Rs256 => "RS256",
            Algorithm::Sha256 => "SHA256",
        }
    }

    /// Whether signing needs RSA private key material
    #[must_use]
    pub const fn requires_private_key(self) -> bool {
        matches!(self, Algorithm::Ps256 | Algorithm::Rs256)
    }

    pub(crate) fn supported_list() -> String {
        Self::ALL.map(Algorithm::as_str).join(", ")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| TokenError::invalid_algorithm(Some(s)))
    }
}

/// Minted token: `header.payload.signature`, each segment unpadded base64url
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub(crate) fn from_segments(signing_input: &str, signature: &str) -> Self {
        Self(format!("{signing_input}.{signature}"))
    }

    /// Token text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the token text
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// The three encoded segments (header, payload, signature)
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// The bytes the signature was computed over (`header.payload`)
    #[must_use]
    pub fn signing_input(&self) -> &str {
        self.0.rsplit_once('.').map_or(self.0.as_str(), |(input, _)| input)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short name of a JSON value's kind, for error context
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_exact_identifiers() {
        assert_eq!("PS256".parse::<Algorithm>(), Ok(Algorithm::Ps256));
        assert_eq!("RS256".parse::<Algorithm>(), Ok(Algorithm::Rs256));
        assert_eq!("SHA256".parse::<Algorithm>(), Ok(Algorithm::Sha256));
        assert!("rs256".parse::<Algorithm>().is_err());
    }

    #[test]
    fn unknown_algorithm_lists_supported_set() {
        let err = "HS256".parse::<Algorithm>().unwrap_err();
        assert_eq!(
            err,
            TokenError::InvalidAlgorithm {
                found: Some("HS256".to_string()),
                supported: "PS256, RS256, SHA256".to_string(),
            }
        );
        assert!(err.to_string().contains("PS256, RS256, SHA256"));
    }

    #[test]
    fn only_rsa_algorithms_need_a_key() {
        assert!(Algorithm::Ps256.requires_private_key());
        assert!(Algorithm::Rs256.requires_private_key());
        assert!(!Algorithm::Sha256.requires_private_key());
    }

    #[test]
    fn token_exposes_signing_input() {
        let token = Token::from_segments("aGVhZA.Ym9keQ", "c2ln");
        assert_eq!(token.signing_input(), "aGVhZA.Ym9keQ");
        assert_eq!(token.segments(), vec!["aGVhZA", "Ym9keQ", "c2ln"]);
    }
}
