//! Token assembler: validation, canonicalization, encoding and signing
//!
//! Each call is atomic. All input checks run first, in a fixed order, and the
//! call either returns a complete token or fails before any encoding or
//! signing work happens.

use crate::{
    codec::{base64_url_encode, base64_url_encode_text},
    error::{TokenError, TokenResult},
    header::canonicalize,
    keys::PrivateKeyMaterial,
    provider::{CryptoProvider, SoftwareProvider},
    signer,
    types::{Algorithm, ClaimMap, HeaderMap, Token, json_kind},
};
use serde::Serialize;
use serde_json::Value;

/// Stateless token assembler over an injected crypto provider
#[derive(Debug, Clone, Default)]
pub struct TokenAssembler<P = SoftwareProvider> {
    provider: P,
}

/// Inputs that passed validation
#[derive(Debug)]
pub struct ValidatedInput<'a> {
    /// Algorithm named by `alg`
    pub algorithm: Algorithm,
    /// Caller header, before canonicalization
    pub header: &'a HeaderMap,
    /// Caller claims
    pub payload: &'a ClaimMap,
    /// Header `kid`
    pub key_id: &'a str,
}

impl TokenAssembler {
    /// Assembler backed by the software provider
    #[must_use]
    pub fn new() -> Self {
        Self::with_provider(SoftwareProvider)
    }
}

impl<P: CryptoProvider> TokenAssembler<P> {
    /// Assembler backed by a custom provider
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// The injected provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mint a token.
    ///
    /// `signing_key_id` is a caller-side correlation value. It is recorded in
    /// logs only and never influences the signature.
    ///
    /// # Errors
    /// Validation errors in check order (`InvalidHeaderType`,
    /// `InvalidPayloadType`, `InvalidAlgorithm`, `MissingKeyId`,
    /// `MissingPrivateKey`), then `EncodingFailure` or `SigningFailure`.
    pub fn generate_token(
        &self,
        header: &Value,
        payload: &Value,
        signing_key_id: &str,
        private_key: Option<&PrivateKeyMaterial>,
    ) -> TokenResult<Token> {
        let input = validate(header, payload, private_key)?;

        let final_header = canonicalize(input.header);
        let header_json = serde_json::to_vec(&final_header)
            .map_err(|e| TokenError::encoding(format!("header serialization failed: {e}")))?;
        let payload_json = serde_json::to_vec(input.payload)
            .map_err(|e| TokenError::encoding(format!("payload serialization failed: {e}")))?;

        let signing_input = format!(
            "{}.{}",
            base64_url_encode_text(&header_json)?,
            base64_url_encode_text(&payload_json)?
        );

        let signature = signer::sign(
            &self.provider,
            input.algorithm,
            signing_input.as_bytes(),
            private_key,
        )?;
        let token = Token::from_segments(&signing_input, &base64_url_encode(&signature));

        tracing::debug!(
            alg = %input.algorithm,
            kid = input.key_id,
            signing_key_id,
            token_len = token.as_str().len(),
            "minted token"
        );

        Ok(token)
    }

    /// Mint a token from serializable header and claims.
    ///
    /// Both values are converted to JSON before any input check runs, so a
    /// value that cannot be serialized is reported ahead of
    /// `InvalidHeaderType` and the other validation errors.
    ///
    /// # Errors
    /// `EncodingFailure` if either value cannot be serialized, otherwise as
    /// [`generate_token`](Self::generate_token)
    pub fn generate_token_from<H, C>(
        &self,
        header: &H,
        payload: &C,
        signing_key_id: &str,
        private_key: Option<&PrivateKeyMaterial>,
    ) -> TokenResult<Token>
    where
        H: Serialize + ?Sized,
        C: Serialize + ?Sized,
    {
        let header = serde_json::to_value(header)
            .map_err(|e| TokenError::encoding(format!("header serialization failed: {e}")))?;
        let payload = serde_json::to_value(payload)
            .map_err(|e| TokenError::encoding(format!("payload serialization failed: {e}")))?;
        self.generate_token(&header, &payload, signing_key_id, private_key)
    }
}

/// Run the input checks, in order, without encoding or signing anything.
///
/// # Errors
/// The first failing check's error
pub fn validate<'a>(
    header: &'a Value,
    payload: &'a Value,
    private_key: Option<&PrivateKeyMaterial>,
) -> TokenResult<ValidatedInput<'a>> {
    let header = header
        .as_object()
        .ok_or_else(|| TokenError::InvalidHeaderType(json_kind(header).to_string()))?;
    let payload = payload
        .as_object()
        .ok_or_else(|| TokenError::InvalidPayloadType(json_kind(payload).to_string()))?;

    let algorithm = match header.get("alg") {
        Some(Value::String(alg)) => alg.parse::<Algorithm>()?,
        Some(other) => return Err(TokenError::invalid_algorithm(Some(&other.to_string()))),
        None => return Err(TokenError::invalid_algorithm(None)),
    };

    let key_id = match header.get("kid") {
        Some(Value::String(kid)) if !kid.is_empty() => kid.as_str(),
        _ => return Err(TokenError::MissingKeyId),
    };

    if algorithm.requires_private_key() && !private_key.is_some_and(PrivateKeyMaterial::is_usable)
    {
        return Err(TokenError::MissingPrivateKey(algorithm));
    }

    Ok(ValidatedInput {
        algorithm,
        header,
        payload,
        key_id,
    })
}

/// Mint a token with the software provider.
///
/// # Errors
/// See [`TokenAssembler::generate_token`]
pub fn generate_token(
    header: &Value,
    payload: &Value,
    signing_key_id: &str,
    private_key: Option<&PrivateKeyMaterial>,
) -> TokenResult<Token> {
    TokenAssembler::new().generate_token(header, payload, signing_key_id, private_key)
}
