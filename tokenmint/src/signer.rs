//! Signature engine: algorithm-dispatched signing over the signing input

use crate::{
    error::{TokenError, TokenResult},
    keys::PrivateKeyMaterial,
    provider::CryptoProvider,
    types::Algorithm,
};

/// RSASSA-PSS salt length in bytes (matches the SHA-256 output size)
pub const PSS_SALT_LEN: usize = 32;

/// Produce the raw signature bytes for `signing_input`.
///
/// The algorithm is trusted to be validated by the caller. Key material is
/// ignored for [`Algorithm::Sha256`], which is a bare digest.
///
/// # Errors
/// Returns `TokenError::SigningFailure` if the key is absent or malformed for
/// PS256/RS256, or if the provider rejects it. Failures are never retried.
pub fn sign<P: CryptoProvider + ?Sized>(
    provider: &P,
    algorithm: Algorithm,
    signing_input: &[u8],
    key: Option<&PrivateKeyMaterial>,
) -> TokenResult<Vec<u8>> {
    match algorithm {
        Algorithm::Ps256 => {
            let key = require_key(algorithm, key)?;
            provider.sign_pss_sha256(key, signing_input, PSS_SALT_LEN)
        }
        Algorithm::Rs256 => {
            let key = require_key(algorithm, key)?;
            provider.sign_pkcs1v15_sha256(key, signing_input)
        }
        Algorithm::Sha256 => Ok(provider.digest_sha256(signing_input)),
    }
}

fn require_key(
    algorithm: Algorithm,
    key: Option<&PrivateKeyMaterial>,
) -> TokenResult<&PrivateKeyMaterial> {
    key.ok_or_else(|| TokenError::signing(format!("{algorithm} signing requires a private key")))
}
