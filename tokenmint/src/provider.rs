//! Cryptographic provider capability
//!
//! The assembler never touches a crypto library directly. Everything goes
//! through [`CryptoProvider`], so a software implementation can be swapped for
//! a hardware-backed key store without changing token assembly.

use crate::{
    error::{TokenError, TokenResult},
    keys::PrivateKeyMaterial,
};
use rsa::{Pkcs1v15Sign, Pss};
use sha2::{Digest, Sha256};

/// Signing and digest primitives used by the signature engine.
///
/// Implementations must be thread-safe: one provider serves concurrent calls
/// that share the same read-only key material.
pub trait CryptoProvider: Send + Sync {
    /// RSASSA-PSS over the SHA-256 digest of `message` with the given salt length
    ///
    /// # Errors
    /// Returns `TokenError::SigningFailure` if the key is unusable or the primitive rejects it
    fn sign_pss_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
        salt_len: usize,
    ) -> TokenResult<Vec<u8>>;

    /// RSASSA-PKCS1-v1.5 over the SHA-256 digest of `message`
    ///
    /// # Errors
    /// Returns `TokenError::SigningFailure` if the key is unusable or the primitive rejects it
    fn sign_pkcs1v15_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
    ) -> TokenResult<Vec<u8>>;

    /// Plain SHA-256 digest
    fn digest_sha256(&self, message: &[u8]) -> Vec<u8>;
}

/// Pure-software provider backed by the RustCrypto `rsa` and `sha2` crates
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareProvider;

impl CryptoProvider for SoftwareProvider {
    fn sign_pss_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
        salt_len: usize,
    ) -> TokenResult<Vec<u8>> {
        let key = key.rsa_private_key()?;
        let digest = Sha256::digest(message);
        let mut rng = rand::thread_rng();

        key.sign_with_rng(&mut rng, Pss::new_with_salt::<Sha256>(salt_len), &digest)
            .map_err(|e| TokenError::signing(format!("RSASSA-PSS signing failed: {e}")))
    }

    fn sign_pkcs1v15_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
    ) -> TokenResult<Vec<u8>> {
        let key = key.rsa_private_key()?;
        let digest = Sha256::digest(message);

        key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| TokenError::signing(format!("RSASSA-PKCS1-v1.5 signing failed: {e}")))
    }

    fn digest_sha256(&self, message: &[u8]) -> Vec<u8> {
        Sha256::digest(message).to_vec()
    }
}

/// Shared providers
impl<T: CryptoProvider + ?Sized> CryptoProvider for std::sync::Arc<T> {
    fn sign_pss_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
        salt_len: usize,
    ) -> TokenResult<Vec<u8>> {
        (**self).sign_pss_sha256(key, message, salt_len)
    }

    fn sign_pkcs1v15_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
    ) -> TokenResult<Vec<u8>> {
        (**self).sign_pkcs1v15_sha256(key, message)
    }

    fn digest_sha256(&self, message: &[u8]) -> Vec<u8> {
        (**self).digest_sha256(message)
    }
}

impl<T: CryptoProvider + ?Sized> CryptoProvider for &T {
    fn sign_pss_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
        salt_len: usize,
    ) -> TokenResult<Vec<u8>> {
        (**self).sign_pss_sha256(key, message, salt_len)
    }

    fn sign_pkcs1v15_sha256(
        &self,
        key: &PrivateKeyMaterial,
        message: &[u8],
    ) -> TokenResult<Vec<u8>> {
        (**self).sign_pkcs1v15_sha256(key, message)
    }

    fn digest_sha256(&self, message: &[u8]) -> Vec<u8> {
        (**self).digest_sha256(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_digest_matches_known_vector() {
        let digest = SoftwareProvider.digest_sha256(b"abc");
        assert_eq!(
            digest,
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn unusable_key_is_a_signing_failure() {
        let key = PrivateKeyMaterial::from_der(vec![0x30, 0x00]);
        assert!(matches!(
            SoftwareProvider.sign_pkcs1v15_sha256(&key, b"input"),
            Err(TokenError::SigningFailure(_))
        ));
        assert!(matches!(
            SoftwareProvider.sign_pss_sha256(&key, b"input", 32),
            Err(TokenError::SigningFailure(_))
        ));
    }
}
