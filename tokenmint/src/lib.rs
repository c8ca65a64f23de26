//! Compact signed token minting
//!
//! Builds `base64url(header).base64url(payload).base64url(signature)` tokens
//! for load-generation harnesses that mint many tokens against one key:
//! - PS256 (RSASSA-PSS, SHA-256, 32-byte salt)
//! - RS256 (RSASSA-PKCS1-v1.5, SHA-256)
//! - SHA256 (bare digest of the signing input, not authenticated)
//!
//! Verification and claim semantics are left to the caller.

pub mod assembler;
pub mod async_result;
pub mod builder;
pub mod codec;
pub mod config;
mod error;
pub mod header;
pub mod keys;
pub mod provider;
pub mod signer;
mod types;

pub use assembler::{TokenAssembler, generate_token};
pub use async_result::{AsyncTokenResult, AsyncTokenResultWithError};
pub use builder::TokenBuilder;
pub use config::MintConfig;
pub use error::*;
pub use keys::PrivateKeyMaterial;
pub use provider::{CryptoProvider, SoftwareProvider};
pub use types::*;

/// Main entry point
pub struct TokenMint;

impl TokenMint {
    /// Builder for minting tokens against one key identity
    #[must_use]
    pub fn builder() -> TokenBuilder {
        TokenBuilder::new()
    }

    /// Synchronous assembler backed by the software provider
    #[must_use]
    pub fn assembler() -> TokenAssembler {
        TokenAssembler::new()
    }
}
