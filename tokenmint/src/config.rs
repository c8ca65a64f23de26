//! Minting run configuration

use crate::{
    builder::{DEFAULT_BATCH_BUFFER, TokenBuilder},
    error::ConfigError,
    keys::PrivateKeyMaterial,
    types::HeaderMap,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Key identity and header settings for a minting run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintConfig {
    /// Header `alg`; checked when the first token is minted
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Header `kid`
    pub key_id: String,
    /// Correlation value passed through untouched
    #[serde(default)]
    pub signing_key_id: String,
    /// PEM file holding the RSA private key (PKCS#1 or PKCS#8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,
    /// Extra header fields, placed ahead of `alg` and `kid`
    #[serde(default)]
    pub headers: HeaderMap,
    /// Channel capacity for batch minting
    #[serde(default = "default_batch_buffer")]
    pub batch_buffer: usize,
}

fn default_algorithm() -> String {
    "RS256".to_string()
}

fn default_batch_buffer() -> usize {
    DEFAULT_BATCH_BUFFER
}

impl MintConfig {
    /// Parse a JSON config
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed JSON or missing `key_id`
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON config file
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, `ConfigError::Parse` if it is invalid
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&text)
    }

    /// Build a token builder, loading the private key file if one is configured
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the key file cannot be read
    pub async fn builder(&self) -> Result<TokenBuilder, ConfigError> {
        let mut header = self.headers.clone();
        header.insert("alg".to_string(), self.algorithm.clone().into());
        header.insert("kid".to_string(), self.key_id.clone().into());

        let mut builder = TokenBuilder::new()
            .with_header(header)
            .with_signing_key_id(self.signing_key_id.clone())
            .with_batch_buffer(self.batch_buffer);

        if let Some(path) = &self.private_key_path {
            let key = PrivateKeyMaterial::from_pem_file(path)
                .await
                .map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!(path = %path.display(), "loaded private key");
            builder = builder.with_private_key(key);
        }

        Ok(builder)
    }
}
