//! Token builder API - fixed key identity, many tokens
//!
//! A builder captures the header, key material and provider once and then
//! mints tokens on tokio's blocking pool, singly or as a batch stream.

use crate::{
    assembler::TokenAssembler,
    async_result::{AsyncTokenResult, AsyncTokenResultWithError},
    error::{TokenError, TokenResult},
    keys::PrivateKeyMaterial,
    provider::{CryptoProvider, SoftwareProvider},
    types::{Algorithm, HeaderMap, Token},
};
use futures::Stream;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;

/// Default channel capacity for [`TokenBuilder::sign_batch`]
pub const DEFAULT_BATCH_BUFFER: usize = 32;

/// Builder for minting tokens against one key identity
#[derive(Clone)]
pub struct TokenBuilder {
    header: HeaderMap,
    signing_key_id: String,
    private_key: Option<PrivateKeyMaterial>,
    provider: Arc<dyn CryptoProvider>,
    batch_buffer: usize,
}

/// Everything one minting call needs, detached from the builder
struct MintContext {
    assembler: TokenAssembler<Arc<dyn CryptoProvider>>,
    header: Value,
    signing_key_id: String,
    private_key: Option<PrivateKeyMaterial>,
}

impl MintContext {
    fn mint<C: Serialize + ?Sized>(&self, claims: &C) -> TokenResult<Token> {
        let payload = serde_json::to_value(claims)
            .map_err(|e| TokenError::encoding(format!("payload serialization failed: {e}")))?;
        self.assembler.generate_token(
            &self.header,
            &payload,
            &self.signing_key_id,
            self.private_key.as_ref(),
        )
    }
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBuilder")
            .field("header", &self.header)
            .field("signing_key_id", &self.signing_key_id)
            .field("private_key", &self.private_key)
            .field("batch_buffer", &self.batch_buffer)
            .finish_non_exhaustive()
    }
}

impl TokenBuilder {
    /// Create an empty builder using the software provider
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: HeaderMap::new(),
            signing_key_id: String::new(),
            private_key: None,
            provider: Arc::new(SoftwareProvider),
            batch_buffer: DEFAULT_BATCH_BUFFER,
        }
    }

    /// Set `alg`
    #[must_use]
    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        self.with_header_field("alg", algorithm.as_str())
    }

    /// Set `kid`
    #[must_use]
    pub fn with_key_id(self, kid: impl Into<String>) -> Self {
        let kid: String = kid.into();
        self.with_header_field("kid", kid)
    }

    /// Set an arbitrary header field
    #[must_use]
    pub fn with_header_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.header.insert(name.into(), value.into());
        self
    }

    /// Replace the whole header
    #[must_use]
    pub fn with_header(mut self, header: HeaderMap) -> Self {
        self.header = header;
        self
    }

    /// Set the correlation value passed through with each call
    #[must_use]
    pub fn with_signing_key_id(mut self, id: impl Into<String>) -> Self {
        self.signing_key_id = id.into();
        self
    }

    /// Set RSA private key material for PS256/RS256
    #[must_use]
    pub fn with_private_key(mut self, key: impl Into<PrivateKeyMaterial>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Use a custom crypto provider
    #[must_use]
    pub fn with_provider(mut self, provider: impl CryptoProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Channel capacity for batch minting
    #[must_use]
    pub fn with_batch_buffer(mut self, capacity: usize) -> Self {
        self.batch_buffer = capacity.max(1);
        self
    }

    /// Current header fields
    #[must_use]
    pub fn header(&self) -> &HeaderMap {
        &self.header
    }

    fn context(&self) -> MintContext {
        MintContext {
            assembler: TokenAssembler::with_provider(Arc::clone(&self.provider)),
            header: Value::Object(self.header.clone()),
            signing_key_id: self.signing_key_id.clone(),
            private_key: self.private_key.clone(),
        }
    }

    fn spawn_sign<C>(&self, claims: C) -> oneshot::Receiver<TokenResult<Token>>
    where
        C: Serialize + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let context = self.context();

        tokio::task::spawn_blocking(move || {
            let _ = tx.send(context.mint(&claims));
        });

        rx
    }

    /// Mint one token on the blocking pool
    ///
    /// Must be called from within a tokio runtime.
    pub fn sign<C>(&self, claims: C) -> AsyncTokenResult
    where
        C: Serialize + Send + 'static,
    {
        AsyncTokenResult::new(self.spawn_sign(claims))
    }

    /// Mint one token on the calling thread
    ///
    /// # Errors
    /// See [`TokenAssembler::generate_token`]
    pub fn sign_blocking<C: Serialize + ?Sized>(&self, claims: &C) -> TokenResult<Token> {
        self.context().mint(claims)
    }

    /// Mint a token per payload, streamed in order.
    ///
    /// Each item stands alone: a failing payload yields an error item and the
    /// stream continues. Dropping the stream stops minting.
    pub fn sign_batch<C>(&self, payloads: Vec<C>) -> impl Stream<Item = TokenResult<Token>> + Send
    where
        C: Serialize + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.batch_buffer);
        let context = self.context();

        tokio::task::spawn_blocking(move || {
            let total = payloads.len();
            let mut minted = 0usize;
            for claims in payloads {
                let result = context.mint(&claims);
                minted += usize::from(result.is_ok());
                if tx.blocking_send(result).is_err() {
                    tracing::debug!(minted, total, "batch receiver dropped");
                    return;
                }
            }
            tracing::debug!(minted, total, "batch complete");
        });

        ReceiverStream::new(rx)
    }

    /// Add `on_result` handler - `sign` then resolves to the handler's value
    #[must_use]
    pub fn on_result<F, R>(self, handler: F) -> TokenBuilderWithHandler<F>
    where
        F: FnOnce(TokenResult<Token>) -> R + Send + 'static,
    {
        TokenBuilderWithHandler {
            builder: self,
            handler,
        }
    }

    /// Add `on_error` handler - transforms errors but passes through success
    #[must_use]
    pub fn on_error<E>(self, handler: E) -> TokenBuilderWithError<E>
    where
        E: Fn(TokenError) -> TokenError + Send + Sync + Unpin + 'static,
    {
        TokenBuilderWithError {
            builder: self,
            error_handler: handler,
        }
    }
}

/// Token builder with result handler
pub struct TokenBuilderWithHandler<F> {
    builder: TokenBuilder,
    handler: F,
}

impl<F, R> TokenBuilderWithHandler<F>
where
    F: FnOnce(TokenResult<Token>) -> R + Send + 'static,
{
    /// Mint one token and pass the outcome to the handler
    pub async fn sign<C>(self, claims: C) -> R
    where
        C: Serialize + Send + 'static,
    {
        let result = self.builder.sign(claims).await;
        (self.handler)(result)
    }
}

/// Token builder with error handler
pub struct TokenBuilderWithError<E> {
    builder: TokenBuilder,
    error_handler: E,
}

impl<E> TokenBuilderWithError<E>
where
    E: Fn(TokenError) -> TokenError + Send + Sync + Unpin + 'static,
{
    /// Mint one token, mapping failures through the handler
    pub fn sign<C>(self, claims: C) -> AsyncTokenResultWithError<E>
    where
        C: Serialize + Send + 'static,
    {
        let rx = self.builder.spawn_sign(claims);
        AsyncTokenResultWithError::new(rx, self.error_handler)
    }
}
