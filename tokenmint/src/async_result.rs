//! Async result wrappers for spawned minting operations

use crate::{
    error::{TokenError, TokenResult},
    types::Token,
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

fn task_dropped() -> TokenError {
    TokenError::signing("signing task ended without producing a result")
}

/// Future resolving to the outcome of a spawned minting operation
pub struct AsyncTokenResult<T = Token> {
    receiver: oneshot::Receiver<TokenResult<T>>,
}

impl<T> AsyncTokenResult<T> {
    pub(crate) fn new(receiver: oneshot::Receiver<TokenResult<T>>) -> Self {
        Self { receiver }
    }
}

impl<T> Future for AsyncTokenResult<T> {
    type Output = TokenResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(task_dropped())),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Async minting result with an error handler applied to failures
pub struct AsyncTokenResultWithError<E, T = Token> {
    receiver: oneshot::Receiver<TokenResult<T>>,
    error_handler: E,
}

impl<E, T> AsyncTokenResultWithError<E, T> {
    pub(crate) fn new(receiver: oneshot::Receiver<TokenResult<T>>, error_handler: E) -> Self {
        Self {
            receiver,
            error_handler,
        }
    }
}

impl<E, T> Future for AsyncTokenResultWithError<E, T>
where
    E: Fn(TokenError) -> TokenError + Unpin,
{
    type Output = TokenResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result.map_err(&this.error_handler)),
            Poll::Ready(Err(_)) => Poll::Ready(Err((this.error_handler)(task_dropped()))),
            Poll::Pending => Poll::Pending,
        }
    }
}
