use futures::{FutureExt, future::Shared};

use super::{
    error::Error,
    platform::{self, BoxFuture},
    value::Value,
};

/// A one-shot asynchronous container resolving exactly once to a [`Value`]
/// or an [`Error`].
///
/// Cloning shares the resolution: the body runs once, and every waiter
/// observes the identical outcome. Waiting after resolution returns the
/// cached result without recomputation.
#[derive(Clone)]
pub struct ValueFuture {
    inner: Shared<BoxFuture<'static, Result<Value, Error>>>,
}

impl std::fmt::Debug for ValueFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueFuture").finish_non_exhaustive()
    }
}

impl ValueFuture {
    /// Schedule the body on the runtime immediately and wrap its handle.
    /// The caller is never blocked.
    pub fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Result<Value, Error>> + Send + 'static,
    {
        let handle = platform::spawn(future);
        let inner = async move {
            match handle.await {
                Ok(result) => result,
                Err(err) => Err(Error::Internal(format!("value task aborted: {err}"))),
            }
        }
        .boxed()
        .shared();
        Self { inner }
    }

    /// A future resolved ahead of time.
    pub fn ready(result: Result<Value, Error>) -> Self {
        let inner = async move { result }.boxed().shared();
        Self { inner }
    }

    /// Wait for the resolution.
    pub async fn wait(&self) -> Result<Value, Error> {
        self.inner.clone().await
    }
}
