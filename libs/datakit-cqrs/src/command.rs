//! Command-side contracts

use async_trait::async_trait;

/// A state-changing request with a typed result.
pub trait Command: Send + Sync {
    type Result: Send;
}

#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    type Error: Send;

    async fn handle(&self, command: C) -> Result<C::Result, Self::Error>;
}
