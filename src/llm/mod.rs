use async_trait::async_trait;

mod client;
pub mod error;
mod tool_def;
pub mod types;

pub use client::OpenAIClient;
pub use error::GatewayError;
pub use tool_def::tool_defs;
pub use types::*;

/// Boundary around the remote chat-completion API.
///
/// One call is one network round trip. Failures are returned as-is: there is no retry.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn complete(&self, req: ChatRequest) -> Result<Completion, GatewayError>;
}
