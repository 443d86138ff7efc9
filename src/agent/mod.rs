pub mod marker;
pub mod message;
mod orchestrator;
pub mod prompt;

pub use message::{Message, Role};
pub use orchestrator::{TurnError, TurnOrchestrator, TurnSettings};

#[cfg(test)]
pub(crate) use orchestrator::tests::{ScriptedGateway, settings as test_settings};
