mod client;
pub mod config;
pub(crate) mod prompts;

pub use client::{AiClient, PromptMessage};
pub use config::AiConfig;
