//! Configuration module for DocMind.
//!
//! Handles loading application settings, prompt templates and credentials.

mod credentials;
mod prompts;
mod settings;

pub use credentials::Credentials;
pub use prompts::{Prompts, RagPrompts, REFUSAL};
pub use settings::{
    ApiSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, PromptSettings,
    RagSettings, Settings, VectorStoreSettings,
};
