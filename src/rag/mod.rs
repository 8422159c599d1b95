//! Prompt assembly for retrieval-augmented question answering.
//!
//! Retrieved passages become a context string, which is combined with the
//! caller's conversation history into the message list sent to the model.

pub mod context;
pub mod conversation;

pub use context::{format_context, NO_CONTEXT};
pub use conversation::{build_messages, HistoryTurn};
