//! Answer composer: grounds a question in retrieved sources and asks a
//! hosted model for one reply.
//!
//! The model sees only the numbered previews; citations in the answer refer
//! back to those numbers.

pub mod compose;
pub mod providers;
pub mod types;

pub use compose::{build_context, build_messages, compose};
pub use providers::{AzureOpenAIClient, CompletionBackend};
pub use types::*;
