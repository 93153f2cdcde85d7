//! Grounded answer composition.

use ragask_core::{Result, Settings};
use tracing::debug;

use crate::providers::CompletionBackend;
use crate::types::{ChatMessage, Deployment, SourceSummary};

/// Sampling temperature for every completion.
pub const TEMPERATURE: f64 = 0.2;

pub const SYSTEM_PROMPT: &str = "You answer using ONLY the provided sources. \
If the answer is not in the sources, say you don't know. \
Cite sources like [1], [2].";

/// Number each preview `[1]`, `[2]`, ... and join them with blank lines.
pub fn build_context(sources: &[SourceSummary]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{}] {}", i + 1, s.content_preview))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// System instruction followed by the question and its grounding context.
pub fn build_messages(question: &str, context: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("Question: {}\n\nSources:\n{}", question, context)),
    ]
}

/// Ask the configured deployment to answer `question` from `sources`.
///
/// Issues exactly one completion request; errors come back as
/// [`ragask_core::Error::GenerationFailed`].
pub async fn compose(
    backend: &dyn CompletionBackend,
    settings: &Settings,
    question: &str,
    sources: &[SourceSummary],
) -> Result<Option<String>> {
    let context = build_context(sources);
    let messages = build_messages(question, &context);
    let deployment = Deployment::from_settings(settings);

    debug!(
        "Composing answer from {} sources ({} context chars)",
        sources.len(),
        context.chars().count()
    );

    backend.complete(&deployment, messages, TEMPERATURE).await
}
