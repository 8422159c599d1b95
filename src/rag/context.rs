//! Context assembly for RAG prompts.

/// Context sent to the model when retrieval found nothing.
pub const NO_CONTEXT: &str = "No relevant context found.";

/// Join retrieved passages, in order, separated by a blank line.
///
/// An empty input yields [`NO_CONTEXT`] so the model sees the absence explicitly.
pub fn format_context<S: AsRef<str>>(chunks: &[S]) -> String {
    if chunks.is_empty() {
        return NO_CONTEXT.to_string();
    }

    chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n\n")
}
