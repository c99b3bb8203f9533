//! Transcript rendering — the bounded context window for reply prompts
//! and the full transcript for summaries.

use crate::types::ConversationMessage;

/// Render the last `window` messages as `"role: content"` lines joined by
/// newline, chronological order preserved.
///
/// `history` must already be chronological ascending (the store's
/// contract) and already include the just-recorded current user message.
/// Shorter histories are included whole.
pub fn build_context(history: &[ConversationMessage], window: usize) -> String {
    let start = history.len().saturating_sub(window);
    render(&history[start..])
}

/// Render the full history as `"role: content"` lines joined by newline.
pub fn render_transcript(history: &[ConversationMessage]) -> String {
    render(history)
}

fn render(messages: &[ConversationMessage]) -> String {
    messages
        .iter()
        .map(ConversationMessage::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}
