use crate::client::ChatMessage;

/// Conservative estimate of token usage for a single message content.
fn estimate_token_count(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let char_count = text.chars().count();
    let word_count = text.split_whitespace().count();

    // Use both approximations and pick the larger one to stay conservative.
    let approx_from_chars = char_count.div_ceil(3); // ~3 chars per token
    let approx_from_words = word_count;

    approx_from_chars.max(approx_from_words).min(u32::MAX as usize) as u32
}

/// Estimate the total tokens contributed by a sequence of chat messages.
pub fn estimate_prompt_tokens(messages: &[ChatMessage]) -> u32 {
    messages
        .iter()
        .map(|message| estimate_token_count(&message.content).saturating_add(4)) // per-message metadata
        .fold(0, u32::saturating_add)
}

/// Tokens kept free between the prompt and the context window edge.
pub const REQUEST_COMPLETION_SAFETY_MARGIN_TOKENS: u32 = 256;

/// Minimum completion tokens a request must leave room for.
pub const MIN_COMPLETION_TOKENS: u32 = 256;

/// Completion budget for `messages`, or `None` when the prompt leaves less
/// than [`MIN_COMPLETION_TOKENS`] of the context window.
///
/// The prompt itself is never shortened; callers treat `None` as a failure.
pub fn completion_budget(
    context_tokens: u32,
    max_completion_tokens: u32,
    messages: &[ChatMessage],
) -> Option<u32> {
    let prompt_tokens = estimate_prompt_tokens(messages);
    let available = context_tokens
        .saturating_sub(prompt_tokens)
        .saturating_sub(REQUEST_COMPLETION_SAFETY_MARGIN_TOKENS);

    if available < MIN_COMPLETION_TOKENS {
        return None;
    }

    Some(available.min(max_completion_tokens.max(MIN_COMPLETION_TOKENS)))
}
