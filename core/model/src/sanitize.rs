//! History sanitization performed before a model call (§4.F): thought parts
//! are dropped when the target model did not produce them, and NUL bytes
//! are stripped from outgoing text (some provider transports, like the
//! SSE reader in `provider-sdks/google-genai/src/stream.rs`, reject a
//! payload containing one outright).

use wisp_protocol::ContentPart;
use wisp_protocol::Message;

/// Prepares `history` for a call to `model`: strips [`ContentPart::Thought`]
/// parts when `model` does not preserve chain-of-thought across calls (a
/// thought produced by a different model is meaningless, and possibly
/// invalid, context for this one), and strips NUL bytes from every text
/// part regardless of model.
pub fn prepare_history(history: &[Message], model_preserves_thoughts: bool) -> Vec<Message> {
    history
        .iter()
        .map(|message| {
            let message = if model_preserves_thoughts { message.clone() } else { message.without_thoughts() };
            sanitize_message(message)
        })
        .collect()
}

fn sanitize_message(mut message: Message) -> Message {
    for part in &mut message.content {
        if let ContentPart::Text { text } | ContentPart::Thought { text } = part {
            if text.contains('\0') {
                *text = strip_nul(text);
            }
        }
    }
    message
}

fn strip_nul(text: &str) -> String {
    text.chars().filter(|c| *c != '\0').collect()
}

#[cfg(test)]
mod tests {
    use wisp_protocol::Role;

    use super::*;

    fn message_with(parts: Vec<ContentPart>) -> Message {
        Message { role: Role::Assistant, content: parts, tool_call_id: None }
    }

    #[test]
    fn thoughts_are_dropped_for_a_model_that_does_not_preserve_them() {
        let history = vec![message_with(vec![ContentPart::thought("secret plan"), ContentPart::text("hello")])];
        let prepared = prepare_history(&history, false);
        assert_eq!(prepared[0].content.len(), 1);
        assert_eq!(prepared[0].text_content(), "hello");
    }

    #[test]
    fn thoughts_are_kept_for_a_model_that_preserves_them() {
        let history = vec![message_with(vec![ContentPart::thought("secret plan"), ContentPart::text("hello")])];
        let prepared = prepare_history(&history, true);
        assert_eq!(prepared[0].content.len(), 2);
    }

    #[test]
    fn nul_bytes_are_stripped_from_text_parts() {
        let history = vec![message_with(vec![ContentPart::text("hello\0world")])];
        let prepared = prepare_history(&history, true);
        assert_eq!(prepared[0].text_content(), "helloworld");
    }

    #[test]
    fn text_without_nul_bytes_is_left_untouched() {
        let history = vec![message_with(vec![ContentPart::text("plain text")])];
        let prepared = prepare_history(&history, true);
        assert_eq!(prepared[0].text_content(), "plain text");
    }
}
