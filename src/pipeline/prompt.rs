//! Prompt construction.

use crate::inference::types::{ChatMessage, ConversationPrompt};

/// Build the two-message conversation for a request.
///
/// The system instruction goes first, as chat-completion APIs expect.
/// No validation: empty or oversized text is passed through unchanged.
pub fn build_prompt(user_text: &str, system_text: &str) -> ConversationPrompt {
    let prompt = ConversationPrompt::new(vec![
        ChatMessage::system(system_text),
        ChatMessage::user(user_text),
    ]);
    tracing::debug!(prompt = ?prompt, "prompt created");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::types::Role;

    #[test]
    fn test_system_first_then_user() {
        let prompt = build_prompt("What is 2+2?", "Answer concisely.");
        let messages = prompt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "Answer concisely.");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "What is 2+2?");
    }

    #[test]
    fn test_empty_inputs_pass_through() {
        let prompt = build_prompt("", "");
        assert_eq!(prompt.messages().len(), 2);
        assert_eq!(prompt.content_for(Role::User), "");
    }
}
