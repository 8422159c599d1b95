//! Merging caller-supplied history with retrieved context into chat messages.

use crate::completion::{ChatMessage, Role};
use crate::config::Prompts;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One prior turn, as supplied by the caller.
///
/// The role is kept as free text; [`HistoryTurn::normalized_role`] decides how
/// it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

impl HistoryTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// `user` stays user; every other role is sent as assistant.
    pub fn normalized_role(&self) -> Role {
        match self.role.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            other => {
                debug!("Treating history role {:?} as assistant", other);
                Role::Assistant
            }
        }
    }
}

/// System instructions, then every history turn in order, then the question
/// with its context.
pub fn build_messages(
    prompts: &Prompts,
    history: &[HistoryTurn],
    context: &str,
    query: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(prompts.system_instructions()));

    messages.extend(history.iter().map(|turn| ChatMessage {
        role: turn.normalized_role(),
        content: turn.content.clone(),
    }));

    messages.push(ChatMessage::user(prompts.question_message(context, query)));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REFUSAL;

    #[test]
    fn test_history_order_and_roles() {
        let prompts = Prompts::default();
        let history = vec![HistoryTurn::new("user", "A"), HistoryTurn::new("assistant", "B")];

        let messages = build_messages(&prompts, &history, "ctx", "C");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains(REFUSAL));
        assert_eq!(messages[1], ChatMessage::user("A"));
        assert_eq!(messages[2], ChatMessage::assistant("B"));
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, "Context:\nctx\n\nQuestion:\nC");
    }

    #[test]
    fn test_unknown_roles_collapse_to_assistant() {
        let prompts = Prompts::default();
        let history = vec![
            HistoryTurn::new("system", "s"),
            HistoryTurn::new("tool", "t"),
            HistoryTurn::new("User", "u"),
        ];

        let messages = build_messages(&prompts, &history, "ctx", "q");
        let roles: Vec<Role> = messages[1..4].iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::Assistant, Role::Assistant]);
    }

    #[test]
    fn test_no_history_entry_is_dropped() {
        let prompts = Prompts::default();
        let history: Vec<HistoryTurn> = (0..25)
            .map(|i| HistoryTurn::new(if i % 2 == 0 { "user" } else { "assistant" }, format!("turn {}", i)))
            .collect();

        let messages = build_messages(&prompts, &history, "ctx", "q");
        assert_eq!(messages.len(), 27);
        for (i, turn) in history.iter().enumerate() {
            assert_eq!(messages[i + 1].content, turn.content);
        }
    }

    #[test]
    fn test_empty_history() {
        let messages = build_messages(&Prompts::default(), &[], "ctx", "q");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
    }
}
