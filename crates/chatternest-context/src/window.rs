// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives the bounded, role-tagged turn sequence submitted to the
//! completion API from the live message history.

use chatternest_core::types::{ChatTurn, Message, Role, Sender};

/// Default number of trailing history messages included per request.
pub const DEFAULT_WINDOW_SIZE: usize = 8;

/// Builds the conversation window from the current in-memory history.
///
/// Takes the last `window_size` messages in chronological order, then drops
/// every entry that is not a user or assistant turn with non-empty trimmed
/// text. The window is sliced before filtering, so invalid entries inside
/// the window shrink it rather than pulling older history back in.
///
/// The filter is a correctness requirement, not an optimization: the
/// completion API rejects turns with missing content as a fatal
/// request-shape error.
pub fn conversation_window(history: &[Message], window_size: usize) -> Vec<ChatTurn> {
    let start = history.len().saturating_sub(window_size);
    history[start..]
        .iter()
        .filter_map(|msg| {
            let role = match msg.sender {
                Sender::User => Role::User,
                Sender::Ai => Role::Assistant,
                Sender::System => return None,
            };
            if msg.text.trim().is_empty() {
                return None;
            }
            Some(ChatTurn::new(role, msg.text.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn msg(sender: Sender, text: &str) -> Message {
        Message {
            id: format!("m-{}", text.len()),
            user_id: "u1".to_string(),
            sender,
            text: text.to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn empty_history_yields_empty_window() {
        assert!(conversation_window(&[], DEFAULT_WINDOW_SIZE).is_empty());
    }

    #[test]
    fn window_keeps_last_n_in_chronological_order() {
        let history: Vec<Message> = (0..20)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
                msg(sender, &format!("turn {i}"))
            })
            .collect();

        let window = conversation_window(&history, 8);
        assert_eq!(window.len(), 8);
        assert_eq!(window[0].content, "turn 12");
        assert_eq!(window[0].role, Role::User);
        assert_eq!(window[7].content, "turn 19");
        assert_eq!(window[7].role, Role::Assistant);
    }

    #[test]
    fn system_and_empty_entries_are_dropped() {
        let history = vec![
            msg(Sender::User, "keep me"),
            msg(Sender::System, "drop: system"),
            msg(Sender::Ai, "   "),
            msg(Sender::Ai, "keep me too"),
        ];

        let window = conversation_window(&history, DEFAULT_WINDOW_SIZE);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].content, "keep me");
        assert_eq!(window[1].content, "keep me too");
    }

    #[test]
    fn invalid_entries_shrink_the_window_instead_of_reaching_back() {
        // 10 valid messages followed by 8 system entries: the 8-slot window
        // lands entirely on the system entries and filters to nothing.
        let mut history: Vec<Message> = (0..10)
            .map(|i| msg(Sender::User, &format!("old {i}")))
            .collect();
        history.extend((0..8).map(|i| msg(Sender::System, &format!("sys {i}"))));

        assert!(conversation_window(&history, 8).is_empty());
    }

    #[test]
    fn sender_maps_to_completion_role() {
        let history = vec![msg(Sender::User, "q"), msg(Sender::Ai, "a")];
        let window = conversation_window(&history, DEFAULT_WINDOW_SIZE);
        assert_eq!(window[0].role, Role::User);
        assert_eq!(window[1].role, Role::Assistant);
    }

    proptest! {
        /// No input history can produce a turn that is empty, whitespace, or
        /// system-derived, and the window never exceeds its size.
        #[test]
        fn window_turns_are_always_valid(
            entries in proptest::collection::vec(
                (0..3usize, "[ a-z]{0,12}"),
                0..40,
            ),
            window_size in 1..16usize,
        ) {
            let history: Vec<Message> = entries
                .iter()
                .map(|(s, text)| {
                    let sender = match *s {
                        0 => Sender::User,
                        1 => Sender::Ai,
                        _ => Sender::System,
                    };
                    msg(sender, text)
                })
                .collect();

            let window = conversation_window(&history, window_size);
            prop_assert!(window.len() <= window_size);
            for turn in &window {
                prop_assert!(!turn.content.trim().is_empty());
                prop_assert!(matches!(turn.role, Role::User | Role::Assistant));
            }
        }
    }
}
