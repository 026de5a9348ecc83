//! Conversation assembly for post-completion feedback. Pure string work,
//! kept apart from the HTTP client so it stays testable offline.

use serde::{Deserialize, Serialize};

use crate::session::puzzle::{Puzzle, PuzzleStatus};

const TUTOR_BRIEF: &str = "You are a French tutor to a 10 year old francophone boy. Given his guess and the correct answer for dictation, you provide short, pithy advice in French if he made a mistake. If he got it right, congratulate him.\n\nOutput should be the raw text of your output to him. Keep it brief and positive. He already figured out the correct answer in later guesses that are not shown to you. He already knows what wasn't correct, so don't repeat that.\n\nGive helpful general rules and tips, not correction of the specific words, and ONLY if there is a general rule to learn from his mistake. He already wrote out the correct sentence, so don't tell him about spelling, unless there is a general rule of thumb to learn. The advice should be simple enough for a 10 year old to understand.";

const SCIENCE_FACT_RIDER: &str = "Throw in a random cool science fact for fun as well. The fact should be suitable for someone who already has broad scientific knowledge. That is, include only obscure knowledge. Just add the fact, not any exclamations about how fascinating it is. Put the science fact in a new paragraph.";

const TUTOR_CLOSING: &str = "Everything should be 3 sentences at most. Address him as \"tu\", not \"vous\".";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

pub fn system_prompt(science_fact: bool) -> String {
    if science_fact {
        format!("{TUTOR_BRIEF}\n\n{SCIENCE_FACT_RIDER}\n\n{TUTOR_CLOSING}")
    } else {
        format!("{TUTOR_BRIEF}\n\n{TUTOR_CLOSING}")
    }
}

fn exchange(puzzle: &Puzzle) -> String {
    let guess = puzzle.guesses.first().map(|g| g.text.as_str()).unwrap_or("");
    format!("Guess: {guess}\nCorrect: {}", puzzle.prompt)
}

/// Build the tutor conversation for a just-completed puzzle. `prior` holds
/// the puzzles preceding it in session order; each one that finished and
/// already has feedback contributes a user/assistant exchange, giving the
/// model the session's running context. The current puzzle's first guess
/// closes the conversation as the open user turn.
pub fn feedback_messages(
    prior: &[Puzzle],
    current: &Puzzle,
    science_fact: bool,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::new("system", system_prompt(science_fact))];

    for puzzle in prior {
        if puzzle.status != PuzzleStatus::Complete {
            continue;
        }
        let Some(feedback) = puzzle.feedback.as_deref() else {
            continue;
        };
        messages.push(ChatMessage::new("user", exchange(puzzle)));
        messages.push(ChatMessage::new("assistant", feedback));
    }

    messages.push(ChatMessage::new("user", exchange(current)));
    messages
}
