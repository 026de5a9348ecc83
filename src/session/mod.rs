pub mod puzzle;
pub mod submit;

use serde::{Deserialize, Serialize};

use crate::session::puzzle::{Puzzle, PuzzleKind, PuzzleStatus};

/// An ordered run of puzzles worked front to back. The session owns its
/// puzzles; callers mutate by replacing a puzzle wholesale with the value a
/// submit transition produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub puzzles: Vec<Puzzle>,
}

impl Session {
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        Self { puzzles }
    }

    /// Index of the puzzle currently being worked: the first one still
    /// Pending or InProgress. When everything is terminal the last puzzle
    /// keeps the spot so a finished session still has something to show.
    /// None only for an empty session.
    pub fn active_index(&self) -> Option<usize> {
        self.puzzles
            .iter()
            .position(|p| !p.is_terminal())
            .or_else(|| self.puzzles.len().checked_sub(1))
    }

    pub fn active_puzzle(&self) -> Option<&Puzzle> {
        self.active_index().map(|i| &self.puzzles[i])
    }

    pub fn total_score(&self) -> i32 {
        self.puzzles.iter().map(|p| p.score).sum()
    }

    pub fn max_score(&self) -> i32 {
        self.puzzles.iter().map(|p| p.score).max().unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.puzzles.iter().all(|p| p.is_terminal())
    }

    /// Append a fresh Pending puzzle at the end of the run.
    pub fn insert_puzzle(&mut self, kind: PuzzleKind, prompt: &str) {
        self.puzzles.push(Puzzle::new(kind, prompt));
    }

    /// Remove the puzzle at `index` regardless of its status. Everything
    /// after it shifts down one slot; nothing else changes. Out of bounds
    /// returns None.
    pub fn remove_puzzle(&mut self, index: usize) -> Option<Puzzle> {
        if index < self.puzzles.len() {
            Some(self.puzzles.remove(index))
        } else {
            None
        }
    }

    /// Plain-text review sheet: prompt and first attempt of every completed
    /// puzzle, in session order.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for puzzle in &self.puzzles {
            if puzzle.status != PuzzleStatus::Complete {
                continue;
            }
            let Some(first) = puzzle.guesses.first() else {
                continue;
            };
            out.push_str("Prompt: ");
            out.push_str(&puzzle.prompt);
            out.push_str("\nGuess: ");
            out.push_str(&first.text);
            out.push_str("\n\n");
        }
        out
    }
}
