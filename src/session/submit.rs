use crate::engine::diff::diff_words;
use crate::engine::extract::extract_errors;
use crate::engine::scoring::compute_score;
use crate::session::puzzle::{ErrorSpan, Guess, Puzzle, PuzzleKind, PuzzleStatus};

/// Result of feeding one guess into a puzzle. `completed` is true only on
/// the transition into Complete, never when re-submitting to an already
/// terminal puzzle, so callers can use it as a fire-once signal for
/// completion side effects such as requesting feedback.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub puzzle: Puzzle,
    pub completed: bool,
}

/// Diff the guess against the prompt and advance the puzzle. Pure value
/// transformation: the input puzzle is untouched and the updated copy comes
/// back in the outcome.
///
/// An empty guess against a non-empty prompt is not rejected; it records one
/// zero-width span at the start of the guess carrying the whole prompt as
/// the correction, so the attempt counts as a failed try rather than a free
/// completion. An empty guess against an empty prompt matches it and
/// completes.
///
/// `elapsed` is the wall-clock seconds the attempt took; it is kept only
/// when a Speed puzzle completes.
pub fn submit_guess(puzzle: &Puzzle, text: &str, elapsed: Option<f64>) -> SubmitOutcome {
    let errors = extract_errors(&diff_words(text, &puzzle.prompt));
    record_guess(puzzle, text, errors, elapsed)
}

/// Advance the puzzle with errors an external grammar checker found instead
/// of the built-in differ. Shares the transition and scoring core with
/// [`submit_guess`]. On checker failure the caller records nothing, leaving
/// the puzzle where it was.
pub fn apply_checked_guess(puzzle: &Puzzle, text: &str, errors: Vec<ErrorSpan>) -> SubmitOutcome {
    record_guess(puzzle, text, errors, None)
}

/// Pending or InProgress becomes Skipped; terminal puzzles come back
/// unchanged.
pub fn skip(puzzle: &Puzzle) -> Puzzle {
    if puzzle.is_terminal() {
        return puzzle.clone();
    }
    let mut next = puzzle.clone();
    next.status = PuzzleStatus::Skipped;
    next
}

fn record_guess(
    puzzle: &Puzzle,
    text: &str,
    mut errors: Vec<ErrorSpan>,
    elapsed: Option<f64>,
) -> SubmitOutcome {
    if puzzle.is_terminal() {
        return SubmitOutcome {
            puzzle: puzzle.clone(),
            completed: false,
        };
    }

    if text.is_empty() && !puzzle.prompt.is_empty() && errors.is_empty() {
        errors.push(ErrorSpan {
            offset: 0,
            length: 0,
            better: Some(puzzle.prompt.clone()),
        });
    }

    let solved = errors.is_empty();
    let mut next = puzzle.clone();
    next.guesses.push(Guess {
        text: text.to_string(),
        errors,
    });

    if solved {
        next.status = PuzzleStatus::Complete;
        next.score = compute_score(next.total_units(), &next.guesses);
        if next.kind == PuzzleKind::Speed {
            next.elapsed_secs = elapsed;
        }
    } else {
        next.status = PuzzleStatus::InProgress;
    }

    SubmitOutcome {
        puzzle: next,
        completed: solved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(kind: PuzzleKind, prompt: &str) -> Puzzle {
        Puzzle::new(kind, prompt)
    }

    #[test]
    fn test_correct_guess_completes_and_scores() {
        let start = puzzle(PuzzleKind::Dictate, "Je vais bien");
        let outcome = submit_guess(&start, "Je vais bien", None);
        assert!(outcome.completed);
        assert_eq!(outcome.puzzle.status, PuzzleStatus::Complete);
        assert_eq!(outcome.puzzle.guesses.len(), 1);
        assert!(outcome.puzzle.guesses[0].errors.is_empty());
        assert_eq!(outcome.puzzle.score, 6);
    }

    #[test]
    fn test_wrong_guess_goes_in_progress() {
        let start = puzzle(PuzzleKind::Dictate, "Je vais bien");
        let outcome = submit_guess(&start, "Je va bien", None);
        assert!(!outcome.completed);
        assert_eq!(outcome.puzzle.status, PuzzleStatus::InProgress);
        assert_eq!(outcome.puzzle.score, 0);
        assert_eq!(outcome.puzzle.guesses[0].errors.len(), 1);
    }

    #[test]
    fn test_completion_from_in_progress() {
        let start = puzzle(PuzzleKind::Dictate, "Je vais bien");
        let first = submit_guess(&start, "Je va bien", None);
        let second = submit_guess(&first.puzzle, "Je vais bien", None);
        assert!(second.completed);
        assert_eq!(second.puzzle.status, PuzzleStatus::Complete);
        assert_eq!(second.puzzle.guesses.len(), 2);
        // 3 units, 1 initial error, 2 guesses: (3 - 1) - 1 = 1.
        assert_eq!(second.puzzle.score, 1);
    }

    #[test]
    fn test_guess_history_is_append_only() {
        let start = puzzle(PuzzleKind::Dictate, "Je vais bien");
        let first = submit_guess(&start, "Je va bien", None);
        let second = submit_guess(&first.puzzle, "Je vais bein", None);
        assert_eq!(second.puzzle.guesses.len(), 2);
        assert_eq!(second.puzzle.guesses[0].text, "Je va bien");
        assert_eq!(second.puzzle.guesses[1].text, "Je vais bein");
    }

    #[test]
    fn test_empty_guess_records_whole_prompt_span() {
        let outcome = submit_guess(&puzzle(PuzzleKind::Dictate, "Je vais bien"), "", None);
        assert!(!outcome.completed);
        assert_eq!(outcome.puzzle.status, PuzzleStatus::InProgress);
        let errors = &outcome.puzzle.guesses[0].errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset, 0);
        assert_eq!(errors[0].length, 0);
        assert_eq!(errors[0].better.as_deref(), Some("Je vais bien"));
    }

    #[test]
    fn test_empty_guess_matches_empty_prompt() {
        let outcome = submit_guess(&puzzle(PuzzleKind::Dictate, ""), "", None);
        assert!(outcome.completed);
        assert_eq!(outcome.puzzle.status, PuzzleStatus::Complete);
        assert!(outcome.puzzle.guesses[0].errors.is_empty());
        assert_eq!(outcome.puzzle.score, 0);
    }

    #[test]
    fn test_submitting_to_terminal_puzzle_is_a_no_op() {
        let done = submit_guess(&puzzle(PuzzleKind::Dictate, "Je vais bien"), "Je vais bien", None);
        assert!(done.completed);
        let again = submit_guess(&done.puzzle, "autre chose", None);
        assert!(!again.completed);
        assert_eq!(again.puzzle, done.puzzle);

        let skipped = skip(&puzzle(PuzzleKind::Dictate, "Je vais bien"));
        let resubmit = submit_guess(&skipped, "Je vais bien", None);
        assert!(!resubmit.completed);
        assert_eq!(resubmit.puzzle.status, PuzzleStatus::Skipped);
        assert!(resubmit.puzzle.guesses.is_empty());
    }

    #[test]
    fn test_skip_is_idempotent_and_keeps_complete() {
        let pending = puzzle(PuzzleKind::Translate, "I miss Felix.");
        let skipped = skip(&pending);
        assert_eq!(skipped.status, PuzzleStatus::Skipped);
        assert_eq!(skip(&skipped).status, PuzzleStatus::Skipped);

        let done = submit_guess(&puzzle(PuzzleKind::Dictate, "a b"), "a b", None).puzzle;
        assert_eq!(skip(&done).status, PuzzleStatus::Complete);
    }

    #[test]
    fn test_speed_completion_records_elapsed() {
        let start = puzzle(PuzzleKind::Speed, "Le chat dort");
        let outcome = submit_guess(&start, "Le chat dort", Some(7.5));
        assert!(outcome.completed);
        assert_eq!(outcome.puzzle.elapsed_secs, Some(7.5));
    }

    #[test]
    fn test_elapsed_ignored_for_other_kinds_and_failures() {
        let start = puzzle(PuzzleKind::Dictate, "Le chat dort");
        let dictate = submit_guess(&start, "Le chat dort", Some(7.5));
        assert_eq!(dictate.puzzle.elapsed_secs, None);

        let start = puzzle(PuzzleKind::Speed, "Le chat dort");
        let miss = submit_guess(&start, "Le chien dort", Some(7.5));
        assert_eq!(miss.puzzle.elapsed_secs, None);
    }

    #[test]
    fn test_input_puzzle_is_left_untouched() {
        let start = puzzle(PuzzleKind::Dictate, "Je vais bien");
        let _ = submit_guess(&start, "Je vais bien", None);
        assert_eq!(start.status, PuzzleStatus::Pending);
        assert!(start.guesses.is_empty());
    }

    #[test]
    fn test_checked_guess_with_findings_goes_in_progress() {
        let errors = vec![ErrorSpan {
            offset: 3,
            length: 2,
            better: Some("vais".to_string()),
        }];
        let start = puzzle(PuzzleKind::Translate, "Je vais bien");
        let outcome = apply_checked_guess(&start, "Je va bien", errors);
        assert!(!outcome.completed);
        assert_eq!(outcome.puzzle.status, PuzzleStatus::InProgress);
        assert_eq!(outcome.puzzle.guesses[0].errors.len(), 1);
    }

    #[test]
    fn test_checked_guess_clean_completes() {
        let start = puzzle(PuzzleKind::Translate, "I miss Felix.");
        let outcome = apply_checked_guess(&start, "Félix me manque.", Vec::new());
        assert!(outcome.completed);
        assert_eq!(outcome.puzzle.status, PuzzleStatus::Complete);
        // 3 prompt words, clean first try: 6.
        assert_eq!(outcome.puzzle.score, 6);
    }

    #[test]
    fn test_checked_guess_empty_text_still_counts_as_error() {
        let start = puzzle(PuzzleKind::Translate, "I miss Felix.");
        let outcome = apply_checked_guess(&start, "", Vec::new());
        assert!(!outcome.completed);
        assert_eq!(outcome.puzzle.guesses[0].errors.len(), 1);
    }
}
