use crate::session::puzzle::{Puzzle, PuzzleStatus};

/// Starting estimate for an unseen player, in prompt characters per second.
pub const INITIAL_CPS: f64 = 1.1;

const STEP: f64 = 1.1;
// A miss only moves the estimate a fifth of a step; five misses in a row
// compound to one full step. A beaten budget takes a whole step back down.
const MISS_EXPONENT: f64 = 1.0 / 5.0;

/// Replay the completion history and return the current chars-per-second
/// estimate. Each completed puzzle with a recorded time is judged against
/// the budget its own point in history implied: slower than budget nudges
/// the estimate up a fifth of a step, faster pulls it a full step down.
/// Completed puzzles without a time, and non-completed puzzles, contribute
/// nothing.
///
/// The walk is order-sensitive on purpose: an early slow solve loosens the
/// budgets every later solve is judged against.
pub fn estimate_cps(history: &[Puzzle]) -> f64 {
    let mut cps = INITIAL_CPS;
    for puzzle in history {
        if puzzle.status != PuzzleStatus::Complete {
            continue;
        }
        let Some(elapsed) = puzzle.elapsed_secs else {
            continue;
        };
        let expected = time_budget(cps, &puzzle.prompt);
        if elapsed > expected {
            cps *= STEP.powf(MISS_EXPONENT);
        } else {
            cps *= STEP.powi(-1);
        }
    }
    cps
}

/// Countdown budget in seconds for typing `prompt` at the given estimate.
pub fn time_budget(cps: f64, prompt: &str) -> f64 {
    prompt.chars().count() as f64 / cps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::puzzle::PuzzleKind;

    const EPS: f64 = 1e-9;

    fn completed(prompt: &str, elapsed: Option<f64>) -> Puzzle {
        let mut puzzle = Puzzle::new(PuzzleKind::Speed, prompt);
        puzzle.status = PuzzleStatus::Complete;
        puzzle.elapsed_secs = elapsed;
        puzzle
    }

    #[test]
    fn test_empty_history_gives_initial_estimate() {
        assert!((estimate_cps(&[]) - INITIAL_CPS).abs() < EPS);
    }

    #[test]
    fn test_missed_budget_raises_estimate_by_fifth_step() {
        // 11 chars at 1.1 cps budgets 10s; 12s misses it.
        let history = [completed("abcdefghijk", Some(12.0))];
        let expected = INITIAL_CPS * STEP.powf(MISS_EXPONENT);
        assert!((estimate_cps(&history) - expected).abs() < EPS);
    }

    #[test]
    fn test_beaten_budget_lowers_estimate_by_full_step() {
        let history = [completed("abcdefghijk", Some(9.0))];
        let expected = INITIAL_CPS / STEP;
        assert!((estimate_cps(&history) - expected).abs() < EPS);
    }

    #[test]
    fn test_beat_after_miss_drops_below_the_miss_alone() {
        let slow = completed("abcdefghijk", Some(12.0));
        let fast = completed("abcdefghijk", Some(9.0));
        let after_miss = estimate_cps(std::slice::from_ref(&slow));
        let after_both = estimate_cps(&[slow, fast]);
        assert!(after_both < after_miss);
    }

    #[test]
    fn test_replay_is_order_sensitive() {
        // 10.5s on an 11-char prompt misses the initial 10s budget but beats
        // the 11s budget that follows a beaten round. Swapping the order
        // flips that judgment, so the two histories land on different
        // estimates.
        let a = completed("abcdefghijk", Some(10.5));
        let b = completed("abcdefghijk", Some(9.5));
        let ab = estimate_cps(&[a.clone(), b.clone()]);
        let ba = estimate_cps(&[b, a]);
        assert!((ab - STEP.powf(MISS_EXPONENT)).abs() < 1e-6);
        assert!((ba - INITIAL_CPS / STEP / STEP).abs() < 1e-6);
        assert!((ab - ba).abs() > 1e-3);
    }

    #[test]
    fn test_untimed_and_unfinished_puzzles_are_skipped() {
        let mut skipped = completed("abcdefghijk", Some(2.0));
        skipped.status = PuzzleStatus::Skipped;
        let history = [
            completed("abcdefghijk", None),
            skipped,
            Puzzle::new(PuzzleKind::Speed, "abcdefghijk"),
        ];
        assert!((estimate_cps(&history) - INITIAL_CPS).abs() < EPS);
    }

    #[test]
    fn test_budget_counts_chars_not_bytes() {
        // "ééé" is 3 chars, 6 bytes.
        assert!((time_budget(1.0, "ééé") - 3.0).abs() < EPS);
    }
}
