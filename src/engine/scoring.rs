use crate::session::puzzle::Guess;

/// Whitespace-separated word count of a prompt; the scoreable unit total for
/// every current puzzle kind.
pub fn word_count(prompt: &str) -> usize {
    prompt.split_whitespace().count()
}

/// Score for a solved puzzle, computed once when the final guess comes back
/// with zero errors.
///
/// Base is units minus the error count of the first guess. A clean first try
/// doubles the base; otherwise each retry after the first costs one point.
/// The result may go negative when a short prompt meets many errors.
pub fn compute_score(total_units: usize, guesses: &[Guess]) -> i32 {
    let initial_errors = guesses.first().map_or(0, |g| g.errors.len());
    let base = total_units as i32 - initial_errors as i32;
    if initial_errors == 0 {
        base * 2
    } else {
        base - (guesses.len() as i32 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::puzzle::ErrorSpan;

    fn guess_with_errors(count: usize) -> Guess {
        let errors = (0..count)
            .map(|i| ErrorSpan {
                offset: i * 2,
                length: 1,
                better: None,
            })
            .collect();
        Guess {
            text: "x".to_string(),
            errors,
        }
    }

    #[test]
    fn test_word_count_splits_on_whitespace_runs() {
        assert_eq!(word_count("Je vais bien"), 3);
        assert_eq!(word_count("  Je  vais   bien "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_clean_first_try_doubles() {
        let guesses = vec![guess_with_errors(0)];
        assert_eq!(compute_score(3, &guesses), 6);
    }

    #[test]
    fn test_retries_cost_one_point_each() {
        // 5 units, 2 errors on the first try, solved on the 3rd guess:
        // (5 - 2) - 2 = 1.
        let guesses = vec![
            guess_with_errors(2),
            guess_with_errors(1),
            guess_with_errors(0),
        ];
        assert_eq!(compute_score(5, &guesses), 1);
    }

    #[test]
    fn test_score_can_go_negative() {
        // 2 units, 4 initial errors, solved on the 5th guess:
        // (2 - 4) - 4 = -6. No floor.
        let guesses = vec![
            guess_with_errors(4),
            guess_with_errors(3),
            guess_with_errors(2),
            guess_with_errors(1),
            guess_with_errors(0),
        ];
        assert_eq!(compute_score(2, &guesses), -6);
    }

    #[test]
    fn test_only_first_guess_errors_set_the_base() {
        // A worse second guess does not change the base, only the retry
        // penalty does.
        let guesses = vec![
            guess_with_errors(1),
            guess_with_errors(7),
            guess_with_errors(0),
        ];
        assert_eq!(compute_score(4, &guesses), 1);
    }

    #[test]
    fn test_no_guesses_counts_as_clean() {
        assert_eq!(compute_score(3, &[]), 6);
    }
}
