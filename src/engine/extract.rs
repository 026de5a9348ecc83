use crate::engine::diff::{Segment, SegmentKind};
use crate::session::puzzle::ErrorSpan;

/// Walk a word-granularity edit script and produce error spans positioned in
/// the guess text. Offsets and lengths count characters, not bytes.
///
/// Removed segments become spans and advance the running offset. An Added
/// segment directly after a Removed one carries the corrected text and is
/// attached to the span just emitted; it occupies no guess characters, so the
/// offset stays put. An Added segment anywhere else describes prompt content
/// the guess simply omitted; no span is recorded for it. Unchanged segments
/// only advance the offset.
pub fn extract_errors(segments: &[Segment]) -> Vec<ErrorSpan> {
    let mut spans: Vec<ErrorSpan> = Vec::new();
    let mut offset = 0;
    let mut prev_removed = false;

    for segment in segments {
        let length = segment.text.chars().count();
        match segment.kind {
            SegmentKind::Removed => {
                spans.push(ErrorSpan {
                    offset,
                    length,
                    better: None,
                });
                offset += length;
                prev_removed = true;
            }
            SegmentKind::Added => {
                if prev_removed {
                    if let Some(last) = spans.last_mut() {
                        last.better = Some(segment.text.clone());
                    }
                }
                prev_removed = false;
            }
            SegmentKind::Unchanged => {
                offset += length;
                prev_removed = false;
            }
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::diff::diff_words;

    fn errors_for(guess: &str, prompt: &str) -> Vec<ErrorSpan> {
        extract_errors(&diff_words(guess, prompt))
    }

    #[test]
    fn test_perfect_guess_has_no_errors() {
        assert!(errors_for("Je vais bien", "Je vais bien").is_empty());
    }

    #[test]
    fn test_substitution_span_carries_suggestion() {
        let errors = errors_for("Je va bien", "Je vais bien");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset, 3);
        assert_eq!(errors[0].length, 2);
        assert_eq!(errors[0].better.as_deref(), Some("vais"));
    }

    #[test]
    fn test_extra_word_span_has_no_suggestion() {
        // "tout" has no counterpart in the prompt. The span covers the word
        // and the trailing space folded into the same removed segment.
        let errors = errors_for("Je vais tout bien", "Je vais bien");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset, 8);
        assert_eq!(errors[0].length, 5);
        assert_eq!(errors[0].better, None);
    }

    #[test]
    fn test_omitted_word_is_not_reported() {
        // Prompt content with no wrong guess text next to it produces no
        // span. The guess therefore counts as error free.
        let errors = errors_for("Je vais", "Je vais bien");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_offsets_are_chars_not_bytes() {
        // "préfère" is 7 chars but 9 bytes.
        let errors = errors_for("Je préfère la thé", "Je préfère le thé");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset, 11);
        assert_eq!(errors[0].length, 2);
        assert_eq!(errors[0].better.as_deref(), Some("le"));
    }

    #[test]
    fn test_multiple_errors_ascend_and_do_not_overlap() {
        let errors = errors_for("Je ve bein aujourd", "Je vais bien demain");
        assert!(errors.len() >= 2);
        let guess_chars = "Je ve bein aujourd".chars().count();
        let mut last_end = 0;
        for error in &errors {
            assert!(error.offset >= last_end, "spans must not overlap");
            assert!(error.offset + error.length <= guess_chars);
            last_end = error.offset + error.length;
        }
    }

    #[test]
    fn test_empty_guess_yields_no_spans_from_extraction() {
        // The whole prompt comes back as one Added segment with nothing
        // removed before it; the submit path layers its own whole-prompt
        // span on top of this.
        assert!(errors_for("", "Je vais bien").is_empty());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let a = errors_for("le chat gris dort", "le chien gris mange");
        let b = errors_for("le chat gris dort", "le chien gris mange");
        assert_eq!(a, b);
    }
}
