#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// Common to the guess and the prompt.
    Unchanged,
    /// Present in the guess, absent from the prompt.
    Removed,
    /// Present in the prompt, absent from the guess.
    Added,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
}

/// Word-granularity edit script from the guess to the prompt.
///
/// Comparison is exact: no case folding, no accent or punctuation
/// normalization. Concatenating Unchanged + Removed segments reproduces the
/// guess; Unchanged + Added reproduces the prompt.
pub fn diff_words(guess: &str, prompt: &str) -> Vec<Segment> {
    diff_tokens(&tokenize(guess), &tokenize(prompt))
}

/// Character-granularity variant, used for fine-grained highlighting of a
/// flagged word. The scoring path only ever uses word granularity.
pub fn diff_chars(guess: &str, prompt: &str) -> Vec<Segment> {
    diff_tokens(&char_tokens(guess), &char_tokens(prompt))
}

/// Split into alternating runs of non-whitespace and whitespace. Runs keep
/// their exact text, including repeated spaces, so segment concatenation
/// reproduces the input byte for byte.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev == space => {}
            Some(_) => {
                tokens.push(&text[start..idx]);
                start = idx;
                in_space = Some(space);
            }
            None => in_space = Some(space),
        }
    }
    if !text.is_empty() {
        tokens.push(&text[start..]);
    }
    tokens
}

fn char_tokens(text: &str) -> Vec<&str> {
    text.char_indices()
        .map(|(idx, ch)| &text[idx..idx + ch.len_utf8()])
        .collect()
}

/// LCS walk over the token streams. `dp[i][j]` holds the length of the
/// longest common subsequence of `old[i..]` and `new[j..]`; the forward walk
/// then emits Unchanged on matches and otherwise takes the side with the
/// longer remaining subsequence. Ties resolve toward the guess side, so a
/// substitution always reads Removed then Added. Adjacent segments of the
/// same kind merge, which folds the whitespace run between two consumed words
/// into one segment.
fn diff_tokens(old: &[&str], new: &[&str]) -> Vec<Segment> {
    let n = old.len();
    let m = new.len();
    let mut dp = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if old[i] == new[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut segments = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            push_merged(&mut segments, SegmentKind::Unchanged, old[i]);
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            push_merged(&mut segments, SegmentKind::Removed, old[i]);
            i += 1;
        } else {
            push_merged(&mut segments, SegmentKind::Added, new[j]);
            j += 1;
        }
    }
    while i < n {
        push_merged(&mut segments, SegmentKind::Removed, old[i]);
        i += 1;
    }
    while j < m {
        push_merged(&mut segments, SegmentKind::Added, new[j]);
        j += 1;
    }
    segments
}

fn push_merged(segments: &mut Vec<Segment>, kind: SegmentKind, text: &str) {
    match segments.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => segments.push(Segment {
            text: text.to_string(),
            kind,
        }),
    }
}
