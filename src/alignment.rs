//! Token/whitespace alignment helpers for rationale display.

/// Restore leading spaces to tokens that tile a prompt.
///
/// Subword tokenizers often fold the space before a word into a hidden
/// marker; for human-readable rationale output the space has to come
/// back. Each token is searched for sequentially, starting from the end
/// of the previous match, and gains a single leading space when the
/// character just before the match is whitespace.
///
/// Best-effort heuristic: a token that repeats earlier in the prompt with
/// different spacing can misalign the search position. There is no
/// disambiguation for repeated substrings. Tokens that cannot be found at
/// all pass through unchanged.
pub fn check_whitespace(prompt: &str, tokens: &[impl AsRef<str>]) -> Vec<String> {
    let mut results = Vec::with_capacity(tokens.len());
    let mut search_start = 0;

    for token in tokens {
        let token = token.as_ref();
        match prompt[search_start..].find(token) {
            Some(offset) => {
                let start = search_start + offset;
                let preceded_by_space = prompt[..start]
                    .chars()
                    .next_back()
                    .is_some_and(char::is_whitespace);
                if preceded_by_space {
                    results.push(format!(" {token}"));
                } else {
                    results.push(token.to_string());
                }
                search_start = start + token.len();
            }
            None => results.push(token.to_string()),
        }
    }

    results
}

/// Sum per-token scores over half-open `(start, end)` index ranges.
///
/// Typically used to fold sub-word scores back into whole-word spans.
/// Range ends are clamped to the score vector; overlapping ranges are not
/// checked and simply double-count.
pub fn match_tokens_with_scores(scores: &[f32], ranges: &[(usize, usize)]) -> Vec<f32> {
    ranges
        .iter()
        .map(|&(start, end)| {
            let end = end.min(scores.len());
            let start = start.min(end);
            scores[start..end].iter().sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_restored_between_words() {
        let restored = check_whitespace("Hello world", &["Hello", "world"]);
        assert_eq!(restored, vec!["Hello", " world"]);
    }

    #[test]
    fn test_no_space_inside_split_word() {
        let restored = check_whitespace("rationalization", &["rational", "ization"]);
        assert_eq!(restored, vec!["rational", "ization"]);
    }

    #[test]
    fn test_mixed_subword_and_word_boundaries() {
        let restored = check_whitespace("the capital, Athens", &["the", "capital", ",", "Athens"]);
        assert_eq!(restored, vec!["the", " capital", ",", " Athens"]);
    }

    #[test]
    fn test_unmatched_token_passes_through() {
        let restored = check_whitespace("Hello world", &["Hello", "moon"]);
        assert_eq!(restored, vec!["Hello", "moon"]);
    }

    #[test]
    fn test_span_scores_summed() {
        let scores = [1.0, 2.0, 3.0, 4.0];
        let summed = match_tokens_with_scores(&scores, &[(0, 2), (2, 4)]);
        assert_eq!(summed, vec![3.0, 7.0]);
    }

    #[test]
    fn test_span_scores_clamped_and_overlapping() {
        let scores = [1.0, 2.0, 3.0];
        // Out-of-range ends clamp; overlapping ranges double-count.
        let summed = match_tokens_with_scores(&scores, &[(1, 10), (0, 2), (0, 2)]);
        assert_eq!(summed, vec![5.0, 3.0, 3.0]);
    }

    #[test]
    fn test_empty_range_scores_zero() {
        let scores = [1.0, 2.0];
        assert_eq!(match_tokens_with_scores(&scores, &[(1, 1)]), vec![0.0]);
    }
}
