//! String-similarity ratios on a 0–100 integer scale.
//!
//! `ratio` is the normalised indel similarity from `rapidfuzz`.
//! `partial_ratio` is the best `ratio` of the shorter string against every
//! alignment over the longer one, including alignments cut short at either
//! edge. `token_sort_ratio` compares the alphabetically sorted word lists.
//! Any empty input scores 0.

use rapidfuzz::fuzz;

/// Inputs are truncated to this many chars before comparison.
pub const MAX_FUZZY_CHARS: usize = 128;

fn clipped(s: &str) -> Vec<char> {
    s.chars().take(MAX_FUZZY_CHARS).collect()
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    fuzz::ratio(a.iter().copied(), b.iter().copied())
}

fn scale(r: f64) -> u8 {
    (r * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn ratio(a: &str, b: &str) -> u8 {
    scale(ratio_chars(&clipped(a), &clipped(b)))
}

pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (clipped(a), clipped(b));
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let width = short.len();

    // Window start runs from `1 - width` to `len - 1`; starts outside the
    // longer string yield the truncated head and tail alignments.
    let mut best = 0.0_f64;
    for offset in 1..(long.len() + width) {
        let start = offset.saturating_sub(width);
        let end = offset.min(long.len());
        let r = ratio_chars(short, &long[start..end]);
        if r > best {
            best = r;
            if best >= 1.0 {
                break;
            }
        }
    }
    scale(best)
}

pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best of the three ratios on lowercased inputs.
pub fn best_ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    ratio(&a, &b)
        .max(partial_ratio(&a, &b))
        .max(token_sort_ratio(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical_and_empty() {
        assert_eq!(ratio("python", "python"), 100);
        assert_eq!(ratio("", "python"), 0);
        assert_eq!(ratio("", ""), 0);
    }

    #[test]
    fn test_ratio_transposition() {
        // LCS("python", "pyhton") = 5 → 10 / 12
        assert_eq!(ratio("python", "pyhton"), 83);
    }

    #[test]
    fn test_ratio_disjoint() {
        assert_eq!(ratio("aws", "go"), 0);
    }

    #[test]
    fn test_partial_ratio_substring() {
        assert_eq!(partial_ratio("aws", "amazon aws"), 100);
        assert_eq!(partial_ratio("amazon aws", "aws"), 100);
        assert_eq!(partial_ratio("java", "javascript"), 100);
    }

    #[test]
    fn test_partial_ratio_edge_alignment() {
        // "aws" sits at the tail of the longer string: 2·3 / (4 + 3)
        assert_eq!(partial_ratio("aws3", "amazon aws"), 86);
        assert_eq!(best_ratio("AWS3", "Amazon AWS"), 86);
        // head-cut alignment "abc" against "abcd"
        assert_eq!(partial_ratio("abcd", "xxabc"), 86);
        assert_eq!(partial_ratio("cdef", "defxxxx"), 86);
    }

    #[test]
    fn test_oversized_inputs_are_clipped() {
        let huge = "x".repeat(20_000);
        let clipped = "x".repeat(MAX_FUZZY_CHARS);
        assert_eq!(ratio(&huge, &clipped), 100);
        assert_eq!(partial_ratio("rust", &huge), 0);
        assert_eq!(best_ratio(&huge, "x"), 100);
    }

    #[test]
    fn test_token_sort_ignores_order_and_punctuation() {
        assert_eq!(token_sort_ratio("Machine Learning", "learning, machine"), 100);
    }

    #[test]
    fn test_best_ratio_is_case_insensitive() {
        assert_eq!(best_ratio("PostgreSQL", "postgresql"), 100);
    }
}
