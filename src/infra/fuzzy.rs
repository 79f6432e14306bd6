//! Fuzzy matching used by symbol search and quick-open
//!
//! Inputs are expected to be lower-cased already. A contiguous substring
//! always scores `1000 + (100 - first_index)`; anything else must match as an
//! in-order subsequence or scores 0.

/// Boundary characters for symbol names
pub const SYMBOL_BOUNDARIES: &[char] = &['.', '_'];

/// Boundary characters for relative file paths
pub const PATH_BOUNDARIES: &[char] = &['/', '_', '-', '.'];

const SUBSTRING_BASE: u32 = 1000;
const SUBSTRING_POSITION_CAP: u32 = 100;
const MATCH_SCORE: u32 = 10;
const ADJACENT_BONUS: u32 = 5;
const BOUNDARY_BONUS: u32 = 3;
const SHALLOW_PATH_BONUS: u32 = 50;

/// Score a symbol name against a pattern
pub fn fuzzy_score(pattern: &str, text: &str) -> u32 {
    score_with(pattern, text, SYMBOL_BOUNDARIES)
}

/// Score a relative path; shallow paths get up to 50 extra points on
/// subsequence matches
pub fn score_path(pattern: &str, path: &str) -> u32 {
    let pattern = pattern.to_lowercase();
    let lowered = path.to_lowercase();

    if pattern.is_empty() || lowered.contains(&pattern) {
        return score_with(&pattern, &lowered, PATH_BOUNDARIES);
    }

    match score_with(&pattern, &lowered, PATH_BOUNDARIES) {
        0 => 0,
        score => {
            let depth = path.matches('/').count() as u32;
            score + SHALLOW_PATH_BONUS - SHALLOW_PATH_BONUS.min(depth * 10)
        }
    }
}

/// Core scoring routine with a caller-chosen set of word boundaries
pub fn score_with(pattern: &str, text: &str, boundaries: &[char]) -> u32 {
    if pattern.is_empty() {
        return 1;
    }

    if let Some(byte_idx) = text.find(pattern) {
        let index = text[..byte_idx].chars().count() as u32;
        return SUBSTRING_BASE + SUBSTRING_POSITION_CAP.saturating_sub(index);
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let mut score = 0;
    let mut matched = 0;
    let mut last_match: Option<usize> = None;
    let mut previous: Option<char> = None;

    for (i, ch) in text.chars().enumerate() {
        if matched < pattern.len() && ch == pattern[matched] {
            score += MATCH_SCORE;
            // a first match at position 0 counts as adjacent
            if last_match.map_or(i == 0, |last| i == last + 1) {
                score += ADJACENT_BONUS;
            }
            if previous.is_none_or(|p| boundaries.contains(&p)) {
                score += BOUNDARY_BONUS;
            }
            last_match = Some(i);
            matched += 1;
        }
        previous = Some(ch);
    }

    if matched == pattern.len() { score } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_subsequence(pattern: &str, text: &str) -> bool {
        let mut chars = text.chars();
        pattern.chars().all(|p| chars.any(|t| t == p))
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        assert_eq!(fuzzy_score("", "anything"), 1);
        assert_eq!(fuzzy_score("", ""), 1);
    }

    #[test]
    fn test_substring_prefers_earlier_occurrence() {
        assert_eq!(fuzzy_score("load", "load_config"), 1100);
        assert_eq!(fuzzy_score("config", "load_config"), 1095);
        assert!(fuzzy_score("load", "load_config") > fuzzy_score("config", "load_config"));
    }

    #[test]
    fn test_substring_position_is_capped() {
        let text = format!("{}needle", "x".repeat(150));
        assert_eq!(fuzzy_score("needle", &text), 1000);
    }

    #[test]
    fn test_subsequence_scoring() {
        // g(0): 10 + 5 adjacent-at-start + 3 boundary
        // c(4): 10 + 3 boundary after '_'
        assert_eq!(fuzzy_score("gc", "get_config"), 31);
    }

    #[test]
    fn test_subsequence_adjacent_bonus() {
        // a(0): 10+5+3, b(1): 10+5, d(3): 10
        assert_eq!(fuzzy_score("abd", "abcd"), 43);
    }

    #[test]
    fn test_partial_match_scores_zero() {
        assert_eq!(fuzzy_score("xyz", "xylophone"), 0);
        assert_eq!(fuzzy_score("ba", "ab"), 0);
    }

    #[test]
    fn test_score_path_depth_bonus() {
        let shallow = score_path("mrs", "main.rs");
        let deep = score_path("mrs", "a/b/c/d/e/main.rs");
        assert!(shallow > 0 && deep > 0);
        assert!(shallow > deep);
    }

    #[test]
    fn test_score_path_substring_has_no_depth_bonus() {
        assert_eq!(score_path("main", "main.rs"), 1100);
        assert_eq!(score_path("MAIN", "src/Main.rs"), 1096);
    }

    #[test]
    fn test_score_path_boundaries() {
        // s(0): 10+5+3, m(4): 10+3 after '/', depth 1 -> +40
        assert_eq!(score_path("sm", "src/main.rs"), 71);
    }

    proptest! {
        #[test]
        fn prop_positive_iff_subsequence(pattern in "[a-d_.]{1,4}", text in "[a-d_.]{0,12}") {
            let score = fuzzy_score(&pattern, &text);
            prop_assert_eq!(score > 0, is_subsequence(&pattern, &text));
        }

        #[test]
        fn prop_substring_outranks_scattered(
            pattern in "[a-z]{2,5}",
            prefix in "[a-z_]{0,10}",
            filler in "[0-9]{1,3}",
        ) {
            let contiguous = format!("{}{}", prefix, pattern);
            let scattered: String = pattern
                .chars()
                .map(|c| format!("{}{}", c, filler))
                .collect();
            prop_assume!(!scattered.contains(&pattern));
            prop_assert!(fuzzy_score(&pattern, &contiguous) > fuzzy_score(&pattern, &scattered));
        }
    }
}
