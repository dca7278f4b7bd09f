//! Fuzzy matching over small vocabularies using Levenshtein distance

/// Weight applied to a score obtained from a single word of a multi-word
/// query, so a whole-string match always wins over a word match.
const WORD_MATCH_WEIGHT: f64 = 0.95;

/// Calculate the Levenshtein distance between two strings.
/// This measures the minimum number of single-character edits (insertions,
/// deletions, or substitutions) required to change one string into the other.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Two rows instead of the full matrix
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr_row[0] = i;
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr_row[j] = (prev_row[j] + 1) // deletion
                .min(curr_row[j - 1] + 1) // insertion
                .min(prev_row[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Similarity of two strings on a 0-100 scale.
///
/// 100 means identical, 0 means every character had to change.
pub fn similarity(a: &str, b: &str) -> u8 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 100;
    }
    let distance = levenshtein_distance(a, b).min(longest);
    let ratio = 1.0 - distance as f64 / longest as f64;
    (ratio * 100.0).round() as u8
}

/// Score a query against one candidate.
///
/// Multi-word queries are also scored word by word (weighted down), so that
/// "draw a circle" still finds "circle".
pub fn score(query: &str, candidate: &str) -> u8 {
    let whole = similarity(query, candidate);
    if query.split_whitespace().nth(1).is_none() {
        return whole;
    }

    let best_word = query
        .split_whitespace()
        .map(|word| (similarity(word, candidate) as f64 * WORD_MATCH_WEIGHT).round() as u8)
        .max()
        .unwrap_or(0);
    whole.max(best_word)
}

/// Find the best-scoring candidate for a query.
///
/// Returns the candidate and its 0-100 score. Ties go to the candidate that
/// appears first, so the result is stable for a fixed candidate order.
pub fn best_match<'a>(query: &str, candidates: &[&'a str]) -> Option<(&'a str, u8)> {
    let mut best: Option<(&'a str, u8)> = None;
    for &candidate in candidates {
        let candidate_score = score(query, candidate);
        match best {
            Some((_, best_score)) if candidate_score <= best_score => {}
            _ => best = Some((candidate, candidate_score)),
        }
    }
    best
}

/// Find suggestions for a typo from a list of valid options.
/// Returns suggestions sorted by edit distance (closest first).
///
/// - `query`: The mistyped string
/// - `candidates`: List of valid options to compare against
/// - `max_distance`: Maximum edit distance to consider
///
/// Returns up to 3 closest matches within the max distance.
pub fn suggest<'a>(query: &str, candidates: &[&'a str], max_distance: usize) -> Vec<&'a str> {
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(&str, usize)> = candidates
        .iter()
        .map(|&candidate| {
            let candidate_lower = candidate.to_lowercase();
            let distance = levenshtein_distance(&query_lower, &candidate_lower);
            (candidate, distance)
        })
        .filter(|(_, distance)| *distance <= max_distance)
        .collect();

    // Stable sort keeps candidate order among equal distances
    scored.sort_by_key(|(_, distance)| *distance);

    scored.into_iter().take(3).map(|(s, _)| s).collect()
}

/// Format a "did you mean?" suggestion string.
/// Returns None if there are no suggestions.
pub fn format_suggestion(suggestions: &[&str]) -> Option<String> {
    match suggestions.len() {
        0 => None,
        1 => Some(format!("Did you mean '{}'?", suggestions[0])),
        2 => Some(format!("Did you mean '{}' or '{}'?", suggestions[0], suggestions[1])),
        _ => Some(format!(
            "Did you mean '{}', '{}', or '{}'?",
            suggestions[0], suggestions[1], suggestions[2]
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &[&str] = &["circle", "square", "triangle", "line", "tree", "house", "sun"];

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein_distance("circle", "circle"), 0);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein_distance("", "house"), 5);
        assert_eq!(levenshtein_distance("house", ""), 5);
        assert_eq!(levenshtein_distance("", ""), 0);
    }

    #[test]
    fn test_levenshtein_single_edit() {
        // Deletion
        assert_eq!(levenshtein_distance("sqare", "square"), 1);
        // Substitution
        assert_eq!(levenshtein_distance("sun", "son"), 1);
        // Insertion
        assert_eq!(levenshtein_distance("treee", "tree"), 1);
    }

    #[test]
    fn test_levenshtein_multiple_edits() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("line", "line"), 100);
        assert_eq!(similarity("zzzz", "line"), 0);
        assert_eq!(similarity("", ""), 100);
        assert_eq!(similarity("sqare", "square"), 83);
    }

    #[test]
    fn test_score_uses_words_of_longer_queries() {
        assert_eq!(score("draw a circle", "circle"), 95);
        assert!(score("draw a circle", "square") < 60);
    }

    #[test]
    fn test_best_match_typo() {
        assert_eq!(best_match("sqare", SHAPES), Some(("square", 83)));
        assert_eq!(best_match("hous", SHAPES), Some(("house", 80)));
    }

    #[test]
    fn test_best_match_tie_prefers_first_candidate() {
        assert_eq!(best_match("ab", &["xy", "zw"]), Some(("xy", 0)));
        assert_eq!(best_match("tre", &["tree", "tree"]).map(|(c, _)| c), Some("tree"));
    }

    #[test]
    fn test_best_match_empty_candidates() {
        assert_eq!(best_match("circle", &[]), None);
    }

    #[test]
    fn test_suggest_typo() {
        let suggestions = suggest("circel", SHAPES, 2);
        assert_eq!(suggestions[0], "circle");
    }

    #[test]
    fn test_suggest_case_insensitive() {
        let suggestions = suggest("HOUSE", SHAPES, 1);
        assert_eq!(suggestions, vec!["house"]);
    }

    #[test]
    fn test_suggest_no_match() {
        let suggestions = suggest("zzzzzzzz", SHAPES, 2);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_format_suggestion_none() {
        assert_eq!(format_suggestion(&[]), None);
    }

    #[test]
    fn test_format_suggestion_one() {
        assert_eq!(format_suggestion(&["circle"]), Some("Did you mean 'circle'?".to_string()));
    }

    #[test]
    fn test_format_suggestion_three() {
        let result = format_suggestion(&["tree", "sun", "line"]);
        assert_eq!(result, Some("Did you mean 'tree', 'sun', or 'line'?".to_string()));
    }
}
