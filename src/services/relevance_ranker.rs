//! Relevance ranking - service layer
//!
//! Lexical overlap between a query and each chunk, length-normalized by the
//! square root of the chunk's token count. There is no idf term: only the
//! query and the chunk being scored take part.

use std::collections::HashMap;

use crate::models::{Chunk, RankedResult};
use tracing::debug;

/// Tokens of this length or shorter are dropped
const MIN_TOKEN_LEN: usize = 2;

/// Lowercase, map everything outside `[a-z0-9]` to a space, split, and drop
/// tokens of two characters or fewer
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.len() > MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Score one chunk against already-normalized query tokens
///
/// Every occurrence of a query token (repeats included) adds the chunk's
/// count of that token. A chunk without tokens scores 0.
pub fn score_chunk(query_tokens: &[String], chunk: &Chunk) -> f64 {
    let chunk_tokens = normalize(&chunk.content);
    if chunk_tokens.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in &chunk_tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let overlap: usize = query_tokens
        .iter()
        .map(|token| counts.get(token.as_str()).copied().unwrap_or(0))
        .sum();

    overlap as f64 / (chunk_tokens.len() as f64).sqrt()
}

/// Score every chunk and sort by descending score
///
/// Ties keep the original chunk order.
pub fn rank_scored<'a>(query: &str, chunks: &'a [Chunk], top_k: usize) -> Vec<RankedResult<'a>> {
    let query_tokens = normalize(query);

    let mut scored: Vec<RankedResult<'a>> = chunks
        .iter()
        .map(|chunk| RankedResult {
            chunk,
            score: score_chunk(&query_tokens, chunk),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);

    debug!(
        "ranked {} chunks against {} query tokens, keeping {}",
        chunks.len(),
        query_tokens.len(),
        scored.len()
    );

    scored
}

/// Top `top_k` chunks for `query`, most relevant first
pub fn rank<'a>(query: &str, chunks: &'a [Chunk], top_k: usize) -> Vec<&'a Chunk> {
    rank_scored(query, chunks, top_k)
        .into_iter()
        .map(|result| result.chunk)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i, *t))
            .collect()
    }

    #[test]
    fn test_normalize_drops_short_tokens_and_punctuation() {
        assert_eq!(
            normalize("The C++ borrow-checker, in Rust 2021!"),
            vec!["the", "borrow", "checker", "rust", "2021"]
        );
        assert!(normalize("a an to ?!").is_empty());
    }

    #[test]
    fn test_normalize_replaces_non_ascii_letters() {
        assert_eq!(normalize("Café résumé"), vec!["caf", "sum"]);
    }

    #[test]
    fn test_repeated_query_tokens_count_each_time() {
        let c = Chunk::new(0, "ownership ownership borrowing lifetimes");
        let once = score_chunk(&normalize("ownership"), &c);
        let twice = score_chunk(&normalize("ownership ownership"), &c);
        assert_eq!(once, 2.0 / 2.0);
        assert_eq!(twice, 4.0 / 2.0);
    }

    #[test]
    fn test_chunk_without_tokens_scores_zero() {
        let c = Chunk::new(0, "a b ?? --");
        assert_eq!(score_chunk(&normalize("anything goes"), &c), 0.0);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let cs = chunks(&[
            "memory safety without garbage collection",
            "traits describe shared behavior",
            "garbage collection pauses and memory",
        ]);
        let first = rank_scored("memory garbage", &cs, 3);
        let second = rank_scored("memory garbage", &cs, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_overlap_beats_no_overlap() {
        let cs = chunks(&["alpha beta gamma delta", "omega sigma theta kappa"]);
        let ranked = rank_scored("gamma alpha", &cs, 2);
        assert_eq!(ranked[0].chunk.index, 0);
        assert!(ranked[0].score >= ranked[1].score);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_top_k_bound() {
        let cs = chunks(&["one thing", "two things", "three things"]);
        assert_eq!(rank("things", &cs, 2).len(), 2);
        assert_eq!(rank("things", &cs, 10).len(), 3);
        assert_eq!(rank("things", &cs, 0).len(), 0);
        assert!(rank("things", &[], 3).is_empty());
    }

    #[test]
    fn test_ties_keep_original_order() {
        let cs = chunks(&["nothing relevant here", "still nothing", "more filler text"]);
        let order: Vec<usize> = rank("quantum", &cs, 3).iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_length_normalization_favors_dense_chunk() {
        let cs = chunks(&[
            "tokio runtime tokio tasks spawn blocking threads workers pool queue scheduler",
            "tokio runtime",
        ]);
        let ranked = rank_scored("tokio", &cs, 2);
        // 2 / sqrt(11) < 1 / sqrt(2)
        assert_eq!(ranked[0].chunk.index, 1);
    }
}
