//! Fuzzy Matching
//!
//! Ranks prompt names against what the user typed. Scores follow the classic
//! weighted-ratio scheme: both strings are normalised, then the best of the
//! plain, partial (best window), token-sort and token-set similarities wins,
//! with partial scores scaled down by the length disparity. Sequence
//! similarity itself comes from `similar`.

use std::collections::BTreeSet;

use similar::TextDiff;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.90;
const LONG_PARTIAL_SCALE: f64 = 0.60;

/// Stateless ranker for candidate names
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    /// Rank `candidates` against `query`, best first.
    ///
    /// Ties keep candidate order and at most `limit` entries are returned.
    /// Candidates scoring zero are dropped instead of filling the remaining
    /// slots, so a query unrelated to every name returns an empty list. An
    /// empty query matches nothing.
    pub fn rank<S: AsRef<str>>(query: &str, candidates: &[S], limit: usize) -> Vec<(String, u8)> {
        let query = full_process(query);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(String, u8)> = candidates
            .iter()
            .filter_map(|candidate| {
                let candidate = candidate.as_ref();
                let score = weighted_ratio(&query, &full_process(candidate));
                (score > 0).then(|| (candidate.to_string(), score))
            })
            .collect();

        // sort_by is stable, so equal scores stay in candidate order
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);
        scored
    }

    /// Weighted similarity of two raw strings, 0..=100
    pub fn score(query: &str, candidate: &str) -> u8 {
        weighted_ratio(&full_process(query), &full_process(candidate))
    }
}

/// Lowercase, replace non-alphanumerics with spaces, trim.
fn full_process(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

fn percent(similarity: f64) -> f64 {
    (similarity * 100.0).round()
}

/// Sequence similarity of two strings as a percentage
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    percent(f64::from(TextDiff::from_chars(a, b).ratio()))
}

/// Best similarity between the shorter string and any equally long window
/// of the longer one
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    let long_chars: Vec<char> = long.chars().collect();
    if short_len == 0 {
        return 0.0;
    }
    if short_len == long_chars.len() {
        return ratio(short, long);
    }

    let mut best = 0.0_f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let r = f64::from(TextDiff::from_chars(short, window.as_str()).ratio());
        if r > 0.995 {
            return 100.0;
        }
        best = best.max(r);
    }
    percent(best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let (a, b) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&a, &b)
    } else {
        ratio(&a, &b)
    }
}

/// Compares the shared tokens against each side's full token set, so extra
/// words on one side cost little
fn token_set_ratio(a: &str, b: &str, partial: bool) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let intersection = join(tokens_a.intersection(&tokens_b).copied().collect());
    let only_a = join(tokens_a.difference(&tokens_b).copied().collect());
    let only_b = join(tokens_b.difference(&tokens_a).copied().collect());

    let combined_a = format!("{} {}", intersection, only_a).trim().to_string();
    let combined_b = format!("{} {}", intersection, only_b).trim().to_string();

    let score = |x: &str, y: &str| if partial { partial_ratio(x, y) } else { ratio(x, y) };
    score(&intersection, &combined_a)
        .max(score(&intersection, &combined_b))
        .max(score(&combined_a, &combined_b))
}

/// Weighted ratio of two already-normalised strings
fn weighted_ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio(a, b);
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if len_ratio < 1.5 {
        base.max(token_sort_ratio(a, b, false) * UNBASE_SCALE)
            .max(token_set_ratio(a, b, false) * UNBASE_SCALE)
    } else {
        let partial_scale = if len_ratio > 8.0 {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        base.max(partial_ratio(a, b) * partial_scale)
            .max(token_sort_ratio(a, b, true) * UNBASE_SCALE * partial_scale)
            .max(token_set_ratio(a, b, true) * UNBASE_SCALE * partial_scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}
