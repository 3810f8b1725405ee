use crate::feedback::{Pattern, score_guess};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub const STARTING_WORD_COUNT: usize = 5;

/// How well a guess splits the candidate set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionScore {
    /// Expected candidates left afterwards, with every candidate equally likely
    pub expected_remaining: f64,
    /// Size of the largest feedback class (worst case)
    pub max_partition_size: usize,
}

/// A candidate together with the numbers the selector ranks it by.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGuess<'a> {
    pub word: &'a str,
    pub score: PartitionScore,
    pub distinct_letters: usize,
}

impl ScoredGuess<'_> {
    /// Lower is better: expected remaining, then worst case, then more distinct letters.
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        self.score
            .expected_remaining
            .total_cmp(&other.score.expected_remaining)
            .then(self.score.max_partition_size.cmp(&other.score.max_partition_size))
            .then(other.distinct_letters.cmp(&self.distinct_letters))
    }
}

/// Groups `candidates` by the feedback `guess` would get if each were the secret.
pub fn partition<S: AsRef<str>>(guess: &str, candidates: &[S]) -> HashMap<Pattern, usize> {
    let mut pattern_counts: HashMap<Pattern, usize> = HashMap::new();
    for secret in candidates {
        let pattern = score_guess(secret.as_ref(), guess);
        *pattern_counts.entry(pattern).or_insert(0) += 1;
    }
    pattern_counts
}

pub fn score_word_expected_remaining<S: AsRef<str>>(guess: &str, candidates: &[S]) -> PartitionScore {
    let n = candidates.len();
    if n <= 1 {
        return PartitionScore {
            expected_remaining: n as f64,
            max_partition_size: n,
        };
    }

    let counts = partition(guess, candidates);
    let sum_squares: usize = counts.values().map(|&c| c * c).sum();
    let max_partition_size = counts.values().copied().max().unwrap_or(0);
    PartitionScore {
        expected_remaining: sum_squares as f64 / n as f64,
        max_partition_size,
    }
}

/// Shannon entropy, in bits, of the feedback distribution for `guess`.
pub fn score_word_entropy<S: AsRef<str>>(guess: &str, candidates: &[S]) -> f64 {
    let n = candidates.len();
    if n <= 1 {
        return 0.0;
    }

    let total = n as f64;
    partition(guess, candidates)
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

pub fn distinct_letters(word: &str) -> usize {
    word.trim()
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

fn score_candidate<'a, S: AsRef<str>>(word: &'a str, candidates: &[S]) -> ScoredGuess<'a> {
    ScoredGuess {
        word,
        score: score_word_expected_remaining(word, candidates),
        distinct_letters: distinct_letters(word),
    }
}

/// Picks the candidate that best splits the remaining candidates.
///
/// Candidates are visited in order and the best one is replaced only on a
/// strict improvement, so exact ties go to the earliest word.
pub fn pick_best_guess<S: AsRef<str>>(candidates: &[S]) -> Option<&str> {
    match candidates {
        [] => None,
        [only] => Some(only.as_ref()),
        _ => {
            let mut best: Option<ScoredGuess> = None;
            for word in candidates {
                let scored = score_candidate(word.as_ref(), candidates);
                let better = best
                    .as_ref()
                    .is_none_or(|current| scored.cmp_rank(current) == Ordering::Less);
                if better {
                    best = Some(scored);
                }
            }
            best.map(|b| b.word)
        }
    }
}

/// The `limit` best candidates, best first. Ties keep their input order.
pub fn rank_guesses<S: AsRef<str>>(candidates: &[S], limit: usize) -> Vec<ScoredGuess<'_>> {
    let mut ranked: Vec<ScoredGuess> = candidates
        .iter()
        .map(|word| score_candidate(word.as_ref(), candidates))
        .collect();
    ranked.sort_by(|a, b| a.cmp_rank(b));
    ranked.truncate(limit);
    ranked
}

/// Best opening guesses for a whole corpus. Quadratic in the corpus size.
pub fn compute_best_starting_words<S: AsRef<str>>(wordbank: &[S]) -> Vec<String> {
    rank_guesses(wordbank, STARTING_WORD_COUNT)
        .into_iter()
        .map(|scored| scored.word.to_string())
        .collect()
}
