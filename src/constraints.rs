//! Accumulated letter constraints and candidate filtering.

use crate::WORD_LENGTH;
use crate::debug_log;
use crate::error::SolverError;
use crate::feedback::{Color, FeedbackItem, HistoryEntry, feedback_items, matches_all_feedback};

const ALPHABET_SIZE: usize = 26;

fn letter_index(letter: u8) -> Option<usize> {
    letter
        .is_ascii_lowercase()
        .then(|| (letter - b'a') as usize)
}

/// Positions (0..WORD_LENGTH) packed into a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionSet(u8);

impl PositionSet {
    pub fn insert(&mut self, position: usize) {
        debug_assert!(position < WORD_LENGTH);
        self.0 |= 1 << position;
    }

    pub fn contains(&self, position: usize) -> bool {
        position < WORD_LENGTH && self.0 & (1 << position) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WORD_LENGTH).filter(move |&p| self.contains(p))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Everything known about the secret after some number of rounds.
///
/// This is a plain value: copying it gives an independent snapshot, so a
/// hypothetical branch never aliases the live session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintState {
    position_known: [Option<u8>; WORD_LENGTH],
    /// Present letters, with the positions they are known not to occupy
    must_contain: [Option<PositionSet>; ALPHABET_SIZE],
    min_counts: [u8; ALPHABET_SIZE],
    max_counts: [Option<u8>; ALPHABET_SIZE],
}

#[derive(Debug, Clone, Copy, Default)]
struct LetterTally {
    correct: u8,
    present: u8,
    absent: u8,
}

impl LetterTally {
    fn confirmed(&self) -> u8 {
        self.correct.saturating_add(self.present)
    }
}

impl ConstraintState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the state from scratch by folding every round of `history`.
    pub fn from_history(history: &[HistoryEntry]) -> Result<Self, SolverError> {
        let mut state = Self::new();
        for entry in history {
            state.apply_feedback(&feedback_items(&entry.guess, &entry.result)?);
        }
        Ok(state)
    }

    /// Same as `apply_feedback`, but returns the updated snapshot.
    #[must_use]
    pub fn with_feedback(mut self, items: &[FeedbackItem]) -> Self {
        self.apply_feedback(items);
        self
    }

    /// Folds one round of feedback into the state.
    pub fn apply_feedback(&mut self, items: &[FeedbackItem]) {
        let mut tallies = [LetterTally::default(); ALPHABET_SIZE];
        let mut seen = [false; ALPHABET_SIZE];

        for item in items {
            let Some(idx) = letter_index(item.letter) else {
                debug_log!("Skipping non-letter feedback item {:?}", item);
                continue;
            };
            if item.position >= WORD_LENGTH {
                debug_log!("Skipping out-of-range feedback item {:?}", item);
                continue;
            }
            seen[idx] = true;

            match item.color {
                Color::Correct => {
                    tallies[idx].correct = tallies[idx].correct.saturating_add(1);
                    let known = self.position_known[item.position].get_or_insert(item.letter);
                    if *known != item.letter {
                        log::warn!(
                            "Position {} already fixed to '{}', ignoring '{}'",
                            item.position,
                            *known as char,
                            item.letter as char
                        );
                    }
                }
                Color::Present => {
                    tallies[idx].present = tallies[idx].present.saturating_add(1);
                    self.must_contain[idx]
                        .get_or_insert_with(PositionSet::default)
                        .insert(item.position);
                }
                Color::Absent => {
                    tallies[idx].absent = tallies[idx].absent.saturating_add(1);
                }
            }
        }

        // A gray copy of a letter that is confirmed elsewhere still rules out its own position.
        for item in items {
            let Some(idx) = letter_index(item.letter) else {
                continue;
            };
            if item.color == Color::Absent
                && item.position < WORD_LENGTH
                && tallies[idx].confirmed() > 0
            {
                self.must_contain[idx]
                    .get_or_insert_with(PositionSet::default)
                    .insert(item.position);
            }
        }

        for idx in (0..ALPHABET_SIZE).filter(|&i| seen[i]) {
            let tally = tallies[idx];
            let confirmed = tally.confirmed();

            self.min_counts[idx] = self.min_counts[idx].max(confirmed);

            if tally.absent > 0 {
                let capped = self.max_counts[idx].map_or(confirmed, |max| max.min(confirmed));
                self.max_counts[idx] = Some(capped);
            }

            if let Some(max) = self.max_counts[idx]
                && max < self.min_counts[idx]
            {
                debug_log!(
                    "Dropping max bound {} for '{}' below min {}",
                    max,
                    (b'a' + idx as u8) as char,
                    self.min_counts[idx]
                );
                self.max_counts[idx] = None;
            }
        }

        debug_assert!(self.bounds_consistent());
    }

    fn bounds_consistent(&self) -> bool {
        (0..ALPHABET_SIZE).all(|i| self.max_counts[i].is_none_or(|max| max >= self.min_counts[i]))
    }

    /// Checks `word` against every positional and count constraint.
    pub fn is_valid_candidate(&self, word: &str) -> bool {
        let word = word.trim().as_bytes();
        let mut counts = [0u8; ALPHABET_SIZE];
        for &b in word {
            if let Some(idx) = letter_index(b.to_ascii_lowercase()) {
                counts[idx] = counts[idx].saturating_add(1);
            }
        }
        let at = |i: usize| word.get(i).map(u8::to_ascii_lowercase);

        for (i, known) in self.position_known.iter().enumerate() {
            if let Some(letter) = known
                && at(i) != Some(*letter)
            {
                return false;
            }
        }

        for (idx, excluded) in self.must_contain.iter().enumerate() {
            let Some(excluded) = excluded else {
                continue;
            };
            let letter = b'a' + idx as u8;
            if counts[idx] == 0 || excluded.iter().any(|p| at(p) == Some(letter)) {
                return false;
            }
        }

        (0..ALPHABET_SIZE).all(|idx| {
            counts[idx] >= self.min_counts[idx]
                && self.max_counts[idx].is_none_or(|max| counts[idx] <= max)
        })
    }

    pub fn position_known(&self, position: usize) -> Option<char> {
        self.position_known.get(position).copied().flatten().map(char::from)
    }

    /// Positions `letter` is known not to occupy, or `None` if the letter
    /// is not known to be present.
    pub fn excluded_positions(&self, letter: char) -> Option<PositionSet> {
        self.index_of(letter).and_then(|idx| self.must_contain[idx])
    }

    pub fn min_count(&self, letter: char) -> u8 {
        self.index_of(letter).map_or(0, |idx| self.min_counts[idx])
    }

    pub fn max_count(&self, letter: char) -> Option<u8> {
        self.index_of(letter).and_then(|idx| self.max_counts[idx])
    }

    fn index_of(&self, letter: char) -> Option<usize> {
        u8::try_from(letter.to_ascii_lowercase())
            .ok()
            .and_then(letter_index)
    }
}

/// Keeps the words that satisfy `state` and replay cleanly against `history`.
/// Input order is preserved.
pub fn filter_candidates(
    candidates: &[String],
    state: &ConstraintState,
    history: &[HistoryEntry],
) -> Vec<String> {
    candidates
        .iter()
        .filter(|word| state.is_valid_candidate(word) && matches_all_feedback(word, history))
        .cloned()
        .collect()
}
