//! Feedback simulation and validation.
//!
//! `score_guess` is the ground truth for how a guess is colored against a
//! secret. Everything else in the crate (constraint tracking, filtering,
//! scoring) is checked against it.

use crate::WORD_LENGTH;
use crate::error::SolverError;
use std::fmt;
use std::str::FromStr;

/// Classification of a single guessed letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Right letter, right position (green)
    Correct,
    /// Letter is in the word at another position (yellow)
    Present,
    /// No unclaimed copy of the letter is left in the word (gray)
    Absent,
}

impl Color {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' => Some(Color::Correct),
            'y' => Some(Color::Present),
            'x' => Some(Color::Absent),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Color::Correct => 'g',
            Color::Present => 'y',
            Color::Absent => 'x',
        }
    }
}

/// A validated result string, at most `WORD_LENGTH` colors long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern {
    colors: [Color; WORD_LENGTH],
    len: u8,
}

impl Pattern {
    /// Builds a pattern from the first `WORD_LENGTH` colors of `colors`.
    pub fn new(colors: &[Color]) -> Self {
        let len = colors.len().min(WORD_LENGTH);
        let mut buf = [Color::Absent; WORD_LENGTH];
        buf[..len].copy_from_slice(&colors[..len]);
        Self {
            colors: buf,
            len: len as u8,
        }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count(&self, color: Color) -> usize {
        self.colors().iter().filter(|&&c| c == color).count()
    }

    /// A full-length, all-green result.
    pub fn is_solved(&self) -> bool {
        self.len() == WORD_LENGTH && self.count(Color::Correct) == WORD_LENGTH
    }
}

impl FromStr for Pattern {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !is_valid_result(trimmed) || trimmed.chars().count() > WORD_LENGTH {
            return Err(SolverError::InvalidFeedbackFormat(trimmed.to_string()));
        }
        let colors: Vec<Color> = trimmed.chars().filter_map(Color::from_char).collect();
        Ok(Self::new(&colors))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.colors() {
            write!(f, "{}", color.to_char())?;
        }
        Ok(())
    }
}

/// One letter of one round's feedback, ready for the constraint tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackItem {
    pub position: usize,
    /// Lowercase ASCII letter
    pub letter: u8,
    pub color: Color,
}

/// A completed round: what was guessed and what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub guess: String,
    pub result: Pattern,
}

impl HistoryEntry {
    pub fn new(guess: &str, result: Pattern) -> Self {
        Self {
            guess: guess.trim().to_ascii_lowercase(),
            result,
        }
    }
}

/// True iff `result` is non-empty and made only of `g`, `y` and `x`
/// (any case, surrounding whitespace ignored).
pub fn is_valid_result(result: &str) -> bool {
    let trimmed = result.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| Color::from_char(c).is_some())
}

/// Colors `guess` as if `secret` were the hidden word.
///
/// Greens are assigned first and consume their secret position. Each
/// remaining guess letter then claims the leftmost unconsumed copy of itself
/// in the secret (yellow), or stays gray. Only the shared prefix of at most
/// `WORD_LENGTH` letters is compared.
pub fn score_guess(secret: &str, guess: &str) -> Pattern {
    let secret = secret.trim().as_bytes();
    let guess = guess.trim().as_bytes();
    let len = secret.len().min(guess.len()).min(WORD_LENGTH);

    let mut colors = [Color::Absent; WORD_LENGTH];
    let mut consumed = [false; WORD_LENGTH];

    for i in 0..len {
        if guess[i].eq_ignore_ascii_case(&secret[i]) {
            colors[i] = Color::Correct;
            consumed[i] = true;
        }
    }

    for i in 0..len {
        if colors[i] == Color::Correct {
            continue;
        }
        let claim = (0..len).find(|&j| !consumed[j] && secret[j].eq_ignore_ascii_case(&guess[i]));
        if let Some(j) = claim {
            colors[i] = Color::Present;
            consumed[j] = true;
        }
    }

    Pattern {
        colors,
        len: len as u8,
    }
}

/// Parses `result` and pairs it with the letters of `guess`.
///
/// Unknown result codes are rejected, never read as gray.
pub fn get_guess_feedback(guess: &str, result: &str) -> Result<Vec<FeedbackItem>, SolverError> {
    let pattern: Pattern = result.parse()?;
    feedback_items(guess, &pattern)
}

/// Pairs an already validated pattern with the letters of `guess`.
pub fn feedback_items(guess: &str, pattern: &Pattern) -> Result<Vec<FeedbackItem>, SolverError> {
    let guess = guess.trim().to_ascii_lowercase();
    if !guess.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(SolverError::InvalidWord(guess));
    }

    Ok(guess
        .bytes()
        .zip(pattern.colors())
        .enumerate()
        .map(|(position, (letter, &color))| FeedbackItem {
            position,
            letter,
            color,
        })
        .collect())
}

/// Treats `candidate` as the secret and replays every past guess against it.
///
/// This is a constraint-free check: the candidate survives only if it would
/// have produced exactly the recorded result every time.
pub fn matches_all_feedback(candidate: &str, history: &[HistoryEntry]) -> bool {
    history
        .iter()
        .all(|entry| score_guess(candidate, &entry.guess) == entry.result)
}
