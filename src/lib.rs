// Library interface for wordle-constraints
// This allows integration tests to access internal modules

pub mod cli;
pub mod constraints;
pub mod error;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod solver;
pub mod wordbank;

/// Every word in the corpus has exactly this many letters.
pub const WORD_LENGTH: usize = 5;

// Re-export commonly used functions for easier testing
pub use constraints::{ConstraintState, filter_candidates};
pub use error::SolverError;
pub use feedback::{
    Color, FeedbackItem, HistoryEntry, Pattern, get_guess_feedback, is_valid_result,
    matches_all_feedback, score_guess,
};
pub use game_state::{Phase, RoundOutcome, Session, SessionConfig, autoplay, game_loop};
pub use solver::{
    PartitionScore, compute_best_starting_words, pick_best_guess, rank_guesses,
    score_word_entropy, score_word_expected_remaining,
};
pub use wordbank::{load_wordbank_from_file, load_wordbank_from_str};
