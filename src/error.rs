use thiserror::Error;

/// Everything the solver and session can report back to a caller.
///
/// None of these abort: each one tells the caller what to do next
/// (re-collect input, undo the last round, or stop).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("invalid feedback '{0}': use 5 characters of g (green), y (yellow) or x (gray)")]
    InvalidFeedbackFormat(String),

    #[error("'{0}' is not a 5-letter word")]
    InvalidWord(String),

    #[error("no candidates remain; the last feedback was probably entered wrong")]
    EmptyCandidateSet,

    #[error("no guess can be selected from an empty candidate set")]
    NoSelectableGuess,

    #[error("out of guesses with {total} candidates left: {}", .sample.join(", "))]
    RoundsExhausted { sample: Vec<String>, total: usize },

    #[error("no guess is waiting for feedback")]
    NoPendingGuess,

    #[error("the game is already over")]
    SessionOver,

    #[error("there is no round to undo")]
    NothingToUndo,

    #[error("round {0} has not been played")]
    RoundOutOfRange(usize),

    #[error("the current board is not solved yet")]
    BoardNotSolved,
}

impl SolverError {
    /// Errors that mean "ask again" rather than "the game changed state".
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SolverError::InvalidFeedbackFormat(_) | SolverError::InvalidWord(_)
        )
    }
}
