//! Solving sessions and the interactive game loop.
//!
//! A `Session` strings the solver primitives together into rounds:
//! `RoundStart` → (guess chosen) → `AwaitingFeedback` → (feedback applied)
//! → one of `Solved`, `Exhausted`, `Failed`, or back to `RoundStart`.

use crate::WORD_LENGTH;
use crate::constraints::{ConstraintState, filter_candidates};
use crate::error::SolverError;
use crate::feedback::{HistoryEntry, Pattern, feedback_items, score_guess};
use crate::solver::{
    PartitionScore, compute_best_starting_words, pick_best_guess, score_word_expected_remaining,
};
use crate::wordbank::{
    corpus_fingerprint, get_opener_cache_path, read_starting_words, write_starting_words,
};
use crate::{debug_log, info_log};
use std::path::PathBuf;

pub const WORDLE_ROUNDS: usize = 6;
pub const OCTORDLE_ROUNDS: usize = 13;
pub const DEFAULT_OPENER: &str = "arise";
/// How many leftover candidates are reported when the rounds run out.
pub const REMAINING_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_rounds: usize,
    /// Fixed first guess; `None` lets the solver pick round one as well
    pub opener: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rounds: WORDLE_ROUNDS,
            opener: Some(DEFAULT_OPENER.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    RoundStart,
    AwaitingFeedback { guess: String },
    Solved { answer: String },
    Exhausted,
    Failed { sample: Vec<String>, total: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Continue { remaining: usize },
    Solved { answer: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessSource {
    /// Carried over from the previous board
    Replay,
    Opener,
    Solver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub guess: String,
    pub score: Option<PartitionScore>,
    pub source: GuessSource,
    pub is_candidate: bool,
}

pub(crate) fn normalize_word(word: &str) -> Result<String, SolverError> {
    let word = word.trim().to_ascii_lowercase();
    if word.len() == WORD_LENGTH && word.bytes().all(|b| b.is_ascii_lowercase()) {
        Ok(word)
    } else {
        Err(SolverError::InvalidWord(word))
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    corpus: Vec<String>,
    candidates: Vec<String>,
    constraints: ConstraintState,
    history: Vec<HistoryEntry>,
    config: SessionConfig,
    replay: Vec<String>,
    phase: Phase,
}

impl Session {
    pub fn new(corpus: Vec<String>, config: SessionConfig) -> Self {
        Self {
            candidates: corpus.clone(),
            corpus,
            constraints: ConstraintState::new(),
            history: Vec::new(),
            config,
            replay: Vec::new(),
            phase: Phase::RoundStart,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn constraints(&self) -> &ConstraintState {
        &self.constraints
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn replay_queue(&self) -> &[String] {
        &self.replay
    }

    /// Zero-based index of the round being played.
    pub fn round(&self) -> usize {
        self.history.len()
    }

    pub fn is_over(&self) -> bool {
        matches!(
            self.phase,
            Phase::Solved { .. } | Phase::Exhausted | Phase::Failed { .. }
        )
    }

    /// Guesses still available after the one for the current round.
    pub fn guesses_left(&self) -> usize {
        self.config.max_rounds.saturating_sub(self.round() + 1)
    }

    pub fn is_guaranteed(&self) -> bool {
        let left = self.guesses_left();
        left > 0 && self.candidates.len() <= left
    }

    pub fn is_at_risk(&self) -> bool {
        let left = self.guesses_left();
        left > 0 && self.candidates.len() > left
    }

    fn pending_replay(&self) -> Option<&String> {
        self.replay.get(self.round())
    }

    /// Queued guesses from the previous board still come first, as long as
    /// the round budget allows them.
    fn replay_pending(&self) -> bool {
        self.round() < self.replay.len() && self.round() < self.config.max_rounds
    }

    /// The answer, once it is the only candidate left but queued replay
    /// guesses are still being played.
    pub fn early_winner(&self) -> Option<&str> {
        match (&self.phase, self.candidates.as_slice()) {
            (Phase::RoundStart | Phase::AwaitingFeedback { .. }, [answer])
                if self.replay_pending() =>
            {
                Some(answer.as_str())
            }
            _ => None,
        }
    }

    /// Guesses the board takes, counting the deduced answer as one more
    /// guess when it was never played.
    pub fn guesses_used(&self) -> usize {
        match (&self.phase, self.history.last()) {
            (Phase::Solved { answer }, Some(last)) if &last.guess != answer => self.round() + 1,
            _ => self.round(),
        }
    }

    pub fn recommend(&self) -> Result<Recommendation, SolverError> {
        if self.is_over() {
            return Err(SolverError::SessionOver);
        }

        let (guess, source) = if let Some(queued) = self.pending_replay() {
            (queued.clone(), GuessSource::Replay)
        } else if let Some(opener) = self.config.opener.as_ref().filter(|_| self.round() == 0) {
            (opener.clone(), GuessSource::Opener)
        } else {
            let best = pick_best_guess(&self.candidates).ok_or(SolverError::NoSelectableGuess)?;
            (best.to_string(), GuessSource::Solver)
        };

        let score = (source == GuessSource::Solver)
            .then(|| score_word_expected_remaining(&guess, &self.candidates));
        let is_candidate = self.candidates.contains(&guess);
        Ok(Recommendation {
            guess,
            score,
            source,
            is_candidate,
        })
    }

    /// Commits to `word` for this round. Any 5-letter word is allowed, so a
    /// caller can override the recommendation.
    pub fn choose_guess(&mut self, word: &str) -> Result<(), SolverError> {
        if self.is_over() {
            return Err(SolverError::SessionOver);
        }
        let guess = normalize_word(word)?;
        debug_log!("Round {}: guessing '{}'", self.round() + 1, guess);
        self.phase = Phase::AwaitingFeedback { guess };
        Ok(())
    }

    pub fn submit_feedback(&mut self, result: &str) -> Result<RoundOutcome, SolverError> {
        let guess = match &self.phase {
            Phase::AwaitingFeedback { guess } => guess.clone(),
            Phase::RoundStart => return Err(SolverError::NoPendingGuess),
            _ => return Err(SolverError::SessionOver),
        };

        let pattern = parse_full_result(result)?;
        self.history.push(HistoryEntry::new(&guess, pattern));

        if !pattern.is_solved() {
            self.constraints
                .apply_feedback(&feedback_items(&guess, &pattern)?);
            let before = self.candidates.len();
            self.candidates =
                filter_candidates(&self.candidates, &self.constraints, &self.history);
            debug_log!(
                "Round {}: {} -> {} candidates",
                self.round(),
                before,
                self.candidates.len()
            );
        }

        self.settle()
    }

    /// Moves to the phase implied by the current candidates and round count.
    fn settle(&mut self) -> Result<RoundOutcome, SolverError> {
        if let Some(last) = self.history.last()
            && last.result.is_solved()
        {
            let answer = last.guess.clone();
            info_log!("Solved '{}' in {} guesses", answer, self.round());
            self.phase = Phase::Solved {
                answer: answer.clone(),
            };
            return Ok(RoundOutcome::Solved { answer });
        }

        match self.candidates.as_slice() {
            [] => {
                self.phase = Phase::Exhausted;
                Err(SolverError::EmptyCandidateSet)
            }
            [answer] if self.replay_pending() => {
                debug_log!("'{}' is the only candidate, replay continues", answer);
                self.phase = Phase::RoundStart;
                Ok(RoundOutcome::Continue { remaining: 1 })
            }
            [answer] => {
                self.phase = Phase::Solved {
                    answer: answer.clone(),
                };
                Ok(RoundOutcome::Solved {
                    answer: answer.clone(),
                })
            }
            remaining if self.round() >= self.config.max_rounds => {
                let sample: Vec<String> = remaining
                    .iter()
                    .take(REMAINING_SAMPLE_SIZE)
                    .cloned()
                    .collect();
                let total = remaining.len();
                self.phase = Phase::Failed {
                    sample: sample.clone(),
                    total,
                };
                Err(SolverError::RoundsExhausted { sample, total })
            }
            remaining => {
                self.phase = Phase::RoundStart;
                Ok(RoundOutcome::Continue {
                    remaining: remaining.len(),
                })
            }
        }
    }

    /// Recomputes constraints and candidates from the corpus and `history`.
    fn rebuild(&mut self, history: Vec<HistoryEntry>) -> Result<(), SolverError> {
        self.constraints = ConstraintState::from_history(&history)?;
        self.candidates = filter_candidates(&self.corpus, &self.constraints, &history);
        self.history = history;
        Ok(())
    }

    /// Drops the last round so its feedback can be entered again.
    ///
    /// A guess that is still waiting for feedback is discarded as well: the
    /// session goes back to awaiting feedback for the popped round's guess.
    pub fn undo_last(&mut self) -> Result<HistoryEntry, SolverError> {
        let mut history = self.history.clone();
        let last = history.pop().ok_or(SolverError::NothingToUndo)?;
        self.rebuild(history)?;
        info_log!(
            "Undid round {} ('{}'), {} candidates",
            self.round() + 1,
            last.guess,
            self.candidates.len()
        );
        self.phase = Phase::AwaitingFeedback {
            guess: last.guess.clone(),
        };
        Ok(last)
    }

    /// Corrects the feedback recorded for `round` (zero-based) and replays
    /// the whole history from scratch.
    pub fn replace_feedback(
        &mut self,
        round: usize,
        result: &str,
    ) -> Result<RoundOutcome, SolverError> {
        if round >= self.history.len() {
            return Err(SolverError::RoundOutOfRange(round));
        }
        let pattern = parse_full_result(result)?;

        let mut history = self.history.clone();
        history[round].result = pattern;
        // Rounds after an all-green one never happened.
        if pattern.is_solved() {
            history.truncate(round + 1);
        }
        self.rebuild(history)?;
        self.settle()
    }

    /// Starts the next board of a chained run, replaying this board's guesses.
    pub fn next_board(&self) -> Result<Session, SolverError> {
        let Phase::Solved { answer } = &self.phase else {
            return Err(SolverError::BoardNotSolved);
        };

        let played: Vec<String> = self.history.iter().map(|e| e.guess.clone()).collect();
        let mut replay = played.clone();
        replay.extend(self.replay.iter().skip(played.len()).cloned());
        if played.last() != Some(answer) {
            replay.push(answer.clone());
        }

        let mut next = Session::new(self.corpus.clone(), self.config.clone());
        next.replay = replay;
        Ok(next)
    }
}

fn parse_full_result(result: &str) -> Result<Pattern, SolverError> {
    let pattern: Pattern = result.parse()?;
    if pattern.len() != WORD_LENGTH {
        return Err(SolverError::InvalidFeedbackFormat(result.trim().to_string()));
    }
    Ok(pattern)
}

/// Plays a whole session against a known `secret`, following the recommendations.
///
/// When the solver deduces the answer without having guessed it, the answer
/// is played as one more round if the budget allows.
pub fn autoplay(
    corpus: &[String],
    config: &SessionConfig,
    secret: &str,
) -> Result<Vec<HistoryEntry>, SolverError> {
    let secret = normalize_word(secret)?;
    let mut session = Session::new(corpus.to_vec(), config.clone());

    while !session.is_over() {
        let recommendation = session.recommend()?;
        session.choose_guess(&recommendation.guess)?;
        let result = score_guess(&secret, &recommendation.guess).to_string();
        session.submit_feedback(&result)?;
    }

    let mut history = session.history;
    if let Phase::Solved { answer } = session.phase
        && history.last().is_some_and(|last| last.guess != answer)
        && history.len() < config.max_rounds
    {
        let result = score_guess(&secret, &answer);
        history.push(HistoryEntry::new(&answer, result));
    }
    Ok(history)
}

/// Ranked openers for a corpus, and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartingWordsInfo {
    pub words: Vec<String>,
    pub used_cache: bool,
    pub cache_path: Option<PathBuf>,
}

/// Returns the best openers for `wordbank`, from the cache when it matches
/// this corpus, otherwise computed (quadratic) and cached.
pub fn load_or_compute_starting_words(
    wordbank: &[String],
    cache_path: Option<PathBuf>,
) -> StartingWordsInfo {
    let fingerprint = corpus_fingerprint(wordbank);
    if let Some(path) = cache_path.as_deref()
        && let Some(words) = read_starting_words(path, &fingerprint)
    {
        return StartingWordsInfo {
            words,
            used_cache: true,
            cache_path,
        };
    }

    info_log!("Computing starting words for {} words", wordbank.len());
    let words = compute_best_starting_words(wordbank);
    if let Some(path) = cache_path.as_deref()
        && let Err(err) = write_starting_words(path, &fingerprint, &words)
    {
        log::warn!("Could not cache starting words to {}: {}", path.display(), err);
    }

    StartingWordsInfo {
        words,
        used_cache: false,
        cache_path,
    }
}

/// Same as `load_or_compute_starting_words`, using the per-user cache directory.
pub fn starting_words(wordbank: &[String]) -> StartingWordsInfo {
    load_or_compute_starting_words(wordbank, get_opener_cache_path())
}

/// Things a player can ask for at the guess prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    AcceptSuggestion,
    Undo,
    NewGame,
    NextBoard,
    Exit,
}

/// Front end for `game_loop`, implemented by the line-based CLI.
pub trait GameInterface {
    fn display_new_game_message(&mut self, word_count: usize, max_rounds: usize);
    fn display_recommendation(&mut self, round: usize, recommendation: &Recommendation);
    /// `None` means the input was not understood and the prompt should repeat.
    fn read_action(&mut self) -> Option<UserAction>;
    /// `None` means the player gave up on entering feedback (end of input or exit).
    fn read_feedback(&mut self, guess: &str) -> Option<String>;
    fn display_candidates(&mut self, candidates: &[String]);
    fn display_outlook(&mut self, candidates: usize, guesses_left: usize, guaranteed: bool);
    fn display_solution_found(&mut self, solution: &str, guesses: usize);
    fn display_undo(&mut self, undone: &HistoryEntry, candidates: usize);
    fn display_error(&mut self, error: &SolverError);
    fn display_exit_message(&mut self);
}

fn refresh_recommendation<I: GameInterface>(
    session: &Session,
    interface: &mut I,
) -> Option<Recommendation> {
    if session.is_over() {
        return None;
    }
    match session.recommend() {
        Ok(rec) => {
            interface.display_recommendation(session.round(), &rec);
            Some(rec)
        }
        Err(err) => {
            interface.display_error(&err);
            None
        }
    }
}

/// Drives sessions until the player exits (or input ends) and returns the
/// phase the last session finished in.
pub fn game_loop<I: GameInterface>(
    corpus: &[String],
    config: &SessionConfig,
    interface: &mut I,
) -> Phase {
    let mut session = Session::new(corpus.to_vec(), config.clone());
    interface.display_new_game_message(corpus.len(), config.max_rounds);
    let mut recommendation = refresh_recommendation(&session, interface);

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };

        let guess = match action {
            UserAction::Exit => {
                interface.display_exit_message();
                return session.phase().clone();
            }
            UserAction::NewGame => {
                session = Session::new(corpus.to_vec(), config.clone());
                interface.display_new_game_message(corpus.len(), config.max_rounds);
                recommendation = refresh_recommendation(&session, interface);
                continue;
            }
            UserAction::NextBoard => {
                match session.next_board() {
                    Ok(next) => {
                        session = next;
                        interface.display_new_game_message(corpus.len(), config.max_rounds);
                        recommendation = refresh_recommendation(&session, interface);
                    }
                    Err(err) => interface.display_error(&err),
                }
                continue;
            }
            UserAction::Undo => {
                match session.undo_last() {
                    Ok(entry) => interface.display_undo(&entry, session.candidates().len()),
                    Err(err) => interface.display_error(&err),
                }
                match session.phase() {
                    Phase::AwaitingFeedback { guess } => guess.clone(),
                    _ => continue,
                }
            }
            UserAction::AcceptSuggestion => match &recommendation {
                Some(rec) => rec.guess.clone(),
                None => {
                    interface.display_error(&SolverError::NoSelectableGuess);
                    continue;
                }
            },
            UserAction::Guess(word) => word,
        };

        if let Err(err) = session.choose_guess(&guess) {
            interface.display_error(&err);
            continue;
        }

        let outcome = loop {
            let Some(input) = interface.read_feedback(&guess) else {
                interface.display_exit_message();
                return session.phase().clone();
            };
            match session.submit_feedback(&input) {
                Err(err) if err.is_input_error() => interface.display_error(&err),
                other => break other,
            }
        };

        match outcome {
            Ok(RoundOutcome::Continue { .. }) => {
                interface.display_candidates(session.candidates());
                interface.display_outlook(
                    session.candidates().len(),
                    session.guesses_left(),
                    session.is_guaranteed(),
                );
            }
            Ok(RoundOutcome::Solved { answer }) => {
                interface.display_solution_found(&answer, session.guesses_used());
            }
            Err(err) => interface.display_error(&err),
        }
        recommendation = refresh_recommendation(&session, interface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_opener(max_rounds: usize) -> SessionConfig {
        SessionConfig {
            max_rounds,
            opener: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.max_rounds, WORDLE_ROUNDS);
        assert_eq!(config.opener.as_deref(), Some("arise"));
    }

    #[test]
    fn test_first_round_uses_opener() {
        let session = Session::new(corpus(&["crane", "slate"]), SessionConfig::default());
        let rec = session.recommend().unwrap();
        assert_eq!(rec.guess, "arise");
        assert_eq!(rec.source, GuessSource::Opener);
        assert!(rec.score.is_none());
        assert!(!rec.is_candidate);
    }

    #[test]
    fn test_solver_recommendation_carries_score() {
        let session = Session::new(corpus(&["crane", "slate", "trace"]), no_opener(6));
        let rec = session.recommend().unwrap();
        assert_eq!(rec.source, GuessSource::Solver);
        assert!(rec.is_candidate);
        assert!(rec.score.is_some());
    }

    #[test]
    fn test_empty_corpus_has_no_selectable_guess() {
        let session = Session::new(Vec::new(), no_opener(6));
        assert_eq!(session.recommend(), Err(SolverError::NoSelectableGuess));
    }

    #[test]
    fn test_feedback_without_guess_is_rejected() {
        let mut session = Session::new(corpus(&["crane"]), no_opener(6));
        assert_eq!(
            session.submit_feedback("ggggg"),
            Err(SolverError::NoPendingGuess)
        );
    }

    #[test]
    fn test_invalid_guess_is_rejected() {
        let mut session = Session::new(corpus(&["crane"]), no_opener(6));
        assert!(matches!(
            session.choose_guess("cr4ne"),
            Err(SolverError::InvalidWord(_))
        ));
        assert!(matches!(
            session.choose_guess("cranes"),
            Err(SolverError::InvalidWord(_))
        ));
        assert_eq!(session.phase(), &Phase::RoundStart);
    }

    #[test]
    fn test_invalid_feedback_keeps_phase() {
        let mut session = Session::new(corpus(&["crane", "slate"]), no_opener(6));
        session.choose_guess("crane").unwrap();
        for bad in ["gggg", "gggggg", "gyxxq", ""] {
            assert!(matches!(
                session.submit_feedback(bad),
                Err(SolverError::InvalidFeedbackFormat(_))
            ));
        }
        assert!(session.history().is_empty());
        assert_eq!(
            session.phase(),
            &Phase::AwaitingFeedback {
                guess: "crane".to_string()
            }
        );
    }

    #[test]
    fn test_all_green_solves() {
        let mut session = Session::new(corpus(&["crane", "slate"]), no_opener(6));
        session.choose_guess("CRANE").unwrap();
        let outcome = session.submit_feedback("GGGGG").unwrap();
        assert_eq!(
            outcome,
            RoundOutcome::Solved {
                answer: "crane".to_string()
            }
        );
        assert!(session.is_over());
        assert_eq!(session.recommend(), Err(SolverError::SessionOver));
        assert_eq!(session.choose_guess("slate"), Err(SolverError::SessionOver));
    }

    #[test]
    fn test_single_candidate_solves() {
        let mut session = Session::new(corpus(&["brake", "crane", "flake"]), no_opener(6));
        session.choose_guess("crane").unwrap();
        // Secret "flake": only flake survives.
        let result = score_guess("flake", "crane").to_string();
        let outcome = session.submit_feedback(&result).unwrap();
        assert_eq!(
            outcome,
            RoundOutcome::Solved {
                answer: "flake".to_string()
            }
        );
    }

    #[test]
    fn test_exhausted_then_undo_recovers() {
        let mut session = Session::new(corpus(&["crane", "slate"]), no_opener(6));
        session.choose_guess("crane").unwrap();
        assert_eq!(
            session.submit_feedback("xxxxx"),
            Err(SolverError::EmptyCandidateSet)
        );
        assert_eq!(session.phase(), &Phase::Exhausted);

        let undone = session.undo_last().unwrap();
        assert_eq!(undone.guess, "crane");
        assert_eq!(session.candidates().len(), 2);
        assert_eq!(session.round(), 0);

        // Re-enter the correct colors for the same guess: secret is "slate".
        let result = score_guess("slate", "crane").to_string();
        assert_eq!(
            session.submit_feedback(&result).unwrap(),
            RoundOutcome::Solved {
                answer: "slate".to_string()
            }
        );
    }

    #[test]
    fn test_undo_with_empty_history() {
        let mut session = Session::new(corpus(&["crane"]), no_opener(6));
        assert_eq!(session.undo_last(), Err(SolverError::NothingToUndo));
    }

    #[test]
    fn test_rounds_exhausted_reports_sample() {
        let words = corpus(&["bcdfg", "hjklm", "npqrs", "twvxz"]);
        let mut session = Session::new(words, no_opener(1));
        session.choose_guess("aeiou").unwrap();
        match session.submit_feedback("xxxxx") {
            Err(SolverError::RoundsExhausted { sample, total }) => {
                assert_eq!(total, 4);
                assert_eq!(sample.len(), 4);
            }
            other => panic!("expected RoundsExhausted, got {other:?}"),
        }
        assert!(matches!(session.phase(), Phase::Failed { total: 4, .. }));
    }

    #[test]
    fn test_rounds_exhausted_truncates_sample() {
        let words = corpus(&[
            "brake", "crane", "drake", "flake", "snake", "trace", "grace", "place", "space",
            "slate", "stale", "share", "shore", "store", "stone",
        ]);
        let mut session = Session::new(words.clone(), no_opener(1));
        session.choose_guess("zzzzz").unwrap();
        match session.submit_feedback("xxxxx") {
            Err(SolverError::RoundsExhausted { sample, total }) => {
                assert_eq!(total, 15);
                assert_eq!(sample.len(), REMAINING_SAMPLE_SIZE);
                assert_eq!(sample, words[..REMAINING_SAMPLE_SIZE]);
            }
            other => panic!("expected RoundsExhausted, got {other:?}"),
        }
        assert!(matches!(session.phase(), Phase::Failed { total: 15, .. }));
    }

    #[test]
    fn test_undo_discards_pending_guess() {
        let words = corpus(&["bcdfg", "hjklm", "npqrs"]);
        let mut session = Session::new(words, no_opener(6));
        session.choose_guess("aeiou").unwrap();
        session.submit_feedback("xxxxx").unwrap();
        session.choose_guess("bcdfg").unwrap();

        let undone = session.undo_last().unwrap();
        assert_eq!(undone.guess, "aeiou");
        assert_eq!(session.round(), 0);
        assert_eq!(
            session.phase(),
            &Phase::AwaitingFeedback {
                guess: "aeiou".to_string()
            }
        );
        assert_eq!(session.candidates().len(), 3);
    }

    #[test]
    fn test_candidates_shrink_monotonically() {
        let words = corpus(&[
            "arose", "prose", "those", "whose", "chose", "close", "loose", "moose", "noose",
            "goose",
        ]);
        let secret = "those";
        let mut session = Session::new(words, no_opener(6));
        let mut previous: Vec<String> = session.candidates().to_vec();

        while !session.is_over() {
            let rec = session.recommend().unwrap();
            session.choose_guess(&rec.guess).unwrap();
            let result = score_guess(secret, &rec.guess).to_string();
            session.submit_feedback(&result).unwrap();
            assert!(session.candidates().iter().all(|w| previous.contains(w)));
            assert!(session.candidates().contains(&secret.to_string()));
            previous = session.candidates().to_vec();
        }
        assert_eq!(
            session.phase(),
            &Phase::Solved {
                answer: secret.to_string()
            }
        );
    }

    #[test]
    fn test_replace_feedback_rebuilds_from_history() {
        let words = corpus(&["brake", "crane", "drake", "flake", "snake"]);
        let mut session = Session::new(words, no_opener(6));
        session.choose_guess("crane").unwrap();
        // Wrong colors first: claims no letter matched.
        assert_eq!(
            session.submit_feedback("xxxxx"),
            Err(SolverError::EmptyCandidateSet)
        );

        // Secret "brake": brake and drake both fit the real colors.
        let corrected = score_guess("brake", "crane").to_string();
        let outcome = session.replace_feedback(0, &corrected).unwrap();
        assert_eq!(outcome, RoundOutcome::Continue { remaining: 2 });
        assert_eq!(session.phase(), &Phase::RoundStart);
        assert_eq!(
            session.constraints(),
            &ConstraintState::from_history(session.history()).unwrap()
        );
        assert_eq!(
            session.replace_feedback(3, "ggggg"),
            Err(SolverError::RoundOutOfRange(3))
        );
    }

    #[test]
    fn test_outlook_flags() {
        let words = corpus(&["crane", "slate", "trace"]);
        let session = Session::new(words.clone(), no_opener(6));
        assert_eq!(session.guesses_left(), 5);
        assert!(session.is_guaranteed());
        assert!(!session.is_at_risk());

        let tight = Session::new(words, no_opener(2));
        assert_eq!(tight.guesses_left(), 1);
        assert!(!tight.is_guaranteed());
        assert!(tight.is_at_risk());
    }

    #[test]
    fn test_next_board_replays_guesses() {
        let words = corpus(&["brake", "crane", "flake"]);
        let mut session = Session::new(words, SessionConfig::default());
        assert_eq!(session.next_board().err(), Some(SolverError::BoardNotSolved));

        session.choose_guess("crane").unwrap();
        let result = score_guess("flake", "crane").to_string();
        session.submit_feedback(&result).unwrap();

        let next = session.next_board().unwrap();
        assert_eq!(next.replay_queue(), &["crane".to_string(), "flake".to_string()]);
        assert_eq!(next.candidates().len(), 3);
        let rec = next.recommend().unwrap();
        assert_eq!(rec.guess, "crane");
        assert_eq!(rec.source, GuessSource::Replay);
    }

    #[test]
    fn test_next_board_does_not_repeat_played_answer() {
        let mut session = Session::new(corpus(&["crane", "slate"]), no_opener(6));
        session.choose_guess("slate").unwrap();
        session.submit_feedback("ggggg").unwrap();
        let next = session.next_board().unwrap();
        assert_eq!(next.replay_queue(), &["slate".to_string()]);
    }

    #[test]
    fn test_next_board_keeps_unplayed_replay_guesses() {
        let words = corpus(&["brake", "crane", "flake", "slate"]);
        let mut session = Session::new(words, no_opener(6));
        session.replay = corpus(&["crane", "slate", "brake"]);

        session.choose_guess("crane").unwrap();
        session.submit_feedback("ggggg").unwrap();
        let next = session.next_board().unwrap();
        assert_eq!(next.replay_queue(), &corpus(&["crane", "slate", "brake"])[..]);
    }

    #[test]
    fn test_chained_board_keeps_replaying_after_early_winner() {
        let words = corpus(&["brake", "crane", "drake", "flake", "snake"]);
        let mut first = Session::new(words, no_opener(6));
        for guess in ["snake", "brake"] {
            first.choose_guess(guess).unwrap();
            first
                .submit_feedback(&score_guess("drake", guess).to_string())
                .unwrap();
        }
        assert_eq!(
            first.phase(),
            &Phase::Solved {
                answer: "drake".to_string()
            }
        );
        assert_eq!(first.guesses_used(), 3);

        let mut second = first.next_board().unwrap();
        assert_eq!(
            second.replay_queue(),
            &corpus(&["snake", "brake", "drake"])[..]
        );

        // The first replayed guess already pins "crane", but the queue is played out.
        for (i, expected) in ["snake", "brake", "drake"].into_iter().enumerate() {
            let rec = second.recommend().unwrap();
            assert_eq!(rec.guess, expected);
            assert_eq!(rec.source, GuessSource::Replay);
            second.choose_guess(&rec.guess).unwrap();
            let outcome = second
                .submit_feedback(&score_guess("crane", expected).to_string())
                .unwrap();
            if i < 2 {
                assert_eq!(outcome, RoundOutcome::Continue { remaining: 1 });
                assert_eq!(second.early_winner(), Some("crane"));
                assert!(!second.is_over());
            } else {
                assert_eq!(
                    outcome,
                    RoundOutcome::Solved {
                        answer: "crane".to_string()
                    }
                );
            }
        }

        assert_eq!(second.history().len(), 3);
        assert_eq!(second.early_winner(), None);
        assert_eq!(second.guesses_used(), 4);
    }

    #[test]
    fn test_early_winner_stops_at_round_budget() {
        let words = corpus(&["brake", "crane", "drake"]);
        let mut session = Session::new(words, no_opener(1));
        session.replay = corpus(&["brake", "drake"]);
        session.choose_guess("brake").unwrap();
        assert_eq!(
            session.submit_feedback(&score_guess("crane", "brake").to_string()),
            Ok(RoundOutcome::Solved {
                answer: "crane".to_string()
            })
        );
    }

    #[test]
    fn test_starting_words_are_cached_per_corpus() {
        let path = std::env::temp_dir()
            .join("wordle_constraints_session_cache")
            .join("openers.txt");
        let _ = std::fs::remove_file(&path);
        let words = corpus(&["crane", "slate", "raise", "stare", "arise", "irate"]);

        let first = load_or_compute_starting_words(&words, Some(path.clone()));
        assert!(!first.used_cache);
        assert_eq!(first.words.len(), 5);

        let second = load_or_compute_starting_words(&words, Some(path.clone()));
        assert!(second.used_cache);
        assert_eq!(second.words, first.words);

        // A different corpus must not reuse the cached openers.
        let other = corpus(&["brake", "drake", "flake"]);
        let third = load_or_compute_starting_words(&other, Some(path.clone()));
        assert!(!third.used_cache);
        assert!(third.words.iter().all(|w| other.contains(w)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_starting_words_without_cache_path() {
        let words = corpus(&["crane", "slate"]);
        let info = load_or_compute_starting_words(&words, None);
        assert!(!info.used_cache);
        assert_eq!(info.words.len(), 2);
    }

    #[test]
    fn test_autoplay_solves_every_word() {
        let words = corpus(&[
            "brake", "crane", "drake", "flake", "snake", "trace", "grace", "place", "space",
        ]);
        for secret in &words {
            let history = autoplay(&words, &SessionConfig::default(), secret).unwrap();
            let last = history.last().unwrap();
            assert_eq!(&last.guess, secret);
            assert!(last.result.is_solved());
            assert!(history.len() <= WORDLE_ROUNDS);
        }
    }
}
