use crate::error::SolverError;
use crate::feedback::HistoryEntry;
use crate::game_state::{
    DEFAULT_OPENER, GameInterface, GuessSource, OCTORDLE_ROUNDS, Recommendation, SessionConfig,
    StartingWordsInfo, UserAction, WORDLE_ROUNDS, normalize_word,
};
use crate::solver::rank_guesses;
use clap::{ArgAction, Parser};
use std::io::BufRead;

pub const DEFAULT_TOP: usize = 5;

/// Constraint-based Wordle solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited wordbank file
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<String>,

    /// Maximum number of guesses per board
    #[arg(short = 'r', long = "max-rounds", conflicts_with = "octordle")]
    pub max_rounds: Option<usize>,

    /// Use the octordle guess budget
    #[arg(long)]
    pub octordle: bool,

    /// First guess of every board
    #[arg(long, default_value = DEFAULT_OPENER, conflicts_with = "best_opener")]
    pub opener: String,

    /// Compute the best first guess for the word list (cached between runs)
    #[arg(long)]
    pub best_opener: bool,

    /// Play automatically against this answer instead of prompting
    #[arg(long)]
    pub answer: Option<String>,

    /// How many ranked options to show after each round
    #[arg(short = 't', long = "top", default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn max_rounds(&self) -> usize {
        match (self.max_rounds, self.octordle) {
            (Some(rounds), _) => rounds.max(1),
            (None, true) => OCTORDLE_ROUNDS,
            (None, false) => WORDLE_ROUNDS,
        }
    }

    pub fn session_config(&self) -> Result<SessionConfig, SolverError> {
        Ok(SessionConfig {
            max_rounds: self.max_rounds(),
            opener: Some(normalize_word(&self.opener)?),
        })
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

fn parse_action(input: &str) -> Option<UserAction> {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "" => Some(UserAction::AcceptSuggestion),
        "exit" | "quit" => Some(UserAction::Exit),
        "next" => Some(UserAction::NewGame),
        "board" => Some(UserAction::NextBoard),
        "undo" => Some(UserAction::Undo),
        _ => match normalize_word(&input) {
            Ok(word) => Some(UserAction::Guess(word)),
            Err(_) => {
                println!("Invalid guess. Please enter 5 letters.");
                None
            }
        },
    }
}

fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

pub fn read_action<R: BufRead>(reader: &mut R) -> Option<UserAction> {
    println!(
        "\nEnter your guess (blank to accept the suggestion, 'undo', 'next' for a new game, 'board' for the next board, or 'exit'):"
    );
    match read_trimmed_line(reader) {
        Some(line) => parse_action(&line),
        None => Some(UserAction::Exit),
    }
}

pub fn read_feedback<R: BufRead>(reader: &mut R, guess: &str) -> Option<String> {
    println!("Enter feedback for {} (g=green, y=yellow, x=gray, e.g. gyxxg):", guess.to_uppercase());
    let line = read_trimmed_line(reader)?;
    if line.eq_ignore_ascii_case("exit") {
        return None;
    }
    Some(line)
}

pub fn display_starting_words(info: &StartingWordsInfo) {
    println!("Optimal starting words:");
    for (i, word) in info.words.iter().enumerate() {
        println!("{}. {}", i + 1, word.to_uppercase());
    }

    if let Some(path) = &info.cache_path {
        if info.used_cache {
            println!("(Loaded from cache: {}.)", path.display());
        } else {
            println!("(Computed and cached to: {}.)", path.display());
        }
    }

    if let Some(first) = info.words.first() {
        println!("Suggested starting word: {}", first.to_uppercase());
    }
}

pub fn display_autoplay(history: &[HistoryEntry]) {
    for (round, entry) in history.iter().enumerate() {
        println!("{}. {} {}", round + 1, entry.guess.to_uppercase(), entry.result);
    }
}

pub fn display_new_game_message(word_count: usize, max_rounds: usize) {
    println!("New game started. Loaded {word_count} words, {max_rounds} guesses per board.");
}

pub fn display_recommendation(round: usize, recommendation: &Recommendation) {
    let category = match recommendation.source {
        GuessSource::Replay => "replayed from previous board",
        GuessSource::Opener => "opener",
        GuessSource::Solver if recommendation.is_candidate => "solution candidate",
        GuessSource::Solver => "information-gathering",
    };
    match recommendation.score {
        Some(score) => println!(
            "Round {}: recommended guess {} (expected remaining {:.2}, worst case {}) [{}]",
            round + 1,
            recommendation.guess.to_uppercase(),
            score.expected_remaining,
            score.max_partition_size,
            category
        ),
        None => println!(
            "Round {}: recommended guess {} [{}]",
            round + 1,
            recommendation.guess.to_uppercase(),
            category
        ),
    }
}

pub fn display_candidates(candidates: &[String], top: usize) {
    println!("Possible candidates ({})", candidates.len());
    if candidates.len() <= 1 || top == 0 {
        return;
    }
    for (i, scored) in rank_guesses(candidates, top).iter().enumerate() {
        println!(
            "{}. {} (expected remaining {:.2}, worst case {})",
            i + 1,
            scored.word.to_uppercase(),
            scored.score.expected_remaining,
            scored.score.max_partition_size
        );
    }
    if candidates.len() > top {
        println!("...and {} more", candidates.len() - top);
    }
}

pub fn display_outlook(candidates: usize, guesses_left: usize, guaranteed: bool) {
    if guaranteed {
        println!(
            "{candidates} option(s) left and {guesses_left} guess(es) remaining: guaranteed to solve it."
        );
    } else if guesses_left > 0 {
        println!(
            "Warning: {candidates} options left but only {guesses_left} guess(es) remaining, might not solve in time."
        );
    }
}

pub fn display_solution_found(solution: &str, guesses: usize) {
    println!("Solution found: {} (after {} guesses)", solution.to_uppercase(), guesses);
}

pub fn display_undo(undone: &HistoryEntry, candidates: usize) {
    println!(
        "Removed feedback {} for {}. {} candidates again.",
        undone.result,
        undone.guess.to_uppercase(),
        candidates
    );
}

pub fn display_error(error: &SolverError) {
    match error {
        SolverError::EmptyCandidateSet => {
            println!("No candidates remain. Check your inputs, or type 'undo' to recolor the last guess.");
        }
        other => println!("{other}"),
    }
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
    top: usize,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            top: DEFAULT_TOP,
        }
    }

    #[must_use]
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_new_game_message(&mut self, word_count: usize, max_rounds: usize) {
        display_new_game_message(word_count, max_rounds);
    }

    fn display_recommendation(&mut self, round: usize, recommendation: &Recommendation) {
        display_recommendation(round, recommendation);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        read_action(&mut self.reader)
    }

    fn read_feedback(&mut self, guess: &str) -> Option<String> {
        read_feedback(&mut self.reader, guess)
    }

    fn display_candidates(&mut self, candidates: &[String]) {
        display_candidates(candidates, self.top);
    }

    fn display_outlook(&mut self, candidates: usize, guesses_left: usize, guaranteed: bool) {
        display_outlook(candidates, guesses_left, guaranteed);
    }

    fn display_solution_found(&mut self, solution: &str, guesses: usize) {
        display_solution_found(solution, guesses);
    }

    fn display_undo(&mut self, undone: &HistoryEntry, candidates: usize) {
        display_undo(undone, candidates);
    }

    fn display_error(&mut self, error: &SolverError) {
        display_error(error);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
