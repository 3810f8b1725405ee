use std::io;
use std::process::ExitCode;
use wordle_constraints::cli::{
    Cli, CliInterface, display_autoplay, display_error, display_starting_words, parse_cli,
};
use wordle_constraints::game_state::{SessionConfig, autoplay, game_loop, starting_words};
use wordle_constraints::logging;
use wordle_constraints::wordbank::{
    EMBEDDED_WORDBANK, load_wordbank_from_file, load_wordbank_from_str,
};

fn load_wordbank(cli: &Cli) -> Option<Vec<String>> {
    let words = match &cli.wordbank_path {
        Some(path) => match load_wordbank_from_file(path) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("Failed to load word bank from '{path}': {e}");
                return None;
            }
        },
        None => load_wordbank_from_str(EMBEDDED_WORDBANK),
    };
    if words.is_empty() {
        eprintln!("The word bank contains no 5-letter words.");
        return None;
    }
    log::info!("Loaded {} words", words.len());
    Some(words)
}

fn build_config(cli: &Cli, wordbank: &[String]) -> Option<SessionConfig> {
    let mut config = match cli.session_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return None;
        }
    };
    if cli.best_opener {
        println!("Computing optimal starting words, please wait...");
        let info = starting_words(wordbank);
        display_starting_words(&info);
        config.opener = info.words.first().cloned();
    }
    Some(config)
}

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose);

    let Some(wordbank) = load_wordbank(&cli) else {
        return ExitCode::FAILURE;
    };
    let Some(config) = build_config(&cli, &wordbank) else {
        return ExitCode::FAILURE;
    };

    if let Some(answer) = &cli.answer {
        return match autoplay(&wordbank, &config, answer) {
            Ok(history) => {
                display_autoplay(&history);
                ExitCode::SUCCESS
            }
            Err(e) => {
                display_error(&e);
                ExitCode::FAILURE
            }
        };
    }

    let stdin = io::stdin();
    let mut interface = CliInterface::new(stdin.lock()).with_top(cli.top);
    game_loop(&wordbank, &config, &mut interface);
    ExitCode::SUCCESS
}
