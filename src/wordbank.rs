use crate::WORD_LENGTH;
use crate::info_log;
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

const CACHE_DIR_NAME: &str = "wordle-constraints";
const OPENER_CACHE_FILE: &str = "openers.txt";

fn normalize(line: &str) -> Option<String> {
    let word = line.trim().to_lowercase();
    (word.len() == WORD_LENGTH && word.chars().all(|c| c.is_ascii_alphabetic())).then_some(word)
}

fn dedup_in_order(words: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    dedup_in_order(data.lines().filter_map(normalize))
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line?) {
            words.push(word);
        }
    }
    Ok(dedup_in_order(words))
}

/// Identifies a corpus so cached openers are only reused for the same word list.
pub fn corpus_fingerprint(words: &[String]) -> String {
    let mut hasher = DefaultHasher::new();
    words.len().hash(&mut hasher);
    for word in words {
        word.hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

pub fn get_opener_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(CACHE_DIR_NAME).join(OPENER_CACHE_FILE))
}

/// Reads cached openers; `None` if the file is missing, empty, or belongs to another corpus.
pub fn read_starting_words(path: &Path, fingerprint: &str) -> Option<Vec<String>> {
    let data = fs::read_to_string(path).ok()?;
    let mut lines = data.lines();
    if lines.next()?.trim() != fingerprint {
        info_log!("Opener cache at {} is for another corpus", path.display());
        return None;
    }
    let words: Vec<String> = lines.filter_map(normalize).collect();
    (!words.is_empty()).then_some(words)
}

pub fn write_starting_words(path: &Path, fingerprint: &str, words: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut contents = String::with_capacity(17 + words.len() * (WORD_LENGTH + 1));
    contents.push_str(fingerprint);
    contents.push('\n');
    for word in words {
        contents.push_str(word);
        contents.push('\n');
    }
    fs::write(path, contents)?;
    info_log!("Cached {} openers to {}", words.len(), path.display());
    Ok(())
}
