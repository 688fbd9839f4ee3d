//! Dictionary lookups for word validation
//!
//! Ships a bundled list of common English words, embedded at build time, and
//! can load a larger list (one word per line) from disk. Lookups go through
//! the [`Dictionary`] trait so callers can plug in remote or test lists.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Bundled wordlist: lowercase, alphabetic only, one per line
static WORDS_DATA: &str = include_str!("../../data/words.txt");

/// Pre-built hash set for O(1) word lookup
static BUNDLED: Lazy<WordList> = Lazy::new(|| WordList::from_text(WORDS_DATA));

/// Failure to reach a word source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// The source could not answer
    Unavailable(String),
}

impl std::fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DictionaryError::Unavailable(reason) => {
                write!(f, "dictionary unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for DictionaryError {}

/// A source of known words.
pub trait Dictionary {
    /// Whether `word` (lowercase) is a known entry.
    fn contains(&self, word: &str) -> Result<bool, DictionaryError>;
}

/// An in-memory set of words.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// The bundled list.
    pub fn bundled() -> &'static WordList {
        &BUNDLED
    }

    /// Build from newline-separated text. Blank lines are skipped and
    /// entries are lowercased.
    pub fn from_text(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Load a list from a file.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let list = Self::from_text(&text);
        log::info!("loaded {} words from {}", list.len(), path.display());
        Ok(list)
    }

    /// Returns the total number of words in the list
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for WordList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(str::to_lowercase).collect(),
        }
    }
}

impl Dictionary for WordList {
    fn contains(&self, word: &str) -> Result<bool, DictionaryError> {
        Ok(self.words.contains(word))
    }
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn contains(&self, word: &str) -> Result<bool, DictionaryError> {
        (**self).contains(word)
    }
}

impl<D: Dictionary + ?Sized> Dictionary for Box<D> {
    fn contains(&self, word: &str) -> Result<bool, DictionaryError> {
        (**self).contains(word)
    }
}

/// Check a grid word against a dictionary.
///
/// Case-insensitive. A word also counts when its reversal is an entry, so
/// `TAC` is accepted because of `cat`.
pub fn is_valid_word<D: Dictionary + ?Sized>(dictionary: &D, word: &str) -> Result<bool, DictionaryError> {
    let lower = word.to_lowercase();
    if lower.is_empty() {
        return Ok(false);
    }
    if dictionary.contains(&lower)? {
        return Ok(true);
    }
    let reversed: String = lower.chars().rev().collect();
    dictionary.contains(&reversed)
}
