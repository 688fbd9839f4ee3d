//! Round checking
//!
//! A submitted round is checked in order:
//! 1. All of the round's tiles are on the grid
//! 2. All letters form one connected group
//! 3. Every row and column word is in the dictionary
//!
//! The check is split in two so dictionary lookups can run later (for
//! example on the next frame) while the validator refuses to start a second
//! check. [`RoundValidator::check`] runs both halves back to back.

use super::dictionary::{is_valid_word, Dictionary, DictionaryError};
use super::grid::Grid;
use super::words::{extract_words, Word};
use crate::config::SingleLetterPolicy;
use std::collections::{BTreeSet, HashSet};

/// Whether a check is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Idle,
    Checking,
}

/// Why a word was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    NotInDictionary,
    /// One-letter words are rejected by configuration
    SingleLetter,
    /// The dictionary could not be reached; treated as invalid
    LookupFailed(DictionaryError),
}

/// A rejected word and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWord {
    pub word: Word,
    pub reason: InvalidReason,
}

/// Reasons a round is sent back to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Tiles are still waiting in the staging area
    IncompletePlacement { remaining: usize },
    /// Letters form more than one group
    Disconnected,
    /// Some words failed the dictionary check
    InvalidWords {
        words: Vec<InvalidWord>,
        /// Slots covered by the invalid words, ascending
        highlight: Vec<usize>,
    },
}

impl CheckError {
    /// Returns a user-friendly error message
    pub fn message(&self) -> String {
        match self {
            CheckError::IncompletePlacement { .. } => "All letters must be used.".to_string(),
            CheckError::Disconnected => "Letters must be all connected.".to_string(),
            CheckError::InvalidWords { words, .. } => {
                let list: Vec<&str> = words.iter().map(|w| w.word.text.as_str()).collect();
                if words
                    .iter()
                    .any(|w| matches!(w.reason, InvalidReason::LookupFailed(_)))
                {
                    format!("Could not check: {}", list.join(", "))
                } else {
                    format!("Not a valid word: {}", list.join(", "))
                }
            }
        }
    }
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::IncompletePlacement { remaining } => {
                write!(f, "{} tiles not placed", remaining)
            }
            CheckError::Disconnected => write!(f, "letters are not connected"),
            CheckError::InvalidWords { words, .. } => {
                write!(f, "{} invalid words", words.len())
            }
        }
    }
}

impl std::error::Error for CheckError {}

/// Words awaiting dictionary lookups.
#[derive(Debug)]
pub struct PendingCheck {
    words: Vec<Word>,
}

impl PendingCheck {
    /// The candidate words found on the grid.
    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

/// Result of starting a check.
#[derive(Debug)]
pub enum CheckStep {
    /// A check is already running; nothing changed
    Busy,
    /// Rejected before any lookups
    Rejected(CheckError),
    /// Ready for dictionary lookups
    Pending(PendingCheck),
}

/// Final result of a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A check was already running; nothing changed
    Busy,
    /// Every word is valid
    Accepted {
        words: Vec<Word>,
        /// Every occupied slot, once, ascending
        lock: Vec<usize>,
    },
    Rejected(CheckError),
}

impl CheckOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CheckOutcome::Accepted { .. })
    }
}

impl From<CheckError> for CheckOutcome {
    fn from(e: CheckError) -> Self {
        CheckOutcome::Rejected(e)
    }
}

/// Checks rounds and remembers words already confirmed.
#[derive(Debug, Clone)]
pub struct RoundValidator {
    state: CheckState,
    /// Words confirmed valid this session
    known_valid: HashSet<String>,
    single_letters: SingleLetterPolicy,
}

impl Default for RoundValidator {
    fn default() -> Self {
        Self::new(SingleLetterPolicy::default())
    }
}

impl RoundValidator {
    pub fn new(single_letters: SingleLetterPolicy) -> Self {
        Self {
            state: CheckState::Idle,
            known_valid: HashSet::new(),
            single_letters,
        }
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn is_checking(&self) -> bool {
        self.state == CheckState::Checking
    }

    /// Whether `word` was already confirmed this session.
    pub fn is_known_valid(&self, word: &str) -> bool {
        self.known_valid.contains(&word.to_uppercase())
    }

    pub fn known_valid_count(&self) -> usize {
        self.known_valid.len()
    }

    /// Run the placement and connectivity checks and collect the words.
    ///
    /// `staged` is the number of the round's tiles not yet on the grid.
    pub fn begin_check(&mut self, staged: usize, grid: &Grid) -> CheckStep {
        if self.is_checking() {
            log::debug!("check requested while another is running");
            return CheckStep::Busy;
        }

        if staged > 0 {
            log::debug!("check rejected: {} tiles not placed", staged);
            return CheckStep::Rejected(CheckError::IncompletePlacement { remaining: staged });
        }

        if !grid.is_connected() {
            log::debug!("check rejected: letters not connected");
            return CheckStep::Rejected(CheckError::Disconnected);
        }

        let words = extract_words(grid);
        log::debug!("checking {} words", words.len());
        self.state = CheckState::Checking;
        CheckStep::Pending(PendingCheck { words })
    }

    /// Look up every pending word, one after another.
    ///
    /// On acceptance the validator stays busy until [`release`] so that no
    /// check can start before the next round is dealt. Rejections return it
    /// to idle.
    ///
    /// [`release`]: RoundValidator::release
    pub fn complete_check<D: Dictionary + ?Sized>(
        &mut self,
        pending: PendingCheck,
        dictionary: &D,
    ) -> CheckOutcome {
        let mut words = pending.words;
        let mut invalid = Vec::new();

        for word in &mut words {
            match self.judge(&word.text, dictionary) {
                Ok(()) => word.validity = Some(true),
                Err(reason) => {
                    word.validity = Some(false);
                    invalid.push(InvalidWord {
                        word: word.clone(),
                        reason,
                    });
                }
            }
        }

        if invalid.is_empty() {
            let lock: BTreeSet<usize> = words.iter().flat_map(Word::slots).collect();
            log::info!("round accepted with {} words", words.len());
            return CheckOutcome::Accepted {
                words,
                lock: lock.into_iter().collect(),
            };
        }

        self.state = CheckState::Idle;
        let highlight: BTreeSet<usize> = invalid.iter().flat_map(|w| w.word.slots()).collect();
        log::info!("round rejected: {} invalid words", invalid.len());
        CheckOutcome::Rejected(CheckError::InvalidWords {
            words: invalid,
            highlight: highlight.into_iter().collect(),
        })
    }

    /// Start and finish a check in one call.
    pub fn check<D: Dictionary + ?Sized>(
        &mut self,
        staged: usize,
        grid: &Grid,
        dictionary: &D,
    ) -> CheckOutcome {
        match self.begin_check(staged, grid) {
            CheckStep::Busy => CheckOutcome::Busy,
            CheckStep::Rejected(e) => e.into(),
            CheckStep::Pending(pending) => self.complete_check(pending, dictionary),
        }
    }

    /// Allow checks again.
    pub fn release(&mut self) {
        self.state = CheckState::Idle;
    }

    fn judge<D: Dictionary + ?Sized>(&mut self, text: &str, dictionary: &D) -> Result<(), InvalidReason> {
        if text.chars().count() == 1 {
            match self.single_letters {
                SingleLetterPolicy::Accept => return Ok(()),
                SingleLetterPolicy::Reject => return Err(InvalidReason::SingleLetter),
                SingleLetterPolicy::Dictionary => {}
            }
        }

        if self.known_valid.contains(text) {
            return Ok(());
        }

        match is_valid_word(dictionary, text) {
            Ok(true) => {
                self.known_valid.insert(text.to_string());
                Ok(())
            }
            Ok(false) => Err(InvalidReason::NotInDictionary),
            Err(e) => {
                log::warn!("lookup of {} failed: {}", text, e);
                Err(InvalidReason::LookupFailed(e))
            }
        }
    }
}
