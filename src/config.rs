//! Game configuration
//!
//! Values the binary reads from command-line flags and the environment
//! (`GRIDLOCK_WORDS`, `GRIDLOCK_DATA_DIR`).

use std::path::PathBuf;
use std::time::Duration;

/// Pause between a round being accepted and the next round's tiles.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

/// Where the session's seed comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// Same puzzle for everyone on the same day
    #[default]
    Daily,
    /// A fresh puzzle every time (practice / testing)
    Random,
    /// An explicit seed
    Fixed(u32),
}

/// How one-letter words are judged.
///
/// Word lists differ on whether single letters are entries, so this is a
/// setting rather than a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleLetterPolicy {
    /// Ask the dictionary like any other word
    #[default]
    Dictionary,
    /// Always valid
    Accept,
    /// Always invalid
    Reject,
}

impl std::str::FromStr for SingleLetterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dictionary" => Ok(SingleLetterPolicy::Dictionary),
            "accept" => Ok(SingleLetterPolicy::Accept),
            "reject" => Ok(SingleLetterPolicy::Reject),
            other => Err(format!(
                "unknown single-letter policy '{}' (expected dictionary, accept or reject)",
                other
            )),
        }
    }
}

/// Settings for one game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: SeedMode,
    pub single_letter_words: SingleLetterPolicy,
    /// Word list to load instead of the bundled one
    pub words_path: Option<PathBuf>,
    /// Directory for the progress database
    pub data_dir: Option<PathBuf>,
    pub advance_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: SeedMode::Daily,
            single_letter_words: SingleLetterPolicy::Dictionary,
            words_path: None,
            data_dir: None,
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

impl GameConfig {
    /// Only daily puzzles are saved; practice games would clobber progress.
    pub fn persists_progress(&self) -> bool {
        self.seed == SeedMode::Daily
    }
}
