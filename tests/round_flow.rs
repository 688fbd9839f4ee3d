//! Drives sessions through whole rounds using the public API.

use gridlock::config::{GameConfig, SeedMode};
use gridlock::game::board::BoardError;
use gridlock::game::dictionary::{Dictionary, DictionaryError, WordList};
use gridlock::game::session::{Phase, Session};
use gridlock::game::validation::{CheckError, CheckOutcome, CheckStep, InvalidReason, RoundValidator};
use gridlock::storage::Storage;
use std::cell::Cell;
use std::time::SystemTime;

/// Counts lookups so cache hits can be observed.
struct Counting {
    words: WordList,
    lookups: Cell<usize>,
}

impl Counting {
    fn new(words: &str) -> Self {
        Self {
            words: WordList::from_text(words),
            lookups: Cell::new(0),
        }
    }
}

impl Dictionary for Counting {
    fn contains(&self, word: &str) -> Result<bool, DictionaryError> {
        self.lookups.set(self.lookups.get() + 1);
        self.words.contains(word)
    }
}

struct Offline;

impl Dictionary for Offline {
    fn contains(&self, _word: &str) -> Result<bool, DictionaryError> {
        Err(DictionaryError::Unavailable("no connection".to_string()))
    }
}

fn session(seed: u32) -> Session {
    Session::with_seed(seed, RoundValidator::default())
}

/// Place the current round's tiles so that `layout` (row, col per letter)
/// spells out the intended words.
fn place_letters(session: &mut Session, layout: &[(char, usize, usize)]) {
    for &(letter, row, col) in layout {
        let tile = session
            .board()
            .staged_with_letter(letter)
            .unwrap_or_else(|| panic!("{} not in rack", letter));
        session.place(tile, row * 8 + col).unwrap();
    }
}

/// Seed 123, round 0: A O U S T P C B
/// ```text
/// C U P .
/// . . O .
/// . B A T
/// . . S .
/// ```
/// Rows: CUP, BAT. Column: POAS (reads SAOP backwards, neither is a word).
fn cup_layout() -> Vec<(char, usize, usize)> {
    vec![
        ('C', 0, 0),
        ('U', 0, 1),
        ('P', 0, 2),
        ('O', 1, 2),
        ('B', 2, 1),
        ('A', 2, 2),
        ('T', 2, 3),
        ('S', 3, 2),
    ]
}

#[test]
fn invalid_column_rejected_and_highlighted() {
    let mut s = session(123);
    place_letters(&mut s, &cup_layout());
    let dict = Counting::new("cup\nbat");
    match s.check(&dict) {
        CheckOutcome::Rejected(CheckError::InvalidWords { words, highlight }) => {
            let texts: Vec<&str> = words.iter().map(|w| w.word.text.as_str()).collect();
            assert_eq!(texts, vec!["POAS"]);
            assert_eq!(highlight, vec![2, 10, 18, 26]);
        }
        other => panic!("Expected InvalidWords, got {:?}", other),
    }
    assert_eq!(s.phase(), Phase::Playing);
}

#[test]
fn valid_words_are_cached_between_checks() {
    let mut s = session(123);
    place_letters(&mut s, &cup_layout());
    let dict = Counting::new("cup\nbat");
    assert!(!s.check(&dict).is_accepted());
    // CUP and BAT once each, POAS and its reversal
    assert_eq!(dict.lookups.get(), 4);
    assert!(s.validator().is_known_valid("CUP"));
    assert!(!s.validator().is_known_valid("POAS"));

    assert!(!s.check(&dict).is_accepted());
    assert_eq!(dict.lookups.get(), 6);
}

#[test]
fn reversed_word_accepted() {
    let mut s = session(123);
    let rack = s.board().staging().to_vec();
    for (i, tile) in rack.into_iter().enumerate() {
        s.place(tile, i).unwrap();
    }
    // Row reads AOUSTPCB; only its reversal is listed
    let dict = Counting::new("bcptsuoa");
    assert!(s.check(&dict).is_accepted());
}

#[test]
fn disconnected_board_skips_lookups() {
    let mut s = session(123);
    place_letters(&mut s, &[('S', 0, 0), ('T', 0, 1), ('O', 0, 2), ('P', 0, 3)]);
    let rest = s.board().staging().to_vec();
    for (i, tile) in rest.into_iter().enumerate() {
        s.place(tile, 16 + i).unwrap();
    }
    let dict = Counting::new("stop");
    assert_eq!(
        s.check(&dict),
        CheckOutcome::Rejected(CheckError::Disconnected)
    );
    assert_eq!(dict.lookups.get(), 0);
}

#[test]
fn lookup_failure_marks_words_invalid() {
    let mut s = session(123);
    place_letters(&mut s, &cup_layout());
    match s.check(&Offline) {
        CheckOutcome::Rejected(e @ CheckError::InvalidWords { .. }) => {
            assert!(e.message().starts_with("Could not check"));
            if let CheckError::InvalidWords { words, .. } = &e {
                assert!(words
                    .iter()
                    .all(|w| matches!(w.reason, InvalidReason::LookupFailed(_))));
            }
        }
        other => panic!("Expected InvalidWords, got {:?}", other),
    }
    // A failed lookup does not wedge the validator
    assert!(matches!(s.request_check(), CheckStep::Pending(_)));
}

#[test]
fn second_check_while_pending_is_busy() {
    let mut s = session(123);
    place_letters(&mut s, &cup_layout());
    let pending = match s.request_check() {
        CheckStep::Pending(p) => p,
        other => panic!("Expected Pending, got {:?}", other),
    };
    assert!(matches!(s.request_check(), CheckStep::Busy));
    assert_eq!(s.place(0, 63), Err(BoardError::Busy));
    let dict = Counting::new("cup\nbat\npoas");
    assert!(s.complete_check(pending, &dict).is_accepted());
}

#[test]
fn accepted_round_locks_and_advances() {
    let mut s = session(123);
    place_letters(&mut s, &cup_layout());
    let dict = Counting::new("cup\nbat\npoas");
    match s.check(&dict) {
        CheckOutcome::Accepted { lock, .. } => {
            assert_eq!(lock, vec![0, 1, 2, 10, 17, 18, 19, 26]);
        }
        other => panic!("Expected Accepted, got {:?}", other),
    }
    assert!(matches!(s.request_check(), CheckStep::Busy));
    assert_eq!(s.advance(), Phase::Playing);
    assert_eq!(s.current_round(), 1);
    assert_eq!(s.board().staged_letters().iter().collect::<String>(), "YLSBHUIO");
    assert!(s.board().tile_at(0).unwrap().locked);

    // New tiles must join the locked ones
    let y = s.board().staged_with_letter('Y').unwrap();
    s.place(y, 63).unwrap();
    let rest = s.board().staging().to_vec();
    for (i, tile) in rest.into_iter().enumerate() {
        s.place(tile, 40 + i).unwrap();
    }
    assert_eq!(
        s.check(&dict),
        CheckOutcome::Rejected(CheckError::Disconnected)
    );
}

#[test]
fn saved_progress_resumes_same_day() {
    let dir = std::env::temp_dir().join(format!("gridlock-flow-{}", std::process::id()));
    let config = GameConfig {
        seed: SeedMode::Fixed(123),
        data_dir: Some(dir.clone()),
        ..Default::default()
    };
    let now = SystemTime::now();

    let mut first = Session::new(&config, now);
    place_letters(&mut first, &cup_layout());
    assert!(first.check(&Counting::new("cup\nbat\npoas")).is_accepted());
    let progress = first.progress().unwrap();

    {
        let storage = Storage::open(config.data_dir.as_deref()).unwrap();
        storage.save_progress(10, &progress).unwrap();
    }

    let storage = Storage::open(config.data_dir.as_deref()).unwrap();
    assert_eq!(storage.load_progress(11).unwrap(), None);
    let saved = storage.load_progress(10).unwrap().unwrap();
    let resumed = Session::resume(&config, now, &saved).unwrap();
    assert_eq!(resumed.current_round(), 1);
    assert_eq!(resumed.board().grid(), first.board().grid());
    assert_eq!(resumed.board().tile_at(26).map(|t| t.letter), Some('S'));

    drop(storage);
    let _ = std::fs::remove_dir_all(&dir);
}
