//! Application state management
//!
//! Translates key presses into session moves and schedules the two delayed
//! steps of a round: dictionary lookups run on the tick after Enter, and the
//! next round is dealt once the advance delay has passed.

use gridlock::game::dictionary::Dictionary;
use gridlock::game::grid::{Position, GRID_SIZE};
use gridlock::game::session::{Phase, Progress, Session};
use gridlock::game::validation::{CheckError, CheckOutcome, CheckStep, PendingCheck};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// How the feedback line is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Info,
    Success,
    Error,
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Grid cell the next letter goes into
    pub cursor: Position,
    /// Message from the last action
    pub feedback: String,
    pub feedback_kind: FeedbackKind,
    session: Session,
    dictionary: Box<dyn Dictionary>,
    /// Slots of words the last check rejected
    highlight: HashSet<usize>,
    /// Check waiting for its dictionary lookups
    pending: Option<PendingCheck>,
    /// When to deal the next round
    advance_at: Option<Instant>,
    advance_delay: Duration,
    /// Set when a round was accepted and not yet saved
    unsaved: bool,
}

impl App {
    pub fn new(session: Session, dictionary: Box<dyn Dictionary>, advance_delay: Duration) -> Self {
        let mut app = Self {
            should_quit: false,
            cursor: Position::new(GRID_SIZE / 2 - 1, GRID_SIZE / 2 - 1),
            feedback: String::new(),
            feedback_kind: FeedbackKind::Info,
            session,
            dictionary,
            highlight: HashSet::new(),
            pending: None,
            advance_at: None,
            advance_delay,
            unsaved: false,
        };
        if app.session.is_finished() {
            app.set_feedback("Already solved today. See you tomorrow!", FeedbackKind::Success);
        }
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Signal the application to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn is_highlighted(&self, slot: usize) -> bool {
        self.highlight.contains(&slot)
    }

    /// True between Enter and the lookups finishing.
    pub fn is_checking(&self) -> bool {
        self.pending.is_some()
    }

    /// Move the cursor, staying on the board.
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let clamp = |v: usize, d: isize| v.saturating_add_signed(d).min(GRID_SIZE - 1);
        self.cursor = Position::new(clamp(self.cursor.row, d_row), clamp(self.cursor.col, d_col));
    }

    /// Place a staged tile showing `letter` under the cursor.
    pub fn on_char(&mut self, letter: char) {
        if !self.accepts_moves() {
            return;
        }
        let Some(tile) = self.session.board().staged_with_letter(letter) else {
            self.set_feedback(
                format!("No {} left to place.", letter.to_ascii_uppercase()),
                FeedbackKind::Error,
            );
            return;
        };
        match self.session.place(tile, self.cursor.slot()) {
            Ok(()) => {
                self.board_changed();
                if self.cursor.col + 1 < GRID_SIZE {
                    self.cursor.col += 1;
                }
            }
            Err(e) => self.set_feedback(e.to_string(), FeedbackKind::Error),
        }
    }

    /// Send the tile under the cursor back to the rack.
    pub fn on_backspace(&mut self) {
        if !self.accepts_moves() {
            return;
        }
        match self.session.unplace(self.cursor.slot()) {
            Ok(Some(_)) => self.board_changed(),
            Ok(None) => {}
            Err(e) => self.set_feedback(e.to_string(), FeedbackKind::Error),
        }
    }

    /// Send every tile of the current round back to the rack.
    pub fn on_delete(&mut self) {
        if !self.accepts_moves() {
            return;
        }
        match self.session.return_tiles() {
            Ok(0) => {}
            Ok(_) => self.board_changed(),
            Err(e) => self.set_feedback(e.to_string(), FeedbackKind::Error),
        }
    }

    /// Shuffle the rack.
    pub fn on_tab(&mut self) {
        if self.accepts_moves() {
            self.session.shuffle_staging(&mut rand::rng());
        }
    }

    /// Start checking the round. Lookups happen on the next tick.
    pub fn on_submit(&mut self) {
        if !self.accepts_moves() {
            return;
        }
        match self.session.request_check() {
            CheckStep::Busy => {}
            CheckStep::Rejected(e) => self.show_rejection(&e),
            CheckStep::Pending(pending) => {
                self.pending = Some(pending);
                self.set_feedback("Checking...", FeedbackKind::Info);
            }
        }
    }

    /// Run deferred work that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(pending) = self.pending.take() {
            let outcome = self.session.complete_check(pending, &*self.dictionary);
            match outcome {
                CheckOutcome::Accepted { words, .. } => {
                    let round = self.session.current_round() + 1;
                    self.set_feedback(
                        format!("Round {} complete! ({} words)", round, words.len()),
                        FeedbackKind::Success,
                    );
                    self.unsaved = true;
                    self.advance_at = Some(now + self.advance_delay);
                }
                CheckOutcome::Rejected(e) => self.show_rejection(&e),
                CheckOutcome::Busy => {}
            }
            return;
        }

        if self.advance_at.is_some_and(|at| now >= at) {
            self.advance_at = None;
            match self.session.advance() {
                Phase::Finished => {
                    self.set_feedback("All five rounds placed. Well done!", FeedbackKind::Success)
                }
                _ => self.feedback.clear(),
            }
        }
    }

    /// Progress to save, once per accepted round.
    pub fn take_unsaved(&mut self) -> Option<Progress> {
        if !self.unsaved {
            return None;
        }
        self.unsaved = false;
        self.session.progress()
    }

    fn accepts_moves(&self) -> bool {
        self.pending.is_none() && self.session.phase() == Phase::Playing
    }

    fn board_changed(&mut self) {
        self.highlight.clear();
        self.feedback.clear();
    }

    fn show_rejection(&mut self, error: &CheckError) {
        self.highlight.clear();
        if let CheckError::InvalidWords { highlight, .. } = error {
            self.highlight.extend(highlight.iter().copied());
        }
        self.set_feedback(error.message(), FeedbackKind::Error);
    }

    fn set_feedback(&mut self, message: impl Into<String>, kind: FeedbackKind) {
        self.feedback = message.into();
        self.feedback_kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlock::game::dictionary::WordList;
    use gridlock::game::validation::RoundValidator;

    fn app_with(words: &str) -> App {
        let session = Session::with_seed(123, RoundValidator::default());
        App::new(session, Box::new(WordList::from_text(words)), Duration::from_millis(10))
    }

    /// Type the current rack along row 0.
    fn type_rack(app: &mut App) {
        app.cursor = Position::new(0, 0);
        let letters = app.session().board().staged_letters();
        for letter in letters {
            app.on_char(letter);
        }
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = app_with("");
        app.cursor = Position::new(0, 0);
        app.move_cursor(-1, -1);
        assert_eq!(app.cursor, Position::new(0, 0));
        app.cursor = Position::new(7, 7);
        app.move_cursor(1, 1);
        assert_eq!(app.cursor, Position::new(7, 7));
        app.move_cursor(-1, 0);
        assert_eq!(app.cursor, Position::new(6, 7));
    }

    #[test]
    fn test_typing_places_and_advances_cursor() {
        let mut app = app_with("");
        app.cursor = Position::new(2, 2);
        app.on_char('a');
        assert_eq!(app.session().board().tile_at(18).map(|t| t.letter), Some('A'));
        assert_eq!(app.cursor, Position::new(2, 3));
        assert_eq!(app.session().board().staging().len(), 7);
    }

    #[test]
    fn test_missing_letter() {
        let mut app = app_with("");
        app.on_char('z');
        assert_eq!(app.feedback, "No Z left to place.");
        assert_eq!(app.feedback_kind, FeedbackKind::Error);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut app = app_with("");
        type_rack(&mut app);
        assert!(app.session().board().staging().is_empty());
        app.cursor = Position::new(0, 0);
        app.on_backspace();
        assert_eq!(app.session().board().staging().len(), 1);
        app.on_delete();
        assert_eq!(app.session().board().staging().len(), 8);
    }

    #[test]
    fn test_incomplete_check_rejected_immediately() {
        let mut app = app_with("");
        app.on_char('a');
        app.on_submit();
        assert!(!app.is_checking());
        assert_eq!(app.feedback, "All letters must be used.");
    }

    #[test]
    fn test_lookups_wait_for_tick() {
        let mut app = app_with("aoustpcb");
        type_rack(&mut app);
        app.on_submit();
        assert!(app.is_checking());
        assert_eq!(app.session().phase(), Phase::Playing);

        // No moves while the check is pending
        app.cursor = Position::new(0, 0);
        app.on_backspace();
        assert!(app.session().board().staging().is_empty());

        let now = Instant::now();
        app.tick(now);
        assert!(!app.is_checking());
        assert_eq!(app.session().phase(), Phase::Advancing);
        assert_eq!(app.feedback_kind, FeedbackKind::Success);
        assert_eq!(app.take_unsaved().map(|p| p.round), Some(0));
        assert_eq!(app.take_unsaved(), None);

        app.tick(now);
        assert_eq!(app.session().current_round(), 0);
        app.tick(now + Duration::from_millis(10));
        assert_eq!(app.session().current_round(), 1);
        assert_eq!(app.session().phase(), Phase::Playing);
    }

    #[test]
    fn test_invalid_words_highlighted_until_change() {
        let mut app = app_with("");
        type_rack(&mut app);
        app.on_submit();
        app.tick(Instant::now());
        assert_eq!(app.feedback, "Not a valid word: AOUSTPCB");
        assert!((0..8).all(|slot| app.is_highlighted(slot)));
        assert!(!app.is_highlighted(8));

        app.cursor = Position::new(0, 7);
        app.on_backspace();
        assert!(!app.is_highlighted(0));
        assert!(app.feedback.is_empty());
    }
}
