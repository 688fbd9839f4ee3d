//! One player's game: the day's letters, the board and round progress

use super::board::{Board, BoardError, Placement, TileId};
use super::dictionary::Dictionary;
use super::rng::{daily_seed, random_seed, Lcg};
use super::validation::{CheckOutcome, CheckStep, PendingCheck, RoundValidator};
use super::{generate_rounds, RoundLetters, ROUND_COUNT};
use crate::config::{GameConfig, SeedMode};
use rand::Rng;
use std::time::SystemTime;

/// Where the session is in its round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The current round's tiles can be moved and checked
    Playing,
    /// The current round was accepted; waiting for [`Session::advance`]
    Advancing,
    /// All rounds done
    Finished,
}

/// Saved state: the last completed round and where every locked tile sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub round: usize,
    pub placements: Vec<Placement>,
}

/// Session state owned by the player-facing layer.
pub struct Session {
    seed: u32,
    rounds: Vec<RoundLetters>,
    board: Board,
    validator: RoundValidator,
    current_round: usize,
    phase: Phase,
}

impl Session {
    /// Start a new game at round 0.
    pub fn new(config: &GameConfig, now: SystemTime) -> Self {
        let seed = match config.seed {
            SeedMode::Daily => daily_seed(now),
            SeedMode::Random => random_seed(),
            SeedMode::Fixed(seed) => seed,
        };
        log::info!("starting session with seed {} ({:?})", seed, config.seed);
        Self::with_seed(seed, RoundValidator::new(config.single_letter_words))
    }

    /// Start a new game from an explicit seed.
    pub fn with_seed(seed: u32, validator: RoundValidator) -> Self {
        let mut rng = Lcg::new(seed);
        let rounds = generate_rounds(&mut rng);
        let mut session = Self {
            seed,
            rounds,
            board: Board::new(),
            validator,
            current_round: 0,
            phase: Phase::Playing,
        };
        session.deal_current();
        session
    }

    /// Rebuild a game from saved progress.
    ///
    /// Tiles of every completed round go back to their saved slots, locked.
    /// The next round is dealt, or the game is finished if the saved round
    /// was the last.
    pub fn resume(config: &GameConfig, now: SystemTime, progress: &Progress) -> Result<Self, BoardError> {
        let mut session = Self::new(config, now);
        session.restore(progress)?;
        Ok(session)
    }

    fn restore(&mut self, progress: &Progress) -> Result<(), BoardError> {
        let completed = progress.round.min(ROUND_COUNT - 1);
        for round in 0..=completed {
            self.board.deal(round, self.rounds[round].letters());
        }
        self.board.restore(&progress.placements)?;

        if completed + 1 >= ROUND_COUNT {
            self.current_round = completed;
            self.phase = Phase::Finished;
        } else {
            self.current_round = completed + 1;
            self.phase = Phase::Playing;
            self.deal_current();
        }
        log::info!(
            "resumed after round {} ({} tiles placed)",
            completed,
            progress.placements.len()
        );
        Ok(())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Letters for every round.
    pub fn rounds(&self) -> &[RoundLetters] {
        &self.rounds
    }

    /// Index of the round being played (0-4).
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn validator(&self) -> &RoundValidator {
        &self.validator
    }

    /// Move a tile of the current round.
    pub fn place(&mut self, tile: TileId, slot: usize) -> Result<(), BoardError> {
        self.ensure_movable()?;
        self.board.place(tile, slot)
    }

    /// Send the tile in `slot` back to the staging area.
    pub fn unplace(&mut self, slot: usize) -> Result<Option<TileId>, BoardError> {
        self.ensure_movable()?;
        self.board.unplace(slot)
    }

    /// Send all of the current round's tiles back to the staging area.
    pub fn return_tiles(&mut self) -> Result<usize, BoardError> {
        self.ensure_movable()?;
        Ok(self.board.return_round(self.current_round))
    }

    /// Reorder the staging area.
    pub fn shuffle_staging<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.board.shuffle_staging(rng);
    }

    /// Start checking the current round.
    pub fn request_check(&mut self) -> CheckStep {
        if self.phase != Phase::Playing {
            return CheckStep::Busy;
        }
        let grid = self.board.grid();
        self.validator.begin_check(self.board.staging().len(), &grid)
    }

    /// Finish a check started with [`Session::request_check`].
    ///
    /// An accepted round locks its tiles and waits for [`Session::advance`].
    pub fn complete_check<D: Dictionary + ?Sized>(
        &mut self,
        pending: PendingCheck,
        dictionary: &D,
    ) -> CheckOutcome {
        let outcome = self.validator.complete_check(pending, dictionary);
        if let CheckOutcome::Accepted { lock, .. } = &outcome {
            let locked = self.board.lock_slots(lock, self.current_round);
            log::debug!("round {} locked {} tiles", self.current_round, locked.len());
            self.phase = Phase::Advancing;
        }
        outcome
    }

    /// Request and complete a check in one call.
    pub fn check<D: Dictionary + ?Sized>(&mut self, dictionary: &D) -> CheckOutcome {
        match self.request_check() {
            CheckStep::Busy => CheckOutcome::Busy,
            CheckStep::Rejected(e) => e.into(),
            CheckStep::Pending(pending) => self.complete_check(pending, dictionary),
        }
    }

    /// Move past an accepted round: deal the next one or finish the game.
    ///
    /// Does nothing unless the current round was accepted.
    pub fn advance(&mut self) -> Phase {
        if self.phase != Phase::Advancing {
            return self.phase;
        }
        if self.current_round + 1 < ROUND_COUNT {
            self.current_round += 1;
            self.deal_current();
            self.validator.release();
            self.phase = Phase::Playing;
        } else {
            // No further checks once finished
            self.phase = Phase::Finished;
        }
        log::info!("advanced to {:?} at round {}", self.phase, self.current_round);
        self.phase
    }

    /// State to save, once at least one round is complete.
    pub fn progress(&self) -> Option<Progress> {
        let round = match self.phase {
            Phase::Playing => self.current_round.checked_sub(1)?,
            Phase::Advancing | Phase::Finished => self.current_round,
        };
        let placements = self
            .board
            .snapshot()
            .into_iter()
            .filter(|p| self.board.tile(p.tile).is_some_and(|t| t.locked))
            .collect();
        Some(Progress { round, placements })
    }

    /// Share text for the finished board.
    pub fn emoji_grid(&self) -> String {
        self.board.emoji_grid()
    }

    fn deal_current(&mut self) {
        let letters = self.rounds[self.current_round].letters().to_vec();
        self.board.deal(self.current_round, &letters);
    }

    fn ensure_movable(&self) -> Result<(), BoardError> {
        if self.phase != Phase::Playing || self.validator.is_checking() {
            return Err(BoardError::Busy);
        }
        Ok(())
    }
}
