//! Tile placement: which tile sits in which slot
//!
//! The board is the shared state between the player-facing layer (which
//! moves tiles) and the checker (which reads a [`Grid`] derived from it).

use super::grid::{Grid, GRID_SIZE, SLOT_COUNT};
use super::LETTERS_PER_ROUND;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Tiles are numbered `round * 8 + index`.
pub type TileId = usize;

/// Share-grid symbol for each round's tiles, then for empty slots.
pub const ROUND_EMOJI: [&str; 5] = ["🟨", "🟩", "🟦", "🟪", "🟥"];
pub const EMPTY_EMOJI: &str = "⬜";

/// A placeable letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub letter: char,
    pub round: usize,
    /// Locked tiles can no longer move
    pub locked: bool,
    /// `None` while in the staging area
    pub slot: Option<usize>,
}

/// A tile's slot, as saved between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Placement {
    pub tile: TileId,
    pub slot: usize,
}

/// Rejected moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// No tile with this id has been dealt
    UnknownTile(TileId),
    /// The tile is locked in place
    TileLocked(TileId),
    /// Slot index is not on the board
    SlotOutOfRange(usize),
    /// The slot holds a locked tile
    SlotLocked(usize),
    /// Tiles are frozen while a check is in flight
    Busy,
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::UnknownTile(id) => write!(f, "unknown tile {}", id),
            BoardError::TileLocked(id) => write!(f, "tile {} is locked", id),
            BoardError::SlotOutOfRange(slot) => write!(f, "slot {} is off the board", slot),
            BoardError::SlotLocked(slot) => write!(f, "slot {} holds a locked tile", slot),
            BoardError::Busy => write!(f, "tiles cannot move while a round is being checked"),
        }
    }
}

impl std::error::Error for BoardError {}

/// Tiles, slots and the staging area.
#[derive(Debug, Clone)]
pub struct Board {
    tiles: BTreeMap<TileId, Tile>,
    slots: [Option<TileId>; SLOT_COUNT],
    /// Unplaced tiles in display order
    staging: Vec<TileId>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            tiles: BTreeMap::new(),
            slots: [None; SLOT_COUNT],
            staging: Vec::new(),
        }
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a round's tiles in the staging area.
    ///
    /// Dealing a round twice is a no-op.
    pub fn deal(&mut self, round: usize, letters: &[char]) -> Vec<TileId> {
        let mut ids = Vec::with_capacity(letters.len());
        for (index, letter) in letters.iter().enumerate() {
            let id = round * LETTERS_PER_ROUND + index;
            ids.push(id);
            if self.tiles.contains_key(&id) {
                continue;
            }
            self.tiles.insert(
                id,
                Tile {
                    id,
                    letter: *letter,
                    round,
                    locked: false,
                    slot: None,
                },
            );
            self.staging.push(id);
        }
        ids
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// All dealt tiles, by id.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// The tile in `slot`, if any.
    pub fn tile_at(&self, slot: usize) -> Option<&Tile> {
        self.slots
            .get(slot)
            .copied()
            .flatten()
            .and_then(|id| self.tiles.get(&id))
    }

    /// Unplaced tiles in display order.
    pub fn staging(&self) -> &[TileId] {
        &self.staging
    }

    pub fn staged_letters(&self) -> Vec<char> {
        self.staging
            .iter()
            .filter_map(|id| self.tiles.get(id))
            .map(|t| t.letter)
            .collect()
    }

    /// First staged tile carrying `letter` (case-insensitive).
    pub fn staged_with_letter(&self, letter: char) -> Option<TileId> {
        let letter = letter.to_ascii_uppercase();
        self.staging
            .iter()
            .copied()
            .find(|id| self.tiles.get(id).map(|t| t.letter) == Some(letter))
    }

    /// Move a tile into a slot.
    ///
    /// If an unlocked tile already occupies the slot it is sent to where the
    /// moving tile came from: the staging area, or the mover's old slot.
    pub fn place(&mut self, id: TileId, slot: usize) -> Result<(), BoardError> {
        if slot >= SLOT_COUNT {
            return Err(BoardError::SlotOutOfRange(slot));
        }
        let tile = *self.tiles.get(&id).ok_or(BoardError::UnknownTile(id))?;
        if tile.locked {
            return Err(BoardError::TileLocked(id));
        }
        if tile.slot == Some(slot) {
            return Ok(());
        }

        let occupant = self.slots[slot];
        if let Some(other) = occupant {
            if self.tiles.get(&other).is_some_and(|t| t.locked) {
                return Err(BoardError::SlotLocked(slot));
            }
        }

        // Take the mover out of its origin
        let staging_index = match tile.slot {
            Some(from) => {
                self.slots[from] = None;
                None
            }
            None => {
                let index = self.staging.iter().position(|t| *t == id);
                if let Some(i) = index {
                    self.staging.remove(i);
                }
                index
            }
        };

        // Send the displaced tile to the mover's origin
        if let Some(other) = occupant {
            match tile.slot {
                Some(from) => {
                    self.slots[from] = Some(other);
                    self.set_tile_slot(other, Some(from));
                }
                None => {
                    let at = staging_index.unwrap_or(self.staging.len()).min(self.staging.len());
                    self.staging.insert(at, other);
                    self.set_tile_slot(other, None);
                }
            }
        }

        self.slots[slot] = Some(id);
        self.set_tile_slot(id, Some(slot));
        Ok(())
    }

    /// Return the tile in `slot` to the staging area.
    pub fn unplace(&mut self, slot: usize) -> Result<Option<TileId>, BoardError> {
        if slot >= SLOT_COUNT {
            return Err(BoardError::SlotOutOfRange(slot));
        }
        let Some(id) = self.slots[slot] else {
            return Ok(None);
        };
        if self.tiles.get(&id).is_some_and(|t| t.locked) {
            return Err(BoardError::SlotLocked(slot));
        }
        self.slots[slot] = None;
        self.set_tile_slot(id, None);
        self.staging.push(id);
        Ok(Some(id))
    }

    /// Return every unlocked, placed tile of `round` to the staging area.
    pub fn return_round(&mut self, round: usize) -> usize {
        let placed: Vec<usize> = self
            .tiles
            .values()
            .filter(|t| t.round == round && !t.locked)
            .filter_map(|t| t.slot)
            .collect();
        for slot in &placed {
            // Only unlocked tiles were collected
            let _ = self.unplace(*slot);
        }
        placed.len()
    }

    /// Shuffle the staging area's display order.
    pub fn shuffle_staging<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.staging.shuffle(rng);
    }

    /// Lock the tiles of `round` found in `slots`. Returns the tiles locked.
    pub fn lock_slots(&mut self, slots: &[usize], round: usize) -> Vec<TileId> {
        let mut locked = Vec::new();
        for slot in slots {
            let Some(id) = self.slots.get(*slot).copied().flatten() else {
                continue;
            };
            if let Some(tile) = self.tiles.get_mut(&id) {
                if tile.round == round && !tile.locked {
                    tile.locked = true;
                    locked.push(id);
                }
            }
        }
        locked
    }

    /// The letter grid as currently placed.
    pub fn grid(&self) -> Grid {
        let mut letters = [None; SLOT_COUNT];
        for (slot, letter) in letters.iter_mut().enumerate() {
            *letter = self.tile_at(slot).map(|t| t.letter);
        }
        Grid::from_slots(&letters)
    }

    /// Positions of every placed tile, by tile id.
    pub fn snapshot(&self) -> Vec<Placement> {
        self.tiles
            .values()
            .filter_map(|t| t.slot.map(|slot| Placement { tile: t.id, slot }))
            .collect()
    }

    /// Put saved tiles back in their slots and lock them.
    pub fn restore(&mut self, placements: &[Placement]) -> Result<(), BoardError> {
        for placement in placements {
            self.place(placement.tile, placement.slot)?;
            if let Some(tile) = self.tiles.get_mut(&placement.tile) {
                tile.locked = true;
            }
        }
        Ok(())
    }

    /// Share text: one line per row, tiles coloured by round.
    pub fn emoji_grid(&self) -> String {
        (0..GRID_SIZE)
            .map(|row| {
                (0..GRID_SIZE)
                    .map(|col| match self.tile_at(row * GRID_SIZE + col) {
                        Some(tile) => ROUND_EMOJI.get(tile.round).copied().unwrap_or(EMPTY_EMOJI),
                        None => EMPTY_EMOJI,
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn set_tile_slot(&mut self, id: TileId, slot: Option<usize>) {
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.slot = slot;
        }
    }
}
