//! 8x8 letter grid and the connectivity check

/// Width and height of the board.
pub const GRID_SIZE: usize = 8;
/// Total number of slots.
pub const SLOT_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// A cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of a flat slot index (`row * 8 + col`).
    pub fn from_slot(slot: usize) -> Self {
        Self {
            row: slot / GRID_SIZE,
            col: slot % GRID_SIZE,
        }
    }

    /// Flat slot index.
    pub fn slot(&self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    /// Rook-step neighbours inside the grid.
    fn neighbours(self) -> impl Iterator<Item = Position> {
        let Position { row, col } = self;
        [
            (row.checked_sub(1), Some(col)),
            (Some(row + 1), Some(col)),
            (Some(row), col.checked_sub(1)),
            (Some(row), Some(col + 1)),
        ]
        .into_iter()
        .filter_map(|(r, c)| match (r, c) {
            (Some(r), Some(c)) if r < GRID_SIZE && c < GRID_SIZE => Some(Position::new(r, c)),
            _ => None,
        })
    }
}

/// A snapshot of which letters sit where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: [[Option<char>; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// An empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from 64 slots in row-major order.
    pub fn from_slots(slots: &[Option<char>; SLOT_COUNT]) -> Self {
        let mut grid = Self::new();
        for (slot, letter) in slots.iter().enumerate() {
            let pos = Position::from_slot(slot);
            grid.cells[pos.row][pos.col] = *letter;
        }
        grid
    }

    /// Build from text rows where `.` (or any non-letter) is an empty cell.
    ///
    /// Missing rows and columns stay empty; extra ones are ignored.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut grid = Self::new();
        for (r, line) in rows.iter().take(GRID_SIZE).enumerate() {
            for (c, ch) in line.chars().take(GRID_SIZE).enumerate() {
                if ch.is_alphabetic() {
                    grid.cells[r][c] = Some(ch.to_ascii_uppercase());
                }
            }
        }
        grid
    }

    pub fn get(&self, pos: Position) -> Option<char> {
        self.cells
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .copied()
            .flatten()
    }

    pub fn set(&mut self, pos: Position, letter: Option<char>) {
        if pos.row < GRID_SIZE && pos.col < GRID_SIZE {
            self.cells[pos.row][pos.col] = letter;
        }
    }

    pub fn is_filled(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// All filled positions in row-major order.
    pub fn filled(&self) -> Vec<Position> {
        (0..SLOT_COUNT)
            .map(Position::from_slot)
            .filter(|pos| self.is_filled(*pos))
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// A row as an 8-element line.
    pub fn row(&self, index: usize) -> [Option<char>; GRID_SIZE] {
        self.cells[index]
    }

    /// A column as an 8-element line, top to bottom.
    pub fn column(&self, index: usize) -> [Option<char>; GRID_SIZE] {
        let mut line = [None; GRID_SIZE];
        for (r, cell) in line.iter_mut().enumerate() {
            *cell = self.cells[r][index];
        }
        line
    }

    /// True iff every filled cell reaches every other through rook steps
    /// over filled cells. An empty grid counts as connected.
    ///
    /// Depth-first search with an explicit stack.
    pub fn is_connected(&self) -> bool {
        let filled = self.filled();
        let Some(&start) = filled.first() else {
            return true;
        };

        let mut visited = [[false; GRID_SIZE]; GRID_SIZE];
        let mut stack = vec![start];
        let mut reached = 0;
        visited[start.row][start.col] = true;

        while let Some(pos) = stack.pop() {
            reached += 1;
            for next in pos.neighbours() {
                if self.is_filled(next) && !visited[next.row][next.col] {
                    visited[next.row][next.col] = true;
                    stack.push(next);
                }
            }
        }

        reached == filled.len()
    }
}
