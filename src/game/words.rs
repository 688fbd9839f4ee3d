//! Word extraction from a letter grid
//!
//! A word is a maximal run of adjacent letters along a row or column. A letter
//! with no neighbour along a line takes no part in that line's words, except
//! a lone letter (no neighbour in either direction), which is read as a
//! one-letter row word. Every filled cell therefore belongs to at least one
//! word and to at most one word per orientation.

use super::grid::{Grid, Position, GRID_SIZE};

/// Direction a word is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Row,
    Column,
}

/// A candidate word found on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The letters, in reading order
    pub text: String,
    pub orientation: Orientation,
    /// Index of the row or column
    pub line: usize,
    /// First index along the line
    pub start: usize,
    /// Last index along the line (inclusive)
    pub end: usize,
    /// `None` until checked against the dictionary
    pub validity: Option<bool>,
}

impl Word {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.validity == Some(true)
    }

    /// Grid positions covered by the word.
    pub fn positions(&self) -> Vec<Position> {
        (self.start..=self.end)
            .map(|i| match self.orientation {
                Orientation::Row => Position::new(self.line, i),
                Orientation::Column => Position::new(i, self.line),
            })
            .collect()
    }

    /// Slot indices covered by the word.
    pub fn slots(&self) -> Vec<usize> {
        self.positions().iter().map(Position::slot).collect()
    }
}

/// Whether each cell contributes to a word along rows and along columns.
struct ActiveCells {
    in_row: [[bool; GRID_SIZE]; GRID_SIZE],
    in_column: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl ActiveCells {
    fn compute(grid: &Grid) -> Self {
        let mut active = Self {
            in_row: [[false; GRID_SIZE]; GRID_SIZE],
            in_column: [[false; GRID_SIZE]; GRID_SIZE],
        };

        for pos in grid.filled() {
            let Position { row, col } = pos;
            let left = col > 0 && grid.is_filled(Position::new(row, col - 1));
            let right = grid.is_filled(Position::new(row, col + 1));
            let up = row > 0 && grid.is_filled(Position::new(row - 1, col));
            let down = grid.is_filled(Position::new(row + 1, col));

            active.in_row[row][col] = left || right;
            active.in_column[row][col] = up || down;

            // Lone letters are read as row words
            if !active.in_row[row][col] && !active.in_column[row][col] {
                active.in_row[row][col] = true;
            }
        }

        active
    }
}

/// Extract every row word, then every column word.
pub fn extract_words(grid: &Grid) -> Vec<Word> {
    let active = ActiveCells::compute(grid);
    let mut words = Vec::new();

    for r in 0..GRID_SIZE {
        words.extend(line_words(&grid.row(r), &active.in_row[r], r, Orientation::Row));
    }

    for c in 0..GRID_SIZE {
        let mut column_active = [false; GRID_SIZE];
        for (r, flag) in column_active.iter_mut().enumerate() {
            *flag = active.in_column[r][c];
        }
        words.extend(line_words(
            &grid.column(c),
            &column_active,
            c,
            Orientation::Column,
        ));
    }

    words
}

/// Split one line into runs of active letters.
fn line_words(
    line: &[Option<char>; GRID_SIZE],
    active: &[bool; GRID_SIZE],
    index: usize,
    orientation: Orientation,
) -> Vec<Word> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    let mut text = String::new();

    for i in 0..=GRID_SIZE {
        let letter = if i < GRID_SIZE && active[i] { line[i] } else { None };
        match (letter, start) {
            (Some(ch), None) => {
                start = Some(i);
                text.push(ch);
            }
            (Some(ch), Some(_)) => text.push(ch),
            (None, Some(s)) => {
                words.push(Word {
                    text: std::mem::take(&mut text),
                    orientation,
                    line: index,
                    start: s,
                    end: i - 1,
                    validity: None,
                });
                start = None;
            }
            (None, None) => {}
        }
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(words: &[Word], orientation: Orientation) -> Vec<&str> {
        words
            .iter()
            .filter(|w| w.orientation == orientation)
            .map(|w| w.text.as_str())
            .collect()
    }

    #[test]
    fn test_line_with_gap() {
        let mut line = [None; GRID_SIZE];
        line[0] = Some('A');
        line[1] = Some('B');
        line[3] = Some('C');
        let mut active = [false; GRID_SIZE];
        active[0] = true;
        active[1] = true;
        active[3] = true;

        let words = line_words(&line, &active, 0, Orientation::Row);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "AB");
        assert_eq!((words[0].start, words[0].end), (0, 1));
        assert_eq!(words[1].text, "C");
        assert_eq!((words[1].start, words[1].end), (3, 3));
    }

    #[test]
    fn test_word_runs_to_line_end() {
        let grid = Grid::from_rows(&[".....CAT"]);
        let words = extract_words(&grid);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "CAT");
        assert_eq!((words[0].start, words[0].end), (5, 7));
    }

    #[test]
    fn test_lone_letter_in_last_column() {
        let grid = Grid::from_rows(&[".......A"]);
        let words = extract_words(&grid);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].orientation, Orientation::Row);
        assert_eq!((words[0].line, words[0].start, words[0].end), (0, 7, 7));
    }

    #[test]
    fn test_lone_letter_is_row_word_only() {
        let grid = Grid::from_rows(&["", "...Q"]);
        let words = extract_words(&grid);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Q");
        assert_eq!(words[0].orientation, Orientation::Row);
        assert_eq!(words[0].line, 1);
    }

    #[test]
    fn test_crossing_words() {
        // C A T
        // . . O
        // . . P
        let grid = Grid::from_rows(&["CAT", "..O", "..P"]);
        let words = extract_words(&grid);
        assert_eq!(texts(&words, Orientation::Row), vec!["CAT"]);
        // C and A have no vertical neighbour, so they only belong to CAT
        assert_eq!(texts(&words, Orientation::Column), vec!["TOP"]);
    }

    #[test]
    fn test_column_positions() {
        let grid = Grid::from_rows(&["..A", "..B"]);
        let words = extract_words(&grid);
        let column = words
            .iter()
            .find(|w| w.orientation == Orientation::Column && w.text == "AB")
            .expect("column word");
        assert_eq!(column.line, 2);
        assert_eq!(column.positions(), vec![Position::new(0, 2), Position::new(1, 2)]);
        assert_eq!(column.slots(), vec![2, 10]);
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn test_two_words_on_one_row() {
        let grid = Grid::from_rows(&["AT.IT", "N....", "D...."]);
        let words = extract_words(&grid);
        assert_eq!(texts(&words, Orientation::Row), vec!["AT", "IT"]);
        assert_eq!(texts(&words, Orientation::Column), vec!["AND"]);
    }

    #[test]
    fn test_every_cell_covered() {
        let grid = Grid::from_rows(&["STONE", "T..A.", "AXE.T", "R...E"]);
        let words = extract_words(&grid);
        let mut covered = vec![0; 64];
        for word in &words {
            for slot in word.slots() {
                covered[slot] += 1;
            }
        }
        for pos in grid.filled() {
            assert!(covered[pos.slot()] >= 1, "{:?} not covered", pos);
            assert!(covered[pos.slot()] <= 2, "{:?} covered too often", pos);
        }
    }

    #[test]
    fn test_empty_grid_has_no_words() {
        assert!(extract_words(&Grid::new()).is_empty());
    }
}
