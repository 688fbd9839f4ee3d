//! Game logic: round letters, grid analysis, word checks, sessions

pub mod board;
pub mod dictionary;
pub mod grid;
pub mod rng;
pub mod session;
pub mod validation;
pub mod words;

use rng::Lcg;

/// Number of rounds in a daily puzzle.
pub const ROUND_COUNT: usize = 5;
/// Letters dealt per round.
pub const LETTERS_PER_ROUND: usize = 8;

pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];
pub const EASY_CONSONANTS: [char; 7] = ['L', 'N', 'S', 'T', 'R', 'D', 'G'];
pub const MEDIUM_CONSONANTS: [char; 6] = ['B', 'C', 'M', 'P', 'F', 'H'];
pub const HARD_CONSONANTS: [char; 8] = ['V', 'W', 'Y', 'K', 'J', 'X', 'Q', 'Z'];

/// Probability that rounds after the first are easy.
pub const EASY_ROUND_PROBABILITY: f64 = 0.7;
/// Probability that an easy round's eighth letter is a vowel.
pub const EXTRA_VOWEL_PROBABILITY: f64 = 0.5;
/// Probability that a consonant eighth letter comes from the easy pool.
pub const EXTRA_EASY_CONSONANT_PROBABILITY: f64 = 0.5;

/// Round difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Hard,
}

/// The eight letters dealt in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundLetters {
    difficulty: Difficulty,
    letters: [char; LETTERS_PER_ROUND],
}

impl RoundLetters {
    fn from_parts(difficulty: Difficulty, parts: &[Vec<char>]) -> Self {
        let mut letters = [' '; LETTERS_PER_ROUND];
        for (slot, letter) in letters.iter_mut().zip(parts.iter().flatten()) {
            *slot = *letter;
        }
        Self {
            difficulty,
            letters,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Letters in deal order.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Count the number of vowels in the round.
    pub fn vowel_count(&self) -> usize {
        self.letters.iter().filter(|c| VOWELS.contains(c)).count()
    }

    /// Display the round as a string.
    pub fn as_string(&self) -> String {
        self.letters.iter().collect()
    }
}

/// Pick `n` distinct elements of `pool` with a partial Fisher-Yates shuffle.
///
/// Shuffles a copy of the whole pool (one draw per element, last index
/// first) and returns its first `n` entries. `pool` is left untouched.
pub fn pick(rng: &mut Lcg, pool: &[char], n: usize) -> Vec<char> {
    let mut shuffled = pool.to_vec();
    for i in (0..shuffled.len()).rev() {
        // next_float() can be exactly 1.0
        let index = ((rng.next_float() * (i + 1) as f64).floor() as usize).min(i);
        shuffled.swap(i, index);
    }
    shuffled.truncate(n);
    shuffled
}

/// Generate all rounds of a puzzle.
///
/// Draw order is fixed: difficulty (rounds 1..), then each category in the
/// order the letters appear, then the eighth-letter trials of easy rounds.
pub fn generate_rounds(rng: &mut Lcg) -> Vec<RoundLetters> {
    (0..ROUND_COUNT)
        .map(|round| {
            let difficulty = if round == 0 || rng.chance(EASY_ROUND_PROBABILITY) {
                Difficulty::Easy
            } else {
                Difficulty::Hard
            };
            let letters = match difficulty {
                Difficulty::Easy => easy_round(rng),
                Difficulty::Hard => hard_round(rng),
            };
            log::debug!("round {} ({:?}): {}", round, difficulty, letters.as_string());
            letters
        })
        .collect()
}

fn easy_round(rng: &mut Lcg) -> RoundLetters {
    let vowels = pick(rng, &VOWELS, 3);
    let easy = pick(rng, &EASY_CONSONANTS, 2);
    let medium = pick(rng, &MEDIUM_CONSONANTS, 2);
    let extra = if rng.chance(EXTRA_VOWEL_PROBABILITY) {
        pick(rng, &VOWELS, 1)
    } else if rng.chance(EXTRA_EASY_CONSONANT_PROBABILITY) {
        pick(rng, &EASY_CONSONANTS, 1)
    } else {
        pick(rng, &MEDIUM_CONSONANTS, 1)
    };
    RoundLetters::from_parts(Difficulty::Easy, &[vowels, easy, medium, extra])
}

fn hard_round(rng: &mut Lcg) -> RoundLetters {
    let hard = pick(rng, &HARD_CONSONANTS, 1);
    let easy = pick(rng, &EASY_CONSONANTS, 2);
    let medium = pick(rng, &MEDIUM_CONSONANTS, 2);
    let mut vowels = pick(rng, &VOWELS, 3);
    // Q is unplayable without a U
    if hard.first() == Some(&'Q') && !vowels.contains(&'U') {
        vowels[0] = 'U';
    }
    RoundLetters::from_parts(Difficulty::Hard, &[hard, easy, medium, vowels])
}
