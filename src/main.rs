//! Gridlock - a daily word-placement puzzle for the terminal
//!
//! Five rounds of eight letters. Place every letter on the 8x8 board so that
//! all tiles touch and every row and column run spells a word.

mod app;
mod tui;

use app::App;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use gridlock::config::{GameConfig, SeedMode, SingleLetterPolicy};
use gridlock::game::dictionary::{Dictionary, WordList};
use gridlock::game::rng::day_number;
use gridlock::game::session::Session;
use gridlock::storage::Storage;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use tui::Tui;

/// Play today's Gridlock puzzle.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
struct Opts {
    /// Word list to check against, one word per line (defaults to the bundled list)
    #[arg(long, env = "GRIDLOCK_WORDS")]
    words: Option<PathBuf>,

    /// Directory for saved progress
    #[arg(long, env = "GRIDLOCK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Play a random puzzle; progress is not saved
    #[arg(long, conflicts_with = "seed")]
    test: bool,

    /// Play the puzzle for a specific seed; progress is not saved
    #[arg(long)]
    seed: Option<u32>,

    /// How one-letter words are judged: dictionary, accept or reject
    #[arg(long, default_value = "dictionary")]
    single_letters: SingleLetterPolicy,

    /// Print the puzzle's letters and exit
    #[arg(long)]
    print_letters: bool,
}

impl Opts {
    fn game_config(&self) -> GameConfig {
        let seed = match (self.test, self.seed) {
            (_, Some(seed)) => SeedMode::Fixed(seed),
            (true, None) => SeedMode::Random,
            (false, None) => SeedMode::Daily,
        };
        GameConfig {
            seed,
            single_letter_words: self.single_letters,
            words_path: self.words.clone(),
            data_dir: self.data_dir.clone(),
            ..GameConfig::default()
        }
    }
}

fn main() -> io::Result<()> {
    let opts = Opts::parse();
    log::debug!("command line options: {:?}", opts);
    let config = opts.game_config();
    let now = SystemTime::now();

    if opts.print_letters {
        let session = Session::new(&config, now);
        println!("seed {}", session.seed());
        for (i, round) in session.rounds().iter().enumerate() {
            println!("{} {} {:?}", i + 1, round.as_string(), round.difficulty());
        }
        return Ok(());
    }

    let dictionary: Box<dyn Dictionary> = match &config.words_path {
        Some(path) => Box::new(WordList::from_file(path)?),
        None => Box::new(WordList::bundled()),
    };

    let day = day_number(now);
    let storage = open_storage(&config, day);
    let session = load_session(&config, now, storage.as_ref(), day);

    let mut app = App::new(session, dictionary, config.advance_delay);
    run(&mut app, storage.as_ref(), day)?;

    if app.session().is_finished() {
        println!("{}", app.session().emoji_grid());
    }
    Ok(())
}

/// Open the progress database for daily games. Failures only cost saving.
fn open_storage(config: &GameConfig, day: u32) -> Option<Storage> {
    if !config.persists_progress() {
        return None;
    }
    let storage = match Storage::open(config.data_dir.as_deref()) {
        Ok(storage) => storage,
        Err(e) => {
            log::warn!("progress will not be saved: {}", e);
            return None;
        }
    };
    if let Err(e) = storage.purge_before(day) {
        log::warn!("could not purge old progress: {}", e);
    }
    Some(storage)
}

/// Resume today's saved game if there is one.
fn load_session(config: &GameConfig, now: SystemTime, storage: Option<&Storage>, day: u32) -> Session {
    let saved = match storage.map(|s| s.load_progress(day)) {
        Some(Ok(saved)) => saved,
        Some(Err(e)) => {
            log::warn!("ignoring saved progress: {}", e);
            None
        }
        None => None,
    };
    match saved {
        Some(progress) => Session::resume(config, now, &progress).unwrap_or_else(|e| {
            log::warn!("saved progress does not fit today's puzzle: {}", e);
            Session::new(config, now)
        }),
        None => Session::new(config, now),
    }
}

fn run(app: &mut App, storage: Option<&Storage>, day: u32) -> io::Result<()> {
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => app.quit(),
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.quit()
                        }
                        KeyCode::Up => app.move_cursor(-1, 0),
                        KeyCode::Down => app.move_cursor(1, 0),
                        KeyCode::Left => app.move_cursor(0, -1),
                        KeyCode::Right => app.move_cursor(0, 1),
                        KeyCode::Enter => app.on_submit(),
                        KeyCode::Backspace => app.on_backspace(),
                        KeyCode::Delete => app.on_delete(),
                        KeyCode::Tab => app.on_tab(),
                        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                            app.on_char(c.to_ascii_uppercase())
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick(Instant::now());
            last_tick = Instant::now();
        }

        if let (Some(storage), Some(progress)) = (storage, app.take_unsaved()) {
            if let Err(e) = storage.save_progress(day, &progress) {
                log::warn!("could not save progress: {}", e);
            }
        }

        if app.should_quit {
            break;
        }
    }

    terminal.exit()
}
