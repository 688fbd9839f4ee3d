//! UI rendering using ratatui
//!
//! One screen: header with the round track, the board, the rack of staged
//! letters, a feedback line and the key help. When the game is over the
//! rack is replaced by the share grid.

use crate::app::{App, FeedbackKind};
use gridlock::game::board::Tile;
use gridlock::game::grid::{Position, GRID_SIZE};
use gridlock::game::session::Phase;
use gridlock::game::ROUND_COUNT;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Tile colour for each round, matching the share grid.
const ROUND_COLORS: [Color; ROUND_COUNT] = [
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Magenta,
    Color::Red,
];

/// Render the game screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                     // Header
            Constraint::Length(GRID_SIZE as u16 + 2), // Board
            Constraint::Length(3),                     // Rack or share grid
            Constraint::Length(1),                     // Feedback
            Constraint::Min(0),                        // Remaining space
            Constraint::Length(1),                     // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);
    render_board(frame, layout[1], app);
    if app.session().is_finished() {
        render_finish(frame, layout[2].union(layout[4]), app);
    } else {
        render_rack(frame, layout[2], app);
    }
    render_feedback(frame, layout[3], app);
    render_footer(frame, layout[5], app);
}

/// Title on the left, round track in the middle, seed on the right
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(14),
        ])
        .split(inner);

    let logo = Paragraph::new("GRIDLOCK")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(logo, header_layout[0]);

    let track = Paragraph::new(round_track(app.session().current_round(), app.session().phase()))
        .alignment(Alignment::Center);
    frame.render_widget(track, header_layout[1]);

    let seed = Paragraph::new(format!("#{}", app.session().seed()))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    frame.render_widget(seed, header_layout[2]);
}

/// `Round n/5` followed by one marker per round
fn round_track(current: usize, phase: Phase) -> Line<'static> {
    let done = match phase {
        Phase::Playing => current,
        Phase::Advancing | Phase::Finished => current + 1,
    };
    let mut spans = vec![Span::styled(
        format!("Round {}/{}  ", (current + 1).min(ROUND_COUNT), ROUND_COUNT),
        Style::default().fg(Color::White).bold(),
    )];
    for (round, color) in ROUND_COLORS.iter().enumerate() {
        let (symbol, style) = if round < done {
            ("■ ", Style::default().fg(*color))
        } else if round == current {
            ("□ ", Style::default().fg(*color).bold())
        } else {
            ("□ ", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(symbol, style));
    }
    Line::from(spans)
}

fn render_board(frame: &mut Frame, area: Rect, app: &App) {
    let board = app.session().board();
    let lines: Vec<Line> = (0..GRID_SIZE)
        .map(|row| {
            let spans: Vec<Span> = (0..GRID_SIZE)
                .map(|col| {
                    let pos = Position::new(row, col);
                    let tile = board.tile_at(pos.slot());
                    let text = match tile {
                        Some(t) => format!(" {} ", t.letter),
                        None => " · ".to_string(),
                    };
                    Span::styled(text, cell_style(app, pos, tile))
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let width = (GRID_SIZE as u16) * 3 + 2;
    let board_area = center_horizontally(area, width);
    let grid = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(grid, board_area);
}

fn cell_style(app: &App, pos: Position, tile: Option<&Tile>) -> Style {
    let mut style = match tile {
        Some(t) if t.locked => Style::default()
            .fg(Color::Black)
            .bg(ROUND_COLORS[t.round % ROUND_COUNT]),
        Some(_) => Style::default().fg(Color::White).bold(),
        None => Style::default().fg(Color::DarkGray),
    };
    if app.is_highlighted(pos.slot()) {
        style = style.fg(Color::Red).bold();
    }
    if pos == app.cursor && !app.session().is_finished() {
        style = style.reversed();
    }
    style
}

fn render_rack(frame: &mut Frame, area: Rect, app: &App) {
    let rack = format_rack(&app.session().board().staged_letters());
    let color = ROUND_COLORS[app.session().current_round() % ROUND_COUNT];
    let widget = Paragraph::new(rack)
        .style(Style::default().fg(color).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP).title("Letters"));
    frame.render_widget(widget, area);
}

fn render_finish(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Solved!",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::default(),
    ];
    lines.extend(app.session().emoji_grid().lines().map(|row| Line::from(row.to_string())));
    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, app: &App) {
    let color = match app.feedback_kind {
        _ if app.is_checking() => Color::Yellow,
        FeedbackKind::Info => Color::White,
        FeedbackKind::Success => Color::Green,
        FeedbackKind::Error => Color::Red,
    };
    let widget = Paragraph::new(app.feedback.as_str())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = if app.session().is_finished() {
        "Esc Quit"
    } else {
        "←↑↓→ Move  A-Z Place  Bksp Remove  Del Clear  Tab Shuffle  Enter Check  Esc Quit"
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Format the rack for display
fn format_rack(letters: &[char]) -> String {
    if letters.is_empty() {
        return String::from("[ Press ENTER to check ]");
    }
    let letters_str: String = letters
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!("[ {} ]", letters_str)
}

fn center_horizontally(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlock::game::dictionary::WordList;
    use gridlock::game::session::Session;
    use gridlock::game::validation::RoundValidator;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_format_rack() {
        assert_eq!(format_rack(&['A', 'B']), "[ A B ]");
        assert_eq!(format_rack(&[]), "[ Press ENTER to check ]");
    }

    #[test]
    fn test_round_track() {
        let text: String = round_track(1, Phase::Playing)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "Round 2/5  ■ □ □ □ □ ");
    }

    #[test]
    fn test_render_shows_rack() {
        let session = Session::with_seed(123, RoundValidator::default());
        let app = App::new(session, Box::new(WordList::default()), Duration::ZERO);
        let text = screen_text(&app);
        assert!(text.contains("GRIDLOCK"));
        assert!(text.contains("[ A O U S T P C B ]"));
        assert!(text.contains("#123"));
    }
}
