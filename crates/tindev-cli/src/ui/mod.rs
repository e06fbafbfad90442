//! TUI rendering. Draws the header, the current screen and the status bar.

pub mod deck;
pub mod login;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

/// Brand colour used for the logo and the focused controls.
pub const ACCENT: Color = Color::Rgb(0xdf, 0x47, 0x23);

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<A, S>(f: &mut Frame, app: &App<A, S>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], &app.screen);
  match &app.screen {
    Screen::Login(login) => login::draw(f, rows[1], login),
    Screen::Main(main) => deck::draw(f, rows[1], main),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, screen: &Screen) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let right_text = match screen {
    Screen::Main(main) => format!("{}  {date} ", main.session().user),
    Screen::Login(_) => format!("{date} "),
  };

  let left = Span::styled(
    " tindev",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(right_text, Style::default().fg(Color::Gray));

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<A, S>(f: &mut Frame, area: Rect, app: &App<A, S>) {
  let (mode_label, hints) = match &app.screen {
    Screen::Login(_) => ("LOGIN", "Type your GitHub username  Enter sign in  Esc quit"),
    Screen::Main(main) if main.is_busy() => ("BUSY", "Waiting for the server…"),
    Screen::Main(main) if main.actions_available() => (
      "MAIN",
      "←/h dislike  →/l like  o logout  q quit",
    ),
    Screen::Main(main) if !main.is_loaded() => ("MAIN", "r retry  o logout  q quit"),
    Screen::Main(_) => ("MAIN", "o logout  q quit"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

/// A rectangle of at most `width` × `height`, centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}
