//! Main screen: the stack of candidate cards and the like/dislike controls.

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tindev_core::{
  deck::{CandidateQueue, MainScreen},
  dev::Candidate,
};

use super::{ACCENT, centered};

const CARD_WIDTH: u16 = 50;
const CARD_HEIGHT: u16 = 12;
/// How many cards behind the front one show an edge.
const MAX_SHADOWS: u16 = 2;
/// Bio lines shown on a card; the rest is cut.
const BIO_LINES: u16 = 3;

pub const EMPTY_MESSAGE: &str = "That's everyone for now :(";

/// Render the main screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, main: &MainScreen) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Min(0),    // cards
      Constraint::Length(1), // controls
      Constraint::Length(1), // bottom margin
    ])
    .split(area);

  if !main.is_loaded() {
    let text = main.error.as_deref().unwrap_or("Loading candidates…");
    draw_message(f, rows[0], text, Color::DarkGray);
    return;
  }

  match main.queue().front() {
    Some(_) => {
      draw_stack(f, rows[0], main.queue());
      draw_controls(f, rows[1], main.is_busy());
    }
    None => draw_message(f, rows[0], EMPTY_MESSAGE, Color::Gray),
  }
}

fn draw_message(f: &mut Frame, area: Rect, text: &str, color: Color) {
  let line_area = centered(area, area.width, 1);
  f.render_widget(
    Paragraph::new(text)
      .alignment(Alignment::Center)
      .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
    line_area,
  );
}

// ─── Cards ────────────────────────────────────────────────────────────────────

/// Draw the queue as a stack: deeper cards first, offset down and right, so
/// the front card ends up on top and hides the rest.
fn draw_stack(f: &mut Frame, area: Rect, queue: &CandidateQueue) {
  let depth = (queue.len().saturating_sub(1) as u16).min(MAX_SHADOWS);
  let stack = centered(area, CARD_WIDTH + depth * 2, CARD_HEIGHT + depth);

  let card_at = |offset: u16| Rect {
    x:      stack.x + offset * 2,
    y:      stack.y + offset,
    width:  CARD_WIDTH.min(stack.width.saturating_sub(offset * 2)),
    height: CARD_HEIGHT.min(stack.height.saturating_sub(offset)),
  };

  for offset in (1..=depth).rev() {
    let rect = card_at(offset);
    f.render_widget(Clear, rect);
    f.render_widget(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
      rect,
    );
  }

  if let Some(front) = queue.front() {
    let rect = card_at(0);
    f.render_widget(Clear, rect);
    draw_card(f, rect, front, queue.len());
  }
}

fn draw_card(f: &mut Frame, area: Rect, candidate: &Candidate, remaining: usize) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Gray))
    .title(Span::styled(
      format!(" {} ", candidate.display_name()),
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ))
    .title_bottom(Line::from(format!(" {remaining} left ")).right_aligned());

  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),         // avatar
      Constraint::Length(1),         // spacer
      Constraint::Length(BIO_LINES), // bio
      Constraint::Min(0),
    ])
    .split(inner);

  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::styled("avatar ", Style::default().fg(Color::DarkGray)),
      Span::styled(candidate.display_avatar(), Style::default().fg(Color::Cyan)),
    ])),
    rows[0],
  );
  f.render_widget(
    Paragraph::new(candidate.display_bio())
      .wrap(Wrap { trim: true })
      .style(Style::default().fg(Color::Gray)),
    rows[2],
  );
}

// ─── Controls ─────────────────────────────────────────────────────────────────

fn draw_controls(f: &mut Frame, area: Rect, busy: bool) {
  let (dislike, like) = if busy {
    let dim = Style::default().fg(Color::DarkGray);
    (dim, dim)
  } else {
    (
      Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )
  };

  let line = Line::from(vec![
    Span::styled("[←/h] dislike", dislike),
    Span::raw("        "),
    Span::styled("[→/l] like", like),
  ]);
  f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
