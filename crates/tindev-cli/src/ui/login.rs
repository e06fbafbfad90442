//! Login screen: logo, username input and sign-in button.

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use tindev_core::login::LoginScreen;

use super::{ACCENT, centered};

const PLACEHOLDER: &str = "Enter your GitHub username";

/// Render the login form centred in `area`.
pub fn draw(f: &mut Frame, area: Rect, login: &LoginScreen) {
  let form = centered(area, 44, 10);
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(2), // logo
      Constraint::Length(3), // input
      Constraint::Length(1), // button
      Constraint::Length(1), // spacer
      Constraint::Min(0),    // error
    ])
    .split(form);

  let logo = Paragraph::new(Line::from(vec![
    Span::styled("tin", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    Span::styled("dev", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
  ]))
  .alignment(Alignment::Center);
  f.render_widget(logo, rows[0]);

  let input = if login.username.is_empty() {
    Line::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
  } else {
    Line::from(format!("{}_", login.username))
  };
  f.render_widget(
    Paragraph::new(input).block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray)),
    ),
    rows[1],
  );

  let button = Paragraph::new(" Sign in [Enter] ")
    .alignment(Alignment::Center)
    .style(
      Style::default()
        .fg(Color::White)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(button, rows[2]);

  if let Some(err) = &login.error {
    f.render_widget(
      Paragraph::new(err.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red)),
      rows[4],
    );
  }
}
