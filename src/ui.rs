use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::App;
use reflex::session::GameState;

const HORIZONTAL_MARGIN: u16 = 5;

fn centered(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(area);
    chunks[1]
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let italic = Style::default().add_modifier(Modifier::ITALIC);

        if self.pending_quit {
            let lines = vec![
                Line::from(Span::styled(
                    "measurement in progress",
                    bold.fg(Color::Yellow),
                )),
                Line::from(""),
                Line::from(Span::styled("quit anyway? (y/n)", italic)),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(centered(area, 3), buf);
            return;
        }

        let lines: Vec<Line> = match self.machine.state() {
            GameState::Start => {
                let best_line = match self.machine.best_ms() {
                    Some(ms) => Line::from(Span::styled(format!("best: {} ms", ms), dim)),
                    None => Line::from(Span::styled("no best score yet", dim)),
                };
                vec![
                    Line::from(Span::styled("reflex", bold.fg(Color::Magenta))),
                    Line::from(""),
                    best_line,
                    Line::from(""),
                    Line::from(Span::styled(
                        "press s to start, then hit space when the screen turns green",
                        italic,
                    )),
                    Line::from(Span::styled("(esc quits)", dim)),
                ]
            }
            GameState::Waiting => {
                vec![
                    Line::from(Span::styled("wait for it...", bold.fg(Color::Red))),
                    Line::from(""),
                    Line::from(Span::styled("space before the signal is a false start", dim)),
                ]
            }
            GameState::Ready => {
                vec![Line::from(Span::styled(
                    "GO! hit space",
                    bold.fg(Color::Green),
                ))]
            }
            GameState::Result => {
                let ms = self.machine.session().reaction_time_ms.unwrap_or_default();
                let verdict = self.machine.verdict().unwrap_or_default().to_string();
                let verdict_style = if self.machine.is_new_record() {
                    bold.fg(Color::Green)
                } else {
                    bold
                };

                let mut lines = vec![
                    Line::from(Span::styled(format!("{} ms", ms), bold.fg(Color::Cyan))),
                    Line::from(Span::styled(verdict, verdict_style)),
                    Line::from(""),
                ];
                if let Some(best) = self.machine.best_ms() {
                    lines.push(Line::from(Span::styled(format!("best: {} ms", best), dim)));
                }
                if let Some(db) = self.machine.history() {
                    if let (Ok(count), Ok(Some(avg))) = (db.result_count(), db.average_ms()) {
                        lines.push(Line::from(Span::styled(
                            format!("{} attempts, {:.0} ms average", count, avg),
                            dim,
                        )));
                    }
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("(r)eset", italic)));
                lines
            }
            GameState::Error => {
                vec![
                    Line::from(Span::styled("too soon!", bold.fg(Color::Yellow))),
                    Line::from(""),
                    Line::from(Span::styled(
                        "that was before the signal; resetting in a moment",
                        dim,
                    )),
                    Line::from(Span::styled("(r)eset now", italic)),
                ]
            }
        };

        let height = lines.len() as u16;
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(centered(area, height), buf);
    }
}
