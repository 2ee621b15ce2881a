//! Terminal rendering of a [`SessionState`].

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::block_scale;
use crate::session::SessionState;

const TITLE: &str = "Peeing! 📡";
const PROMPT: &str = "> ";

fn help_style() -> Style {
    Style::default().fg(Color::Indexed(243))
}

fn title_style() -> Style {
    Style::default().fg(Color::Indexed(120)).bold()
}

pub fn draw(f: &mut Frame, state: &SessionState, chart_width: usize) {
    let history_height = u16::try_from(state.history.capacity())
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(history_height),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(f.area());

    f.render_widget(Paragraph::new(Span::styled(TITLE, title_style())), rows[0]);
    draw_status(f, rows[1], state);

    if let Some(err) = &state.last_error {
        let line = Line::from(Span::styled(format!("🚫 error: {err}"), Style::default().fg(Color::Red)));
        f.render_widget(Paragraph::new(line), rows[2]);
    }

    f.render_widget(Paragraph::new(chart_line(state, chart_width)), rows[3]);
    draw_history(f, rows[4], state);
    f.render_widget(
        Paragraph::new(Span::styled(state.help_text.as_str(), help_style())),
        rows[5],
    );
}

/// The log text, followed by the input box while nothing is submitted.
fn draw_status(f: &mut Frame, area: Rect, state: &SessionState) {
    let mut spans = vec![Span::raw(state.log.as_str())];

    if !state.is_submitted {
        spans.push(Span::raw(PROMPT));
        let prefix_width = Line::from(spans.clone()).width() as u16;

        let value = state.input.value();
        if value.is_empty() {
            spans.push(Span::styled(state.input.placeholder(), help_style()));
        } else {
            spans.push(Span::raw(value));
        }

        if state.input.is_focused() {
            let typed = Span::raw(value).width() as u16;
            let x = area.x.saturating_add(prefix_width).saturating_add(typed);
            f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn chart_line(state: &SessionState, chart_width: usize) -> Line<'static> {
    let bars: Vec<Span> = state
        .rtt_window
        .windowed(chart_width)
        .iter()
        .map(|sample| {
            Span::styled(
                block_scale::classify(*sample).to_string(),
                Style::default().fg(block_scale::color(*sample)),
            )
        })
        .collect();
    Line::from(bars)
}

fn draw_history(f: &mut Frame, area: Rect, state: &SessionState) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(help_style())
        .title(" history ");

    let rows = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = state
        .history
        .visible_slots(rows)
        .map(|slot| match slot {
            Some(record) if record.rtt.is_failed() => Line::styled(
                record.display_line(),
                Style::default().fg(block_scale::color(record.rtt)),
            ),
            Some(record) => Line::raw(record.display_line()),
            None => Line::default(),
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
