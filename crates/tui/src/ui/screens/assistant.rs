use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{AppState, ChatLine},
    ui::components::card::Card,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let assistant = &state.assistant;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let mut lines = Vec::new();
    for line in &assistant.lines {
        let (who, text, style) = match line {
            ChatLine::User(text) => ("Anda", text, Style::default().fg(theme.accent)),
            ChatLine::Assistant(text) => ("Asisten", text, Style::default().fg(theme.text)),
            ChatLine::Failed(text) => ("Asisten", text, Style::default().fg(theme.error)),
        };
        lines.push(Line::from(Span::styled(
            who,
            style.add_modifier(Modifier::BOLD),
        )));
        lines.extend(text.lines().map(|l| Line::from(Span::styled(l.to_string(), style))));
        lines.push(Line::from(""));
    }
    if assistant.waiting {
        lines.push(Line::from(Span::styled(
            "Asisten sedang mengetik…",
            Style::default().fg(theme.text_muted),
        )));
    }

    let card = Card::new("Asisten Keuangan", theme);
    let inner = card.inner(layout[0]);
    card.render_frame(frame, layout[0]);
    // Keep the newest messages in view.
    let overflow = (lines.len() as u16).saturating_sub(inner.height);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((overflow, 0)),
        inner,
    );

    Card::new("Pesan", theme).focused(true).render_with(
        frame,
        layout[1],
        Paragraph::new(format!("{}│", assistant.input)),
    );
}
