//! Form overlays: the create/edit modal, the delete confirmation and the
//! single input row used by the auth screens.
use dompet_client::{FormDraft, ModalController, modal::ModalMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::centered_box;
use crate::{
    app::{FieldKind, FormFields},
    ui::theme::Theme,
};

const LABEL_WIDTH: usize = 20;

/// `label  value│`, highlighted when focused.
pub fn input_line(
    label: &str,
    value: &str,
    focused: bool,
    masked: bool,
    theme: &Theme,
) -> Line<'static> {
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "│" } else { "" };
    let value_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(
            format!("{label:<LABEL_WIDTH$}"),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(format!("{shown}{cursor}"), value_style),
    ])
}

fn choice_line(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(
            format!("{label:<LABEL_WIDTH$}"),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(format!("‹ {value} ›"), style),
    ])
}

pub fn render_modal<F: FormDraft + FormFields>(
    frame: &mut Frame<'_>,
    area: Rect,
    noun: &str,
    modal: &ModalController<F>,
    focused: usize,
    theme: &Theme,
) {
    if !modal.is_open() {
        return;
    }
    let fields = modal.draft().fields(modal.options());
    let title = match modal.mode() {
        ModalMode::Create => format!(" Tambah {noun} "),
        ModalMode::Edit(_) => format!(" Ubah {noun} "),
    };

    // fields + error/status line + padding
    let height = fields.len() as u16 + 6;
    let rect = centered_box(60, height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .margin(1)
        .split(inner);

    let lines: Vec<Line<'static>> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| match field.kind {
            FieldKind::Choice => choice_line(field.label, &field.value, i == focused, theme),
            _ => input_line(field.label, &field.value, i == focused, false, theme),
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows[0]);

    let status = if modal.is_submitting() {
        Span::styled("Menyimpan…", Style::default().fg(theme.text_muted))
    } else if let Some(error) = modal.error() {
        Span::styled(error.to_string(), Style::default().fg(theme.error))
    } else if let Some(error) = modal
        .options()
        .category_error
        .as_deref()
        .or(modal.options().wallet_error.as_deref())
    {
        Span::styled(error.to_string(), Style::default().fg(theme.warning))
    } else {
        Span::raw("")
    };
    frame.render_widget(
        Paragraph::new(Line::from(status)).wrap(Wrap { trim: true }),
        rows[1],
    );
}

pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, noun: &str, theme: &Theme) {
    let rect = centered_box(44, 5, area);
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .title(Span::styled(" Konfirmasi ", Style::default().fg(theme.warning)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning))
        .style(Style::default().bg(theme.surface));
    let text = vec![
        Line::from(format!("Hapus {noun} ini?")),
        Line::from(Span::styled(
            "y ya   n batal",
            Style::default().fg(theme.text_muted),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block),
        rect,
    );
}
