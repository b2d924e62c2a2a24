use dompet_client::format::format_thousands;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, Entity},
    ui::{
        components::{
            card::Card,
            form::{render_confirm, render_modal},
        },
        theme::Theme,
    },
};

/// Table + pager for any entity section, with its modal and delete dialog
/// drawn on top when active.
pub fn render<E: Entity>(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let screen = E::screen(state);
    let list = &screen.list;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(toolbar::<E>(state, theme)), layout[0]);

    let title = E::ROUTE.label();
    let card = Card::new(title, theme).focused(!screen.modal.is_open());
    let inner = card.inner(layout[1]);
    card.render_frame(frame, layout[1]);

    if let Some(error) = list.error() {
        frame.render_widget(
            Paragraph::new(Span::styled(error.to_string(), Style::default().fg(theme.error))),
            inner,
        );
    } else if list.items().is_empty() {
        let text = if list.is_loading() {
            "Memuat…"
        } else {
            "Belum ada data."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme.text_muted))),
            inner,
        );
    } else {
        let header = Row::new(
            E::COLUMNS
                .iter()
                .map(|(name, _)| Cell::from(*name))
                .collect::<Vec<_>>(),
        )
        .style(
            Style::default()
                .fg(theme.text_muted)
                .add_modifier(Modifier::BOLD),
        );
        let rows = list
            .items()
            .iter()
            .map(|item| Row::new(E::row(item)).style(Style::default().fg(theme.text)));
        let widths = E::COLUMNS
            .iter()
            .map(|(_, width)| Constraint::Length(*width))
            .collect::<Vec<_>>();
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::REVERSED),
            );
        let mut table_state = TableState::default().with_selected(Some(list.selected()));
        frame.render_stateful_widget(table, inner, &mut table_state);
    }

    frame.render_widget(Paragraph::new(pager::<E>(state, theme)), layout[2]);

    if screen.confirm.pending().is_some() {
        render_confirm(frame, area, E::NOUN, theme);
    }
    render_modal(frame, area, E::NOUN, &screen.modal, screen.field, theme);
}

fn toolbar<E: Entity>(state: &AppState, theme: &Theme) -> Line<'static> {
    let screen = E::screen(state);
    let mut spans = Vec::new();
    if E::SEARCHABLE {
        let cursor = if screen.searching { "│" } else { "" };
        let style = if screen.searching {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };
        spans.push(Span::styled("Cari: ", Style::default().fg(theme.text_muted)));
        spans.push(Span::styled(
            format!("{}{cursor}", screen.list.search()),
            style,
        ));
        if screen.list.search_pending() {
            spans.push(Span::styled(" …", Style::default().fg(theme.text_muted)));
        }
        spans.push(Span::raw("   "));
    }
    if E::TYPE_FILTER {
        let label = screen
            .type_filter()
            .map(|kind| kind.label())
            .unwrap_or("Semua");
        spans.push(Span::styled("Jenis: ", Style::default().fg(theme.text_muted)));
        spans.push(Span::styled(label, Style::default().fg(theme.text)));
    }
    Line::from(spans)
}

fn pager<E: Entity>(state: &AppState, theme: &Theme) -> Line<'static> {
    let list = &E::screen(state).list;
    let mut spans = vec![Span::styled(
        format!(
            "Halaman {} dari {}  ·  {} data",
            list.page(),
            list.total_pages().max(1),
            format_thousands(&list.total_items().to_string())
        ),
        Style::default().fg(theme.text_muted),
    )];
    if list.is_loading() && !list.items().is_empty() {
        spans.push(Span::styled("  memuat…", Style::default().fg(theme.text_muted)));
    }
    Line::from(spans)
}
