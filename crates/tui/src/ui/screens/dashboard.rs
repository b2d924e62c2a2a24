use dompet_client::format::format_date_id;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            money::{styled_balance, styled_flow},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let dashboard = &state.dashboard;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    let Some(summary) = dashboard.data.as_ref() else {
        let text = if let Some(error) = &dashboard.error {
            Span::styled(error.clone(), Style::default().fg(theme.error))
        } else {
            Span::styled("Memuat ringkasan…", Style::default().fg(theme.text_muted))
        };
        Card::new("Ringkasan", theme).render_with(frame, area, Paragraph::new(Line::from(text)));
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(layout[0]);

    StatCard::new("Total Saldo", styled_balance(summary.total_balance, theme), theme)
        .render(frame, cols[0]);
    StatCard::new(
        "Pemasukan Bulan Ini",
        Span::styled(
            dompet_client::format::format_rupiah(summary.month_income),
            Style::default().fg(theme.positive),
        ),
        theme,
    )
    .render(frame, cols[1]);
    StatCard::new(
        "Pengeluaran Bulan Ini",
        Span::styled(
            dompet_client::format::format_rupiah(summary.month_expense),
            Style::default().fg(theme.error),
        ),
        theme,
    )
    .render(frame, cols[2]);

    render_recent(frame, layout[1], state, theme);
}

fn render_recent(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Transaksi Terakhir", theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let Some(summary) = state.dashboard.data.as_ref() else {
        return;
    };
    if summary.recent_transactions.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Belum ada transaksi.",
                Style::default().fg(theme.text_muted),
            )),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = summary
        .recent_transactions
        .iter()
        .map(|tx| {
            let label = tx
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .or_else(|| tx.category_name.clone())
                .unwrap_or_else(|| tx.kind.label().to_string());
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", format_date_id(tx.date)),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(format!("{label:<28.28}"), Style::default().fg(theme.text)),
                styled_flow(tx.amount, tx.kind, theme),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}
