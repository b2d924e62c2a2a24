use dompet_client::format::{format_date_id, format_rupiah};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::components::{
        card::{Card, StatCard},
        charts::category_breakdown,
        money::styled_balance,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let reports = &state.reports;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    let mut period = vec![
        Span::styled("Periode: ", Style::default().fg(theme.text_muted)),
        Span::styled(
            format!(
                "{} - {}",
                format_date_id(reports.period.start()),
                format_date_id(reports.period.end())
            ),
            Style::default().fg(theme.text),
        ),
    ];
    if reports.exporting {
        period.push(Span::styled(
            "   mengekspor…",
            Style::default().fg(theme.text_muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(period)), layout[0]);

    let summary = &reports.summary;
    let Some(data) = summary.data.as_ref() else {
        let text = match &summary.error {
            Some(error) => Span::styled(error.clone(), Style::default().fg(theme.error)),
            None => Span::styled("Memuat laporan…", Style::default().fg(theme.text_muted)),
        };
        frame.render_widget(Paragraph::new(Line::from(text)), layout[1]);
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(layout[1]);
    StatCard::new(
        "Pemasukan",
        Span::styled(format_rupiah(data.total_income), Style::default().fg(theme.positive)),
        theme,
    )
    .render(frame, cols[0]);
    StatCard::new(
        "Pengeluaran",
        Span::styled(format_rupiah(data.total_expense), Style::default().fg(theme.error)),
        theme,
    )
    .render(frame, cols[1]);
    StatCard::new("Selisih", styled_balance(data.balance, theme), theme).render(frame, cols[2]);

    let card = Card::new("Per Kategori", theme);
    let inner = card.inner(layout[2]);
    card.render_frame(frame, layout[2]);
    let mut lines = if data.by_category.is_empty() {
        vec![Line::from(Span::styled(
            "Tidak ada transaksi pada periode ini.",
            Style::default().fg(theme.text_muted),
        ))]
    } else {
        let bar_width = usize::from(inner.width).saturating_sub(40).clamp(5, 40);
        category_breakdown(&data.by_category, bar_width, theme)
    };
    if let Some(error) = &summary.error {
        lines.insert(
            0,
            Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))),
        );
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
