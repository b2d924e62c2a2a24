use api_types::report::CategoryTotal;
use dompet_client::format::format_rupiah;
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::ui::theme::Theme;

/// `████████░░░░` for `value` out of `max`.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// One line per category, bars scaled to the largest total.
pub fn category_breakdown(
    totals: &[CategoryTotal],
    bar_width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let max = totals
        .iter()
        .map(|total| total.total.unsigned_abs())
        .max()
        .unwrap_or(0);
    let label_width = totals
        .iter()
        .map(|total| total.category.chars().count())
        .max()
        .unwrap_or(0)
        .min(18);

    totals
        .iter()
        .map(|total| {
            let color = match total.kind {
                Some(api_types::category::CategoryKind::Income) => theme.positive,
                Some(api_types::category::CategoryKind::Expense) => theme.error,
                None => theme.accent,
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<label_width$.label_width$} ", total.category),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    ascii_bar(total.total.unsigned_abs(), max, bar_width),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!(" {}", format_rupiah(total.total)),
                    Style::default().fg(theme.text_muted),
                ),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_max() {
        assert_eq!(ascii_bar(50, 100, 4), "██░░");
        assert_eq!(ascii_bar(0, 0, 3), "░░░");
        assert_eq!(ascii_bar(300, 100, 2), "██");
    }

    #[test]
    fn breakdown_has_one_line_per_category() {
        let totals = vec![
            CategoryTotal {
                category: "Makan".to_string(),
                kind: None,
                total: 200_000,
            },
            CategoryTotal {
                category: "Transport".to_string(),
                kind: None,
                total: 100_000,
            },
        ];
        let lines = category_breakdown(&totals, 10, &Theme::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[1].content, "█████░░░░░");
    }
}
