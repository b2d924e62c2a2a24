use dompet_client::format::format_rupiah;
use ratatui::{style::Style, text::Span};

use api_types::transaction::TransactionKind;

use crate::ui::theme::Theme;

/// Rupiah amount colored by direction: income green, expense red.
#[must_use]
pub fn styled_flow(amount: i64, kind: TransactionKind, theme: &Theme) -> Span<'static> {
    let (color, prefix) = match kind {
        TransactionKind::Income => (theme.positive, "+"),
        TransactionKind::Expense => (theme.error, "-"),
    };
    Span::styled(
        format!("{prefix}{}", format_rupiah(amount.abs())),
        Style::default().fg(color),
    )
}

/// Rupiah amount colored by its own sign.
#[must_use]
pub fn styled_balance(amount: i64, theme: &Theme) -> Span<'static> {
    let color = if amount < 0 {
        theme.error
    } else {
        theme.text
    };
    Span::styled(format_rupiah(amount), Style::default().fg(color))
}

/// `████████░░ 80%`; the ratio is clamped to 100%.
#[must_use]
pub fn inline_progress_bar(current: i64, target: i64, width: usize) -> String {
    if target <= 0 {
        return "━".repeat(width);
    }
    let ratio = (current as f64 / target as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    format!(
        "{}{} {}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        (ratio * 100.0) as u16
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_clamps_overshoot() {
        assert_eq!(inline_progress_bar(150, 100, 4), "████ 100%");
        assert_eq!(inline_progress_bar(1, 4, 4), "█░░░ 25%");
        assert_eq!(inline_progress_bar(5, 0, 3), "━━━");
    }

    #[test]
    fn flow_sign_follows_kind() {
        let theme = Theme::default();
        assert_eq!(
            styled_flow(25_000, TransactionKind::Expense, &theme).content,
            "-Rp 25.000"
        );
        assert_eq!(
            styled_flow(25_000, TransactionKind::Income, &theme).content,
            "+Rp 25.000"
        );
    }
}
