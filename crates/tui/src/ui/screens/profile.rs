use dompet_client::{ProfileStatus, format::format_rupiah};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::components::{card::Card, form::render_modal},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let status = &state.profile.status;
    let muted = Style::default().fg(theme.text_muted);

    let lines = match status.data.as_ref() {
        Some(ProfileStatus::Complete(profile)) => {
            let row = |label: &str, value: String| {
                Line::from(vec![
                    Span::styled(format!("{label:<20}"), muted),
                    Span::styled(value, Style::default().fg(theme.text)),
                ])
            };
            vec![
                row("Nama lengkap", profile.full_name.clone()),
                row(
                    "Pekerjaan",
                    profile.occupation.clone().unwrap_or_else(|| "-".to_string()),
                ),
                row(
                    "Pendapatan bulanan",
                    profile
                        .monthly_income
                        .map(format_rupiah)
                        .unwrap_or_else(|| "-".to_string()),
                ),
                row(
                    "Akun",
                    state
                        .user_label
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]
        }
        Some(ProfileStatus::Missing) => vec![Line::from(Span::styled(
            "Profil belum dilengkapi.",
            muted,
        ))],
        None if status.error.is_none() => vec![Line::from(Span::styled("Memuat profil…", muted))],
        None => Vec::new(),
    };
    let mut lines = lines;
    if let Some(error) = &status.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        )));
    }

    Card::new("Profil", theme).render_with(frame, area, Paragraph::new(lines));
}

/// First-login form; stays up until the profile is saved.
pub fn render_onboarding(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    Card::new("Selamat datang", theme).render_with(
        frame,
        area,
        Paragraph::new(vec![
            Line::from("Lengkapi profil Anda sebelum mulai mencatat keuangan."),
            Line::from(Span::styled(
                "Enter simpan  Tab berikutnya",
                Style::default().fg(theme.text_muted),
            )),
        ]),
    );
    render_modal(
        frame,
        area,
        "profil",
        &state.profile.onboarding,
        state.profile.field,
        theme,
    );
}
