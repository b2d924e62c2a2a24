//! Public screens: login, registration and the password-reset wizard.
use dompet_client::ResetStep;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::{centered_box, form::input_line},
        theme::Theme,
    },
};

const BOX_WIDTH: u16 = 52;

fn auth_box(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    mut lines: Vec<Line<'static>>,
    message: Option<&str>,
    footer: &str,
    theme: &Theme,
) {
    lines.push(Line::from(""));
    if let Some(message) = message {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.error),
        )));
    }
    lines.push(Line::from(Span::styled(
        footer.to_string(),
        Style::default().fg(theme.text_muted),
    )));

    let height = lines.len() as u16 + 4;
    let card_area = centered_box(BOX_WIDTH, height, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(card_area).inner(ratatui::layout::Margin::new(1, 1));
    frame.render_widget(block, card_area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

pub fn render_login(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let login = &state.login;
    let remember = if login.form.remember { "[x]" } else { "[ ]" };
    let remember_style = if login.focus == 2 {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };

    let mut lines = vec![
        input_line("Email", &login.form.email, login.focus == 0, false, theme),
        input_line("Kata sandi", &login.form.password, login.focus == 1, true, theme),
        Line::from(Span::styled(
            format!("{remember} Ingat saya"),
            remember_style,
        )),
    ];
    if login.busy {
        lines.push(Line::from(Span::styled(
            "Memproses…",
            Style::default().fg(theme.text_muted),
        )));
    }

    auth_box(
        frame,
        area,
        "Dompet · Masuk",
        lines,
        login.message.as_deref(),
        "Enter masuk  Ctrl+R daftar  Ctrl+F lupa sandi  Esc keluar",
        theme,
    );
}

pub fn render_register(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let register = &state.register;
    let form = &register.form;
    let lines = vec![
        input_line("Nama", &form.name, register.focus == 0, false, theme),
        input_line("Email", &form.email, register.focus == 1, false, theme),
        input_line("Kata sandi", &form.password, register.focus == 2, true, theme),
        input_line(
            "Ulangi sandi",
            &form.confirmation,
            register.focus == 3,
            true,
            theme,
        ),
    ];
    auth_box(
        frame,
        area,
        "Daftar Akun",
        lines,
        register.message.as_deref(),
        "Enter daftar  Tab berikutnya  Esc kembali",
        theme,
    );
}

pub fn render_forgot(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let reset = &state.reset;
    let wizard = &reset.wizard;

    let (lines, footer) = match wizard.step() {
        ResetStep::Email => (
            vec![
                Line::from("Masukkan email akun Anda untuk menerima kode OTP."),
                input_line("Email", &wizard.email, true, false, theme),
            ],
            "Enter kirim OTP  Esc kembali",
        ),
        ResetStep::Otp => (
            vec![
                Line::from(format!("Kode OTP telah dikirim ke {}.", wizard.email)),
                input_line("Kode OTP", &wizard.otp, true, false, theme),
            ],
            "Enter verifikasi  Esc ubah email",
        ),
        ResetStep::NewPassword => (
            vec![
                input_line("Sandi baru", &wizard.password, reset.focus == 0, true, theme),
                input_line(
                    "Ulangi sandi",
                    &wizard.confirmation,
                    reset.focus == 1,
                    true,
                    theme,
                ),
            ],
            "Enter simpan  Tab berikutnya  Esc kembali",
        ),
        ResetStep::Done => (
            vec![Line::from(Span::styled(
                "Kata sandi berhasil diubah. Silakan masuk kembali.",
                Style::default().fg(theme.positive),
            ))],
            "Enter ke halaman masuk",
        ),
    };

    let mut lines = lines;
    if wizard.is_busy() {
        lines.push(Line::from(Span::styled(
            "Memproses…",
            Style::default().fg(theme.text_muted),
        )));
    }
    auth_box(
        frame,
        area,
        "Lupa Kata Sandi",
        lines,
        wizard.error(),
        footer,
        theme,
    );
}
