pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use dompet_client::{
    Route,
    api::{Budgets, Categories, Goals, Transactions, Wallets},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Entity};
use components::hints::{self, KeyHint, common};

pub use terminal::{AppTerminal, TerminalGuard};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(state.theme.background)),
        area,
    );

    match state.nav.current() {
        Route::Login => screens::auth::render_login(frame, area, state),
        Route::Register => screens::auth::render_register(frame, area, state),
        Route::ForgotPassword => screens::auth::render_forgot(frame, area, state),
        _ => render_shell(frame, area, state),
    }

    components::toast::render(frame, area, state.toast.as_ref(), &state.theme);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let route = state.nav.current();
    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_tabs(frame, layout[1], route, theme);

    let content = layout[2];
    match route {
        Route::Dashboard => screens::dashboard::render(frame, content, state),
        Route::Transactions => screens::entity::render::<Transactions>(frame, content, state),
        Route::Wallets => screens::entity::render::<Wallets>(frame, content, state),
        Route::Budgets => screens::entity::render::<Budgets>(frame, content, state),
        Route::Goals => screens::entity::render::<Goals>(frame, content, state),
        Route::Categories => screens::entity::render::<Categories>(frame, content, state),
        Route::Reports => screens::reports::render(frame, content, state),
        Route::Profile => screens::profile::render(frame, content, state),
        Route::Onboarding => screens::profile::render_onboarding(frame, content, state),
        Route::Assistant => screens::assistant::render(frame, content, state),
        Route::Login | Route::Register | Route::ForgotPassword => {}
    }

    render_bottom_bar(frame, layout[3], state, theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state.user_label.as_deref().unwrap_or("-");
    let line = Line::from(vec![
        Span::styled(" Dompet", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("Pengguna", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Hari ini", Style::default().fg(theme.text_muted)),
        Span::raw(format!(
            ": {}",
            dompet_client::format::format_date_id(state.today())
        )),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = hints::hints_to_spans(&common::global_shortcuts(), theme);
    let context = context_hints(state);
    if !context.is_empty() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(&context, theme));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn entity_hints<E: Entity>(state: &AppState) -> Vec<KeyHint> {
    let screen = E::screen(state);
    if screen.confirm.pending().is_some() {
        common::confirm()
    } else if screen.modal.is_open() {
        common::form_editing()
    } else if screen.searching {
        common::search()
    } else {
        common::crud_list(E::SEARCHABLE, E::TYPE_FILTER)
    }
}

fn context_hints(state: &AppState) -> Vec<KeyHint> {
    match state.nav.current() {
        Route::Transactions => entity_hints::<Transactions>(state),
        Route::Wallets => entity_hints::<Wallets>(state),
        Route::Budgets => entity_hints::<Budgets>(state),
        Route::Goals => entity_hints::<Goals>(state),
        Route::Categories => entity_hints::<Categories>(state),
        Route::Dashboard | Route::Profile => vec![KeyHint::new("r", "muat ulang")],
        Route::Reports => vec![
            KeyHint::new("[ ]", "bulan"),
            KeyHint::new("x", "ekspor xlsx"),
            KeyHint::new("r", "muat ulang"),
        ],
        Route::Onboarding => common::form_editing(),
        Route::Assistant => vec![KeyHint::new("Enter", "kirim"), KeyHint::new("Esc", "hapus")],
        Route::Login | Route::Register | Route::ForgotPassword => Vec::new(),
    }
}
