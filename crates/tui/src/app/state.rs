use std::time::{Duration, Instant};

use api_types::{dashboard::DashboardSummary, report::ReportSummary};
use chrono::NaiveDate;
use chrono_tz::Tz;
use dompet_client::{
    ListController, ModalController, Navigator, ProfileStatus, ReportPeriod, ResetWizard,
    api::{Budgets, Categories, Goals, Transactions, Wallets},
    format::today_in,
    forms::{LoginForm, ProfileForm, RegisterForm},
};

use super::entity::EntityScreen;
use crate::{config::AppConfig, ui::Theme};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

impl ToastState {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Data fetched once per visit to a screen.
#[derive(Debug)]
pub struct Loadable<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Loadable<T> {
    pub fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Failures keep the previous data on screen.
    pub fn finish(&mut self, result: Result<T, String>) {
        self.loading = false;
        match result {
            Ok(data) => self.data = Some(data),
            Err(message) => self.error = Some(message),
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub form: LoginForm,
    /// 0 email, 1 password, 2 remember
    pub focus: usize,
    pub busy: bool,
    pub message: Option<String>,
}

#[derive(Debug, Default)]
pub struct RegisterState {
    pub form: RegisterForm,
    pub focus: usize,
    pub busy: bool,
    pub message: Option<String>,
}

#[derive(Debug, Default)]
pub struct ResetState {
    pub wizard: ResetWizard,
    pub focus: usize,
}

#[derive(Debug)]
pub struct ReportsState {
    pub period: ReportPeriod,
    pub summary: Loadable<ReportSummary>,
    pub exporting: bool,
}

#[derive(Debug, Default)]
pub struct ProfileState {
    pub status: Loadable<ProfileStatus>,
    pub onboarding: ModalController<ProfileForm>,
    pub field: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatLine {
    User(String),
    Assistant(String),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct AssistantState {
    pub input: String,
    pub lines: Vec<ChatLine>,
    pub waiting: bool,
}

pub struct AppState {
    pub nav: Navigator,
    pub theme: Theme,
    pub tz: Tz,
    pub user_label: Option<String>,
    pub login: LoginState,
    pub register: RegisterState,
    pub reset: ResetState,
    pub dashboard: Loadable<DashboardSummary>,
    pub transactions: EntityScreen<Transactions>,
    pub budgets: EntityScreen<Budgets>,
    pub goals: EntityScreen<Goals>,
    pub wallets: EntityScreen<Wallets>,
    pub categories: EntityScreen<Categories>,
    pub reports: ReportsState,
    pub profile: ProfileState,
    pub assistant: AssistantState,
    pub toast: Option<ToastState>,
}

impl AppState {
    pub fn new(config: &AppConfig, theme: Theme, tz: Tz) -> Self {
        let (limit, debounce) = (config.page_size, config.search_debounce());
        Self {
            nav: Navigator::default(),
            theme,
            tz,
            user_label: None,
            login: LoginState::default(),
            register: RegisterState::default(),
            reset: ResetState::default(),
            dashboard: Loadable::default(),
            transactions: EntityScreen::new(ListController::new(limit, debounce)),
            budgets: EntityScreen::new(ListController::new(limit, debounce)),
            goals: EntityScreen::new(ListController::new(limit, debounce)),
            wallets: EntityScreen::new(ListController::new(limit, debounce)),
            categories: EntityScreen::new(ListController::new(limit, debounce)),
            reports: ReportsState {
                period: ReportPeriod::this_month(today_in(tz)),
                summary: Loadable::default(),
                exporting: false,
            },
            profile: ProfileState::default(),
            assistant: AssistantState::default(),
            toast: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.tz)
    }

    pub fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState::new(level, message));
    }

    /// Drops everything that belongs to the signed-out user.
    ///
    /// Lists and modals are reset in place so answers to requests made
    /// before sign-out are recognised as stale.
    pub fn clear_user_data(&mut self) {
        self.user_label = None;
        self.dashboard = Loadable::default();
        self.transactions.reset();
        self.budgets.reset();
        self.goals.reset();
        self.wallets.reset();
        self.categories.reset();
        self.reports = ReportsState {
            period: ReportPeriod::this_month(today_in(self.tz)),
            summary: Loadable::default(),
            exporting: false,
        };
        self.profile.status = Loadable::default();
        self.profile.onboarding.reset();
        self.profile.field = 0;
        self.assistant = AssistantState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_reload_keeps_previous_data() {
        let mut loadable = Loadable::default();
        loadable.start();
        loadable.finish(Ok(3));
        loadable.start();
        loadable.finish(Err("gagal".to_string()));
        assert_eq!(loadable.data, Some(3));
        assert_eq!(loadable.error.as_deref(), Some("gagal"));
        assert!(!loadable.loading);
    }

    #[test]
    fn toast_expires() {
        let toast = ToastState::new(ToastLevel::Info, "halo");
        assert!(!toast.expired(Instant::now()));
        assert!(toast.expired(Instant::now() + TOAST_TTL));
    }
}
