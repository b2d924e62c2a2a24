mod context;
pub mod entity;
pub mod fields;
mod state;

use std::{future::Future, time::Duration, time::Instant};

use api_types::{dashboard::DashboardSummary, report::ReportSummary};
use crossterm::event::{self, Event, KeyEvent};
use dompet_client::{
    ClientError, FormDraft, ModalController, ProfileStatus, ReferenceOptions, ReportPeriod, Route,
    api::{Budgets, Categories, Goals, Transactions, Wallets},
    error::Result as ClientResult,
    list::FetchTicket,
    modal::{ResourceSubmitter, SubmitOutcome, SubmitTicket},
    report::Export,
    wizard::{ResetReply, ResetStep},
};
use tokio::sync::mpsc;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use context::AppContext;
pub use entity::{CrudEvent, Entity, EntityScreen, RefreshHost};
pub use fields::{FieldKind, FieldView, FormFields};
pub use state::{
    AppState, AssistantState, ChatLine, Loadable, LoginState, ProfileState, RegisterState,
    ReportsState, ResetState, ToastLevel, ToastState,
};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Results of background calls, delivered back to the event loop.
pub enum AppEvent {
    LoggedIn {
        remember: bool,
        result: ClientResult<String>,
    },
    Registered(ClientResult<String>),
    Reset(ClientResult<ResetReply>),
    Dashboard(ClientResult<DashboardSummary>),
    Report(ClientResult<ReportSummary>),
    Exported(ClientResult<Export>),
    Profile(ClientResult<ProfileStatus>),
    ProfileSaved(SubmitTicket, ClientResult<()>),
    Chat(ClientResult<String>),
    Transactions(CrudEvent<Transactions>),
    Budgets(CrudEvent<Budgets>),
    Goals(CrudEvent<Goals>),
    Wallets(CrudEvent<Wallets>),
    Categories(CrudEvent<Categories>),
}

/// What a key did to an open form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKey {
    Submit,
    Cancel,
    Handled,
}

fn edit_form<F: FormDraft + FormFields>(
    modal: &mut ModalController<F>,
    field: &mut usize,
    action: AppAction,
) -> FormKey {
    let count = fields::field_count(modal.draft()).max(1);
    match action {
        AppAction::Submit => return FormKey::Submit,
        AppAction::Cancel => return FormKey::Cancel,
        AppAction::NextField | AppAction::Down => *field = (*field + 1) % count,
        AppAction::PrevField | AppAction::Up => *field = (*field + count - 1) % count,
        AppAction::Left | AppAction::Right => {
            let options = modal.options().clone();
            modal
                .draft_mut()
                .cycle(*field, &options, action == AppAction::Right);
        }
        AppAction::Input(' ')
            if modal.draft().fields(modal.options()).get(*field).map(|f| f.kind)
                == Some(FieldKind::Choice) =>
        {
            let options = modal.options().clone();
            modal.draft_mut().cycle(*field, &options, true);
        }
        AppAction::Input(ch) => fields::insert_char(modal.draft_mut(), *field, ch),
        AppAction::Backspace => fields::delete_char(modal.draft_mut(), *field),
        _ => {}
    }
    FormKey::Handled
}

pub struct App {
    config: AppConfig,
    ctx: AppContext,
    pub state: AppState,
    tx: mpsc::UnboundedSender<(u64, AppEvent)>,
    rx: mpsc::UnboundedReceiver<(u64, AppEvent)>,
    /// Bumped on sign-out; results of tasks spawned earlier are dropped.
    epoch: u64,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, ctx: AppContext) -> Result<Self> {
        let tz = config.tz()?;
        let state = AppState::new(&config, ctx.theme, tz);
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            config,
            ctx,
            state,
            tx,
            rx,
            epoch: 0,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.ctx.session.is_authenticated() {
            tracing::info!("resuming remembered session");
            self.signed_in();
        }

        let mut guard = ui::TerminalGuard::enter()?;
        while !self.should_quit {
            guard
                .terminal()
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            while let Ok((epoch, event)) = self.rx.try_recv() {
                if epoch != self.epoch {
                    tracing::debug!(
                        epoch,
                        current = self.epoch,
                        "dropping result from a previous session"
                    );
                    continue;
                }
                self.handle_event(event);
            }
            self.tick(Instant::now());
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            if tx.send((epoch, task.await)).is_err() {
                tracing::debug!("event loop closed before a task finished");
            }
        });
    }

    fn tick(&mut self, now: Instant) {
        if self.state.toast.as_ref().is_some_and(|toast| toast.expired(now)) {
            self.state.toast = None;
        }
        if let Some(ticket) = self.state.transactions.list.poll_debounce(now) {
            self.fetch_list::<Transactions>(ticket);
        }
    }

    // ---- navigation ----

    fn go(&mut self, route: Route) {
        let landed = self.state.nav.navigate(&self.ctx.session, route);
        self.enter(landed);
    }

    /// Loads whatever the screen shows.
    fn enter(&mut self, route: Route) {
        match route {
            Route::Dashboard => self.load_dashboard(),
            Route::Transactions => self.refetch::<Transactions>(),
            Route::Budgets => self.refetch::<Budgets>(),
            Route::Goals => self.refetch::<Goals>(),
            Route::Wallets => self.refetch::<Wallets>(),
            Route::Categories => self.refetch::<Categories>(),
            Route::Reports => self.load_report(),
            Route::Profile => self.load_profile(),
            Route::Onboarding => {
                if !self.state.profile.onboarding.is_open() {
                    self.state.profile.onboarding.open_create();
                    self.state.profile.field = 0;
                }
            }
            Route::Login | Route::Register | Route::ForgotPassword | Route::Assistant => {}
        }
    }

    fn step_section(&mut self, forward: bool) {
        let sections = Route::SECTIONS;
        let current = sections
            .iter()
            .position(|route| *route == self.state.nav.current())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % sections.len()
        } else {
            (current + sections.len() - 1) % sections.len()
        };
        self.go(sections[next]);
    }

    fn signed_in(&mut self) {
        self.state.user_label = self.ctx.session.current_user().map(|identity| {
            identity
                .name
                .or(identity.email)
                .unwrap_or_else(|| identity.user_id.to_string())
        });
        let route = self.state.nav.after_login(&self.ctx.session);
        self.enter(route);
        self.check_profile();
    }

    fn logout(&mut self) {
        if let Err(err) = self.ctx.session.sign_out() {
            tracing::error!("failed to clear session: {err}");
        }
        self.epoch += 1;
        self.state.clear_user_data();
        self.state.nav.revalidate(&self.ctx.session);
        self.state.toast(ToastLevel::Info, "Anda telah keluar.");
    }

    /// 401 already cleared the session; send the user back to login.
    fn session_lost(&mut self, err: &ClientError) -> bool {
        if !err.is_unauthorized() {
            return false;
        }
        self.epoch += 1;
        self.state.clear_user_data();
        self.state.nav.revalidate(&self.ctx.session);
        self.state.toast(ToastLevel::Error, err.user_message());
        true
    }

    // ---- keys ----

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.nav.current() {
            Route::Login => self.login_key(action),
            Route::Register => self.register_key(action),
            Route::ForgotPassword => self.reset_key(action),
            route => {
                if action == AppAction::Logout {
                    self.logout();
                    return;
                }
                self.shell_key(route, action);
            }
        }
    }

    fn shell_key(&mut self, route: Route, action: AppAction) {
        let captured = match route {
            Route::Transactions => self.entity_captures::<Transactions>(),
            Route::Budgets => self.entity_captures::<Budgets>(),
            Route::Goals => self.entity_captures::<Goals>(),
            Route::Wallets => self.entity_captures::<Wallets>(),
            Route::Categories => self.entity_captures::<Categories>(),
            Route::Onboarding | Route::Assistant => true,
            _ => false,
        };

        if !captured {
            match action {
                AppAction::Left => return self.step_section(false),
                AppAction::Right => return self.step_section(true),
                AppAction::Input('q') => {
                    self.should_quit = true;
                    return;
                }
                AppAction::Input(ch @ '1'..='9') => {
                    let index = ch as usize - '1' as usize;
                    if let Some(route) = Route::SECTIONS.get(index) {
                        self.go(*route);
                    }
                    return;
                }
                _ => {}
            }
        }

        match route {
            Route::Transactions => self.entity_key::<Transactions>(action),
            Route::Budgets => self.entity_key::<Budgets>(action),
            Route::Goals => self.entity_key::<Goals>(action),
            Route::Wallets => self.entity_key::<Wallets>(action),
            Route::Categories => self.entity_key::<Categories>(action),
            Route::Dashboard => {
                if action == AppAction::Input('r') {
                    self.load_dashboard();
                }
            }
            Route::Reports => self.reports_key(action),
            Route::Profile => {
                if action == AppAction::Input('r') {
                    self.load_profile();
                }
            }
            Route::Onboarding => self.onboarding_key(action),
            Route::Assistant => self.assistant_key(action),
            Route::Login | Route::Register | Route::ForgotPassword => {}
        }
    }

    fn login_key(&mut self, action: AppAction) {
        let login = &mut self.state.login;
        match action {
            AppAction::Cancel => self.should_quit = true,
            AppAction::OpenRegister => self.go(Route::Register),
            AppAction::OpenForgotPassword => {
                self.state.reset = ResetState::default();
                self.state.reset.wizard.email = self.state.login.form.email.clone();
                self.go(Route::ForgotPassword);
            }
            AppAction::NextField | AppAction::Down => login.focus = (login.focus + 1) % 3,
            AppAction::PrevField | AppAction::Up => login.focus = (login.focus + 2) % 3,
            AppAction::Input(' ') if login.focus == 2 => {
                login.form.remember = !login.form.remember;
            }
            AppAction::Input(ch) => match login.focus {
                0 => login.form.email.push(ch),
                1 => login.form.password.push(ch),
                _ => {}
            },
            AppAction::Backspace => match login.focus {
                0 => {
                    login.form.email.pop();
                }
                1 => {
                    login.form.password.pop();
                }
                _ => {}
            },
            AppAction::Submit => self.submit_login(),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let login = &mut self.state.login;
        if login.busy {
            return;
        }
        match login.form.validate() {
            Ok(request) => {
                login.busy = true;
                login.message = None;
                let remember = login.form.remember;
                let api = self.ctx.api.clone();
                self.spawn(async move {
                    let result = api.login(&request.email, &request.password).await;
                    AppEvent::LoggedIn { remember, result }
                });
            }
            Err(err) => login.message = Some(err.to_string()),
        }
    }

    fn register_key(&mut self, action: AppAction) {
        let register = &mut self.state.register;
        match action {
            AppAction::Cancel => self.go(Route::Login),
            AppAction::NextField | AppAction::Down => register.focus = (register.focus + 1) % 4,
            AppAction::PrevField | AppAction::Up => register.focus = (register.focus + 3) % 4,
            AppAction::Input(ch) => {
                if let Some(value) = register_field(register) {
                    value.push(ch);
                }
            }
            AppAction::Backspace => {
                if let Some(value) = register_field(register) {
                    value.pop();
                }
            }
            AppAction::Submit => {
                if register.busy {
                    return;
                }
                match register.form.validate() {
                    Ok(request) => {
                        register.busy = true;
                        register.message = None;
                        let api = self.ctx.api.clone();
                        self.spawn(async move { AppEvent::Registered(api.register(&request).await) });
                    }
                    Err(err) => register.message = Some(err.to_string()),
                }
            }
            _ => {}
        }
    }

    fn reset_key(&mut self, action: AppAction) {
        let reset = &mut self.state.reset;
        let step = reset.wizard.step();
        let field_count = if step == ResetStep::NewPassword { 2 } else { 1 };
        match action {
            AppAction::Cancel => {
                if matches!(step, ResetStep::Email | ResetStep::Done) {
                    self.go(Route::Login);
                } else {
                    reset.wizard.back();
                    reset.focus = 0;
                }
            }
            AppAction::NextField | AppAction::PrevField | AppAction::Down | AppAction::Up => {
                reset.focus = (reset.focus + 1) % field_count;
            }
            AppAction::Input(ch) => {
                if let Some(value) = reset_field(reset) {
                    value.push(ch);
                }
            }
            AppAction::Backspace => {
                if let Some(value) = reset_field(reset) {
                    value.pop();
                }
            }
            AppAction::Submit => {
                if step == ResetStep::Done {
                    self.state.login.form.email = reset.wizard.email.clone();
                    self.go(Route::Login);
                    return;
                }
                if let Some(call) = reset.wizard.begin() {
                    let api = self.ctx.api.clone();
                    self.spawn(async move { AppEvent::Reset(call.run(&api).await) });
                }
            }
            _ => {}
        }
    }

    fn entity_captures<E: Entity>(&self) -> bool {
        let screen = E::screen(&self.state);
        screen.modal.is_open() || screen.confirm.pending().is_some() || screen.searching
    }

    fn entity_key<E: Entity>(&mut self, action: AppAction) {
        let screen = E::screen_mut(&mut self.state);

        if screen.confirm.pending().is_some() {
            match action {
                AppAction::Input('y') | AppAction::Submit => self.delete_confirmed::<E>(),
                AppAction::Input('n') | AppAction::Cancel => screen.confirm.cancel(),
                _ => {}
            }
            return;
        }

        if screen.modal.is_open() {
            match edit_form(&mut screen.modal, &mut screen.field, action) {
                FormKey::Submit => self.submit_modal::<E>(),
                FormKey::Cancel => {
                    let mut host = RefreshHost::default();
                    screen.modal.close(&mut host);
                    if host.closed {
                        screen.field = 0;
                    }
                }
                FormKey::Handled => {}
            }
            return;
        }

        if screen.searching {
            let now = Instant::now();
            match action {
                AppAction::Input(ch) => {
                    let term = format!("{}{ch}", screen.list.search());
                    screen.list.set_search(term, now);
                }
                AppAction::Backspace => {
                    let mut term = screen.list.search().to_string();
                    term.pop();
                    screen.list.set_search(term, now);
                }
                AppAction::Submit | AppAction::Cancel => screen.searching = false,
                _ => {}
            }
            return;
        }

        match action {
            AppAction::Up | AppAction::Input('k') => screen.list.select_prev(),
            AppAction::Down | AppAction::Input('j') => screen.list.select_next(),
            AppAction::Input('n') => {
                if let Some(ticket) = screen.list.next_page() {
                    self.fetch_list::<E>(ticket);
                }
            }
            AppAction::Input('p') => {
                if let Some(ticket) = screen.list.prev_page() {
                    self.fetch_list::<E>(ticket);
                }
            }
            AppAction::Input('r') => self.refetch::<E>(),
            AppAction::Input('c') => self.open_create::<E>(),
            AppAction::Input('e') | AppAction::Submit => self.open_edit::<E>(),
            AppAction::Input('d') => {
                if let Some(id) = screen.list.selected_item().map(|item| E::id(item).clone()) {
                    screen.confirm.request(id);
                }
            }
            AppAction::Input('/') if E::SEARCHABLE => screen.searching = true,
            AppAction::Input('f') if E::TYPE_FILTER => {
                let next = screen.next_type_filter();
                let ticket = screen.list.set_filter("type", next);
                self.fetch_list::<E>(ticket);
            }
            _ => {}
        }
    }

    fn reports_key(&mut self, action: AppAction) {
        let period = self.state.reports.period;
        let shifted = match action {
            AppAction::Input('[') => period.start().pred_opt().map(ReportPeriod::this_month),
            AppAction::Input(']') => period.end().succ_opt().map(ReportPeriod::this_month),
            AppAction::Input('r') => {
                self.load_report();
                None
            }
            AppAction::Input('x') => {
                self.export_report();
                None
            }
            _ => None,
        };
        if let Some(period) = shifted {
            self.state.reports.period = period;
            self.load_report();
        }
    }

    fn onboarding_key(&mut self, action: AppAction) {
        let profile = &mut self.state.profile;
        match edit_form(&mut profile.onboarding, &mut profile.field, action) {
            FormKey::Submit => {
                let user_id = self.ctx.session.user_id();
                match profile.onboarding.begin_submit(user_id.as_ref()) {
                    Ok(pending) => {
                        let api = self.ctx.api.clone();
                        self.spawn(async move {
                            let result = api.create_profile(&pending.payload).await;
                            AppEvent::ProfileSaved(pending.ticket, result)
                        });
                    }
                    Err(outcome) => tracing::debug!(?outcome, "onboarding submit not sent"),
                }
            }
            // Onboarding can't be skipped; Esc only clears the focus.
            FormKey::Cancel => profile.field = 0,
            FormKey::Handled => {}
        }
    }

    fn assistant_key(&mut self, action: AppAction) {
        let assistant = &mut self.state.assistant;
        match action {
            AppAction::Input(ch) => assistant.input.push(ch),
            AppAction::Backspace => {
                assistant.input.pop();
            }
            AppAction::Cancel => assistant.input.clear(),
            AppAction::Left => self.step_section(false),
            AppAction::Right => self.step_section(true),
            AppAction::Submit => {
                let message = assistant.input.trim().to_string();
                if message.is_empty() || assistant.waiting {
                    return;
                }
                assistant.input.clear();
                assistant.waiting = true;
                assistant.lines.push(ChatLine::User(message.clone()));
                let api = self.ctx.api.clone();
                self.spawn(async move { AppEvent::Chat(api.chat(&message).await) });
            }
            _ => {}
        }
    }

    // ---- entity screens ----

    fn fetch_list<E: Entity>(&self, ticket: FetchTicket) {
        let api = self.ctx.api.clone();
        self.spawn(async move {
            let result = api.list::<E>(&ticket.query).await;
            E::event(CrudEvent::Listed(ticket, result))
        });
    }

    fn refetch<E: Entity>(&mut self) {
        let ticket = E::screen_mut(&mut self.state).list.begin_fetch();
        self.fetch_list::<E>(ticket);
    }

    fn load_options<E: Entity>(&self) {
        if !E::NEEDS_OPTIONS {
            return;
        }
        let api = self.ctx.api.clone();
        self.spawn(async move { E::event(CrudEvent::Options(ReferenceOptions::load(&api).await)) });
    }

    fn open_create<E: Entity>(&mut self) {
        let today = self.state.today();
        let screen = E::screen_mut(&mut self.state);
        screen.modal.open_create();
        E::prefill(screen.modal.draft_mut(), today);
        screen.field = 0;
        self.load_options::<E>();
    }

    fn open_edit<E: Entity>(&mut self) {
        let screen = E::screen_mut(&mut self.state);
        let Some(item) = screen.list.selected_item().cloned() else {
            return;
        };
        screen.modal.open_edit(E::id(&item).clone(), &item);
        screen.field = 0;
        self.load_options::<E>();
    }

    fn submit_modal<E: Entity>(&mut self) {
        let user_id = self.ctx.session.user_id();
        let screen = E::screen_mut(&mut self.state);
        match screen.modal.begin_submit(user_id.as_ref()) {
            Ok(pending) => {
                let api = self.ctx.api.clone();
                self.spawn(async move {
                    let result = pending.send(&ResourceSubmitter::<E>::new(&api)).await;
                    E::event(CrudEvent::Saved(pending.ticket, result))
                });
            }
            Err(SubmitOutcome::Invalid(err)) => {
                tracing::debug!(entity = E::NOUN, "form rejected locally: {err}");
            }
            Err(outcome) => tracing::debug!(?outcome, "submit ignored"),
        }
    }

    fn delete_confirmed<E: Entity>(&mut self) {
        let screen = E::screen_mut(&mut self.state);
        if screen.deleting {
            return;
        }
        let Some(id) = screen.confirm.confirm() else {
            return;
        };
        screen.deleting = true;
        let api = self.ctx.api.clone();
        self.spawn(async move { E::event(CrudEvent::Deleted(api.delete::<E>(&id).await)) });
    }

    fn apply_crud<E: Entity>(&mut self, event: CrudEvent<E>) {
        match event {
            CrudEvent::Listed(ticket, result) => {
                if let Err(err) = &result {
                    if self.session_lost(err) {
                        return;
                    }
                }
                E::screen_mut(&mut self.state).list.apply(ticket, result);
            }
            CrudEvent::Options(options) => {
                let modal = &mut E::screen_mut(&mut self.state).modal;
                if modal.is_open() {
                    modal.set_options(options);
                }
            }
            CrudEvent::Saved(ticket, result) => {
                if let Err(err) = &result {
                    if self.session_lost(err) {
                        return;
                    }
                }
                let screen = E::screen_mut(&mut self.state);
                let mut host = RefreshHost::default();
                let outcome = screen.modal.finish_submit(ticket, result, &mut host);
                if host.closed {
                    screen.field = 0;
                }
                if outcome == SubmitOutcome::Saved {
                    self.state
                        .toast(ToastLevel::Success, format!("Data {} tersimpan.", E::NOUN));
                }
                if host.refetch {
                    self.refetch::<E>();
                }
            }
            CrudEvent::Deleted(result) => {
                E::screen_mut(&mut self.state).deleting = false;
                match result {
                    Ok(()) => {
                        self.state
                            .toast(ToastLevel::Success, format!("Data {} dihapus.", E::NOUN));
                        self.refetch::<E>();
                    }
                    Err(err) => {
                        if !self.session_lost(&err) {
                            self.state.toast(ToastLevel::Error, err.user_message());
                        }
                    }
                }
            }
        }
    }

    // ---- other screens ----

    fn load_dashboard(&mut self) {
        self.state.dashboard.start();
        let api = self.ctx.api.clone();
        self.spawn(async move { AppEvent::Dashboard(api.dashboard_summary().await) });
    }

    fn load_report(&mut self) {
        self.state.reports.summary.start();
        let period = self.state.reports.period;
        let api = self.ctx.api.clone();
        self.spawn(async move { AppEvent::Report(api.report_summary(&period).await) });
    }

    fn export_report(&mut self) {
        if self.state.reports.exporting {
            return;
        }
        self.state.reports.exporting = true;
        let period = self.state.reports.period;
        let api = self.ctx.api.clone();
        self.spawn(async move { AppEvent::Exported(api.export_report(&period).await) });
    }

    fn load_profile(&mut self) {
        self.state.profile.status.start();
        self.check_profile();
    }

    fn check_profile(&self) {
        let api = self.ctx.api.clone();
        self.spawn(async move { AppEvent::Profile(api.profile().await) });
    }

    // ---- events ----

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoggedIn { remember, result } => {
                self.state.login.busy = false;
                self.finish_auth(result, remember);
            }
            AppEvent::Registered(result) => {
                self.state.register.busy = false;
                if let Err(err) = &result {
                    self.state.register.message = Some(err.user_message());
                    return;
                }
                self.state.register = RegisterState::default();
                self.finish_auth(result, false);
            }
            AppEvent::Reset(result) => self.state.reset.wizard.finish(result),
            AppEvent::Dashboard(result) => {
                if let Err(err) = &result {
                    if self.session_lost(err) {
                        return;
                    }
                }
                self.state
                    .dashboard
                    .finish(result.map_err(|err| err.user_message()));
            }
            AppEvent::Report(result) => {
                if let Err(err) = &result {
                    if self.session_lost(err) {
                        return;
                    }
                }
                self.state
                    .reports
                    .summary
                    .finish(result.map_err(|err| err.user_message()));
            }
            AppEvent::Exported(result) => {
                self.state.reports.exporting = false;
                match result {
                    Ok(export) => match export.save_to(&self.config.export_dir) {
                        Ok(path) => self.state.toast(
                            ToastLevel::Success,
                            format!("Laporan disimpan: {}", path.display()),
                        ),
                        Err(err) => {
                            tracing::error!("failed to write export: {err}");
                            self.state
                                .toast(ToastLevel::Error, "Gagal menyimpan file laporan.");
                        }
                    },
                    Err(err) => {
                        if !self.session_lost(&err) {
                            self.state.toast(ToastLevel::Error, err.user_message());
                        }
                    }
                }
            }
            AppEvent::Profile(result) => self.apply_profile(result),
            AppEvent::ProfileSaved(ticket, result) => {
                if let Err(err) = &result {
                    if self.session_lost(err) {
                        return;
                    }
                }
                let mut host = RefreshHost::default();
                let outcome = self.state
                    .profile
                    .onboarding
                    .finish_submit(ticket, result, &mut host);
                if outcome == SubmitOutcome::Saved {
                    self.state.profile.field = 0;
                    self.state.toast(ToastLevel::Success, "Profil tersimpan.");
                    self.go(Route::Dashboard);
                    self.load_profile();
                }
            }
            AppEvent::Chat(result) => {
                self.state.assistant.waiting = false;
                match result {
                    Ok(reply) => self.state.assistant.lines.push(ChatLine::Assistant(reply)),
                    Err(err) => {
                        if !self.session_lost(&err) {
                            self.state
                                .assistant
                                .lines
                                .push(ChatLine::Failed(err.user_message()));
                        }
                    }
                }
            }
            AppEvent::Transactions(event) => self.apply_crud(event),
            AppEvent::Budgets(event) => self.apply_crud(event),
            AppEvent::Goals(event) => self.apply_crud(event),
            AppEvent::Wallets(event) => self.apply_crud(event),
            AppEvent::Categories(event) => self.apply_crud(event),
        }
    }

    fn finish_auth(&mut self, result: ClientResult<String>, remember: bool) {
        match result {
            Ok(token) => {
                if let Err(err) = self.ctx.session.sign_in(&token, remember) {
                    tracing::error!("failed to store session: {err}");
                    self.state.login.message = Some("Gagal menyimpan sesi.".to_string());
                    return;
                }
                tracing::info!(remember, "signed in");
                self.state.login.form.password.clear();
                self.state.login.message = None;
                self.signed_in();
            }
            Err(err) => self.state.login.message = Some(err.user_message()),
        }
    }

    fn apply_profile(&mut self, result: ClientResult<ProfileStatus>) {
        match result {
            Ok(ProfileStatus::Missing) => {
                self.state.profile.status.finish(Ok(ProfileStatus::Missing));
                if self.state.nav.current() != Route::Onboarding {
                    self.go(Route::Onboarding);
                }
            }
            Ok(status) => {
                self.state.profile.status.finish(Ok(status));
                if self.state.nav.current() == Route::Onboarding {
                    self.go(Route::Dashboard);
                }
            }
            Err(err) => {
                if !self.session_lost(&err) {
                    self.state.profile.status.finish(Err(err.user_message()));
                }
            }
        }
    }
}

fn register_field(state: &mut RegisterState) -> Option<&mut String> {
    match state.focus {
        0 => Some(&mut state.form.name),
        1 => Some(&mut state.form.email),
        2 => Some(&mut state.form.password),
        3 => Some(&mut state.form.confirmation),
        _ => None,
    }
}

fn reset_field(state: &mut ResetState) -> Option<&mut String> {
    let wizard = &mut state.wizard;
    match (wizard.step(), state.focus) {
        (ResetStep::Email, _) => Some(&mut wizard.email),
        (ResetStep::Otp, _) => Some(&mut wizard.otp),
        (ResetStep::NewPassword, 0) => Some(&mut wizard.password),
        (ResetStep::NewPassword, _) => Some(&mut wizard.confirmation),
        (ResetStep::Done, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use dompet_client::forms::{CategoryForm, TransactionForm};

    use super::*;

    #[test]
    fn form_keys_move_focus_and_edit() {
        let mut modal = ModalController::<TransactionForm>::default();
        modal.open_create();
        let mut field = 0;

        assert_eq!(edit_form(&mut modal, &mut field, AppAction::Up), FormKey::Handled);
        assert_eq!(field, 5);
        edit_form(&mut modal, &mut field, AppAction::NextField);
        edit_form(&mut modal, &mut field, AppAction::NextField);
        assert_eq!(field, 1);
        for ch in "25000".chars() {
            edit_form(&mut modal, &mut field, AppAction::Input(ch));
        }
        assert_eq!(modal.draft().amount, "25.000");
        assert_eq!(edit_form(&mut modal, &mut field, AppAction::Submit), FormKey::Submit);
    }

    #[test]
    fn space_cycles_choice_fields() {
        let mut modal = ModalController::<CategoryForm>::default();
        modal.open_create();
        let mut field = 1;
        edit_form(&mut modal, &mut field, AppAction::Input(' '));
        assert_eq!(
            modal.draft().kind,
            api_types::category::CategoryKind::Income
        );
        assert_eq!(edit_form(&mut modal, &mut field, AppAction::Cancel), FormKey::Cancel);
    }
}
