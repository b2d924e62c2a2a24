//! Generic list + modal screen shared by the five entity sections.
use api_types::{
    Id,
    budget::Budget,
    category::{Category, CategoryKind},
    goal::Goal,
    transaction::Transaction,
    wallet::Wallet,
};
use chrono::NaiveDate;
use dompet_client::{
    Confirmation, FormDraft, ListController, ModalController, ModalHost, ReferenceOptions,
    ReportPeriod, Resource, Route,
    api::{Budgets, Categories, Goals, Transactions, Wallets},
    error::Result as ClientResult,
    format::{format_date_id, format_rupiah},
    forms::{BudgetForm, CategoryForm, GoalForm, TransactionForm, WalletForm, DATE_FORMAT},
    list::{FetchTicket, Page},
    modal::SubmitTicket,
};

use super::{
    AppEvent, AppState,
    fields::{FormFields, wallet_kind_label},
};

/// Results of background calls made on behalf of one entity screen.
pub enum CrudEvent<E: Entity> {
    Listed(FetchTicket, ClientResult<Page<E::Item>>),
    Options(ReferenceOptions),
    Saved(SubmitTicket, ClientResult<()>),
    Deleted(ClientResult<()>),
}

pub trait Entity:
    Resource<Item: Clone + Send + Sync + 'static, Payload: Send + Sync + 'static>
    + Sized
    + Send
    + Sync
    + 'static
{
    type Form: FormDraft<Seed = Self::Item, Payload = Self::Payload> + FormFields;

    const ROUTE: Route;
    /// Lower-case noun used in toasts and dialogs.
    const NOUN: &'static str;
    /// Modal needs category/wallet dropdowns.
    const NEEDS_OPTIONS: bool = false;
    const SEARCHABLE: bool = false;
    /// List can be narrowed to income or expense.
    const TYPE_FILTER: bool = false;
    const COLUMNS: &'static [(&'static str, u16)];

    fn id(item: &Self::Item) -> &Id;
    fn row(item: &Self::Item) -> Vec<String>;
    fn prefill(_form: &mut Self::Form, _today: NaiveDate) {}

    fn screen(state: &AppState) -> &EntityScreen<Self>;
    fn screen_mut(state: &mut AppState) -> &mut EntityScreen<Self>;
    fn event(event: CrudEvent<Self>) -> AppEvent;
}

/// Records what the modal asked of its parent list.
#[derive(Debug, Default)]
pub struct RefreshHost {
    pub refetch: bool,
    pub closed: bool,
}

impl ModalHost for RefreshHost {
    fn on_success(&mut self) {
        self.refetch = true;
    }

    fn on_close(&mut self) {
        self.closed = true;
    }
}

pub struct EntityScreen<E: Entity> {
    pub list: ListController<E::Item>,
    pub modal: ModalController<E::Form>,
    /// Focused modal field.
    pub field: usize,
    pub confirm: Confirmation<Id>,
    /// Keystrokes go to the search box.
    pub searching: bool,
    pub deleting: bool,
}

impl<E: Entity> EntityScreen<E> {
    pub fn new(list: ListController<E::Item>) -> Self {
        Self {
            list,
            modal: ModalController::default(),
            field: 0,
            confirm: Confirmation::default(),
            searching: false,
            deleting: false,
        }
    }

    pub fn reset(&mut self) {
        self.list.reset();
        self.modal.reset();
        self.field = 0;
        self.confirm.cancel();
        self.searching = false;
        self.deleting = false;
    }

    pub fn type_filter(&self) -> Option<CategoryKind> {
        match self.list.filter("type") {
            Some("income") => Some(CategoryKind::Income),
            Some("expense") => Some(CategoryKind::Expense),
            _ => None,
        }
    }

    /// all → pengeluaran → pemasukan → all
    pub fn next_type_filter(&self) -> Option<String> {
        match self.type_filter() {
            None => Some(CategoryKind::Expense.as_str().to_string()),
            Some(CategoryKind::Expense) => Some(CategoryKind::Income.as_str().to_string()),
            Some(CategoryKind::Income) => None,
        }
    }
}

fn date_cell(date: NaiveDate) -> String {
    format_date_id(date)
}

impl Entity for Transactions {
    type Form = TransactionForm;

    const ROUTE: Route = Route::Transactions;
    const NOUN: &'static str = "transaksi";
    const NEEDS_OPTIONS: bool = true;
    const SEARCHABLE: bool = true;
    const TYPE_FILTER: bool = true;
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Tanggal", 18),
        ("Jenis", 12),
        ("Jumlah", 16),
        ("Kategori", 16),
        ("Dompet", 14),
        ("Catatan", 24),
    ];

    fn id(item: &Transaction) -> &Id {
        &item.id
    }

    fn row(item: &Transaction) -> Vec<String> {
        vec![
            date_cell(item.date),
            item.kind.label().to_string(),
            format_rupiah(item.amount),
            item.category_name.clone().unwrap_or_else(|| "-".to_string()),
            item.wallet_name.clone().unwrap_or_else(|| "-".to_string()),
            item.description.clone().unwrap_or_default(),
        ]
    }

    fn prefill(form: &mut TransactionForm, today: NaiveDate) {
        form.date = today.format(DATE_FORMAT).to_string();
    }

    fn screen(state: &AppState) -> &EntityScreen<Self> {
        &state.transactions
    }

    fn screen_mut(state: &mut AppState) -> &mut EntityScreen<Self> {
        &mut state.transactions
    }

    fn event(event: CrudEvent<Self>) -> AppEvent {
        AppEvent::Transactions(event)
    }
}

impl Entity for Budgets {
    type Form = BudgetForm;

    const ROUTE: Route = Route::Budgets;
    const NOUN: &'static str = "anggaran";
    const NEEDS_OPTIONS: bool = true;
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Kategori", 16),
        ("Anggaran", 16),
        ("Terpakai", 16),
        ("Periode", 34),
        ("Status", 12),
    ];

    fn id(item: &Budget) -> &Id {
        &item.id
    }

    fn row(item: &Budget) -> Vec<String> {
        vec![
            item.category_name.clone().unwrap_or_else(|| "-".to_string()),
            format_rupiah(item.amount),
            item.spent.map(format_rupiah).unwrap_or_else(|| "-".to_string()),
            format!(
                "{} - {}",
                date_cell(item.period_start),
                date_cell(item.period_end)
            ),
            item.status.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }

    fn prefill(form: &mut BudgetForm, today: NaiveDate) {
        let month = ReportPeriod::this_month(today);
        form.period_start = month.start().format(DATE_FORMAT).to_string();
        form.period_end = month.end().format(DATE_FORMAT).to_string();
    }

    fn screen(state: &AppState) -> &EntityScreen<Self> {
        &state.budgets
    }

    fn screen_mut(state: &mut AppState) -> &mut EntityScreen<Self> {
        &mut state.budgets
    }

    fn event(event: CrudEvent<Self>) -> AppEvent {
        AppEvent::Budgets(event)
    }
}

impl Entity for Goals {
    type Form = GoalForm;

    const ROUTE: Route = Route::Goals;
    const NOUN: &'static str = "target";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Nama", 20),
        ("Terkumpul", 16),
        ("Target", 16),
        ("Progres", 8),
        ("Tenggat", 18),
    ];

    fn id(item: &Goal) -> &Id {
        &item.id
    }

    fn row(item: &Goal) -> Vec<String> {
        let progress = if item.target_amount > 0 {
            (item.current_amount.max(0) * 100 / item.target_amount).min(100)
        } else {
            0
        };
        vec![
            item.name.clone(),
            format_rupiah(item.current_amount),
            format_rupiah(item.target_amount),
            format!("{progress}%"),
            item.deadline.map(date_cell).unwrap_or_else(|| "-".to_string()),
        ]
    }

    fn screen(state: &AppState) -> &EntityScreen<Self> {
        &state.goals
    }

    fn screen_mut(state: &mut AppState) -> &mut EntityScreen<Self> {
        &mut state.goals
    }

    fn event(event: CrudEvent<Self>) -> AppEvent {
        AppEvent::Goals(event)
    }
}

impl Entity for Wallets {
    type Form = WalletForm;

    const ROUTE: Route = Route::Wallets;
    const NOUN: &'static str = "dompet";
    const COLUMNS: &'static [(&'static str, u16)] =
        &[("Nama", 24), ("Jenis", 12), ("Saldo", 18)];

    fn id(item: &Wallet) -> &Id {
        &item.id
    }

    fn row(item: &Wallet) -> Vec<String> {
        vec![
            item.name.clone(),
            wallet_kind_label(&item.kind).to_string(),
            format_rupiah(item.balance),
        ]
    }

    fn screen(state: &AppState) -> &EntityScreen<Self> {
        &state.wallets
    }

    fn screen_mut(state: &mut AppState) -> &mut EntityScreen<Self> {
        &mut state.wallets
    }

    fn event(event: CrudEvent<Self>) -> AppEvent {
        AppEvent::Wallets(event)
    }
}

impl Entity for Categories {
    type Form = CategoryForm;

    const ROUTE: Route = Route::Categories;
    const NOUN: &'static str = "kategori";
    const TYPE_FILTER: bool = true;
    const COLUMNS: &'static [(&'static str, u16)] = &[("Nama", 24), ("Jenis", 14)];

    fn id(item: &Category) -> &Id {
        &item.id
    }

    fn row(item: &Category) -> Vec<String> {
        vec![item.name.clone(), item.kind.label().to_string()]
    }

    fn screen(state: &AppState) -> &EntityScreen<Self> {
        &state.categories
    }

    fn screen_mut(state: &mut AppState) -> &mut EntityScreen<Self> {
        &mut state.categories
    }

    fn event(event: CrudEvent<Self>) -> AppEvent {
        AppEvent::Categories(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_filter_cycles_through_all_states() {
        let mut screen = EntityScreen::<Transactions>::new(ListController::default());
        assert_eq!(screen.type_filter(), None);

        let next = screen.next_type_filter();
        screen.list.set_filter("type", next);
        assert_eq!(screen.type_filter(), Some(CategoryKind::Expense));

        let next = screen.next_type_filter();
        screen.list.set_filter("type", next);
        assert_eq!(screen.type_filter(), Some(CategoryKind::Income));

        let next = screen.next_type_filter();
        screen.list.set_filter("type", next);
        assert_eq!(screen.type_filter(), None);
    }

    #[test]
    fn reset_screen_ignores_answers_from_before() {
        let mut screen = EntityScreen::<Categories>::new(ListController::default());
        let listed = screen.list.begin_fetch();
        screen.modal.open_create();
        screen.modal.draft_mut().name = "Makan".to_string();
        let saving = screen.modal.begin_submit(Some(&Id::new("u-1"))).unwrap();

        screen.reset();

        let stale = Page {
            items: vec![Category {
                id: Id::new("c-1"),
                name: "Makan".to_string(),
                kind: CategoryKind::Expense,
            }],
            page: 1,
            limit: 10,
            total_items: 1,
            total_pages: 1,
        };
        assert!(!screen.list.apply(listed, Ok(stale)));
        assert!(screen.list.items().is_empty());

        let mut host = RefreshHost::default();
        let outcome = screen.modal.finish_submit(saving.ticket, Ok(()), &mut host);
        assert_eq!(outcome, dompet_client::modal::SubmitOutcome::Stale);
        assert!(!host.refetch);
        assert!(!screen.modal.is_open());
    }

    #[test]
    fn goal_progress_is_capped() {
        let goal = Goal {
            id: Id::new("g-1"),
            name: "Laptop".to_string(),
            target_amount: 10_000_000,
            current_amount: 12_000_000,
            deadline: None,
        };
        let row = Goals::row(&goal);
        assert_eq!(row[3], "100%");
        assert_eq!(row[4], "-");
    }

    #[test]
    fn budget_prefill_covers_current_month() {
        let mut form = BudgetForm::default();
        Budgets::prefill(&mut form, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(form.period_start, "2026-10-01");
        assert_eq!(form.period_end, "2026-10-31");
    }
}
