//! Create/edit modal lifecycle shared by every entity screen.
//!
//! open → (preload reference data) → validate → submit → `on_success` →
//! `on_close`. Validation runs before any request is built, and at most one
//! submit per modal is in flight at a time.
use std::{future::Future, marker::PhantomData};

use api_types::{Id, category::Category, transaction::TransactionKind, wallet::Wallet};

use crate::{
    api::{ApiClient, Resource},
    error::{ClientError, Result, ValidationError},
};

/// Writable fields of an entity while its modal is open.
pub trait FormDraft: Default + Clone {
    /// Existing entity used to prefill an edit modal.
    type Seed;
    type Payload;

    fn from_seed(seed: &Self::Seed) -> Self;
    fn validate(&self, user_id: &Id) -> std::result::Result<Self::Payload, ValidationError>;
}

/// Backend calls a modal submits through.
pub trait Submitter<P> {
    fn create(&self, payload: &P) -> impl Future<Output = Result<()>> + Send;
    fn update(&self, id: &Id, payload: &P) -> impl Future<Output = Result<()>> + Send;
}

/// [`Submitter`] for one REST collection.
pub struct ResourceSubmitter<'a, R> {
    api: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> ResourceSubmitter<'a, R> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }
}

impl<R> Submitter<R::Payload> for ResourceSubmitter<'_, R>
where
    R: Resource + Sync,
{
    async fn create(&self, payload: &R::Payload) -> Result<()> {
        self.api.create::<R>(payload).await
    }

    async fn update(&self, id: &Id, payload: &R::Payload) -> Result<()> {
        self.api.update::<R>(id, payload).await
    }
}

/// The parent screen of a modal.
pub trait ModalHost {
    /// Typically schedules a refetch of the parent list.
    fn on_success(&mut self);
    fn on_close(&mut self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit(Id),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Invalid(ValidationError),
    Failed(String),
    /// A submit is already in flight.
    Busy,
    Closed,
    /// The answer belongs to a submit the modal no longer waits for.
    Stale,
}

/// Identifies one submit of one modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitTicket(u64);

/// A validated payload waiting to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSubmit<P> {
    pub mode: ModalMode,
    pub payload: P,
    pub ticket: SubmitTicket,
}

impl<P> PendingSubmit<P> {
    pub async fn send<S: Submitter<P>>(&self, submitter: &S) -> Result<()> {
        match &self.mode {
            ModalMode::Create => submitter.create(&self.payload).await,
            ModalMode::Edit(id) => submitter.update(id, &self.payload).await,
        }
    }
}

#[derive(Debug)]
pub struct ModalController<F> {
    open: bool,
    mode: ModalMode,
    draft: F,
    options: ReferenceOptions,
    submitting: bool,
    error: Option<String>,
    generation: u64,
}

impl<F: FormDraft> Default for ModalController<F> {
    fn default() -> Self {
        Self {
            open: false,
            mode: ModalMode::Create,
            draft: F::default(),
            options: ReferenceOptions::default(),
            submitting: false,
            error: None,
            generation: 0,
        }
    }
}

impl<F: FormDraft> ModalController<F> {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> &ModalMode {
        &self.mode
    }

    pub fn draft(&self) -> &F {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut F {
        &mut self.draft
    }

    pub fn options(&self) -> &ReferenceOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ReferenceOptions) {
        self.options = options;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ignored while a submit is in flight.
    pub fn open_create(&mut self) {
        self.start(ModalMode::Create, F::default());
    }

    /// Ignored while a submit is in flight.
    pub fn open_edit(&mut self, id: Id, seed: &F::Seed) {
        self.start(ModalMode::Edit(id), F::from_seed(seed));
    }

    fn start(&mut self, mode: ModalMode, draft: F) {
        if self.submitting {
            return;
        }
        self.open = true;
        self.mode = mode;
        self.draft = draft;
        self.options = ReferenceOptions::default();
        self.submitting = false;
        self.error = None;
    }

    /// Loads dropdown options for the open modal.
    pub async fn preload<S: ReferenceSource>(&mut self, source: &S) {
        self.options = ReferenceOptions::load(source).await;
    }

    /// Cancel: the draft is discarded and `on_success` is never called.
    ///
    /// Does nothing while a submit is in flight; the modal stays open until
    /// the answer arrives.
    pub fn close(&mut self, host: &mut impl ModalHost) {
        if !self.open || self.submitting {
            return;
        }
        self.open = false;
        self.draft = F::default();
        self.error = None;
        host.on_close();
    }

    /// Closes without notifying anyone and forgets any in-flight submit.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Validates the draft and marks a submit as in flight.
    ///
    /// Nothing is marked when validation fails, so the caller must not send
    /// anything unless this returns `Ok`.
    pub fn begin_submit(
        &mut self,
        user_id: Option<&Id>,
    ) -> std::result::Result<PendingSubmit<F::Payload>, SubmitOutcome> {
        if !self.open {
            return Err(SubmitOutcome::Closed);
        }
        if self.submitting {
            return Err(SubmitOutcome::Busy);
        }

        let validated = user_id
            .ok_or(ValidationError::MissingUser)
            .and_then(|user_id| self.draft.validate(user_id));
        match validated {
            Ok(payload) => {
                self.generation += 1;
                self.submitting = true;
                self.error = None;
                Ok(PendingSubmit {
                    mode: self.mode.clone(),
                    payload,
                    ticket: SubmitTicket(self.generation),
                })
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(SubmitOutcome::Invalid(err))
            }
        }
    }

    /// Records the backend's answer for the in-flight submit.
    ///
    /// An answer for any other ticket changes nothing and yields `Stale`.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: std::result::Result<(), ClientError>,
        host: &mut impl ModalHost,
    ) -> SubmitOutcome {
        if !self.submitting || ticket != SubmitTicket(self.generation) {
            tracing::debug!(?ticket, "discarding answer for a superseded submit");
            return SubmitOutcome::Stale;
        }
        self.submitting = false;
        match result {
            Ok(()) => {
                host.on_success();
                host.on_close();
                if self.mode == ModalMode::Create {
                    self.draft = F::default();
                }
                self.open = false;
                self.error = None;
                SubmitOutcome::Saved
            }
            Err(err) => {
                tracing::debug!("modal submit failed: {err}");
                let message = err.user_message();
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit<S: Submitter<F::Payload>>(
        &mut self,
        submitter: &S,
        user_id: Option<&Id>,
        host: &mut impl ModalHost,
    ) -> SubmitOutcome {
        let pending = match self.begin_submit(user_id) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = pending.send(submitter).await;
        self.finish_submit(pending.ticket, result, host)
    }
}

/// Where dropdown options come from.
pub trait ReferenceSource {
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send;
    fn wallets(&self) -> impl Future<Output = Result<Vec<Wallet>>> + Send;
}

impl ReferenceSource for ApiClient {
    async fn categories(&self) -> Result<Vec<Category>> {
        ApiClient::categories(self).await
    }

    async fn wallets(&self) -> Result<Vec<Wallet>> {
        ApiClient::wallets(self).await
    }
}

/// Dropdown options, fetched fresh every time a modal opens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceOptions {
    pub categories: Vec<Category>,
    pub wallets: Vec<Wallet>,
    pub category_error: Option<String>,
    pub wallet_error: Option<String>,
}

impl ReferenceOptions {
    /// Both fetches run concurrently; either may fail without affecting the
    /// other.
    pub async fn load<S: ReferenceSource>(source: &S) -> Self {
        let (categories, wallets) = tokio::join!(source.categories(), source.wallets());

        let mut options = Self::default();
        match categories {
            Ok(categories) => options.categories = categories,
            Err(err) => {
                tracing::warn!("failed to load categories: {err}");
                options.category_error = Some(err.user_message());
            }
        }
        match wallets {
            Ok(wallets) => options.wallets = wallets,
            Err(err) => {
                tracing::warn!("failed to load wallets: {err}");
                options.wallet_error = Some(err.user_message());
            }
        }
        options
    }

    pub fn categories_of(&self, kind: TransactionKind) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(move |category| category.kind == kind)
    }

    pub fn category_name(&self, id: &Id) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| &category.id == id)
            .map(|category| category.name.as_str())
    }

    pub fn wallet_name(&self, id: &Id) -> Option<&str> {
        self.wallets
            .iter()
            .find(|wallet| &wallet.id == id)
            .map(|wallet| wallet.name.as_str())
    }
}

/// Explicit confirmation step for destructive actions.
#[derive(Debug)]
pub struct Confirmation<T> {
    pending: Option<T>,
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Confirmation<T> {
    pub fn request(&mut self, target: T) {
        self.pending = Some(target);
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Hands back the target; only then may the delete be sent.
    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use api_types::category::CategoryKind;
    use chrono::NaiveDate;

    use super::*;
    use crate::forms::{BudgetForm, TransactionForm};

    #[derive(Default)]
    struct Host {
        successes: usize,
        closes: usize,
    }

    impl ModalHost for Host {
        fn on_success(&mut self) {
            self.successes += 1;
        }

        fn on_close(&mut self) {
            self.closes += 1;
        }
    }

    struct Recorder<P> {
        created: Mutex<Vec<P>>,
        updated: Mutex<Vec<(Id, P)>>,
        fail_with: Option<String>,
    }

    impl<P> Default for Recorder<P> {
        fn default() -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                updated: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }
    }

    impl<P: Clone + Send + Sync> Submitter<P> for Recorder<P> {
        async fn create(&self, payload: &P) -> Result<()> {
            if let Some(message) = &self.fail_with {
                return Err(ClientError::Validation(message.clone()));
            }
            self.created.lock().unwrap().push(payload.clone());
            Ok(())
        }

        async fn update(&self, id: &Id, payload: &P) -> Result<()> {
            self.updated
                .lock()
                .unwrap()
                .push((id.clone(), payload.clone()));
            Ok(())
        }
    }

    fn seed() -> api_types::transaction::Transaction {
        api_types::transaction::Transaction {
            id: Id::new("t-9"),
            kind: TransactionKind::Expense,
            amount: 50_000,
            category_id: Some(Id::new("Food")),
            wallet_id: Some(Id::new("w-1")),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            description: None,
            category_name: Some("Food".to_string()),
            wallet_name: None,
        }
    }

    fn user() -> Id {
        Id::new("u-1")
    }

    #[test]
    fn edit_modal_is_seeded_and_cancel_discards() {
        let mut modal = ModalController::<TransactionForm>::default();
        let mut host = Host::default();

        modal.open_edit(Id::new("t-9"), &seed());
        assert_eq!(modal.draft().amount, "50.000");
        assert_eq!(crate::format::parse_amount(&modal.draft().amount), Some(50_000));
        assert_eq!(modal.draft().category_id, Some(Id::new("Food")));

        modal.close(&mut host);
        assert!(!modal.is_open());
        assert_eq!(modal.draft(), &TransactionForm::default());
        assert_eq!(host.successes, 0);
        assert_eq!(host.closes, 1);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_submitter() {
        let mut modal = ModalController::<BudgetForm>::default();
        let submitter = Recorder::default();
        let mut host = Host::default();

        modal.open_create();
        *modal.draft_mut() = BudgetForm {
            category_id: Some(Id::new("c-1")),
            amount: "100.000".to_string(),
            period_start: "2026-11-01".to_string(),
            period_end: "2026-10-01".to_string(),
        };

        let outcome = modal.submit(&submitter, Some(&user()), &mut host).await;
        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::DateRange));
        assert!(submitter.created.lock().unwrap().is_empty());
        assert!(modal.is_open());
        assert!(!modal.is_submitting());

        modal.draft_mut().period_end = "2026-11-30".to_string();
        let outcome = modal.submit(&submitter, Some(&user()), &mut host).await;
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(submitter.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn successful_create_notifies_host_and_resets_draft() {
        let mut modal = ModalController::<TransactionForm>::default();
        let submitter = Recorder::default();
        let mut host = Host::default();

        modal.open_create();
        *modal.draft_mut() = TransactionForm {
            kind: TransactionKind::Expense,
            amount: "1.000.000".to_string(),
            category_id: Some(Id::new("c-1")),
            wallet_id: Some(Id::new("w-1")),
            date: "2026-10-19".to_string(),
            description: String::new(),
        };

        let outcome = modal.submit(&submitter, Some(&user()), &mut host).await;
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(submitter.created.lock().unwrap()[0].amount, 1_000_000);
        assert_eq!((host.successes, host.closes), (1, 1));
        assert!(!modal.is_open());
        assert_eq!(modal.draft(), &TransactionForm::default());
    }

    #[tokio::test]
    async fn edit_submits_an_update_for_the_seeded_id() {
        let mut modal = ModalController::<TransactionForm>::default();
        let submitter = Recorder::default();
        let mut host = Host::default();

        modal.open_edit(Id::new("t-9"), &seed());
        let outcome = modal.submit(&submitter, Some(&user()), &mut host).await;
        assert_eq!(outcome, SubmitOutcome::Saved);
        let updated = submitter.updated.lock().unwrap();
        assert_eq!(updated[0].0, Id::new("t-9"));
        assert_eq!(updated[0].1.amount, 50_000);
    }

    #[tokio::test]
    async fn failed_submit_keeps_modal_open_with_draft() {
        let mut modal = ModalController::<TransactionForm>::default();
        let submitter = Recorder {
            fail_with: Some("Saldo tidak cukup".to_string()),
            ..Recorder::default()
        };
        let mut host = Host::default();

        modal.open_create();
        *modal.draft_mut() = TransactionForm::from_seed(&seed());
        let draft = modal.draft().clone();

        let outcome = modal.submit(&submitter, Some(&user()), &mut host).await;
        assert_eq!(outcome, SubmitOutcome::Failed("Saldo tidak cukup".to_string()));
        assert!(modal.is_open());
        assert_eq!(modal.draft(), &draft);
        assert_eq!(modal.error(), Some("Saldo tidak cukup"));
        assert_eq!(host.successes, 0);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut modal = ModalController::<TransactionForm>::default();
        let mut host = Host::default();
        modal.open_edit(Id::new("t-9"), &seed());

        let pending = modal.begin_submit(Some(&user())).unwrap();
        assert_eq!(pending.mode, ModalMode::Edit(Id::new("t-9")));
        assert_eq!(modal.begin_submit(Some(&user())), Err(SubmitOutcome::Busy));

        modal.finish_submit(pending.ticket, Ok(()), &mut host);
        assert!(!modal.is_submitting());
    }

    #[test]
    fn cancel_is_ignored_while_a_submit_is_in_flight() {
        let mut modal = ModalController::<TransactionForm>::default();
        let mut host = Host::default();
        modal.open_edit(Id::new("t-9"), &seed());

        let pending = modal.begin_submit(Some(&user())).unwrap();
        modal.close(&mut host);
        assert!(modal.is_open());
        assert!(modal.is_submitting());
        assert_eq!(host.closes, 0);

        modal.open_create();
        assert_eq!(modal.mode(), &ModalMode::Edit(Id::new("t-9")));
        assert_eq!(modal.begin_submit(Some(&user())), Err(SubmitOutcome::Busy));

        let outcome = modal.finish_submit(pending.ticket, Ok(()), &mut host);
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!((host.successes, host.closes), (1, 1));
    }

    #[test]
    fn answers_from_before_a_reset_are_stale() {
        let mut modal = ModalController::<TransactionForm>::default();
        let mut host = Host::default();
        modal.open_edit(Id::new("t-9"), &seed());
        let before = modal.begin_submit(Some(&user())).unwrap();

        modal.reset();
        assert!(!modal.is_open());
        assert!(!modal.is_submitting());
        assert_eq!(
            modal.finish_submit(before.ticket, Ok(()), &mut host),
            SubmitOutcome::Stale
        );

        modal.open_edit(Id::new("t-9"), &seed());
        let after = modal.begin_submit(Some(&user())).unwrap();
        assert_eq!(
            modal.finish_submit(before.ticket, Ok(()), &mut host),
            SubmitOutcome::Stale
        );
        assert!(modal.is_submitting());
        assert_eq!(host.successes, 0);

        let outcome = modal.finish_submit(after.ticket, Ok(()), &mut host);
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(host.successes, 1);
    }

    #[test]
    fn missing_user_is_a_validation_error() {
        let mut modal = ModalController::<TransactionForm>::default();
        modal.open_edit(Id::new("t-9"), &seed());
        assert_eq!(
            modal.begin_submit(None),
            Err(SubmitOutcome::Invalid(ValidationError::MissingUser))
        );
    }

    struct PartialSource;

    impl ReferenceSource for PartialSource {
        async fn categories(&self) -> Result<Vec<Category>> {
            Err(ClientError::Timeout)
        }

        async fn wallets(&self) -> Result<Vec<Wallet>> {
            Ok(vec![Wallet {
                id: Id::new("w-1"),
                name: "Tunai".to_string(),
                kind: "cash".to_string(),
                balance: 0,
            }])
        }
    }

    #[tokio::test]
    async fn failed_category_fetch_does_not_block_wallets() {
        let mut modal = ModalController::<TransactionForm>::default();
        modal.open_create();
        modal.preload(&PartialSource).await;

        let options = modal.options();
        assert!(options.categories.is_empty());
        assert!(options.category_error.is_some());
        assert_eq!(options.wallets.len(), 1);
        assert_eq!(options.wallet_name(&Id::new("w-1")), Some("Tunai"));
    }

    #[test]
    fn categories_are_filtered_by_type() {
        let options = ReferenceOptions {
            categories: vec![
                Category {
                    id: Id::new("1"),
                    name: "Gaji".to_string(),
                    kind: CategoryKind::Income,
                },
                Category {
                    id: Id::new("2"),
                    name: "Makan".to_string(),
                    kind: CategoryKind::Expense,
                },
            ],
            ..ReferenceOptions::default()
        };
        let names: Vec<_> = options
            .categories_of(TransactionKind::Expense)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Makan"]);
    }

    #[test]
    fn confirmation_hands_back_target_once() {
        let mut confirm = Confirmation::default();
        confirm.request(Id::new("b-1"));
        assert_eq!(confirm.pending(), Some(&Id::new("b-1")));
        assert_eq!(confirm.confirm(), Some(Id::new("b-1")));
        assert_eq!(confirm.confirm(), None);

        confirm.request(Id::new("b-2"));
        confirm.cancel();
        assert!(confirm.pending().is_none());
    }
}
