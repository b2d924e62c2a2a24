//! Form drafts for every create/edit modal and the auth screens.
//!
//! A draft holds raw field text exactly as typed. `validate` is the only way
//! to turn it into a request payload, so nothing reaches the network without
//! passing the local checks.
use api_types::{
    Id,
    auth::{LoginRequest, RegisterRequest},
    budget::{Budget, BudgetNew},
    category::{Category, CategoryKind, CategoryNew},
    goal::{Goal, GoalNew},
    profile::{Profile, ProfileNew},
    transaction::{Transaction, TransactionKind, TransactionNew},
    wallet::{Wallet, WalletNew},
};
use chrono::NaiveDate;

use crate::{
    error::ValidationError,
    format::{format_thousands, parse_amount, parse_signed_amount},
    modal::FormDraft,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const WALLET_KINDS: [&str; 3] = ["cash", "bank", "e_wallet"];

fn required<'a>(value: &'a str, label: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(label))
    } else {
        Ok(trimmed)
    }
}

fn required_id(value: &Option<Id>, label: &'static str) -> Result<Id, ValidationError> {
    value
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::Required(label))
}

/// Amount field: required, digits only once separators are stripped.
fn amount(value: &str, label: &'static str) -> Result<i64, ValidationError> {
    let raw = required(value, label)?;
    if raw
        .chars()
        .any(|ch| !ch.is_ascii_digit() && ch != crate::format::THOUSANDS_SEPARATOR)
    {
        return Err(ValidationError::NotNumeric(label));
    }
    parse_amount(raw).ok_or(ValidationError::NotNumeric(label))
}

/// Like [`amount`], but a leading `-` is allowed.
fn signed_amount(value: &str, label: &'static str) -> Result<i64, ValidationError> {
    let raw = required(value, label)?;
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    if unsigned
        .chars()
        .any(|ch| !ch.is_ascii_digit() && ch != crate::format::THOUSANDS_SEPARATOR)
    {
        return Err(ValidationError::NotNumeric(label));
    }
    parse_signed_amount(raw).ok_or(ValidationError::NotNumeric(label))
}

fn positive_amount(value: &str, label: &'static str) -> Result<i64, ValidationError> {
    let amount = amount(value, label)?;
    if amount <= 0 {
        return Err(ValidationError::NotPositive(label));
    }
    Ok(amount)
}

fn optional_amount(value: &str, label: &'static str) -> Result<Option<i64>, ValidationError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        amount(value, label).map(Some)
    }
}

fn date(value: &str, label: &'static str) -> Result<NaiveDate, ValidationError> {
    let raw = required(value, label)?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(label))
}

fn optional_date(value: &str, label: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        date(value, label).map(Some)
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `start <= end`, checked before any request is built.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::DateRange);
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    let email = required(value, "Email")?;
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    required(password, "Kata sandi")?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

fn amount_text(value: i64) -> String {
    let grouped = format_thousands(&value.unsigned_abs().to_string());
    if value < 0 { format!("-{grouped}") } else { grouped }
}

fn date_text(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub kind: TransactionKind,
    /// Display text, separators included.
    pub amount: String,
    pub category_id: Option<Id>,
    pub wallet_id: Option<Id>,
    pub date: String,
    pub description: String,
}

impl TransactionForm {
    /// Switching income/expense invalidates the picked category.
    pub fn set_kind(&mut self, kind: TransactionKind) {
        if self.kind != kind {
            self.kind = kind;
            self.category_id = None;
        }
    }
}

impl FormDraft for TransactionForm {
    type Seed = Transaction;
    type Payload = TransactionNew;

    fn from_seed(seed: &Transaction) -> Self {
        Self {
            kind: seed.kind,
            amount: amount_text(seed.amount),
            category_id: seed.category_id.clone(),
            wallet_id: seed.wallet_id.clone(),
            date: date_text(seed.date),
            description: seed.description.clone().unwrap_or_default(),
        }
    }

    fn validate(&self, user_id: &Id) -> Result<TransactionNew, ValidationError> {
        let amount = positive_amount(&self.amount, "Jumlah")?;
        let category_id = required_id(&self.category_id, "Kategori")?;
        let wallet_id = required_id(&self.wallet_id, "Dompet")?;
        let date = date(&self.date, "Tanggal")?;
        Ok(TransactionNew {
            user_id: user_id.clone(),
            kind: self.kind,
            amount,
            category_id,
            wallet_id,
            date,
            description: optional_text(&self.description),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetForm {
    pub category_id: Option<Id>,
    pub amount: String,
    pub period_start: String,
    pub period_end: String,
}

impl FormDraft for BudgetForm {
    type Seed = Budget;
    type Payload = BudgetNew;

    fn from_seed(seed: &Budget) -> Self {
        Self {
            category_id: seed.category_id.clone(),
            amount: amount_text(seed.amount),
            period_start: date_text(seed.period_start),
            period_end: date_text(seed.period_end),
        }
    }

    fn validate(&self, user_id: &Id) -> Result<BudgetNew, ValidationError> {
        let category_id = required_id(&self.category_id, "Kategori")?;
        let amount = positive_amount(&self.amount, "Jumlah anggaran")?;
        let period_start = date(&self.period_start, "Tanggal mulai")?;
        let period_end = date(&self.period_end, "Tanggal selesai")?;
        validate_date_range(period_start, period_end)?;
        Ok(BudgetNew {
            user_id: user_id.clone(),
            category_id,
            amount,
            period_start,
            period_end,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoalForm {
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub deadline: String,
}

impl FormDraft for GoalForm {
    type Seed = Goal;
    type Payload = GoalNew;

    fn from_seed(seed: &Goal) -> Self {
        Self {
            name: seed.name.clone(),
            target_amount: amount_text(seed.target_amount),
            current_amount: amount_text(seed.current_amount),
            deadline: seed.deadline.map(date_text).unwrap_or_default(),
        }
    }

    fn validate(&self, user_id: &Id) -> Result<GoalNew, ValidationError> {
        let name = required(&self.name, "Nama target")?.to_string();
        let target_amount = positive_amount(&self.target_amount, "Target dana")?;
        let current_amount = optional_amount(&self.current_amount, "Dana terkumpul")?.unwrap_or(0);
        let deadline = optional_date(&self.deadline, "Tenggat")?;
        Ok(GoalNew {
            user_id: user_id.clone(),
            name,
            target_amount,
            current_amount,
            deadline,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletForm {
    pub name: String,
    pub kind: String,
    pub balance: String,
}

impl Default for WalletForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: WALLET_KINDS[0].to_string(),
            balance: String::new(),
        }
    }
}

impl WalletForm {
    pub fn cycle_kind(&mut self) {
        let next = WALLET_KINDS
            .iter()
            .position(|kind| *kind == self.kind)
            .map(|i| (i + 1) % WALLET_KINDS.len())
            .unwrap_or(0);
        self.kind = WALLET_KINDS[next].to_string();
    }
}

impl FormDraft for WalletForm {
    type Seed = Wallet;
    type Payload = WalletNew;

    fn from_seed(seed: &Wallet) -> Self {
        Self {
            name: seed.name.clone(),
            kind: seed.kind.clone(),
            balance: amount_text(seed.balance),
        }
    }

    fn validate(&self, user_id: &Id) -> Result<WalletNew, ValidationError> {
        let name = required(&self.name, "Nama dompet")?.to_string();
        let kind = required(&self.kind, "Jenis dompet")?.to_string();
        let balance = if self.balance.trim().is_empty() {
            0
        } else {
            signed_amount(&self.balance, "Saldo awal")?
        };
        Ok(WalletNew {
            user_id: user_id.clone(),
            name,
            kind,
            balance,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub kind: CategoryKind,
}

impl FormDraft for CategoryForm {
    type Seed = Category;
    type Payload = CategoryNew;

    fn from_seed(seed: &Category) -> Self {
        Self {
            name: seed.name.clone(),
            kind: seed.kind,
        }
    }

    fn validate(&self, user_id: &Id) -> Result<CategoryNew, ValidationError> {
        Ok(CategoryNew {
            user_id: user_id.clone(),
            name: required(&self.name, "Nama kategori")?.to_string(),
            kind: self.kind,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub occupation: String,
    pub monthly_income: String,
}

impl FormDraft for ProfileForm {
    type Seed = Profile;
    type Payload = ProfileNew;

    fn from_seed(seed: &Profile) -> Self {
        Self {
            full_name: seed.full_name.clone(),
            occupation: seed.occupation.clone().unwrap_or_default(),
            monthly_income: seed.monthly_income.map(amount_text).unwrap_or_default(),
        }
    }

    fn validate(&self, user_id: &Id) -> Result<ProfileNew, ValidationError> {
        Ok(ProfileNew {
            user_id: user_id.clone(),
            full_name: required(&self.full_name, "Nama lengkap")?.to_string(),
            occupation: optional_text(&self.occupation),
            monthly_income: optional_amount(&self.monthly_income, "Pendapatan bulanan")?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Keep the token across restarts.
    pub remember: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = validate_email(&self.email)?;
        required(&self.password, "Kata sandi")?;
        Ok(LoginRequest {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let name = required(&self.name, "Nama")?.to_string();
        let email = validate_email(&self.email)?;
        validate_new_password(&self.password, &self.confirmation)?;
        Ok(RegisterRequest {
            name,
            email,
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Id {
        Id::new("u-1")
    }

    fn filled_transaction() -> TransactionForm {
        TransactionForm {
            kind: TransactionKind::Expense,
            amount: "1.000.000".to_string(),
            category_id: Some(Id::new("c-1")),
            wallet_id: Some(Id::new("w-1")),
            date: "2026-10-19".to_string(),
            description: "  Belanja bulanan ".to_string(),
        }
    }

    // Amounts go on the wire as JSON integers, not digit strings.
    #[test]
    fn transaction_amount_is_sent_without_separators() {
        let payload = filled_transaction().validate(&user()).unwrap();
        assert_eq!(payload.amount, 1_000_000);
        assert_eq!(payload.description.as_deref(), Some("Belanja bulanan"));
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["amount"], serde_json::json!(1_000_000));
        assert_eq!(body["type"], "expense");
    }

    #[test]
    fn transaction_requires_amount_category_and_wallet() {
        let mut form = filled_transaction();
        form.amount.clear();
        assert_eq!(form.validate(&user()), Err(ValidationError::Required("Jumlah")));

        let mut form = filled_transaction();
        form.amount = "12a".to_string();
        assert_eq!(form.validate(&user()), Err(ValidationError::NotNumeric("Jumlah")));

        let mut form = filled_transaction();
        form.amount = "0".to_string();
        assert_eq!(form.validate(&user()), Err(ValidationError::NotPositive("Jumlah")));

        let mut form = filled_transaction();
        form.category_id = None;
        assert_eq!(form.validate(&user()), Err(ValidationError::Required("Kategori")));

        let mut form = filled_transaction();
        form.wallet_id = Some(Id::new(""));
        assert_eq!(form.validate(&user()), Err(ValidationError::Required("Dompet")));
    }

    #[test]
    fn switching_kind_clears_category() {
        let mut form = filled_transaction();
        form.set_kind(TransactionKind::Income);
        assert!(form.category_id.is_none());
    }

    #[test]
    fn budget_rejects_inverted_period() {
        let form = BudgetForm {
            category_id: Some(Id::new("c-1")),
            amount: "500.000".to_string(),
            period_start: "2026-10-31".to_string(),
            period_end: "2026-10-01".to_string(),
        };
        assert_eq!(form.validate(&user()), Err(ValidationError::DateRange));

        let same_day = BudgetForm {
            period_end: "2026-10-31".to_string(),
            ..form
        };
        let payload = same_day.validate(&user()).unwrap();
        assert_eq!(payload.amount, 500_000);
    }

    #[test]
    fn goal_defaults_current_amount_to_zero() {
        let form = GoalForm {
            name: "Dana darurat".to_string(),
            target_amount: "10.000.000".to_string(),
            current_amount: String::new(),
            deadline: "tomorrow".to_string(),
        };
        assert_eq!(
            form.validate(&user()),
            Err(ValidationError::InvalidDate("Tenggat"))
        );

        let form = GoalForm {
            deadline: String::new(),
            ..form
        };
        let payload = form.validate(&user()).unwrap();
        assert_eq!(payload.current_amount, 0);
        assert_eq!(payload.deadline, None);
    }

    #[test]
    fn negative_wallet_balance_survives_an_edit() {
        let seed = Wallet {
            id: Id::new("w-1"),
            name: "Kartu kredit".to_string(),
            kind: "bank".to_string(),
            balance: -25_000,
        };
        let form = WalletForm::from_seed(&seed);
        assert_eq!(form.balance, "-25.000");
        assert_eq!(form.validate(&user()).unwrap().balance, -25_000);

        let mut form = form;
        form.balance = "-2a".to_string();
        assert_eq!(
            form.validate(&user()),
            Err(ValidationError::NotNumeric("Saldo awal"))
        );
        form.balance.clear();
        assert_eq!(form.validate(&user()).unwrap().balance, 0);
    }

    #[test]
    fn wallet_kind_cycles() {
        let mut form = WalletForm::default();
        assert_eq!(form.kind, "cash");
        form.cycle_kind();
        form.cycle_kind();
        assert_eq!(form.kind, "e_wallet");
        form.cycle_kind();
        assert_eq!(form.kind, "cash");
    }

    #[test]
    fn login_and_register_validation() {
        let login = LoginForm {
            email: "rina@contoh.id".to_string(),
            password: String::new(),
            remember: true,
        };
        assert_eq!(login.validate().unwrap_err(), ValidationError::Required("Kata sandi"));

        let register = RegisterForm {
            name: "Rina".to_string(),
            email: "rina@contoh".to_string(),
            password: "rahasia123".to_string(),
            confirmation: "rahasia123".to_string(),
        };
        assert_eq!(register.validate().unwrap_err(), ValidationError::InvalidEmail);

        let register = RegisterForm {
            email: "rina@contoh.id".to_string(),
            confirmation: "rahasia124".to_string(),
            ..register
        };
        assert_eq!(register.validate().unwrap_err(), ValidationError::PasswordMismatch);

        let short = RegisterForm {
            password: "pendek".to_string(),
            confirmation: "pendek".to_string(),
            ..register
        };
        assert_eq!(
            short.validate().unwrap_err(),
            ValidationError::PasswordTooShort(MIN_PASSWORD_LEN)
        );
    }
}
