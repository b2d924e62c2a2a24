use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backend identifier.
///
/// The REST backend is not consistent about ids: some endpoints return them as
/// JSON numbers, others as strings. Both are accepted and carried as a string;
/// ids are always serialized back as strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(value) => Id(value),
            Raw::Int(value) => Id(value.to_string()),
            Raw::Unsigned(value) => Id(value.to_string()),
        })
    }
}

/// Lenient decoders for fields the backend renders in more than one shape.
pub mod lenient {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Int(i64),
        Float(f64),
        Text(String),
    }

    fn amount_from_raw<E: Error>(raw: RawAmount) -> Result<i64, E> {
        match raw {
            RawAmount::Int(value) => Ok(value),
            RawAmount::Float(value) => Ok(value.trunc() as i64),
            RawAmount::Text(value) => {
                // Decimal columns come back as "150000.00".
                let whole = value.trim().split('.').next().unwrap_or_default();
                whole
                    .parse::<i64>()
                    .map_err(|_| E::custom(format!("invalid amount: {value}")))
            }
        }
    }

    /// Whole-Rupiah amount sent as an integer, a float or a decimal string.
    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        amount_from_raw(RawAmount::deserialize(deserializer)?)
    }

    pub fn amount_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<RawAmount>::deserialize(deserializer)? {
            Some(raw) => amount_from_raw(raw).map(Some),
            None => Ok(None),
        }
    }

    fn date_from_str<E: Error>(value: &str) -> Result<NaiveDate, E> {
        // Accepts both `2026-10-19` and `2026-10-19T00:00:00.000Z`.
        let head = value.get(..10).unwrap_or(value);
        NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .map_err(|_| E::custom(format!("invalid date: {value}")))
    }

    pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        date_from_str(&raw)
    }

    pub fn date_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.is_empty() => date_from_str(&raw).map(Some),
            _ => Ok(None),
        }
    }
}

pub mod envelope {
    use super::*;

    /// Success envelope: every endpoint wraps its payload in `data`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Envelope<T> {
        pub data: T,
    }

    /// Error envelope returned on non-2xx responses.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub message: Option<String>,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageMeta {
        #[serde(default)]
        pub total_items: u64,
        #[serde(default)]
        pub total_pages: u32,
        #[serde(default)]
        pub page: Option<u32>,
        #[serde(default)]
        pub limit: Option<u32>,
    }

    /// List endpoints return either a bare array or a paginated object.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum ListPayload<T> {
        Paged { data: Vec<T>, meta: PageMeta },
        Bare(Vec<T>),
    }

    impl<T> ListPayload<T> {
        pub fn into_parts(self) -> (Vec<T>, Option<PageMeta>) {
            match self {
                Self::Paged { data, meta } => (data, Some(meta)),
                Self::Bare(data) => (data, None),
            }
        }
    }

    /// List response body. `meta` may sit next to `data` (`{data: [..],
    /// meta}`) or inside it (`{data: {data: [..], meta}}`); the inner one wins.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ListEnvelope<T> {
        pub data: ListPayload<T>,
        #[serde(default)]
        pub meta: Option<PageMeta>,
    }

    impl<T> ListEnvelope<T> {
        pub fn into_parts(self) -> (Vec<T>, Option<PageMeta>) {
            let (items, inner) = self.data.into_parts();
            (items, inner.or(self.meta))
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenResponse {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForgotPasswordRequest {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VerifyOtpRequest {
        pub email: String,
        pub otp: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetTokenResponse {
        pub reset_token: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ResetPasswordRequest {
        pub email: String,
        pub reset_token: String,
        pub password: String,
    }

    /// Payload fields the client reads out of the session token.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Claims {
        pub user_id: Id,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub name: Option<String>,
        /// Expiry (unix seconds). Never checked client-side.
        #[serde(default)]
        pub exp: Option<i64>,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Wallet {
        pub id: Id,
        pub name: String,
        #[serde(rename = "type", default)]
        pub kind: String,
        #[serde(deserialize_with = "lenient::amount", default)]
        pub balance: i64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WalletNew {
        pub user_id: Id,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub balance: i64,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Income,
        #[default]
        Expense,
    }

    impl CategoryKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Income => "Pemasukan",
                Self::Expense => "Pengeluaran",
            }
        }

        pub fn toggled(self) -> Self {
            match self {
                Self::Income => Self::Expense,
                Self::Expense => Self::Income,
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: Id,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub user_id: Id,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
    }
}

pub mod transaction {
    use super::*;

    /// Income and expense share the category discriminator.
    pub use super::category::CategoryKind as TransactionKind;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: Id,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        #[serde(deserialize_with = "lenient::amount")]
        pub amount: i64,
        #[serde(default)]
        pub category_id: Option<Id>,
        #[serde(default)]
        pub wallet_id: Option<Id>,
        #[serde(deserialize_with = "lenient::date")]
        pub date: NaiveDate,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub category_name: Option<String>,
        #[serde(default)]
        pub wallet_name: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub user_id: Id,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount: i64,
        pub category_id: Id,
        pub wallet_id: Id,
        pub date: NaiveDate,
        pub description: Option<String>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Budget {
        pub id: Id,
        #[serde(default)]
        pub category_id: Option<Id>,
        #[serde(default)]
        pub category_name: Option<String>,
        #[serde(deserialize_with = "lenient::amount")]
        pub amount: i64,
        #[serde(deserialize_with = "lenient::amount_opt", default)]
        pub spent: Option<i64>,
        #[serde(deserialize_with = "lenient::date")]
        pub period_start: NaiveDate,
        #[serde(deserialize_with = "lenient::date")]
        pub period_end: NaiveDate,
        #[serde(default)]
        pub status: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub user_id: Id,
        pub category_id: Id,
        pub amount: i64,
        pub period_start: NaiveDate,
        pub period_end: NaiveDate,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Goal {
        pub id: Id,
        pub name: String,
        #[serde(deserialize_with = "lenient::amount")]
        pub target_amount: i64,
        #[serde(deserialize_with = "lenient::amount", default)]
        pub current_amount: i64,
        #[serde(deserialize_with = "lenient::date_opt", default)]
        pub deadline: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GoalNew {
        pub user_id: Id,
        pub name: String,
        pub target_amount: i64,
        pub current_amount: i64,
        pub deadline: Option<NaiveDate>,
    }
}

pub mod profile {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Profile {
        #[serde(default)]
        pub id: Option<Id>,
        pub user_id: Id,
        pub full_name: String,
        #[serde(default)]
        pub occupation: Option<String>,
        #[serde(deserialize_with = "lenient::amount_opt", default)]
        pub monthly_income: Option<i64>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProfileNew {
        pub user_id: Id,
        pub full_name: String,
        pub occupation: Option<String>,
        pub monthly_income: Option<i64>,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        #[serde(rename = "type", default)]
        pub kind: Option<super::category::CategoryKind>,
        #[serde(deserialize_with = "lenient::amount")]
        pub total: i64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportSummary {
        #[serde(deserialize_with = "lenient::amount", default)]
        pub total_income: i64,
        #[serde(deserialize_with = "lenient::amount", default)]
        pub total_expense: i64,
        #[serde(deserialize_with = "lenient::amount", default)]
        pub balance: i64,
        #[serde(default)]
        pub by_category: Vec<CategoryTotal>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub user_id: Id,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DashboardSummary {
        #[serde(deserialize_with = "lenient::amount", default)]
        pub total_balance: i64,
        #[serde(deserialize_with = "lenient::amount", default)]
        pub month_income: i64,
        #[serde(deserialize_with = "lenient::amount", default)]
        pub month_expense: i64,
        #[serde(default)]
        pub recent_transactions: Vec<super::transaction::Transaction>,
    }
}

pub mod assistant {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatRequest {
        pub user_id: Id,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatReply {
        pub reply: String,
    }
}
