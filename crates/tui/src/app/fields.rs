//! Keyboard editing of form drafts: which fields a form shows, which of
//! them take text and how choice fields cycle through their options.
use api_types::{Id, category::CategoryKind};
use dompet_client::{
    ReferenceOptions,
    format::{format_amount_input, format_signed_amount_input},
    forms::{BudgetForm, CategoryForm, GoalForm, ProfileForm, TransactionForm, WalletForm},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Digits only, re-grouped with thousands separators on every keystroke.
    Amount,
    /// [`FieldKind::Amount`] that may start with `-`.
    SignedAmount,
    Date,
    /// Cycled with ←/→, never typed into.
    Choice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl FieldView {
    fn new(label: &'static str, value: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label,
            value: value.into(),
            kind,
        }
    }
}

pub trait FormFields {
    fn fields(&self, options: &ReferenceOptions) -> Vec<FieldView>;
    fn text_mut(&mut self, index: usize) -> Option<&mut String>;
    fn cycle(&mut self, _index: usize, _options: &ReferenceOptions, _forward: bool) {}
}

pub fn field_count<F: FormFields>(form: &F) -> usize {
    form.fields(&ReferenceOptions::default()).len()
}

fn kind_of<F: FormFields>(form: &F, index: usize) -> Option<FieldKind> {
    form.fields(&ReferenceOptions::default())
        .get(index)
        .map(|field| field.kind)
}

pub fn insert_char<F: FormFields>(form: &mut F, index: usize, ch: char) {
    let Some(kind) = kind_of(form, index) else {
        return;
    };
    let Some(value) = form.text_mut(index) else {
        return;
    };
    match kind {
        FieldKind::Amount => {
            value.push(ch);
            *value = format_amount_input(value);
        }
        FieldKind::SignedAmount => {
            value.push(ch);
            *value = format_signed_amount_input(value);
        }
        FieldKind::Date => {
            if ch.is_ascii_digit() || ch == '-' {
                value.push(ch);
            }
        }
        FieldKind::Text => value.push(ch),
        FieldKind::Choice => {}
    }
}

pub fn delete_char<F: FormFields>(form: &mut F, index: usize) {
    let kind = kind_of(form, index);
    if let Some(value) = form.text_mut(index) {
        value.pop();
        match kind {
            Some(FieldKind::Amount) => *value = format_amount_input(value),
            Some(FieldKind::SignedAmount) => *value = format_signed_amount_input(value),
            _ => {}
        }
    }
}

fn cycle_id<'a>(
    current: &Option<Id>,
    ids: impl Iterator<Item = &'a Id>,
    forward: bool,
) -> Option<Id> {
    let ids: Vec<&Id> = ids.collect();
    if ids.is_empty() {
        return None;
    }
    let position = current
        .as_ref()
        .and_then(|current| ids.iter().position(|id| *id == current));
    let next = match (position, forward) {
        (None, true) => 0,
        (None, false) => ids.len() - 1,
        (Some(i), true) => (i + 1) % ids.len(),
        (Some(i), false) => (i + ids.len() - 1) % ids.len(),
    };
    Some(ids[next].clone())
}

fn picked(name: Option<&str>) -> String {
    name.unwrap_or("-").to_string()
}

pub fn wallet_kind_label(kind: &str) -> &str {
    match kind {
        "cash" => "Tunai",
        "bank" => "Bank",
        "e_wallet" => "E-Wallet",
        other => other,
    }
}

impl FormFields for TransactionForm {
    fn fields(&self, options: &ReferenceOptions) -> Vec<FieldView> {
        let category = self
            .category_id
            .as_ref()
            .and_then(|id| options.category_name(id));
        let wallet = self.wallet_id.as_ref().and_then(|id| options.wallet_name(id));
        vec![
            FieldView::new("Jenis", self.kind.label(), FieldKind::Choice),
            FieldView::new("Jumlah", self.amount.as_str(), FieldKind::Amount),
            FieldView::new("Kategori", picked(category), FieldKind::Choice),
            FieldView::new("Dompet", picked(wallet), FieldKind::Choice),
            FieldView::new("Tanggal", self.date.as_str(), FieldKind::Date),
            FieldView::new("Catatan", self.description.as_str(), FieldKind::Text),
        ]
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            1 => Some(&mut self.amount),
            4 => Some(&mut self.date),
            5 => Some(&mut self.description),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize, options: &ReferenceOptions, forward: bool) {
        match index {
            0 => self.set_kind(self.kind.toggled()),
            2 => {
                let ids = options.categories_of(self.kind).map(|c| &c.id);
                self.category_id = cycle_id(&self.category_id, ids, forward);
            }
            3 => {
                let ids = options.wallets.iter().map(|w| &w.id);
                self.wallet_id = cycle_id(&self.wallet_id, ids, forward);
            }
            _ => {}
        }
    }
}

impl FormFields for BudgetForm {
    fn fields(&self, options: &ReferenceOptions) -> Vec<FieldView> {
        let category = self
            .category_id
            .as_ref()
            .and_then(|id| options.category_name(id));
        vec![
            FieldView::new("Kategori", picked(category), FieldKind::Choice),
            FieldView::new("Jumlah anggaran", self.amount.as_str(), FieldKind::Amount),
            FieldView::new("Tanggal mulai", self.period_start.as_str(), FieldKind::Date),
            FieldView::new("Tanggal selesai", self.period_end.as_str(), FieldKind::Date),
        ]
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            1 => Some(&mut self.amount),
            2 => Some(&mut self.period_start),
            3 => Some(&mut self.period_end),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize, options: &ReferenceOptions, forward: bool) {
        if index == 0 {
            let ids = options
                .categories_of(CategoryKind::Expense)
                .map(|c| &c.id);
            self.category_id = cycle_id(&self.category_id, ids, forward);
        }
    }
}

impl FormFields for GoalForm {
    fn fields(&self, _options: &ReferenceOptions) -> Vec<FieldView> {
        vec![
            FieldView::new("Nama target", self.name.as_str(), FieldKind::Text),
            FieldView::new("Target dana", self.target_amount.as_str(), FieldKind::Amount),
            FieldView::new("Dana terkumpul", self.current_amount.as_str(), FieldKind::Amount),
            FieldView::new("Tenggat", self.deadline.as_str(), FieldKind::Date),
        ]
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.target_amount),
            2 => Some(&mut self.current_amount),
            3 => Some(&mut self.deadline),
            _ => None,
        }
    }
}

impl FormFields for WalletForm {
    fn fields(&self, _options: &ReferenceOptions) -> Vec<FieldView> {
        vec![
            FieldView::new("Nama dompet", self.name.as_str(), FieldKind::Text),
            FieldView::new("Jenis", wallet_kind_label(&self.kind), FieldKind::Choice),
            FieldView::new("Saldo awal", self.balance.as_str(), FieldKind::SignedAmount),
        ]
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.name),
            2 => Some(&mut self.balance),
            _ => None,
        }
    }

    fn cycle(&mut self, index: usize, _options: &ReferenceOptions, _forward: bool) {
        if index == 1 {
            self.cycle_kind();
        }
    }
}

impl FormFields for CategoryForm {
    fn fields(&self, _options: &ReferenceOptions) -> Vec<FieldView> {
        vec![
            FieldView::new("Nama kategori", self.name.as_str(), FieldKind::Text),
            FieldView::new("Jenis", self.kind.label(), FieldKind::Choice),
        ]
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        (index == 0).then_some(&mut self.name)
    }

    fn cycle(&mut self, index: usize, _options: &ReferenceOptions, _forward: bool) {
        if index == 1 {
            self.kind = self.kind.toggled();
        }
    }
}

impl FormFields for ProfileForm {
    fn fields(&self, _options: &ReferenceOptions) -> Vec<FieldView> {
        vec![
            FieldView::new("Nama lengkap", self.full_name.as_str(), FieldKind::Text),
            FieldView::new("Pekerjaan", self.occupation.as_str(), FieldKind::Text),
            FieldView::new(
                "Pendapatan bulanan",
                self.monthly_income.as_str(),
                FieldKind::Amount,
            ),
        ]
    }

    fn text_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.full_name),
            1 => Some(&mut self.occupation),
            2 => Some(&mut self.monthly_income),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::{category::Category, transaction::TransactionKind};

    use super::*;

    fn category(id: &str, kind: CategoryKind) -> Category {
        Category {
            id: Id::new(id),
            name: format!("cat-{id}"),
            kind,
        }
    }

    #[test]
    fn amount_field_regroups_on_each_keystroke() {
        let mut form = TransactionForm::default();
        for ch in "1500000".chars() {
            insert_char(&mut form, 1, ch);
        }
        assert_eq!(form.amount, "1.500.000");

        delete_char(&mut form, 1);
        assert_eq!(form.amount, "150.000");
    }

    #[test]
    fn wallet_balance_accepts_a_leading_minus() {
        let mut form = WalletForm::default();
        for ch in "-25000".chars() {
            insert_char(&mut form, 2, ch);
        }
        assert_eq!(form.balance, "-25.000");

        for _ in 0..5 {
            delete_char(&mut form, 2);
        }
        assert_eq!(form.balance, "-");
    }

    #[test]
    fn choice_fields_ignore_typing() {
        let mut form = CategoryForm::default();
        insert_char(&mut form, 1, 'x');
        assert_eq!(form, CategoryForm::default());
    }

    #[test]
    fn category_choice_only_offers_matching_type() {
        let options = ReferenceOptions {
            categories: vec![
                category("1", CategoryKind::Income),
                category("2", CategoryKind::Expense),
                category("3", CategoryKind::Expense),
            ],
            ..ReferenceOptions::default()
        };
        let mut form = TransactionForm::default();
        assert_eq!(form.kind, TransactionKind::Expense);

        form.cycle(2, &options, true);
        assert_eq!(form.category_id, Some(Id::new("2")));
        form.cycle(2, &options, true);
        assert_eq!(form.category_id, Some(Id::new("3")));
        form.cycle(2, &options, true);
        assert_eq!(form.category_id, Some(Id::new("2")));

        form.cycle(0, &options, true);
        assert_eq!(form.kind, TransactionKind::Income);
        assert_eq!(form.category_id, None);
        form.cycle(2, &options, false);
        assert_eq!(form.category_id, Some(Id::new("1")));
    }

    #[test]
    fn field_counts_match_forms() {
        assert_eq!(field_count(&TransactionForm::default()), 6);
        assert_eq!(field_count(&WalletForm::default()), 3);
        assert_eq!(field_count(&ProfileForm::default()), 3);
    }
}
