use std::collections::HashMap;

use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

use crate::core::record::LedgerRecord;
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::expense::{Expense, ExpenseKind, Amount, DATE_FORMAT};

/// Key under which expenses live inside a [`LedgerRecord`].
const EXPENSES_KEY: &str = "expenses";

/// Per-kind slice of a ledger's spending.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct KindTotal {
    pub kind: ExpenseKind,
    pub label: String,
    pub amount: Amount,
    /// Percentage of the ledger total, 0 to 100.
    pub share: f64
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Summary {
    pub total: Amount,
    pub kinds: Vec<KindTotal>
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Ledger {
    expenses: Vec<Expense>,
    /// Record keys this ledger doesn't own, written back unchanged.
    extra: Map<String, Value>
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger::default()
    }

    pub fn from_record(record: &LedgerRecord) -> LedgerResult<Ledger> {
        let mut extra = match record.as_value() {
            Value::Null => return Ok(Ledger::new()),
            Value::Object(map) => map.clone(),
            _ => return Err(Ledger::malformed("ledger record must be a JSON object"))
        };

        let expenses = match extra.remove(EXPENSES_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<Expense>>(value)
                .map_err(LedgerError::MalformedRecord)?
        };

        if let Some(bad) = expenses.iter().find(|expense| !expense.is_valid()) {
            return Err(LedgerError::NonPositiveAmount(bad.amount()));
        }

        Ok(Ledger { expenses, extra })
    }

    pub fn to_record(&self) -> LedgerResult<LedgerRecord> {
        let mut map = self.extra.clone();
        let expenses = serde_json::to_value(&self.expenses)
            .map_err(LedgerError::MalformedRecord)?;
        map.insert(EXPENSES_KEY.to_owned(), expenses);
        Ok(LedgerRecord::new(Value::Object(map)))
    }

    pub fn add_expense(&mut self, expense: Expense) -> LedgerResult<&Expense> {
        if !expense.is_valid() {
            return Err(LedgerError::NonPositiveAmount(expense.amount()));
        }
        self.expenses.push(expense);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn clear(&mut self) {
        self.expenses.clear();
    }

    pub fn total(&self) -> Amount {
        self.expenses.iter().map(Expense::amount).sum()
    }

    /// Totals per kind, largest first.
    pub fn summary(&self) -> Summary {
        let total = self.total();

        let mut per_kind: HashMap<&ExpenseKind, Amount> = HashMap::new();
        for expense in &self.expenses {
            *per_kind.entry(&expense.kind).or_insert(0.0) += expense.amount();
        }

        let mut kinds: Vec<KindTotal> = per_kind.into_iter()
            .map(|(kind, amount)| KindTotal {
                kind: kind.clone(),
                label: kind.label().to_owned(),
                amount,
                share: if total > 0.0 { amount * 100.0 / total } else { 0.0 }
            })
            .collect();

        kinds.sort_by(|a, b| b.amount.total_cmp(&a.amount)
            .then_with(|| a.label.cmp(&b.label)));

        Summary { total, kinds }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from("date,kind,amount,description\n");
        for expense in &self.expenses {
            let row = [
                expense.date.format(DATE_FORMAT).to_string(),
                expense.kind.label().to_owned(),
                format!("{:.2}", expense.amount()),
                expense.description.clone().unwrap_or_default()
            ];
            let fields: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }

    fn malformed(msg: &str) -> LedgerError {
        LedgerError::MalformedRecord(<serde_json::Error as serde::de::Error>::custom(msg))
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
