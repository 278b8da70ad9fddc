use chrono::NaiveDate;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::error::{LedgerError, LedgerResult};

pub type Amount = f64;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What a cost was paid for. The four presets cover the usual one-off
/// costs of a purchase; everything else is a custom label.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    DeedTax,
    LandTransferFee,
    AgencyFee,
    Renovation,
    Other(String)
}

impl ExpenseKind {
    pub const PRESETS: [ExpenseKind; 4] = [
        ExpenseKind::DeedTax,
        ExpenseKind::LandTransferFee,
        ExpenseKind::AgencyFee,
        ExpenseKind::Renovation
    ];

    const OTHER_LABEL: &'static str = "Other";

    /// Resolve user input into a kind. Preset keys, labels and the Chinese
    /// names are recognised case-insensitively; anything else becomes a
    /// custom kind, and blank input becomes plain "Other".
    pub fn from_label(raw: &str) -> ExpenseKind {
        let label = raw.trim();
        if label.is_empty() {
            return ExpenseKind::Other(Self::OTHER_LABEL.to_owned());
        }

        let lowered = label.to_lowercase();
        for preset in Self::PRESETS {
            let known = [preset.key(), preset.label(), preset.local_label()];
            if known.iter().any(|name| name.to_lowercase() == lowered) {
                return preset;
            }
        }

        if lowered == "other" || label == "其他" {
            return ExpenseKind::Other(Self::OTHER_LABEL.to_owned());
        }
        ExpenseKind::Other(label.to_owned())
    }

    pub fn key(&self) -> &str {
        match self {
            Self::DeedTax => "deed_tax",
            Self::LandTransferFee => "land_transfer_fee",
            Self::AgencyFee => "agency_fee",
            Self::Renovation => "renovation",
            Self::Other(_) => "other"
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::DeedTax => "Deed tax",
            Self::LandTransferFee => "Land transfer fee",
            Self::AgencyFee => "Agency fee",
            Self::Renovation => "Renovation",
            Self::Other(name) => name.as_str()
        }
    }

    fn local_label(&self) -> &str {
        match self {
            Self::DeedTax => "契税",
            Self::LandTransferFee => "土地出让金",
            Self::AgencyFee => "中介费",
            Self::Renovation => "装修费",
            Self::Other(name) => name.as_str()
        }
    }
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub kind: ExpenseKind,
    amount: Amount,
    #[serde(default)]
    pub description: Option<String>
}

impl Expense {
    pub fn new(date: NaiveDate, kind: ExpenseKind, amount: Amount, description: Option<&str>) -> LedgerResult<Expense> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::NonPositiveAmount(amount));
        }

        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);

        Ok(Expense { date, kind, amount, description })
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.amount.is_finite() && self.amount > 0.0
    }
}

impl std::fmt::Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}  {}  {}",
            self.date.format(DATE_FORMAT),
            self.kind.to_string().bold(),
            format_amount(self.amount),
            self.description.as_deref().unwrap_or("-"))
    }
}

pub fn parse_date(raw: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(raw.to_owned()))
}

/// Render an amount as `¥1,234.50`.
pub fn format_amount(amount: Amount) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}¥{}.{}", sign, grouped, cents)
}
