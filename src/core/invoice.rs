//! Invoice records and the typed values derived from a validated form

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Every accepted literal, in display order
    pub const LITERALS: [&'static str; 2] = ["pending", "paid"];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text is not one of [`InvoiceStatus::LITERALS`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown invoice status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A row of the `invoices` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,

    /// Minor currency units (cents)
    pub amount: i64,

    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Editable invoice fields after validation and coercion
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub customer_id: String,

    /// Major currency units as entered, always > 0
    pub amount: f64,

    pub status: InvoiceStatus,
}

impl InvoiceInput {
    /// Amount converted to cents, rounded to the nearest unit
    pub fn amount_in_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }

    /// Values for an INSERT dated `date`
    pub fn into_new_invoice(self, date: NaiveDate) -> NewInvoice {
        NewInvoice {
            amount: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
            date,
        }
    }

    /// Values for an UPDATE; id and date are not editable
    pub fn into_changes(self) -> InvoiceChanges {
        InvoiceChanges {
            amount: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
        }
    }
}

/// Column values bound by an INSERT. The id is generated by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Column values bound by an UPDATE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Current calendar date in UTC, the value stored in `invoices.date`
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
