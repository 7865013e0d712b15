//! Declarative form schemas
//!
//! A [`FormSchema`] is an ordered list of [`FieldRule`]s. Each rule pulls one
//! field out of a [`FormData`], runs its filters (coercion), then its
//! validators. Parsing never fails fast: every field is checked and all
//! messages are collected into [`FieldErrors`].
//!
//! [`InvoiceSchema`] is the invoice form built on top of it.

use crate::core::form::{FieldErrors, FormData};
use crate::core::invoice::{InvoiceInput, InvoiceStatus};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::OnceLock;

use super::filters::coerce_number;
use super::validators::{fits_in_cents, one_of, positive, required, string};

type Filter = Box<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;
type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Coercion and constraints for one form field
pub struct FieldRule {
    name: &'static str,
    filters: Vec<Filter>,
    validators: Vec<Validator>,
}

impl FieldRule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            filters: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters.push(Box::new(f));
        self
    }

    pub fn validate<V>(mut self, v: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(v));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run filters then validators on the raw submitted value.
    ///
    /// The first failing step ends this field's checks.
    fn apply(&self, raw: Option<&str>) -> Result<Value, String> {
        let mut value = raw.map_or(Value::Null, |s| Value::String(s.to_string()));

        for filter in &self.filters {
            value = filter(self.name, value).map_err(|e| e.to_string())?;
        }

        for validator in &self.validators {
            validator(self.name, &value)?;
        }

        Ok(value)
    }
}

/// Ordered set of field rules, immutable once built
#[derive(Default)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(FieldRule::name)
    }

    /// Check every field and return the coerced values, or every message
    pub fn safe_parse(&self, form: &FormData) -> Result<IndexMap<&'static str, Value>, FieldErrors> {
        let mut values = IndexMap::with_capacity(self.rules.len());
        let mut errors = FieldErrors::new();

        for rule in &self.rules {
            match rule.apply(form.get(rule.name)) {
                Ok(value) => {
                    values.insert(rule.name, value);
                }
                Err(message) => errors.add(rule.name, message),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

/// Form field carrying the customer reference
pub const CUSTOMER_ID: &str = "customerId";
/// Form field carrying the amount in major units
pub const AMOUNT: &str = "amount";
/// Form field carrying the status literal
pub const STATUS: &str = "status";

pub const MSG_SELECT_CUSTOMER: &str = "Please select a customer.";
pub const MSG_AMOUNT_POSITIVE: &str = "Please enter an amount greater than $0.";
pub const MSG_SELECT_STATUS: &str = "Please select an invoice status.";
pub const MSG_AMOUNT_TOO_LARGE: &str = "Please enter a smaller amount.";

/// Editable invoice fields: customer, amount, status.
///
/// Shared by create and update; id and date are never read from the form.
pub struct InvoiceSchema {
    schema: FormSchema,
}

impl InvoiceSchema {
    pub fn new() -> Self {
        let schema = FormSchema::new()
            .field(
                FieldRule::new(CUSTOMER_ID)
                    .validate(required(MSG_SELECT_CUSTOMER))
                    .validate(string(MSG_SELECT_CUSTOMER)),
            )
            .field(
                FieldRule::new(AMOUNT)
                    .filter(coerce_number())
                    .validate(positive(MSG_AMOUNT_POSITIVE))
                    .validate(fits_in_cents(MSG_AMOUNT_TOO_LARGE)),
            )
            .field(
                FieldRule::new(STATUS).validate(one_of(&InvoiceStatus::LITERALS, MSG_SELECT_STATUS)),
            );

        Self { schema }
    }

    /// Process-wide instance, built on first use
    pub fn shared() -> &'static InvoiceSchema {
        static SCHEMA: OnceLock<InvoiceSchema> = OnceLock::new();
        SCHEMA.get_or_init(InvoiceSchema::new)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schema.field_names()
    }

    /// Validate and coerce an invoice form
    pub fn safe_parse(&self, form: &FormData) -> Result<InvoiceInput, FieldErrors> {
        let values = self.schema.safe_parse(form)?;

        let customer_id = values.get(CUSTOMER_ID).and_then(Value::as_str);
        let amount = values.get(AMOUNT).and_then(Value::as_f64);
        let status = values
            .get(STATUS)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<InvoiceStatus>().ok());

        // Rules above guarantee the shapes; report against the field if not.
        let mut errors = FieldErrors::new();
        if customer_id.is_none() {
            errors.add(CUSTOMER_ID, MSG_SELECT_CUSTOMER);
        }
        if amount.is_none() {
            errors.add(AMOUNT, MSG_AMOUNT_POSITIVE);
        }
        if status.is_none() {
            errors.add(STATUS, MSG_SELECT_STATUS);
        }

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceInput {
                customer_id: customer_id.to_string(),
                amount,
                status,
            }),
            _ => Err(errors),
        }
    }
}

impl Default for InvoiceSchema {
    fn default() -> Self {
        Self::new()
    }
}
