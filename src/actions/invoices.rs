//! Create, update and delete actions for the invoice form
//!
//! Each action validates, issues one statement, revalidates the listing
//! page and redirects. Expected failures come back as a [`FormState`];
//! the underlying database error is logged and never shown to the client.

use crate::config::normalize_route;
use crate::core::cache::Revalidator;
use crate::core::events::{DashboardEvent, EventBus, InvoiceEvent};
use crate::core::form::{FormData, FormState, Outcome};
use crate::core::invoice::today;
use crate::core::service::InvoiceRepository;
use crate::core::validation::InvoiceSchema;
use std::sync::Arc;

/// Listing page revalidated and redirected to after a mutation
pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub const MSG_CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
pub const MSG_CREATE_DB_ERROR: &str = "Database Error: Failed to Create Invoice.";
pub const MSG_UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
pub const MSG_UPDATE_DB_ERROR: &str = "Database Error: Failed to Update Invoice.";
pub const MSG_DELETED: &str = "Deleted Invoice.";
pub const MSG_DELETE_DB_ERROR: &str = "Database Error: Failed to Delete Invoice.";

/// Invoice form actions bound to a repository and a revalidation hook
#[derive(Clone)]
pub struct InvoiceActions {
    repository: Arc<dyn InvoiceRepository>,
    revalidator: Arc<dyn Revalidator>,
    event_bus: Option<EventBus>,
    invoices_path: String,
    schema: &'static InvoiceSchema,
}

impl InvoiceActions {
    pub fn new(repository: Arc<dyn InvoiceRepository>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self {
            repository,
            revalidator,
            event_bus: None,
            invoices_path: INVOICES_PATH.to_string(),
            schema: InvoiceSchema::shared(),
        }
    }

    /// Announce successful mutations on this bus
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Override the listing path (defaults to [`INVOICES_PATH`]).
    ///
    /// Trailing slashes are dropped; the router, the redirect target and
    /// the cache key all use the result.
    pub fn with_invoices_path(mut self, path: impl Into<String>) -> Self {
        self.invoices_path = normalize_route(&path.into()).to_string();
        self
    }

    pub fn invoices_path(&self) -> &str {
        &self.invoices_path
    }

    pub fn repository(&self) -> &Arc<dyn InvoiceRepository> {
        &self.repository
    }

    /// Create an invoice dated today from the submitted form
    pub async fn create_invoice(&self, form: &FormData) -> Outcome<FormState> {
        let input = match self.schema.safe_parse(form) {
            Ok(input) => input,
            Err(errors) => {
                tracing::warn!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "Invoice create form rejected"
                );
                return Outcome::State(FormState::invalid(errors, MSG_CREATE_MISSING_FIELDS));
            }
        };

        let invoice = match self.repository.insert(input.into_new_invoice(today())).await {
            Ok(invoice) => invoice,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create invoice");
                return Outcome::State(FormState::message(MSG_CREATE_DB_ERROR));
            }
        };

        tracing::info!(
            invoice_id = %invoice.id,
            amount = invoice.amount,
            status = %invoice.status,
            "Invoice created"
        );
        self.publish(InvoiceEvent::Created {
            invoice_id: invoice.id,
            amount: invoice.amount,
        });

        self.revalidator.revalidate_path(&self.invoices_path);
        Outcome::Redirect(self.invoices_path.clone())
    }

    /// Rewrite customer, amount and status of an existing invoice
    pub async fn update_invoice(&self, id: &str, form: &FormData) -> Outcome<FormState> {
        let input = match self.schema.safe_parse(form) {
            Ok(input) => input,
            Err(errors) => {
                tracing::warn!(
                    invoice_id = %id,
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "Invoice update form rejected"
                );
                return Outcome::State(FormState::invalid(errors, MSG_UPDATE_MISSING_FIELDS));
            }
        };

        let changes = input.into_changes();
        let amount = changes.amount;

        if let Err(e) = self.repository.update(id, changes).await {
            tracing::error!(invoice_id = %id, error = %e, "Failed to update invoice");
            return Outcome::State(FormState::message(MSG_UPDATE_DB_ERROR));
        }

        tracing::info!(invoice_id = %id, amount, "Invoice updated");
        self.publish(InvoiceEvent::Updated {
            invoice_id: id.to_string(),
            amount,
        });

        self.revalidator.revalidate_path(&self.invoices_path);
        Outcome::Redirect(self.invoices_path.clone())
    }

    /// Delete an invoice; an unknown id still counts as deleted
    pub async fn delete_invoice(&self, id: &str) -> FormState {
        if let Err(e) = self.repository.delete(id).await {
            tracing::error!(invoice_id = %id, error = %e, "Failed to delete invoice");
            return FormState::message(MSG_DELETE_DB_ERROR);
        }

        tracing::info!(invoice_id = %id, "Invoice deleted");
        self.publish(InvoiceEvent::Deleted {
            invoice_id: id.to_string(),
        });

        self.revalidator.revalidate_path(&self.invoices_path);
        FormState::message(MSG_DELETED)
    }

    fn publish(&self, event: InvoiceEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(DashboardEvent::Invoice(event));
        }
    }
}
