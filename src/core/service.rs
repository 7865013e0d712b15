//! Persistence seam for invoices

use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;

/// Storage for the `invoices` table
///
/// Every value reaching the backend is a bound parameter. Implementations
/// never check that referenced customers exist; that is the database's job.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert a row with a freshly generated id and return it
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice>;

    /// Rewrite customer, amount and status of the row with this id.
    ///
    /// Matching no row is not an error.
    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<()>;

    /// Remove the row with this id. Matching no row is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Get a row by id
    async fn get(&self, id: &str) -> Result<Option<Invoice>>;

    /// All rows, newest date first
    async fn list(&self) -> Result<Vec<Invoice>>;
}
