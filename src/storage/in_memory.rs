//! In-memory invoice repository for testing and development

use crate::core::InvoiceRepository;
use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory invoice repository
///
/// Rows are kept in insertion order behind an async `RwLock`. Clones share
/// the same rows.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceRepository {
    invoices: Arc<RwLock<IndexMap<String, Invoice>>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row with a known id, replacing any row with that id
    pub async fn seed(&self, invoice: Invoice) {
        self.invoices
            .write()
            .await
            .insert(invoice.id.clone(), invoice);
    }

    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice> {
        let row = Invoice {
            id: Uuid::new_v4().to_string(),
            customer_id: invoice.customer_id,
            amount: invoice.amount,
            status: invoice.status,
            date: invoice.date,
        };

        self.invoices
            .write()
            .await
            .insert(row.id.clone(), row.clone());

        Ok(row)
    }

    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<()> {
        if let Some(row) = self.invoices.write().await.get_mut(id) {
            row.customer_id = changes.customer_id;
            row.amount = changes.amount;
            row.status = changes.status;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.invoices.write().await.shift_remove(id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Invoice>> {
        Ok(self.invoices.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let mut rows: Vec<Invoice> = self.invoices.read().await.values().cloned().collect();
        // Stable sort keeps insertion order within a day
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }
}
