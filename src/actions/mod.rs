//! Form actions: the operations a dashboard page submits to

pub mod auth;
pub mod invoices;

pub use auth::AuthActions;
pub use invoices::InvoiceActions;
