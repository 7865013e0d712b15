//! # Dashboard Actions
//!
//! Server-side form actions for an invoice dashboard: create, update and
//! delete invoices, and sign users in.
//!
//! ## Features
//!
//! - **Non-throwing validation**: form input is checked against a fixed schema
//!   and failures come back as field-level messages
//! - **Redirects as outcomes**: a successful mutation returns
//!   [`Outcome::Redirect`](core::form::Outcome), never an error
//! - **Route cache revalidation**: the invoice listing is dropped from the
//!   cache after every successful mutation
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the
//!   `postgres` feature
//! - **Configuration-Based**: YAML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! let cache = Arc::new(RouteCache::new());
//! let actions = InvoiceActions::new(Arc::new(InMemoryInvoiceRepository::new()), cache);
//!
//! let form = FormData::new()
//!     .with("customerId", "c1")
//!     .with("amount", "15.50")
//!     .with("status", "pending");
//!
//! match actions.create_invoice(&form).await {
//!     Outcome::Redirect(to) => println!("go to {to}"),
//!     Outcome::State(state) => println!("stay: {:?}", state.message),
//! }
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Actions ===
    pub use crate::actions::{AuthActions, InvoiceActions};

    // === Core ===
    pub use crate::core::{
        auth::{AuthError, AuthErrorKind, Authenticator, InMemoryAuthenticator, SignInPayload},
        cache::{NoopRevalidator, Revalidator, RouteCache},
        error::{ConfigError, DashboardError},
        events::{DashboardEvent, EventBus, InvoiceEvent},
        form::{FieldErrors, FormData, FormState, Outcome},
        invoice::{Invoice, InvoiceChanges, InvoiceInput, InvoiceStatus, NewInvoice},
        service::InvoiceRepository,
        validation::InvoiceSchema,
    };

    // === Storage ===
    pub use crate::storage::InMemoryInvoiceRepository;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceRepository;

    // === Config ===
    pub use crate::config::DashboardConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
