//! Core module containing the dashboard's types, seams and validation

pub mod auth;
pub mod cache;
pub mod error;
pub mod events;
pub mod form;
pub mod invoice;
pub mod service;
pub mod validation;

pub use auth::{AuthError, AuthErrorKind, Authenticator, InMemoryAuthenticator, SignInPayload};
pub use cache::{NoopRevalidator, Revalidator, RouteCache};
pub use error::{ConfigError, DashboardError};
pub use events::{DashboardEvent, EventBus, InvoiceEvent};
pub use form::{FieldErrors, FormData, FormState, Outcome};
pub use invoice::{Invoice, InvoiceChanges, InvoiceInput, InvoiceStatus, NewInvoice};
pub use service::InvoiceRepository;
pub use validation::InvoiceSchema;
