//! ServerBuilder for fluent API to build the dashboard HTTP server

use super::handlers::AppState;
use super::router::build_router;
use crate::actions::{AuthActions, InvoiceActions};
use crate::config::DashboardConfig;
use crate::core::auth::Authenticator;
use crate::core::cache::RouteCache;
use crate::core::events::EventBus;
use crate::core::service::InvoiceRepository;
use crate::storage::InMemoryInvoiceRepository;
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the dashboard server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_authenticator(InMemoryAuthenticator::new().with_user("user@nextmail.com", "123456"))
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: DashboardConfig,
    repository: Option<Arc<dyn InvoiceRepository>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    event_bus: Option<EventBus>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: DashboardConfig::default(),
            repository: None,
            authenticator: None,
            event_bus: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the invoice repository (defaults to the in-memory store)
    pub fn with_repository(mut self, repository: impl InvoiceRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set the authenticator (required)
    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    /// Enable the event bus for invoice mutations and revalidations
    pub fn with_event_bus(mut self, capacity: usize) -> Self {
        self.event_bus = Some(EventBus::new(capacity));
        self
    }

    /// Get a reference to the event bus (if configured)
    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }

    /// Add routes that live next to the dashboard ones
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Open the configured database and use it as the invoice repository.
    ///
    /// Does nothing when `database.url` is unset or a repository was
    /// already supplied.
    pub async fn connect_database(self) -> Result<Self> {
        if self.repository.is_some() || self.config.database.url.is_none() {
            return Ok(self);
        }

        #[cfg(feature = "postgres")]
        {
            use crate::storage::postgres::{PostgresInvoiceRepository, connect, ensure_schema};

            let pool = connect(&self.config.database).await?;
            ensure_schema(&pool).await?;
            tracing::info!("Connected to PostgreSQL");
            Ok(self.with_repository(PostgresInvoiceRepository::new(pool)))
        }

        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "database.url is set but the postgres feature is disabled, using the in-memory store"
            );
            Ok(self)
        }
    }

    fn build_state(&mut self) -> Result<AppState> {
        let authenticator = self
            .authenticator
            .take()
            .ok_or_else(|| anyhow!("Authenticator is required"))?;

        let repository = self
            .repository
            .take()
            .unwrap_or_else(|| Arc::new(InMemoryInvoiceRepository::new()));

        let cache = Arc::new(match &self.event_bus {
            Some(bus) => RouteCache::with_event_bus(bus.clone()),
            None => RouteCache::new(),
        });

        let mut invoices = InvoiceActions::new(repository, cache.clone())
            .with_invoices_path(self.config.routes.invoices.clone());
        if let Some(bus) = &self.event_bus {
            invoices = invoices.with_event_bus(bus.clone());
        }

        let auth = AuthActions::new(authenticator)
            .with_provider(self.config.auth.provider.clone())
            .with_redirect_to(self.config.routes.after_login.clone());

        Ok(AppState {
            invoices,
            auth,
            cache,
        })
    }

    /// Build the router with the dashboard routes plus any custom ones
    pub fn build(mut self) -> Result<Router> {
        self.config.validate()?;
        let state = self.build_state()?;

        let mut app = build_router(state);
        for routes in std::mem::take(&mut self.custom_routes) {
            app = app.merge(routes);
        }
        Ok(app)
    }

    /// Serve on `server.bind` with graceful shutdown on SIGTERM and Ctrl+C
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
