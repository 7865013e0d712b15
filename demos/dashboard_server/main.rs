//! Invoice dashboard server with seeded data
//!
//! ```text
//! cargo run --example dashboard_server -- [config.yaml]
//! ```
//!
//! Sign in with `user@nextmail.com` / `123456`.

use chrono::NaiveDate;
use dashboard::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::from_yaml_file(&path)?,
        None => DashboardConfig::default(),
    }
    .apply_env();

    println!("🚀 Invoice Dashboard");
    println!("====================\n");
    println!("   Listing:   GET  {}", config.routes.invoices);
    println!("   Create:    POST {}/create", config.routes.invoices);
    println!("   Update:    POST {}/{{id}}/edit", config.routes.invoices);
    println!("   Delete:    POST {}/{{id}}/delete", config.routes.invoices);
    println!("   Sign in:   POST /login\n");

    let repository = InMemoryInvoiceRepository::new();
    for (id, customer, amount, status, day) in [
        ("inv-1", "cust-evil-rabbit", 15795, InvoiceStatus::Pending, 6),
        ("inv-2", "cust-delba", 20348, InvoiceStatus::Pending, 14),
        ("inv-3", "cust-lee", 3040, InvoiceStatus::Paid, 29),
    ] {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 10, day) else {
            continue;
        };
        repository
            .seed(Invoice {
                id: id.to_string(),
                customer_id: customer.to_string(),
                amount,
                status,
                date,
            })
            .await;
    }

    let seeded = config.database.url.is_none();
    let authenticator = InMemoryAuthenticator::new().with_user("user@nextmail.com", "123456");

    let builder = ServerBuilder::new()
        .with_config(config)
        .with_authenticator(authenticator)
        .with_event_bus(256);

    if let Some(bus) = builder.event_bus() {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            while let Ok(envelope) = rx.recv().await {
                tracing::info!(
                    kind = envelope.event.event_kind(),
                    invoice_id = ?envelope.event.invoice_id(),
                    "Dashboard event"
                );
            }
        });
    }

    let builder = if seeded {
        builder.with_repository(repository)
    } else {
        builder.connect_database().await?
    };

    builder.serve().await
}
