//! HTTP-level tests for the dashboard routes
//!
//! Form post → handler → action → repository → HTTP response.

use anyhow::{Result, anyhow};
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use dashboard::prelude::*;
use serde_json::Value;

fn invoice(id: &str, amount: i64, day: u32) -> Invoice {
    Invoice {
        id: id.to_string(),
        customer_id: "c1".to_string(),
        amount,
        status: InvoiceStatus::Pending,
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
    }
}

fn create_test_server(repo: InMemoryInvoiceRepository) -> TestServer {
    let app = ServerBuilder::new()
        .with_repository(repo)
        .with_authenticator(InMemoryAuthenticator::new().with_user("user@nextmail.com", "123456"))
        .build()
        .expect("Failed to build app");

    TestServer::new(app).expect("Failed to create test server")
}

/// Repository whose every call fails
struct BrokenRepository;

#[async_trait]
impl InvoiceRepository for BrokenRepository {
    async fn insert(&self, _invoice: NewInvoice) -> Result<Invoice> {
        Err(anyhow!("connection reset"))
    }

    async fn update(&self, _id: &str, _changes: InvoiceChanges) -> Result<()> {
        Err(anyhow!("connection reset"))
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Err(anyhow!("connection reset"))
    }

    async fn get(&self, _id: &str) -> Result<Option<Invoice>> {
        Err(anyhow!("connection reset"))
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        Err(anyhow!("connection reset"))
    }
}

/// Authenticator failing with something other than an auth error
struct UnreachableAuthenticator;

#[async_trait]
impl Authenticator for UnreachableAuthenticator {
    async fn sign_in(&self, _provider: &str, _payload: SignInPayload) -> Result<String> {
        Err(anyhow!("identity provider unreachable"))
    }
}

fn broken_server() -> TestServer {
    let app = ServerBuilder::new()
        .with_repository(BrokenRepository)
        .with_authenticator(UnreachableAuthenticator)
        .build()
        .expect("Failed to build app");

    TestServer::new(app).expect("Failed to create test server")
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = create_test_server(InMemoryInvoiceRepository::new());

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

mod invoice_route_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_redirects_with_see_other() {
        let repo = InMemoryInvoiceRepository::new();
        let server = create_test_server(repo.clone());

        let response = server
            .post("/dashboard/invoices/create")
            .form(&[("customerId", "c1"), ("amount", "15.50"), ("status", "pending")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/dashboard/invoices");

        let invoices = repo.list().await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].amount, 1550);
    }

    #[tokio::test]
    async fn test_create_invalid_returns_field_errors() {
        let repo = InMemoryInvoiceRepository::new();
        let server = create_test_server(repo.clone());

        let response = server
            .post("/dashboard/invoices/create")
            .form(&[("customerId", "c1"), ("amount", "0"), ("status", "pending")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing Fields. Failed to Create Invoice.");
        assert_eq!(
            body["errors"]["amount"][0],
            "Please enter an amount greater than $0."
        );
        assert!(body["errors"].get("customerId").is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_existing_invoice() {
        let repo = InMemoryInvoiceRepository::new();
        repo.seed(invoice("inv-1", 100, 1)).await;
        let server = create_test_server(repo.clone());

        let response = server
            .post("/dashboard/invoices/inv-1/edit")
            .form(&[("customerId", "c9"), ("amount", "2"), ("status", "paid")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let updated = repo.get("inv-1").await.unwrap().unwrap();
        assert_eq!(updated.customer_id, "c9");
        assert_eq!(updated.amount, 200);
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[tokio::test]
    async fn test_delete_returns_message() {
        let repo = InMemoryInvoiceRepository::new();
        repo.seed(invoice("inv-1", 100, 1)).await;
        let server = create_test_server(repo.clone());

        let response = server.post("/dashboard/invoices/inv-1/delete").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Deleted Invoice.");
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_listing_is_cached_until_a_mutation() {
        let repo = InMemoryInvoiceRepository::new();
        repo.seed(invoice("inv-1", 100, 1)).await;
        let server = create_test_server(repo.clone());

        let body: Value = server.get("/dashboard/invoices").await.json();
        assert_eq!(body["count"], 1);

        // Written behind the action's back: the cached page is still served
        repo.seed(invoice("inv-2", 200, 2)).await;
        let body: Value = server.get("/dashboard/invoices").await.json();
        assert_eq!(body["count"], 1);

        server.post("/dashboard/invoices/inv-1/delete").await;

        let body: Value = server.get("/dashboard/invoices").await.json();
        assert_eq!(body["count"], 1);
        assert_eq!(body["invoices"][0]["id"], "inv-2");
        assert_eq!(body["invoices"][0]["customerId"], "c1");
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_db_error_maps_to_500_with_generic_message() {
        let server = broken_server();

        let response = server
            .post("/dashboard/invoices/create")
            .form(&[("customerId", "c1"), ("amount", "10"), ("status", "paid")])
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Database Error: Failed to Create Invoice.");
        assert!(!response.text().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_delete_db_error() {
        let server = broken_server();

        let response = server.post("/dashboard/invoices/inv-1/delete").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Database Error: Failed to Delete Invoice.");
    }

    #[tokio::test]
    async fn test_listing_failure_hides_cause() {
        let server = broken_server();

        let response = server.get("/dashboard/invoices").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["code"], "UNEXPECTED_ERROR");
        assert!(!response.text().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_foreign_auth_error_is_500() {
        let server = broken_server();

        let response = server
            .post("/login")
            .form(&[("email", "user@nextmail.com"), ("password", "123456")])
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}

mod login_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_redirects_to_dashboard() {
        let server = create_test_server(InMemoryInvoiceRepository::new());

        let response = server
            .post("/login")
            .form(&[("email", "user@nextmail.com"), ("password", "123456")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/dashboard");
    }

    #[tokio::test]
    async fn test_login_bad_password() {
        let server = create_test_server(InMemoryInvoiceRepository::new());

        let response = server
            .post("/login")
            .form(&[("email", "user@nextmail.com"), ("password", "wrong-password")])
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid credentials.");
    }
}

mod route_config_tests {
    use super::*;

    fn server_with_invoices_route(route: &str) -> Result<axum::Router> {
        let mut config = DashboardConfig::default();
        config.routes.invoices = route.to_string();

        ServerBuilder::new()
            .with_config(config)
            .with_authenticator(InMemoryAuthenticator::new())
            .build()
    }

    #[test]
    fn test_root_invoices_route_is_a_build_error() {
        for route in ["/", "/login", "/health"] {
            let err = server_with_invoices_route(route)
                .err()
                .expect("build should fail");
            assert!(err.to_string().contains("routes.invoices"), "route {route}");
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_route_redirects_to_served_path() {
        let app = server_with_invoices_route("/billing/").expect("Failed to build app");
        let server = TestServer::new(app).expect("Failed to create test server");

        let response = server
            .post("/billing/create")
            .form(&[("customerId", "c1"), ("amount", "5"), ("status", "paid")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/billing");

        let listing = server.get("/billing").await;
        listing.assert_status_ok();
        let body: Value = listing.json();
        assert_eq!(body["count"], 1);
    }
}

mod listing_cache_race_tests {
    use super::*;
    use axum::extract::State;
    use dashboard::server::handlers::list_invoices;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    /// Repository whose first `list` reads its rows, then waits for
    /// `release` before returning them
    struct GatedRepository {
        inner: InMemoryInvoiceRepository,
        armed: AtomicBool,
        reading: Notify,
        release: Notify,
    }

    #[async_trait]
    impl InvoiceRepository for GatedRepository {
        async fn insert(&self, invoice: NewInvoice) -> Result<Invoice> {
            self.inner.insert(invoice).await
        }

        async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<()> {
            self.inner.update(id, changes).await
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.inner.delete(id).await
        }

        async fn get(&self, id: &str) -> Result<Option<Invoice>> {
            self.inner.get(id).await
        }

        async fn list(&self) -> Result<Vec<Invoice>> {
            let rows = self.inner.list().await?;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.reading.notify_one();
                self.release.notified().await;
            }
            Ok(rows)
        }
    }

    #[tokio::test]
    async fn test_listing_read_before_mutation_is_not_cached() {
        let inner = InMemoryInvoiceRepository::new();
        let repo = Arc::new(GatedRepository {
            inner: inner.clone(),
            armed: AtomicBool::new(true),
            reading: Notify::new(),
            release: Notify::new(),
        });
        let cache = Arc::new(RouteCache::new());
        let state = AppState {
            invoices: InvoiceActions::new(repo.clone(), cache.clone()),
            auth: AuthActions::new(Arc::new(InMemoryAuthenticator::new())),
            cache: cache.clone(),
        };

        let in_flight = tokio::spawn(list_invoices(State(state.clone())));
        repo.reading.notified().await;

        let form = FormData::new()
            .with("customerId", "c1")
            .with("amount", "10")
            .with("status", "paid");
        assert!(state.invoices.create_invoice(&form).await.is_redirect());

        repo.release.notify_one();
        let stale = in_flight.await.unwrap().unwrap();
        assert_eq!(stale.0["count"], 0);
        assert!(!cache.contains("/dashboard/invoices"));

        let fresh = list_invoices(State(state)).await.unwrap();
        assert_eq!(fresh.0["count"], 1);
        assert_eq!(inner.len().await, 1);
    }
}
