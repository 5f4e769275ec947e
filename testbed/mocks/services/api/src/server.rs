use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::fixtures::ApiFixture;
use crate::handlers::{
    accept_invitation, create_invitation, create_message, health_check, list_history,
    list_invitations, list_messages,
};

pub type SharedFixture = Arc<RwLock<ApiFixture>>;

pub struct MockServer {
    fixture: SharedFixture,
}

impl MockServer {
    pub fn new() -> Self {
        Self::with_fixture(ApiFixture::create_test_fixture())
    }

    pub fn with_fixture(fixture: ApiFixture) -> Self {
        Self {
            fixture: Arc::new(RwLock::new(fixture)),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/api/messages/", get(list_messages).post(create_message))
            .route("/api/history/", get(list_history))
            .route(
                "/api/invitations/",
                get(list_invitations).post(create_invitation),
            )
            .route("/api/invitations/{token}/accept/", post(accept_invitation))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.fixture))
    }

    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Karrot mock API listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Serves in the background, returning the bound address.
    pub async fn spawn(self, addr: &str) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let app = self.router();
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock API server error: {}", e);
            }
        });
        Ok((local_addr, handle))
    }

    pub fn get_fixture(&self) -> SharedFixture {
        Arc::clone(&self.fixture)
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}
