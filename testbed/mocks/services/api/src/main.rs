use karrot_mock_api::{ApiFixture, MockServer};
use std::env;
use std::fs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let fixtures_path = env::var("FIXTURES_PATH").unwrap_or_else(|_| "/app/fixtures".to_string());
    let fixture_file = format!("{}/karrot-api-fixture.yaml", fixtures_path);

    let server = match fs::read_to_string(&fixture_file) {
        Ok(content) => {
            tracing::info!("Loading fixtures from {}", fixture_file);
            MockServer::with_fixture(ApiFixture::from_yaml(&content)?)
        }
        Err(_) => {
            tracing::info!("No fixture file found, using default test fixture");
            MockServer::new()
        }
    };

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    server.serve(&addr).await
}
