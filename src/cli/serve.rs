use tracing_subscriber::EnvFilter;

use crate::{config::Settings, error, server};

const DEFAULT_LOG_FILTER: &str = "vybe=info,tower_http=info";

pub async fn serve(mut settings: Settings, address: Option<String>) {
    init_tracing();

    if let Some(address) = address {
        settings.server_address = address;
    }

    if let Err(e) = server::start_api_server(settings).await {
        error!("Server failed: {}", e);
    }
}

// RUST_LOG overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
