use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, request::Parts},
    routing::{delete, get, post},
};
use reqwest::Client;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    Res, api,
    config::Settings,
    spotify::ClientCredentials,
    ytm::{HeaderStore, InnertubeClient, MusicLibrary},
};

/// Origins of the browser extension are always allowed.
pub const EXTENSION_ORIGIN_PREFIX: &str = "chrome-extension://";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub headers: Arc<HeaderStore>,
    pub music: Arc<dyn MusicLibrary>,
    pub spotify: Option<Arc<ClientCredentials>>,
}

impl AppState {
    /// Wires the production collaborators from settings.
    pub fn from_settings(settings: Settings) -> Self {
        let client = Client::new();
        let spotify = ClientCredentials::from_settings(client.clone(), &settings)
            .map(Arc::new)
            .ok();
        if spotify.is_none() {
            tracing::info!("Spotify credentials not set; /api/v1/spotify/token is disabled");
        }

        Self {
            headers: Arc::new(HeaderStore::new(settings.headers_file.clone())),
            music: Arc::new(InnertubeClient::new(client, settings.ytm_base_url.clone())),
            spotify,
            settings: Arc::new(settings),
        }
    }

    /// Swaps the YouTube Music backend, e.g. for a test double.
    pub fn with_music(mut self, music: Arc<dyn MusicLibrary>) -> Self {
        self.music = music;
        self
    }

    pub fn with_spotify(mut self, spotify: Option<Arc<ClientCredentials>>) -> Self {
        self.spotify = spotify;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/codes/one", get(api::codes::one))
        .route("/codes/many", get(api::codes::many))
        .route("/utils/uuid", get(api::utils::uuid))
        .route("/utils/slug", post(api::utils::slug))
        .route("/utils/spotify-uri", post(api::utils::spotify_uri))
        .route("/utils/youtube-title", post(api::utils::youtube_title))
        .route("/spotify/token", get(api::spotify::token));

    let ytm = Router::new()
        .route("/ingest", post(api::ytm::ingest))
        .route("/validate", get(api::ytm::validate))
        .route("/history", get(api::ytm::history))
        .route("/library", get(api::ytm::library))
        .route("/search", get(api::ytm::search))
        .route("/connect", delete(api::ytm::disconnect));

    let cors = cors_layer(&state.settings.cors_origins);

    Router::new()
        .route("/healthz", get(api::health))
        .route("/health", get(api::health))
        .nest("/api/v1", api_v1)
        .nest("/ytm", ytm)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: the configured origins (a trailing `*` acts as a prefix
/// wildcard) plus any browser-extension origin, with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let mut exact = Vec::new();
    let mut prefixes = vec![EXTENSION_ORIGIN_PREFIX.to_string()];
    for origin in origins {
        match origin.strip_suffix('*') {
            Some(prefix) => prefixes.push(prefix.to_string()),
            None => exact.push(origin.trim_end_matches('/').to_string()),
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin.to_str().is_ok_and(|origin| {
                    exact.iter().any(|o| o == origin)
                        || prefixes.iter().any(|p| origin.starts_with(p.as_str()))
                })
            },
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub async fn start_api_server(settings: Settings) -> Res<()> {
    let addr = SocketAddr::from_str(&settings.server_address)
        .map_err(|e| format!("Failed to parse server address {}: {}", settings.server_address, e))?;

    tracing::info!(
        name = %settings.api_name,
        version = %settings.api_version,
        "starting server on {}",
        addr
    );

    let app = build_router(AppState::from_settings(settings));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
