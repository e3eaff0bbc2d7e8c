//! # Spotify Integration Module
//!
//! App-level access to the Spotify Web API. The web front end needs a token
//! for catalog lookups that are not tied to a user account (search, track
//! metadata), so the backend holds the client secret and hands out
//! client-credentials tokens.
//!
//! ## Token refresh
//!
//! Tokens are renewed lazily on demand. A cached token is reused while it is
//! valid for longer than [`auth::VALIDITY_BUFFER_SECS`]; after that the next
//! request triggers a new token exchange.
//!
//! ```rust,ignore
//! let fetcher = spotify::ClientCredentials::from_settings(reqwest::Client::new(), &settings)?;
//! let token = fetcher.access_token().await?;
//! ```

pub mod auth;

pub use auth::{ClientCredentials, SpotifyError};
