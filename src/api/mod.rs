//! # API Module
//!
//! HTTP handlers of the Vybe backend, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! ### Monitoring
//! - [`health`] - `GET /healthz` and `GET /health`
//!
//! ### Join codes and utilities (`/api/v1`)
//! - [`codes::one`], [`codes::many`] - group join codes
//! - [`utils::uuid`], [`utils::slug`], [`utils::spotify_uri`],
//!   [`utils::youtube_title`] - string helpers used by the web app
//! - [`spotify::token`] - app-level Spotify access token
//!
//! ### YouTube Music bridge (`/ytm`)
//! - [`ytm::ingest`], [`ytm::validate`], [`ytm::history`], [`ytm::library`],
//!   [`ytm::search`], [`ytm::disconnect`]
//!
//! The Spotify token and every `/ytm` endpoint require the client token in
//! the `x-client-token` header, enforced by the [`ClientToken`] extractor.
//! Errors are returned as [`ApiError`], serialized as `{"detail": "..."}`.

mod auth;
mod error;
mod health;

pub mod codes;
pub mod spotify;
pub mod utils;
pub mod ytm;

pub use auth::{CLIENT_TOKEN_HEADER, ClientToken};
pub use error::ApiError;
pub use health::health;
