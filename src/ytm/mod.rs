//! # YouTube Music bridge
//!
//! YouTube Music has no public API for a user's own library. The Vybe browser
//! extension captures the request headers of an authenticated
//! music.youtube.com session and posts them to the backend, which stores them
//! and replays them against the InnerTube endpoints the web client uses.
//!
//! - [`headers`] - persistence of the captured headers and the derived auth set
//! - [`client`] - the [`MusicLibrary`] seam and its InnerTube implementation
//! - [`parse`] - renderer-tree parsers for InnerTube responses

pub mod client;
pub mod headers;
pub mod parse;

pub use client::{InnertubeClient, MusicLibrary};
pub use headers::{AuthHeaders, HeaderStore, StoreError};

use crate::types::{HistoryEntry, HistoryItem, HistorySample};

pub const SAMPLE_SIZE: usize = 5;

/// Flattens history items into the shape rendered by the web UI.
pub fn normalize_history(items: &[HistoryItem]) -> Vec<HistoryEntry> {
    items
        .iter()
        .map(|item| HistoryEntry {
            video_id: item.video_id.clone().unwrap_or_default(),
            title: item.title.clone().unwrap_or_else(|| "Unknown".to_string()),
            artists: artist_names(item),
            album: item.album.clone().unwrap_or_default(),
            thumbnail: item
                .thumbnails
                .first()
                .map(|t| t.url.clone())
                .unwrap_or_default(),
            played: item.played.clone().unwrap_or_default(),
        })
        .collect()
}

/// The first few history items, numbered from one, for connection checks.
pub fn history_sample(items: &[HistoryItem]) -> Vec<HistorySample> {
    items
        .iter()
        .take(SAMPLE_SIZE)
        .enumerate()
        .map(|(i, item)| HistorySample {
            number: i + 1,
            title: item
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            artists: artist_names(item),
            played: item.played.clone().unwrap_or_default(),
        })
        .collect()
}

fn artist_names(item: &HistoryItem) -> Vec<String> {
    item.artists.iter().map(|a| a.name.clone()).collect()
}
