//! Parsers for YouTube Music InnerTube responses.
//!
//! The responses are deeply nested renderer trees whose exact layout shifts
//! over time, so the parsers search for the renderers they need instead of
//! following fixed paths.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::{ArtistRef, HistoryItem, LibraryPlaylist, SongResult, Thumbnail};

const PAGE_TYPE_ARTIST: &str = "MUSIC_PAGE_TYPE_ARTIST";
const PAGE_TYPE_ALBUM: &str = "MUSIC_PAGE_TYPE_ALBUM";
const RUN_SEPARATOR: &str = " • ";

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(:\d{2})+$").unwrap());

/// Played tracks from a `FEmusic_history` browse response. Each shelf title
/// ("Today", "Yesterday", ...) becomes the `played` value of its items.
pub fn parse_history(response: &Value) -> Vec<HistoryItem> {
    collect_shelves(response)
        .into_iter()
        .flat_map(|(shelf_title, items)| {
            items.into_iter().map(move |item| {
                let song = parse_list_item(item);
                HistoryItem {
                    video_id: song.video_id,
                    title: Some(song.title).filter(|t| !t.is_empty()),
                    artists: song.artists,
                    album: song.album,
                    thumbnails: song.thumbnails,
                    played: shelf_title.clone(),
                }
            })
        })
        .collect()
}

/// Playlists from a `FEmusic_liked_playlists` browse response.
pub fn parse_library_playlists(response: &Value) -> Vec<LibraryPlaylist> {
    let mut renderers = Vec::new();
    find_all(response, "musicTwoRowItemRenderer", &mut renderers);

    renderers
        .into_iter()
        .filter_map(|item| {
            let browse_id = item["title"]["runs"][0]["navigationEndpoint"]["browseEndpoint"]
                ["browseId"]
                .as_str()
                .or_else(|| item["navigationEndpoint"]["browseEndpoint"]["browseId"].as_str())?;

            Some(LibraryPlaylist {
                playlist_id: browse_id.strip_prefix("VL").unwrap_or(browse_id).to_string(),
                title: runs_text(&item["title"]).unwrap_or_default(),
                description: runs_text(&item["subtitle"]),
                thumbnails: thumbnails(
                    &item["thumbnailRenderer"]["musicThumbnailRenderer"]["thumbnail"],
                ),
            })
        })
        .collect()
}

/// Song results from a search response, at most `limit` of them.
pub fn parse_search_songs(response: &Value, limit: usize) -> Vec<SongResult> {
    collect_shelves(response)
        .into_iter()
        .flat_map(|(_, items)| items)
        .map(parse_list_item)
        .filter(|song| song.video_id.is_some())
        .take(limit)
        .collect()
}

fn parse_list_item(item: &Value) -> SongResult {
    let title_runs = flex_column_runs(item, 0);
    let detail_runs = flex_column_runs(item, 1);

    let title = title_runs
        .first()
        .and_then(|run| run["text"].as_str())
        .unwrap_or_default()
        .to_string();

    let video_id = item["playlistItemData"]["videoId"]
        .as_str()
        .or_else(|| {
            title_runs
                .first()
                .and_then(|run| run["navigationEndpoint"]["watchEndpoint"]["videoId"].as_str())
        })
        .or_else(|| {
            item["overlay"]["musicItemThumbnailOverlayRenderer"]["content"]
                ["musicPlayButtonRenderer"]["playNavigationEndpoint"]["watchEndpoint"]["videoId"]
                .as_str()
        })
        .map(String::from);

    let mut artists: Vec<ArtistRef> = detail_runs
        .iter()
        .filter(|run| page_type(run) == Some(PAGE_TYPE_ARTIST))
        .map(|run| ArtistRef {
            name: run["text"].as_str().unwrap_or_default().to_string(),
            id: run["navigationEndpoint"]["browseEndpoint"]["browseId"]
                .as_str()
                .map(String::from),
        })
        .collect();

    // Uploads and some history rows carry the artist as plain text.
    if artists.is_empty() {
        if let Some(name) = detail_runs
            .iter()
            .filter_map(|run| run["text"].as_str())
            .find(|text| *text != RUN_SEPARATOR && !DURATION_RE.is_match(text))
        {
            artists.push(ArtistRef {
                name: name.to_string(),
                id: None,
            });
        }
    }

    let album = (1..=2)
        .flat_map(|idx| flex_column_runs(item, idx))
        .find(|run| page_type(run) == Some(PAGE_TYPE_ALBUM))
        .and_then(|run| run["text"].as_str())
        .map(String::from);

    let duration = runs_text(
        &item["fixedColumns"][0]["musicResponsiveListItemFixedColumnRenderer"]["text"],
    )
    .or_else(|| {
        detail_runs
            .iter()
            .filter_map(|run| run["text"].as_str())
            .find(|text| DURATION_RE.is_match(text))
            .map(String::from)
    });

    SongResult {
        video_id,
        title,
        artists,
        album,
        duration,
        thumbnails: thumbnails(&item["thumbnail"]["musicThumbnailRenderer"]["thumbnail"]),
    }
}

/// Every `musicShelfRenderer` with its title and list items, in document order.
fn collect_shelves(response: &Value) -> Vec<(Option<String>, Vec<&Value>)> {
    let mut shelves = Vec::new();
    find_all(response, "musicShelfRenderer", &mut shelves);

    shelves
        .into_iter()
        .map(|shelf| {
            let items: Vec<&Value> = shelf["contents"]
                .as_array()
                .map(|contents| {
                    contents
                        .iter()
                        .map(|c| &c["musicResponsiveListItemRenderer"])
                        .filter(|r| r.is_object())
                        .collect()
                })
                .unwrap_or_default();
            (runs_text(&shelf["title"]), items)
        })
        .collect()
}

fn find_all<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    out.push(v);
                } else {
                    find_all(v, key, out);
                }
            }
        }
        Value::Array(items) => {
            for v in items {
                find_all(v, key, out);
            }
        }
        _ => {}
    }
}

fn flex_column_runs(item: &Value, idx: usize) -> Vec<&Value> {
    item["flexColumns"][idx]["musicResponsiveListItemFlexColumnRenderer"]["text"]["runs"]
        .as_array()
        .map(|runs| runs.iter().collect())
        .unwrap_or_default()
}

fn page_type(run: &Value) -> Option<&str> {
    run["navigationEndpoint"]["browseEndpoint"]["browseEndpointContextSupportedConfigs"]
        ["browseEndpointContextMusicConfig"]["pageType"]
        .as_str()
}

fn runs_text(value: &Value) -> Option<String> {
    if let Some(text) = value["simpleText"].as_str() {
        return Some(text.to_string());
    }

    let text: String = value["runs"]
        .as_array()?
        .iter()
        .filter_map(|run| run["text"].as_str())
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

fn thumbnails(value: &Value) -> Vec<Thumbnail> {
    value["thumbnails"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|t| {
                    Some(Thumbnail {
                        url: t["url"].as_str()?.to_string(),
                        width: t["width"].as_u64().map(|w| w as u32),
                        height: t["height"].as_u64().map(|h| h as u32),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
