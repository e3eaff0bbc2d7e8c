use tabled::Table;

use crate::{
    config::Settings,
    error, info, success,
    types::HeaderTableRow,
    warning,
    ytm::{HeaderStore, headers::AUTH_HEADER_KEYS},
};

const YTM_URL: &str = "https://music.youtube.com";

pub fn connect(settings: &Settings) {
    info!(
        "Open {} with the Vybe extension enabled and play a track.",
        YTM_URL
    );
    info!(
        "The extension posts the session headers to http://{}/ytm/ingest.",
        settings.server_address
    );

    if webbrowser::open(YTM_URL).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            YTM_URL
        )
    }
}

pub async fn disconnect(settings: &Settings) {
    let store = HeaderStore::new(settings.headers_file.clone());
    match store.delete().await {
        Ok(true) => success!("Deleted headers"),
        Ok(false) => info!("No headers to delete"),
        Err(e) => error!("Failed to delete files: {}", e),
    }
}

/// Shows which auth headers are captured, never their values.
pub async fn status(settings: &Settings) {
    let store = HeaderStore::new(settings.headers_file.clone());
    let Some(ingest) = store.load().await else {
        warning!(
            "Not connected. No headers at {}",
            settings.headers_file.display()
        );
        return;
    };

    let auth = store.auth_headers().await;
    let rows: Vec<HeaderTableRow> = AUTH_HEADER_KEYS
        .iter()
        .map(|key| HeaderTableRow {
            header: key.to_string(),
            captured: match auth.as_ref().and_then(|a| a.get(key)) {
                Some(value) => format!("yes ({} chars)", value.len()),
                None => "no".to_string(),
            },
        })
        .collect();

    info!("Headers captured from {} at {}", ingest.url, ingest.time);
    println!("{}", Table::new(rows));

    if auth.is_some() {
        success!("Connected");
    } else {
        warning!("Captured headers contain no usable auth headers");
    }
}
