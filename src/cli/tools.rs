use crate::{codes, config::Settings, error, info, utils};

/// Prints `count` join codes, one per line.
pub fn codes(settings: &Settings, count: usize, length: Option<usize>, specials: bool) {
    let alphabet = if specials {
        codes::DEFAULT_ALPHABET
    } else {
        codes::BASE_ALPHABET
    };
    let length = length.unwrap_or(settings.code_length);

    for code in codes::generate_codes(count, length, alphabet) {
        println!("{}", code);
    }
}

pub fn uuid() {
    println!("{}", utils::make_uuid());
}

pub fn slug(text: &str) {
    println!("{}", utils::slugify(text));
}

pub fn spotify_uri(input: &str, kind: &str) {
    match utils::to_spotify_uri(input, kind) {
        Ok(uri) => println!("{}", uri),
        Err(e) => error!("Cannot build Spotify URI: {}", e),
    }
}

pub fn title(title: &str, channel: Option<&str>) {
    let parsed = utils::parse_youtube_title(title, channel);
    match parsed.artist {
        Some(artist) => info!("artist: {}", artist),
        None => info!("artist: (unknown)"),
    }
    info!("track:  {}", parsed.track);
}
