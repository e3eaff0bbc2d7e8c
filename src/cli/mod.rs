//! # CLI Module
//!
//! Command implementations behind the `vybe` binary. `main.rs` parses the
//! arguments and dispatches here.
//!
//! - [`serve`] - runs the HTTP service with tracing enabled
//! - [`codes`], [`uuid`], [`slug`], [`spotify_uri`], [`title`] - the string
//!   utilities of the service, usable offline
//! - [`ytm_connect`], [`ytm_disconnect`], [`ytm_status`] - manage the
//!   captured YouTube Music session on this machine
//!
//! Output goes through the crate's console macros (`info!`, `success!`,
//! `warning!`, `error!`); fatal errors exit with status 1.
//!
//! ```bash
//! vybe serve --address 0.0.0.0:8000
//! vybe codes -n 5
//! vybe spotify-uri https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC
//! vybe ytm status
//! ```

mod serve;
mod tools;
mod ytm;

pub use serve::serve;
pub use tools::{codes, slug, spotify_uri, title, uuid};
pub use ytm::connect as ytm_connect;
pub use ytm::disconnect as ytm_disconnect;
pub use ytm::status as ytm_status;
