//! Vybe companion backend library
//!
//! This library backs the `vybe` binary: a small JSON HTTP service that the
//! Vybe web app and browser extension talk to, plus a command-line front end
//! for the same functionality. It generates group join codes, offers string
//! utilities (slugs, Spotify URIs, YouTube title parsing), hands out Spotify
//! client-credentials tokens and bridges a captured YouTube Music session.
//!
//! # Modules
//!
//! - `api` - HTTP handlers, extractors and the JSON error type
//! - `cli` - Command-line interface implementations
//! - `codes` - Join code generation
//! - `config` - Settings loaded from `.env` and `APP_` environment variables
//! - `server` - Router assembly and the server loop
//! - `spotify` - Spotify client-credentials token fetcher
//! - `types` - Request and response bodies shared by the API and the CLI
//! - `utils` - UUIDs, slugs, Spotify URIs and YouTube titles
//! - `ytm` - Captured-header store and YouTube Music client
//!
//! # Example
//!
//! ```
//! use vybe::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> vybe::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(settings).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod codes;
pub mod config;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod ytm;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors in the binary; library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
