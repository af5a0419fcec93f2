//! Spotify Top Tracks Sync Library
//!
//! This library keeps a Spotify playlist named after the user ("Alice's Top
//! Tracks") in sync with the user's current top tracks. It provides the OAuth
//! handshake, a small Web API client, the sync workflow itself and the HTTP
//! routes that tie everything together.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers (`/`, `/update`, `/callback`, `/redirect`)
//! - `cli` - Command-line entry points (`serve`, `sync`)
//! - `config` - Configuration management and environment variables
//! - `errors` - Error types shared across the crate
//! - `management` - Token cache backends and flash notices
//! - `server` - Router construction and the HTTP listener
//! - `spotify` - Spotify accounts service and Web API client
//! - `sync` - The playlist sync workflow
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and small utilities
//! - `views` - HTML rendering
//!
//! # Example
//!
//! ```
//! use topsync::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> topsync::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod management;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;
pub mod views;

/// A convenient Result type alias for top-level plumbing that may fail.
///
/// Uses a boxed dynamic error trait object with `Send + Sync` bounds so it
/// can cross await points. Domain code uses the typed errors in [`errors`].
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
///
/// # Example
///
/// ```
/// success!("Playlist {} updated", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for unrecoverable failures during startup or in CLI commands.
/// Request handlers must never call it; they log with [`warning!`] instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Token exchange failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
