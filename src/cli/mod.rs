//! # CLI Module
//!
//! Command-line entry points of topsync.
//!
//! - [`serve`] - Runs the web server (`/`, `/update`, `/callback`, `/redirect`)
//! - [`sync`] - Runs the playlist sync once from the terminal, using the
//!   token a previous `serve --cache file` session stored on disk
//!
//! ## Usage Patterns
//!
//! ```bash
//! topsync serve --open              # Sign in and sync from the browser
//! topsync serve --cache file        # Keep the token across restarts
//! topsync sync                      # Re-sync with the cached token
//! ```
//!
//! Fatal problems (missing configuration, failed sync) are reported with
//! the crate's `error!` macro, which exits the process.

mod serve;
mod sync;

pub use serve::serve;
pub use sync::sync;

/// Where `serve` keeps the access token.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// Lost when the server stops.
    #[default]
    Memory,
    /// Stored in the local data directory, shared with `topsync sync`.
    File,
}
