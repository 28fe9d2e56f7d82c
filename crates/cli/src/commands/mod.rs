//! CLI command implementations.

pub mod wishlist;

use thiserror::Error;
use wishlist_core::GidError;
use wishlist_server::config::{ConfigError, WishlistConfig};
use wishlist_server::wishlist::WishlistError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An id argument could not be normalized.
    #[error("Invalid id: {0}")]
    InvalidId(#[from] GidError),

    /// The wishlist operation failed.
    #[error(transparent)]
    Wishlist(#[from] WishlistError),

    /// Output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Print the configuration the server would start with.
///
/// # Errors
///
/// Returns `CliError::Config` if the environment is incomplete.
#[allow(clippy::print_stdout)]
pub fn show_config() -> Result<(), CliError> {
    let config = WishlistConfig::from_env()?;
    println!("{config:#?}");
    Ok(())
}
