//! Pineapple Wishlist CLI - inspect and repair customer wishlists.
//!
//! # Usage
//!
//! ```bash
//! # Show a customer's wishlist
//! wishlist get 7712345
//!
//! # Add or remove a product (bare or gid ids)
//! wishlist add 7712345 gid://shopify/Product/901
//! wishlist remove 7712345 901
//!
//! # Print the loaded configuration (token redacted)
//! wishlist config
//! ```
//!
//! Reads the same environment as the server (`SHOPIFY_STORE`,
//! `SHOPIFY_ADMIN_ACCESS_TOKEN`, ...), including a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wishlist")]
#[command(author, version, about = "Pineapple wishlist operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a customer's wishlist as JSON
    Get {
        /// Customer id (bare or gid)
        customer: String,
    },
    /// Add a product to a customer's wishlist
    Add {
        /// Customer id (bare or gid)
        customer: String,
        /// Product id (bare or gid)
        product: String,
    },
    /// Remove a product from a customer's wishlist
    Remove {
        /// Customer id (bare or gid)
        customer: String,
        /// Product id (bare or gid)
        product: String,
    },
    /// Print the loaded configuration
    Config,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wishlist_server=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Get { customer } => commands::wishlist::get(&customer).await,
        Commands::Add { customer, product } => commands::wishlist::add(&customer, &product).await,
        Commands::Remove { customer, product } => {
            commands::wishlist::remove(&customer, &product).await
        }
        Commands::Config => commands::show_config(),
    }
}
