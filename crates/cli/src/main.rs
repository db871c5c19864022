//! Grocer CLI - browse the catalog, manage the cart and ask the assistant.
//!
//! # Usage
//!
//! ```bash
//! # Browse rice products, cheapest first, two pages
//! grocer browse --search rice --sort price-low --pages 2
//!
//! # List categories
//! grocer categories
//!
//! # Cart
//! grocer cart add 7 --quantity 2
//! grocer cart update 7 5
//! grocer cart remove 7
//! grocer cart show
//! grocer cart clear
//!
//! # Shopping assistant
//! grocer chat "what goes well with basmati rice?"
//! ```
//!
//! The API base URL comes from `--api-url` or `GROCER_API_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use grocer_client::{DEFAULT_API_URL, StorefrontApi};
use grocer_core::SortKey;

mod commands;

#[derive(Parser)]
#[command(name = "grocer")]
#[command(author, version, about = "Grocer storefront CLI")]
struct Cli {
    /// Storefront API base URL
    #[arg(long, env = "GROCER_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog with search, category filter and sort
    Browse {
        /// Text matched against product name and brand
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact category
        #[arg(short, long, default_value = "")]
        category: String,

        /// Sort order (`name`, `price-low`, `price-high`, `discount`)
        #[arg(long, default_value = "name", value_parser = parse_sort)]
        sort: SortKey,

        /// Number of pages to show
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// List product categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Ask the shopping assistant
    Chat {
        /// Message to send
        message: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines, count and total
    Show,
    /// Add a product
    Add {
        /// Product id
        product_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity
    Update {
        /// Product id
        product_id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Product id
        product_id: String,
    },
    /// Remove every line
    Clear,
}

fn parse_sort(raw: &str) -> Result<SortKey, String> {
    let key = SortKey::parse(raw);
    if key.as_str() == raw {
        Ok(key)
    } else {
        Err(format!(
            "unknown sort '{raw}' (expected name, price-low, price-high or discount)"
        ))
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let api = StorefrontApi::new(&cli.api_url)?;

    match cli.command {
        Commands::Browse {
            search,
            category,
            sort,
            pages,
        } => commands::catalog::browse(&api, search, category, sort, pages).await?,
        Commands::Categories => commands::catalog::categories(&api).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(api).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(api, &product_id, quantity).await?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(api, &product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(api, &product_id).await?,
            CartAction::Clear => commands::cart::clear(api).await?,
        },
        Commands::Chat { message } => commands::chat::ask(&api, &message).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("price-high"), Ok(SortKey::PriceHigh));
        assert!(parse_sort("cheapest").is_err());
    }

    #[test]
    fn test_cart_add_defaults_to_one() {
        let cli = Cli::try_parse_from(["grocer", "cart", "add", "7"]).expect("parse");
        match cli.command {
            Commands::Cart {
                action: CartAction::Add { quantity, .. },
            } => assert_eq!(quantity, 1),
            _ => panic!("expected cart add"),
        }
    }
}
