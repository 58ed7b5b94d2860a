//! `variants`: admin tooling over product and cart JSON payloads.
//!
//! Every command reads its inputs from files, prints its result as JSON on
//! stdout, and logs to stderr.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::SelectionArg;

#[derive(Parser)]
#[command(name = "variants")]
#[command(about = "Variant matrix and cart tooling for storefront products")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate a product's inventory matrix from its variant groups
    Sync {
        /// Product payload (JSON)
        product: PathBuf,
        /// Overwrite the input file instead of printing
        #[arg(long)]
        in_place: bool,
    },
    /// Effective stock and price for a selection
    Resolve {
        product: PathBuf,
        /// Selected option, as Group=Value (repeatable)
        #[arg(short = 's', long = "select", value_name = "GROUP=VALUE")]
        select: Vec<SelectionArg>,
    },
    /// Composite key for a product id and selection
    Key {
        product_id: String,
        #[arg(short = 's', long = "select", value_name = "GROUP=VALUE")]
        select: Vec<SelectionArg>,
    },
    /// Add a selection to a cart, checking stock
    AddToCart {
        /// Cart payload (JSON); a missing file is an empty cart
        cart: PathBuf,
        product: PathBuf,
        #[arg(short = 's', long = "select", value_name = "GROUP=VALUE")]
        select: Vec<SelectionArg>,
        #[arg(short = 'q', long, default_value_t = 1)]
        quantity: u32,
        /// Overwrite the cart file instead of printing
        #[arg(long)]
        in_place: bool,
    },
}

fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync { product, in_place } => commands::sync(&product, in_place),
        Commands::Resolve { product, select } => commands::resolve(&product, &select),
        Commands::Key { product_id, select } => commands::key(&product_id, &select),
        Commands::AddToCart {
            cart,
            product,
            select,
            quantity,
            in_place,
        } => commands::add_to_cart(&cart, &product, &select, quantity, in_place),
    }
}
