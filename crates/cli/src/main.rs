//! Catalogue CLI - Terminal front end for the storefront and admin console.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password is read from stdin when omitted)
//! catalogue login -e ana@example.com
//!
//! # Browse the catalog at a storefront URL, then change filters
//! catalogue catalog "/catalog?categories=men&sort=price_low"
//! catalogue catalog /catalog --search shirt --color Blue --page 2
//!
//! # Product detail and wishlist
//! catalogue product 42
//! catalogue wishlist toggle 42
//!
//! # Admin console
//! catalogue admin stats
//! catalogue admin products --search linen
//! catalogue admin delete-product 42
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami`, `profile` - Account
//! - `store`, `catalog`, `product`, `wishlist`, `showrooms` - Storefront
//! - `admin` - Back-office screens
//!
//! # Environment Variables
//!
//! Client settings are read by `ClientConfig::from_env` (`CATALOGUE_API_URL`,
//! `CATALOGUE_DATA_DIR`, ...). Logging honours `RUST_LOG`;
//! `CATALOGUE_LOG_FORMAT=json` switches to JSON lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "catalogue")]
#[command(author, version, about = "Catalogue storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        name: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Browse the catalog
    Catalog(commands::shop::CatalogArgs),
    /// Show a product
    Product {
        id: i64,
    },
    /// Manage your wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
    /// List showrooms
    Showrooms,
    /// Show the store name and contact details
    Store,
    /// Back-office screens (admins only)
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Change name, email or password
    Update {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    Add { product_id: i64 },
    Remove { product_id: i64 },
    Toggle { product_id: i64 },
}

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "catalogue=info,catalogue_client=info";

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // Logs go to stderr so command output stays clean on stdout
    let json = std::env::var("CATALOGUE_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_env()?;
    match cli.command {
        Commands::Login { email, password } => {
            commands::account::login(&ctx, &email, password).await?;
        }
        Commands::Register {
            email,
            name,
            password,
        } => commands::account::register(&ctx, &email, &name, password).await?,
        Commands::Logout => commands::account::logout(&ctx)?,
        Commands::Whoami => commands::account::whoami(&ctx)?,
        Commands::Profile { action } => match action {
            None => commands::account::show_profile(&ctx).await?,
            Some(ProfileAction::Update {
                name,
                email,
                password,
            }) => commands::account::update_profile(&ctx, name, email, password).await?,
        },
        Commands::Catalog(args) => commands::shop::catalog(&ctx, args).await?,
        Commands::Product { id } => commands::shop::product(&ctx, id).await?,
        Commands::Wishlist { action } => match action {
            None => commands::shop::wishlist(&ctx).await?,
            Some(WishlistAction::Add { product_id }) => {
                commands::shop::wishlist_add(&ctx, product_id).await?;
            }
            Some(WishlistAction::Remove { product_id }) => {
                commands::shop::wishlist_remove(&ctx, product_id).await?;
            }
            Some(WishlistAction::Toggle { product_id }) => {
                commands::shop::wishlist_toggle(&ctx, product_id).await?;
            }
        },
        Commands::Showrooms => commands::shop::showrooms(&ctx).await?,
        Commands::Store => commands::shop::store(&ctx).await?,
        Commands::Admin { action } => commands::admin::run(&ctx, action).await?,
    }
    Ok(())
}
