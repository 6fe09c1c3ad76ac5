mod account;
mod admin;
mod app;
mod cart;
mod catalog;
mod favorites;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use divan_core::Locale;
use tracing_subscriber::EnvFilter;

use crate::account::{OrdersCommands, ProfileCommands};
use crate::admin::AdminCommands;
use crate::app::App;
use crate::cart::CartCommands;
use crate::catalog::CatalogArgs;
use crate::favorites::FavoritesCommands;

#[derive(Debug, Parser)]
#[command(name = "divan")]
#[command(about = "Divan furniture storefront client")]
struct Cli {
    /// Language for titles and descriptions: kg, ru or en
    #[arg(long, global = true)]
    locale: Option<Locale>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog(CatalogArgs),
    /// Show a product with its reviews and related items
    Product { id: String },
    /// Manage locally stored favorites
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Manage the local cart and check out
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// View or update orders
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DIVAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Review a product
    Review {
        product_id: String,
        /// 0 to 5
        #[arg(long)]
        rating: f64,
        #[arg(long)]
        text: String,
    },
    /// Book a showroom visit to see a product
    Book {
        product_id: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Hourly slot from 09:00 to 17:00
        #[arg(long)]
        time: String,
    },
    /// Back-office commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = divan_core::load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("no command given; run `divan --help`");
        return Ok(());
    };

    tracing::debug!(
        env = %config.env,
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );
    let app = App::new(config, cli.locale)?;

    match command {
        Commands::Catalog(args) => catalog::run_catalog(&app, &args).await,
        Commands::Product { id } => catalog::run_product(&app, &id).await,
        Commands::Favorites { command } => match command {
            FavoritesCommands::List => favorites::run_favorites_list(&app).await,
            FavoritesCommands::Toggle { id } => favorites::run_favorites_toggle(&app, &id),
        },
        Commands::Cart { command } => match command {
            CartCommands::Show => cart::run_cart_show(&app),
            CartCommands::Add { id, quantity } => cart::run_cart_add(&app, &id, quantity).await,
            CartCommands::Update { id, quantity } => cart::run_cart_update(&app, &id, quantity),
            CartCommands::Remove { id } => cart::run_cart_remove(&app, &id),
            CartCommands::Checkout => cart::run_cart_checkout(&app).await,
        },
        Commands::Orders { command } => match command {
            OrdersCommands::List => account::run_orders_list(&app).await,
            OrdersCommands::Status { id, status } => {
                account::run_orders_status(&app, &id, status).await
            }
        },
        Commands::Login { email, password } => account::run_login(&app, &email, &password).await,
        Commands::Logout => account::run_logout(&app),
        Commands::Profile { command } => match command {
            ProfileCommands::Show => account::run_profile_show(&app).await,
            ProfileCommands::Update {
                name,
                email,
                avatar,
            } => account::run_profile_update(&app, &name, &email, avatar.as_deref()).await,
        },
        Commands::Review {
            product_id,
            rating,
            text,
        } => account::run_review(&app, &product_id, rating, &text).await,
        Commands::Book {
            product_id,
            date,
            time,
        } => account::run_book(&app, &product_id, date, &time).await,
        Commands::Admin { command } => match command {
            AdminCommands::Stats => admin::run_admin_stats(&app).await,
            AdminCommands::SaveProduct(args) => admin::run_admin_save_product(&app, &args).await,
            AdminCommands::DeleteProduct { id } => {
                admin::run_admin_delete_product(&app, &id).await
            }
            AdminCommands::RefreshRating { id } => {
                admin::run_admin_refresh_rating(&app, &id).await
            }
            AdminCommands::Seed { file, delay_ms } => {
                admin::run_admin_seed(&app, &file, delay_ms).await
            }
        },
    }
}
