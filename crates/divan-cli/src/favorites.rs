use clap::Subcommand;
use divan_core::RecordId;

use crate::app::App;
use crate::catalog::print_product_table;

/// Sub-commands available under `favorites`.
#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    /// List favorited products
    List,
    /// Add a product to favorites, or remove it if already there
    Toggle { id: String },
}

/// # Errors
///
/// Returns an error if the local favorites cannot be read.
pub(crate) async fn run_favorites_list(app: &App) -> anyhow::Result<()> {
    let ids = app.favorites().ids()?;
    if ids.is_empty() {
        println!("no favorites yet; add one with `divan favorites toggle <id>`");
        return Ok(());
    }

    let products = app.api.favorite_products(&ids).await;
    let refs: Vec<_> = products.iter().collect();
    print_product_table(app, &refs);

    let missing = ids.len().saturating_sub(products.len());
    if missing > 0 {
        println!();
        println!("{missing} favorite(s) could not be loaded");
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if `id` is blank or the favorites cannot be written.
pub(crate) fn run_favorites_toggle(app: &App, id: &str) -> anyhow::Result<()> {
    let id = RecordId::from(id.trim());
    if app.favorites().toggle(&id)? {
        println!("added {id} to favorites");
    } else {
        println!("removed {id} from favorites");
    }
    Ok(())
}
