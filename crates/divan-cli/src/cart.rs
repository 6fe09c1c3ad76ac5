//! Cart command handlers. The cart lives in the local data directory until
//! checkout turns it into a remote order.

use anyhow::Context as _;
use clap::Subcommand;
use divan_core::RecordId;

use crate::app::{clip, fmt_price, App};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart lines and the total
    Show,
    /// Add a product, or raise its quantity if already in the cart
    Add {
        id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity; anything below 1 removes the line
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { id: String },
    /// Place an order for the cart and empty it
    Checkout,
}

/// # Errors
///
/// Returns an error if the local cart cannot be read.
pub(crate) fn run_cart_show(app: &App) -> anyhow::Result<()> {
    let cart = app.cart();
    let lines = cart.lines()?;
    if lines.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    println!(
        "{:<10}{:<40}{:>6}{:>16}",
        "ID", "TITLE", "QTY", "SUBTOTAL"
    );
    for line in &lines {
        println!(
            "{:<10}{:<40}{:>6}{:>16}",
            line.product_id().map_or("\u{2014}", RecordId::as_str),
            clip(line.product.title(app.locale), 36),
            line.quantity,
            fmt_price(line.subtotal()),
        );
    }
    println!();
    println!(
        "{} item(s), total {}",
        cart.item_count()?,
        fmt_price(cart.total()?)
    );
    Ok(())
}

/// Fetch the product and add it to the cart.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched or the cart cannot be
/// written.
pub(crate) async fn run_cart_add(app: &App, id: &str, quantity: u32) -> anyhow::Result<()> {
    let id = RecordId::from(id);
    let product = app
        .api
        .products()
        .get_by_id(&id)
        .await
        .with_context(|| format!("failed to load product {id}"))?;
    let title = product.title(app.locale).to_string();

    let cart = app.cart();
    cart.add_quantity(product, quantity)?;
    println!(
        "added {quantity} \u{00d7} {title}; cart total {}",
        fmt_price(cart.total()?)
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if the cart cannot be read or written.
pub(crate) fn run_cart_update(app: &App, id: &str, quantity: i64) -> anyhow::Result<()> {
    let cart = app.cart();
    if !cart.update_quantity(&RecordId::from(id), quantity)? {
        println!("{id} is not in the cart");
        return Ok(());
    }
    if quantity < 1 {
        println!("removed {id} from cart");
    } else {
        println!("set {id} quantity to {quantity}");
    }
    println!("cart total {}", fmt_price(cart.total()?));
    Ok(())
}

/// # Errors
///
/// Returns an error if the cart cannot be read or written.
pub(crate) fn run_cart_remove(app: &App, id: &str) -> anyhow::Result<()> {
    let cart = app.cart();
    if !cart.remove(&RecordId::from(id))? {
        println!("{id} is not in the cart");
        return Ok(());
    }
    println!("removed {id} from cart; total {}", fmt_price(cart.total()?));
    Ok(())
}

/// Submit the cart as a pending order for the logged-in user.
///
/// The local cart is only cleared after the order is accepted.
///
/// # Errors
///
/// Returns an error if nobody is logged in, the cart is empty, or the order
/// request fails.
pub(crate) async fn run_cart_checkout(app: &App) -> anyhow::Result<()> {
    let user = app.require_session()?;
    let cart = app.cart();
    let lines = cart.lines()?;
    if lines.is_empty() {
        anyhow::bail!("cart is empty");
    }

    let order = app
        .api
        .place_order(&user.id, lines)
        .await
        .context("checkout failed; the cart was kept")?;
    cart.clear()?;

    println!(
        "order {} placed: {} ({})",
        order.id.as_ref().map_or("\u{2014}", RecordId::as_str),
        fmt_price(order.total),
        order.status
    );
    Ok(())
}
