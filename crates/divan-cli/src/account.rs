//! Login, profile, orders, reviews, and showroom bookings.

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Subcommand;
use divan_api::DEMO_TOKEN;
use divan_core::{
    BookingDraft, Order, OrderStatus, ProfileUpdate, RecordId, ReviewDraft, SessionUser,
    TIME_SLOTS,
};

use crate::app::{clip, fmt_price, fmt_timestamp, App};

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// List your orders, newest first
    List,
    /// Change an order's status (admin)
    Status {
        id: String,
        /// pending, processing, completed or cancelled
        status: OrderStatus,
    },
}

/// Sub-commands available under `profile`.
#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show favorites, recent orders, and (for admins) users
    Show,
    /// Change your name, email, or avatar
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        avatar: Option<String>,
    },
}

/// # Errors
///
/// Returns an error if the credentials are rejected or the session cannot
/// be saved.
pub(crate) async fn run_login(app: &App, email: &str, password: &str) -> anyhow::Result<()> {
    let session = app.api.login(email, password).await?;
    app.sessions().save(&session.user, &session.token)?;
    println!(
        "logged in as {} ({:?})",
        session.user.full_name, session.user.role
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if the session files cannot be removed.
pub(crate) fn run_logout(app: &App) -> anyhow::Result<()> {
    app.sessions().clear()?;
    println!("logged out");
    Ok(())
}

/// # Errors
///
/// Returns an error if nobody is logged in. Sections that fail to load are
/// shown empty.
pub(crate) async fn run_profile_show(app: &App) -> anyhow::Result<()> {
    let user = app.require_session()?;
    let overview = app.api.profile_overview(&user).await;

    println!("{} ({})", user.full_name, user.id);
    println!();
    println!("Favorites:");
    if overview.favorites.is_empty() {
        println!("  none");
    }
    for product in &overview.favorites {
        println!(
            "  {:<10}{}",
            product.id.as_ref().map_or("\u{2014}", RecordId::as_str),
            product.title(app.locale)
        );
    }

    println!();
    println!("Recent orders:");
    print_orders(&overview.recent_orders);

    if let Some(users) = &overview.users {
        println!();
        println!("Users:");
        for u in users {
            println!(
                "  {:<10}{:<30}{}",
                u.id.as_ref().map_or("\u{2014}", RecordId::as_str),
                clip(&u.full_name, 28),
                u.email
            );
        }
    }
    Ok(())
}

/// Write the new profile fields and refresh the stored session name.
///
/// # Errors
///
/// Returns an error if nobody is logged in, a field is blank, or the update
/// request fails.
pub(crate) async fn run_profile_update(
    app: &App,
    name: &str,
    email: &str,
    avatar: Option<&str>,
) -> anyhow::Result<()> {
    let session = app.require_session()?;
    let update = ProfileUpdate {
        full_name: name.to_string(),
        email: email.to_string(),
        avatar: avatar.map(str::to_string),
    };
    let user = app.api.update_profile(&session.id, update).await?;

    let sessions = app.sessions();
    let token = sessions.token()?.unwrap_or_else(|| DEMO_TOKEN.to_string());
    let refreshed = SessionUser {
        full_name: user.full_name.clone(),
        ..session
    };
    sessions.save(&refreshed, &token)?;
    println!("profile updated: {} <{}>", user.full_name, user.email);
    Ok(())
}

fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("  none");
        return;
    }
    for order in orders {
        println!(
            "  {:<10}{:<18}{:<12}{:>6}{:>16}",
            order.id.as_ref().map_or("\u{2014}", RecordId::as_str),
            fmt_timestamp(order.created_at),
            order.status.as_str(),
            order.items.len(),
            fmt_price(order.total)
        );
    }
}

/// # Errors
///
/// Returns an error if nobody is logged in or the orders cannot be fetched.
pub(crate) async fn run_orders_list(app: &App) -> anyhow::Result<()> {
    let user = app.require_session()?;
    let orders = app.api.orders_for_user(&user.id).await?;
    println!(
        "  {:<10}{:<18}{:<12}{:>6}{:>16}",
        "ID", "PLACED", "STATUS", "ITEMS", "TOTAL"
    );
    print_orders(&orders);
    Ok(())
}

/// # Errors
///
/// Returns an error unless an admin is logged in and the update succeeds.
pub(crate) async fn run_orders_status(
    app: &App,
    id: &str,
    status: OrderStatus,
) -> anyhow::Result<()> {
    app.require_admin()?;
    let order = app
        .api
        .set_order_status(&RecordId::from(id), status)
        .await?;
    println!("order {id} is now {}", order.status);
    Ok(())
}

/// Store a review and report the product's refreshed average.
///
/// # Errors
///
/// Returns an error if nobody is logged in, the review is invalid, or it
/// cannot be stored. A failed rating refresh is reported but not fatal.
pub(crate) async fn run_review(
    app: &App,
    product_id: &str,
    rating: f64,
    text: &str,
) -> anyhow::Result<()> {
    let user = app.require_session()?;
    let draft = ReviewDraft {
        product_id: RecordId::from(product_id),
        user_id: user.id,
        rating,
        text: text.to_string(),
    };
    let submission = app.api.submit_review(draft).await?;
    println!("review saved");
    match submission.rating {
        Ok(average) => println!("product rating is now {average:.1}"),
        Err(e) => println!("the product rating could not be refreshed: {e}"),
    }
    Ok(())
}

/// Book a showroom visit for one product.
///
/// # Errors
///
/// Returns an error if nobody is logged in, the time is not a bookable slot,
/// or the bookings endpoint is unset or fails.
pub(crate) async fn run_book(
    app: &App,
    product_id: &str,
    date: NaiveDate,
    time: &str,
) -> anyhow::Result<()> {
    let user = app.require_session()?;
    let draft = BookingDraft {
        user_id: user.id.to_string(),
        product_id: product_id.to_string(),
        date: Some(date),
        time: time.to_string(),
    };
    let booking = app
        .api
        .create_booking(draft)
        .await
        .with_context(|| format!("booking failed (slots: {})", TIME_SLOTS.join(", ")))?;
    println!(
        "visit booked for {} at {} ({:?})",
        booking.date, booking.time, booking.status
    );
    Ok(())
}
