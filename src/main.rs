//! Maria Pinina storefront - command-line client

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinina_storefront::api::{ApiClient, PageRequest};
use pinina_storefront::auth::{spawn_renewal, Session};
use pinina_storefront::checkout::{revalidate_prices, Checkout, OrderResult};
use pinina_storefront::config::Settings;
use pinina_storefront::domain::aggregates::{Product, ProductQuery, SortOrder, UpdateOutcome};
use pinina_storefront::domain::value_objects::Money;
use pinina_storefront::forms::{LoginForm, RegisterForm};
use pinina_storefront::storage::{MemoryStore, SessionStorage};
use pinina_storefront::store::CartStore;

#[derive(Debug, Parser)]
#[command(name = "pinina", about = "Maria Pinina storefront client", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the catalog
    #[command(subcommand)]
    Products(ProductsCommand),
    /// List categories
    Categories,
    /// Log in and store the credentials
    Login { #[arg(long)] email: String, #[arg(long)] password: String },
    /// Create an account
    Register {
        #[arg(long)] name: String,
        #[arg(long)] surname: String,
        #[arg(long)] email: String,
        #[arg(long)] password: String,
    },
    /// Forget the stored credentials
    Logout,
    /// Show the logged-in user
    Me,
    /// Inspect or edit the cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Place the cart's orders, or one seller's order
    Checkout { #[arg(long)] seller: Option<String> },
    /// List my orders
    Orders,
}

#[derive(Debug, Subcommand)]
enum ProductsCommand {
    Random {
        #[arg(long, default_value_t = 20)] limit: u32,
        #[arg(long, default_value_t = 0)] offset: u32,
        #[arg(long)] min_price: Option<Decimal>,
        #[arg(long)] max_price: Option<Decimal>,
        #[arg(long, value_enum)] price_order: Option<SortOrder>,
    },
    Search { term: String, #[arg(long, default_value_t = 20)] limit: u32 },
    Category { id: String, #[arg(long, default_value_t = 20)] limit: u32 },
    Show { id: String },
}

#[derive(Debug, Subcommand)]
enum CartCommand {
    Show,
    Add { product_id: String, #[arg(long, default_value_t = 1, allow_negative_numbers = true)] quantity: i64 },
    Remove { seller_id: String, product_id: String },
    Set { seller_id: String, product_id: String, #[arg(allow_negative_numbers = true)] quantity: i64 },
    Clear { #[arg(long)] seller: Option<String> },
    /// Compare cart prices with the live catalog
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&cli.settings.log_level).unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = cli.settings.open_storage().context("opening local storage")?;
    let api = cli.settings.api_client(storage.clone())?;
    // Renew an expired access token before running the command.
    if let Err(e) = api.refresh_if_expired().await { warn!(error = %e, "could not renew access token"); }
    // The display-name cache lives only as long as this process.
    let session_cache = SessionStorage::new(MemoryStore::shared());

    match cli.command {
        Command::Products(cmd) => products(&api, cmd).await?,
        Command::Categories => {
            for c in api.categories().await? { println!("{}\t{}", c.id, c.name); }
        }
        Command::Login { email, password } => {
            let mut session = Session::new(session_cache.clone());
            let user = session.login(&api, &LoginForm { email, password }).await?;
            println!("Welcome, {}", user.full_name());
        }
        Command::Register { name, surname, email, password } => {
            let form = RegisterForm { name, surname, email, password_confirmation: password.clone(), password };
            api.register(&form).await?;
            println!("Account created, check your inbox to confirm it");
        }
        Command::Logout => {
            Session::new(session_cache.clone()).logout(&api)?;
            println!("Logged out");
        }
        Command::Me => {
            let mut session = Session::new(session_cache.clone());
            let Some(user) = session.hydrate(&api).await.clone().into_user() else { bail!("not logged in") };
            println!("{} <{}> [{}]", user.full_name(), user.email, user.role);
        }
        Command::Cart(cmd) => cart(&api, CartStore::load(storage.clone()), cmd).await?,
        Command::Checkout { seller } => {
            let mut cart = CartStore::load(storage.clone());
            let _renewal = spawn_renewal(api.clone(), cli.settings.renew_interval());
            let checkout = Checkout::new(api.clone(), cli.settings.payment_method).with_clear_policy(cli.settings.checkout_clear);
            let report = checkout.checkout(&mut cart, seller.as_deref()).await;
            for outcome in &report.outcomes {
                let result = match &outcome.result {
                    OrderResult::Submitted { order_id } => format!("placed as {order_id}"),
                    OrderResult::Failed => "failed".to_string(),
                    OrderResult::NotAttempted => "not attempted".to_string(),
                };
                println!("{}\t{}\t{}", outcome.seller_id, outcome.total, result);
            }
            if !report.is_success() { bail!("checkout {:?}", report.status); }
        }
        Command::Orders => {
            let mut session = Session::new(session_cache.clone());
            let Some(user) = session.hydrate(&api).await.clone().into_user() else { bail!("not logged in") };
            for o in api.orders_by_user(&user.id, PageRequest::default()).await?.data {
                println!("{}\t{:?}\t{}", o.id, o.status, o.total.map(|t| t.to_string()).unwrap_or_default());
            }
        }
    }
    Ok(())
}

async fn products(api: &ApiClient, cmd: ProductsCommand) -> Result<()> {
    let list = match cmd {
        ProductsCommand::Random { limit, offset, min_price, max_price, price_order } => {
            let query = ProductQuery {
                min_price: min_price.map(Money::new), max_price: max_price.map(Money::new), price_order,
                ..ProductQuery::page(limit, offset)
            };
            api.random_products(&query).await?.data
        }
        ProductsCommand::Search { term, limit } => api.search_products(&term, &ProductQuery::page(limit, 0)).await?.data,
        ProductsCommand::Category { id, limit } => api.products_by_category(&id, &ProductQuery::page(limit, 0)).await?.data,
        ProductsCommand::Show { id } => vec![api.product(&id).await?],
    };
    for p in &list { print_product(p); }
    Ok(())
}

fn print_product(p: &Product) {
    let state = if p.is_available() { "" } else { " (unavailable)" };
    println!("{}\t{}\t{}\tby {}{}", p.id, p.name, p.price, p.user.display_name(), state);
}

async fn cart(api: &ApiClient, mut cart: CartStore, cmd: CartCommand) -> Result<()> {
    match cmd {
        CartCommand::Show => {}
        CartCommand::Add { product_id, quantity } => {
            let product = api.product(&product_id).await?;
            if !product.is_available() { bail!("{} is not available", product.name); }
            cart.add_item(product.snapshot(), quantity)?;
        }
        CartCommand::Remove { seller_id, product_id } => {
            if !cart.remove_item(&seller_id, &product_id) { println!("Nothing to remove"); }
        }
        CartCommand::Set { seller_id, product_id, quantity } => {
            if cart.update_item_quantity(&seller_id, &product_id, quantity)? == UpdateOutcome::NotFound {
                println!("Nothing to update");
            }
        }
        CartCommand::Clear { seller } => match seller {
            Some(seller) => { cart.clear_order(&seller); }
            None => cart.clear_cart(),
        },
        CartCommand::Verify => {
            for d in revalidate_prices(api, cart.state()).await? {
                println!("{}\t{}\tcart {} -> now {}", d.seller_id, d.product_id, d.cart_price, d.live_price);
            }
            return Ok(());
        }
    }
    for order in cart.orders() {
        println!("{} ({})\t{}", order.seller_name(), order.seller_id(), order.total());
        for item in order.items() {
            println!("  {}\t{} x {}\t{}", item.product.id, item.quantity, item.product.price, item.line_total());
        }
    }
    println!("Total\t{}", cart.total_amount());
    Ok(())
}
