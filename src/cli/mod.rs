use std::{
    fs, io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use menstyle::{
    auth::AuthError,
    catalog::{Catalog, CatalogError},
    config::StorefrontSettings,
    routes::Route,
    storage::FileStore,
    storefront::{Storefront, StorefrontError},
};
use thiserror::Error;

mod cart;
mod catalog;
mod checkout;
pub(crate) mod logging;
mod render;
mod session;

use logging::LoggingConfig;

#[derive(Debug, Parser)]
#[command(name = "menstyle", about = "MenStyle storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// JSON file holding the cart and session
    #[arg(
        long,
        env = "MENSTYLE_DATA_FILE",
        default_value = ".menstyle/profile.json",
        global = true
    )]
    data_file: PathBuf,

    /// Catalog fixture (YAML); the bundled catalog when omitted
    #[arg(long, env = "MENSTYLE_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, optionally in one category
    Products(catalog::ProductsArgs),

    /// Show one product
    Product(catalog::ProductArgs),

    /// Add a product variant to the cart
    Add(cart::AddArgs),

    /// Remove a row from the cart
    Remove(cart::LineArgs),

    /// Change a row's quantity
    SetQuantity(cart::SetQuantityArgs),

    /// Show the cart
    Cart,

    /// Empty the cart
    Clear,

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// Create an account and sign in
    Register(session::RegisterArgs),

    /// Sign in
    Login(session::LoginArgs),

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami,
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("failed to read catalog {path}: {source}")]
    ReadCatalog { path: PathBuf, source: io::Error },

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("{product} is not available in {option} {value}; choose from {available}")]
    UnavailableOption {
        product: String,
        option: &'static str,
        value: String,
        available: String,
    },

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl Cli {
    /// Load configuration from `.env`, environment and arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) fn run(self) -> Result<(), CliError> {
        let catalog = load_catalog(self.catalog.as_deref())?;
        let settings = StorefrontSettings::default().with_currency(catalog.currency());
        let mut shop = Shop::open(catalog, FileStore::new(self.data_file), settings);
        let mut out = io::stdout().lock();

        match self.command {
            Commands::Products(args) => catalog::products(&shop, &args, &mut out),
            Commands::Product(args) => catalog::product(&shop, &args, &mut out),
            Commands::Add(args) => cart::add(&mut shop, args, &mut out),
            Commands::Remove(args) => cart::remove(&mut shop, &args, &mut out),
            Commands::SetQuantity(args) => cart::set_quantity(&mut shop, &args, &mut out),
            Commands::Cart => cart::show(&shop, &mut out),
            Commands::Clear => cart::clear(&mut shop, &mut out),
            Commands::Checkout(args) => checkout::run(shop, &args, &mut out),
            Commands::Register(args) => session::register(&mut shop, args, &mut out),
            Commands::Login(args) => session::login(&mut shop, args, &mut out),
            Commands::Logout => session::logout(&mut shop, &mut out),
            Commands::Whoami => session::whoami(&shop, &mut out),
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    let Some(path) = path else {
        return Ok(Catalog::bundled()?);
    };

    let yaml = fs::read_to_string(path).map_err(|source| CliError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Catalog::from_yaml(&yaml)?)
}

/// A storefront session for one command, with a wall clock for its timers.
#[derive(Debug)]
pub(crate) struct Shop {
    storefront: Storefront<FileStore>,
    started: Instant,
}

impl Shop {
    fn open(catalog: Catalog, store: FileStore, settings: StorefrontSettings) -> Self {
        let started = Instant::now();

        Shop {
            storefront: Storefront::open(catalog, store, settings, Duration::ZERO),
            started,
        }
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Block until `due_at`, then run whatever timers fell due.
    fn wait_until(&mut self, due_at: Duration) -> Option<Route> {
        thread::sleep(due_at.saturating_sub(self.now()));

        let now = self.now();

        self.storefront.advance(now)
    }

    fn close(self) {
        self.storefront.close();
    }
}
