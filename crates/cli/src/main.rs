//! RocketShoes CLI - Command-line front end for the cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rocketshoes cart show
//!
//! # Add one unit of product 3
//! rocketshoes cart add 3
//!
//! # Set product 3 to 4 units
//! rocketshoes cart update 3 4
//!
//! # Remove product 3
//! rocketshoes cart remove 3
//!
//! # Machine-readable output
//! rocketshoes --json cart show
//! ```
//!
//! Each invocation restores the cart from `ROCKETSHOES_DATA_DIR`, runs one
//! operation and prints the resulting cart. Warnings raised by the operation
//! go to stderr and turn the exit status to 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::error::AppError;
use rocketshoes_storefront::notify::{ChannelNotifier, drain};
use rocketshoes_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes cart")]
struct Cli {
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New amount (zero or below is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Errors that stop the CLI before it can print a cart.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            report_fatal(&e.to_string());
            return ExitCode::from(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so stdout stays parseable with --json.
    // Defaults to errors only for the library if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_storefront=error,rocketshoes=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            if let CliError::App(app) = &e {
                app.capture();
            }
            report_fatal(&e.to_string());
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<ExitCode, CliError> {
    let (notifier, mut rx) = ChannelNotifier::new();
    let state = AppState::new(config, Arc::new(notifier)).await?;

    match cli.command {
        Commands::Cart { action } => commands::cart::apply(state.cart(), action).await,
    }

    let notifications = drain(&mut rx);
    let cart = state.cart().cart().await;

    for notification in &notifications {
        report_warning(notification.message());
    }

    let output = if cli.json {
        commands::cart::render_json(&cart, &notifications)?
    } else {
        commands::cart::render_table(&cart)
    };
    print_output(&output);

    Ok(if notifications.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

#[allow(clippy::print_stderr)]
fn report_warning(message: &str) {
    eprintln!("warning: {message}");
}

#[allow(clippy::print_stderr)]
fn report_fatal(message: &str) {
    eprintln!("error: {message}");
}
