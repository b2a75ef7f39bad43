//! Nimbus - A weather alert notifier.
//!
//! Nimbus polls a weather alert service, keeps track of which alerts are
//! active and tells every registered user when that changes.
//!
//! # Overview
//!
//! On every tick the current alerts are fetched and compared with the last
//! known ones. The difference (alerts that started and alerts that ended) is
//! handed to each user, who forwards it to the reactions they subscribed to.
//!
//! # Features
//!
//! - **Mail**: A summary of the alerts that started and ended
//! - **Push**: One short piece of advice per new alert, on the user's device topic
//! - **Outfit Suggestion**: The user's outfit suggestion is recomputed on every change
//! - **Failure Isolation**: A failing channel never prevents the other ones from running
//! - **YAML Configuration**: Simple configuration file format with environment variable support
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! weather:
//!   url: "https://weather.example.com"
//!   api_key: "your-api-key"
//!   location: "Buenos Aires"
//!   polling_interval: 86400
//!
//! mail:
//!   url: "https://mail-relay.example.com/send"
//!
//! push:
//!   url: "https://ntfy.sh"
//!
//! users:
//!   - id: "alice"
//!     email: "alice@example.com"
//!     push_topic: "alice-weather"
//!     subscriptions: [mail, push, suggestion]
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `NIMBUS_` prefix:
//!
//! ```bash
//! export NIMBUS_WEATHER__API_KEY="your-api-key"
//! export NIMBUS_WEATHER__POLLING_INTERVAL=3600
//! export NIMBUS_DISPATCH__CONCURRENT_USERS=true
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Refresh forever
//! nimbus --config config.yaml
//!
//! # Refresh once and exit
//! nimbus --config config.yaml --once
//! ```
//!
//! # Logging
//!
//! Logs are written through `env_logger` at `info` level unless `RUST_LOG`
//! says otherwise.

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{config::Config, scheduler::Scheduler};

mod alerts;
mod config;
mod dispatch;
mod notifications;
mod scheduler;
mod subscribers;
mod suggestions;
mod users;
mod weather;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: String,

    /// Run a single refresh cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting nimbus {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let scheduler = match Scheduler::from_config(config).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize scheduler: {}", e);
            return;
        }
    };

    if args.once {
        match scheduler.run_cycle().await {
            Ok(report) => info!(
                "{}/{} users notified, {} failures",
                report.notified,
                report.users,
                report.failures.len()
            ),
            Err(_) => std::process::exit(1),
        }
        return;
    }

    scheduler.start().await;
}
