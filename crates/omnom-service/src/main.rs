//! Main entry point for the OmNomNom order notifier.
//!
//! Serves the order dashboard and texts customers whenever an order's
//! status changes.

use clap::Parser;
use omnom_config::Config;
use omnom_core::OrderServiceBuilder;
use std::path::PathBuf;
use std::sync::Arc;

mod server;
mod views;

/// Command-line arguments for the order notifier.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	// RUST_LOG wins over --log-level
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started omnom");

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(
		"Loaded configuration [messaging: {}]",
		config.messaging.primary
	);

	let server_config = config.server.clone();
	let orders = Arc::new(OrderServiceBuilder::new(config).build()?);

	tokio::select! {
		result = server::start_server(server_config, orders) => {
			tracing::info!("Server finished");
			result?;
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Stopped omnom");
	Ok(())
}
