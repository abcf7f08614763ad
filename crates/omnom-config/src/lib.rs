//! Configuration for the OmNomNom order notifier.
//!
//! Configuration is loaded from TOML. String values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`, which is how the
//! messaging gateway API key is normally supplied at process start.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use omnom_types::{Order, OrderSeed, OrderStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// HTTP listener settings.
	#[serde(default)]
	pub server: ServerConfig,
	/// Outbound SMS gateway settings.
	pub messaging: MessagingConfig,
	/// Orders loaded into the store at startup.
	#[serde(default = "default_orders")]
	pub orders: Vec<OrderSeed>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: default_host(),
			port: default_port(),
		}
	}
}

fn default_host() -> String {
	"0.0.0.0".to_string()
}

fn default_port() -> u16 {
	8080
}

/// Outbound messaging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagingConfig {
	/// Sender id shown to customers.
	#[serde(default = "default_originator")]
	pub originator: String,
	/// Which implementation to send through.
	pub primary: String,
	/// Map of gateway implementation names to their raw configuration.
	pub implementations: HashMap<String, toml::Value>,
}

fn default_originator() -> String {
	"OmNomNom".to_string()
}

/// Orders available when the configuration does not list any.
pub fn default_orders() -> Vec<OrderSeed> {
	vec![
		OrderSeed {
			id: None,
			name: "Hannah Hungry".to_string(),
			phone: "+319876543210".to_string(),
			items: "1 x Hipster Burger + Fries".to_string(),
			status: OrderStatus::Pending,
		},
		OrderSeed {
			id: None,
			name: "Mike Madeater".to_string(),
			phone: "+319876543211".to_string(),
			items: "1 x Chef Special Mozzarella Pizza".to_string(),
			status: OrderStatus::Pending,
		},
	]
}

/// Largest configuration document accepted, per file.
const MAX_DOCUMENT_SIZE: usize = 1024 * 1024;

/// Parses one TOML document without resolving environment variables.
pub(crate) fn parse_document(text: &str) -> Result<toml::Table, ConfigError> {
	if text.len() > MAX_DOCUMENT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			text.len(),
			MAX_DOCUMENT_SIZE
		)));
	}
	Ok(toml::from_str(text)?)
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of `VAR_NAME`, or with the default in
/// `${VAR_NAME:-default}` when the variable is unset. Substituted values are
/// inserted verbatim and never scanned again.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match (std::env::var(var_name.as_str()), default_value) {
			(Ok(v), _) => v,
			(Err(_), Some(default)) => default.to_string(),
			(Err(_), None) => {
				return Err(ConfigError::Validation(format!(
					"Environment variable '{}' not found",
					var_name.as_str()
				)));
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

/// Resolves environment variables in every string held by `value`.
fn resolve_env_in_value(value: &mut toml::Value) -> Result<(), ConfigError> {
	match value {
		toml::Value::String(text) => *text = resolve_env_vars(text)?,
		toml::Value::Array(items) => {
			for item in items {
				resolve_env_in_value(item)?;
			}
		},
		toml::Value::Table(table) => {
			for (_, item) in table.iter_mut() {
				resolve_env_in_value(item)?;
			}
		},
		_ => {},
	}
	Ok(())
}

impl Config {
	/// Builds a configuration from a merged document.
	///
	/// This is the only place environment variables are resolved, so each
	/// reference is expanded exactly once.
	pub(crate) fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
		let mut document = toml::Value::Table(table);
		resolve_env_in_value(&mut document)?;

		let config: Config = document.try_into()?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Builds the order records to seed the store with.
	pub fn seed_orders(&self) -> Vec<Order> {
		self.orders
			.iter()
			.cloned()
			.enumerate()
			.map(|(position, seed)| seed.into_order(position))
			.collect()
	}

	/// Validates cross-field constraints that serde cannot express.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.server.host.is_empty() {
			return Err(ConfigError::Validation("Server host cannot be empty".into()));
		}

		if self.messaging.originator.is_empty() {
			return Err(ConfigError::Validation(
				"Messaging originator cannot be empty".into(),
			));
		}
		if self.messaging.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one messaging implementation must be configured".into(),
			));
		}
		if !self
			.messaging
			.implementations
			.contains_key(&self.messaging.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary messaging '{}' not found in implementations",
				self.messaging.primary
			)));
		}

		let mut seen = HashSet::new();
		for (position, seed) in self.orders.iter().enumerate() {
			let id = seed.effective_id(position);
			if id.as_str().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Order at position {} has an empty id",
					position
				)));
			}
			if !seen.insert(id.clone()) {
				return Err(ConfigError::Validation(format!(
					"Duplicate order id '{}'",
					id
				)));
			}
		}

		Ok(())
	}
}

/// Parses a configuration from a TOML string.
///
/// Environment variables in string values are resolved and the result is
/// validated.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_table(parse_document(s)?)
	}
}
