//! MessageBird SMS gateway.
//!
//! Sends messages through the MessageBird REST API:
//!
//! - `POST {endpoint}/messages`
//! - `Authorization: AccessKey {api_key}`
//! - JSON body `{ "originator": ..., "recipients": [...], "body": ... }`
//!
//! ## Configuration
//!
//! - `api_key` - access key, normally `"${MESSAGEBIRD_API_KEY}"` (required)
//! - `endpoint` - API base URL (default: `https://rest.messagebird.com`)
//! - `timeout_seconds` - request timeout (default: 30)

use crate::{MessagingError, MessagingFactory, MessagingInterface, MessagingRegistry};
use async_trait::async_trait;
use omnom_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Message, MessageReceipt, Schema,
	SecretString, ValidationError,
};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://rest.messagebird.com";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Parsed `[messaging.implementations.messagebird]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBirdConfig {
	pub api_key: SecretString,
	#[serde(default = "default_endpoint")]
	pub endpoint: String,
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
	DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
	DEFAULT_TIMEOUT_SECONDS
}

/// Configuration schema for MessageBird.
pub struct MessageBirdSchema;

impl ConfigSchema for MessageBirdSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("api_key", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(key) if key.trim().is_empty() => Err("api_key cannot be empty".into()),
					_ => Ok(()),
				}
			})],
			vec![
				Field::new("endpoint", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
							Ok(())
						},
						_ => Err("endpoint must be an http(s) URL".into()),
					}
				}),
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
			],
		);
		schema.validate(config)
	}
}

/// Body of a successful `POST /messages` response. Only the fields we log.
#[derive(Debug, Deserialize)]
struct MessageBirdMessage {
	id: Option<String>,
	#[serde(default)]
	recipients: MessageBirdRecipients,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageBirdRecipients {
	#[serde(default)]
	total_count: usize,
}

/// Body of an error response.
#[derive(Debug, Deserialize)]
struct MessageBirdErrors {
	#[serde(default)]
	errors: Vec<MessageBirdErrorItem>,
}

#[derive(Debug, Deserialize)]
struct MessageBirdErrorItem {
	code: Option<i64>,
	description: String,
	parameter: Option<String>,
}

impl MessageBirdErrors {
	/// Joins the provider's error descriptions into one line.
	fn summary(&self) -> String {
		self.errors
			.iter()
			.map(|e| match (&e.code, &e.parameter) {
				(Some(code), Some(param)) => format!("{} ({}, code {})", e.description, param, code),
				(Some(code), None) => format!("{} (code {})", e.description, code),
				(None, Some(param)) => format!("{} ({})", e.description, param),
				(None, None) => e.description.clone(),
			})
			.collect::<Vec<_>>()
			.join("; ")
	}
}

/// MessageBird REST client.
pub struct MessageBirdMessaging {
	client: reqwest::Client,
	api_key: SecretString,
	messages_url: String,
}

impl MessageBirdMessaging {
	pub fn new(config: MessageBirdConfig) -> Result<Self, MessagingError> {
		let client = reqwest::Client::builder()
			.timeout(Duration::from_secs(config.timeout_seconds))
			.pool_idle_timeout(Duration::from_secs(90))
			.build()
			.map_err(|e| MessagingError::Configuration(format!("HTTP client: {}", e)))?;

		Ok(Self {
			client,
			api_key: config.api_key,
			messages_url: format!("{}/messages", config.endpoint.trim_end_matches('/')),
		})
	}
}

#[async_trait]
impl MessagingInterface for MessageBirdMessaging {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MessageBirdSchema)
	}

	async fn send(&self, message: &Message) -> Result<MessageReceipt, MessagingError> {
		tracing::debug!(url = %self.messages_url, "Submitting message to MessageBird");

		let response = self
			.client
			.post(&self.messages_url)
			.header(
				AUTHORIZATION,
				format!("AccessKey {}", self.api_key.expose_secret()),
			)
			.json(message)
			.send()
			.await
			.map_err(|e| MessagingError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let text = response.text().await.unwrap_or_default();
			let message = serde_json::from_str::<MessageBirdErrors>(&text)
				.ok()
				.filter(|errors| !errors.errors.is_empty())
				.map(|errors| errors.summary())
				.unwrap_or(text);
			return Err(MessagingError::Rejected {
				status: status.as_u16(),
				message,
			});
		}

		let body: MessageBirdMessage = response
			.json()
			.await
			.map_err(|e| MessagingError::InvalidResponse(e.to_string()))?;

		Ok(MessageReceipt {
			id: body.id,
			recipients: body.recipients.total_count,
		})
	}
}

/// Factory function to create a MessageBird gateway from configuration.
pub fn create_messaging(
	config: &toml::Value,
) -> Result<Box<dyn MessagingInterface>, MessagingError> {
	MessageBirdSchema
		.validate(config)
		.map_err(|e| MessagingError::Configuration(format!("Invalid messagebird config: {}", e)))?;

	let parsed: MessageBirdConfig = config
		.clone()
		.try_into()
		.map_err(|e| MessagingError::Configuration(format!("Invalid messagebird config: {}", e)))?;

	Ok(Box::new(MessageBirdMessaging::new(parsed)?))
}

/// Registry for the MessageBird implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "messagebird";
	type Factory = MessagingFactory;

	fn factory() -> Self::Factory {
		create_messaging
	}
}

impl MessagingRegistry for Registry {}
