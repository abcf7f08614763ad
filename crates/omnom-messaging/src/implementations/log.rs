//! Messaging implementation that only writes messages to the log.
//!
//! Useful for running the service locally without a provider account.
//! Every send succeeds.

use crate::{MessagingError, MessagingFactory, MessagingInterface, MessagingRegistry};
use async_trait::async_trait;
use omnom_types::{
	ConfigSchema, ImplementationRegistry, Message, MessageReceipt, Schema, ValidationError,
};

/// Gateway that logs messages instead of sending them.
pub struct LogMessaging;

/// Configuration schema for [`LogMessaging`]. No fields are required.
pub struct LogMessagingSchema;

impl ConfigSchema for LogMessagingSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

#[async_trait]
impl MessagingInterface for LogMessaging {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LogMessagingSchema)
	}

	async fn send(&self, message: &Message) -> Result<MessageReceipt, MessagingError> {
		tracing::info!(
			originator = %message.originator,
			recipients = ?message.recipients,
			body = %message.body,
			"Message logged (not sent)"
		);

		Ok(MessageReceipt {
			id: None,
			recipients: message.recipients.len(),
		})
	}
}

/// Factory function to create the log gateway from configuration.
pub fn create_messaging(
	config: &toml::Value,
) -> Result<Box<dyn MessagingInterface>, MessagingError> {
	LogMessagingSchema
		.validate(config)
		.map_err(|e| MessagingError::Configuration(format!("Invalid log config: {}", e)))?;
	Ok(Box::new(LogMessaging))
}

/// Registry for the log implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "log";
	type Factory = MessagingFactory;

	fn factory() -> Self::Factory {
		create_messaging
	}
}

impl MessagingRegistry for Registry {}
