//! Messaging module for the OmNomNom order notifier.
//!
//! This module sends customer notifications through an external SMS
//! provider. Each provider is an implementation of [`MessagingInterface`]
//! selected by name from configuration; [`MessagingService`] wraps the
//! chosen one and stamps every message with the configured sender id.
//!
//! Sends are single attempts. There is no retry, no idempotency key and no
//! delivery tracking: submitting the same update twice sends two messages.

use async_trait::async_trait;
use omnom_types::{ConfigSchema, ImplementationRegistry, Message, MessageReceipt};
use thiserror::Error;
use tracing::instrument;

/// Re-export implementations
pub mod implementations {
	pub mod log;
	pub mod messagebird;
}

/// Errors that can occur while sending a message.
#[derive(Debug, Error)]
pub enum MessagingError {
	/// The provider could not be reached or the request timed out.
	#[error("Network error: {0}")]
	Network(String),
	/// The provider answered with a non-success status.
	#[error("Message rejected by provider (HTTP {status}): {message}")]
	Rejected { status: u16, message: String },
	/// The provider accepted the request but its answer could not be read.
	#[error("Invalid provider response: {0}")]
	InvalidResponse(String),
	/// The implementation could not be created from its configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Interface implemented by every messaging provider.
#[async_trait]
pub trait MessagingInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Hands one message to the provider.
	async fn send(&self, message: &Message) -> Result<MessageReceipt, MessagingError>;
}

/// Signature every messaging implementation's factory must have.
pub type MessagingFactory =
	fn(&toml::Value) -> Result<Box<dyn MessagingInterface>, MessagingError>;

/// Registry trait for messaging implementations.
pub trait MessagingRegistry: ImplementationRegistry<Factory = MessagingFactory> {}

/// Returns (name, factory) pairs for every built-in messaging implementation.
pub fn get_all_implementations() -> Vec<(&'static str, MessagingFactory)> {
	use implementations::{log, messagebird};

	vec![
		(log::Registry::NAME, log::Registry::factory()),
		(messagebird::Registry::NAME, messagebird::Registry::factory()),
	]
}

/// Sends customer notifications through the configured provider.
pub struct MessagingService {
	gateway: Box<dyn MessagingInterface>,
	/// Sender id shown on the customer's phone.
	originator: String,
}

impl MessagingService {
	pub fn new(gateway: Box<dyn MessagingInterface>, originator: impl Into<String>) -> Self {
		Self {
			gateway,
			originator: originator.into(),
		}
	}

	pub fn originator(&self) -> &str {
		&self.originator
	}

	/// Sends `body` to a single recipient and waits for the provider's answer.
	#[instrument(skip_all, fields(recipient = %recipient))]
	pub async fn send(&self, recipient: &str, body: &str) -> Result<MessageReceipt, MessagingError> {
		let message = Message::new(&self.originator, recipient, body);

		match self.gateway.send(&message).await {
			Ok(receipt) => {
				tracing::info!(
					message_id = ?receipt.id,
					recipients = receipt.recipients,
					"Message accepted by gateway"
				);
				Ok(receipt)
			},
			Err(e) => {
				tracing::error!(error = %e, "Failed to send message");
				Err(e)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	struct RecordingGateway {
		sent: Arc<Mutex<Vec<Message>>>,
	}

	#[async_trait]
	impl MessagingInterface for RecordingGateway {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			Box::new(implementations::log::LogMessagingSchema)
		}

		async fn send(&self, message: &Message) -> Result<MessageReceipt, MessagingError> {
			self.sent.lock().unwrap().push(message.clone());
			Ok(MessageReceipt {
				id: Some("msg-1".to_string()),
				recipients: message.recipients.len(),
			})
		}
	}

	struct FailingGateway;

	#[async_trait]
	impl MessagingInterface for FailingGateway {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			Box::new(implementations::log::LogMessagingSchema)
		}

		async fn send(&self, _message: &Message) -> Result<MessageReceipt, MessagingError> {
			Err(MessagingError::Network("connection refused".to_string()))
		}
	}

	#[tokio::test]
	async fn test_service_stamps_originator() {
		let sent = Arc::new(Mutex::new(Vec::new()));
		let gateway = RecordingGateway { sent: sent.clone() };

		let service = MessagingService::new(Box::new(gateway), "OmNomNom");
		let receipt = service.send("+319876543210", "Hello").await.unwrap();

		assert_eq!(receipt.id.as_deref(), Some("msg-1"));
		let sent = sent.lock().unwrap();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].originator, "OmNomNom");
		assert_eq!(sent[0].recipients, vec!["+319876543210".to_string()]);
		assert_eq!(sent[0].body, "Hello");
	}

	#[tokio::test]
	async fn test_service_propagates_gateway_error() {
		let service = MessagingService::new(Box::new(FailingGateway), "OmNomNom");

		let result = service.send("+319876543210", "Hello").await;
		assert!(matches!(result, Err(MessagingError::Network(_))));
	}

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert!(names.contains(&"log"));
		assert!(names.contains(&"messagebird"));
	}
}
