//! Outbound message types.

use serde::{Deserialize, Serialize};

/// A single text message to be delivered by the messaging gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	/// Sender id displayed on the recipient's phone.
	pub originator: String,
	/// Phone numbers the message is addressed to.
	pub recipients: Vec<String>,
	/// Message text.
	pub body: String,
}

impl Message {
	/// Creates a message addressed to a single recipient.
	pub fn new(
		originator: impl Into<String>,
		recipient: impl Into<String>,
		body: impl Into<String>,
	) -> Self {
		Self {
			originator: originator.into(),
			recipients: vec![recipient.into()],
			body: body.into(),
		}
	}
}

/// What the gateway reported back after accepting a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
	/// Provider-assigned message id, when the provider returns one.
	pub id: Option<String>,
	/// Number of recipients the provider accepted.
	pub recipients: usize,
}
