//! Core logic of the OmNomNom order notifier.
//!
//! [`OrderService`] ties the order store to the messaging gateway: it
//! records a status change, composes the matching customer notification and
//! waits for the gateway to accept it. The HTTP layer only translates the
//! outcome into a response.

use omnom_messaging::{MessagingError, MessagingService};
use omnom_storage::{StorageError, StorageService};
use omnom_types::{MessageReceipt, Order, OrderId, OrderStatus};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

pub mod builder;
pub mod notification;

pub use builder::{BuilderError, OrderServiceBuilder};

/// Errors that can occur while updating an order.
#[derive(Debug, Error)]
pub enum UpdateError {
	/// No order exists under the submitted id.
	#[error("Unknown order: {0}")]
	InvalidReference(OrderId),
	/// The status was stored but the notification could not be sent.
	#[error("Notification failed: {0}")]
	Gateway(#[from] MessagingError),
}

impl From<StorageError> for UpdateError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound(id) => UpdateError::InvalidReference(id),
		}
	}
}

/// Result of a successful status update.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
	/// The order as stored after the update.
	pub order: Order,
	/// Gateway receipt, or `None` when the new status has no notification.
	pub receipt: Option<MessageReceipt>,
}

/// Order listing and status updates.
pub struct OrderService {
	storage: Arc<StorageService>,
	messaging: Arc<MessagingService>,
}

impl OrderService {
	pub fn new(storage: Arc<StorageService>, messaging: Arc<MessagingService>) -> Self {
		Self { storage, messaging }
	}

	/// Returns all orders in listing order.
	pub async fn list_orders(&self) -> Result<Vec<Order>, StorageError> {
		self.storage.list().await
	}

	/// Sets the status of an order and notifies the customer.
	///
	/// The new status is stored before the notification is sent and is kept
	/// when sending fails. No transition rules are applied, and repeating the
	/// same update sends the notification again.
	#[instrument(skip_all, fields(order_id = %id, status = %status))]
	pub async fn update_status(
		&self,
		id: &OrderId,
		status: OrderStatus,
	) -> Result<UpdateOutcome, UpdateError> {
		if !status.is_recognized() {
			tracing::warn!("Storing unrecognized status");
		}

		let order = self
			.storage
			.update_with(id, |order| order.status = status)
			.await?;

		let body = notification::compose(&order);
		if body.is_empty() {
			tracing::debug!("No notification for this status");
			return Ok(UpdateOutcome {
				order,
				receipt: None,
			});
		}

		let receipt = self.messaging.send(&order.phone, &body).await?;
		Ok(UpdateOutcome {
			order,
			receipt: Some(receipt),
		})
	}
}
