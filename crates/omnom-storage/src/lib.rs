//! Order storage for the OmNomNom order notifier.
//!
//! Orders live for the lifetime of the process only. The store keeps them in
//! seed order and addresses them by their stable [`OrderId`], so a listing
//! always shows orders in the order they were loaded.

use async_trait::async_trait;
use omnom_types::{Order, OrderId};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// No order is stored under the requested id.
	#[error("Order not found: {0}")]
	NotFound(OrderId),
}

/// Low-level interface for order storage backends.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Returns the order stored under `id`.
	async fn get(&self, id: &OrderId) -> Result<Order, StorageError>;

	/// Replaces the order stored under `id`, keeping its position.
	///
	/// Fails with [`StorageError::NotFound`] when `id` is unknown; the store
	/// never grows after seeding.
	async fn set(&self, id: &OrderId, order: Order) -> Result<(), StorageError>;

	/// Returns every order in seed order.
	async fn list(&self) -> Result<Vec<Order>, StorageError>;
}

/// Typed access to the order store.
///
/// Wraps a backend and adds read-modify-write helpers. None of the helpers
/// hold a lock across the whole operation: two concurrent updates of the
/// same order may interleave, the last write wins.
pub struct StorageService {
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	pub async fn get(&self, id: &OrderId) -> Result<Order, StorageError> {
		self.backend.get(id).await
	}

	pub async fn set(&self, id: &OrderId, order: Order) -> Result<(), StorageError> {
		self.backend.set(id, order).await
	}

	pub async fn list(&self) -> Result<Vec<Order>, StorageError> {
		self.backend.list().await
	}

	/// Loads an order, applies `updater` to it and writes it back.
	///
	/// Returns the order as written.
	pub async fn update_with<F>(&self, id: &OrderId, updater: F) -> Result<Order, StorageError>
	where
		F: FnOnce(&mut Order),
	{
		let mut order = self.backend.get(id).await?;
		updater(&mut order);
		// The record always stays under the id it was looked up by
		order.id = id.clone();

		self.backend.set(id, order.clone()).await?;
		tracing::debug!(order_id = %id, status = %order.status, "Order updated");

		Ok(order)
	}
}
