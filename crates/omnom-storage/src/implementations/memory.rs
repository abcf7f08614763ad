//! In-memory storage backend.
//!
//! Orders are kept in a vector in seed order. Nothing survives a restart.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use omnom_types::{Order, OrderId};
use tokio::sync::RwLock;

/// In-memory order store.
pub struct MemoryStorage {
	/// Orders in seed order, protected by a read-write lock.
	orders: RwLock<Vec<Order>>,
}

impl MemoryStorage {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::with_orders(Vec::new())
	}

	/// Creates a store seeded with `orders`.
	pub fn with_orders(orders: Vec<Order>) -> Self {
		tracing::debug!(count = orders.len(), "Seeding in-memory order store");
		Self {
			orders: RwLock::new(orders),
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get(&self, id: &OrderId) -> Result<Order, StorageError> {
		let orders = self.orders.read().await;
		orders
			.iter()
			.find(|order| &order.id == id)
			.cloned()
			.ok_or_else(|| StorageError::NotFound(id.clone()))
	}

	async fn set(&self, id: &OrderId, order: Order) -> Result<(), StorageError> {
		let mut orders = self.orders.write().await;
		let slot = orders
			.iter_mut()
			.find(|existing| &existing.id == id)
			.ok_or_else(|| StorageError::NotFound(id.clone()))?;
		*slot = order;
		Ok(())
	}

	async fn list(&self) -> Result<Vec<Order>, StorageError> {
		Ok(self.orders.read().await.clone())
	}
}
