//! Builds an [`OrderService`] from configuration.
//!
//! Every configured messaging implementation is created through its
//! registered factory, so configuration mistakes surface at startup; the
//! primary one is then used for sending.

use crate::OrderService;
use omnom_config::Config;
use omnom_messaging::{MessagingFactory, MessagingService};
use omnom_storage::{implementations::memory::MemoryStorage, StorageService};
use omnom_types::ConfigSchema;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while wiring up the service.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Builder for [`OrderService`].
pub struct OrderServiceBuilder {
	config: Config,
	factories: HashMap<String, MessagingFactory>,
}

impl OrderServiceBuilder {
	/// Creates a builder with all built-in messaging implementations registered.
	pub fn new(config: Config) -> Self {
		let factories = omnom_messaging::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| {
				tracing::debug!("Registering messaging implementation: {}", name);
				(name.to_string(), factory)
			})
			.collect();

		Self { config, factories }
	}

	/// Registers an extra messaging implementation, replacing any with the same name.
	pub fn with_messaging_factory(mut self, name: impl Into<String>, factory: MessagingFactory) -> Self {
		self.factories.insert(name.into(), factory);
		self
	}

	pub fn build(self) -> Result<OrderService, BuilderError> {
		let messaging_config = &self.config.messaging;

		let mut gateways = HashMap::new();
		for (name, impl_config) in &messaging_config.implementations {
			let factory = self.factories.get(name).ok_or_else(|| {
				let mut available: Vec<_> = self.factories.keys().cloned().collect();
				available.sort();
				BuilderError::Config(format!(
					"Unknown messaging implementation '{}'. Available: [{}]",
					name,
					available.join(", ")
				))
			})?;

			match factory(impl_config) {
				Ok(gateway) => {
					if let Err(e) = gateway.config_schema().validate(impl_config) {
						tracing::error!(
							component = "messaging",
							implementation = %name,
							error = %e,
							"Invalid configuration for messaging implementation"
						);
						return Err(BuilderError::Config(format!(
							"Invalid configuration for messaging implementation '{}': {}",
							name, e
						)));
					}
					let is_primary = &messaging_config.primary == name;
					tracing::info!(component = "messaging", implementation = %name, enabled = %is_primary, "Loaded");
					gateways.insert(name.clone(), gateway);
				},
				Err(e) => {
					tracing::error!(
						component = "messaging",
						implementation = %name,
						error = %e,
						"Failed to create messaging implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create messaging implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let gateway = gateways.remove(&messaging_config.primary).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary messaging '{}' is not configured",
				messaging_config.primary
			))
		})?;
		let messaging = MessagingService::new(gateway, messaging_config.originator.clone());
		tracing::info!(originator = %messaging.originator(), "Messaging ready");

		let orders = self.config.seed_orders();
		tracing::info!(count = orders.len(), "Loaded seed orders");
		let storage = StorageService::new(Box::new(MemoryStorage::with_orders(orders)));

		Ok(OrderService::new(Arc::new(storage), Arc::new(messaging)))
	}
}
