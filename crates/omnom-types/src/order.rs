//! Order types.
//!
//! An order is identified by a stable [`OrderId`] token rather than by its
//! position in the store, and carries a closed [`OrderStatus`] that still
//! keeps any unrecognized value an operator submits.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Stable, opaque identifier of an order.
///
/// Seed orders are assigned the tokens `"0"`, `"1"`, ... in seed order so
/// that form submissions addressing the n-th listed order keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for OrderId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for OrderId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for OrderId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Status of a customer's order.
///
/// The usual lifecycle is pending -> confirmed/delayed -> delivered, but no
/// transition graph is enforced. Values outside the four known statuses are
/// kept verbatim in [`OrderStatus::Unrecognized`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrderStatus {
	/// Order has been placed but not yet acknowledged.
	#[default]
	Pending,
	/// Kitchen has accepted the order and is preparing it.
	Confirmed,
	/// Order is running late.
	Delayed,
	/// Driver is on the way.
	Delivered,
	/// Any other submitted value.
	Unrecognized(String),
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Confirmed => "confirmed",
			OrderStatus::Delayed => "delayed",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Unrecognized(raw) => raw,
		}
	}

	pub fn is_pending(&self) -> bool {
		matches!(self, OrderStatus::Pending)
	}

	/// True once the kitchen has accepted the order but it has not left yet.
	pub fn is_ready_for_delivery(&self) -> bool {
		matches!(self, OrderStatus::Confirmed | OrderStatus::Delayed)
	}

	pub fn is_confirmed(&self) -> bool {
		matches!(self, OrderStatus::Confirmed)
	}

	pub fn is_recognized(&self) -> bool {
		!matches!(self, OrderStatus::Unrecognized(_))
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"pending" => OrderStatus::Pending,
			"confirmed" => OrderStatus::Confirmed,
			"delayed" => OrderStatus::Delayed,
			"delivered" => OrderStatus::Delivered,
			other => OrderStatus::Unrecognized(other.to_string()),
		})
	}
}

impl From<&str> for OrderStatus {
	fn from(s: &str) -> Self {
		match s.parse() {
			Ok(status) => status,
			Err(never) => match never {},
		}
	}
}

impl Serialize for OrderStatus {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for OrderStatus {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;
		Ok(OrderStatus::from(raw.as_str()))
	}
}

/// A customer's food order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	pub id: OrderId,
	/// Customer name, used to personalise notifications.
	pub name: String,
	/// Customer phone number in E.164-like form. Not validated.
	pub phone: String,
	/// Free-text description of what was ordered.
	pub items: String,
	#[serde(default)]
	pub status: OrderStatus,
}

/// Seed entry for an order loaded at process start.
///
/// When `id` is omitted the position of the entry in the seed list is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSeed {
	#[serde(default)]
	pub id: Option<String>,
	pub name: String,
	pub phone: String,
	pub items: String,
	#[serde(default)]
	pub status: OrderStatus,
}

impl OrderSeed {
	/// Returns the id this seed will be stored under at `position`.
	pub fn effective_id(&self, position: usize) -> OrderId {
		match &self.id {
			Some(id) => OrderId::new(id.clone()),
			None => OrderId::new(position.to_string()),
		}
	}

	/// Builds the order record for this seed at `position`.
	pub fn into_order(self, position: usize) -> Order {
		Order {
			id: self.effective_id(position),
			name: self.name,
			phone: self.phone,
			items: self.items,
			status: self.status,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_parsing() {
		assert_eq!(OrderStatus::from("pending"), OrderStatus::Pending);
		assert_eq!(OrderStatus::from("confirmed"), OrderStatus::Confirmed);
		assert_eq!(OrderStatus::from("delayed"), OrderStatus::Delayed);
		assert_eq!(OrderStatus::from("delivered"), OrderStatus::Delivered);
		assert_eq!(
			OrderStatus::from("Confirmed"),
			OrderStatus::Unrecognized("Confirmed".to_string())
		);
		assert_eq!(OrderStatus::from(""), OrderStatus::Unrecognized(String::new()));
	}

	#[test]
	fn test_status_predicates() {
		assert!(OrderStatus::Pending.is_pending());
		assert!(!OrderStatus::Pending.is_ready_for_delivery());

		assert!(OrderStatus::Confirmed.is_ready_for_delivery());
		assert!(OrderStatus::Confirmed.is_confirmed());
		assert!(OrderStatus::Delayed.is_ready_for_delivery());
		assert!(!OrderStatus::Delayed.is_confirmed());

		let delivered = OrderStatus::Delivered;
		assert!(!delivered.is_pending() && !delivered.is_ready_for_delivery());

		// Unknown values fall out of every grouping
		let unknown = OrderStatus::from("eaten");
		assert!(!unknown.is_pending());
		assert!(!unknown.is_ready_for_delivery());
		assert!(!unknown.is_confirmed());
		assert!(!unknown.is_recognized());
	}

	#[test]
	fn test_status_display_keeps_raw_value() {
		assert_eq!(OrderStatus::Delayed.to_string(), "delayed");
		assert_eq!(OrderStatus::from("on fire").to_string(), "on fire");
	}

	#[test]
	fn test_status_serde() {
		let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
		assert_eq!(json, "\"delivered\"");

		let status: OrderStatus = serde_json::from_str("\"lost\"").unwrap();
		assert_eq!(status, OrderStatus::Unrecognized("lost".to_string()));
	}

	#[test]
	fn test_seed_ids_follow_position_unless_given() {
		let seed = OrderSeed {
			id: None,
			name: "Hannah Hungry".to_string(),
			phone: "+319876543210".to_string(),
			items: "1 x Hipster Burger + Fries".to_string(),
			status: OrderStatus::Pending,
		};
		assert_eq!(seed.effective_id(3), OrderId::from("3"));

		let named = OrderSeed {
			id: Some("hannah".to_string()),
			..seed
		};
		let order = named.into_order(0);
		assert_eq!(order.id.as_str(), "hannah");
		assert_eq!(order.name, "Hannah Hungry");
	}
}
