//! Customer notification texts.

use omnom_types::{Order, OrderStatus};

/// Builds the SMS text announcing `order`'s current status.
///
/// Returns an empty string when there is nothing to tell the customer
/// (pending or unrecognized status).
pub fn compose(order: &Order) -> String {
	let name = &order.name;
	match order.status {
		OrderStatus::Confirmed => format!(
			"{}, thanks for ordering at OmNomNom Foods! We are now preparing your food with love and fresh ingredients and will keep you updated.",
			name
		),
		OrderStatus::Delayed => format!(
			"{}, sometimes good things take time! Unfortunately your order is slightly delayed but will be delivered as soon as possible.",
			name
		),
		OrderStatus::Delivered => format!(
			"{}, you can start setting the table! Our driver is on their way with your order! Bon appetit!",
			name
		),
		OrderStatus::Pending | OrderStatus::Unrecognized(_) => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use omnom_types::OrderId;

	fn order(name: &str, status: &str) -> Order {
		Order {
			id: OrderId::from("0"),
			name: name.to_string(),
			phone: "+319876543210".to_string(),
			items: "1 x Hipster Burger + Fries".to_string(),
			status: OrderStatus::from(status),
		}
	}

	#[test]
	fn test_confirmed_message() {
		let body = compose(&order("Hannah", "confirmed"));
		assert!(body.starts_with("Hannah, "));
		assert!(body.contains("preparing your food"));
	}

	#[test]
	fn test_delayed_message() {
		let body = compose(&order("Mike Madeater", "delayed"));
		assert!(body.starts_with("Mike Madeater, sometimes good things take time!"));
		assert!(body.contains("slightly delayed"));
	}

	#[test]
	fn test_delivered_message() {
		let body = compose(&order("Hannah Hungry", "delivered"));
		assert!(body.contains("Hannah Hungry"));
		assert!(body.contains("Our driver is on their way"));
	}

	#[test]
	fn test_nothing_to_say() {
		assert_eq!(compose(&order("Hannah", "pending")), "");
		assert_eq!(compose(&order("Hannah", "cancelled")), "");
	}
}
