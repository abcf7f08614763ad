//! HTML views.

use askama::Template;
use omnom_types::Order;

/// One row of the order table.
pub struct OrderView {
	pub id: String,
	pub name: String,
	pub phone: String,
	pub items: String,
	pub status: String,
	pub pending: bool,
	pub ready_for_delivery: bool,
	pub confirmed: bool,
}

impl From<&Order> for OrderView {
	fn from(order: &Order) -> Self {
		Self {
			id: order.id.to_string(),
			name: order.name.clone(),
			phone: order.phone.clone(),
			items: order.items.clone(),
			status: order.status.to_string(),
			pending: order.status.is_pending(),
			ready_for_delivery: order.status.is_ready_for_delivery(),
			confirmed: order.status.is_confirmed(),
		}
	}
}

/// The order listing page served at `/`.
#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersPage {
	pub orders: Vec<OrderView>,
}

impl OrdersPage {
	pub fn new(orders: &[Order]) -> Self {
		Self {
			orders: orders.iter().map(OrderView::from).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use omnom_types::{OrderId, OrderStatus};

	fn order(id: &str, status: OrderStatus) -> Order {
		Order {
			id: OrderId::from(id),
			name: "Hannah Hungry".to_string(),
			phone: "+319876543210".to_string(),
			items: "1 x Hipster Burger + Fries".to_string(),
			status,
		}
	}

	#[test]
	fn test_pending_order_offers_confirm_and_delay() {
		let html = OrdersPage::new(&[order("0", OrderStatus::Pending)])
			.render()
			.unwrap();

		assert!(html.contains("Hannah Hungry"));
		assert!(html.contains(r#"value="confirmed""#));
		assert!(html.contains(r#"value="delayed""#));
		assert!(!html.contains(r#"value="delivered""#));
	}

	#[test]
	fn test_confirmed_order_offers_delivered_and_delay() {
		let html = OrdersPage::new(&[order("0", OrderStatus::Confirmed)])
			.render()
			.unwrap();

		assert!(html.contains(r#"value="delivered""#));
		assert!(html.contains(r#"value="delayed""#));
		assert!(!html.contains(r#"value="confirmed""#));
	}

	#[test]
	fn test_delayed_order_offers_only_delivered() {
		let html = OrdersPage::new(&[order("0", OrderStatus::Delayed)])
			.render()
			.unwrap();

		assert!(html.contains(r#"value="delivered""#));
		assert!(!html.contains(r#"value="delayed""#));
	}

	#[test]
	fn test_finished_orders_have_no_controls() {
		let html = OrdersPage::new(&[
			order("0", OrderStatus::Delivered),
			order("1", OrderStatus::from("eaten")),
		])
		.render()
		.unwrap();

		assert!(!html.contains("<button"));
		assert!(html.contains("eaten"));
	}

	#[test]
	fn test_customer_text_is_escaped() {
		let mut evil = order("0", OrderStatus::Pending);
		evil.name = "<script>alert(1)</script>".to_string();
		evil.items = "Fish & Chips".to_string();

		let html = OrdersPage::new(&[evil]).render().unwrap();

		assert!(!html.contains("<script>"));
		assert!(html.contains("&lt;script&gt;"));
		assert!(html.contains("Fish &amp; Chips"));
	}
}
