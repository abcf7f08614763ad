//! HTTP server for the order dashboard.
//!
//! Two routes: `GET /` renders the order list and `POST /updateOrder`
//! accepts the form posted by its buttons.

use crate::views::OrdersPage;
use askama::Template;
use axum::{
	extract::{rejection::FormRejection, Form, State},
	http::{header, StatusCode},
	response::{Html, IntoResponse, Response},
	routing::{get, post},
	Router,
};
use omnom_config::ServerConfig;
use omnom_core::{OrderService, UpdateError};
use omnom_types::{OrderId, OrderStatus};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

const SEND_FAILED: &str = "Error occured while sending message!";
const INVALID_INPUT: &str = "Invalid input!";

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
	pub orders: Arc<OrderService>,
}

/// Form fields posted to `/updateOrder`. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderForm {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub status: String,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(handle_list))
		.route("/updateOrder", post(handle_update))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Binds the listener and serves requests until the task is dropped.
pub async fn start_server(
	server_config: ServerConfig,
	orders: Arc<OrderService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(AppState { orders });

	let bind_address = format!("{}:{}", server_config.host, server_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("OmNomNom server listening on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles GET / requests.
async fn handle_list(State(state): State<AppState>) -> Response {
	let orders = match state.orders.list_orders().await {
		Ok(orders) => orders,
		Err(e) => {
			tracing::error!("Failed to list orders: {}", e);
			return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load orders").into_response();
		},
	};

	match OrdersPage::new(&orders).render() {
		Ok(html) => Html(html).into_response(),
		Err(e) => {
			tracing::error!("Failed to render order list: {}", e);
			(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render orders").into_response()
		},
	}
}

/// Handles POST /updateOrder requests.
///
/// Redirects back to the listing on success. Failures are reported in a
/// plain 200 response, which is what the dashboard form expects. A body
/// that is not a readable form counts as an empty one.
async fn handle_update(
	State(state): State<AppState>,
	form: Result<Form<UpdateOrderForm>, FormRejection>,
) -> Response {
	let form = match form {
		Ok(Form(form)) => form,
		Err(rejection) => {
			tracing::debug!("Unreadable update form: {}", rejection);
			UpdateOrderForm::default()
		},
	};
	let id = OrderId::new(form.id);
	let status = OrderStatus::from(form.status.as_str());

	match state.orders.update_status(&id, status).await {
		Ok(_) => (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response(),
		Err(UpdateError::Gateway(e)) => {
			tracing::error!(order_id = %id, "Error sending message: {}", e);
			SEND_FAILED.into_response()
		},
		Err(UpdateError::InvalidReference(_)) => {
			tracing::warn!(order_id = %id, "Update for unknown order");
			INVALID_INPUT.into_response()
		},
	}
}
