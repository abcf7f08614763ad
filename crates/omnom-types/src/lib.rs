//! Common types for the OmNomNom order notifier.
//!
//! This crate holds the data types shared by every other crate in the
//! workspace: orders and their status, outbound messages, secrets and the
//! configuration validation primitives used by pluggable implementations.

/// Outbound message types handed to the messaging gateway.
pub mod message;
/// Order records, identifiers and status.
pub mod order;
/// Registry trait for named, configurable implementations.
pub mod registry;
/// Redacting wrapper for API keys and other secrets.
pub mod secret_string;
/// Configuration validation types.
pub mod validation;

pub use message::{Message, MessageReceipt};
pub use order::{Order, OrderId, OrderSeed, OrderStatus};
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use validation::{ConfigSchema, Field, FieldType, Schema, ValidationError};
