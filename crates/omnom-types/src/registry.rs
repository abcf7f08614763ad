//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Every pluggable implementation (for example a messaging gateway) provides a
/// `Registry` struct implementing this trait, declaring the name it is
/// referenced by in configuration and the factory that builds it.
pub trait ImplementationRegistry {
	/// Name used in configuration files, e.g. `"messagebird"` for
	/// `[messaging.implementations.messagebird]`.
	const NAME: &'static str;

	/// Factory function type for this kind of implementation.
	type Factory;

	/// Returns the factory that builds this implementation from its config.
	fn factory() -> Self::Factory;
}
