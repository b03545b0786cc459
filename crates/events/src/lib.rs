//! Campus forum event bus.
//!
//! Secondary effects of forum writes (mention fan-out, notifications, view
//! counts) ride an explicit in-process queue instead of inline best-effort
//! calls, so their failure semantics are testable in isolation:
//!
//! - [`EventBus`] — publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`ForumEvent`] — the canonical domain event envelope.

pub mod bus;

pub use bus::{EventBus, ForumEvent};
