//! Authentication lifecycle events for Researchopia.
//!
//! Application code subscribes here to react to sign-in, sign-out, and
//! refresh without polling the session layer. Whoever performs those
//! transitions (the auth controller) emits; everyone else listens.
//!
//! - **Event kinds** ([`EventType`]): the six lifecycle events.
//! - **Events** ([`AuthEvent`]): `{ type, data, timestamp }`, built per emit.
//! - **Dispatcher** ([`EventDispatcher`], [`global`]): `on`, `off`, `emit`,
//!   `clear`, `get_listener_count`.
//!
//! The only dependency on the other layers is the shared wall clock
//! ([`researchopia_token::now_millis`]) used to stamp events.

mod dispatcher;
mod error;
mod event;

pub use dispatcher::{EventDispatcher, Listener, Subscription, global, listener};
pub use error::EventError;
pub use event::{AuthEvent, EventType};
