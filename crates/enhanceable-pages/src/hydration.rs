//! Client-side hydration.
//!
//! - [`dom`]: parsed document fragment with listeners
//! - [`events`]: the event value passed to handlers
//! - [`runtime`]: [`hydrate`] and [`HydrationError`]

pub mod dom;
pub mod events;
pub mod runtime;

pub use dom::{DocumentFragment, NodeId, NodeKind};
pub use events::Event;
pub use runtime::{HydrationError, hydrate, hydrate_in_context};
