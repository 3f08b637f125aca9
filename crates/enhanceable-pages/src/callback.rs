//! Identity-tagged event handlers.
//!
//! An [`EventHandler`] is the value a template places in an attribute to
//! request hydration. The function registry needs to recognise "the same
//! function" across attributes and components, so every handler carries a
//! [`HandlerTag`] injected when it is created. Clones share the tag; two
//! separately constructed handlers never do, even if they wrap the same code.
//!
//! ## Example
//!
//! ```
//! use enhanceable_pages::EventHandler;
//!
//! let on_click = EventHandler::new(|event| {
//!     assert_eq!(event.event_type(), "click");
//! });
//! let same = on_click.clone();
//! assert!(on_click.ptr_eq(&same));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::hydration::Event;

/// Global counter for handler identity tags.
static HANDLER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of an [`EventHandler`].
///
/// Tags are never reused within a process, so a registry keyed by tag does
/// not keep the handler alive and cannot confuse a dropped handler with a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerTag(u64);

impl HandlerTag {
	fn next() -> Self {
		Self(HANDLER_COUNTER.fetch_add(1, Ordering::Relaxed))
	}

	/// Returns the raw tag value.
	pub fn get(self) -> u64 {
		self.0
	}
}

/// A cloneable event handler with a stable identity.
#[derive(Clone)]
pub struct EventHandler {
	tag: HandlerTag,
	inner: Arc<dyn Fn(&Event) + Send + Sync + 'static>,
}

impl EventHandler {
	/// Wraps a function or closure as a new handler with a fresh identity.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Event) + Send + Sync + 'static,
	{
		Self {
			tag: HandlerTag::next(),
			inner: Arc::new(f),
		}
	}

	/// Invokes the handler.
	pub fn call(&self, event: &Event) {
		(self.inner)(event)
	}

	/// Returns the identity tag shared by this handler and its clones.
	pub fn tag(&self) -> HandlerTag {
		self.tag
	}

	/// Returns true if both handlers are the same function instance.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		self.tag == other.tag
	}
}

impl fmt::Debug for EventHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventHandler")
			.field("tag", &self.tag)
			.finish_non_exhaustive()
	}
}

impl PartialEq for EventHandler {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for EventHandler {}
