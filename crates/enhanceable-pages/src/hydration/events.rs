//! Events delivered to hydrated listeners.

use super::dom::NodeId;

/// An event dispatched through a hydrated [`DocumentFragment`](super::DocumentFragment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	event_type: String,
	target: Option<NodeId>,
	current_target: Option<NodeId>,
}

impl Event {
	/// Creates an event aimed at `target`.
	pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
		Self {
			event_type: event_type.into(),
			target: Some(target),
			current_target: Some(target),
		}
	}

	/// Creates an event that is not attached to any node.
	pub fn detached(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			target: None,
			current_target: None,
		}
	}

	/// The event name, e.g. `click`.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// The element the event was dispatched to.
	pub fn target(&self) -> Option<NodeId> {
		self.target
	}

	/// The element whose listener is currently running.
	pub fn current_target(&self) -> Option<NodeId> {
		self.current_target
	}

	pub(super) fn at(&self, node: NodeId) -> Self {
		Self {
			current_target: Some(node),
			..self.clone()
		}
	}
}
