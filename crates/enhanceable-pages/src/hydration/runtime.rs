//! Hydration Runtime
//!
//! Restores event listeners on markup produced by a render that had a
//! function registry. Every element flagged with `data-hydrate` carries one
//! `data-hydrate-<event>="<id>"` attribute per handler; the id is looked up
//! in the registry and the resolved function is attached as a listener. All
//! marker attributes are removed so the resulting fragment is clean.

use tracing::debug;

use super::dom::DocumentFragment;
use crate::component::Markup;
use crate::ssr::context::{RenderContext, current_context};
use crate::ssr::markers::{HYDRATE_ATTR, HYDRATE_EVENT_PREFIX, strip_event_prefix};

/// Errors that can occur during hydration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HydrationError {
	/// The context has no function registry.
	#[error("context does not support hydration")]
	Unsupported,

	/// A marker references an id the registry does not know.
	#[error("no function found for event \"{event}\" {id}")]
	MissingFunction {
		/// The event name taken from the marker
		event: String,
		/// The unresolved id
		id: String,
	},

	/// A listener operation targeted something that is not an element.
	#[error("invalid target: {0}")]
	InvalidTarget(String),
}

/// Parses `markup` and re-attaches the listeners its markers reference.
///
/// # Example
///
/// ```
/// use enhanceable_pages::hydration::hydrate;
/// use enhanceable_pages::ssr::{Environment, RenderContext};
/// use enhanceable_pages::trusted;
///
/// let context = RenderContext::new(Environment::Browser);
/// let fragment = hydrate(&trusted("<p>static</p>"), &context).unwrap();
/// assert_eq!(fragment.to_html(), "<p>static</p>");
/// ```
pub fn hydrate(markup: &Markup, context: &RenderContext) -> Result<DocumentFragment, HydrationError> {
	let registry = context.functions().ok_or(HydrationError::Unsupported)?;
	let mut fragment = DocumentFragment::parse(markup.as_str());

	for element in fragment.elements_with_attribute(HYDRATE_ATTR) {
		fragment.remove_attribute(element, HYDRATE_ATTR);

		let markers: Vec<(String, String)> = fragment
			.attributes(element)
			.filter(|(name, _)| name.starts_with(HYDRATE_EVENT_PREFIX))
			.map(|(name, value)| (name.to_string(), value.to_string()))
			.collect();

		for (name, id) in markers {
			let event = strip_event_prefix(&name[HYDRATE_EVENT_PREFIX.len()..]).to_string();
			let Some(listener) = registry.function_for(&id) else {
				return Err(HydrationError::MissingFunction { event, id });
			};

			debug!(event = %event, id = %id, "attaching hydrated listener");
			fragment.add_event_listener(element, event, listener)?;
			fragment.remove_attribute(element, &name);
		}
	}

	Ok(fragment)
}

/// Hydrates against the render context of the current task.
pub fn hydrate_in_context(markup: &Markup) -> Result<DocumentFragment, HydrationError> {
	let context = current_context().ok_or(HydrationError::Unsupported)?;
	hydrate(markup, &context)
}
