//! Hydration Markers
//!
//! The attribute format shared by the attribute serializer and the hydrator:
//! an element with handlers carries a bare `data-hydrate` flag plus one
//! `data-hydrate-<event>="<id>"` attribute per handler.

use uuid::Uuid;

/// Presence flag marking an element for hydration.
pub const HYDRATE_ATTR: &str = "data-hydrate";

/// Prefix of the per-event marker attributes.
pub const HYDRATE_EVENT_PREFIX: &str = "data-hydrate-";

/// Strips a leading `on` from a handler attribute name (`onclick` → `click`).
pub fn strip_event_prefix(name: &str) -> &str {
	name.strip_prefix("on").unwrap_or(name)
}

/// Builds the marker attribute name for a handler attribute.
pub fn event_marker_name(attribute: &str) -> String {
	format!("{}{}", HYDRATE_EVENT_PREFIX, strip_event_prefix(attribute))
}

/// Generates a collision-resistant function id.
pub fn generate_function_id() -> String {
	Uuid::new_v4().to_string()
}
