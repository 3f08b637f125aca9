//! Attribute serialization.

use tracing::trace;

use super::context::current_context;
use super::markers::{HYDRATE_ATTR, event_marker_name};
use crate::component::{AttrValue, Attributes, CHILDREN_KEY, format_number};
use crate::error::RenderError;
use crate::escape::escape;

/// Serializes an attribute bag for splicing directly after a tag name.
///
/// Every emitted attribute is space-prefixed. Handler values are replaced by
/// `data-hydrate-<event>="<id>"` markers using the function registry of the
/// current render context, and a bare `data-hydrate` flag closes the list.
///
/// # Errors
///
/// Returns [`RenderError::FunctionsNotAllowed`] when a handler is present but
/// no context with a function registry is active.
pub fn render_attributes(attrs: &Attributes) -> Result<String, RenderError> {
	let mut out = String::new();
	let mut needs_hydration = false;

	for (name, value) in attrs.iter() {
		if name == CHILDREN_KEY {
			continue;
		}

		match value {
			AttrValue::Absent | AttrValue::Bool(false) => {}
			AttrValue::Bool(true) => {
				out.push(' ');
				out.push_str(name);
			}
			AttrValue::Str(s) => push_pair(&mut out, name, &escape(s)),
			AttrValue::Number(n) => push_pair(&mut out, name, &escape(&format_number(*n))),
			AttrValue::Markup(markup) => push_pair(&mut out, name, markup.as_str()),
			AttrValue::Handler(handler) => {
				let context = current_context();
				let Some(registry) = context.as_ref().and_then(|ctx| ctx.functions()) else {
					return Err(RenderError::FunctionsNotAllowed {
						attribute: name.to_string(),
					});
				};
				let id = registry.id_for(handler);
				trace!(attribute = name, id = %id, "registered hydration handler");
				push_pair(&mut out, &event_marker_name(name), &id);
				needs_hydration = true;
			}
		}
	}

	if needs_hydration {
		out.push(' ');
		out.push_str(HYDRATE_ATTR);
	}

	Ok(out)
}

fn push_pair(out: &mut String, name: &str, value: &str) {
	out.push(' ');
	out.push_str(name);
	out.push_str("=\"");
	out.push_str(value);
	out.push('"');
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::callback::EventHandler;
	use crate::component::trusted;
	use crate::ssr::context::{Environment, RenderContext, run_with_context};
	use rstest::rstest;

	#[rstest]
	fn test_string_and_number_values_are_escaped() {
		let attrs = Attributes::new()
			.attr("class", "btn")
			.attr("title", "a \"quoted\" <b>")
			.attr("tabindex", 3);
		assert_eq!(
			render_attributes(&attrs).unwrap(),
			r#" class="btn" title="a &quot;quoted&quot; &lt;b&gt;" tabindex="3""#
		);
	}

	#[rstest]
	fn test_booleans_and_absent_values() {
		let attrs = Attributes::new()
			.attr("disabled", true)
			.attr("hidden", false)
			.attr("alt", None::<&str>);
		assert_eq!(render_attributes(&attrs).unwrap(), " disabled");
	}

	#[rstest]
	fn test_markup_values_are_raw() {
		let attrs = Attributes::new().attr("style", trusted("a:'b'"));
		assert_eq!(render_attributes(&attrs).unwrap(), r#" style="a:'b'""#);
	}

	#[rstest]
	fn test_children_key_is_ignored() {
		let attrs = Attributes::new()
			.attr("id", "x")
			.with_children(trusted("<p></p>"));
		assert_eq!(render_attributes(&attrs).unwrap(), r#" id="x""#);
	}

	#[rstest]
	fn test_empty_bag() {
		assert_eq!(render_attributes(&Attributes::new()).unwrap(), "");
	}

	#[rstest]
	fn test_handler_without_context_fails() {
		let attrs = Attributes::new().attr("onclick", EventHandler::new(|_| {}));
		assert_eq!(
			render_attributes(&attrs),
			Err(RenderError::FunctionsNotAllowed {
				attribute: "onclick".to_string()
			})
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_in_server_context_fails() {
		let attrs = Attributes::new().attr("onclick", EventHandler::new(|_| {}));
		let result = run_with_context(RenderContext::new(Environment::Server), async {
			render_attributes(&attrs)
		})
		.await;
		assert!(matches!(result, Err(RenderError::FunctionsNotAllowed { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_becomes_marker() {
		let handler = EventHandler::new(|_| {});
		let attrs = Attributes::new()
			.attr("onclick", handler.clone())
			.attr("class", "btn");
		let context = RenderContext::new(Environment::Browser);

		let out = run_with_context(context.clone(), async { render_attributes(&attrs) })
			.await
			.unwrap();

		let id = context.functions().unwrap().id_for(&handler);
		assert_eq!(
			out,
			format!(r#" data-hydrate-click="{id}" class="btn" data-hydrate"#)
		);
	}
}
