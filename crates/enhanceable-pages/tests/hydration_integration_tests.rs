//! Integration tests for handler attributes and hydration
//!
//! These tests verify the round trip between a browser-side render and the hydrator:
//! 1. Handler attributes become `data-hydrate-<event>` markers plus a `data-hydrate` flag
//! 2. Ids resolve back to the identical handler through the render's registry
//! 3. Hydration attaches working listeners and leaves clean markup behind
//! 4. Server renders reject handler attributes

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use enhanceable_pages::hydration::{HydrationError, hydrate};
use enhanceable_pages::ssr::{Environment, RenderOptions, Renderer};
use enhanceable_pages::{Attributes, Component, EventHandler, Props, RenderError, html, trusted};
use rstest::{fixture, rstest};

/// A handler that counts its invocations.
fn counting_handler() -> (EventHandler, Arc<AtomicUsize>) {
	let calls = Arc::new(AtomicUsize::new(0));
	let handler = EventHandler::new({
		let calls = calls.clone();
		move |_| {
			calls.fetch_add(1, Ordering::SeqCst);
		}
	});
	(handler, calls)
}

#[fixture]
fn browser_renderer() -> Renderer {
	Renderer::new(RenderOptions::new().environment(Environment::Browser))
}

#[rstest]
#[tokio::test]
async fn test_handler_attribute_round_trip(browser_renderer: Renderer) {
	let (handler, calls) = counting_handler();

	let output = browser_renderer
		.render_with_context(|| {
			let attrs = Attributes::new()
				.attr("type", "button")
				.attr("onclick", handler.clone());
			html!("<button", attrs, ">Add</button>")
		})
		.await
		.unwrap();

	let registry = output.context.functions().unwrap();
	let id = registry.id_for(&handler);
	assert_eq!(
		output.html,
		format!(r#"<button type="button" data-hydrate-click="{id}" data-hydrate>Add</button>"#)
	);
	assert!(registry.function_for(&id).unwrap().ptr_eq(&handler));

	let fragment = hydrate(&trusted(output.html), &output.context).unwrap();
	let button = fragment.find_by_tag("button").unwrap();
	assert_eq!(fragment.to_html(), r#"<button type="button">Add</button>"#);

	fragment.dispatch_event(button, "click").unwrap();
	fragment.dispatch_event(button, "click").unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_same_handler_reuses_id(browser_renderer: Renderer) {
	let (handler, calls) = counting_handler();
	let field = Component::new({
		let handler = handler.clone();
		move |_props: Props| {
			let attrs = Attributes::new().attr("oninput", handler.clone());
			html!("<input", attrs, ">")
		}
	});

	let output = browser_renderer
		.render_with_context(|| {
			let attrs = Attributes::new()
				.attr("onclick", handler.clone())
				.attr("onfocus", handler.clone());
			html!("<div", attrs, "><", field, " /></div>")
		})
		.await
		.unwrap();

	let registry = output.context.functions().unwrap();
	assert_eq!(registry.len(), 1);
	let id = registry.id_for(&handler);
	assert_eq!(output.html.matches(id.as_str()).count(), 3);

	let fragment = hydrate(&trusted(output.html), &output.context).unwrap();
	let input = fragment.find_by_tag("input").unwrap();
	let div = fragment.find_by_tag("div").unwrap();
	assert_eq!(fragment.listener_count(div), 2);
	assert_eq!(fragment.listener_count(input), 1);

	fragment.dispatch_event(input, "input").unwrap();
	fragment.dispatch_event(input, "focus").unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 2);
	assert!(!fragment.to_html().contains("data-hydrate"));
}

#[rstest]
#[tokio::test]
async fn test_distinct_handlers_get_distinct_ids(browser_renderer: Renderer) {
	let (save, saved) = counting_handler();
	let (cancel, cancelled) = counting_handler();

	let output = browser_renderer
		.render_with_context(|| {
			let save_attrs = Attributes::new().attr("onclick", save.clone());
			let cancel_attrs = Attributes::new().attr("onclick", cancel.clone());
			html!("<button", save_attrs, ">Save</button><button", cancel_attrs, ">Cancel</button>")
		})
		.await
		.unwrap();

	let registry = output.context.functions().unwrap();
	assert_ne!(registry.id_for(&save), registry.id_for(&cancel));

	let fragment = hydrate(&trusted(output.html), &output.context).unwrap();
	let cancel_button = fragment.roots()[1];
	fragment.dispatch_event(cancel_button, "click").unwrap();
	assert_eq!(saved.load(Ordering::SeqCst), 0);
	assert_eq!(cancelled.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn test_server_render_rejects_handlers() {
	let handler = EventHandler::new(|_| {});
	let result = Renderer::default()
		.render(|| {
			let attrs = Attributes::new().attr("onclick", handler);
			html!("<button", attrs, ">x</button>")
		})
		.await;
	assert_eq!(
		result,
		Err(RenderError::FunctionsNotAllowed {
			attribute: "onclick".to_string()
		})
	);
}

#[rstest]
fn test_hydrate_with_prepopulated_registry() {
	let (handler, calls) = counting_handler();
	let context = enhanceable_pages::RenderContext::new(Environment::Browser);
	context
		.functions()
		.unwrap()
		.register("menu-toggle", handler)
		.unwrap();

	let markup = trusted(
		r#"<nav><button data-hydrate-click="menu-toggle" data-hydrate>Menu</button></nav>"#,
	);
	let fragment = hydrate(&markup, &context).unwrap();
	let nav = fragment.find_by_tag("nav").unwrap();
	let button = fragment.find_by_tag("button").unwrap();

	fragment.dispatch_event(button, "click").unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(fragment.listener_count(nav), 0);
	assert_eq!(fragment.to_html(), "<nav><button>Menu</button></nav>");
}

#[rstest]
fn test_hydrate_reports_unknown_id() {
	let context = enhanceable_pages::RenderContext::new(Environment::Browser);
	let markup = trusted(r#"<form data-hydrate-submit="gone" data-hydrate></form>"#);
	assert_eq!(
		hydrate(&markup, &context).unwrap_err(),
		HydrationError::MissingFunction {
			event: "submit".to_string(),
			id: "gone".to_string(),
		}
	);
}
