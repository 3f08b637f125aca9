//! Enhanceable Pages - async HTML templates with opt-in hydration
//!
//! Components are plain async functions returning markup. Templates are
//! written as alternating literal segments and interpolated values; text is
//! escaped, trusted markup is passed through and components compose with a
//! JSX-like open/close syntax resolved at runtime.
//!
//! ## Features
//!
//! - **Escaping by default**: every interpolated text value is HTML-escaped exactly once
//! - **Async components**: any interpolation or component may be a future, resolved in source order
//! - **Hydration**: event handlers placed in attributes become stable ids that the
//!   hydrator resolves back to the same functions on the client
//! - **Lazy enhancements**: client behaviour modules are only loaded by pages that reference them
//!
//! ## Architecture
//!
//! - [`escape`]: the HTML escaper
//! - [`component`]: markup, children, attribute bags and components
//! - [`callback`]: identity-tagged event handlers
//! - [`ssr`]: template engine, render context and renderer
//! - [`enhancements`]: local and remote client behaviour modules
//! - [`hydration`]: re-attaching listeners to rendered markup
//!
//! ## Macros
//!
//! - [`html!`]: builds a template from alternating literals and values
//!
//! ## Example
//!
//! ```
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use enhanceable_pages::{Component, Props, html, render};
//!
//! let card = Component::new(|props: Props| async move {
//!     let children = props.children().cloned();
//!     html!("<div class=\"card\">", children, "</div>").await
//! });
//!
//! let out = render(|| html!("<", card.clone(), ">Hello <b>", "World", "</b></", card, ">"))
//!     .await
//!     .unwrap();
//! assert_eq!(out, r#"<div class="card">Hello <b>World</b></div>"#);
//! # });
//! ```

#![warn(missing_docs)]

pub mod callback;
pub mod component;
pub mod enhancements;
pub mod error;
pub mod escape;
pub mod hydration;
pub mod ssr;

pub use callback::{EventHandler, HandlerTag};
pub use component::{
	AttrValue, Attributes, Child, Component, ComponentFuture, DeferredChild, Markup, Props,
	trusted,
};
pub use enhancements::{
	ClientModule, ClientModuleReference, EnhancementSource, Enhancements, use_enhancements,
};
pub use error::RenderError;
pub use hydration::{DocumentFragment, Event, HydrationError, hydrate};
pub use ssr::{
	Environment, RenderContext, RenderOptions, RenderOutput, Renderer, current_context, html,
	render, run_with_context,
};
