//! # Enhanceable
//!
//! Server-side HTML templating and component composition with opt-in client
//! hydration.
//!
//! Components are plain async functions returning markup. Interpolated text
//! is escaped automatically, components nest with a JSX-like open/close
//! syntax resolved at runtime, and event handlers placed in attributes are
//! turned into stable ids that a client-side hydration pass resolves back to
//! live listeners.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - template engine, render context, renderer and hydrator
//!
//! ## Quick Example
//!
//! ```
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use enhanceable::{Attributes, html, render};
//!
//! let out = render(|| {
//!     let attrs = Attributes::new().attr("class", "greeting");
//!     html!("<p", attrs, ">Hello, ", "<b>world</b>", "!</p>")
//! })
//! .await
//! .unwrap();
//! assert_eq!(out, r#"<p class="greeting">Hello, &lt;b&gt;world&lt;/b&gt;!</p>"#);
//! # });
//! ```

#[cfg(feature = "pages")]
pub mod pages;

#[cfg(feature = "pages")]
pub use enhanceable_pages::{
	AttrValue, Attributes, Child, Component, EventHandler, Markup, Props, RenderContext,
	RenderError, RenderOptions, Renderer, html, render, trusted, use_enhancements,
};
