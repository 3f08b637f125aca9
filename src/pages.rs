//! Templates, rendering and hydration
//!
//! This module provides access to enhanceable-pages, the template engine and
//! its render context, renderer and hydrator.
//!
//! ## Architecture
//!
//! - **Template engine**: literal segments and values evaluated into escaped markup
//! - **Components**: async functions from props to markup, with children
//! - **Render context**: per-render module references and function registry
//! - **Hydration**: re-attaching event listeners from `data-hydrate` markers
//!
//! ## Example
//!
//! ```rust
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use enhanceable::pages::ssr::{Environment, RenderOptions, Renderer};
//! use enhanceable::pages::{Attributes, EventHandler, hydrate, html};
//!
//! let on_click = EventHandler::new(|_| {});
//! let renderer = Renderer::new(RenderOptions::new().environment(Environment::Browser));
//!
//! let output = renderer
//!     .render_with_context(|| {
//!         let attrs = Attributes::new().attr("onclick", on_click.clone());
//!         html!("<button", attrs, ">Go</button>")
//!     })
//!     .await
//!     .unwrap();
//!
//! let markup = enhanceable::pages::trusted(output.html);
//! let fragment = hydrate(&markup, &output.context).unwrap();
//! assert_eq!(fragment.to_html(), "<button>Go</button>");
//! # });
//! ```

// Re-export all enhanceable-pages functionality
pub use enhanceable_pages::*;
