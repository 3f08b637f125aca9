//! Server-side rendering.
//!
//! - [`template`]: the template engine and the [`html!`](crate::html!) macro
//! - [`attributes`]: attribute bag serialization
//! - [`context`]: the per-render context and function registry
//! - [`renderer`]: top-level renders and the enhancement loader
//! - [`markers`]: the hydration marker format shared with the hydrator

pub mod attributes;
pub mod context;
pub mod markers;
pub mod renderer;
pub mod template;

pub use attributes::render_attributes;
pub use context::{
	Environment, FunctionRegistry, RenderContext, current_context, record_module_reference,
	run_with_context,
};
pub use markers::{HYDRATE_ATTR, HYDRATE_EVENT_PREFIX};
pub use renderer::{RenderOptions, RenderOutput, Renderer, enhancement_loader, render};
pub use template::{flatten, html};
