//! Top-level renderer.
//!
//! A render runs a template inside a fresh [`RenderContext`] and, when any
//! client behaviour module was referenced along the way, appends a single
//! loader script that imports each module once.

use std::future::Future;

use tracing::debug;

use super::context::{Environment, RenderContext, run_with_context};
use crate::component::Markup;
use crate::error::RenderError;

/// Options for rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
	/// The environment renders run in. Only [`Environment::Browser`] renders
	/// carry a function registry and accept handler attributes.
	pub environment: Environment,
}

impl RenderOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;
		self
	}

	/// Shorthand for `environment(Environment::Browser)`.
	pub fn browser(self) -> Self {
		self.environment(Environment::Browser)
	}
}

/// The result of [`Renderer::render_with_context`].
#[derive(Debug)]
pub struct RenderOutput {
	/// The rendered HTML, loader script included.
	pub html: String,
	/// The context the template ran in.
	pub context: RenderContext,
}

/// Renders templates, each in its own context.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
	options: RenderOptions,
}

impl Renderer {
	/// Creates a renderer with custom options.
	pub fn new(options: RenderOptions) -> Self {
		Self { options }
	}

	/// Returns the renderer's options.
	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	/// Renders `template` to a string.
	///
	/// # Example
	///
	/// ```
	/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
	/// use enhanceable_pages::{Renderer, html};
	///
	/// let html = Renderer::default()
	///     .render(|| html!("<h1>", "Hi", "</h1>"))
	///     .await
	///     .unwrap();
	/// assert_eq!(html, "<h1>Hi</h1>");
	/// # });
	/// ```
	pub async fn render<F, Fut>(&self, template: F) -> Result<String, RenderError>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Markup, RenderError>>,
	{
		Ok(self.render_with_context(template).await?.html)
	}

	/// Renders `template` and also returns the context it ran in.
	///
	/// Handlers registered during a browser render stay resolvable through
	/// the returned context, which is what [`hydrate`](crate::hydration::hydrate)
	/// needs.
	pub async fn render_with_context<F, Fut>(&self, template: F) -> Result<RenderOutput, RenderError>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<Markup, RenderError>>,
	{
		let context = RenderContext::new(self.options.environment);
		debug!(environment = ?self.options.environment, "render started");

		let markup = run_with_context(context.clone(), template()).await?;

		let modules = context.referenced_modules();
		let mut html = markup.into_string();
		if !modules.is_empty() {
			html.push_str(&enhancement_loader(&modules));
		}

		debug!(
			bytes = html.len(),
			modules = modules.len(),
			"render finished"
		);
		Ok(RenderOutput { html, context })
	}
}

/// Renders `template` with default options.
pub async fn render<F, Fut>(template: F) -> Result<String, RenderError>
where
	F: FnOnce() -> Fut,
	Fut: Future<Output = Result<Markup, RenderError>>,
{
	Renderer::default().render(template).await
}

/// Builds the loader script importing each module id in order.
///
/// Ids are emitted as JSON string literals; a `</` inside an id is written
/// as `<\/` so it cannot end the script element. Repeated ids are skipped.
pub fn enhancement_loader<S: AsRef<str>>(module_ids: &[S]) -> String {
	let mut seen = std::collections::HashSet::new();
	let mut script = String::from(r#"<script async type="module">"#);
	for id in module_ids {
		let id = id.as_ref();
		if !seen.insert(id) {
			continue;
		}
		script.push_str("import(");
		script.push_str(&escape_json_for_script(&serde_json::Value::from(id).to_string()));
		script.push_str(");");
	}
	script.push_str("</script>");
	script
}

fn escape_json_for_script(json: &str) -> String {
	json.replace("</", "<\\/")
}
