//! Client behaviour enhancements.
//!
//! A component asks for its client-side behaviours through
//! [`use_enhancements`]. Where the behaviour module is available locally the
//! handlers are returned as they are and end up hydrated. Where the module
//! only exists as a build-time [`ClientModuleReference`], asking for a
//! behaviour records the module against the current render (so the renderer
//! emits a loader for it) and yields an inline expression that imports the
//! module and calls the behaviour when the event fires.

use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::callback::EventHandler;
use crate::component::AttrValue;
use crate::error::RenderError;
use crate::ssr::context::{RenderContext, current_context};

const PLACEHOLDER_PREFIX: &str = "___ENHANCEABLE_CLIENT_ID_";
const PLACEHOLDER_SUFFIX: &str = "___";

/// A client behaviour module whose handlers are available in-process.
///
/// # Example
///
/// ```
/// use enhanceable_pages::enhancements::ClientModule;
/// use enhanceable_pages::EventHandler;
///
/// let module = ClientModule::new().handler("toggle", EventHandler::new(|_| {}));
/// assert!(module.get("toggle").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientModule {
	handlers: IndexMap<String, EventHandler>,
}

impl ClientModule {
	/// Creates an empty module.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a named handler.
	pub fn handler(mut self, name: impl Into<String>, handler: EventHandler) -> Self {
		self.handlers.insert(name.into(), handler);
		self
	}

	/// Looks up a handler by name.
	pub fn get(&self, name: &str) -> Option<&EventHandler> {
		self.handlers.get(name)
	}

	/// Iterates over the module's behaviour names.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.handlers.keys().map(String::as_str)
	}
}

/// A reference to a client behaviour module produced by build tooling.
///
/// `id` is what the loader imports. `chunks` lists additional module ids
/// the module depends on; they are recorded ahead of the module itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientModuleReference {
	id: String,
	chunks: Vec<String>,
}

impl ClientModuleReference {
	/// Creates a reference to the module with the given id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			chunks: Vec::new(),
		}
	}

	/// Sets the dependency chunk ids.
	pub fn with_chunks<I, S>(mut self, chunks: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.chunks = chunks.into_iter().map(Into::into).collect();
		self
	}

	/// Creates a reference whose id is the production build placeholder for
	/// `module_path`.
	///
	/// The placeholder has the form `___ENHANCEABLE_CLIENT_ID_<sha256>___`,
	/// where `<sha256>` is the lower-case hex digest of the module path. A
	/// post-build step replaces it with the emitted asset URL.
	pub fn placeholder(module_path: &str) -> Self {
		let digest = Sha256::digest(module_path.as_bytes());
		Self::new(format!("{PLACEHOLDER_PREFIX}{digest:x}{PLACEHOLDER_SUFFIX}"))
	}

	/// The module id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// The dependency chunk ids.
	pub fn chunks(&self) -> &[String] {
		&self.chunks
	}

	fn loader_expression(&self, name: &str) -> String {
		format!(
			"import({}).then(m => m[{}].call(this, event))",
			serde_json::Value::from(self.id.as_str()),
			serde_json::Value::from(name)
		)
	}
}

/// Where a component's behaviours come from.
#[derive(Debug, Clone)]
pub enum EnhancementSource {
	/// Behaviours are called directly.
	LocalModule(ClientModule),
	/// Behaviours are requested by name and loaded in the browser.
	RemoteReference(ClientModuleReference),
}

impl From<ClientModule> for EnhancementSource {
	fn from(module: ClientModule) -> Self {
		Self::LocalModule(module)
	}
}

impl From<ClientModuleReference> for EnhancementSource {
	fn from(reference: ClientModuleReference) -> Self {
		Self::RemoteReference(reference)
	}
}

/// Behaviours bound to the render that requested them.
#[derive(Debug, Clone)]
pub struct Enhancements {
	source: EnhancementSource,
	context: RenderContext,
}

impl Enhancements {
	/// Returns the behaviour `name` as an attribute value.
	///
	/// Local behaviours come back as [`AttrValue::Handler`]. Remote ones come
	/// back as an inline loader expression after the module and its chunks
	/// have been recorded in the render context.
	///
	/// # Errors
	///
	/// [`RenderError::UnknownEnhancement`] if a local module has no behaviour
	/// called `name`.
	pub fn get(&self, name: &str) -> Result<AttrValue, RenderError> {
		match &self.source {
			EnhancementSource::LocalModule(module) => module
				.get(name)
				.cloned()
				.map(AttrValue::Handler)
				.ok_or_else(|| RenderError::UnknownEnhancement {
					name: name.to_string(),
				}),
			EnhancementSource::RemoteReference(reference) => {
				for chunk in reference.chunks() {
					self.context.record_module_reference(chunk.as_str());
				}
				self.context.record_module_reference(reference.id());
				trace!(module = reference.id(), behaviour = name, "referenced client module");
				Ok(AttrValue::Str(reference.loader_expression(name)))
			}
		}
	}

	/// Returns true if behaviours are called directly.
	pub fn is_local(&self) -> bool {
		matches!(self.source, EnhancementSource::LocalModule(_))
	}
}

/// Binds a behaviour source to the current render.
///
/// # Errors
///
/// [`RenderError::ContextNotFound`] outside of a render.
///
/// # Example
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use enhanceable_pages::enhancements::{ClientModuleReference, use_enhancements};
/// use enhanceable_pages::{Attributes, render, html};
///
/// let out = render(|| async {
///     let toggle = use_enhancements(ClientModuleReference::new("/toggle.js"))?;
///     let attrs = Attributes::new().attr("onclick", toggle.get("toggle")?);
///     html!("<button", attrs, ">Toggle</button>").await
/// })
/// .await
/// .unwrap();
/// assert!(out.ends_with(r#"<script async type="module">import("/toggle.js");</script>"#));
/// # });
/// ```
pub fn use_enhancements(source: impl Into<EnhancementSource>) -> Result<Enhancements, RenderError> {
	let context = current_context().ok_or(RenderError::ContextNotFound)?;
	Ok(Enhancements {
		source: source.into(),
		context,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ssr::context::{Environment, run_with_context};
	use rstest::rstest;

	#[rstest]
	fn test_use_enhancements_requires_context() {
		let err = use_enhancements(ClientModule::new()).unwrap_err();
		assert_eq!(err, RenderError::ContextNotFound);
	}

	#[rstest]
	#[tokio::test]
	async fn test_local_module_returns_handler() {
		let handler = EventHandler::new(|_| {});
		let module = ClientModule::new().handler("open", handler.clone());
		let context = RenderContext::new(Environment::Browser);

		let value = run_with_context(context.clone(), async {
			let enhancements = use_enhancements(module)?;
			assert!(enhancements.is_local());
			enhancements.get("open")
		})
		.await
		.unwrap();

		assert_eq!(value.as_handler(), Some(&handler));
		assert!(context.referenced_modules().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_local_module_unknown_name() {
		let result = run_with_context(RenderContext::default(), async {
			use_enhancements(ClientModule::new())?.get("missing")
		})
		.await;
		assert_eq!(
			result,
			Err(RenderError::UnknownEnhancement {
				name: "missing".to_string()
			})
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_remote_reference_records_modules() {
		let reference = ClientModuleReference::new("/assets/menu.js").with_chunks(["/assets/shared.js"]);
		let context = RenderContext::default();

		let value = run_with_context(context.clone(), async {
			let enhancements = use_enhancements(reference)?;
			enhancements.get("open")?;
			enhancements.get("close")
		})
		.await
		.unwrap();

		assert_eq!(
			value.as_str(),
			Some(r#"import("/assets/menu.js").then(m => m["close"].call(this, event))"#)
		);
		assert_eq!(
			context.referenced_modules(),
			vec!["/assets/shared.js", "/assets/menu.js"]
		);
	}

	#[rstest]
	fn test_placeholder_id() {
		let reference = ClientModuleReference::placeholder("");
		assert_eq!(
			reference.id(),
			"___ENHANCEABLE_CLIENT_ID_e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855___"
		);

		let a = ClientModuleReference::placeholder("src/menu.client.ts");
		let b = ClientModuleReference::placeholder("src/menu.client.ts");
		assert_eq!(a, b);
		assert_ne!(a, ClientModuleReference::placeholder("src/other.client.ts"));
		assert!(a.chunks().is_empty());
	}
}
