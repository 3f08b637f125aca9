//! Per-render context.
//!
//! A [`RenderContext`] carries the bookkeeping one render accumulates: the
//! client module ids referenced while rendering, and (where hydration is
//! supported) the [`FunctionRegistry`] mapping handlers to stable ids.
//!
//! The active context is ambient: [`run_with_context`] installs it for the
//! whole asynchronous extent of a future using a tokio task-local, and
//! [`current_context`] reads it back from anywhere in the call chain. This is
//! equivalent to threading the handle through every component call
//! explicitly. Concurrent renders each install their own context and never
//! observe one another's, even when interleaved on one runtime thread. Work
//! moved onto another task with `tokio::spawn` does not inherit the context.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;

use super::markers::generate_function_id;
use crate::callback::{EventHandler, HandlerTag};
use crate::error::RenderError;

tokio::task_local! {
	static RENDER_CONTEXT: RenderContext;
}

/// Where a render runs, which decides whether handlers can be hydrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
	/// Server render: no function registry, handler attributes are an error.
	#[default]
	Server,
	/// Browser render: handler attributes become hydration markers.
	Browser,
}

impl Environment {
	/// Returns true if contexts for this environment carry a function registry.
	pub fn supports_hydration(self) -> bool {
		matches!(self, Self::Browser)
	}
}

#[derive(Default)]
struct RegistryMaps {
	id_of: HashMap<HandlerTag, String>,
	function_of: HashMap<String, EventHandler>,
}

/// Bidirectional handler ↔ id registry.
///
/// The handler → id side is keyed by [`HandlerTag`], so it never keeps a
/// handler alive by itself. A handler maps to exactly one id for the
/// lifetime of the registry and every id resolves to exactly one handler.
#[derive(Default)]
pub struct FunctionRegistry {
	maps: Mutex<RegistryMaps>,
}

impl FunctionRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the handler's id, allocating one on first sight.
	pub fn id_for(&self, handler: &EventHandler) -> String {
		let mut maps = self.maps.lock();
		if let Some(id) = maps.id_of.get(&handler.tag()) {
			return id.clone();
		}
		let id = generate_function_id();
		maps.id_of.insert(handler.tag(), id.clone());
		maps.function_of.insert(id.clone(), handler.clone());
		id
	}

	/// Resolves an id back to its handler.
	pub fn function_for(&self, id: &str) -> Option<EventHandler> {
		self.maps.lock().function_of.get(id).cloned()
	}

	/// Binds a known id to a handler, as companion build tooling does when it
	/// pre-populates a browser context.
	///
	/// Re-registering an existing binding is a no-op; a binding that would
	/// give an id or a handler a second partner is rejected.
	pub fn register(&self, id: impl Into<String>, handler: EventHandler) -> Result<(), RenderError> {
		let id = id.into();
		let mut maps = self.maps.lock();

		let existing_id = maps.id_of.get(&handler.tag());
		let existing_fn = maps.function_of.get(&id);
		match (existing_id, existing_fn) {
			(None, None) => {
				maps.id_of.insert(handler.tag(), id.clone());
				maps.function_of.insert(id, handler);
				Ok(())
			}
			(Some(known), Some(bound)) if *known == id && bound.ptr_eq(&handler) => Ok(()),
			_ => Err(RenderError::RegistryConflict { id }),
		}
	}

	/// Number of registered handlers.
	pub fn len(&self) -> usize {
		self.maps.lock().function_of.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

struct ContextInner {
	environment: Environment,
	modules: Mutex<IndexSet<String>>,
	functions: Option<FunctionRegistry>,
}

/// Shared handle to one render's bookkeeping.
///
/// Cloning is cheap and yields the same context, which is how nested
/// component calls share state with the top-level renderer.
#[derive(Clone)]
pub struct RenderContext {
	inner: Arc<ContextInner>,
}

impl RenderContext {
	/// Creates an empty context for `environment`.
	pub fn new(environment: Environment) -> Self {
		Self {
			inner: Arc::new(ContextInner {
				environment,
				modules: Mutex::new(IndexSet::new()),
				functions: environment
					.supports_hydration()
					.then(FunctionRegistry::new),
			}),
		}
	}

	/// The environment this context was created for.
	pub fn environment(&self) -> Environment {
		self.inner.environment
	}

	/// The function registry, if this environment supports hydration.
	pub fn functions(&self) -> Option<&FunctionRegistry> {
		self.inner.functions.as_ref()
	}

	/// Records a client module id; repeated ids are collapsed.
	pub fn record_module_reference(&self, module_id: impl Into<String>) {
		self.inner.modules.lock().insert(module_id.into());
	}

	/// Referenced module ids in first-reference order.
	pub fn referenced_modules(&self) -> Vec<String> {
		self.inner.modules.lock().iter().cloned().collect()
	}

	/// Returns true if both handles point at the same context.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Default for RenderContext {
	fn default() -> Self {
		Self::new(Environment::default())
	}
}

impl std::fmt::Debug for RenderContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RenderContext")
			.field("environment", &self.inner.environment)
			.field("modules", &*self.inner.modules.lock())
			.field(
				"functions",
				&self.inner.functions.as_ref().map(FunctionRegistry::len),
			)
			.finish()
	}
}

/// Returns the context installed for the current task, if any.
pub fn current_context() -> Option<RenderContext> {
	RENDER_CONTEXT.try_with(Clone::clone).ok()
}

/// Runs `body` with `context` installed as the current context.
///
/// The previous context (or none) is restored when `body` completes, fails
/// or unwinds.
pub async fn run_with_context<F>(context: RenderContext, body: F) -> F::Output
where
	F: Future,
{
	RENDER_CONTEXT.scope(context, body).await
}

/// Adds `module_id` to the context's referenced modules.
pub fn record_module_reference(context: &RenderContext, module_id: impl Into<String>) {
	context.record_module_reference(module_id);
}
