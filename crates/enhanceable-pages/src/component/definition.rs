//! Component functions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use super::attributes::Props;
use super::child::Child;
use crate::error::RenderError;

/// The boxed future a component returns.
pub type ComponentFuture = BoxFuture<'static, Result<Child, RenderError>>;

type RenderFn = dyn Fn(Props) -> ComponentFuture + Send + Sync + 'static;

/// A reusable piece of markup: an async function from [`Props`] to a [`Child`].
///
/// Interpolated into a template, a component is invoked either self-closing
/// (`<${C} ${props} />`) or with children (`<${C}>...</${C}>`); the children
/// arrive as trusted markup under [`Props::children`].
///
/// # Example
///
/// ```
/// use enhanceable_pages::{Component, html};
///
/// let wrapper = Component::new(|props| async move {
///     let children = props.children().cloned().unwrap_or_default();
///     html!("<div class=\"wrapper\">", children, "</div>").await
/// });
/// assert_eq!(wrapper.name(), "anonymous");
/// ```
#[derive(Clone)]
pub struct Component {
	name: &'static str,
	render: Arc<RenderFn>,
}

impl Component {
	/// Creates a component from an async function.
	pub fn new<F, Fut, C>(f: F) -> Self
	where
		F: Fn(Props) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<C, RenderError>> + Send + 'static,
		C: Into<Child>,
	{
		Self {
			name: "anonymous",
			render: Arc::new(move |props: Props| {
				f(props)
					.map(|res| res.map(Into::<Child>::into))
					.boxed()
			}),
		}
	}

	/// Creates a component from a synchronous function.
	pub fn from_fn<F, C>(f: F) -> Self
	where
		F: Fn(Props) -> Result<C, RenderError> + Send + Sync + 'static,
		C: Into<Child>,
	{
		Self {
			name: "anonymous",
			render: Arc::new(move |props: Props| {
				let result: Result<Child, RenderError> = f(props).map(Into::into);
				future::ready(result).boxed()
			}),
		}
	}

	/// Sets the name used in logs and debug output.
	pub fn named(mut self, name: &'static str) -> Self {
		self.name = name;
		self
	}

	/// Returns the component's name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Invokes the component.
	pub fn call(&self, props: Props) -> ComponentFuture {
		(self.render)(props)
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::Attributes;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_async_component_call() {
		let greeting = Component::new(|props: Props| async move {
			let name = props.get_str("name").unwrap_or("world").to_string();
			Ok(format!("Hello, {name}"))
		})
		.named("Greeting");

		let child = greeting
			.call(Attributes::new().attr("name", "Alice"))
			.await
			.unwrap();
		assert!(matches!(child, Child::Text(ref s) if s == "Hello, Alice"));
		assert_eq!(greeting.name(), "Greeting");
	}

	#[rstest]
	#[tokio::test]
	async fn test_sync_component_error() {
		let failing = Component::from_fn(|_| Err::<Child, _>(RenderError::component("nope")));
		let err = failing.call(Props::new()).await.unwrap_err();
		assert_eq!(err, RenderError::component("nope"));
	}
}
