//! Interpolated template values.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::attributes::{Attributes, format_number};
use super::definition::Component;
use super::markup::Markup;
use crate::error::RenderError;

/// A value that resolves to a [`Child`] later.
pub type DeferredChild = BoxFuture<'static, Result<Child, RenderError>>;

/// A value interpolated into a template.
///
/// How a child renders depends on where it appears:
///
/// - `Text` is escaped; `Markup` is emitted verbatim
/// - `Attributes` directly after a tag name serialize as attributes
/// - `Component` opens, closes or self-closes a component invocation
/// - `Fragment` flattens depth-first with no separator
/// - `Deferred` is awaited in source order before anything else happens
/// - `Empty` renders nothing
pub enum Child {
	/// Raw text.
	Text(String),
	/// Trusted markup.
	Markup(Markup),
	/// An attribute bag, or a component's props.
	Attributes(Attributes),
	/// A component function.
	Component(Component),
	/// An ordered, possibly nested sequence.
	Fragment(Vec<Child>),
	/// A value still being computed.
	Deferred(DeferredChild),
	/// Nothing (the rendering of `None` and booleans).
	Empty,
}

impl Child {
	/// Wraps a future as a deferred child.
	///
	/// # Example
	///
	/// ```
	/// use enhanceable_pages::{Child, html};
	///
	/// let later = Child::deferred(async { Ok::<_, enhanceable_pages::RenderError>("soon") });
	/// let nested = Child::deferred(html!("<em>", "x", "</em>"));
	/// # let _ = (later, nested);
	/// ```
	pub fn deferred<F, C>(future: F) -> Self
	where
		F: Future<Output = Result<C, RenderError>> + Send + 'static,
		C: Into<Child>,
	{
		Self::Deferred(future.map(|res| res.map(Into::<Child>::into)).boxed())
	}

	/// Creates a text child.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// Returns true if this is a component.
	pub fn is_component(&self) -> bool {
		matches!(self, Self::Component(_))
	}

	/// Awaits a deferred child until a concrete value remains.
	pub(crate) async fn resolve(self) -> Result<Self, RenderError> {
		let mut child = self;
		while let Self::Deferred(future) = child {
			child = future.await?;
		}
		Ok(child)
	}
}

impl Default for Child {
	fn default() -> Self {
		Self::Empty
	}
}

impl fmt::Debug for Child {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
			Self::Markup(m) => f.debug_tuple("Markup").field(m).finish(),
			Self::Attributes(a) => f.debug_tuple("Attributes").field(a).finish(),
			Self::Component(c) => f.debug_tuple("Component").field(c).finish(),
			Self::Fragment(items) => f.debug_tuple("Fragment").field(items).finish(),
			Self::Deferred(_) => f.write_str("Deferred(..)"),
			Self::Empty => f.write_str("Empty"),
		}
	}
}

impl From<&str> for Child {
	fn from(s: &str) -> Self {
		Self::Text(s.to_string())
	}
}

impl From<String> for Child {
	fn from(s: String) -> Self {
		Self::Text(s)
	}
}

impl From<&String> for Child {
	fn from(s: &String) -> Self {
		Self::Text(s.clone())
	}
}

impl From<Cow<'_, str>> for Child {
	fn from(s: Cow<'_, str>) -> Self {
		Self::Text(s.into_owned())
	}
}

impl From<char> for Child {
	fn from(c: char) -> Self {
		Self::Text(c.to_string())
	}
}

impl From<bool> for Child {
	fn from(_: bool) -> Self {
		Self::Empty
	}
}

impl From<()> for Child {
	fn from(_: ()) -> Self {
		Self::Empty
	}
}

impl From<Markup> for Child {
	fn from(m: Markup) -> Self {
		Self::Markup(m)
	}
}

impl From<&Markup> for Child {
	fn from(m: &Markup) -> Self {
		Self::Markup(m.clone())
	}
}

impl From<Attributes> for Child {
	fn from(a: Attributes) -> Self {
		Self::Attributes(a)
	}
}

impl From<Component> for Child {
	fn from(c: Component) -> Self {
		Self::Component(c)
	}
}

impl From<&Component> for Child {
	fn from(c: &Component) -> Self {
		Self::Component(c.clone())
	}
}

impl<T: Into<Child>> From<Option<T>> for Child {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Empty, Into::into)
	}
}

impl<T: Into<Child>> From<Vec<T>> for Child {
	fn from(items: Vec<T>) -> Self {
		Self::Fragment(items.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Child>, const N: usize> From<[T; N]> for Child {
	fn from(items: [T; N]) -> Self {
		Self::Fragment(items.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Child>> FromIterator<T> for Child {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self::Fragment(iter.into_iter().map(Into::into).collect())
	}
}

macro_rules! impl_integer_child {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Child {
				fn from(n: $ty) -> Self {
					Self::Text(n.to_string())
				}
			}
		)*
	};
}

impl_integer_child!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<f32> for Child {
	fn from(n: f32) -> Self {
		Self::Text(format_number(f64::from(n)))
	}
}

impl From<f64> for Child {
	fn from(n: f64) -> Self {
		Self::Text(format_number(n))
	}
}
