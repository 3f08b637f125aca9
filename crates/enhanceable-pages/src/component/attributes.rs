//! Attribute bags and component props.

use indexmap::IndexMap;

use super::markup::Markup;
use crate::callback::EventHandler;

/// Reserved key carrying a component's children.
pub(crate) const CHILDREN_KEY: &str = "children";

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
	/// Text, escaped when serialized.
	Str(String),
	/// A number, serialized in its shortest decimal form.
	Number(f64),
	/// `true` renders the bare attribute name, `false` omits it.
	Bool(bool),
	/// Trusted markup, inserted into the attribute value unescaped.
	Markup(Markup),
	/// An event handler, serialized as a hydration marker.
	Handler(EventHandler),
	/// Omitted from the output.
	Absent,
}

impl AttrValue {
	/// Returns the string value, if this is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the numeric value, if this is a number.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the markup value, if this is markup.
	pub fn as_markup(&self) -> Option<&Markup> {
		match self {
			Self::Markup(m) => Some(m),
			_ => None,
		}
	}

	/// Returns the handler, if this is an event handler.
	pub fn as_handler(&self) -> Option<&EventHandler> {
		match self {
			Self::Handler(h) => Some(h),
			_ => None,
		}
	}

	/// Returns true if the attribute is left out of serialized output.
	pub fn is_omitted(&self) -> bool {
		matches!(self, Self::Bool(false) | Self::Absent)
	}
}

/// Formats a number the way a JavaScript `String(n)` would for ordinary values.
pub(crate) fn format_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n == f64::INFINITY {
		"Infinity".to_string()
	} else if n == f64::NEG_INFINITY {
		"-Infinity".to_string()
	} else if n == 0.0 {
		"0".to_string()
	} else {
		n.to_string()
	}
}

impl From<&str> for AttrValue {
	fn from(s: &str) -> Self {
		Self::Str(s.to_string())
	}
}

impl From<String> for AttrValue {
	fn from(s: String) -> Self {
		Self::Str(s)
	}
}

impl From<&String> for AttrValue {
	fn from(s: &String) -> Self {
		Self::Str(s.clone())
	}
}

impl From<bool> for AttrValue {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<Markup> for AttrValue {
	fn from(m: Markup) -> Self {
		Self::Markup(m)
	}
}

impl From<EventHandler> for AttrValue {
	fn from(h: EventHandler) -> Self {
		Self::Handler(h)
	}
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Absent, Into::into)
	}
}

macro_rules! impl_number_attr {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for AttrValue {
				fn from(n: $ty) -> Self {
					Self::Number(n as f64)
				}
			}
		)*
	};
}

impl_number_attr!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// An ordered attribute bag.
///
/// Serialization follows insertion order. When used as component props the
/// reserved `children` key carries the markup between the component's open
/// and close markers.
///
/// # Example
///
/// ```
/// use enhanceable_pages::Attributes;
///
/// let attrs = Attributes::new()
///     .attr("class", "btn")
///     .attr("disabled", true)
///     .attr("hidden", false);
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(attrs.get_str("class"), Some("btn"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
	entries: IndexMap<String, AttrValue>,
}

/// Component props are attribute bags.
pub type Props = Attributes;

impl Attributes {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an attribute, builder style.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.entries.insert(name.into(), value.into());
		self
	}

	/// Inserts an attribute, returning the previous value for that name.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
		self.entries.insert(name.into(), value.into())
	}

	/// Looks up an attribute.
	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.entries.get(name)
	}

	/// Looks up a string attribute.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(AttrValue::as_str)
	}

	/// Looks up a numeric attribute.
	pub fn get_number(&self, name: &str) -> Option<f64> {
		self.get(name).and_then(AttrValue::as_number)
	}

	/// Returns true if the bag holds `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Returns the children passed to a component, if any.
	pub fn children(&self) -> Option<&Markup> {
		self.get(CHILDREN_KEY).and_then(AttrValue::as_markup)
	}

	/// Returns the bag with `children` set.
	pub fn with_children(mut self, children: Markup) -> Self {
		self.entries
			.insert(CHILDREN_KEY.to_string(), AttrValue::Markup(children));
		self
	}

	/// Iterates over attributes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Returns the number of attributes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the bag is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<String>,
	V: Into<AttrValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for Attributes
where
	K: Into<String>,
	V: Into<AttrValue>,
{
	fn from(entries: [(K, V); N]) -> Self {
		entries.into_iter().collect()
	}
}
