//! Opaque markup.

use std::fmt;

/// An immutable wrapper around a raw HTML string.
///
/// Markup is emitted verbatim wherever it is interpolated. Constructing it
/// from arbitrary text is the sanctioned way to say "this has been checked
/// and is safe"; use it only for content you produced or sanitized yourself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
	/// Wraps a raw HTML string without escaping it.
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	/// Returns the raw HTML.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Consumes the markup, returning the raw HTML.
	pub fn into_string(self) -> String {
		self.0
	}

	/// Returns true if the markup is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for Markup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<Markup> for String {
	fn from(markup: Markup) -> Self {
		markup.0
	}
}

impl AsRef<str> for Markup {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Marks a raw HTML string as trusted markup.
///
/// # Example
///
/// ```
/// use enhanceable_pages::trusted;
///
/// let markup = trusted("<script>alert('x');</script>");
/// assert_eq!(markup.to_string(), "<script>alert('x');</script>");
/// ```
pub fn trusted(html: impl Into<String>) -> Markup {
	Markup::new(html)
}
