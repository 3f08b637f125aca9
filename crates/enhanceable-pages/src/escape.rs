//! HTML text escaping.
//!
//! Every interpolated text value and every non-opaque attribute value passes
//! through [`escape`] exactly once. Escaping is not idempotent: running it
//! over already escaped text escapes the ampersands a second time.

use std::borrow::Cow;

const SPECIAL_CHARS: [char; 5] = ['&', '<', '>', '"', '\''];

/// Escapes the five HTML special characters `& < > " '`.
///
/// Returns the input unchanged (borrowed, no allocation) when it contains
/// none of them.
///
/// # Example
///
/// ```
/// use enhanceable_pages::escape::escape;
///
/// assert_eq!(escape("<b>world</b>"), "&lt;b&gt;world&lt;/b&gt;");
/// assert_eq!(escape("plain"), "plain");
/// ```
pub fn escape(s: &str) -> Cow<'_, str> {
	if !s.contains(SPECIAL_CHARS) {
		return Cow::Borrowed(s);
	}

	let mut escaped = String::with_capacity(s.len() + 16);
	for c in s.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}
