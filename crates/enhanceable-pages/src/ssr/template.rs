//! Template engine.
//!
//! Evaluates a template given as alternating literal segments and
//! interpolated [`Child`] values. Component values drive a stack of open
//! frames: `<${C}>` opens a frame that collects everything up to the
//! matching `</${C}>`, while `<${C} />` renders in place. The angle-bracket
//! punctuation surrounding a component value is consumed rather than
//! emitted.
//!
//! Values are resolved strictly in source order. A deferred value is awaited
//! the first time the engine looks at it, which may be one step early when
//! the engine peeks ahead for props or for the next component.

use tracing::trace;

use super::attributes::render_attributes;
use crate::component::{Child, Component, Markup, Props};
use crate::error::RenderError;
use crate::escape::escape;

/// Which tag punctuation to consume from the start of the next segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cleanup {
	None,
	TagClose,
	SelfClose,
}

/// An open component awaiting its closing marker.
struct Frame {
	children: String,
	component: Component,
	props: Props,
}

impl Frame {
	/// Invokes the component with the collected children and flattens the result.
	async fn close(self) -> Result<String, RenderError> {
		let children = strip_closing_marker(&self.children).to_string();
		trace!(component = self.component.name(), "closing component");
		let result = self
			.component
			.call(self.props.with_children(Markup::new(children)))
			.await?;
		flatten(result).await
	}
}

struct Evaluator {
	root: String,
	stack: Vec<Frame>,
	cleanup: Cleanup,
}

impl Evaluator {
	fn buffer(&mut self) -> &mut String {
		match self.stack.last_mut() {
			Some(frame) => &mut frame.children,
			None => &mut self.root,
		}
	}

	/// Returns true if the current buffer ends with a `</` closing marker.
	fn at_closing_marker(&mut self) -> bool {
		trailing_non_whitespace(self.buffer(), 2) == "</"
	}

	fn clean<'s>(&mut self, segment: &'s str, before_component: bool) -> &'s str {
		let stripped = match self.cleanup {
			Cleanup::None => None,
			Cleanup::TagClose => strip_leading_token(segment, ">"),
			Cleanup::SelfClose => strip_leading_token(segment, "/>"),
		};
		let segment = match stripped {
			Some(rest) => {
				self.cleanup = Cleanup::None;
				rest
			}
			None => segment,
		};
		if before_component {
			strip_opening_bracket(segment)
		} else {
			segment
		}
	}
}

/// Evaluates a template.
///
/// `strings` holds the literal segments and `values` the interpolations
/// between them; a missing trailing segment reads as empty. Prefer the
/// [`html!`](crate::html!) macro, which builds both lists.
///
/// # Errors
///
/// Fails with [`RenderError::UnmatchedClosingTag`] when a closing marker has
/// no open component, and propagates any error raised by a component, a
/// deferred value or the attribute serializer.
///
/// # Example
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use enhanceable_pages::html;
///
/// let markup = html(&["Hello, ", "!"], vec!["<b>world</b>".into()]).await.unwrap();
/// assert_eq!(markup.as_str(), "Hello, &lt;b&gt;world&lt;/b&gt;!");
/// # });
/// ```
pub async fn html(strings: &[&str], mut values: Vec<Child>) -> Result<Markup, RenderError> {
	let Some(first) = strings.first() else {
		return Ok(Markup::default());
	};

	resolve_slot(&mut values, 0).await?;
	let mut eval = Evaluator {
		root: if is_component_at(&values, 0) {
			strip_opening_bracket(first).to_string()
		} else {
			(*first).to_string()
		},
		stack: Vec::new(),
		cleanup: Cleanup::None,
	};

	for i in 0..values.len() {
		resolve_slot(&mut values, i).await?;
		let next_segment = segment_at(strings, i + 1);
		let value = std::mem::take(&mut values[i]);
		let mut segment_consumed = false;

		match value {
			Child::Component(component) => {
				if eval.at_closing_marker() {
					let frame = eval.stack.pop().ok_or(RenderError::UnmatchedClosingTag)?;
					let rendered = frame.close().await?;
					eval.buffer().push_str(&rendered);
					eval.cleanup = Cleanup::TagClose;
				} else {
					let rest = strings.get(i + 1..).unwrap_or_default();
					let self_closing = leading_non_whitespace(rest, 2) == "/>";
					eval.cleanup = if self_closing {
						Cleanup::SelfClose
					} else {
						Cleanup::TagClose
					};

					resolve_slot(&mut values, i + 1).await?;
					let props = take_props(&mut values, strings, i);

					if self_closing {
						trace!(component = component.name(), "rendering self-closing component");
						let rendered = flatten(component.call(props).await?).await?;
						eval.buffer().push_str(&rendered);
					} else {
						trace!(component = component.name(), "opening component");
						let first_child = eval.clean(next_segment, is_component_at(&values, i + 1));
						eval.stack.push(Frame {
							children: first_child.to_string(),
							component,
							props,
						});
						segment_consumed = true;
					}
				}
			}
			Child::Markup(markup) => eval.buffer().push_str(markup.as_str()),
			Child::Attributes(attrs) => {
				let rendered = render_attributes(&attrs)?;
				eval.buffer().push_str(&rendered);
			}
			other => {
				let rendered = flatten(other).await?;
				eval.buffer().push_str(&rendered);
			}
		}

		if !segment_consumed {
			resolve_slot(&mut values, i + 1).await?;
			let cleaned = eval.clean(next_segment, is_component_at(&values, i + 1));
			eval.buffer().push_str(cleaned);
		}
	}

	while let Some(frame) = eval.stack.pop() {
		trace!(component = frame.component.name(), "closing unterminated component");
		let rendered = frame.close().await?;
		eval.buffer().push_str(&rendered);
	}

	Ok(Markup::new(eval.root))
}

/// Renders a child as text content.
///
/// Text is escaped, markup is emitted verbatim, sequences flatten depth-first
/// with no separator and deferred values are awaited wherever they appear.
/// Components and attribute bags nested in a sequence render nothing.
pub async fn flatten(child: Child) -> Result<String, RenderError> {
	let mut out = String::new();
	let mut stack = vec![child];

	while let Some(child) = stack.pop() {
		match child {
			Child::Text(text) => out.push_str(&escape(&text)),
			Child::Markup(markup) => out.push_str(markup.as_str()),
			Child::Fragment(items) => stack.extend(items.into_iter().rev()),
			Child::Deferred(future) => stack.push(future.await?),
			Child::Empty => {}
			Child::Attributes(_) | Child::Component(_) => {
				trace!(child = ?child, "skipping child that has no text rendering");
			}
		}
	}

	Ok(out)
}

/// Awaits the value at `index` in place if it is deferred.
async fn resolve_slot(values: &mut [Child], index: usize) -> Result<(), RenderError> {
	if let Some(slot) = values.get_mut(index)
		&& matches!(slot, Child::Deferred(_))
	{
		let pending = std::mem::take(slot);
		*slot = pending.resolve().await?;
	}
	Ok(())
}

fn is_component_at(values: &[Child], index: usize) -> bool {
	values.get(index).is_some_and(Child::is_component)
}

fn segment_at<'s>(strings: &[&'s str], index: usize) -> &'s str {
	strings.get(index).copied().unwrap_or_default()
}

/// Takes the attribute bag following the component at `index` as its props,
/// when the segment after that bag closes the tag.
fn take_props(values: &mut [Child], strings: &[&str], index: usize) -> Props {
	let after = segment_at(strings, index + 2).trim_start();
	if !(after.starts_with('>') || after.starts_with("/>")) {
		return Props::new();
	}
	let Some(slot) = values.get_mut(index + 1) else {
		return Props::new();
	};
	match std::mem::take(slot) {
		Child::Attributes(props) => props,
		other => {
			*slot = other;
			Props::new()
		}
	}
}

fn is_template_whitespace(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// The last `count` non-whitespace characters of `s`, in order.
fn trailing_non_whitespace(s: &str, count: usize) -> String {
	let mut tail: Vec<char> = s
		.chars()
		.rev()
		.filter(|c| !is_template_whitespace(*c))
		.take(count)
		.collect();
	tail.reverse();
	tail.into_iter().collect()
}

/// The first `count` non-whitespace characters across `segments`.
fn leading_non_whitespace(segments: &[&str], count: usize) -> String {
	segments
		.iter()
		.flat_map(|segment| segment.chars())
		.filter(|c| !is_template_whitespace(*c))
		.take(count)
		.collect()
}

fn strip_leading_token<'s>(segment: &'s str, token: &str) -> Option<&'s str> {
	segment.trim_start().strip_prefix(token)
}

/// Drops a trailing `<` (and whitespace after it) left in front of a component.
fn strip_opening_bracket(segment: &str) -> &str {
	segment.trim_end().strip_suffix('<').unwrap_or(segment)
}

/// Drops a trailing `</` (and whitespace after it) from collected children.
fn strip_closing_marker(children: &str) -> &str {
	children.trim_end().strip_suffix("</").unwrap_or(children)
}

/// Evaluates a template written as alternating literals and values.
///
/// `html!("<p>", name, "</p>")` is shorthand for
/// `html(&["<p>", "</p>"], vec![Child::from(name)])`. The invocation must
/// start and end with a string literal; use `""` where a template starts or
/// ends with a value.
///
/// # Example
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use enhanceable_pages::{Attributes, html};
///
/// let attrs = Attributes::new().attr("class", "btn");
/// let markup = html!("<button", attrs, ">", "Save & exit", "</button>")
///     .await
///     .unwrap();
/// assert_eq!(markup.as_str(), r#"<button class="btn">Save &amp; exit</button>"#);
/// # });
/// ```
#[macro_export]
macro_rules! html {
	($first:literal $(, $value:expr, $segment:literal)*) => {
		$crate::html(
			&[$first $(, $segment)*],
			::std::vec![$($crate::Child::from($value)),*],
		)
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::{Attributes, trusted};
	use rstest::{fixture, rstest};
	use std::time::Duration;

	#[fixture]
	fn card() -> Component {
		Component::new(|props: Props| async move {
			let children = props.children().cloned();
			html(&["<div class=\"card\">", "</div>"], vec![children.into()]).await
		})
		.named("Card")
	}

	#[fixture]
	fn greeting() -> Component {
		Component::new(|props: Props| async move {
			let name = props.get_str("name").unwrap_or("world").to_string();
			html(&["<p>Hi ", "</p>"], vec![name.into()]).await
		})
		.named("Greeting")
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_template() {
		assert_eq!(html(&[], vec![]).await.unwrap().as_str(), "");
		assert_eq!(html(&[""], vec![]).await.unwrap().as_str(), "");
	}

	#[rstest]
	#[tokio::test]
	async fn test_literal_only() {
		let markup = html(&["<p>plain</p>"], vec![]).await.unwrap();
		assert_eq!(markup.as_str(), "<p>plain</p>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_text_is_escaped() {
		let markup = html(&["Hello, ", "!"], vec!["<b>world</b>".into()])
			.await
			.unwrap();
		assert_eq!(markup.as_str(), "Hello, &lt;b&gt;world&lt;/b&gt;!");
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_segments_read_as_empty() {
		let markup = html(&["a"], vec!["b".into(), "c".into()]).await.unwrap();
		assert_eq!(markup.as_str(), "abc");
	}

	#[rstest]
	#[tokio::test]
	async fn test_numbers_and_absent_values() {
		let markup = html(
			&["", "|", "|", "|", ""],
			vec![
				Child::from(42),
				Child::from(1.5),
				Child::from(None::<&str>),
				Child::from(false),
			],
		)
		.await
		.unwrap();
		assert_eq!(markup.as_str(), "42|1.5||");
	}

	#[rstest]
	#[tokio::test]
	async fn test_attribute_bag_after_tag_name() {
		let attrs = Attributes::new().attr("class", "btn").attr("disabled", true);
		let markup = html(&["<button", ">Go</button>"], vec![attrs.into()])
			.await
			.unwrap();
		assert_eq!(markup.as_str(), r#"<button class="btn" disabled>Go</button>"#);
	}

	#[rstest]
	#[tokio::test]
	async fn test_sequences_flatten_in_order() {
		let items = vec![
			Child::from(trusted("<li>Item1</li>")),
			Child::from("b"),
			Child::from(vec![Child::from("c"), Child::from(vec!["<d>"])]),
		];
		let markup = html(&["<ul>", "</ul>"], vec![items.into()]).await.unwrap();
		assert_eq!(markup.as_str(), "<ul><li>Item1</li>bc&lt;d&gt;</ul>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_component_with_children(card: Component) {
		let markup = html(
			&["<", ">Hello <b>", "</b></", ">"],
			vec![card.clone().into(), "World".into(), card.into()],
		)
		.await
		.unwrap();
		assert_eq!(markup.as_str(), r#"<div class="card">Hello <b>World</b></div>"#);
	}

	#[rstest]
	#[tokio::test]
	async fn test_component_with_props_and_children() {
		let link = Component::new(|props: Props| async move {
			let href = props.get_str("href").unwrap_or("#").to_string();
			let children = props.children().cloned();
			html(&["<a href=\"", "\">", "</a>"], vec![href.into(), children.into()]).await
		});
		let props = Attributes::new().attr("href", "/docs");
		let markup = html(
			&["<", " ", ">Docs</", ">"],
			vec![link.clone().into(), props.into(), link.into()],
		)
		.await
		.unwrap();
		assert_eq!(markup.as_str(), r#"<a href="/docs">Docs</a>"#);
	}

	#[rstest]
	#[tokio::test]
	async fn test_self_closing_component(greeting: Component) {
		let markup = html(&["<section><", " /></section>"], vec![greeting.into()])
			.await
			.unwrap();
		assert_eq!(markup.as_str(), "<section><p>Hi world</p></section>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_self_closing_component_with_props(greeting: Component) {
		let props = Attributes::new().attr("name", "Ada");
		let markup = html(&["<", " ", " />"], vec![greeting.into(), props.into()])
			.await
			.unwrap();
		assert_eq!(markup.as_str().trim_end(), "<p>Hi Ada</p>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_nested_components(card: Component) {
		let markup = html(
			&["<", "><", ">inner</", "></", ">"],
			vec![
				card.clone().into(),
				card.clone().into(),
				card.clone().into(),
				card.into(),
			],
		)
		.await
		.unwrap();
		assert_eq!(
			markup.as_str(),
			r#"<div class="card"><div class="card">inner</div></div>"#
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unclosed_component_is_closed_at_end(card: Component) {
		let markup = html(&["<", ">tail"], vec![card.into()]).await.unwrap();
		assert_eq!(markup.as_str(), r#"<div class="card">tail</div>"#);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unmatched_closing_tag(card: Component) {
		let err = html(&["</", ">"], vec![card.into()]).await.unwrap_err();
		assert_eq!(err, RenderError::UnmatchedClosingTag);
		assert_eq!(err.to_string(), "unmatched closing tag");
	}

	#[rstest]
	#[tokio::test]
	async fn test_component_error_propagates() {
		let broken = Component::from_fn(|_| Err::<Child, _>(RenderError::component("boom")));
		let err = html(&["<", " />"], vec![broken.into()]).await.unwrap_err();
		assert_eq!(err, RenderError::component("boom"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_deferred_values_keep_source_order() {
		let slow = Child::deferred(async {
			tokio::time::sleep(Duration::from_millis(20)).await;
			Ok::<_, RenderError>("1")
		});
		let fast = Child::deferred(async { Ok::<_, RenderError>("2") });
		let nested = Child::from(vec![
			Child::deferred(async { Ok::<_, RenderError>(trusted("<i>3</i>")) }),
			Child::from("4"),
		]);

		let markup = html(&["a", "b", "c", "d"], vec![slow, fast, nested])
			.await
			.unwrap();
		assert_eq!(markup.as_str(), "a1b2c<i>3</i>4d");
	}

	#[rstest]
	#[tokio::test]
	async fn test_deferred_component(greeting: Component) {
		let deferred = Child::deferred(async move { Ok::<_, RenderError>(greeting) });
		let markup = html(&["<", " />"], vec![deferred]).await.unwrap();
		assert_eq!(markup.as_str(), "<p>Hi world</p>");
	}

	#[rstest]
	#[tokio::test]
	async fn test_components_inside_sequences_render_nothing(card: Component) {
		let markup = html(&["[", "]"], vec![vec![Child::from("a"), card.into()].into()])
			.await
			.unwrap();
		assert_eq!(markup.as_str(), "[a]");
	}

	#[rstest]
	#[tokio::test]
	async fn test_macro_builds_template(card: Component) {
		let markup = crate::html!("<", card.clone(), ">", "x & y", "</", card, ">")
			.await
			.unwrap();
		assert_eq!(markup.as_str(), r#"<div class="card">x &amp; y</div>"#);
	}

	#[rstest]
	#[case("a  </ ", "</")]
	#[case("a\n<\t/", "</")]
	#[case("x", "x")]
	#[case("", "")]
	fn test_trailing_non_whitespace(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(trailing_non_whitespace(input, 2), expected);
	}

	#[rstest]
	fn test_leading_non_whitespace_spans_segments() {
		assert_eq!(leading_non_whitespace(&["  ", " /", "  >x"], 2), "/>");
		assert_eq!(leading_non_whitespace(&["", ">"], 2), ">");
	}

	#[rstest]
	#[case("<div>< ", "<div>")]
	#[case("a <", "a ")]
	#[case("a", "a")]
	fn test_strip_opening_bracket(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(strip_opening_bracket(input), expected);
	}

	#[rstest]
	fn test_cleanup_resets_only_after_stripping() {
		let mut eval = Evaluator {
			root: String::new(),
			stack: Vec::new(),
			cleanup: Cleanup::TagClose,
		};
		assert_eq!(eval.clean(" ", false), " ");
		assert_eq!(eval.cleanup, Cleanup::TagClose);
		assert_eq!(eval.clean(" >rest", false), "rest");
		assert_eq!(eval.cleanup, Cleanup::None);
		assert_eq!(eval.clean(">kept", false), ">kept");
	}
}
