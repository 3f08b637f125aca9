//! Native document fragment used by the hydrator.
//!
//! Markup is parsed with an HTML5 parser (`scraper`, html5ever underneath)
//! and copied into a small arena that supports the operations hydration
//! needs: attribute lookup and removal, listener attachment, event dispatch
//! with bubbling, and serialization back to HTML.

use scraper::{ElementRef, Html, Node as ParsedNode};

use super::events::Event;
use super::runtime::HydrationError;
use crate::callback::EventHandler;
use crate::escape::escape;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// Elements whose text content is serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Index of a node inside a [`DocumentFragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// The content of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// An element with its tag name and attributes in source order.
	Element {
		/// Lower-case tag name
		name: String,
		/// Attributes as `(name, value)` pairs
		attributes: Vec<(String, String)>,
	},
	/// A text node (already decoded).
	Text(String),
	/// A comment.
	Comment(String),
}

#[derive(Debug)]
struct Listener {
	event_type: String,
	handler: EventHandler,
}

#[derive(Debug)]
struct NodeData {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	listeners: Vec<Listener>,
}

/// A parsed, mutable fragment of HTML with live event listeners.
#[derive(Debug, Default)]
pub struct DocumentFragment {
	nodes: Vec<NodeData>,
	roots: Vec<NodeId>,
}

impl DocumentFragment {
	/// Parses markup as a body-context fragment.
	pub fn parse(markup: &str) -> Self {
		let html = Html::parse_fragment(markup);
		let mut fragment = Self::default();
		fragment.import_children(html.root_element(), None);
		fragment
	}

	fn import_children(&mut self, element: ElementRef<'_>, parent: Option<NodeId>) {
		for child in element.children() {
			let id = match child.value() {
				ParsedNode::Text(text) => self.push(NodeKind::Text(text.to_string()), parent),
				ParsedNode::Comment(comment) => {
					self.push(NodeKind::Comment(comment.to_string()), parent)
				}
				ParsedNode::Element(data) => {
					let kind = NodeKind::Element {
						name: data.name().to_string(),
						attributes: data
							.attrs()
							.map(|(name, value)| (name.to_string(), value.to_string()))
							.collect(),
					};
					let id = self.push(kind, parent);
					if let Some(element) = ElementRef::wrap(child) {
						self.import_children(element, Some(id));
					}
					id
				}
				_ => continue,
			};
			if parent.is_none() {
				self.roots.push(id);
			}
		}
	}

	fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeData {
			kind,
			parent,
			children: Vec::new(),
			listeners: Vec::new(),
		});
		if let Some(parent) = parent {
			self.nodes[parent.0].children.push(id);
		}
		id
	}

	/// Top-level nodes in document order.
	pub fn roots(&self) -> &[NodeId] {
		&self.roots
	}

	/// Returns the node's content.
	pub fn kind(&self, id: NodeId) -> &NodeKind {
		&self.nodes[id.0].kind
	}

	/// Returns the node's children in document order.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		&self.nodes[id.0].children
	}

	/// Returns the node's parent, if it is not a root.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.nodes[id.0].parent
	}

	/// Returns the tag name of an element node.
	pub fn tag_name(&self, id: NodeId) -> Option<&str> {
		match &self.nodes[id.0].kind {
			NodeKind::Element { name, .. } => Some(name),
			_ => None,
		}
	}

	/// Returns true if the node is an element.
	pub fn is_element(&self, id: NodeId) -> bool {
		self.tag_name(id).is_some()
	}

	/// Iterates over an element's attributes.
	pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> {
		let attributes: &[(String, String)] = match &self.nodes[id.0].kind {
			NodeKind::Element { attributes, .. } => attributes,
			_ => &[],
		};
		attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Returns an attribute's value.
	pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		self.attributes(id).find(|(k, _)| *k == name).map(|(_, v)| v)
	}

	/// Returns true if the element carries `name`.
	pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
		self.attribute(id, name).is_some()
	}

	/// Removes an attribute, returning its value.
	pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
		match &mut self.nodes[id.0].kind {
			NodeKind::Element { attributes, .. } => {
				let index = attributes.iter().position(|(k, _)| k == name)?;
				Some(attributes.remove(index).1)
			}
			_ => None,
		}
	}

	/// All nodes in document (pre-)order.
	pub fn descendants(&self) -> Vec<NodeId> {
		let mut out = Vec::with_capacity(self.nodes.len());
		let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
		while let Some(id) = stack.pop() {
			out.push(id);
			stack.extend(self.nodes[id.0].children.iter().rev().copied());
		}
		out
	}

	/// Elements carrying `name`, in document order.
	pub fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
		self.descendants()
			.into_iter()
			.filter(|id| self.has_attribute(*id, name))
			.collect()
	}

	/// The first element with the given tag name, in document order.
	pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
		self.descendants()
			.into_iter()
			.find(|id| self.tag_name(*id) == Some(tag))
	}

	/// Concatenated text of the node and its descendants.
	pub fn text_content(&self, id: NodeId) -> String {
		let mut out = String::new();
		self.collect_text(id, &mut out);
		out
	}

	fn collect_text(&self, id: NodeId, out: &mut String) {
		match &self.nodes[id.0].kind {
			NodeKind::Text(text) => out.push_str(text),
			NodeKind::Element { .. } => {
				for child in &self.nodes[id.0].children {
					self.collect_text(*child, out);
				}
			}
			NodeKind::Comment(_) => {}
		}
	}

	/// The next element sibling after `from`, optionally restricted to a tag name.
	pub fn next_element(&self, from: NodeId, tag: Option<&str>) -> Option<NodeId> {
		let siblings = match self.parent(from) {
			Some(parent) => self.children(parent),
			None => &self.roots,
		};
		let position = siblings.iter().position(|id| *id == from)?;
		siblings[position + 1..]
			.iter()
			.copied()
			.filter(|id| self.is_element(*id))
			.find(|id| tag.is_none_or(|tag| self.tag_name(*id) == Some(tag)))
	}

	/// Attaches a listener to an element.
	pub fn add_event_listener(
		&mut self,
		id: NodeId,
		event_type: impl Into<String>,
		handler: EventHandler,
	) -> Result<(), HydrationError> {
		self.require_element(id)?;
		self.nodes[id.0].listeners.push(Listener {
			event_type: event_type.into(),
			handler,
		});
		Ok(())
	}

	/// Number of listeners attached to a node.
	pub fn listener_count(&self, id: NodeId) -> usize {
		self.nodes[id.0].listeners.len()
	}

	/// Dispatches an event at `target`, bubbling through its ancestors.
	///
	/// Returns the number of listeners invoked.
	pub fn dispatch_event(&self, target: NodeId, event_type: &str) -> Result<usize, HydrationError> {
		self.require_element(target)?;
		let event = Event::new(event_type, target);
		let mut invoked = 0;
		let mut current = Some(target);
		while let Some(id) = current {
			let at = event.at(id);
			for listener in &self.nodes[id.0].listeners {
				if listener.event_type == event_type {
					listener.handler.call(&at);
					invoked += 1;
				}
			}
			current = self.parent(id);
		}
		Ok(invoked)
	}

	/// Moves every node of `other` under `parent`, keeping listeners.
	pub fn append_fragment(
		&mut self,
		parent: NodeId,
		other: DocumentFragment,
	) -> Result<(), HydrationError> {
		self.require_element(parent)?;
		let offset = self.nodes.len();
		let remap = |id: NodeId| NodeId(id.0 + offset);

		for mut node in other.nodes {
			node.parent = Some(node.parent.map_or(parent, remap));
			node.children = node.children.into_iter().map(remap).collect();
			self.nodes.push(node);
		}
		let new_roots: Vec<_> = other.roots.into_iter().map(remap).collect();
		self.nodes[parent.0].children.extend(new_roots);
		Ok(())
	}

	fn require_element(&self, id: NodeId) -> Result<(), HydrationError> {
		if self.is_element(id) {
			Ok(())
		} else {
			Err(HydrationError::InvalidTarget(format!(
				"node {} is not an element",
				id.0
			)))
		}
	}

	/// Serializes the fragment back to HTML.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		for root in &self.roots {
			self.write_node(*root, false, &mut out);
		}
		out
	}

	fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
		match &self.nodes[id.0].kind {
			NodeKind::Text(text) if raw_text => out.push_str(text),
			NodeKind::Text(text) => out.push_str(&escape(text)),
			NodeKind::Comment(comment) => {
				out.push_str("<!--");
				out.push_str(comment);
				out.push_str("-->");
			}
			NodeKind::Element { name, attributes } => {
				out.push('<');
				out.push_str(name);
				for (key, value) in attributes {
					out.push(' ');
					out.push_str(key);
					out.push_str("=\"");
					out.push_str(&escape(value));
					out.push('"');
				}
				out.push('>');
				if VOID_ELEMENTS.contains(&name.as_str()) {
					return;
				}
				let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str());
				for child in &self.nodes[id.0].children {
					self.write_node(*child, raw, out);
				}
				out.push_str("</");
				out.push_str(name);
				out.push('>');
			}
		}
	}
}
