//! A headless [`Host`] that keeps the live tree in a generational arena.
//!
//! Removing a node from its parent frees it and its whole subtree, so handles to removed nodes become stale:
//! lookups through them fail cleanly with [`Error::StaleNode`] instead of reaching a recycled slot.

use crate::{
	error::{Error, Result},
	host::{Host, NodeKind},
	tree::{Event, EventHandler, Style},
};
use core::fmt::{self, Debug, Formatter, Write as _};
use generational_arena::{Arena, Index};
use indexmap::IndexMap;
use std::rc::Rc;
use tracing::{instrument, trace};

/// Handle to a node in an [`ArenaHost`].
pub type NodeId = Index;

struct ArenaNode {
	data: NodeData,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

enum NodeData {
	Element {
		tag: String,
		attributes: IndexMap<String, String>,
		style: Style,
		listeners: Vec<(String, EventHandler)>,
	},
	Text(String),
}

impl Debug for NodeData {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			NodeData::Element {
				tag,
				attributes,
				style,
				listeners,
			} => f
				.debug_struct("Element")
				.field("tag", tag)
				.field("attributes", attributes)
				.field("style", style)
				.field("listeners", &listeners.iter().map(|(event, _)| event).collect::<Vec<_>>())
				.finish(),
			NodeData::Text(text) => f.debug_tuple("Text").field(text).finish(),
		}
	}
}

impl Debug for ArenaNode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ArenaNode")
			.field("data", &self.data)
			.field("parent", &self.parent)
			.field("children", &self.children)
			.finish()
	}
}

#[derive(Debug, Default)]
pub struct ArenaHost {
	arena: Arena<ArenaNode>,
}

impl ArenaHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of nodes currently allocated, attached or not.
	#[must_use]
	pub fn len(&self) -> usize {
		self.arena.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.arena.is_empty()
	}

	fn node(&self, id: NodeId) -> Result<&ArenaNode> {
		self.arena.get(id).ok_or_else(|| stale(id))
	}

	fn node_mut(&mut self, id: NodeId) -> Result<&mut ArenaNode> {
		self.arena.get_mut(id).ok_or_else(|| stale(id))
	}

	fn element_data_mut(&mut self, id: NodeId, operation: &'static str) -> Result<&mut NodeData> {
		let node = self.node_mut(id)?;
		match node.data {
			NodeData::Element { .. } => Ok(&mut node.data),
			NodeData::Text(_) => Err(Error::NotAnElement { operation }),
		}
	}

	/// Checks that `child` may become a child of `parent`.
	fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<()> {
		if let NodeData::Text(_) = self.node(parent)?.data {
			return Err(Error::HierarchyRequest);
		}
		self.node(child)?;
		let mut ancestor = Some(parent);
		while let Some(current) = ancestor {
			if current == child {
				return Err(Error::HierarchyRequest);
			}
			ancestor = self.node(current)?.parent;
		}
		Ok(())
	}

	fn check_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
		self.node(parent)?;
		if self.node(child)?.parent == Some(parent) {
			Ok(())
		} else {
			Err(Error::NotAChild)
		}
	}

	fn detach(&mut self, child: NodeId) -> Result<()> {
		if let Some(parent) = self.node_mut(child)?.parent.take() {
			self.node_mut(parent)?.children.retain(|&c| c != child);
		}
		Ok(())
	}

	/// Frees `root` and all of its descendants. `root` must already be detached.
	fn free(&mut self, root: NodeId) {
		let mut pending = vec![root];
		let mut freed = 0_usize;
		while let Some(id) = pending.pop() {
			if let Some(node) = self.arena.remove(id) {
				pending.extend(node.children);
				freed += 1;
			}
		}
		trace!("Freed {} node(s).", freed);
	}

	#[must_use]
	pub fn tag(&self, id: NodeId) -> Option<&str> {
		match &self.arena.get(id)?.data {
			NodeData::Element { tag, .. } => Some(tag),
			NodeData::Text(_) => None,
		}
	}

	/// The data of a text node.
	#[must_use]
	pub fn text(&self, id: NodeId) -> Option<&str> {
		match &self.arena.get(id)?.data {
			NodeData::Text(text) => Some(text),
			NodeData::Element { .. } => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		match &self.arena.get(id)?.data {
			NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
			NodeData::Text(_) => None,
		}
	}

	#[must_use]
	pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
		self.attribute(id, name).is_some()
	}

	#[must_use]
	pub fn style(&self, id: NodeId, name: &str) -> Option<&str> {
		match &self.arena.get(id)?.data {
			NodeData::Element { style, .. } => style.get(name).map(String::as_str),
			NodeData::Text(_) => None,
		}
	}

	/// Children of `id`, or nothing if `id` is stale.
	#[must_use]
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.arena.get(id).map_or(&[], |node| &node.children)
	}

	#[must_use]
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.arena.get(id)?.parent
	}

	/// Handlers registered on `id` for `event`, in registration order.
	///
	/// Call these after releasing any borrow of the host if they may re-render.
	#[must_use]
	pub fn listeners(&self, id: NodeId, event: &str) -> Vec<EventHandler> {
		match self.arena.get(id).map(|node| &node.data) {
			Some(NodeData::Element { listeners, .. }) => listeners.iter().filter(|(e, _)| e == event).map(|(_, handler)| Rc::clone(handler)).collect(),
			_ => Vec::new(),
		}
	}

	/// Invokes the handlers registered on `id` for `event.kind` and returns how many ran.
	///
	/// The event does not bubble.
	#[instrument(skip(self))]
	pub fn dispatch(&self, id: NodeId, event: &Event) -> usize {
		let handlers = self.listeners(id, &event.kind);
		for handler in &handlers {
			handler(event);
		}
		handlers.len()
	}

	/// Concatenated data of all descendant text nodes.
	#[must_use]
	pub fn text_content(&self, id: NodeId) -> String {
		let mut text = String::new();
		self.collect_text(id, &mut text);
		text
	}

	fn collect_text(&self, id: NodeId, text: &mut String) {
		if let Some(node) = self.arena.get(id) {
			match &node.data {
				NodeData::Text(data) => text.push_str(data),
				NodeData::Element { .. } => {
					for &child in &node.children {
						self.collect_text(child, text);
					}
				}
			}
		}
	}

	/// Serializes the children of `id` as HTML.
	#[must_use]
	pub fn inner_html(&self, id: NodeId) -> String {
		let mut html = String::new();
		for &child in self.children(id) {
			self.write_html(child, &mut html);
		}
		html
	}

	/// Serializes `id` itself and its subtree as HTML.
	#[must_use]
	pub fn outer_html(&self, id: NodeId) -> String {
		let mut html = String::new();
		self.write_html(id, &mut html);
		html
	}

	fn write_html(&self, id: NodeId, html: &mut String) {
		let node = match self.arena.get(id) {
			Some(node) => node,
			None => return,
		};
		match &node.data {
			NodeData::Text(text) => html.push_str(&escape(text, false)),
			NodeData::Element { tag, attributes, .. } => {
				html.push('<');
				html.push_str(tag);
				for (name, value) in attributes {
					// Writing into a `String` can't fail.
					let _ = write!(html, " {}=\"{}\"", name, escape(value, true));
				}
				html.push('>');
				for &child in &node.children {
					self.write_html(child, html);
				}
				let _ = write!(html, "</{}>", tag);
			}
		}
	}
}

fn stale(id: NodeId) -> Error {
	Error::StaleNode(format!("{:?}", id.into_raw_parts()))
}

/// Formats style fields the way `CSSStyleDeclaration.cssText` does, with field names as given.
fn serialize_style(style: &Style) -> String {
	style.iter().map(|(name, value)| format!("{}: {};", name, value)).collect::<Vec<_>>().join(" ")
}

/// Reads the declarations of a `style` attribute. Malformed declarations are skipped.
fn parse_style(text: &str) -> Style {
	text.split(';')
		.filter_map(|declaration| {
			let (name, value) = declaration.split_once(':')?;
			let (name, value) = (name.trim(), value.trim());
			if name.is_empty() || value.is_empty() {
				None
			} else {
				Some((name.to_owned(), value.to_owned()))
			}
		})
		.collect()
}

fn escape(text: &str, attribute: bool) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' if attribute => escaped.push_str("&quot;"),
			c => escaped.push(c),
		}
	}
	escaped
}

/// Rough approximation of the XML `Name` production browsers validate tag and attribute names against.
fn is_valid_name(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_alphabetic() || c == '_' || c == ':' => chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')),
		_ => false,
	}
}

impl Host for ArenaHost {
	type Node = NodeId;

	fn create_element(&mut self, tag: &str) -> Result<NodeId> {
		if !is_valid_name(tag) {
			return Err(Error::InvalidTagName(tag.to_owned()));
		}
		Ok(self.arena.insert(ArenaNode {
			data: NodeData::Element {
				tag: tag.to_owned(),
				attributes: IndexMap::new(),
				style: Style::new(),
				listeners: Vec::new(),
			},
			parent: None,
			children: Vec::new(),
		}))
	}

	fn create_text(&mut self, text: &str) -> Result<NodeId> {
		Ok(self.arena.insert(ArenaNode {
			data: NodeData::Text(text.to_owned()),
			parent: None,
			children: Vec::new(),
		}))
	}

	fn kind(&self, node: &NodeId) -> Result<NodeKind> {
		Ok(match &self.node(*node)?.data {
			NodeData::Element { tag, .. } => NodeKind::Element(tag.clone()),
			NodeData::Text(text) => NodeKind::Text(text.clone()),
		})
	}

	fn is_live(&self, node: &NodeId) -> bool {
		self.arena.contains(*node)
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
		self.check_insertion(*parent, *child)?;
		self.detach(*child)?;
		self.node_mut(*parent)?.children.push(*child);
		self.node_mut(*child)?.parent = Some(*parent);
		Ok(())
	}

	fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: &NodeId) -> Result<()> {
		self.check_child(*parent, *reference)?;
		if child == reference {
			return Ok(());
		}
		self.check_insertion(*parent, *child)?;
		self.detach(*child)?;
		let parent_node = self.node_mut(*parent)?;
		let position = parent_node.children.iter().position(|c| c == reference).ok_or(Error::NotAChild)?;
		parent_node.children.insert(position, *child);
		self.node_mut(*child)?.parent = Some(*parent);
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
		self.check_child(*parent, *child)?;
		self.detach(*child)?;
		self.free(*child);
		Ok(())
	}

	fn replace_child(&mut self, parent: &NodeId, new_child: &NodeId, old_child: &NodeId) -> Result<()> {
		self.check_child(*parent, *old_child)?;
		if new_child == old_child {
			return Ok(());
		}
		self.check_insertion(*parent, *new_child)?;
		self.detach(*new_child)?;
		let parent_node = self.node_mut(*parent)?;
		let position = parent_node.children.iter().position(|c| c == old_child).ok_or(Error::NotAChild)?;
		parent_node.children[position] = *new_child;
		self.node_mut(*new_child)?.parent = Some(*parent);
		self.node_mut(*old_child)?.parent = None;
		self.free(*old_child);
		Ok(())
	}

	fn clear_children(&mut self, container: &NodeId) -> Result<()> {
		let children = core::mem::take(&mut self.node_mut(*container)?.children);
		for child in children {
			self.free(child);
		}
		Ok(())
	}

	fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<()> {
		if !is_valid_name(name) {
			return Err(Error::Host {
				operation: "setAttribute",
				message: format!("invalid attribute name {:?}", name),
			});
		}
		if let NodeData::Element { attributes, style, .. } = self.element_data_mut(*node, "setAttribute")? {
			// The `style` attribute and the style surface are one and the same.
			if name == "style" {
				*style = parse_style(value);
			}
			attributes.insert(name.to_owned(), value.to_owned());
		}
		Ok(())
	}

	fn set_class_name(&mut self, node: &NodeId, class_name: &str) -> Result<()> {
		if let NodeData::Element { attributes, .. } = self.element_data_mut(*node, "className")? {
			attributes.insert("class".to_owned(), class_name.to_owned());
		}
		Ok(())
	}

	fn set_style_property(&mut self, node: &NodeId, name: &str, value: &str) -> Result<()> {
		if let NodeData::Element { attributes, style, .. } = self.element_data_mut(*node, "style")? {
			if value.is_empty() {
				style.shift_remove(name);
			} else {
				style.insert(name.to_owned(), value.to_owned());
			}
			attributes.insert("style".to_owned(), serialize_style(style));
		}
		Ok(())
	}

	fn add_event_listener(&mut self, node: &NodeId, event: &str, handler: EventHandler) -> Result<()> {
		if let NodeData::Element { listeners, .. } = self.element_data_mut(*node, "addEventListener")? {
			// Like the DOM, registering the same listener twice for the same event has no effect.
			if !listeners.iter().any(|(e, h)| e == event && Rc::ptr_eq(h, &handler)) {
				listeners.push((event.to_owned(), handler));
			}
		}
		Ok(())
	}
}
