//! The boundary between the renderer and the surface it renders into.

use crate::{error::Result, tree::EventHandler};
use core::fmt::Debug;

/// What a live node is, as far as reconciliation cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// A text node and its current data.
	Text(String),
	/// An element and its tag name as reported by the host (browsers upper-case HTML tags).
	Element(String),
	/// Comments, processing instructions and the like.
	Other,
}

/// A mutable, tree-structured rendering surface.
///
/// Every operation may fail. Failures propagate out of the [`Renderer`](`crate::render::Renderer`) unchanged
/// and nothing already applied is rolled back.
pub trait Host {
	/// Handle to a live node. Cloning it must not clone the node.
	type Node: Clone + Debug;

	fn create_element(&mut self, tag: &str) -> Result<Self::Node>;
	fn create_text(&mut self, text: &str) -> Result<Self::Node>;

	fn kind(&self, node: &Self::Node) -> Result<NodeKind>;

	/// Whether `node` still belongs to the live tree. Used to detect stale refs.
	fn is_live(&self, node: &Self::Node) -> bool;

	/// Appends `child`, moving it out of its current parent if it has one.
	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
	fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, reference: &Self::Node) -> Result<()>;
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
	fn replace_child(&mut self, parent: &Self::Node, new_child: &Self::Node, old_child: &Self::Node) -> Result<()>;
	fn clear_children(&mut self, container: &Self::Node) -> Result<()>;

	fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<()>;
	fn set_class_name(&mut self, node: &Self::Node, class_name: &str) -> Result<()>;
	fn set_style_property(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<()>;
	fn add_event_listener(&mut self, node: &Self::Node, event: &str, handler: EventHandler) -> Result<()>;
}
