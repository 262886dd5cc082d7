use crate::{
	error::Result,
	host::{Host, NodeKind},
	refs::RefRegistry,
	tree::{Element, Node, PropValue},
};
use tracing::{error, instrument, trace, trace_span, warn};

/// Element nesting depth past which subtrees are treated as absent. Fragments don't count as a level.
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

/// Live nodes produced from one element tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Live<N> {
	Node(N),
	/// The members of a fragment, in order. Callers insert each of them.
	Splice(Vec<N>),
}

impl<N> Live<N> {
	/// The contained nodes, in document order.
	#[must_use]
	pub fn nodes(&self) -> &[N] {
		match self {
			Live::Node(node) => core::slice::from_ref(node),
			Live::Splice(nodes) => nodes,
		}
	}

	#[must_use]
	pub fn into_nodes(self) -> Vec<N> {
		match self {
			Live::Node(node) => vec![node],
			Live::Splice(nodes) => nodes,
		}
	}

	/// The single node, if this isn't a splice.
	#[must_use]
	pub fn node(&self) -> Option<&N> {
		match self {
			Live::Node(node) => Some(node),
			Live::Splice(_) => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
	Create,
	Patch,
}

/// Turns element trees into live nodes of a [`Host`] and patches live nodes toward new trees.
///
/// Create one per container. The renderer owns the host and the [`RefRegistry`] for everything it creates.
///
/// There are two distinct update paths:
///
/// - [`Renderer::render`] tears down the container's contents and builds them again from scratch.
///   This costs O(whole tree) per call and re-runs every side effect of creation: all listeners are bound again
///   and all refs are registered again.
/// - [`Renderer::update_node`] patches a single live node in place. It only looks one level deep.
///
/// Neither one rolls back on failure. Whatever the host accepted before an error stays applied.
#[derive(Debug)]
pub struct Renderer<H: Host> {
	host: H,
	refs: RefRegistry<H::Node>,
	depth_limit: usize,
}

impl<H: Host> Renderer<H> {
	#[must_use]
	pub fn new(host: H) -> Self {
		Self {
			host,
			refs: RefRegistry::new(),
			depth_limit: DEFAULT_DEPTH_LIMIT,
		}
	}

	/// Replaces [`DEFAULT_DEPTH_LIMIT`]. Text leaves and elements each take one level, fragments none.
	#[must_use]
	pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
		self.depth_limit = depth_limit;
		self
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn into_host(self) -> H {
		self.host
	}

	pub fn refs(&self) -> &RefRegistry<H::Node> {
		&self.refs
	}

	/// Resolves a ref, as long as the node it points at is still live.
	#[must_use]
	pub fn get_ref(&self, name: &str) -> Option<&H::Node> {
		let host = &self.host;
		self.refs.get(name).filter(|node| host.is_live(node))
	}

	/// Drops all refs to nodes that are no longer live and returns how many were dropped.
	pub fn prune_refs(&mut self) -> usize {
		let before = self.refs.len();
		let host = &self.host;
		self.refs.retain(|_, node| host.is_live(node));
		let pruned = before - self.refs.len();
		trace!("Pruned {} stale ref(s).", pruned);
		pruned
	}

	/// Creates live nodes for `node`.
	///
	/// Returns [`None`] for [`Node::Empty`], in which case there is nothing to insert.
	/// `parent_hint` is informational only. Nothing is attached to it.
	#[instrument(skip(self, node))]
	pub fn create_node(&mut self, node: &Node, parent_hint: Option<&H::Node>) -> Result<Option<Live<H::Node>>> {
		self.create(node, self.depth_limit)
	}

	fn create(&mut self, node: &Node, depth_limit: usize) -> Result<Option<Live<H::Node>>> {
		if depth_limit == 0 {
			error!("Depth limit reached");
			return Ok(None);
		}

		match node {
			Node::Empty => Ok(None),

			Node::Text(leaf) => {
				let text = leaf.to_string();
				let span = trace_span!("Creating text node", text = redact(&text));
				let _enter = span.enter();
				Ok(Some(Live::Node(self.host.create_text(&text)?)))
			}

			Node::Fragment(items) => {
				let span = trace_span!("Creating fragment", "items.len()" = items.len());
				let _enter = span.enter();
				let mut splice = Vec::with_capacity(items.len());
				for item in items {
					// Fragments have no live node of their own, so they don't add a level.
					if let Some(live) = self.create(item, depth_limit)? {
						splice.extend(live.into_nodes());
					}
				}
				Ok(Some(Live::Splice(splice)))
			}

			Node::Element(element) => {
				let span = trace_span!("Creating element", tag = element.tag.as_str(), ref_name = ?element.ref_name);
				let _enter = span.enter();
				let live = self.host.create_element(&element.tag)?;
				self.apply_props(&live, element, Pass::Create)?;
				for child in &element.children {
					if let Some(child) = self.create(child, depth_limit - 1)? {
						for child in child.nodes() {
							self.host.append_child(&live, child)?;
						}
					}
				}
				if let Some(name) = &element.ref_name {
					self.refs.insert(name, live.clone());
				}
				Ok(Some(Live::Node(live)))
			}
		}
	}

	fn apply_props(&mut self, live: &H::Node, element: &Element, pass: Pass) -> Result<()> {
		for (key, value) in &element.props {
			self.apply_prop(live, &element.tag, key, value, pass)?;
		}
		Ok(())
	}

	fn apply_prop(&mut self, live: &H::Node, tag: &str, key: &str, value: &PropValue, pass: Pass) -> Result<()> {
		if key == "className" {
			return match value.to_attribute_value() {
				Some(class_name) => self.host.set_class_name(live, &class_name),
				None => {
					warn!("Ignoring non-scalar `className` of <{}>.", tag);
					Ok(())
				}
			};
		}

		if let Some(event) = key.strip_prefix("on") {
			if pass == Pass::Patch {
				trace!("Skipping event property {:?}: listeners are only bound on creation.", key);
				return Ok(());
			}
			return match value {
				PropValue::Handler(handler) => self.host.add_event_listener(live, &event.to_lowercase(), handler.clone()),
				_ => {
					warn!("Ignoring event property {:?} of <{}>: the value is not a handler.", key, tag);
					Ok(())
				}
			};
		}

		match value {
			PropValue::Style(fields) if key == "style" => {
				for (name, field) in fields {
					self.host.set_style_property(live, name, field)?;
				}
				Ok(())
			}
			PropValue::Bool(true) => self.host.set_attribute(live, key, key),
			PropValue::Bool(false) => Ok(()),
			PropValue::Str(_) | PropValue::Number(_) => {
				let attribute = value.to_attribute_value().unwrap_or_default();
				trace!(key, value = redact(&attribute), "Setting attribute");
				self.host.set_attribute(live, key, &attribute)
			}
			PropValue::Style(_) => {
				warn!("Ignoring style map under {:?} of <{}>: only `style` takes one.", key, tag);
				Ok(())
			}
			PropValue::Handler(_) => {
				warn!("Ignoring handler under {:?} of <{}>: handlers need an `on…` key.", key, tag);
				Ok(())
			}
		}
	}

	/// Brings `old` (a child of `parent`) into correspondence with `new`.
	///
	/// - No `old`: creates `new` and appends it to `parent`.
	/// - [`Node::Empty`] `new`: removes `old` and returns [`None`].
	/// - Text `new`: keeps `old` untouched if it is a text node with the same data, replaces it otherwise.
	/// - Element `new` of the same tag as `old` (ignoring ASCII case): re-applies `new`'s properties onto `old` except event handlers,
	///   then returns `old`. **Children are not reconciled.**
	/// - Anything else, including fragments: replaces `old` with freshly created nodes.
	#[doc(alias = "reconcile")]
	#[instrument(skip(self, new))]
	pub fn update_node(&mut self, old: Option<&H::Node>, new: &Node, parent: &H::Node) -> Result<Option<Live<H::Node>>> {
		let old = match old {
			Some(old) => old,
			None => {
				let created = self.create(new, self.depth_limit)?;
				if let Some(live) = &created {
					for node in live.nodes() {
						self.host.append_child(parent, node)?;
					}
				}
				return Ok(created);
			}
		};

		match new {
			Node::Empty => {
				trace!("Removing node.");
				self.host.remove_child(parent, old)?;
				Ok(None)
			}

			Node::Text(leaf) => {
				let text = leaf.to_string();
				match self.host.kind(old)? {
					NodeKind::Text(current) if current == text => {
						trace!(text = redact(&text), "Text unchanged.");
						Ok(Some(Live::Node(old.clone())))
					}
					_ => self.replace(old, new, parent),
				}
			}

			Node::Element(element) => match self.host.kind(old)? {
				NodeKind::Element(tag) if tag.eq_ignore_ascii_case(&element.tag) => {
					let span = trace_span!("Patching element", tag = element.tag.as_str());
					let _enter = span.enter();
					self.apply_props(old, element, Pass::Patch)?;
					Ok(Some(Live::Node(old.clone())))
				}
				_ => self.replace(old, new, parent),
			},

			Node::Fragment(_) => self.replace(old, new, parent),
		}
	}

	fn replace(&mut self, old: &H::Node, new: &Node, parent: &H::Node) -> Result<Option<Live<H::Node>>> {
		let span = trace_span!("Replacing node", new_tag = ?new.tag());
		let _enter = span.enter();
		let created = self.create(new, self.depth_limit)?;
		match &created {
			None => self.host.remove_child(parent, old)?,
			Some(Live::Node(node)) => self.host.replace_child(parent, node, old)?,
			Some(Live::Splice(nodes)) => {
				for node in nodes {
					self.host.insert_before(parent, node, old)?;
				}
				self.host.remove_child(parent, old)?;
			}
		}
		Ok(created)
	}

	/// Replaces all of `container`'s children with freshly created nodes for `node`.
	///
	/// This is not incremental. See the [type-level documentation](`Renderer`).
	#[doc(alias = "materialize")]
	#[instrument(skip(self, node))]
	pub fn render(&mut self, node: &Node, container: &H::Node) -> Result<()> {
		self.host.clear_children(container)?;
		if let Some(live) = self.create(node, self.depth_limit)? {
			for node in live.nodes() {
				self.host.append_child(container, node)?;
			}
		}
		Ok(())
	}
}

#[allow(clippy::non_ascii_literal)]
fn redact(text: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		text
	} else {
		"…"
	}
}
