//! The element tree: a plain, read-only description of the desired page, built fresh on every render pass.

use core::fmt::{self, Debug, Display, Formatter};
use indexmap::IndexMap;
use std::rc::Rc;

/// Ordered property map of an [`Element`]. Properties are applied in iteration order.
pub type Props = IndexMap<String, PropValue>;

/// Ordered style fields, merged one at a time onto a live node's style surface.
pub type Style = IndexMap<String, String>;

/// Callback registered as an event listener. Never serialized as an attribute.
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// Host-independent event payload passed to [`EventHandler`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	/// The event name, e.g. `"click"`.
	pub kind: String,
	/// The `value` of the event target, if it has a string one (form controls).
	pub value: Option<String>,
}
impl Event {
	#[must_use]
	pub fn new(kind: impl Into<String>) -> Self {
		Self { kind: kind.into(), value: None }
	}

	#[must_use]
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}
}

/// A node of the element tree.
///
/// [`Node::Empty`] stands for anything that renders to nothing: absent values, `false` in conditional
/// rendering and loosely-typed input without a recognisable shape (see [`Node::from_json`]).
#[derive(Debug, Clone)]
pub enum Node {
	Empty,
	/// Renders as a text node with no children.
	Text(Leaf),
	/// Splices its children's live nodes into the parent without a node of its own.
	Fragment(Vec<Node>),
	/// Renders as exactly one live node of kind [`Element::tag`].
	Element(Element),
}

/// A string or number text leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
	Str(String),
	Number(f64),
}

#[derive(Debug, Clone)]
pub struct Element {
	pub tag: String,
	pub props: Props,
	pub children: Vec<Node>,
	/// Name under which the live node is registered in the renderer's [`RefRegistry`](`crate::refs::RefRegistry`).
	pub ref_name: Option<String>,
}

/// A property value.
#[derive(Clone)]
pub enum PropValue {
	Str(String),
	Number(f64),
	/// Presence-only attribute: `true` sets `name="name"`, `false` sets nothing.
	Bool(bool),
	/// Only meaningful under the `style` key.
	Style(Style),
	/// Only meaningful under an `on…` key.
	Handler(EventHandler),
}

impl Node {
	/// Starts building a tagged element.
	#[must_use]
	pub fn element(tag: impl Into<String>) -> Element {
		Element::new(tag)
	}

	#[must_use]
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(Leaf::Str(value.into()))
	}

	#[must_use]
	pub fn number(value: f64) -> Self {
		Self::Text(Leaf::Number(value))
	}

	#[must_use]
	pub fn fragment(items: impl IntoIterator<Item = Node>) -> Self {
		Self::Fragment(items.into_iter().collect())
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}

	/// The tag of an [`Node::Element`], [`None`] for every other variant.
	#[must_use]
	pub fn tag(&self) -> Option<&str> {
		match self {
			Self::Element(element) => Some(&element.tag),
			Self::Empty | Self::Text(_) | Self::Fragment(_) => None,
		}
	}
}

impl Element {
	#[must_use]
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			props: Props::new(),
			children: Vec::new(),
			ref_name: None,
		}
	}

	/// Sets a property, replacing an earlier value under the same key in place.
	#[must_use]
	pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
		self.props.insert(key.into(), value.into());
		self
	}

	#[must_use]
	pub fn class_name(self, class_name: impl Into<String>) -> Self {
		self.prop("className", class_name.into())
	}

	/// Merges `fields` into the `style` property.
	#[must_use]
	pub fn style<K: Into<String>, V: Into<String>>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self {
		let fields = fields.into_iter().map(|(k, v)| (k.into(), v.into()));
		match self.props.get_mut("style") {
			Some(PropValue::Style(style)) => style.extend(fields),
			_ => {
				self.props.insert("style".to_owned(), PropValue::Style(fields.collect()));
			}
		}
		self
	}

	/// Binds `handler` to `event` through the `on` + event name property key.
	#[must_use]
	pub fn on(self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
		self.prop(format!("on{}", event), PropValue::Handler(Rc::new(handler)))
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn children<N: Into<Node>>(mut self, children: impl IntoIterator<Item = N>) -> Self {
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	#[must_use]
	pub fn with_ref(mut self, name: impl Into<String>) -> Self {
		self.ref_name = Some(name.into());
		self
	}
}

impl PropValue {
	/// The attribute text for scalar values. [`None`] for styles and handlers.
	#[must_use]
	pub fn to_attribute_value(&self) -> Option<String> {
		match self {
			Self::Str(value) => Some(value.clone()),
			Self::Number(value) => Some(number_to_string(*value)),
			Self::Bool(value) => Some(value.to_string()),
			Self::Style(_) | Self::Handler(_) => None,
		}
	}
}

impl Debug for PropValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(value) => f.debug_tuple("Str").field(value).finish(),
			Self::Number(value) => f.debug_tuple("Number").field(value).finish(),
			Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
			Self::Style(style) => f.debug_tuple("Style").field(style).finish(),
			Self::Handler(handler) => f.debug_tuple("Handler").field(&Rc::as_ptr(handler)).finish(),
		}
	}
}

impl Display for Leaf {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(value) => f.write_str(value),
			Self::Number(value) => f.write_str(&number_to_string(*value)),
		}
	}
}

/// Formats a number the way browsers stringify them for text and attributes.
#[must_use]
pub fn number_to_string(value: f64) -> String {
	if value.is_nan() {
		"NaN".to_owned()
	} else if value.is_infinite() {
		(if value > 0.0 { "Infinity" } else { "-Infinity" }).to_owned()
	} else if value == 0.0 {
		// Also covers `-0.0`.
		"0".to_owned()
	} else {
		// `{:e}` yields the shortest round-tripping digits, which are then laid out like `Number::toString`.
		let scientific = format!("{:e}", value.abs());
		let (mantissa, exponent) = scientific.split_at(scientific.find('e').unwrap_or(scientific.len()));
		let digits = mantissa.replace('.', "");
		let exponent: i32 = exponent.get(1..).and_then(|e| e.parse().ok()).unwrap_or(0);
		let sign = if value < 0.0 { "-" } else { "" };
		format!("{}{}", sign, layout_digits(&digits, exponent))
	}
}

/// `digits` × 10^(`exponent` + 1 - `digits.len()`), written in decimal or exponent notation.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn layout_digits(digits: &str, exponent: i32) -> String {
	let count = digits.len() as i32;
	let point = exponent + 1;
	if count <= point && point <= 21 {
		format!("{}{}", digits, "0".repeat((point - count) as usize))
	} else if 0 < point && point <= 21 {
		let (integral, fraction) = digits.split_at(point as usize);
		format!("{}.{}", integral, fraction)
	} else if -6 < point && point <= 0 {
		format!("0.{}{}", "0".repeat(-point as usize), digits)
	} else {
		let (first, rest) = digits.split_at(1);
		let separator = if rest.is_empty() { "" } else { "." };
		let sign = if exponent < 0 { "-" } else { "+" };
		format!("{}{}{}e{}{}", first, separator, rest, sign, exponent.abs())
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Self::text(text)
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Self::text(text)
	}
}

impl From<f64> for Node {
	fn from(value: f64) -> Self {
		Self::number(value)
	}
}

impl From<i32> for Node {
	fn from(value: i32) -> Self {
		Self::number(value.into())
	}
}

impl From<Vec<Node>> for Node {
	fn from(items: Vec<Node>) -> Self {
		Self::Fragment(items)
	}
}

/// `None` renders to nothing, which covers conditional rendering.
impl<T: Into<Node>> From<Option<T>> for Node {
	fn from(node: Option<T>) -> Self {
		node.map_or(Self::Empty, Into::into)
	}
}

impl From<&str> for PropValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}

impl From<String> for PropValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<f64> for PropValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i32> for PropValue {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}

impl From<bool> for PropValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Style> for PropValue {
	fn from(style: Style) -> Self {
		Self::Style(style)
	}
}

impl From<EventHandler> for PropValue {
	fn from(handler: EventHandler) -> Self {
		Self::Handler(handler)
	}
}
