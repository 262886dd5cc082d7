//! Loading element trees from loosely-typed JSON.
//!
//! This is the only place that inspects input shapes. Anything that isn't a string, a number, an array
//! or an object with a non-empty string `tag` loads as [`Node::Empty`], so the renderer itself never
//! has to deal with malformed input.

use crate::tree::{Element, Leaf, Node, PropValue, Props, Style};
use serde_json::{Map, Value};
use tracing::{trace, warn};

impl Node {
	/// Converts a JSON value into an element tree.
	///
	/// | JSON | [`Node`] |
	/// |---|---|
	/// | string, number | [`Node::Text`] |
	/// | array | [`Node::Fragment`] |
	/// | object with a non-empty string `tag` | [`Node::Element`] |
	/// | anything else (`null`, booleans, objects without `tag`) | [`Node::Empty`] |
	///
	/// Event handlers can't be expressed in JSON. Attach them afterwards with [`Element::on`].
	#[must_use]
	pub fn from_json(value: &Value) -> Self {
		match value {
			Value::String(text) => Self::Text(Leaf::Str(text.clone())),
			Value::Number(number) => Self::Text(number_leaf(number)),
			Value::Array(items) => Self::Fragment(items.iter().map(Self::from_json).collect()),
			Value::Object(object) => load_element(object).map_or(Self::Empty, Self::Element),
			Value::Null | Value::Bool(_) => Self::Empty,
		}
	}
}

fn number_leaf(number: &serde_json::Number) -> Leaf {
	match number.as_f64() {
		Some(value) => Leaf::Number(value),
		// Only reachable with `arbitrary_precision`.
		None => Leaf::Str(number.to_string()),
	}
}

fn load_element(object: &Map<String, Value>) -> Option<Element> {
	let tag = match object.get("tag") {
		Some(Value::String(tag)) if !tag.is_empty() => tag.clone(),
		_ => {
			trace!("Object without a usable `tag` loads as empty.");
			return None;
		}
	};

	let props = match object.get("props") {
		Some(Value::Object(props)) => load_props(props),
		Some(Value::Null) | None => Props::new(),
		Some(other) => {
			warn!("Ignoring non-object `props` of <{}>: {}", tag, kind_name(other));
			Props::new()
		}
	};

	let children = match object.get("children") {
		Some(Value::Array(children)) => children.iter().map(Node::from_json).collect(),
		Some(Value::Null) | None => Vec::new(),
		Some(single) => vec![Node::from_json(single)],
	};

	let ref_name = match object.get("ref") {
		Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
		Some(Value::String(_)) | Some(Value::Null) | None => None,
		Some(other) => {
			warn!("Ignoring non-string `ref` of <{}>: {}", tag, kind_name(other));
			None
		}
	};

	Some(Element {
		tag,
		props,
		children,
		ref_name,
	})
}

fn load_props(props: &Map<String, Value>) -> Props {
	props
		.iter()
		.filter_map(|(key, value)| {
			let value = match value {
				Value::String(value) => PropValue::Str(value.clone()),
				Value::Number(number) => match number_leaf(number) {
					Leaf::Number(value) => PropValue::Number(value),
					Leaf::Str(value) => PropValue::Str(value),
				},
				Value::Bool(value) => PropValue::Bool(*value),
				Value::Object(fields) if key == "style" => PropValue::Style(load_style(fields)),
				other => {
					warn!("Ignoring property {:?} with {} value.", key, kind_name(other));
					return None;
				}
			};
			Some((key.clone(), value))
		})
		.collect()
}

fn load_style(fields: &Map<String, Value>) -> Style {
	fields
		.iter()
		.filter_map(|(name, value)| match value {
			Value::String(value) => Some((name.clone(), value.clone())),
			Value::Number(number) => Some((name.clone(), number_leaf(number).to_string())),
			other => {
				warn!("Ignoring style field {:?} with {} value.", name, kind_name(other));
				None
			}
		})
		.collect()
}

fn kind_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
