//! The browser [`Host`], over [`web_sys`].

use crate::{
	error::{Error, Result},
	host::{Host, NodeKind},
	tree::{Event, EventHandler},
};
use core::fmt::{self, Debug, Formatter};
use js_sys::Reflect;
use tracing::{instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

type Listener = Closure<dyn Fn(web_sys::Event)>;

/// Renders into a [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).
///
/// # Listener lifetime
///
/// Event listeners are backed by [`Closure`]s owned by this instance.
/// They are released when the node they were registered on is removed through this host (directly or as part of a removed subtree).
/// Nodes that never get attached, or that are detached by other means, keep their listeners alive until
/// [`DomHost::release_listeners`] is called for them.
///
/// Listeners on nodes that are still in the document start throwing errors into [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript)
/// once the instance is dropped.
pub struct DomHost {
	document: web_sys::Document,
	listeners: Vec<(web_sys::Node, Listener)>,
}

impl Debug for DomHost {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("DomHost")
			.field("document", &self.document)
			.field("listeners.len()", &self.listeners.len())
			.finish()
	}
}

impl DomHost {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			listeners: Vec::new(),
		}
	}

	/// Attaches to the current window's document.
	pub fn from_window() -> Result<Self> {
		let document = web_sys::window().and_then(|window| window.document()).ok_or_else(|| Error::Host {
			operation: "window.document",
			message: "no document available".to_owned(),
		})?;
		Ok(Self::new(document))
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	/// Number of event listeners currently kept alive.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	/// Releases the listeners of `root` and its descendants and returns how many were released.
	///
	/// Removal through this host does this automatically.
	pub fn release_listeners(&mut self, root: &web_sys::Node) -> usize {
		let before = self.listeners.len();
		self.listeners.retain(|(target, _)| !root.contains(Some(target)));
		let released = before - self.listeners.len();
		if released > 0 {
			trace!("Released {} event listener(s).", released);
		}
		released
	}
}

fn host_error(operation: &'static str) -> impl FnOnce(JsValue) -> Error {
	move |error| Error::Host {
		operation,
		message: format!("{:?}", error),
	}
}

fn as_element<'a>(node: &'a web_sys::Node, operation: &'static str) -> Result<&'a web_sys::Element> {
	node.dyn_ref::<web_sys::Element>().ok_or(Error::NotAnElement { operation })
}

fn to_event(event: &web_sys::Event) -> Event {
	let value = event
		.target()
		.and_then(|target| Reflect::get(&target, &JsValue::from_str("value")).ok())
		.and_then(|value| value.as_string());
	Event { kind: event.type_(), value }
}

impl Host for DomHost {
	type Node = web_sys::Node;

	fn create_element(&mut self, tag: &str) -> Result<web_sys::Node> {
		self.document
			.create_element(tag)
			.map(Into::into)
			.map_err(|error| {
				trace!("createElement failed: {:?}", error);
				Error::InvalidTagName(tag.to_owned())
			})
	}

	fn create_text(&mut self, text: &str) -> Result<web_sys::Node> {
		Ok(self.document.create_text_node(text).into())
	}

	fn kind(&self, node: &web_sys::Node) -> Result<NodeKind> {
		Ok(if let Some(text) = node.dyn_ref::<web_sys::Text>() {
			NodeKind::Text(text.data())
		} else if let Some(element) = node.dyn_ref::<web_sys::Element>() {
			NodeKind::Element(element.tag_name())
		} else {
			NodeKind::Other
		})
	}

	fn is_live(&self, node: &web_sys::Node) -> bool {
		node.is_connected()
	}

	fn append_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<()> {
		parent.append_child(child).map(drop).map_err(host_error("appendChild"))
	}

	fn insert_before(&mut self, parent: &web_sys::Node, child: &web_sys::Node, reference: &web_sys::Node) -> Result<()> {
		parent.insert_before(child, Some(reference)).map(drop).map_err(host_error("insertBefore"))
	}

	fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<()> {
		parent.remove_child(child).map_err(host_error("removeChild"))?;
		self.release_listeners(child);
		Ok(())
	}

	fn replace_child(&mut self, parent: &web_sys::Node, new_child: &web_sys::Node, old_child: &web_sys::Node) -> Result<()> {
		parent.replace_child(new_child, old_child).map_err(host_error("replaceChild"))?;
		self.release_listeners(old_child);
		Ok(())
	}

	#[instrument(skip(self))]
	fn clear_children(&mut self, container: &web_sys::Node) -> Result<()> {
		while let Some(child) = container.first_child() {
			self.remove_child(container, &child)?;
		}
		Ok(())
	}

	fn set_attribute(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<()> {
		as_element(node, "setAttribute")?.set_attribute(name, value).map_err(host_error("setAttribute"))
	}

	fn set_class_name(&mut self, node: &web_sys::Node, class_name: &str) -> Result<()> {
		let element = as_element(node, "className")?;
		if element.namespace_uri().as_deref() == Some("http://www.w3.org/2000/svg") {
			// `className` is a read-only `SVGAnimatedString` there.
			element.set_attribute("class", class_name).map_err(host_error("className"))
		} else {
			element.set_class_name(class_name);
			Ok(())
		}
	}

	fn set_style_property(&mut self, node: &web_sys::Node, name: &str, value: &str) -> Result<()> {
		let element = as_element(node, "style")?;
		let style = Reflect::get(element, &JsValue::from_str("style")).map_err(host_error("style"))?;
		if style.is_undefined() {
			warn!("<{}> has no style surface; ignoring style field {:?}.", element.tag_name(), name);
			return Ok(());
		}
		Reflect::set(&style, &JsValue::from_str(name), &JsValue::from_str(value))
			.map(drop)
			.map_err(host_error("style"))
	}

	fn add_event_listener(&mut self, node: &web_sys::Node, event: &str, handler: EventHandler) -> Result<()> {
		let listener = Closure::wrap(Box::new(move |event: web_sys::Event| handler(&to_event(&event))) as Box<dyn Fn(web_sys::Event)>);
		node.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
			.map_err(host_error("addEventListener"))?;
		self.listeners.push((node.clone(), listener));
		Ok(())
	}
}
