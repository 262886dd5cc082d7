use declarative_dom::{arena::NodeId, ArenaHost, Host, Leaf, Node, PropValue, Renderer};
use serde_json::json;

fn render_json(value: serde_json::Value) -> (Renderer<ArenaHost>, NodeId) {
	let mut renderer = Renderer::new(ArenaHost::new());
	let container = renderer.host_mut().create_element("body").unwrap();
	renderer.render(&Node::from_json(&value), &container).unwrap();
	(renderer, container)
}

#[test]
fn shapeless_values_load_as_empty() {
	for value in vec![json!(null), json!(true), json!(false), json!({}), json!({ "props": { "id": "x" } }), json!({ "tag": "" }), json!({ "tag": 3 })] {
		assert!(Node::from_json(&value).is_empty(), "{} should load as empty", value);
	}
}

#[test]
fn leaves_and_arrays() {
	assert!(matches!(Node::from_json(&json!("a")), Node::Text(Leaf::Str(text)) if text == "a"));
	assert!(matches!(Node::from_json(&json!(2)), Node::Text(Leaf::Number(n)) if (n - 2.0).abs() < f64::EPSILON));
	assert!(matches!(Node::from_json(&json!(["a", null])), Node::Fragment(items) if items.len() == 2));
}

#[test]
fn array_with_a_nested_element_renders_siblings() {
	let (renderer, container) = render_json(json!(["a", { "tag": "span", "children": ["b"] }]));

	assert_eq!(renderer.host().children(container).len(), 2);
	assert_eq!(renderer.host().inner_html(container), "a<span>b</span>");
}

#[test]
fn properties_keep_their_order_and_types() {
	let node = Node::from_json(&json!({
		"tag": "input",
		"props": {
			"type": "range",
			"disabled": true,
			"value": 3,
			"style": { "width": 10, "color": "red", "bad": [] },
			"data": [1],
			"other": null
		}
	}));

	let element = match node {
		Node::Element(element) => element,
		other => panic!("expected an element, got {:?}", other),
	};
	assert_eq!(element.tag, "input");
	assert_eq!(element.props.keys().collect::<Vec<_>>(), ["type", "disabled", "value", "style"]);
	assert!(matches!(element.props["disabled"], PropValue::Bool(true)));
	assert!(matches!(element.props["value"], PropValue::Number(_)));
	match &element.props["style"] {
		PropValue::Style(style) => {
			assert_eq!(style.get("width").map(String::as_str), Some("10"));
			assert_eq!(style.get("color").map(String::as_str), Some("red"));
			assert!(style.get("bad").is_none());
		}
		other => panic!("expected a style map, got {:?}", other),
	}
}

#[test]
fn rendered_json_element() {
	let (renderer, container) = render_json(json!({
		"tag": "li",
		"props": { "className": "event event_slim", "title": "Lamp", "hidden": false, "checked": true },
		"children": [
			{ "tag": "span", "props": { "className": "event__icon", "style": { "color": "red" } }, "ref": "icon" },
			{ "tag": "h4", "children": ["Xiaomi Yeelight LED Smart Bulb"] },
			{ "no": "tag" },
			null
		]
	}));

	let host = renderer.host();
	assert_eq!(
		host.inner_html(container),
		"<li class=\"event event_slim\" title=\"Lamp\" checked=\"checked\">\
		<span class=\"event__icon\" style=\"color: red;\"></span>\
		<h4>Xiaomi Yeelight LED Smart Bulb</h4>\
		</li>"
	);
	let icon = *renderer.get_ref("icon").unwrap();
	assert_eq!(host.attribute(icon, "class"), Some("event__icon"));
}

#[test]
fn non_array_children_are_a_single_child() {
	let (renderer, container) = render_json(json!({ "tag": "p", "children": "only" }));

	assert_eq!(renderer.host().inner_html(container), "<p>only</p>");
}

#[test]
fn non_string_refs_are_ignored() {
	let (renderer, _) = render_json(json!({ "tag": "p", "ref": 1 }));

	assert!(renderer.refs().is_empty());
}
