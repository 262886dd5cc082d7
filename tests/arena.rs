use declarative_dom::{host::NodeKind, ArenaHost, Error, Host};

#[test]
fn removed_subtrees_are_freed() {
	let mut host = ArenaHost::new();
	let root = host.create_element("div").unwrap();
	let child = host.create_element("p").unwrap();
	let text = host.create_text("x").unwrap();
	host.append_child(&child, &text).unwrap();
	host.append_child(&root, &child).unwrap();
	assert_eq!(host.len(), 3);

	host.remove_child(&root, &child).unwrap();

	assert_eq!(host.len(), 1);
	assert!(!host.is_live(&child));
	assert!(!host.is_live(&text));
	assert!(matches!(host.kind(&text), Err(Error::StaleNode(_))));
	assert!(matches!(host.set_attribute(&child, "id", "x"), Err(Error::StaleNode(_))));
}

#[test]
fn append_moves_the_node() {
	let mut host = ArenaHost::new();
	let a = host.create_element("a").unwrap();
	let b = host.create_element("b").unwrap();
	let moved = host.create_text("m").unwrap();

	host.append_child(&a, &moved).unwrap();
	host.append_child(&b, &moved).unwrap();

	assert!(host.children(a).is_empty());
	assert_eq!(host.children(b), &[moved]);
	assert_eq!(host.parent(moved), Some(b));
}

#[test]
fn hierarchy_is_enforced() {
	let mut host = ArenaHost::new();
	let outer = host.create_element("div").unwrap();
	let inner = host.create_element("div").unwrap();
	let text = host.create_text("t").unwrap();
	host.append_child(&outer, &inner).unwrap();

	assert_eq!(host.append_child(&inner, &outer), Err(Error::HierarchyRequest));
	assert_eq!(host.append_child(&outer, &outer), Err(Error::HierarchyRequest));
	assert_eq!(host.append_child(&text, &outer), Err(Error::HierarchyRequest));
}

#[test]
fn removing_a_non_child_fails() {
	let mut host = ArenaHost::new();
	let parent = host.create_element("div").unwrap();
	let stranger = host.create_element("div").unwrap();

	assert_eq!(host.remove_child(&parent, &stranger), Err(Error::NotAChild));
	assert!(host.is_live(&stranger));
}

#[test]
fn insert_before_and_replace_keep_positions() {
	let mut host = ArenaHost::new();
	let parent = host.create_element("ol").unwrap();
	let first = host.create_text("1").unwrap();
	let last = host.create_text("3").unwrap();
	host.append_child(&parent, &first).unwrap();
	host.append_child(&parent, &last).unwrap();

	let middle = host.create_text("2").unwrap();
	host.insert_before(&parent, &middle, &last).unwrap();
	assert_eq!(host.text_content(parent), "123");

	let replacement = host.create_text("two").unwrap();
	host.replace_child(&parent, &replacement, &middle).unwrap();
	assert_eq!(host.children(parent), &[first, replacement, last]);
	assert!(!host.is_live(&middle));
}

#[test]
fn names_are_validated() {
	let mut host = ArenaHost::new();

	assert_eq!(host.create_element(""), Err(Error::InvalidTagName(String::new())));
	assert_eq!(host.create_element("1div"), Err(Error::InvalidTagName("1div".to_owned())));
	assert!(host.create_element("my-element").is_ok());

	let div = host.create_element("div").unwrap();
	assert!(matches!(host.set_attribute(&div, "a b", "c"), Err(Error::Host { operation: "setAttribute", .. })));
	assert!(host.set_attribute(&div, "data-x", "c").is_ok());
}

#[test]
fn element_operations_reject_text_nodes() {
	let mut host = ArenaHost::new();
	let text = host.create_text("t").unwrap();

	assert_eq!(host.set_class_name(&text, "x"), Err(Error::NotAnElement { operation: "className" }));
	assert_eq!(host.kind(&text), Ok(NodeKind::Text("t".to_owned())));
}

#[test]
fn html_is_escaped() {
	let mut host = ArenaHost::new();
	let div = host.create_element("div").unwrap();
	host.set_attribute(&div, "title", "\"a\" & <b>").unwrap();
	let text = host.create_text("1 < 2 & 3 > 2").unwrap();
	host.append_child(&div, &text).unwrap();

	assert_eq!(host.outer_html(div), "<div title=\"&quot;a&quot; &amp; &lt;b&gt;\">1 &lt; 2 &amp; 3 &gt; 2</div>");
}

#[test]
fn clear_children_frees_everything_below() {
	let mut host = ArenaHost::new();
	let container = host.create_element("body").unwrap();
	for _ in 0..3 {
		let child = host.create_element("p").unwrap();
		let text = host.create_text("x").unwrap();
		host.append_child(&child, &text).unwrap();
		host.append_child(&container, &child).unwrap();
	}

	host.clear_children(&container).unwrap();

	assert!(host.children(container).is_empty());
	assert_eq!(host.len(), 1);
}

#[test]
fn style_attribute_and_fields_stay_in_sync() {
	let mut host = ArenaHost::new();
	let div = host.create_element("div").unwrap();
	host.set_style_property(&div, "color", "red").unwrap();
	host.set_attribute(&div, "id", "x").unwrap();

	host.set_attribute(&div, "style", "width: 1px; ; broken; height:2px").unwrap();
	assert_eq!(host.style(div, "color"), None);
	assert_eq!(host.style(div, "width"), Some("1px"));
	assert_eq!(host.style(div, "height"), Some("2px"));

	host.set_style_property(&div, "width", "").unwrap();
	assert_eq!(host.outer_html(div), "<div style=\"height: 2px;\" id=\"x\"></div>");
}
