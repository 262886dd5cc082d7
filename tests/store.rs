use declarative_dom::{arena::NodeId, ArenaHost, Event, Host, Node, Renderer, State, Store};
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};

#[test]
fn set_state_merges_shallowly() {
	let store: Store = Store::default();
	let seen = Rc::new(RefCell::new(Vec::new()));
	let _subscription = {
		let seen = Rc::clone(&seen);
		store.subscribe(Rc::new(move |state: &State| seen.borrow_mut().push(state.clone())))
	};

	store.set_state([("a", json!(1))]);
	store.set_state([("b", json!(2))]);

	let seen = seen.borrow();
	assert_eq!(seen.len(), 2);
	assert_eq!(seen[1].get("a"), Some(&json!(1)));
	assert_eq!(seen[1].get("b"), Some(&json!(2)));
	assert_eq!(*store.get_state(), seen[1]);
}

#[test]
fn set_state_overwrites_in_place() {
	let store = Store::new(IndexMap::from([("first".to_owned(), json!("x")), ("second".to_owned(), json!(true))]));

	store.set_state([("first", json!("y"))]);

	let state = store.get_state();
	assert_eq!(state.keys().collect::<Vec<_>>(), ["first", "second"]);
	assert_eq!(state["first"], json!("y"));
}

#[test]
fn snapshots_are_not_changed_by_updates() {
	let store: Store = Store::default();
	store.set_state([("activeTab", json!("all"))]);
	let before = store.get_state();

	store.set_state([("activeTab", json!("kitchen"))]);

	assert_eq!(before["activeTab"], json!("all"));
	assert_eq!(store.get_state()["activeTab"], json!("kitchen"));
}

#[test]
fn listeners_run_in_order_on_every_update() {
	let store: Store = Store::default();
	let log = Rc::new(RefCell::new(Vec::new()));
	for &name in &["first", "second"] {
		let log = Rc::clone(&log);
		let _ = store.subscribe(Rc::new(move |_: &State| log.borrow_mut().push(name)));
	}

	store.set_state([("same", json!(0))]);
	store.set_state([("same", json!(0))]);

	assert_eq!(*log.borrow(), ["first", "second", "first", "second"]);
}

#[test]
fn unsubscribe_removes_only_that_listener() {
	let store: Store = Store::default();
	let calls = Rc::new(Cell::new(0));
	let counting = {
		let calls = Rc::clone(&calls);
		store.subscribe(Rc::new(move |_: &State| calls.set(calls.get() + 1)))
	};
	let _other = store.subscribe(Rc::new(|_: &State| ()));

	counting.unsubscribe();
	store.set_state([("a", json!(1))]);

	assert_eq!(calls.get(), 0);
	assert_eq!(store.listener_count(), 1);
}

#[test]
fn unsubscribe_removes_all_registrations_of_a_listener() {
	let store: Store = Store::default();
	let calls = Rc::new(Cell::new(0));
	let listener: Rc<dyn Fn(&State)> = {
		let calls = Rc::clone(&calls);
		Rc::new(move |_: &State| calls.set(calls.get() + 1))
	};
	let first = store.subscribe(Rc::clone(&listener));
	let _second = store.subscribe(Rc::clone(&listener));

	store.set_state([("a", json!(1))]);
	assert_eq!(calls.get(), 2);

	first.unsubscribe();
	store.set_state([("a", json!(2))]);
	assert_eq!(calls.get(), 2);
	assert_eq!(store.listener_count(), 0);
}

#[test]
fn unsubscribe_after_the_store_is_gone() {
	let store: Store = Store::default();
	let subscription = store.subscribe(Rc::new(|_: &State| ()));
	drop(store);

	subscription.unsubscribe();
}

#[test]
fn listeners_may_update_the_state_again() {
	let store: Rc<Store> = Rc::new(Store::default());
	let _subscription = {
		let weak = Rc::downgrade(&store);
		store.subscribe(Rc::new(move |state: &State| {
			if !state.contains_key("derived") {
				weak.upgrade().unwrap().set_state([("derived", json!(true))]);
			}
		}))
	};

	store.set_state([("input", json!(1))]);

	let state = store.get_state();
	assert_eq!(state.get("input"), Some(&json!(1)));
	assert_eq!(state.get("derived"), Some(&json!(true)));
}

const TABS: [&str; 3] = ["all", "kitchen", "hall"];

fn view(store: &Rc<Store>) -> Node {
	let state = store.get_state();
	let active = state.get("activeTab").and_then(Value::as_str).unwrap_or("all");
	Node::element("div")
		.class_name("section__tabs")
		.children(TABS.iter().map(|&tab| {
			let store = Rc::clone(store);
			Node::element("div")
				.class_name(if tab == active { "section__tab section__tab_active" } else { "section__tab" })
				.prop("role", "tab")
				.prop("aria-selected", tab == active)
				.prop("id", tab)
				.on("click", move |_| store.set_state([("activeTab", json!(tab))]))
				.child(tab)
		}))
		.into()
}

#[test]
fn state_changes_drive_full_rerenders() {
	let renderer = Rc::new(RefCell::new(Renderer::new(ArenaHost::new())));
	let container: NodeId = renderer.borrow_mut().host_mut().create_element("main").unwrap();
	let store = Rc::new(Store::new(IndexMap::from([("activeTab".to_owned(), json!("all"))])));

	let _subscription = {
		let renderer = Rc::clone(&renderer);
		let store_ref = Rc::downgrade(&store);
		store.subscribe(Rc::new(move |_: &State| {
			let store = store_ref.upgrade().unwrap();
			renderer.borrow_mut().render(&view(&store), &container).unwrap();
		}))
	};
	renderer.borrow_mut().render(&view(&store), &container).unwrap();

	let old_kitchen = {
		let renderer = renderer.borrow();
		let tabs = renderer.host().children(container)[0];
		let kitchen = renderer.host().children(tabs)[1];
		kitchen
	};
	let handlers = renderer.borrow().host().listeners(old_kitchen, "click");
	assert_eq!(handlers.len(), 1);
	for handler in handlers {
		handler(&Event::new("click"));
	}

	assert_eq!(store.get_state()["activeTab"], json!("kitchen"));
	let renderer = renderer.borrow();
	let host = renderer.host();
	let tabs = host.children(container)[0];
	let kitchen = host.children(tabs)[1];
	assert!(!host.is_live(&old_kitchen));
	assert_eq!(host.attribute(kitchen, "aria-selected"), Some("aria-selected"));
	assert_eq!(host.attribute(kitchen, "class"), Some("section__tab section__tab_active"));
	assert!(!host.has_attribute(host.children(tabs)[0], "aria-selected"));
}
