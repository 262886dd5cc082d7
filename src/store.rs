//! A minimal observable state container to drive re-renders.

use indexmap::IndexMap;
use serde_json::Value;
use std::{
	cell::RefCell,
	rc::{Rc, Weak},
};
use tracing::{instrument, trace};

/// The complete state: a flat map from key to value.
pub type State<V = Value> = IndexMap<String, V>;

/// Receives the complete new state after each [`Store::set_state`].
pub type Listener<V = Value> = Rc<dyn Fn(&State<V>)>;

type Listeners<V> = Rc<RefCell<Vec<Listener<V>>>>;

/// Holds one [`State`] and notifies subscribers, synchronously and unconditionally, whenever it is updated.
///
/// [`Store::get_state`] hands out shared snapshots. They can't be mutated, and each update replaces
/// the snapshot instead of changing it.
pub struct Store<V = Value> {
	state: RefCell<Rc<State<V>>>,
	listeners: Listeners<V>,
}

impl<V> Default for Store<V> {
	fn default() -> Self {
		Self::new(IndexMap::new())
	}
}

impl<V> Store<V> {
	#[must_use]
	pub fn new(initial: State<V>) -> Self {
		Self {
			state: RefCell::new(Rc::new(initial)),
			listeners: Rc::default(),
		}
	}

	#[must_use]
	pub fn get_state(&self) -> Rc<State<V>> {
		Rc::clone(&self.state.borrow())
	}

	/// Number of currently registered listeners, counting repeats.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}

	/// Registers `listener`. The same listener may be registered more than once and is then called once per registration.
	pub fn subscribe(&self, listener: Listener<V>) -> Subscription<V> {
		self.listeners.borrow_mut().push(Rc::clone(&listener));
		trace!("Listener subscribed.");
		Subscription {
			listeners: Rc::downgrade(&self.listeners),
			listener,
		}
	}
}

impl<V: Clone> Store<V> {
	/// Overlays `partial` onto the current state and then calls every listener, in subscription order, with the result.
	///
	/// Keys in `partial` overwrite existing ones (keeping their position), all other keys are kept.
	/// Listeners are notified even if nothing changed. Listeners subscribed or unsubscribed during notification
	/// only take effect from the next update on, and they may call `set_state` again themselves.
	#[instrument(skip(self, partial))]
	pub fn set_state<K: Into<String>>(&self, partial: impl IntoIterator<Item = (K, V)>) {
		let next = {
			let mut next: State<V> = (**self.state.borrow()).clone();
			next.extend(partial.into_iter().map(|(key, value)| (key.into(), value)));
			Rc::new(next)
		};
		*self.state.borrow_mut() = Rc::clone(&next);

		let listeners = self.listeners.borrow().clone();
		trace!("Notifying {} listener(s).", listeners.len());
		for listener in listeners {
			listener(&next);
		}
	}
}

/// Returned by [`Store::subscribe`]. Dropping it keeps the listener registered.
#[must_use = "dropping a `Subscription` keeps the listener subscribed, which may be intended"]
pub struct Subscription<V = Value> {
	listeners: Weak<RefCell<Vec<Listener<V>>>>,
	listener: Listener<V>,
}

impl<V> Subscription<V> {
	/// Removes every registration of this subscription's listener, including repeats from other `subscribe` calls.
	pub fn unsubscribe(self) {
		if let Some(listeners) = self.listeners.upgrade() {
			let mut listeners = listeners.borrow_mut();
			let before = listeners.len();
			listeners.retain(|listener| !Rc::ptr_eq(listener, &self.listener));
			trace!("Unsubscribed {} listener registration(s).", before - listeners.len());
		}
	}
}
