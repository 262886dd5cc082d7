//! Renders plain element trees into a live document tree, and reconciles new element trees against it.
//!
//! The [`Renderer`] drives a [`Host`]: [`DomHost`] for the browser, [`ArenaHost`] for headless use.
//! A [`Store`] holds application state and notifies subscribers, which typically call [`Renderer::render`] again.

#![doc(html_root_url = "https://docs.rs/declarative-dom/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod arena;
pub mod dom;
pub mod error;
pub mod host;
pub mod json;
pub mod refs;
pub mod render;
pub mod store;
pub mod tree;

pub use arena::ArenaHost;
pub use dom::DomHost;
pub use error::{Error, Result};
pub use host::{Host, NodeKind};
pub use refs::RefRegistry;
pub use render::{Live, Renderer};
pub use store::{State, Store, Subscription};
pub use tree::{Element, Event, EventHandler, Leaf, Node, PropValue};
