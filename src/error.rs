use thiserror::Error;

/// Failures reported by a [`Host`](`crate::host::Host`).
///
/// Malformed element trees never produce one of these. They degrade to "nothing rendered" instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("invalid tag name {0:?}")]
	InvalidTagName(String),

	#[error("node {0} is no longer part of the live tree")]
	StaleNode(String),

	#[error("`{operation}` requires an element, but the node is not one")]
	NotAnElement { operation: &'static str },

	#[error("node to remove or replace is not a child of the given parent")]
	NotAChild,

	#[error("the insertion would produce an invalid hierarchy (a text parent or a cycle)")]
	HierarchyRequest,

	#[error("host rejected `{operation}`: {message}")]
	Host { operation: &'static str, message: String },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
