use hashbrown::HashMap;
use tracing::debug;

/// Maps ref names to the live nodes most recently created under them.
///
/// Inserting under an existing name silently replaces the previous node.
/// Entries are never dropped on their own. Use [`RefRegistry::retain`] (or [`Renderer::prune_refs`](`crate::render::Renderer::prune_refs`)) for that.
#[derive(Debug, Clone)]
pub struct RefRegistry<N> {
	entries: HashMap<String, N>,
}

impl<N> Default for RefRegistry<N> {
	fn default() -> Self {
		Self::new()
	}
}

impl<N> RefRegistry<N> {
	#[must_use]
	pub fn new() -> Self {
		Self { entries: HashMap::new() }
	}

	/// Registers `node` under `name` and returns the node it shadows, if any.
	pub fn insert(&mut self, name: &str, node: N) -> Option<N> {
		let previous = self.entries.insert(name.to_owned(), node);
		if previous.is_some() {
			debug!("Ref {:?} now points at a new node.", name);
		}
		previous
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&N> {
		self.entries.get(name)
	}

	pub fn remove(&mut self, name: &str) -> Option<N> {
		self.entries.remove(name)
	}

	pub fn retain(&mut self, mut keep: impl FnMut(&str, &N) -> bool) {
		self.entries.retain(|name, node| keep(name, node));
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &N)> {
		self.entries.iter().map(|(name, node)| (name.as_str(), node))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
