use std::fmt;

/// Handle to a node inside a [`Document`] arena. Handles stay valid for the
/// lifetime of the document; detaching a node from its parent does not
/// invalidate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// An element node: tag name, ordered attribute list, and a visibility flag.
///
/// The `hidden` flag is the engine's display-suppression state. A bare
/// `hidden` attribute in source markup is folded into the flag at
/// construction so serialization round-trips.
#[derive(Debug, Clone)]
pub struct Element {
	pub tag: String,
	attributes: Vec<(String, String)>,
	pub hidden: bool,
}

impl Element {
	pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
		let mut hidden = false;
		let attributes = attributes
			.into_iter()
			.filter(|(name, _)| {
				if name == "hidden" {
					hidden = true;
					false
				} else {
					true
				}
			})
			.collect();

		Self {
			tag: tag.into(),
			attributes,
			hidden,
		}
	}

	/// Look up an attribute value by name. Returns the first match in source
	/// order.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(attr, _)| attr == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attributes
			.iter()
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}
}

#[derive(Debug, Clone)]
pub enum NodeKind {
	/// The document root. Never rendered itself, only its children.
	Root,
	Element(Element),
	Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
	kind: NodeKind,
	children: Vec<NodeId>,
}

/// An arena-backed markup tree. Nodes are owned by the document and
/// addressed through [`NodeId`] handles; detached nodes (repeater master
/// copies, replaced render output) are retained until the document is
/// dropped, matching the page-lifetime model of the engine.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<NodeData>,
	root: NodeId,
}

impl Document {
	pub fn new() -> Self {
		Self {
			nodes: vec![NodeData {
				kind: NodeKind::Root,
				children: vec![],
			}],
			root: NodeId(0),
		}
	}

	pub fn root(&self) -> NodeId {
		self.root
	}

	fn push(&mut self, kind: NodeKind) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeData {
			kind,
			children: vec![],
		});
		id
	}

	pub fn create_element(&mut self, element: Element) -> NodeId {
		self.push(NodeKind::Element(element))
	}

	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		self.push(NodeKind::Text(text.into()))
	}

	pub fn kind(&self, id: NodeId) -> &NodeKind {
		&self.nodes[id.0].kind
	}

	pub fn element(&self, id: NodeId) -> Option<&Element> {
		match &self.nodes[id.0].kind {
			NodeKind::Element(element) => Some(element),
			_ => None,
		}
	}

	pub fn children(&self, id: NodeId) -> &[NodeId] {
		&self.nodes[id.0].children
	}

	pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
		self.nodes[parent.0].children.push(child);
	}

	/// Detach and return all children of a node. The detached nodes remain
	/// addressable in the arena.
	pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
		std::mem::take(&mut self.nodes[id.0].children)
	}

	pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
		if let NodeKind::Element(element) = &mut self.nodes[id.0].kind {
			element.hidden = hidden;
		}
	}

	pub fn is_hidden(&self, id: NodeId) -> bool {
		self.element(id).is_some_and(|element| element.hidden)
	}

	/// Replace a node's content with a single text child. An empty string
	/// just clears the children.
	pub fn set_text(&mut self, id: NodeId, text: &str) {
		self.take_children(id);
		if !text.is_empty() {
			let child = self.create_text(text);
			self.append_child(id, child);
		}
	}

	/// Deep-copy a subtree into a fresh, detached subtree. Nested elements
	/// and text nodes are copied too; nothing is shared with the source.
	pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
		let kind = self.nodes[id.0].kind.clone();
		let children = self.nodes[id.0].children.clone();
		let copy = self.push(kind);

		for child in children {
			let child_copy = self.deep_clone(child);
			self.append_child(copy, child_copy);
		}

		copy
	}

	/// Concatenated text content of a subtree, skipping hidden elements.
	pub fn visible_text(&self, id: NodeId) -> String {
		let mut out = String::new();
		self.collect_visible_text(id, &mut out);
		out
	}

	fn collect_visible_text(&self, id: NodeId, out: &mut String) {
		match &self.nodes[id.0].kind {
			NodeKind::Text(text) => out.push_str(text),
			NodeKind::Element(element) if element.hidden => {}
			NodeKind::Root | NodeKind::Element(_) => {
				for &child in &self.nodes[id.0].children {
					self.collect_visible_text(child, out);
				}
			}
		}
	}

	/// Serialize a subtree back to markup. Hidden elements are emitted with
	/// a bare `hidden` attribute; childless elements self-close.
	pub fn markup(&self, id: NodeId) -> String {
		let mut out = String::new();
		self.write_node(id, &mut out);
		out
	}

	fn write_node(&self, id: NodeId, out: &mut String) {
		match &self.nodes[id.0].kind {
			NodeKind::Root => {
				for &child in &self.nodes[id.0].children {
					self.write_node(child, out);
				}
			}
			NodeKind::Text(text) => out.push_str(text),
			NodeKind::Element(element) => {
				out.push('<');
				out.push_str(&element.tag);
				for (name, value) in element.attributes() {
					out.push(' ');
					out.push_str(name);
					out.push_str("=\"");
					out.push_str(&value.replace('"', "\\\""));
					out.push('"');
				}
				if element.hidden {
					out.push_str(" hidden");
				}

				let children = &self.nodes[id.0].children;
				if children.is_empty() {
					out.push_str("/>");
					return;
				}

				out.push('>');
				for &child in children {
					self.write_node(child, out);
				}
				out.push_str("</");
				out.push_str(&element.tag);
				out.push('>');
			}
		}
	}
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.markup(self.root))
	}
}
