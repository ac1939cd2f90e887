use std::collections::BTreeMap;
use std::collections::HashMap;

use serde_json::Value;

use crate::Document;
use crate::Element;
use crate::EzmlResult;
use crate::NodeId;
use crate::VariableStore;
use crate::is_truthy;
use crate::parse;

const CONDITIONAL_TAG: &str = "ez-if";
const VALUE_TAG: &str = "ez-value";
const REPEATER_TAG: &str = "ez-for";

const CONDITION_ATTRIBUTE: &str = "condition";
const VAR_ATTRIBUTE: &str = "var";
const ELEMENT_ATTRIBUTE: &str = "element";
const COUNTER_ATTRIBUTE: &str = "counter";

/// The reactive role of an element, resolved once from its tag name and
/// attributes. Elements with a reactive tag but without the required
/// attribute get no binding at all, so later passes cannot observe an
/// invalid role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
	/// Visibility follows the truthiness of `var`.
	Conditional { var: String },
	/// Text content mirrors the stringified value of `var`.
	ValueSlot { var: String },
	/// Children are re-rendered once per element of the list in `var`, with
	/// optional per-iteration aliases for the item and its index.
	Repeater {
		var: String,
		element: Option<String>,
		counter: Option<String>,
	},
}

impl Binding {
	pub(crate) fn from_element(element: &Element) -> Option<Self> {
		match element.tag.as_str() {
			CONDITIONAL_TAG => {
				element
					.attribute(CONDITION_ATTRIBUTE)
					.map(|var| Self::Conditional {
						var: var.to_string(),
					})
			}
			VALUE_TAG => {
				element.attribute(VAR_ATTRIBUTE).map(|var| {
					Self::ValueSlot {
						var: var.to_string(),
					}
				})
			}
			REPEATER_TAG => {
				element.attribute(VAR_ATTRIBUTE).map(|var| {
					Self::Repeater {
						var: var.to_string(),
						element: element.attribute(ELEMENT_ATTRIBUTE).map(str::to_string),
						counter: element.attribute(COUNTER_ATTRIBUTE).map(str::to_string),
					}
				})
			}
			_ => None,
		}
	}

	/// The variable name this binding observes.
	pub fn var(&self) -> &str {
		match self {
			Self::Conditional { var } | Self::ValueSlot { var } | Self::Repeater { var, .. } => var,
		}
	}
}

/// A reactive instance over one parsed [`Document`].
///
/// Construction performs the one-time bootstrap: conditional and value-slot
/// elements are indexed by the variable they observe, and each outermost
/// repeater's children are captured as its master copy and detached from the
/// live tree. Registration is frozen afterwards; elements added to the
/// document later are invisible to the engine.
#[derive(Debug)]
pub struct Engine {
	document: Document,
	store: VariableStore,
	/// Variable name to the conditional/value-slot nodes observing it.
	observers: HashMap<String, Vec<NodeId>>,
	/// All registered repeaters in document order. Repeaters are not
	/// indexed per variable: every update re-expands all of them.
	repeaters: Vec<NodeId>,
	bindings: BTreeMap<NodeId, Binding>,
	/// Master copies: the original, never-mutated children of each
	/// repeater, captured at registration.
	masters: HashMap<NodeId, Vec<NodeId>>,
}

impl Engine {
	/// Build an engine over an already-parsed document and apply the initial
	/// render pass, so conditionals bound to absent variables start hidden
	/// and value slots start empty.
	pub fn new(document: Document) -> Self {
		let mut engine = Self {
			document,
			store: VariableStore::new(),
			observers: HashMap::new(),
			repeaters: Vec::new(),
			bindings: BTreeMap::new(),
			masters: HashMap::new(),
		};

		engine.register(engine.document.root());
		tracing::debug!(
			observed = engine.observers.len(),
			repeaters = engine.repeaters.len(),
			"registered bindings"
		);
		engine.refresh();

		engine
	}

	/// Parse markup and build an engine over it.
	pub fn from_markup(source: impl AsRef<str>) -> EzmlResult<Self> {
		Ok(Self::new(parse(source)?))
	}

	fn register(&mut self, id: NodeId) {
		let binding = self.document.element(id).and_then(Binding::from_element);

		if let Some(binding) = binding {
			match &binding {
				Binding::Conditional { var } | Binding::ValueSlot { var } => {
					self.observers.entry(var.clone()).or_default().push(id);
					self.bindings.insert(id, binding);
				}
				Binding::Repeater { .. } => {
					// Capture the master copy and remove it from the live
					// tree, so the template is never itself rendered.
					let master = self.document.take_children(id);
					self.masters.insert(id, master);
					self.repeaters.push(id);
					self.bindings.insert(id, binding);
					return;
				}
			}
		}

		for child in self.document.children(id).to_vec() {
			self.register(child);
		}
	}

	/// Merge a partial variable update into the store and re-render.
	///
	/// Only conditionals and value slots observing one of the updated names
	/// are touched; repeaters are always re-expanded because list contents
	/// and loop aliases are not tracked by the observer index. The pass is
	/// idempotent: rendering is a pure function of the store's current
	/// contents for a fixed document.
	pub fn set_variables(&mut self, values: impl IntoIterator<Item = (String, Value)>) {
		let values: Vec<(String, Value)> = values.into_iter().collect();
		let names: Vec<String> = values.iter().map(|(name, _)| name.clone()).collect();
		self.store.merge(values);

		let affected: Vec<NodeId> = names
			.iter()
			.filter_map(|name| self.observers.get(name))
			.flatten()
			.copied()
			.collect();
		tracing::debug!(
			changed = names.len(),
			affected = affected.len(),
			"applying variable update"
		);

		self.apply_conditionals(&affected);
		self.apply_values(&affected);
		self.apply_repeaters();
	}

	/// Re-apply every binding from the store's current contents, ignoring
	/// the observer index. Used for the initial render.
	pub fn refresh(&mut self) {
		let all: Vec<NodeId> = self.bindings.keys().copied().collect();
		self.apply_conditionals(&all);
		self.apply_values(&all);
		self.apply_repeaters();
	}

	/// Toggle visibility on the conditional nodes in `nodes`. Nodes carrying
	/// another role are skipped, so mixed affected sets are safe.
	fn apply_conditionals(&mut self, nodes: &[NodeId]) {
		for &id in nodes {
			let Some(Binding::Conditional { var }) = self.bindings.get(&id) else {
				continue;
			};

			let visible = is_truthy(self.store.get(var));
			self.document.set_hidden(id, !visible);
		}
	}

	/// Overwrite the text of the value-slot nodes in `nodes`. No diffing
	/// against the previous text.
	fn apply_values(&mut self, nodes: &[NodeId]) {
		for &id in nodes {
			let Some(Binding::ValueSlot { var }) = self.bindings.get(&id) else {
				continue;
			};

			let text = self.store.display(var);
			self.document.set_text(id, &text);
		}
	}

	/// Re-expand all registered repeaters from their master copies.
	fn apply_repeaters(&mut self) {
		for id in self.repeaters.clone() {
			let Some(Binding::Repeater {
				var,
				element,
				counter,
			}) = self.bindings.get(&id).cloned()
			else {
				continue;
			};
			let Some(master) = self.masters.get(&id).cloned() else {
				continue;
			};

			self.expand_repeater(id, &var, element.as_deref(), counter.as_deref(), &master);
		}
	}

	/// One full expansion of a repeater: drop the previously rendered
	/// copies, then for each list element in order clone the master copy,
	/// bind the clone with the loop aliases in the store, append it, and
	/// clear the aliases again.
	///
	/// A bound variable that does not currently hold a list means the
	/// repeater is skipped for this pass without clearing its output.
	fn expand_repeater(
		&mut self,
		id: NodeId,
		var: &str,
		element: Option<&str>,
		counter: Option<&str>,
		master: &[NodeId],
	) {
		let Some(Value::Array(items)) = self.store.get(var).cloned() else {
			tracing::debug!(var, "repeater variable is not a list, skipping");
			return;
		};

		tracing::debug!(var, items = items.len(), "expanding repeater");
		self.document.take_children(id);

		for (index, item) in items.into_iter().enumerate() {
			if let Some(name) = element {
				self.store.insert(name.to_string(), item.clone());
			}
			if let Some(name) = counter {
				self.store.insert(name.to_string(), Value::from(index));
			}

			for &node in master {
				let copy = self.document.deep_clone(node);
				self.bind_clone(copy);
				self.document.append_child(id, copy);
			}

			// Aliases are loop-scoped: clear them before the next iteration
			// so they cannot leak into unrelated lookups.
			if let Some(name) = element {
				self.store.remove(name);
			}
			if let Some(name) = counter {
				self.store.remove(name);
			}
		}
	}

	/// Bind a freshly cloned subtree against the store's current state.
	///
	/// Clones are new node identities on every pass, so this is a local
	/// re-scan rather than an observer-index lookup. Nested repeaters are
	/// expanded recursively, using the clone's own children as the master.
	fn bind_clone(&mut self, id: NodeId) {
		let binding = self.document.element(id).and_then(Binding::from_element);

		if let Some(binding) = binding {
			match binding {
				Binding::Conditional { var } => {
					let visible = is_truthy(self.store.get(&var));
					self.document.set_hidden(id, !visible);
				}
				Binding::ValueSlot { var } => {
					let text = self.store.display(&var);
					self.document.set_text(id, &text);
					return;
				}
				Binding::Repeater {
					var,
					element,
					counter,
				} => {
					let master = self.document.take_children(id);
					self.expand_repeater(id, &var, element.as_deref(), counter.as_deref(), &master);
					return;
				}
			}
		}

		for child in self.document.children(id).to_vec() {
			self.bind_clone(child);
		}
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	pub fn store(&self) -> &VariableStore {
		&self.store
	}

	/// All registered bindings in document order.
	pub fn bindings(&self) -> impl Iterator<Item = (NodeId, &Binding)> {
		self.bindings.iter().map(|(id, binding)| (*id, binding))
	}

	/// Serialize the current document state back to markup.
	pub fn render(&self) -> String {
		self.document.to_string()
	}

	/// The concatenated visible text of the current document state.
	pub fn visible_text(&self) -> String {
		self.document.visible_text(self.document.root())
	}
}
