use std::fmt;

use serde_json::Value;

/// Identifier returned by [`Widget::subscribe`], used to remove the
/// callback again.
pub type SubscriberId = usize;

/// The collaborator contract for the dialog/form layer. The engine does not
/// depend on widget internals; any UI element that can expose a value and
/// notify on change can participate.
pub trait Widget {
	fn value(&self) -> &Value;
	fn set_value(&mut self, value: Value);
	fn subscribe(&mut self, callback: Box<dyn FnMut(&Value)>) -> SubscriberId;
	fn unsubscribe(&mut self, id: SubscriberId) -> bool;
}

/// Reusable state holder for widget implementations: the current value plus
/// a callback registry notified on every set.
#[derive(Default)]
pub struct WidgetValue {
	value: Value,
	subscribers: Vec<(SubscriberId, Box<dyn FnMut(&Value)>)>,
	next_id: SubscriberId,
}

impl WidgetValue {
	pub fn new(initial: Value) -> Self {
		Self {
			value: initial,
			subscribers: vec![],
			next_id: 0,
		}
	}

	pub fn get(&self) -> &Value {
		&self.value
	}

	/// Store a new value and notify all subscribers with it.
	pub fn set(&mut self, value: Value) {
		self.value = value;
		for (_, callback) in &mut self.subscribers {
			callback(&self.value);
		}
	}

	pub fn subscribe(&mut self, callback: Box<dyn FnMut(&Value)>) -> SubscriberId {
		let id = self.next_id;
		self.next_id += 1;
		self.subscribers.push((id, callback));
		id
	}

	/// Remove a subscriber. Returns whether a callback was registered under
	/// the given id.
	pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
		let before = self.subscribers.len();
		self.subscribers.retain(|(subscriber, _)| *subscriber != id);
		self.subscribers.len() != before
	}

	pub fn clear_subscribers(&mut self) {
		self.subscribers.clear();
	}
}

impl fmt::Debug for WidgetValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WidgetValue")
			.field("value", &self.value)
			.field("subscribers", &self.subscribers.len())
			.finish()
	}
}
