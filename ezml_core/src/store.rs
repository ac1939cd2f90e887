use std::collections::HashMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde_json::Value;

/// A plain variable map, used for data files and update batches.
pub type Variables = HashMap<String, Value>;

/// The shared variable store: a process-wide (per engine instance) mapping
/// from variable name to current value. Values are untyped
/// [`serde_json::Value`]s; no shape validation happens here. Entries are
/// only removed when the repeater engine clears its loop aliases.
#[derive(Debug, Default, Deref, DerefMut)]
pub struct VariableStore(Variables);

impl VariableStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Overwrite/add the given entries; unmentioned keys keep their values.
	pub fn merge(&mut self, values: impl IntoIterator<Item = (String, Value)>) {
		self.0.extend(values);
	}

	/// The rendered text for a variable: empty for an absent variable,
	/// never the literal "null".
	pub fn display(&self, name: &str) -> String {
		self.0.get(name).map(to_display_string).unwrap_or_default()
	}
}

/// General truthiness used by conditional bindings: absent, `null`, `false`,
/// `0`, and the empty string are falsy; everything else (including empty
/// arrays and objects) is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(boolean)) => *boolean,
		Some(Value::Number(number)) => number.as_f64().is_some_and(|float| float != 0.0),
		Some(Value::String(string)) => !string.is_empty(),
		Some(Value::Array(_) | Value::Object(_)) => true,
	}
}

/// Stringify a value for a text slot. Strings render without quotes, arrays
/// as comma-joined items, objects as JSON.
pub fn to_display_string(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(boolean) => boolean.to_string(),
		Value::Number(number) => number.to_string(),
		Value::String(string) => string.clone(),
		Value::Array(items) => {
			let parts: Vec<String> = items.iter().map(to_display_string).collect();
			parts.join(",")
		}
		Value::Object(_) => value.to_string(),
	}
}
