use serde_json::Value;

use crate::Engine;

/// A repeater with an item alias and a counter alias around a single value
/// slot.
pub(crate) const LIST_TEMPLATE: &str =
	r#"<ez-for var="items" element="row" counter="idx"><ez-value var="row"/></ez-for>"#;

/// A conditional wrapping static content.
pub(crate) const CONDITIONAL_TEMPLATE: &str =
	r#"<ez-if condition="show"><p>visible</p></ez-if>"#;

/// A repeater over a list of lists, with an inner repeater bound to the
/// outer item alias.
pub(crate) const NESTED_TEMPLATE: &str = r#"<ez-for var="rows" element="row"><ez-for var="row" element="cell"><ez-value var="cell"/></ez-for></ez-for>"#;

pub(crate) fn engine(source: &str) -> Engine {
	Engine::from_markup(source).unwrap_or_else(|e| panic!("parse: {e}"))
}

pub(crate) fn vars(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
	pairs
		.iter()
		.map(|(name, value)| ((*name).to_string(), value.clone()))
		.collect()
}
