//! `ezml_core` is a small reactive templating engine. A markup document
//! declares conditional elements (`<ez-if condition="name">`), text slots
//! (`<ez-value var="name">`), and repeated subtrees (`<ez-for var="list"
//! element="item" counter="index">`), all bound to a shared variable store.
//! Pushing a partial variable update through [`Engine::set_variables`]
//! re-renders exactly the affected conditionals and value slots, then
//! re-expands every repeater from its captured master copy.

pub use config::*;
pub use dom::*;
pub use engine::*;
pub use error::*;
pub use parser::*;
pub use store::*;
pub use widget::*;

pub mod config;
mod dom;
mod engine;
mod error;
pub(crate) mod lexer;
mod parser;
mod store;
mod widget;

#[cfg(test)]
mod __fixtures;
