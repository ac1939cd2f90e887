use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum EzmlError {
	#[error(transparent)]
	#[diagnostic(code(ezml::io_error))]
	Io(#[from] std::io::Error),

	#[error("unexpected input at byte {offset}")]
	#[diagnostic(
		code(ezml::unexpected_input),
		help("tag bodies may only contain a tag name, attributes, `=`, and quoted values")
	)]
	UnexpectedInput { offset: usize },

	#[error("unclosed tag: `<{0}>`")]
	#[diagnostic(code(ezml::unclosed_tag), help("add `</{0}>` to close this element"))]
	UnclosedTag(String),

	#[error("mismatched closing tag: expected `</{expected}>`, found `</{found}>`")]
	#[diagnostic(code(ezml::mismatched_closing_tag))]
	MismatchedClosingTag { expected: String, found: String },

	#[error("closing tag `</{0}>` has no matching open tag")]
	#[diagnostic(code(ezml::unexpected_closing_tag))]
	UnexpectedClosingTag(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(ezml::config_parse),
		help("check that ezml.toml is valid TOML with `template` and/or `data` entries")
	)]
	ConfigParse(String),

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(ezml::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported data file format: `{0}`")]
	#[diagnostic(
		code(ezml::unsupported_format),
		help("supported formats: json, toml, yaml, yml")
	)]
	UnsupportedDataFormat(String),
}

pub type EzmlResult<T> = Result<T, EzmlError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
