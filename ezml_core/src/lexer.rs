use std::ops::Range;

use logos::Logos;
use snailquote::unescape;

use crate::EzmlError;
use crate::EzmlResult;

/// Raw tokens produced by logos for flat tokenization of the whole source.
/// Outside of tags most of these are reinterpreted as plain text by the
/// walker below.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("</")]
	ClosingTagOpen,
	#[token("<")]
	TagOpen,
	#[token("/>")]
	SelfClose,
	#[token(">")]
	TagClose,
	#[token("=")]
	Equals,
	#[regex(r"[ \t\r\n]+")]
	Whitespace,
	#[regex(r"[a-zA-Z][a-zA-Z0-9_-]*")]
	Ident,
	#[regex(r#""([^"\\]|\\.)*""#)]
	DoubleQuotedString,
	#[regex(r"'([^'\\]|\\.)*'")]
	SingleQuotedString,
}

/// Structured markup tokens consumed by the parser.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MarkupToken {
	/// A text run between tags, trimmed of surrounding whitespace.
	Text(String),
	OpenTag {
		name: String,
		attributes: Vec<(String, String)>,
		self_closing: bool,
	},
	CloseTag {
		name: String,
	},
}

/// Tokenize a markup source into structured tokens. Whitespace-only text
/// between tags is dropped.
pub(crate) fn tokenize(source: &str) -> EzmlResult<Vec<MarkupToken>> {
	TokenWalker::new(source).run()
}

/// Walks the flat logos token stream with context-dependent rules: between
/// tags every raw token (including lex errors) is accumulated as text, while
/// inside a tag only idents, `=`, and quoted values are legal.
struct TokenWalker<'a> {
	source: &'a str,
	raw: Vec<(Result<RawToken, ()>, Range<usize>)>,
	cursor: usize,
	text: String,
	tokens: Vec<MarkupToken>,
}

impl<'a> TokenWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw,
			cursor: 0,
			text: String::new(),
			tokens: vec![],
		}
	}

	fn run(mut self) -> EzmlResult<Vec<MarkupToken>> {
		while self.cursor < self.raw.len() {
			match &self.raw[self.cursor].0 {
				Ok(RawToken::TagOpen) => {
					self.flush_text();
					self.cursor += 1;
					self.open_tag()?;
				}
				Ok(RawToken::ClosingTagOpen) => {
					self.flush_text();
					self.cursor += 1;
					self.closing_tag()?;
				}
				_ => {
					let slice = self.slice();
					self.text.push_str(slice);
					self.cursor += 1;
				}
			}
		}

		self.flush_text();

		Ok(self.tokens)
	}

	/// Get the text slice for the current raw token.
	fn slice(&self) -> &'a str {
		let (_, span) = &self.raw[self.cursor];
		&self.source[span.clone()]
	}

	/// The current token if it lexed successfully.
	fn peek(&self) -> Option<&RawToken> {
		self.raw.get(self.cursor).and_then(|(token, _)| token.as_ref().ok())
	}

	fn skip_whitespace(&mut self) {
		while matches!(self.peek(), Some(RawToken::Whitespace)) {
			self.cursor += 1;
		}
	}

	fn unexpected(&self) -> EzmlError {
		let offset = self
			.raw
			.get(self.cursor)
			.map_or(self.source.len(), |(_, span)| span.start);
		EzmlError::UnexpectedInput { offset }
	}

	fn expect_ident(&mut self) -> EzmlResult<String> {
		match self.peek() {
			Some(RawToken::Ident) => {
				let name = self.slice().to_string();
				self.cursor += 1;
				Ok(name)
			}
			_ => Err(self.unexpected()),
		}
	}

	/// Parse the remainder of an open tag after `<`: a tag name, attributes,
	/// and the closing `>` or `/>`.
	fn open_tag(&mut self) -> EzmlResult<()> {
		self.skip_whitespace();
		let name = self.expect_ident()?;
		let mut attributes = vec![];

		loop {
			self.skip_whitespace();

			match self.peek() {
				Some(RawToken::TagClose) => {
					self.cursor += 1;
					self.tokens.push(MarkupToken::OpenTag {
						name,
						attributes,
						self_closing: false,
					});
					return Ok(());
				}
				Some(RawToken::SelfClose) => {
					self.cursor += 1;
					self.tokens.push(MarkupToken::OpenTag {
						name,
						attributes,
						self_closing: true,
					});
					return Ok(());
				}
				Some(RawToken::Ident) => {
					let attribute = self.slice().to_string();
					self.cursor += 1;
					self.skip_whitespace();

					let value = if matches!(self.peek(), Some(RawToken::Equals)) {
						self.cursor += 1;
						self.skip_whitespace();
						self.attribute_value()?
					} else {
						// Bare attribute such as `hidden`.
						String::new()
					};

					attributes.push((attribute, value));
				}
				_ => return Err(self.unexpected()),
			}
		}
	}

	/// Parse the remainder of a closing tag after `</`.
	fn closing_tag(&mut self) -> EzmlResult<()> {
		self.skip_whitespace();
		let name = self.expect_ident()?;
		self.skip_whitespace();

		match self.peek() {
			Some(RawToken::TagClose) => {
				self.cursor += 1;
				self.tokens.push(MarkupToken::CloseTag { name });
				Ok(())
			}
			_ => Err(self.unexpected()),
		}
	}

	fn attribute_value(&mut self) -> EzmlResult<String> {
		match self.peek() {
			Some(RawToken::DoubleQuotedString | RawToken::SingleQuotedString) => {
				let slice = self.slice();
				let value = unescape(slice).unwrap_or_else(|_| slice[1..slice.len() - 1].to_string());
				self.cursor += 1;
				Ok(value)
			}
			Some(RawToken::Ident) => {
				let value = self.slice().to_string();
				self.cursor += 1;
				Ok(value)
			}
			_ => Err(self.unexpected()),
		}
	}

	/// Push the accumulated text run as a token if it contains anything
	/// beyond whitespace.
	fn flush_text(&mut self) {
		let text = std::mem::take(&mut self.text);
		let trimmed = text.trim();

		if !trimmed.is_empty() {
			self.tokens.push(MarkupToken::Text(trimmed.to_string()));
		}
	}
}
