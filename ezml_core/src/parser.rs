use crate::Document;
use crate::Element;
use crate::EzmlError;
use crate::EzmlResult;
use crate::lexer::MarkupToken;
use crate::lexer::tokenize;

/// Parse markup source into a [`Document`] tree.
///
/// The grammar is a deliberately small HTML subset: nested elements with
/// attributes (`<tag attr="value">`), self-closing elements (`<tag/>`), and
/// text runs. Comments and entities are not supported.
pub fn parse(source: impl AsRef<str>) -> EzmlResult<Document> {
	let tokens = tokenize(source.as_ref())?;
	let mut document = Document::new();
	let mut stack = vec![document.root()];

	for token in tokens {
		let parent = stack[stack.len() - 1];

		match token {
			MarkupToken::Text(text) => {
				let id = document.create_text(text);
				document.append_child(parent, id);
			}
			MarkupToken::OpenTag {
				name,
				attributes,
				self_closing,
			} => {
				let id = document.create_element(Element::new(name, attributes));
				document.append_child(parent, id);

				if !self_closing {
					stack.push(id);
				}
			}
			MarkupToken::CloseTag { name } => {
				if stack.len() <= 1 {
					return Err(EzmlError::UnexpectedClosingTag(name));
				}

				let id = stack.pop().unwrap_or(parent);
				let expected = document
					.element(id)
					.map(|element| element.tag.clone())
					.unwrap_or_default();

				if expected != name {
					return Err(EzmlError::MismatchedClosingTag {
						expected,
						found: name,
					});
				}
			}
		}
	}

	if stack.len() > 1 {
		let id = stack[stack.len() - 1];
		let tag = document
			.element(id)
			.map(|element| element.tag.clone())
			.unwrap_or_default();
		return Err(EzmlError::UnclosedTag(tag));
	}

	Ok(document)
}
