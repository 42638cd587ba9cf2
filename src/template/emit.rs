use std::sync::Arc;

use super::args::{ArgumentListBuilder, StructuredRecord};
use super::format::{align, format_value};
use super::literal::escape_braces;
use super::value::Value;
use crate::error::TemplateResult;

/// A hole with its structured key settled and its value known.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedHole {
    pub key: String,
    pub alignment: Option<i32>,
    pub format: Option<String>,
    pub value: Value,
}

/// Input of the emitter: literal text, or a hole that becomes an argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Piece {
    Text {
        text: String,
        /// Brace-escaped form, when already known.
        escaped: Option<Arc<str>>,
    },
    Hole(ResolvedHole),
}

impl Piece {
    pub fn text(text: impl Into<String>) -> Self {
        Piece::Text {
            text: text.into(),
            escaped: None,
        }
    }
}

/// Build the display message, the structured template and the argument
/// list in one pass.
pub fn emit(pieces: Vec<Piece>) -> TemplateResult<StructuredRecord> {
    let mut message = String::new();
    let mut template = String::new();
    let mut arguments = ArgumentListBuilder::new();

    for piece in pieces {
        match piece {
            Piece::Text { text, escaped } => {
                match escaped {
                    Some(escaped) => template.push_str(&escaped),
                    None => template.push_str(&escape_braces(&text)),
                }
                message.push_str(&text);
            }
            Piece::Hole(hole) => {
                let rendered = format_value(&hole.value, hole.format.as_deref())?;
                message.push_str(&align(rendered, hole.alignment));
                write_placeholder(&mut template, &hole);
                arguments.push(hole.key, hole.value);
            }
        }
    }

    Ok(arguments.finish(message, template))
}

fn write_placeholder(template: &mut String, hole: &ResolvedHole) {
    template.push('{');
    template.push_str(&hole.key);
    if let Some(alignment) = hole.alignment {
        template.push(',');
        template.push_str(&alignment.to_string());
    }
    if let Some(format) = &hole.format {
        template.push(':');
        template.push_str(format);
    }
    template.push('}');
}
