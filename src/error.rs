use miette::SourceSpan;
use thiserror::Error;

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Hole opened at offset {offset} is never closed")]
    UnclosedHole { template: String, offset: usize },
    #[error("Unexpected `{brace}` at offset {offset}; literal braces must be doubled")]
    UnexpectedBrace {
        template: String,
        offset: usize,
        brace: char,
    },
    #[error("Malformed hole at offset {offset}: {message}")]
    MalformedHole {
        template: String,
        offset: usize,
        message: String,
    },
    #[error("Invalid alignment `{alignment}` at offset {offset}")]
    InvalidAlignment {
        template: String,
        offset: usize,
        alignment: String,
    },
    #[error("Template has {holes} holes but {args} arguments were supplied")]
    ArityMismatch {
        template: String,
        holes: usize,
        args: usize,
    },
    #[error("Format specifier `{specifier}` is not valid for a {kind} value")]
    InvalidFormat { specifier: String, kind: &'static str },
}

impl TemplateError {
    pub fn template(&self) -> Option<&str> {
        match self {
            TemplateError::UnclosedHole { template, .. }
            | TemplateError::UnexpectedBrace { template, .. }
            | TemplateError::MalformedHole { template, .. }
            | TemplateError::InvalidAlignment { template, .. }
            | TemplateError::ArityMismatch { template, .. } => Some(template),
            TemplateError::InvalidFormat { .. } => None,
        }
    }

    /// Span inside [`TemplateError::template`] that the error points at.
    pub fn to_source_span(&self) -> Option<SourceSpan> {
        match self {
            TemplateError::UnclosedHole { template, offset } => {
                Some((*offset, template.len().saturating_sub(*offset)).into())
            }
            TemplateError::UnexpectedBrace { offset, .. } => Some((*offset, 1).into()),
            TemplateError::MalformedHole { offset, .. } => Some((*offset, 1).into()),
            TemplateError::InvalidAlignment {
                offset, alignment, ..
            } => Some((*offset, alignment.len().max(1)).into()),
            TemplateError::ArityMismatch { template, .. } => Some((0, template.len()).into()),
            TemplateError::InvalidFormat { .. } => None,
        }
    }

    pub fn help(&self) -> Option<String> {
        match self {
            TemplateError::UnclosedHole { .. } => Some("Close the hole with `}`".into()),
            TemplateError::UnexpectedBrace { brace, .. } => {
                Some(format!("Write `{brace}{brace}` for a literal brace"))
            }
            TemplateError::MalformedHole { .. } => {
                Some("Syntax: {[@|$][name][,alignment][:format]}".into())
            }
            TemplateError::InvalidAlignment { .. } => {
                Some("Alignment is a signed integer below 1000000, e.g. {value,-8}".into())
            }
            TemplateError::ArityMismatch { holes, .. } => {
                Some(format!("Pass exactly {holes} argument(s), one per hole"))
            }
            TemplateError::InvalidFormat { .. } => None,
        }
    }
}
