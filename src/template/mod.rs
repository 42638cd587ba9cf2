//! Interpolated string to structured template pipeline.
//!
//! `Interpolated` -> [`scanner::scan`] -> name resolution and literal
//! splicing -> [`emit::emit`] -> [`StructuredRecord`].

pub mod args;
pub mod emit;
pub mod format;
pub mod hole;
pub mod interpolated;
pub mod literal;
pub mod parser;
pub mod resolve;
pub mod scanner;
pub mod value;

use std::sync::Arc;

use crate::error::TemplateResult;
use emit::{Piece, ResolvedHole};
use scanner::Token;

pub use args::{StructuredRecord, ORIGINAL_FORMAT_KEY};
pub use hole::{Hole, HoleSpec, Sigil};
pub use interpolated::{Fragment, Interpolated};
pub use literal::LiteralCache;
pub use value::{
    destructure, literal, literal_uncached, named, stringify, Capture, HoleValue, LiteralValue,
    Value,
};

/// Runs the pipeline, optionally interning cacheable literals.
#[derive(Clone, Debug, Default)]
pub struct TemplateCompiler {
    cache: Option<Arc<LiteralCache>>,
}

impl TemplateCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: Arc<LiteralCache>) -> Self {
        Self { cache: Some(cache) }
    }

    pub fn cache(&self) -> Option<&Arc<LiteralCache>> {
        self.cache.as_ref()
    }

    pub fn compile(&self, interpolated: Interpolated) -> TemplateResult<StructuredRecord> {
        let tokens = scanner::scan(interpolated)?;
        let pieces = tokens
            .into_iter()
            .map(|token| self.lower(token))
            .collect();
        emit::emit(pieces)
    }

    fn lower(&self, token: Token) -> Piece {
        match token {
            Token::Literal(text) => Piece::text(text),
            Token::Hole { hole, value } => match value {
                HoleValue::Literal(literal) => {
                    let splice = literal::splice(&literal, self.cache.as_deref());
                    Piece::Text {
                        text: splice.text,
                        escaped: Some(splice.escaped),
                    }
                }
                HoleValue::Value(value) => Piece::Hole(ResolvedHole {
                    key: resolve::structured_key(hole.sigil, &resolve::base_name(&hole)),
                    alignment: hole.alignment,
                    format: hole.format,
                    value,
                }),
            },
        }
    }
}

/// Compile without a literal cache.
pub fn compile(interpolated: Interpolated) -> TemplateResult<StructuredRecord> {
    TemplateCompiler::new().compile(interpolated)
}
