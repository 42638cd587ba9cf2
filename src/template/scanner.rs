use super::hole::Hole;
use super::value::HoleValue;
use super::interpolated::{Fragment, Interpolated};
use super::parser::{parse_fragment, Segment};
use crate::error::{TemplateError, TemplateResult};

/// Flat token produced from all fragments of an interpolation.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Literal text with braces unescaped.
    Literal(String),
    Hole { hole: Hole, value: HoleValue },
}

/// Walk every fragment and bind each hole to its capture, merging adjacent
/// literal text across fragment boundaries.
pub fn scan(interpolated: Interpolated) -> TemplateResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut index = 0usize;

    for fragment in interpolated.into_fragments() {
        match fragment {
            Fragment::Raw(text) => push_literal(&mut tokens, &text),
            Fragment::Template { text, captures } => {
                let segments = parse_fragment(&text)?;
                let holes = segments
                    .iter()
                    .filter(|segment| matches!(segment, Segment::Hole(_)))
                    .count();
                if holes != captures.len() {
                    return Err(TemplateError::ArityMismatch {
                        template: text.into_owned(),
                        holes,
                        args: captures.len(),
                    });
                }

                let mut captures = captures.into_iter();
                for segment in segments {
                    match segment {
                        Segment::Literal(literal) => push_literal(&mut tokens, &literal),
                        Segment::Hole(spec) => {
                            let Some(capture) = captures.next() else {
                                break;
                            };
                            tokens.push(Token::Hole {
                                hole: Hole {
                                    source: capture.source,
                                    explicit_name: capture.name,
                                    template_name: spec.name,
                                    sigil: spec.sigil.or(capture.sigil),
                                    alignment: spec.alignment,
                                    format: spec.format,
                                    index,
                                },
                                value: capture.value,
                            });
                            index += 1;
                        }
                    }
                }
            }
        }
    }

    Ok(tokens)
}

pub fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Literal(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}
