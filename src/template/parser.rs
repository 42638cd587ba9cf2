use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while, take_while1},
    character::complete::{char, digit1, space0},
    combinator::{map, opt, recognize},
    sequence::{pair, preceded},
    IResult,
};

use super::hole::{HoleSpec, Sigil};
use crate::error::{TemplateError, TemplateResult};

const MAX_ALIGNMENT: i64 = 1_000_000;

/// A fragment split into literal text (braces already unescaped) and holes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Hole(HoleSpec),
}

pub fn parse_escaped_brace(input: &str) -> IResult<&str, &str> {
    alt((map(tag("{{"), |_| "{"), map(tag("}}"), |_| "}")))(input)
}

pub fn parse_literal_run(input: &str) -> IResult<&str, &str> {
    is_not("{}")(input)
}

pub fn parse_sigil(input: &str) -> IResult<&str, Sigil> {
    alt((
        map(char('@'), |_| Sigil::Destructure),
        map(char('$'), |_| Sigil::Stringify),
    ))(input)
}

pub fn parse_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.')(input)
}

pub fn parse_alignment(input: &str) -> IResult<&str, &str> {
    let (input, _) = char(',')(input)?;
    let (input, _) = space0(input)?;
    recognize(pair(opt(char('-')), digit1))(input)
}

pub fn parse_format(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while(|c: char| c != '{' && c != '}'))(input)
}

/// Split one template fragment into segments.
pub fn parse_fragment(text: &str) -> TemplateResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let offset = text.len() - remaining.len();

        if let Ok((rest, brace)) = parse_escaped_brace(remaining) {
            literal.push_str(brace);
            remaining = rest;
            continue;
        }
        if let Ok((rest, run)) = parse_literal_run(remaining) {
            literal.push_str(run);
            remaining = rest;
            continue;
        }
        if remaining.starts_with('}') {
            return Err(TemplateError::UnexpectedBrace {
                template: text.to_string(),
                offset,
                brace: '}',
            });
        }

        let (rest, spec) = parse_hole(text, remaining, offset)?;
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Hole(spec));
        remaining = rest;
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Just the holes of a fragment, in order.
pub fn hole_specs(text: &str) -> TemplateResult<Vec<HoleSpec>> {
    Ok(parse_fragment(text)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Hole(spec) => Some(spec),
            Segment::Literal(_) => None,
        })
        .collect())
}

fn parse_hole<'a>(
    template: &str,
    input: &'a str,
    offset: usize,
) -> TemplateResult<(&'a str, HoleSpec)> {
    let body_and_rest = &input[1..];
    let Some(close) = body_and_rest.find('}') else {
        return Err(TemplateError::UnclosedHole {
            template: template.to_string(),
            offset,
        });
    };
    let body = &body_and_rest[..close];
    let rest = &body_and_rest[close + 1..];
    let body_offset = offset + 1;

    if let Some(nested) = body.find('{') {
        return Err(malformed(
            template,
            body_offset + nested,
            "holes cannot be nested",
        ));
    }

    let mut spec = HoleSpec {
        offset,
        ..HoleSpec::default()
    };
    let mut cursor = skip_space(body);

    if let Ok((after, sigil)) = parse_sigil(cursor) {
        spec.sigil = Some(sigil);
        cursor = after;
    }
    if let Ok((after, name)) = parse_name(cursor) {
        spec.name = Some(name.to_string());
        cursor = after;
    }
    cursor = skip_space(cursor);

    if cursor.starts_with(',') {
        let at = body_offset + (body.len() - cursor.len());
        let (after, alignment) = parse_alignment(cursor).map_err(|_| {
            let raw = cursor[1..].split(':').next().unwrap_or_default().trim();
            TemplateError::InvalidAlignment {
                template: template.to_string(),
                offset: at,
                alignment: raw.to_string(),
            }
        })?;
        spec.alignment = Some(to_alignment(template, at, alignment)?);
        cursor = skip_space(after);
    }

    if cursor.starts_with(':') {
        if let Ok((after, format)) = parse_format(cursor) {
            spec.format = Some(format.to_string());
            cursor = after;
        }
    }

    if let Some(unexpected) = cursor.chars().next() {
        let at = body_offset + (body.len() - cursor.len());
        return Err(malformed(
            template,
            at,
            format!("unexpected `{unexpected}` in hole"),
        ));
    }

    Ok((rest, spec))
}

fn skip_space(input: &str) -> &str {
    space0::<&str, nom::error::Error<&str>>(input)
        .map(|(rest, _)| rest)
        .unwrap_or(input)
}

fn to_alignment(template: &str, offset: usize, raw: &str) -> TemplateResult<i32> {
    match raw.parse::<i64>() {
        Ok(value) if value.abs() < MAX_ALIGNMENT => Ok(value as i32),
        _ => Err(TemplateError::InvalidAlignment {
            template: template.to_string(),
            offset,
            alignment: raw.to_string(),
        }),
    }
}

fn malformed(template: &str, offset: usize, message: impl Into<String>) -> TemplateError {
    TemplateError::MalformedHole {
        template: template.to_string(),
        offset,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(name: &str) -> HoleSpec {
        HoleSpec {
            name: Some(name.to_string()),
            ..HoleSpec::default()
        }
    }

    #[test]
    fn doubled_braces_are_literal_text() {
        let segments = parse_fragment("T{{es}}t").expect("parse");
        assert_eq!(segments, vec![Segment::Literal("T{es}t".into())]);
    }

    #[test]
    fn hole_with_alignment_and_format() {
        let segments = parse_fragment("Value: {value,8:N}!").expect("parse");
        assert_eq!(
            segments,
            vec![
                Segment::Literal("Value: ".into()),
                Segment::Hole(HoleSpec {
                    alignment: Some(8),
                    format: Some("N".into()),
                    offset: 7,
                    ..hole("value")
                }),
                Segment::Literal("!".into()),
            ]
        );
    }

    #[test]
    fn sigils_and_anonymous_holes() {
        let specs = hole_specs("{@} {$str} { , -4 :x2}").expect("parse");
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].sigil, Some(Sigil::Destructure));
        assert_eq!(specs[0].name, None);
        assert_eq!(specs[1].sigil, Some(Sigil::Stringify));
        assert_eq!(specs[1].name.as_deref(), Some("str"));
        assert_eq!(specs[2].alignment, Some(-4));
        assert_eq!(specs[2].format.as_deref(), Some("x2"));
    }

    #[test]
    fn format_may_contain_commas_and_colons() {
        let specs = hole_specs("{n:#,##0.00} {t:hh:mm}").expect("parse");
        assert_eq!(specs[0].format.as_deref(), Some("#,##0.00"));
        assert_eq!(specs[1].format.as_deref(), Some("hh:mm"));
    }

    #[test]
    fn unclosed_hole_reports_offset() {
        let err = parse_fragment("abc {value").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnclosedHole {
                template: "abc {value".into(),
                offset: 4,
            }
        );
    }

    #[test]
    fn lone_closing_brace_is_rejected() {
        let err = parse_fragment("a } b").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::UnexpectedBrace {
                offset: 2,
                brace: '}',
                ..
            }
        ));
    }

    #[test]
    fn bad_alignment_is_reported() {
        let err = parse_fragment("{v,abc}").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidAlignment { ref alignment, .. } if alignment == "abc"));
        let err = parse_fragment("{v,1000000}").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidAlignment { .. }));
    }

    #[test]
    fn junk_inside_hole_is_malformed() {
        let err = parse_fragment("{a b}").unwrap_err();
        assert!(matches!(err, TemplateError::MalformedHole { offset: 3, .. }));
    }
}
