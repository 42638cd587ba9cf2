use crate::{config::ConfigError, error::TemplateError};
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{message}")]
pub struct TemplateDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl TemplateDiagnostic {
    /// Diagnostic pointing into the template text. Errors without a template
    /// (bad format specifiers) have nothing to point at.
    pub fn from_error(name: &str, err: &TemplateError) -> Option<Self> {
        let template = err.template()?;
        let span = err.to_source_span()?;
        Some(Self {
            src: NamedSource::new(name, template.to_string()),
            span,
            help: err.help(),
            message: err.to_string(),
            label: label_for(err).to_string(),
        })
    }
}

fn label_for(err: &TemplateError) -> &'static str {
    match err {
        TemplateError::UnclosedHole { .. } => "hole starts here",
        TemplateError::UnexpectedBrace { .. } => "unmatched brace",
        TemplateError::MalformedHole { .. } => "here",
        TemplateError::InvalidAlignment { .. } => "alignment",
        TemplateError::ArityMismatch { .. } => "template",
        TemplateError::InvalidFormat { .. } => "format",
    }
}

pub fn report_template_error(name: &str, error: &TemplateError) {
    match TemplateDiagnostic::from_error(name, error) {
        Some(diagnostic) => eprintln!("{:?}", Report::new(diagnostic)),
        None => eprintln!("Template error: {}", error),
    }
}

pub fn report_config_error(error: &ConfigError) {
    eprintln!("Configuration error: {}", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parser::parse_fragment;

    #[test]
    fn diagnostic_points_at_the_offending_brace() {
        let err = parse_fragment("a } b").expect_err("lone brace");
        let diagnostic = TemplateDiagnostic::from_error("<template>", &err).expect("diagnostic");
        assert_eq!(diagnostic.span, SourceSpan::from((2, 1)));
        assert_eq!(diagnostic.help.as_deref(), Some("Write `}}` for a literal brace"));
    }

    #[test]
    fn format_errors_have_no_source() {
        let err = TemplateError::InvalidFormat {
            specifier: "Q".into(),
            kind: "int",
        };
        assert!(TemplateDiagnostic::from_error("<template>", &err).is_none());
    }
}
