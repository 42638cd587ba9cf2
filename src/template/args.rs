use super::value::Value;

/// Reserved key of the final argument, carrying the structured template.
pub const ORIGINAL_FORMAT_KEY: &str = "{OriginalFormat}";

/// Output of the pipeline: display message, structured template and the
/// ordered argument list ending with the original-format entry.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredRecord {
    message: String,
    template: String,
    arguments: Vec<(String, Value)>,
}

impl StructuredRecord {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Every argument, the original-format entry last.
    pub fn arguments(&self) -> &[(String, Value)] {
        &self.arguments
    }

    /// Arguments contributed by holes, without the original-format entry.
    pub fn hole_arguments(&self) -> &[(String, Value)] {
        &self.arguments[..self.arguments.len() - 1]
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

/// Collects hole arguments in source order.
#[derive(Debug, Default)]
pub struct ArgumentListBuilder {
    entries: Vec<(String, Value)>,
}

impl ArgumentListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: String, value: Value) {
        self.entries.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seal the list with the original-format entry.
    pub fn finish(mut self, message: String, template: String) -> StructuredRecord {
        self.entries
            .push((ORIGINAL_FORMAT_KEY.to_string(), Value::Str(template.clone())));
        StructuredRecord {
            message,
            template,
            arguments: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_format_is_always_last() {
        let mut builder = ArgumentListBuilder::new();
        builder.push("x".into(), Value::Int(1));
        builder.push("x".into(), Value::Null);
        let record = builder.finish("1 ".into(), "{x} {x}".into());
        assert_eq!(
            record.arguments(),
            &[
                ("x".to_string(), Value::Int(1)),
                ("x".to_string(), Value::Null),
                (ORIGINAL_FORMAT_KEY.to_string(), Value::Str("{x} {x}".into())),
            ]
        );
        assert_eq!(record.hole_arguments().len(), 2);
        assert_eq!(record.get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn empty_list_still_has_original_format() {
        let record = ArgumentListBuilder::new().finish("Test".into(), "Test".into());
        assert_eq!(record.arguments().len(), 1);
        assert!(record.hole_arguments().is_empty());
    }
}
