use crate::logging::{Level, Logger, MemorySink};
use crate::template::{
    compile, destructure, literal, literal_uncached, named, Interpolated, LiteralCache,
    StructuredRecord, TemplateCompiler, Value, ORIGINAL_FORMAT_KEY,
};
use crate::{debug, info, interpolated, scope};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::sync::Arc;

fn args(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn original(template: &str) -> (&'static str, Value) {
    (ORIGINAL_FORMAT_KEY, Value::Str(template.to_string()))
}

#[test]
fn text_without_holes_is_its_own_template() {
    let record = compile(interpolated!("Test")).expect("compile");
    assert_eq!(record.message(), "Test");
    assert_eq!(record.arguments(), args(&[original("Test")]));

    let escaped = compile(interpolated!("T{{es}}t")).expect("compile");
    assert_eq!(escaped.message(), "T{es}t");
    assert_eq!(escaped.arguments(), args(&[original("T{{es}}t")]));

    let raw = compile(Interpolated::raw("T{es}t")).expect("compile");
    assert_eq!(raw, escaped);
}

#[test]
fn single_scalar_hole_takes_the_argument_name() {
    let value = 7;
    let record = compile(interpolated!("{}", value)).expect("compile");
    assert_eq!(record.message(), "7");
    assert_eq!(
        record.arguments(),
        args(&[("value", Value::Int(7)), original("{value}")])
    );
}

#[test]
fn alignment_and_format_compose() {
    let value = 7000;
    let record = compile(interpolated!("{,8:N}", value)).expect("compile");
    assert_eq!(record.message(), "7,000.00");
    assert_eq!(
        record.arguments(),
        args(&[("value", Value::Int(7000)), original("{value,8:N}")])
    );

    let small = 7;
    let padded = compile(interpolated!("[{small,8:N}] [{small,-4}]", small, small))
        .expect("compile");
    assert_eq!(padded.message(), "[    7.00] [7   ]");
    assert_eq!(padded.template(), "[{small,8:N}] [{small,-4}]");
}

#[test]
fn destructured_collection_keeps_structure() {
    let value = vec![1, 2, 3];
    let record = compile(interpolated!("{}", destructure(&value))).expect("compile");
    assert_eq!(record.message(), "1, 2, 3");
    assert_eq!(
        record.arguments(),
        args(&[
            (
                "@value",
                Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            ),
            original("{@value}"),
        ])
    );

    let sigil_in_template = compile(interpolated!("{@}", value)).expect("compile");
    assert_eq!(sigil_in_template, record);
}

fn literal_between_holes(cache: Option<Arc<LiteralCache>>, cacheable: bool) -> StructuredRecord {
    let compiler = match cache {
        Some(cache) => TemplateCompiler::with_cache(cache),
        None => TemplateCompiler::new(),
    };
    let (x, y) = (1, 2);
    let text = if cacheable {
        literal("C")
    } else {
        literal_uncached("C")
    };
    compiler
        .compile(interpolated!("A{}B{}D{}E", x, text, y))
        .expect("compile")
}

#[test]
fn literal_values_are_spliced_without_arguments() {
    let expected = literal_between_holes(None, false);
    assert_eq!(expected.message(), "A1BCD2E");
    assert_eq!(
        expected.arguments(),
        args(&[
            ("x", Value::Int(1)),
            ("y", Value::Int(2)),
            original("A{x}BCD{y}E"),
        ])
    );

    let cache = Arc::new(LiteralCache::new());
    assert_eq!(literal_between_holes(None, true), expected);
    assert_eq!(literal_between_holes(Some(cache.clone()), true), expected);
    assert_eq!(literal_between_holes(Some(cache.clone()), true), expected);
    assert_eq!(literal_between_holes(Some(cache.clone()), false), expected);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 1);
}

#[test]
fn literal_payload_braces_are_escaped_in_template_only() {
    let record = compile(interpolated!("<{}>", literal("{x}"))).expect("compile");
    assert_eq!(record.message(), "<{x}>");
    assert_eq!(record.arguments(), args(&[original("<{{x}}>")]));
}

#[test]
fn one_value_under_several_named_sigils() {
    let value = vec![1, 2];
    let record = compile(interpolated!(
        "Default: {}, Stringified: {}, Destructured: {}",
        named("@default", &value),
        named("$str", &value),
        named("@destructured", &value)
    ))
    .expect("compile");
    let seq = Value::from(&value);
    assert_eq!(
        record.arguments(),
        args(&[
            ("@default", seq.clone()),
            ("$str", seq.clone()),
            ("@destructured", seq),
            original("Default: {@default}, Stringified: {$str}, Destructured: {@destructured}"),
        ])
    );
    assert_eq!(
        record.message(),
        "Default: 1, 2, Stringified: 1, 2, Destructured: 1, 2"
    );
}

#[test]
fn concatenated_fragments_match_the_joined_text() {
    let (arg1, arg2) = (1, "two");
    let joined = compile(interpolated!("ABC{}D{{E}}{}F", arg1, arg2)).expect("compile");
    let folded = compile(
        interpolated!("A")
            + interpolated!("B")
            + interpolated!("C")
            + interpolated!("{}", arg1)
            + interpolated!("D")
            + Interpolated::raw("{E}")
            + interpolated!("{}F", arg2),
    )
    .expect("compile");
    assert_eq!(folded, joined);
    assert_eq!(joined.message(), "ABC1D{E}twoF");
    assert_eq!(joined.template(), "ABC{arg1}D{{E}}{arg2}F");
}

#[test]
fn below_threshold_calls_produce_nothing() {
    let sink = Arc::new(MemorySink::new());
    let logger = Logger::new("gating")
        .with_min_level(Level::Information)
        .with_sink(sink.clone());
    let calls = Cell::new(0);
    let panicking = || -> i32 {
        calls.set(calls.get() + 1);
        panic!("argument evaluated below threshold")
    };

    debug!(logger, "{}", panicking()).expect("log");
    crate::trace!(logger, "{}", panicking()).expect("log");
    assert_eq!(calls.get(), 0);
    assert!(sink.is_empty());

    info!(logger, "visible {}", 1).expect("log");
    assert_eq!(sink.len(), 1);
}

#[test]
fn scopes_are_reported_innermost_first() {
    let sink = Arc::new(MemorySink::new());
    let logger = Logger::new("scopes").with_sink(sink.clone());
    let (a, b) = ("outer", "inner");
    let _outer = scope!(logger, "Scope {}", a).expect("scope");
    let _inner = scope!(logger, "Scope {}", b).expect("scope");
    info!(logger, "work").expect("log");

    let records = sink.take();
    let scopes: Vec<_> = records[0]
        .scopes
        .iter()
        .map(|scope| scope.message().to_string())
        .collect();
    assert_eq!(scopes, vec!["Scope inner", "Scope outer"]);
    assert_eq!(records[0].scope_states()[1][0].0, "a");
}
