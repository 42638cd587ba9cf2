//! Invariant-culture rendering of hole values.
//!
//! Numbers follow the standard and custom numeric format strings of the
//! composite formatting model: `C D E F G N P R X` with an optional precision,
//! or a picture built from `0 # . , %` plus literals. Floats are reduced to 15
//! significant digits before any rounding, and rounding is half away from zero.

use super::value::Value;
use crate::error::{TemplateError, TemplateResult};

const FLOAT_PRECISION: usize = 15;
const CURRENCY_SYMBOL: char = '\u{a4}';

/// Render `value` for the display message.
pub fn format_value(value: &Value, format: Option<&str>) -> TemplateResult<String> {
    let format = format.filter(|f| !f.is_empty());
    match (value, format) {
        (Value::Int(v), Some(spec)) => format_integer(i128::from(*v), spec, value.type_name()),
        (Value::UInt(v), Some(spec)) => format_integer(i128::from(*v), spec, value.type_name()),
        (Value::Float(v), Some(spec)) => format_float(*v, spec, value.type_name()),
        _ => Ok(value.to_string()),
    }
}

/// Pad `text` to `alignment` columns; negative alignment pads on the right.
pub fn align(text: String, alignment: Option<i32>) -> String {
    let Some(alignment) = alignment else {
        return text;
    };
    let width = alignment.unsigned_abs() as usize;
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let padding = " ".repeat(width - len);
    if alignment < 0 {
        text + &padding
    } else {
        padding + &text
    }
}

/// Default text of a float: shortest round-trip digits, scientific outside
/// `1e-4 <= |v| < 1e15`.
pub fn float_to_string(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    let digits = Digits::shortest(value);
    digits.general(None, 'E')
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

enum Standard {
    Letter(char, Option<usize>),
    Custom,
}

fn classify(spec: &str) -> Standard {
    let mut chars = spec.chars();
    let Some(letter) = chars.next() else {
        return Standard::Custom;
    };
    let rest = chars.as_str();
    if !letter.is_ascii_alphabetic() || !rest.chars().all(|c| c.is_ascii_digit()) || rest.len() > 3
    {
        return Standard::Custom;
    }
    let precision = if rest.is_empty() {
        None
    } else {
        rest.parse().ok()
    };
    Standard::Letter(letter, precision)
}

fn invalid(spec: &str, kind: &'static str) -> TemplateError {
    TemplateError::InvalidFormat {
        specifier: spec.to_string(),
        kind,
    }
}

fn format_integer(value: i128, spec: &str, kind: &'static str) -> TemplateResult<String> {
    let digits = Digits::from_integer(value);
    match classify(spec) {
        Standard::Custom => Ok(format_custom(digits, spec)),
        Standard::Letter(letter, precision) => match letter.to_ascii_uppercase() {
            'D' => {
                let text = format!("{:0>width$}", value.unsigned_abs(), width = precision.unwrap_or(0));
                Ok(with_minus(value < 0, text))
            }
            'X' => {
                let text = if value < 0 {
                    format!("{:X}", value as i64)
                } else {
                    format!("{:X}", value)
                };
                let text = format!("{:0>width$}", text, width = precision.unwrap_or(0));
                Ok(if letter.is_ascii_lowercase() {
                    text.to_ascii_lowercase()
                } else {
                    text
                })
            }
            'G' | 'R' if precision.unwrap_or(0) == 0 => Ok(with_minus(value < 0, digits.plain())),
            _ => format_standard(digits, letter, precision).ok_or_else(|| invalid(spec, kind)),
        },
    }
}

fn format_float(value: f64, spec: &str, kind: &'static str) -> TemplateResult<String> {
    if let Some(special) = non_finite(value) {
        return Ok(special.to_string());
    }
    match classify(spec) {
        Standard::Custom => Ok(format_custom(Digits::from_float(value), spec)),
        Standard::Letter(letter, precision) => match letter.to_ascii_uppercase() {
            'D' | 'X' => Err(invalid(spec, kind)),
            'R' => Ok(float_to_string(value)),
            'G' if precision.unwrap_or(0) == 0 => {
                let exp = if letter == 'g' { 'e' } else { 'E' };
                Ok(Digits::shortest(value).general(None, exp))
            }
            _ => format_standard(Digits::from_float(value), letter, precision)
                .ok_or_else(|| invalid(spec, kind)),
        },
    }
}

fn format_standard(mut digits: Digits, letter: char, precision: Option<usize>) -> Option<String> {
    let exp_char = if letter.is_ascii_lowercase() { 'e' } else { 'E' };
    let text = match letter.to_ascii_uppercase() {
        'C' => {
            let decimals = precision.unwrap_or(2);
            digits.round_decimals(decimals);
            let body = format!("{CURRENCY_SYMBOL}{}", digits.fixed(decimals, true));
            return Some(if digits.is_negative() {
                format!("({body})")
            } else {
                body
            });
        }
        'E' => {
            let decimals = precision.unwrap_or(6);
            digits.round_significant(decimals + 1);
            digits.scientific(decimals, exp_char, 3, false)
        }
        'F' => {
            let decimals = precision.unwrap_or(2);
            digits.round_decimals(decimals);
            digits.fixed(decimals, false)
        }
        'G' => return Some(digits.general(precision, exp_char)),
        'N' => {
            let decimals = precision.unwrap_or(2);
            digits.round_decimals(decimals);
            digits.fixed(decimals, true)
        }
        'P' => {
            let decimals = precision.unwrap_or(2);
            if !digits.is_zero() {
                digits.scale += 2;
            }
            digits.round_decimals(decimals);
            format!("{} %", digits.fixed(decimals, true))
        }
        _ => return None,
    };
    Some(with_minus(digits.is_negative(), text))
}

fn with_minus(negative: bool, text: String) -> String {
    if negative {
        format!("-{text}")
    } else {
        text
    }
}

/// Decimal digits of a number: `0.d1 d2 d3 ... * 10^scale`, no trailing zeros.
#[derive(Clone, Debug, PartialEq)]
struct Digits {
    negative: bool,
    digits: Vec<u8>,
    scale: i32,
}

impl Digits {
    fn from_integer(value: i128) -> Self {
        let text = value.unsigned_abs().to_string();
        let mut digits = Self {
            negative: value < 0,
            digits: text.bytes().map(|b| b - b'0').collect(),
            scale: text.len() as i32,
        };
        digits.normalize();
        digits
    }

    fn from_float(value: f64) -> Self {
        Self::parse_exponential(
            value.is_sign_negative(),
            &format!("{:.*e}", FLOAT_PRECISION - 1, value.abs()),
        )
    }

    fn shortest(value: f64) -> Self {
        Self::parse_exponential(value.is_sign_negative(), &format!("{:e}", value.abs()))
    }

    fn parse_exponential(negative: bool, text: &str) -> Self {
        let (mantissa, exponent) = text.split_once('e').unwrap_or((text, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let mut digits = Self {
            negative,
            digits: mantissa
                .bytes()
                .filter(u8::is_ascii_digit)
                .map(|b| b - b'0')
                .collect(),
            scale: exponent + 1,
        };
        digits.normalize();
        digits
    }

    fn normalize(&mut self) {
        while self.digits.last() == Some(&0) {
            self.digits.pop();
        }
        let leading = self.digits.iter().take_while(|d| **d == 0).count();
        if leading > 0 {
            self.digits.drain(..leading);
            self.scale -= leading as i32;
        }
        if self.digits.is_empty() {
            self.scale = 0;
        }
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Keep `keep` leading digits, rounding half away from zero.
    fn round_to(&mut self, keep: i32) {
        if keep < 0 {
            self.digits.clear();
            self.normalize();
            return;
        }
        let keep = keep as usize;
        if keep >= self.digits.len() {
            return;
        }
        let round_up = self.digits[keep] >= 5;
        self.digits.truncate(keep);
        if round_up {
            let mut idx = keep;
            loop {
                if idx == 0 {
                    self.digits.insert(0, 1);
                    self.scale += 1;
                    break;
                }
                idx -= 1;
                if self.digits[idx] == 9 {
                    self.digits[idx] = 0;
                } else {
                    self.digits[idx] += 1;
                    break;
                }
            }
        }
        self.normalize();
    }

    fn round_decimals(&mut self, decimals: usize) {
        self.round_to(self.scale + decimals as i32);
    }

    fn round_significant(&mut self, significant: usize) {
        self.round_to(significant as i32);
    }

    fn digit_at(&self, position: i32) -> u8 {
        if position < 0 {
            return 0;
        }
        self.digits.get(position as usize).copied().unwrap_or(0)
    }

    fn integer_part(&self) -> String {
        if self.scale <= 0 {
            return "0".into();
        }
        (0..self.scale)
            .map(|i| char::from(b'0' + self.digit_at(i)))
            .collect()
    }

    fn fraction_part(&self, decimals: usize) -> String {
        (0..decimals as i32)
            .map(|k| char::from(b'0' + self.digit_at(self.scale + k)))
            .collect()
    }

    fn plain(&self) -> String {
        self.integer_part()
    }

    fn fixed(&self, decimals: usize, grouped: bool) -> String {
        let integer = self.integer_part();
        let mut out = if grouped { group(&integer) } else { integer };
        if decimals > 0 {
            out.push('.');
            out.push_str(&self.fraction_part(decimals));
        }
        out
    }

    fn exponent(&self) -> i32 {
        if self.is_zero() {
            0
        } else {
            self.scale - 1
        }
    }

    fn scientific(&self, decimals: usize, exp_char: char, min_exp_digits: usize, trim: bool) -> String {
        let mut out = String::new();
        out.push(char::from(b'0' + self.digit_at(0)));
        let fraction: String = if trim {
            self.digits.iter().skip(1).map(|d| char::from(b'0' + d)).collect()
        } else {
            (1..=decimals as i32)
                .map(|i| char::from(b'0' + self.digit_at(i)))
                .collect()
        };
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(&fraction);
        }
        let exponent = self.exponent();
        let sign = if exponent < 0 { '-' } else { '+' };
        out.push(exp_char);
        out.push(sign);
        out.push_str(&format!(
            "{:0>width$}",
            exponent.unsigned_abs(),
            width = min_exp_digits
        ));
        out
    }

    /// `G` formatting; `None` keeps every digit and switches to scientific
    /// notation at an exponent of 15.
    fn general(mut self, precision: Option<usize>, exp_char: char) -> String {
        let threshold = match precision.filter(|p| *p > 0) {
            Some(p) => {
                self.round_significant(p);
                p as i32
            }
            None => FLOAT_PRECISION as i32,
        };
        let exponent = self.exponent();
        let body = if exponent >= threshold || exponent < -4 {
            self.scientific(0, exp_char, 2, true)
        } else {
            let decimals = (self.digits.len() as i32 - self.scale).max(0) as usize;
            self.fixed(decimals, false)
        };
        with_minus(self.is_negative(), body)
    }
}

fn group(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, PartialEq)]
enum Picture {
    Digit { zero: bool },
    Point,
    Literal(String),
}

struct Section {
    items: Vec<Picture>,
    grouping: bool,
    /// Powers of ten applied before formatting (`%`, `‰`, scaling commas).
    shift: i32,
}

fn split_sections(spec: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = spec.chars();
    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '\\') => {
                current.push(ch);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, ';') => sections.push(std::mem::take(&mut current)),
            (None, c) => current.push(c),
        }
    }
    sections.push(current);
    sections
}

fn parse_section(section: &str) -> Section {
    let mut items = Vec::new();
    let mut grouping = false;
    let mut shift = 0;
    let mut seen_point = false;
    let mut pending_commas = 0;
    let mut chars = section.chars().peekable();

    let push_literal = |items: &mut Vec<Picture>, text: &str| {
        if let Some(Picture::Literal(existing)) = items.last_mut() {
            existing.push_str(text);
        } else {
            items.push(Picture::Literal(text.to_string()));
        }
    };

    while let Some(ch) = chars.next() {
        if ch != ',' && pending_commas > 0 {
            if matches!(ch, '0' | '#') {
                grouping = true;
            } else {
                shift -= 3 * pending_commas;
            }
            pending_commas = 0;
        }
        match ch {
            '0' | '#' => items.push(Picture::Digit { zero: ch == '0' }),
            '.' if !seen_point => {
                seen_point = true;
                items.push(Picture::Point);
            }
            ',' if !seen_point && items.iter().any(|i| matches!(i, Picture::Digit { .. })) => {
                pending_commas += 1;
            }
            '%' => {
                shift += 2;
                push_literal(&mut items, "%");
            }
            '\u{2030}' => {
                shift += 3;
                push_literal(&mut items, "\u{2030}");
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    push_literal(&mut items, &next.to_string());
                }
            }
            '\'' | '"' => {
                let mut text = String::new();
                for next in chars.by_ref() {
                    if next == ch {
                        break;
                    }
                    text.push(next);
                }
                push_literal(&mut items, &text);
            }
            other => push_literal(&mut items, &other.to_string()),
        }
    }
    if pending_commas > 0 {
        shift -= 3 * pending_commas;
    }

    Section {
        items,
        grouping,
        shift,
    }
}

fn format_custom(digits: Digits, spec: &str) -> String {
    let sections = split_sections(spec);
    let negative = digits.is_negative();
    let (index, explicit_sign) = if digits.is_zero() && sections.len() >= 3 {
        (2, true)
    } else if negative && sections.len() >= 2 && !sections[1].is_empty() {
        (1, true)
    } else {
        (0, false)
    };
    let section = parse_section(&sections[index]);
    let rendered = render_section(digits, &section);
    match rendered {
        (text, true) if !explicit_sign => format!("-{text}"),
        (text, _) => text,
    }
}

/// Returns the text and whether the rounded value is still negative.
fn render_section(mut digits: Digits, section: &Section) -> (String, bool) {
    let point = section.items.iter().position(|i| *i == Picture::Point);
    let (integer_items, fraction_items) = match point {
        Some(at) => section.items.split_at(at),
        None => (section.items.as_slice(), &[][..]),
    };
    let integer_slots: Vec<bool> = integer_items
        .iter()
        .filter_map(|i| match i {
            Picture::Digit { zero } => Some(*zero),
            _ => None,
        })
        .collect();
    let fraction_slots: Vec<bool> = fraction_items
        .iter()
        .filter_map(|i| match i {
            Picture::Digit { zero } => Some(*zero),
            _ => None,
        })
        .collect();

    if !digits.is_zero() {
        digits.scale += section.shift;
    }
    digits.round_decimals(fraction_slots.len());

    let min_integer = integer_slots
        .iter()
        .position(|zero| *zero)
        .map(|first| integer_slots.len() - first)
        .unwrap_or(0);
    let mut integer = if digits.scale > 0 {
        digits.integer_part()
    } else {
        String::new()
    };
    if integer.len() < min_integer {
        integer = format!("{:0>width$}", integer, width = min_integer);
    }

    let min_fraction = fraction_slots
        .iter()
        .rposition(|zero| *zero)
        .map(|last| last + 1)
        .unwrap_or(0);
    let mut fraction = digits.fraction_part(fraction_slots.len());
    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }

    let integer_digits: Vec<char> = integer.chars().collect();
    let mut out = String::new();
    let mut slot = 0usize;
    let mut fraction_slot = 0usize;
    let mut in_fraction = false;
    let total = integer_digits.len() as i64;
    let slots = integer_slots.len() as i64;

    let push_integer_digit = |out: &mut String, idx: usize| {
        out.push(integer_digits[idx]);
        let remaining = integer_digits.len() - 1 - idx;
        if section.grouping && remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    };

    for item in &section.items {
        match item {
            Picture::Digit { .. } if !in_fraction => {
                let position = total - slots + slot as i64;
                if slot == 0 {
                    for idx in 0..=position.max(-1) {
                        push_integer_digit(&mut out, idx as usize);
                    }
                } else if position >= 0 {
                    push_integer_digit(&mut out, position as usize);
                }
                slot += 1;
            }
            Picture::Digit { .. } => {
                if let Some(ch) = fraction.chars().nth(fraction_slot) {
                    out.push(ch);
                }
                fraction_slot += 1;
            }
            Picture::Point => {
                in_fraction = true;
                if integer_slots.is_empty() {
                    out.extend(integer_digits.iter());
                }
                if !fraction.is_empty() {
                    out.push('.');
                }
            }
            Picture::Literal(text) => out.push_str(text),
        }
    }

    (out, digits.is_negative())
}
